//! Drives the lifecycle orchestrator for one module from the command line.
//!
//! Usage:
//!
//! ```text
//! modulor --tenant root [--locale en-US] <command>
//! ```
//!
//! Records are kept as JSON under `--state-dir`. Installer dispatches are
//! recorded and logged rather than executed, so a local operator plays the
//! installer by running `complete` or `fail` afterwards. No upgrade plugins
//! are linked into this binary; `upgrade` therefore reports
//! `NO_APPLICABLE_PLUGIN` unless the caller is anonymous.
//!
//! Configuration is read from `INSTALLATION_HANDLER`, `PLATFORM_VERSION`,
//! `MODULE_NAME` and `UPGRADE_TIMEOUT_SECS`. Log verbosity follows
//! `RUST_LOG`.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use modulor::api::{BooleanResponse, ErrorResponse, SystemApi, SystemView};
use modulor::config::{ConfigError, OrchestratorConfig};
use modulor::lifecycle::{
    adapters::{
        file::JsonFileStateStore,
        memory::{FixedScopeResolver, RecordingInvoker, StaticIdentityProvider},
    },
    domain::{Identity, InstallationFailure, LifecycleDomainError, LocaleCode, TenantId},
    ports::{InvokerError, StateStoreError},
    services::{
        ExactTransitionPlanner, InstallationCoordinator, InstallationServiceError,
        UpgradeOrchestrator,
    },
};
use modulor::plugin::{
    domain::{ModuleVersion, PluginDomainError},
    services::PluginRegistry,
};
use serde_json::{Value, json};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

type CliApi = SystemApi<
    JsonFileStateStore,
    RecordingInvoker,
    StaticIdentityProvider,
    ExactTransitionPlanner,
    DefaultClock,
    FixedScopeResolver,
>;

#[derive(Parser)]
#[command(name = "modulor")]
#[command(about = "Install and upgrade application modules")]
struct Cli {
    /// Directory holding the lifecycle records.
    #[arg(long, env = "MODULOR_STATE_DIR", default_value = ".modulor")]
    state_dir: Utf8PathBuf,
    /// Tenant the request runs for.
    #[arg(long, env = "MODULOR_TENANT")]
    tenant: Option<String>,
    /// Content locale; defaults to the platform default locale.
    #[arg(long, env = "MODULOR_LOCALE")]
    locale: Option<String>,
    /// Platform default locale handed to the installer.
    #[arg(long, env = "MODULOR_DEFAULT_LOCALE", default_value = "en-US")]
    default_locale: String,
    /// Authenticated caller; upgrades are refused without one.
    #[arg(long, env = "MODULOR_ACTOR")]
    actor: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the installed version and installation state
    System,
    /// Request installation of the module
    Install {
        /// Public domain the module is served under
        #[arg(long)]
        domain: Option<String>,
    },
    /// Report that the installer finished
    Complete {
        /// Version the installer provisioned
        #[arg(value_name = "VERSION")]
        release: String,
    },
    /// Report that the installer failed
    Fail {
        /// Machine-readable failure code
        #[arg(long)]
        code: String,
        /// Human-readable failure description
        #[arg(long)]
        message: String,
    },
    /// Upgrade the module to a new version
    Upgrade {
        /// Requested version
        #[arg(value_name = "VERSION")]
        release: String,
    },
    /// Print the schema contributed by registered extensions
    Schema,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StateStoreError),
    #[error(transparent)]
    Invoker(#[from] InvokerError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleDomainError),
    #[error(transparent)]
    Plugin(#[from] PluginDomainError),
    #[error("request has no tenant or content locale")]
    ScopeUnresolved,
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = run(cli).await.and_then(|output| emit(&output));
    if let Err(err) = outcome {
        tracing::error!(error = %err, "modulor failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn emit(output: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, output)?;
    writeln!(stdout)?;
    Ok(())
}

async fn run(cli: Cli) -> Result<Value, CliError> {
    let config = OrchestratorConfig::from_env()?;
    let invoker = Arc::new(RecordingInvoker::new());
    let api = build_api(&cli, &config, Arc::clone(&invoker))?;

    let output = match cli.command {
        Command::System => json!(api.system().await),
        Command::Install { domain } => {
            let response = api.install(domain).await;
            for task in invoker.dispatched()? {
                tracing::info!(
                    invocation = %task.id,
                    task = %task.request.task,
                    payload = %task.request.payload,
                    "installer dispatch recorded; report its outcome with `complete` or `fail`"
                );
            }
            json!(response)
        }
        Command::Complete { release } => {
            let scope = api.scope().ok_or(CliError::ScopeUnresolved)?;
            let version = ModuleVersion::parse(&release)?;
            let outcome = api.installation().complete_installation(&scope, version).await;
            outcome.map_or_else(|err| failure_json(&err), |record| json!(SystemView::from(&record)))
        }
        Command::Fail { code, message } => {
            let scope = api.scope().ok_or(CliError::ScopeUnresolved)?;
            let failure = InstallationFailure::new(code, message)?;
            let outcome = api.installation().fail_installation(&scope, failure).await;
            outcome.map_or_else(|err| failure_json(&err), |record| json!(SystemView::from(&record)))
        }
        Command::Upgrade { release } => json!(api.upgrade(&release).await),
        Command::Schema => Value::String(api.schema_type_defs()),
    };
    Ok(output)
}

fn failure_json(err: &InstallationServiceError) -> Value {
    json!(BooleanResponse::failed(ErrorResponse::from(err)))
}

fn build_api(
    cli: &Cli,
    config: &OrchestratorConfig,
    invoker: Arc<RecordingInvoker>,
) -> Result<CliApi, CliError> {
    let store = Arc::new(JsonFileStateStore::open(&cli.state_dir)?);
    let registry = Arc::new(PluginRegistry::new());
    let clock = Arc::new(DefaultClock);

    let identity = cli.actor.as_ref().map_or_else(
        StaticIdentityProvider::anonymous,
        |actor| StaticIdentityProvider::authenticated(Identity::new(actor.as_str())),
    );
    let default_locale = LocaleCode::new(cli.default_locale.as_str())?;
    let content_locale = cli.locale.as_deref().map(LocaleCode::new).transpose()?;
    let resolver = match (cli.tenant.as_deref(), content_locale) {
        (Some(tenant), Some(locale)) => {
            FixedScopeResolver::new(TenantId::new(tenant)?, default_locale).with_locale(locale)
        }
        (Some(tenant), None) => FixedScopeResolver::new(TenantId::new(tenant)?, default_locale),
        (None, _) => FixedScopeResolver::unresolved(default_locale),
    };

    let installation = InstallationCoordinator::new(
        Arc::clone(&store),
        invoker,
        Arc::clone(&clock),
        Arc::clone(&registry),
        config.installer.clone(),
    );
    let mut upgrade = UpgradeOrchestrator::new(
        Arc::clone(&store),
        Arc::new(identity),
        Arc::new(ExactTransitionPlanner::new()),
        clock,
        Arc::clone(&registry),
        config.platform_version,
    );
    if let Some(timeout) = config.upgrade_timeout {
        upgrade = upgrade.with_default_timeout(timeout);
    }

    Ok(SystemApi::new(
        store,
        Arc::new(resolver),
        registry,
        config.module.clone(),
        installation,
        upgrade,
    ))
}
