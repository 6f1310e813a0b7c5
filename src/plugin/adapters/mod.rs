//! Ready-made plugin implementations.
//!
//! These cover the common cases of a migration expressed as a closure and a
//! schema contribution known at compile time.

use crate::plugin::{
    domain::{ModuleName, PluginDomainError, PluginName, UpgradeWindow},
    ports::{PluginResult, SchemaExtensionPlugin, UpgradeContext, UpgradePlugin},
};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

type Migration = Arc<dyn Fn(&UpgradeContext) -> PluginResult<()> + Send + Sync>;

/// Upgrade plugin whose migration is a synchronous closure.
#[derive(Clone)]
pub struct FnUpgradePlugin {
    name: PluginName,
    module: ModuleName,
    window: UpgradeWindow,
    migration: Migration,
}

impl FnUpgradePlugin {
    /// Creates an upgrade plugin.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError::EmptyPluginName`] when the name is blank.
    pub fn new(
        name: impl Into<String>,
        module: ModuleName,
        window: UpgradeWindow,
        migration: impl Fn(&UpgradeContext) -> PluginResult<()> + Send + Sync + 'static,
    ) -> Result<Self, PluginDomainError> {
        Ok(Self {
            name: PluginName::new(name)?,
            module,
            window,
            migration: Arc::new(migration),
        })
    }
}

impl fmt::Debug for FnUpgradePlugin {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FnUpgradePlugin")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UpgradePlugin for FnUpgradePlugin {
    fn name(&self) -> &PluginName {
        &self.name
    }

    fn module(&self) -> &ModuleName {
        &self.module
    }

    fn window(&self) -> UpgradeWindow {
        self.window
    }

    async fn apply(&self, context: &UpgradeContext) -> PluginResult<()> {
        (self.migration)(context)
    }
}

/// Schema extension with fixed type definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSchemaExtension {
    name: PluginName,
    module: ModuleName,
    type_defs: String,
}

impl StaticSchemaExtension {
    /// Creates a schema extension.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError::EmptyPluginName`] when the name is blank.
    pub fn new(
        name: impl Into<String>,
        module: ModuleName,
        type_defs: impl Into<String>,
    ) -> Result<Self, PluginDomainError> {
        Ok(Self {
            name: PluginName::new(name)?,
            module,
            type_defs: type_defs.into(),
        })
    }
}

impl SchemaExtensionPlugin for StaticSchemaExtension {
    fn name(&self) -> &PluginName {
        &self.name
    }

    fn module(&self) -> &ModuleName {
        &self.module
    }

    fn type_defs(&self) -> &str {
        &self.type_defs
    }
}
