//! Ordered catalog of registered plugins.
//!
//! The registry is built once during process start and then shared by
//! reference. Lookups filter by capability tag and always return plugins in
//! registration order.

use crate::plugin::{
    domain::{ModuleName, PluginKind, PluginName},
    ports::{LifecycleHookPlugin, SchemaExtensionPlugin, UpgradePlugin},
};
use std::fmt;
use std::sync::Arc;

/// A registered plugin, one variant per capability.
#[derive(Clone)]
pub enum Plugin {
    /// Version migration.
    Upgrade(Arc<dyn UpgradePlugin>),
    /// Schema contribution.
    SchemaExtension(Arc<dyn SchemaExtensionPlugin>),
    /// Lifecycle observer.
    LifecycleHook(Arc<dyn LifecycleHookPlugin>),
}

impl Plugin {
    /// Wraps an upgrade plugin.
    pub fn upgrade(plugin: impl UpgradePlugin + 'static) -> Self {
        Self::Upgrade(Arc::new(plugin))
    }

    /// Wraps a schema extension plugin.
    pub fn schema_extension(plugin: impl SchemaExtensionPlugin + 'static) -> Self {
        Self::SchemaExtension(Arc::new(plugin))
    }

    /// Wraps a lifecycle hook plugin.
    pub fn lifecycle_hook(plugin: impl LifecycleHookPlugin + 'static) -> Self {
        Self::LifecycleHook(Arc::new(plugin))
    }

    /// Returns the capability tag.
    #[must_use]
    pub const fn kind(&self) -> PluginKind {
        match self {
            Self::Upgrade(_) => PluginKind::Upgrade,
            Self::SchemaExtension(_) => PluginKind::SchemaExtension,
            Self::LifecycleHook(_) => PluginKind::LifecycleHook,
        }
    }

    /// Returns the plugin name.
    #[must_use]
    pub fn name(&self) -> &PluginName {
        match self {
            Self::Upgrade(plugin) => plugin.name(),
            Self::SchemaExtension(plugin) => plugin.name(),
            Self::LifecycleHook(plugin) => plugin.name(),
        }
    }

    /// Returns the module the plugin belongs to.
    #[must_use]
    pub fn module(&self) -> &ModuleName {
        match self {
            Self::Upgrade(plugin) => plugin.module(),
            Self::SchemaExtension(plugin) => plugin.module(),
            Self::LifecycleHook(plugin) => plugin.module(),
        }
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Plugin")
            .field("kind", &self.kind())
            .field("name", self.name())
            .field("module", self.module())
            .finish()
    }
}

/// Catalog of plugins indexed by capability tag.
///
/// No uniqueness constraint is enforced: registering two plugins for the
/// same logical capability keeps both, and consumers decide how to
/// disambiguate.
///
/// # Examples
///
/// ```
/// use modulor::plugin::adapters::StaticSchemaExtension;
/// use modulor::plugin::domain::{ModuleName, PluginKind};
/// use modulor::plugin::services::{Plugin, PluginRegistry};
///
/// let module = ModuleName::new("form-builder").expect("valid module");
/// let registry = PluginRegistry::new().with_plugin(Plugin::schema_extension(
///     StaticSchemaExtension::new("fb-schema", module, "type FbQuery { ping: Boolean }")
///         .expect("valid plugin"),
/// ));
/// assert_eq!(registry.by_type(PluginKind::SchemaExtension).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<Plugin>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Appends a plugin, consuming and returning the registry.
    #[must_use]
    pub fn with_plugin(mut self, plugin: Plugin) -> Self {
        self.register(plugin);
        self
    }

    /// Appends a plugin.
    pub fn register(&mut self, plugin: Plugin) {
        tracing::debug!(
            kind = %plugin.kind(),
            name = %plugin.name(),
            module = %plugin.module(),
            "registering plugin"
        );
        self.plugins.push(plugin);
    }

    /// Returns every plugin with the given tag, in registration order.
    #[must_use]
    pub fn by_type(&self, kind: PluginKind) -> Vec<&Plugin> {
        self.plugins
            .iter()
            .filter(|plugin| plugin.kind() == kind)
            .collect()
    }

    /// Returns all upgrade plugins, in registration order.
    #[must_use]
    pub fn upgrades(&self) -> Vec<Arc<dyn UpgradePlugin>> {
        self.plugins
            .iter()
            .filter_map(|plugin| match plugin {
                Plugin::Upgrade(upgrade) => Some(Arc::clone(upgrade)),
                Plugin::SchemaExtension(_) | Plugin::LifecycleHook(_) => None,
            })
            .collect()
    }

    /// Returns upgrade plugins for one module, in registration order.
    #[must_use]
    pub fn upgrades_for(&self, module: &ModuleName) -> Vec<Arc<dyn UpgradePlugin>> {
        self.upgrades()
            .into_iter()
            .filter(|plugin| plugin.module() == module)
            .collect()
    }

    /// Returns all schema extensions, in registration order.
    #[must_use]
    pub fn schema_extensions(&self) -> Vec<Arc<dyn SchemaExtensionPlugin>> {
        self.plugins
            .iter()
            .filter_map(|plugin| match plugin {
                Plugin::SchemaExtension(extension) => Some(Arc::clone(extension)),
                Plugin::Upgrade(_) | Plugin::LifecycleHook(_) => None,
            })
            .collect()
    }

    /// Returns lifecycle hooks for one module, in registration order.
    #[must_use]
    pub fn lifecycle_hooks_for(&self, module: &ModuleName) -> Vec<Arc<dyn LifecycleHookPlugin>> {
        self.plugins
            .iter()
            .filter_map(|plugin| match plugin {
                Plugin::LifecycleHook(hook) if hook.module() == module => Some(Arc::clone(hook)),
                Plugin::LifecycleHook(_) | Plugin::Upgrade(_) | Plugin::SchemaExtension(_) => {
                    None
                }
            })
            .collect()
    }

    /// Returns the number of registered plugins.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` when nothing has been registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
