//! 远端容器：宿主先 `init(scope)` 交出共享注册表，再 `get("./index")`
//! 拿到惰性装载器。依赖解析全部发生在装载器 `load` 里，`get` 本身不碰
//! scope。

use promptcell_core::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::plugin::{http_chat_plugin, ModuleExports};
use crate::scope::{AmbientRegistry, SharedScope, SharedScopeResolver};

/// Module identifiers the container recognizes. Both name the same loader.
pub const MODULE_INDEX: &str = "./index";
pub const MODULE_EXTENSION: &str = "./extension";

pub struct FederationContainer {
    resolver: Arc<SharedScopeResolver>,
}

impl FederationContainer {
    pub fn new() -> Self {
        Self {
            resolver: Arc::new(SharedScopeResolver::new()),
        }
    }

    /// Container whose resolver falls back to the given ambient registry.
    pub fn with_ambient(ambient: Arc<AmbientRegistry>) -> Self {
        Self {
            resolver: Arc::new(SharedScopeResolver::with_ambient(ambient)),
        }
    }

    /// 存入宿主的共享注册表。可重复调用，后写覆盖前写并清掉解析缓存。
    pub async fn init(&self, scope: Arc<SharedScope>) {
        info!(dependencies = scope.len(), "federation container initialized");
        self.resolver.install(scope).await;
    }

    /// Hand out the lazy loader for a recognized module identifier.
    pub fn get(&self, module_name: &str) -> Result<PluginLoader> {
        match module_name {
            MODULE_INDEX | MODULE_EXTENSION => {
                debug!(module = %module_name, "module loader handed out");
                Ok(PluginLoader::new(self.resolver.clone()))
            }
            other => Err(Error::UnknownModule(other.to_string())),
        }
    }

    pub fn resolver(&self) -> Arc<SharedScopeResolver> {
        self.resolver.clone()
    }
}

impl Default for FederationContainer {
    fn default() -> Self {
        Self::new()
    }
}

/// 惰性装载器。`load` 时解析插件声明的共享依赖并组装模块导出；任何
/// 依赖缺失都让装载本身失败。
pub struct PluginLoader {
    resolver: Arc<SharedScopeResolver>,
}

impl std::fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginLoader").finish_non_exhaustive()
    }
}

impl PluginLoader {
    fn new(resolver: Arc<SharedScopeResolver>) -> Self {
        Self { resolver }
    }

    pub async fn load(&self) -> Result<ModuleExports> {
        let plugins = vec![http_chat_plugin()];

        let mut resolved = HashMap::new();
        for plugin in &plugins {
            for name in &plugin.requires {
                let module = self.resolver.resolve(name).await?;
                resolved.insert((*name).to_string(), module);
            }
        }

        info!(plugins = plugins.len(), "plugin module loaded");
        Ok(ModuleExports {
            default: plugins,
            resolved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{HostContext, KERNEL_SPECS, PLUGIN_ID};
    use crate::scope::{SharedEntry, SharedModule};
    use promptcell_kernel::KernelSpecRegistry;

    struct NoHost;

    impl HostContext for NoHost {
        fn kernel_specs(&self) -> Option<Arc<KernelSpecRegistry>> {
            None
        }
    }

    fn container() -> FederationContainer {
        FederationContainer::with_ambient(Arc::new(AmbientRegistry::new()))
    }

    fn scope_with_registry(registry: &Arc<KernelSpecRegistry>) -> Arc<SharedScope> {
        let mut scope = SharedScope::new();
        scope.insert(
            KERNEL_SPECS,
            "1.0.0",
            SharedEntry::ready(registry.clone() as SharedModule),
        );
        Arc::new(scope)
    }

    #[tokio::test]
    async fn test_get_unknown_module() {
        let container = container();
        let err = container.get("./nope").unwrap_err();
        match err {
            Error::UnknownModule(name) => assert_eq!(name, "./nope"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_index_and_extension_load_the_same_module() {
        let container = container();
        let registry = Arc::new(KernelSpecRegistry::new());
        container.init(scope_with_registry(&registry)).await;

        let from_index = container.get(MODULE_INDEX).unwrap().load().await.unwrap();
        let from_extension = container
            .get(MODULE_EXTENSION)
            .unwrap()
            .load()
            .await
            .unwrap();

        assert_eq!(from_index.default.len(), 1);
        assert_eq!(from_index.default[0].id, PLUGIN_ID);
        assert_eq!(from_extension.default[0].id, PLUGIN_ID);
    }

    #[tokio::test]
    async fn test_load_before_init_fails() {
        let container = container();
        let loader = container.get(MODULE_INDEX).unwrap();
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, Error::ScopeNotInitialized));
    }

    #[tokio::test]
    async fn test_load_with_missing_dependency_fails() {
        let container = container();
        container.init(Arc::new(SharedScope::new())).await;
        let err = container.get(MODULE_INDEX).unwrap().load().await.unwrap_err();
        match err {
            Error::DependencyNotFound(name) => assert_eq!(name, KERNEL_SPECS),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_last_init_wins() {
        let container = container();
        let first = Arc::new(KernelSpecRegistry::new());
        let second = Arc::new(KernelSpecRegistry::new());

        container.init(scope_with_registry(&first)).await;
        container.init(scope_with_registry(&second)).await;

        let exports = container.get(MODULE_INDEX).unwrap().load().await.unwrap();
        for plugin in &exports.default {
            plugin.activate(&NoHost, &exports.resolved).await.unwrap();
        }

        assert!(first.get("http-chat").await.is_none());
        assert!(second.get("http-chat").await.is_some());
    }

    #[tokio::test]
    async fn test_get_does_not_touch_the_scope() {
        // get succeeds even with nothing initialized; only load resolves.
        let container = container();
        assert!(container.get(MODULE_INDEX).is_ok());
        assert!(container.get(MODULE_EXTENSION).is_ok());
        assert!(!container.resolver().is_initialized().await);
    }
}
