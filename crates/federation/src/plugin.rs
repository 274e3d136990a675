//! 插件描述符与激活逻辑。
//!
//! 模块装载后宿主拿到的就是这里的 [`PluginDescriptor`]：一条静态声明，
//! 激活时向宿主的内核注册设施登记 {spec, factory}。

use futures::future::BoxFuture;
use futures::FutureExt;
use promptcell_core::{kernelspec, KernelSpec, Result};
use promptcell_kernel::{ChatKernel, Kernel, KernelFactory, KernelOptions, KernelSpecRegistry};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::scope::SharedModule;

/// Identifier the host sees for this plugin.
pub const PLUGIN_ID: &str = "promptcell-kernel:plugin";

/// Shared-dependency name of the kernel-spec registration facility.
pub const KERNEL_SPECS: &str = "kernel-specs";

/// 宿主上下文。requires 里找不到注册设施时，激活逻辑从这里兜底。
pub trait HostContext: Send + Sync {
    /// Conventional accessor for the kernel-spec registration facility.
    fn kernel_specs(&self) -> Option<Arc<KernelSpecRegistry>>;
}

type ActivateFn = for<'a> fn(
    &'a dyn HostContext,
    &'a HashMap<String, SharedModule>,
) -> BoxFuture<'a, Result<()>>;

/// Static plugin declaration: id, auto-start flag, shared requirements and
/// the activation function the host invokes once the module is resolved.
pub struct PluginDescriptor {
    pub id: &'static str,
    pub auto_start: bool,
    pub requires: Vec<&'static str>,
    activate: ActivateFn,
}

impl PluginDescriptor {
    pub async fn activate(
        &self,
        host: &dyn HostContext,
        resolved: &HashMap<String, SharedModule>,
    ) -> Result<()> {
        (self.activate)(host, resolved).await
    }
}

/// 模块的导出形态：default 下挂插件列表，外加装载时解析好的共享依赖。
pub struct ModuleExports {
    /// Plugin descriptors in activation order.
    pub default: Vec<PluginDescriptor>,
    /// Load-time resolution of the plugins' shared requirements, by name.
    pub resolved: HashMap<String, SharedModule>,
}

impl std::fmt::Debug for ModuleExports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleExports").finish_non_exhaustive()
    }
}

/// The one plugin this module exports.
pub fn http_chat_plugin() -> PluginDescriptor {
    PluginDescriptor {
        id: PLUGIN_ID,
        auto_start: true,
        requires: vec![KERNEL_SPECS],
        activate: activate_http_chat,
    }
}

/// 定位注册设施并登记 {spec, factory}。设施缺失只记日志，不算失败。
fn activate_http_chat<'a>(
    host: &'a dyn HostContext,
    resolved: &'a HashMap<String, SharedModule>,
) -> BoxFuture<'a, Result<()>> {
    async move {
        let from_requirements = resolved
            .get(KERNEL_SPECS)
            .and_then(|module| module.clone().downcast::<KernelSpecRegistry>().ok());

        let registry = match from_requirements.or_else(|| host.kernel_specs()) {
            Some(registry) => registry,
            None => {
                warn!(
                    plugin = PLUGIN_ID,
                    "kernel-spec facility unavailable, skipping registration"
                );
                return Ok(());
            }
        };

        registry
            .register(KernelSpec::http_chat(), chat_kernel_factory())
            .await;
        info!(
            plugin = PLUGIN_ID,
            kernel = kernelspec::DEFAULT_SPEC_NAME,
            "kernel spec registered"
        );
        Ok(())
    }
    .boxed()
}

/// Factory registered alongside the kernel spec: builds a [`ChatKernel`]
/// over the HTTP transport, honoring the endpoint option when present.
pub fn chat_kernel_factory() -> KernelFactory {
    Arc::new(|options: KernelOptions| {
        async move {
            let kernel: Box<dyn Kernel> = Box::new(ChatKernel::from_endpoint(
                options.endpoint.as_deref(),
                options.iopub,
            ));
            Ok(kernel)
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestHost {
        specs: Option<Arc<KernelSpecRegistry>>,
    }

    impl HostContext for TestHost {
        fn kernel_specs(&self) -> Option<Arc<KernelSpecRegistry>> {
            self.specs.clone()
        }
    }

    #[test]
    fn test_descriptor_shape() {
        let plugin = http_chat_plugin();
        assert_eq!(plugin.id, "promptcell-kernel:plugin");
        assert!(plugin.auto_start);
        assert_eq!(plugin.requires, vec!["kernel-specs"]);
    }

    #[tokio::test]
    async fn test_activate_registers_via_requirements() {
        let registry = Arc::new(KernelSpecRegistry::new());
        let mut resolved: HashMap<String, SharedModule> = HashMap::new();
        resolved.insert(KERNEL_SPECS.to_string(), registry.clone() as SharedModule);

        let host = TestHost { specs: None };
        http_chat_plugin().activate(&host, &resolved).await.unwrap();

        let spec = registry.get("http-chat").await.unwrap();
        assert_eq!(spec.display_name, "HTTP Chat (promptcell)");
        assert_eq!(spec.language, "markdown");
    }

    #[tokio::test]
    async fn test_activate_falls_back_to_host_accessor() {
        let registry = Arc::new(KernelSpecRegistry::new());
        let host = TestHost {
            specs: Some(registry.clone()),
        };
        http_chat_plugin()
            .activate(&host, &HashMap::new())
            .await
            .unwrap();
        assert!(registry.get("http-chat").await.is_some());
    }

    #[tokio::test]
    async fn test_activate_without_facility_is_nonfatal() {
        let host = TestHost { specs: None };
        let result = http_chat_plugin().activate(&host, &HashMap::new()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_wrong_typed_requirement_falls_back_to_host() {
        let registry = Arc::new(KernelSpecRegistry::new());
        let mut resolved: HashMap<String, SharedModule> = HashMap::new();
        resolved.insert(
            KERNEL_SPECS.to_string(),
            Arc::new("not a registry".to_string()) as SharedModule,
        );

        let host = TestHost {
            specs: Some(registry.clone()),
        };
        http_chat_plugin().activate(&host, &resolved).await.unwrap();
        assert!(registry.get("http-chat").await.is_some());
    }

    #[tokio::test]
    async fn test_factory_builds_kernel() {
        let factory = chat_kernel_factory();
        let kernel = factory(KernelOptions {
            endpoint: Some("http://127.0.0.1:1/chat".to_string()),
            iopub: None,
        })
        .await
        .unwrap();

        assert_eq!(kernel.execution_count(), 0);
        let info = kernel.kernel_info();
        assert_eq!(info.implementation, "promptcell");
        assert_eq!(info.language_info.name, "markdown");
    }
}
