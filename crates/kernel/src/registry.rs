use promptcell_core::{Error, KernelSpec, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{Kernel, KernelFactory, KernelOptions};

struct RegisteredKernel {
    spec: KernelSpec,
    factory: KernelFactory,
}

/// 宿主侧的内核注册表。插件把 {spec, factory} 放进来，宿主按 name
/// 查询描述符并实例化内核。
#[derive(Default)]
pub struct KernelSpecRegistry {
    kernels: RwLock<HashMap<String, RegisteredKernel>>,
}

impl KernelSpecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个内核描述符及其工厂。同名重复注册直接覆盖。
    pub async fn register(&self, spec: KernelSpec, factory: KernelFactory) {
        let name = spec.name.clone();
        let mut kernels = self.kernels.write().await;
        if kernels.contains_key(&name) {
            debug!(kernel = %name, "re-registering kernel spec, previous entry replaced");
        }
        info!(kernel = %name, display_name = %spec.display_name, "kernel spec registered");
        kernels.insert(name, RegisteredKernel { spec, factory });
    }

    pub async fn get(&self, name: &str) -> Option<KernelSpec> {
        self.kernels.read().await.get(name).map(|k| k.spec.clone())
    }

    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.kernels.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn len(&self) -> usize {
        self.kernels.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.kernels.read().await.is_empty()
    }

    /// 按 name 实例化内核。工厂调用在锁外进行。
    pub async fn create(&self, name: &str, options: KernelOptions) -> Result<Box<dyn Kernel>> {
        let factory = {
            let kernels = self.kernels.read().await;
            let entry = kernels
                .get(name)
                .ok_or_else(|| Error::NotFound(format!("kernel spec '{}' not registered", name)))?;
            entry.factory.clone()
        };
        factory(options).await
    }
}
