//! 共享依赖注册表与解析器。
//!
//! 宿主在初始化时提供 name → version → factory 的两级映射，解析器取
//! 名下第一个版本的工厂，至多解开两层间接后得到模块对象。

use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use promptcell_core::{Error, Result};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// A resolved shared module. Consumers downcast to the service type they need.
pub type SharedModule = Arc<dyn Any + Send + Sync>;

/// Innermost indirection level: one synchronous call producing the module.
pub type ModuleInit = Box<dyn FnOnce() -> SharedModule + Send>;

/// What a shared factory hands back. Bounded at two levels by construction:
/// a `Pending` settles into a [`ResolvedThunk`], which cannot defer again.
pub enum ModuleThunk {
    Ready(SharedModule),
    Init(ModuleInit),
    Pending(BoxFuture<'static, Result<ResolvedThunk>>),
}

/// What a `Pending` thunk settles to.
pub enum ResolvedThunk {
    Ready(SharedModule),
    Init(ModuleInit),
}

/// 版本槽位上挂的工厂。同一个已安装 scope 内至多执行一次（解析器记忆化）。
pub type SharedFactory = Arc<dyn Fn() -> ModuleThunk + Send + Sync>;

/// One version slot. `factory` 为 None 表示槽位存在但没挂装载器。
#[derive(Clone, Default)]
pub struct SharedEntry {
    factory: Option<SharedFactory>,
}

impl SharedEntry {
    pub fn new(factory: SharedFactory) -> Self {
        Self {
            factory: Some(factory),
        }
    }

    /// Entry whose factory hands the module over directly.
    pub fn ready(module: SharedModule) -> Self {
        Self::new(Arc::new(move || ModuleThunk::Ready(module.clone())))
    }

    /// Entry with one extra invocation level.
    pub fn init<F>(init: F) -> Self
    where
        F: Fn() -> SharedModule + Send + Sync + 'static,
    {
        let init = Arc::new(init);
        Self::new(Arc::new(move || {
            let init = init.clone();
            ModuleThunk::Init(Box::new(move || init()))
        }))
    }

    /// Entry whose factory defers; `make` builds a fresh future per call.
    pub fn pending<F>(make: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<ResolvedThunk>> + Send + Sync + 'static,
    {
        Self::new(Arc::new(move || ModuleThunk::Pending(make())))
    }

    /// Slot with no loader attached.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn factory(&self) -> Option<&SharedFactory> {
        self.factory.as_ref()
    }
}

/// name → version → entry。BTreeMap 让版本枚举顺序确定（字典序）。
#[derive(Clone, Default)]
pub struct SharedScope {
    entries: BTreeMap<String, BTreeMap<String, SharedEntry>>,
}

impl SharedScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, version: &str, entry: SharedEntry) {
        self.entries
            .entry(name.to_string())
            .or_default()
            .insert(version.to_string(), entry);
    }

    /// Register a name with no version entries at all.
    pub fn declare(&mut self, name: &str) {
        self.entries.entry(name.to_string()).or_default();
    }

    pub fn versions(&self, name: &str) -> Option<&BTreeMap<String, SharedEntry>> {
        self.entries.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 进程级挂载点，对应宿主把共享注册表挂到全局对象上的旧约定。容器没
/// init 过时解析器从这里兜底。
#[derive(Default)]
pub struct AmbientRegistry {
    scope: Mutex<Option<Arc<SharedScope>>>,
}

impl AmbientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn install(&self, scope: Arc<SharedScope>) {
        info!("ambient shared registry installed");
        *self.scope.lock().await = Some(scope);
    }

    pub async fn installed(&self) -> Option<Arc<SharedScope>> {
        self.scope.lock().await.clone()
    }

    pub async fn clear(&self) {
        *self.scope.lock().await = None;
    }
}

static GLOBAL_AMBIENT: Lazy<Arc<AmbientRegistry>> =
    Lazy::new(|| Arc::new(AmbientRegistry::new()));

/// The process-wide mount point. Production wiring only; tests build their
/// own [`AmbientRegistry`] so they stay independent of process state.
pub fn global_ambient() -> Arc<AmbientRegistry> {
    GLOBAL_AMBIENT.clone()
}

/// 解析器：当前 scope + 按名的模块缓存。
///
/// 版本选择取字典序最小的版本键。缓存锁覆盖工厂的整个执行，保证同一
/// scope 内同名工厂至多跑一次；代价是工厂内不得再进同一个解析器。
pub struct SharedScopeResolver {
    scope: Mutex<Option<Arc<SharedScope>>>,
    cache: Mutex<HashMap<String, SharedModule>>,
    ambient: Arc<AmbientRegistry>,
}

impl SharedScopeResolver {
    pub fn new() -> Self {
        Self::with_ambient(global_ambient())
    }

    pub fn with_ambient(ambient: Arc<AmbientRegistry>) -> Self {
        Self {
            scope: Mutex::new(None),
            cache: Mutex::new(HashMap::new()),
            ambient,
        }
    }

    /// 安装新 scope。后写覆盖前写，同时清空缓存。
    pub async fn install(&self, scope: Arc<SharedScope>) {
        debug!(dependencies = scope.len(), "shared scope installed");
        *self.scope.lock().await = Some(scope);
        self.cache.lock().await.clear();
    }

    pub async fn is_initialized(&self) -> bool {
        self.scope.lock().await.is_some()
    }

    /// Installed scope, else the ambient fallback.
    pub async fn current_scope(&self) -> Option<Arc<SharedScope>> {
        if let Some(scope) = self.scope.lock().await.clone() {
            return Some(scope);
        }
        let ambient = self.ambient.installed().await?;
        warn!("shared scope never initialized, using ambient registry");
        Some(ambient)
    }

    pub async fn resolve(&self, name: &str) -> Result<SharedModule> {
        let scope = self
            .current_scope()
            .await
            .ok_or(Error::ScopeNotInitialized)?;

        let mut cache = self.cache.lock().await;
        if let Some(module) = cache.get(name) {
            debug!(dependency = %name, "shared dependency served from cache");
            return Ok(module.clone());
        }

        let factory = {
            let versions = scope
                .versions(name)
                .ok_or_else(|| Error::DependencyNotFound(name.to_string()))?;
            let (version, entry) = versions
                .iter()
                .next()
                .ok_or_else(|| Error::NoVersionsAvailable(name.to_string()))?;
            debug!(dependency = %name, version = %version, "resolving shared dependency");
            entry
                .factory()
                .ok_or_else(|| Error::NotAFactory(name.to_string()))?
                .clone()
        };

        let module = unwrap_factory(factory()).await?;
        cache.insert(name.to_string(), module.clone());
        Ok(module)
    }

    /// Resolve and downcast in one step.
    pub async fn resolve_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        let module = self.resolve(name).await?;
        module
            .downcast::<T>()
            .map_err(|_| Error::ModuleTypeMismatch(name.to_string()))
    }
}

impl Default for SharedScopeResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// 至多两层解包：工厂结果挂起则 await，落定后仍是初始化器就再调一次。
async fn unwrap_factory(thunk: ModuleThunk) -> Result<SharedModule> {
    match thunk {
        ModuleThunk::Ready(module) => Ok(module),
        ModuleThunk::Init(init) => Ok(init()),
        ModuleThunk::Pending(fut) => match fut.await? {
            ResolvedThunk::Ready(module) => Ok(module),
            ResolvedThunk::Init(init) => Ok(init()),
        },
    }
}
