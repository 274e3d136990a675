//! 模块联邦式的运行时发现：宿主不静态链接内核，而是通过共享依赖协商
//! 在运行时拿到插件模块。
//!
//! 流程：`FederationContainer::init(scope)` → `get("./index")` →
//! [`PluginLoader::load`] → 宿主调用 [`PluginDescriptor::activate`] →
//! 注册设施里出现 {spec, factory} → 宿主按 name 实例化内核。

pub mod container;
pub mod plugin;
pub mod scope;

pub use container::{FederationContainer, PluginLoader, MODULE_EXTENSION, MODULE_INDEX};
pub use plugin::{
    chat_kernel_factory, http_chat_plugin, HostContext, ModuleExports, PluginDescriptor,
    KERNEL_SPECS, PLUGIN_ID,
};
pub use scope::{
    global_ambient, AmbientRegistry, ModuleInit, ModuleThunk, ResolvedThunk, SharedEntry,
    SharedFactory, SharedModule, SharedScope, SharedScopeResolver,
};
