pub mod agent;
pub mod factory;
pub mod http;

use async_trait::async_trait;
use promptcell_core::Result;

/// One prompt in, one reply out. Implementations keep no conversation
/// state; every exchange is independent.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Transport kind, for logs and diagnostics.
    fn name(&self) -> &str;

    /// Human-readable target (endpoint URL or agent command).
    fn describe(&self) -> String;

    /// Send one prompt and await exactly one reply. No retries here;
    /// timeouts and cancellation are the caller's policy.
    async fn send(&self, prompt: &str) -> Result<String>;
}

impl std::fmt::Debug for dyn ChatTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatTransport").finish_non_exhaustive()
    }
}

pub use agent::AgentProcessTransport;
pub use factory::create_transport;
pub use http::{HttpChatTransport, DEFAULT_ENDPOINT};
