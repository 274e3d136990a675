pub mod config;
pub mod error;
pub mod kernelspec;
pub mod message;
pub mod paths;
pub mod protocol;

pub use config::Config;
pub use error::{Error, Result};
pub use kernelspec::KernelSpec;
pub use message::{IopubContent, IopubMessage, MessageHeader};
pub use paths::Paths;
pub use protocol::{ExecuteReply, ExecuteRequest, MimeBundle};
