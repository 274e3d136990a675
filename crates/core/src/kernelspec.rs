use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::protocol::{KernelInfoReply, LanguageInfo, ReplyStatus, PROTOCOL_VERSION};

pub const IMPLEMENTATION: &str = "promptcell";
pub const KERNEL_BANNER: &str = "HTTP-backed chat kernel (promptcell)";
pub const DEFAULT_SPEC_NAME: &str = "http-chat";
pub const DEFAULT_DISPLAY_NAME: &str = "HTTP Chat (promptcell)";

/// 内核描述符。注册到宿主后不再变化；宿主按 name 实例化内核。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KernelSpec {
    pub name: String,
    pub display_name: String,
    pub language: String,
    #[serde(default)]
    pub argv: Vec<String>,
    #[serde(default)]
    pub resources: HashMap<String, String>,
}

impl KernelSpec {
    pub fn http_chat() -> Self {
        Self::named(DEFAULT_SPEC_NAME, DEFAULT_DISPLAY_NAME)
    }

    pub fn named(name: &str, display_name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            language: "markdown".to_string(),
            argv: Vec::new(),
            resources: HashMap::new(),
        }
    }
}

/// The fixed kernel_info_reply for this implementation.
pub fn kernel_info() -> KernelInfoReply {
    KernelInfoReply {
        status: ReplyStatus::Ok,
        protocol_version: PROTOCOL_VERSION.to_string(),
        implementation: IMPLEMENTATION.to_string(),
        implementation_version: env!("CARGO_PKG_VERSION").to_string(),
        language_info: LanguageInfo::markdown(),
        banner: KERNEL_BANNER.to_string(),
        help_links: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_chat_spec() {
        let spec = KernelSpec::http_chat();
        assert_eq!(spec.name, "http-chat");
        assert_eq!(spec.language, "markdown");
        assert!(spec.argv.is_empty());
        assert!(spec.resources.is_empty());
    }

    #[test]
    fn test_kernel_info_fixed_fields() {
        let info = kernel_info();
        assert_eq!(info.status, ReplyStatus::Ok);
        assert_eq!(info.protocol_version, "5.3");
        assert_eq!(info.implementation, "promptcell");
        assert_eq!(info.language_info.name, "markdown");
        assert_eq!(info.language_info.mimetype, "text/markdown");
        assert_eq!(info.language_info.file_extension, ".md");
        assert!(info.help_links.is_empty());
    }
}
