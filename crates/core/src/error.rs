use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response from the chat endpoint. `body` falls back to the
    /// status line when the response carried no text.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// 2xx response whose body reported a backend-side failure.
    #[error("LLM error: {} – {}", .error, .detail.as_deref().unwrap_or_default())]
    Remote { error: String, detail: Option<String> },

    #[error("Shared scope not initialized")]
    ScopeNotInitialized,

    #[error("Shared dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("No versions available for shared dependency: {0}")]
    NoVersionsAvailable(String),

    #[error("Shared dependency has no factory: {0}")]
    NotAFactory(String),

    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// A shared module resolved, but not to the type the caller asked for.
    #[error("Module type mismatch: {0}")]
    ModuleTypeMismatch(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let e = Error::Http {
            status: 500,
            body: "internal".to_string(),
        };
        assert_eq!(e.to_string(), "HTTP 500: internal");
    }

    #[test]
    fn test_remote_error_display_with_detail() {
        let e = Error::Remote {
            error: "rate_limited".to_string(),
            detail: Some("try later".to_string()),
        };
        let s = e.to_string();
        assert!(s.contains("rate_limited"));
        assert!(s.contains("try later"));
    }

    #[test]
    fn test_remote_error_display_without_detail() {
        let e = Error::Remote {
            error: "llm_error".to_string(),
            detail: None,
        };
        assert_eq!(e.to_string(), "LLM error: llm_error – ");
    }
}
