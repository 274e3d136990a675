use promptcell_core::protocol::MimeBundle;
use promptcell_core::Result;
use promptcell_transport::ChatTransport;

/// Minimal harness for embedders that do not speak the full protocol:
/// one call in, one rendered bundle out. No counter, no published messages.
pub struct DisplayShim {
    transport: Box<dyn ChatTransport>,
}

impl DisplayShim {
    pub fn new(transport: Box<dyn ChatTransport>) -> Self {
        Self { transport }
    }

    pub async fn execute(&self, code: &str) -> Result<MimeBundle> {
        let reply = self.transport.send(code).await?;
        Ok(MimeBundle::text_plain(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use promptcell_core::Error;

    struct UpperTransport;

    #[async_trait]
    impl ChatTransport for UpperTransport {
        fn name(&self) -> &str {
            "upper"
        }

        fn describe(&self) -> String {
            "upper".to_string()
        }

        async fn send(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_uppercase())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl ChatTransport for FailingTransport {
        fn name(&self) -> &str {
            "failing"
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }

        async fn send(&self, _prompt: &str) -> Result<String> {
            Err(Error::Transport("down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_execute_renders_text_plain() {
        let shim = DisplayShim::new(Box::new(UpperTransport));
        let bundle = shim.execute("hello").await.unwrap();
        assert_eq!(
            bundle.get("text/plain"),
            Some(&serde_json::Value::String("HELLO".to_string()))
        );
    }

    #[tokio::test]
    async fn test_execute_propagates_transport_error() {
        let shim = DisplayShim::new(Box::new(FailingTransport));
        let err = shim.execute("hello").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
