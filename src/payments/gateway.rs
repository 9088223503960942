use crate::config::SaferpayConfig;
use crate::logging::{LogSink, NullSink};
use crate::payments::error::{SaferpayError, SaferpayResult};
use crate::payments::transport::{HttpRequest, HttpTransport};
use std::sync::Arc;

/// Marker the hosting interface puts in a 200 body when it refused the request.
pub const PROVIDER_ERROR_MARKER: &str = "ERROR";

/// Posts form bodies to the hosting interface and accepts only clean answers.
///
/// Every call is traced to the sink at debug level (url, request body, response
/// body) before the response is judged. A rejected response is reported once
/// at critical level and then returned as an error. Nothing is retried.
#[derive(Clone)]
pub struct Gateway {
    config: SaferpayConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    sink: Arc<dyn LogSink>,
}

impl Gateway {
    pub fn new(config: SaferpayConfig) -> Self {
        Self {
            config,
            transport: None,
            sink: Arc::new(NullSink),
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &SaferpayConfig {
        &self.config
    }

    pub fn sink(&self) -> &dyn LogSink {
        self.sink.as_ref()
    }

    pub fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    pub async fn send(&self, path: &str, form_body: String) -> SaferpayResult<String> {
        let transport = self
            .transport
            .as_ref()
            .ok_or(SaferpayError::TransportNotConfigured)?;

        let url = self.config.endpoint(path);
        self.sink.debug(&url);
        self.sink.debug(&form_body);

        let response = match transport.send(HttpRequest::form_post(&url, form_body)).await {
            Ok(response) => response,
            Err(err) => {
                self.sink.critical(
                    "Saferpay: request failed without response!",
                    vec![("url", url), ("error", err.to_string())],
                );
                return Err(err);
            }
        };

        self.sink.debug(&response.content);

        if response.status_code != 200 {
            self.sink.critical(
                &format!(
                    "Saferpay: request failed with statuscode: {}!",
                    response.status_code
                ),
                vec![("statuscode", response.status_code.to_string())],
            );
            return Err(SaferpayError::Transport {
                status_code: response.status_code,
            });
        }

        if response.content.contains(PROVIDER_ERROR_MARKER) {
            self.sink.critical(
                &format!("Saferpay: request failed: {}!", response.content),
                vec![("content", response.content.clone())],
            );
            return Err(SaferpayError::Provider {
                body: response.content,
            });
        }

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::transport::HttpResponse;
    use async_trait::async_trait;

    struct FixedTransport(u16, &'static str);

    #[async_trait]
    impl HttpTransport for FixedTransport {
        async fn send(&self, _request: HttpRequest) -> SaferpayResult<HttpResponse> {
            Ok(HttpResponse::new(self.0, self.1))
        }
    }

    fn gateway(status: u16, body: &'static str) -> Gateway {
        Gateway::new(SaferpayConfig::default()).with_transport(Arc::new(FixedTransport(status, body)))
    }

    #[tokio::test]
    async fn unbound_gateway_fails_before_sending() {
        let gateway = Gateway::new(SaferpayConfig::default());
        assert!(!gateway.has_transport());
        let result = gateway.send("/CreatePayInit.asp", "A=1".to_string()).await;
        assert_eq!(result, Err(SaferpayError::TransportNotConfigured));
    }

    #[tokio::test]
    async fn ok_response_is_returned() {
        let content = gateway(200, "https://www.saferpay.com/vt2/Pay.aspx?DATA=x")
            .send("/CreatePayInit.asp", String::new())
            .await
            .expect("200 without error marker should pass");
        assert!(content.starts_with("https://"));
    }

    #[tokio::test]
    async fn only_status_200_is_accepted() {
        for status in [201, 204, 302, 404, 500] {
            let result = gateway(status, "OK").send("/x", String::new()).await;
            assert_eq!(result, Err(SaferpayError::Transport { status_code: status }));
        }
    }

    #[tokio::test]
    async fn error_marker_anywhere_in_body_is_rejected() {
        let result = gateway(200, "OK:<IDP RESULT=\"ERROR\"/>")
            .send("/x", String::new())
            .await;
        assert!(matches!(result, Err(SaferpayError::Provider { .. })));

        // lowercase is not the provider marker
        assert!(gateway(200, "error").send("/x", String::new()).await.is_ok());
    }
}
