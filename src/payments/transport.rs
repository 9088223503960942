use crate::payments::error::SaferpayResult;
use async_trait::async_trait;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn form_post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            body: body.into(),
            headers: vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())],
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub content: String,
}

impl HttpResponse {
    pub fn new(status_code: u16, content: impl Into<String>) -> Self {
        Self {
            status_code,
            content: content.into(),
        }
    }
}

/// Moves one request over the wire. Status and body are returned as-is; judging
/// them is the gateway's job.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> SaferpayResult<HttpResponse>;
}

#[cfg(feature = "reqwest-transport")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest-transport")]
mod reqwest_transport {
    use super::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
    use crate::config::SaferpayConfig;
    use crate::payments::error::{SaferpayError, SaferpayResult};
    use async_trait::async_trait;
    use reqwest::Client;

    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        pub fn new(config: &SaferpayConfig) -> SaferpayResult<Self> {
            let client = Client::builder()
                .timeout(config.timeout())
                .user_agent(config.user_agent.clone())
                .build()
                .map_err(|e| {
                    SaferpayError::config(format!("failed to initialize HTTP client: {}", e))
                })?;

            Ok(Self { client })
        }

        pub fn with_client(client: Client) -> Self {
            Self { client }
        }
    }

    #[async_trait]
    impl HttpTransport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> SaferpayResult<HttpResponse> {
            let method = match request.method {
                HttpMethod::Post => reqwest::Method::POST,
            };

            let mut builder = self.client.request(method, &request.url);
            for (k, v) in &request.headers {
                builder = builder.header(k.as_str(), v.as_str());
            }

            let response = builder
                .body(request.body)
                .send()
                .await
                .map_err(|e| SaferpayError::network(format!("provider request failed: {}", e)))?;

            let status_code = response.status().as_u16();
            let content = response.text().await.map_err(|e| {
                SaferpayError::network(format!("failed to read provider response: {}", e))
            })?;

            Ok(HttpResponse {
                status_code,
                content,
            })
        }
    }
}
