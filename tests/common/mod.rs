#![allow(dead_code)]

use async_trait::async_trait;
use saferpay_client::config::SaferpayConfig;
use saferpay_client::logging::{LogContext, LogLevel, LogSink};
use saferpay_client::payments::{HttpRequest, HttpResponse, HttpTransport, SaferpayResult};
use saferpay_client::SaferpayClient;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const TEST_BASE_URL: &str = "https://test.saferpay.example/hosting";

/// Answers requests from a script and remembers what it was sent.
#[derive(Default)]
pub struct StubTransport {
    script: Mutex<VecDeque<HttpResponse>>,
    fallback: Option<HttpResponse>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn scripted(responses: Vec<HttpResponse>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(responses.into()),
            ..Self::default()
        })
    }

    pub fn always(status_code: u16, content: &str) -> Arc<Self> {
        Arc::new(Self {
            fallback: Some(HttpResponse::new(status_code, content)),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn send(&self, request: HttpRequest) -> SaferpayResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        let next = self.script.lock().unwrap().pop_front();
        Ok(next
            .or_else(|| self.fallback.clone())
            .expect("stub transport ran out of responses"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub context: Vec<(String, String)>,
}

#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn levels(&self) -> Vec<LogLevel> {
        self.entries().into_iter().map(|e| e.level).collect()
    }

    pub fn criticals(&self) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == LogLevel::Critical)
            .collect()
    }
}

impl LogSink for RecordingSink {
    fn log(&self, level: LogLevel, message: &str, context: &LogContext) {
        self.entries.lock().unwrap().push(LogEntry {
            level,
            message: message.to_string(),
            context: context
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
    }
}

pub fn client_with(transport: Arc<StubTransport>, sink: Arc<RecordingSink>) -> SaferpayClient {
    SaferpayClient::new(SaferpayConfig::default().with_base_url(TEST_BASE_URL))
        .with_transport(transport)
        .with_sink(sink)
}
