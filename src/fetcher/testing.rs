use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use super::transport::{FetchRequest, FetchResponse, Transport};

/// In-memory transport answering by URL prefix
#[derive(Default)]
pub struct ScriptedTransport {
    pages: Vec<(String, std::result::Result<String, String>)>,
    login: Option<std::result::Result<Vec<String>, String>>,
    pub requests: Mutex<Vec<FetchRequest>>,
    pub logins: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url_prefix: &str, body: impl Into<String>) -> Self {
        self.pages.push((url_prefix.to_string(), Ok(body.into())));
        self
    }

    pub fn failing(mut self, url_prefix: &str, error: &str) -> Self {
        self.pages.push((url_prefix.to_string(), Err(error.to_string())));
        self
    }

    pub fn login_cookies(mut self, cookies: &[&str]) -> Self {
        self.login = Some(Ok(cookies.iter().map(|c| c.to_string()).collect()));
        self
    }

    pub fn login_rejected(mut self, error: &str) -> Self {
        self.login = Some(Err(error.to_string()));
        self
    }

    pub fn recorded_requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn login_count(&self) -> usize {
        self.logins.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, request: FetchRequest) -> Result<FetchResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let (_, outcome) = self
            .pages
            .iter()
            .find(|(prefix, _)| request.url.starts_with(prefix.as_str()))
            .ok_or_else(|| anyhow!("HTTP error: 404 Not Found"))?;

        match outcome {
            Ok(body) => Ok(FetchResponse {
                status: 200,
                body: body.clone(),
                cookies: Vec::new(),
            }),
            Err(error) => Err(anyhow!("Network error: {}", error)),
        }
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<FetchResponse> {
        self.logins.lock().unwrap().push((url.to_string(), body.clone()));

        match &self.login {
            Some(Ok(cookies)) => Ok(FetchResponse {
                status: 200,
                body: String::new(),
                cookies: cookies.clone(),
            }),
            Some(Err(error)) => Err(anyhow!("HTTP error: {}", error)),
            None => Err(anyhow!("HTTP error: 404 Not Found")),
        }
    }
}
