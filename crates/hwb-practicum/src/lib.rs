//! Yandex Practicum homework API adapter.
//!
//! One GET per call against `homework_statuses` with an OAuth header and a
//! `from_date` query. No retries here; the poll loop owns the cadence.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use hwb_core::{
    config::Config,
    errors::{Error, FetchError},
    ports::HomeworkSource,
    Result,
};

#[derive(Clone, Debug)]
pub struct PracticumClient {
    endpoint: String,
    token: String,
    http: reqwest::Client,
}

impl PracticumClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_http(endpoint, token, reqwest::Client::new())
    }

    pub fn with_http(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            http,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = cfg.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {e}")))?;
        Ok(Self::with_http(
            cfg.endpoint.clone(),
            cfg.practicum_token.clone(),
            http,
        ))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn auth_header(&self) -> String {
        format!("OAuth {}", self.token)
    }

    fn fetch_error(&self, status: Option<StatusCode>, reason: impl Into<String>) -> Error {
        Error::Fetch(FetchError {
            endpoint: self.endpoint.clone(),
            headers: vec![("Authorization".to_string(), "OAuth ***".to_string())],
            status: status.map(|s| s.as_u16()),
            reason: reason.into(),
        })
    }

    pub async fn get_api_answer(&self, from_date: i64) -> Result<Value> {
        let resp = self
            .http
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| self.fetch_error(e.status(), format!("request error: {e}")))?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            let reason = status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string();
            let detail = body.chars().take(200).collect::<String>();
            tracing::warn!(status = status.as_u16(), body = %detail, "homework API error");
            return Err(self.fetch_error(Some(status), reason));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| self.fetch_error(Some(status), format!("json error: {e}")))
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value> {
        self.get_api_answer(from_date).await
    }
}
