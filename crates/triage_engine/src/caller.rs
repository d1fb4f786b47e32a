use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use triage_logging::triage_debug;
use url::Url;

use crate::decode::decode_body;
use crate::{CallError, FailureKind, HttpMethod, RemoteRequest, RemoteResponse, RequestBody};

#[derive(Debug, Clone)]
pub struct CallerSettings {
    /// Base for relative request URLs such as `/analyses/is_safe_url`.
    pub base_url: Option<Url>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for CallerSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Performs one HTTP request for the page. The await on [`RemoteCaller::call`]
/// is the only point where a workflow yields.
///
/// Any non-2xx status is reported as an error, like a transport failure.
#[async_trait::async_trait]
pub trait RemoteCaller: Send + Sync {
    async fn call(&self, request: RemoteRequest) -> Result<RemoteResponse, CallError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestCaller {
    settings: CallerSettings,
    client: reqwest::Client,
}

impl ReqwestCaller {
    pub fn new(settings: CallerSettings) -> Result<Self, CallError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| CallError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn resolve(&self, url: &str) -> Result<Url, CallError> {
        match Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self.settings.base_url.as_ref().ok_or_else(|| {
                    CallError::new(FailureKind::InvalidUrl, format!("relative url without base: {url}"))
                })?;
                base.join(url)
                    .map_err(|err| CallError::new(FailureKind::InvalidUrl, err.to_string()))
            }
            Err(err) => Err(CallError::new(FailureKind::InvalidUrl, err.to_string())),
        }
    }

    fn build(&self, request: &RemoteRequest, url: Url) -> reqwest::RequestBuilder {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Delete => self.client.delete(url),
        };
        match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(encoded) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(encoded.clone()),
            RequestBody::Form(fields) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(fields.iter())
                    .finish();
                builder
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(encoded)
            }
        }
    }
}

#[async_trait::async_trait]
impl RemoteCaller for ReqwestCaller {
    async fn call(&self, request: RemoteRequest) -> Result<RemoteResponse, CallError> {
        let url = self.resolve(&request.url)?;
        triage_debug!("{} {}", request.method, url);

        let response = self
            .build(&request, url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(CallError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(CallError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let body = decode_body(&bytes, content_type.as_deref());

        Ok(RemoteResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> CallError {
    if err.is_timeout() {
        return CallError::new(FailureKind::Timeout, err.to_string());
    }
    CallError::new(FailureKind::Network, err.to_string())
}
