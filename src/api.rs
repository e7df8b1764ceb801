// API client module: a small blocking HTTP client for the Kamos analysis
// endpoint. One POST per analysis; the response is kept as opaque JSON apart
// from the `error` field the service uses to report failures.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::StoredResult;

/// Blocking client holding the endpoint URL and bearer token.
#[derive(Clone)]
pub struct KamosClient {
    client: Client,
    api_url: String,
    token: String,
}

/// Flags that shape what context the service gathers for a prompt.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub use_google_search: bool,
    pub include_past_articles: bool,
    pub include_saved_analyses: bool,
    pub include_specs: bool,
    pub image: Option<PathBuf>,
}

/// Request envelope: the service expects everything under `data`.
#[derive(Serialize, Debug)]
pub struct AnalysisRequest {
    pub data: RequestData,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RequestData {
    pub prompt: String,
    pub use_google_search: bool,
    pub include_past_articles: bool,
    pub include_saved_analyses: bool,
    pub include_kamos_specs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_content: Option<ImageContent>,
}

/// Inline image attachment.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    pub mime_type: String,
    pub data: String,
}

impl AnalysisRequest {
    /// Build the request body, reading and encoding the image if one is set.
    /// An unreadable image fails here, before anything is sent.
    pub fn build(prompt: &str, options: &AnalysisOptions) -> AnalysisResult<Self> {
        let image_content = options.image.as_deref().map(encode_image).transpose()?;
        Ok(Self {
            data: RequestData {
                prompt: prompt.to_string(),
                use_google_search: options.use_google_search,
                include_past_articles: options.include_past_articles,
                include_saved_analyses: options.include_saved_analyses,
                include_kamos_specs: options.include_specs,
                image_content,
            },
        })
    }
}

impl KamosClient {
    /// Create a client from the resolved configuration. Fails with
    /// `MissingToken` when no token was found.
    pub fn from_config(config: &Config) -> AnalysisResult<Self> {
        let token = config
            .api_token
            .clone()
            .ok_or(AnalysisError::MissingToken)?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            token,
        })
    }

    /// POST the request and return the service payload. Non-2xx statuses and
    /// responses carrying an `error` field are errors.
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult<StoredResult> {
        debug!(
            url = %self.api_url,
            image = request.data.image_content.is_some(),
            "Sending analysis request"
        );

        let res = self
            .client
            .post(&self.api_url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .json(request)
            .send()?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_else(|_| "".into());
            return Err(AnalysisError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = res.json().map_err(|e| AnalysisError::InvalidResponse {
            message: e.to_string(),
        })?;

        if let Some(error) = body.get("error") {
            let message = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(AnalysisError::Service { message });
        }

        serde_json::from_value(body).map_err(|e| AnalysisError::InvalidResponse {
            message: e.to_string(),
        })
    }
}

/// Read an image and encode it as MIME type plus base64 payload.
pub fn encode_image(path: &Path) -> AnalysisResult<ImageContent> {
    let bytes = std::fs::read(path).map_err(|e| AnalysisError::Image {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mime_type = guess_image_mime(path).ok_or_else(|| AnalysisError::Image {
        path: path.to_path_buf(),
        message: "unrecognized image type".to_string(),
    })?;
    Ok(ImageContent {
        mime_type: mime_type.to_string(),
        data: STANDARD.encode(bytes),
    })
}

fn guess_image_mime(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())?;
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "heic" | "heif" => Some("image/heic"),
        _ => None,
    }
}
