use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::de::DeserializeOwned;

use pose_coach_types::{FullResult, OverlayResult, SimpleResult};

use crate::client::{PoseClient, RawResponse};
use crate::error::AnalysisError;

/// Mode tags the stock UI offers. Any other non-empty tag is forwarded
/// verbatim; whether the server knows it is the server's call.
pub const MODE_SQUAT: &str = "squat";
pub const MODE_PUSHUP: &str = "pushup";

const ANALYZE_PATH: &str = "analyze_pose";
const OVERLAY_PATH: &str = "analyze_pose_overlay";

const FORMAT_PARAM: &str = "format";
const MODE_PARAM: &str = "mode";

const FALLBACK_FILE_NAME: &str = "image.jpg";

/// One user-triggered analysis: which file to upload and which server-side
/// mode to request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    image_path: PathBuf,
    mode: Option<String>,
}

impl AnalysisRequest {
    pub fn new(image_path: impl Into<PathBuf>, mode: Option<String>) -> Self {
        Self {
            image_path: image_path.into(),
            mode,
        }
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }
}

/// The three analysis shapes and their routes. Simple and Full share a path
/// and differ in the `format` query value; Overlay has its own path and no
/// `format` at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Simple,
    Full,
    Overlay,
}

impl Variant {
    fn path(self) -> &'static str {
        match self {
            Variant::Simple | Variant::Full => ANALYZE_PATH,
            Variant::Overlay => OVERLAY_PATH,
        }
    }

    fn format(self) -> Option<&'static str> {
        match self {
            Variant::Simple => Some("simple"),
            Variant::Full => Some("full"),
            Variant::Overlay => None,
        }
    }
}

/// Typed access to the pose server. The session depends on this trait
/// rather than the concrete gateway, so tests can drive it with a mock
/// instead of a live server.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait PoseApi {
    async fn analyze_simple(&self, request: AnalysisRequest)
        -> Result<SimpleResult, AnalysisError>;

    async fn analyze_full(&self, request: AnalysisRequest) -> Result<FullResult, AnalysisError>;

    async fn analyze_overlay(
        &self,
        request: AnalysisRequest,
    ) -> Result<OverlayResult, AnalysisError>;
}

/// Translates transport outcomes into typed results. Pure: the same status
/// and body always map to the same value, and nothing is retried here.
pub struct PoseGateway {
    client: PoseClient,
}

impl PoseGateway {
    pub fn new(client: PoseClient) -> Self {
        Self { client }
    }

    async fn dispatch(
        &self,
        request: &AnalysisRequest,
        variant: Variant,
    ) -> Result<RawResponse, AnalysisError> {
        let image = tokio::fs::read(request.image_path()).await?;
        if image.is_empty() {
            // The transport contract requires non-empty image bytes.
            return Err(AnalysisError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("empty image file: {}", request.image_path().display()),
            )));
        }
        let file_name = request
            .image_path()
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(FALLBACK_FILE_NAME);

        let query = [
            (FORMAT_PARAM, variant.format()),
            (MODE_PARAM, request.mode()),
        ];
        let raw = self
            .client
            .send(variant.path(), image, file_name, &query)
            .await?;

        if !raw.is_success() {
            return Err(AnalysisError::ServerRejected {
                status: raw.status(),
                body: raw.body_text().unwrap_or_else(|| "unknown".to_string()),
            });
        }
        Ok(raw)
    }
}

fn decode_json<T: DeserializeOwned>(raw: &RawResponse) -> Result<T, AnalysisError> {
    serde_json::from_slice(raw.body()).map_err(|err| {
        tracing::warn!("undecodable 2xx body: {}", err);
        AnalysisError::MalformedResponse {
            preview: raw.body_preview(),
        }
    })
}

fn decode_overlay(raw: RawResponse) -> Result<OverlayResult, AnalysisError> {
    let content_type = raw.content_type().unwrap_or_default().to_string();
    if raw.body().is_empty() || !content_type.starts_with("image/") {
        return Err(AnalysisError::MalformedResponse {
            preview: raw.body_preview(),
        });
    }
    Ok(OverlayResult::new(raw.into_body(), &content_type))
}

#[async_trait]
impl PoseApi for PoseGateway {
    async fn analyze_simple(
        &self,
        request: AnalysisRequest,
    ) -> Result<SimpleResult, AnalysisError> {
        let raw = self.dispatch(&request, Variant::Simple).await?;
        decode_json(&raw)
    }

    async fn analyze_full(&self, request: AnalysisRequest) -> Result<FullResult, AnalysisError> {
        let raw = self.dispatch(&request, Variant::Full).await?;
        decode_json(&raw)
    }

    async fn analyze_overlay(
        &self,
        request: AnalysisRequest,
    ) -> Result<OverlayResult, AnalysisError> {
        let raw = self.dispatch(&request, Variant::Overlay).await?;
        decode_overlay(raw)
    }
}
