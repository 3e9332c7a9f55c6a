/// Rendered overlay returned by `analyze_pose_overlay`: the encoded image
/// exactly as the server sent it, plus the content type it declared.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OverlayResult {
    image: Vec<u8>,
    content_type: String,
}

impl OverlayResult {
    pub fn new(image: Vec<u8>, content_type: &str) -> Self {
        Self {
            image,
            content_type: content_type.to_string(),
        }
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn into_image(self) -> Vec<u8> {
        self.image
    }
}

// Keeps multi-megabyte image bytes out of log output.
impl std::fmt::Debug for OverlayResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayResult")
            .field("content_type", &self.content_type)
            .field("bytes", &self.image.len())
            .finish()
    }
}
