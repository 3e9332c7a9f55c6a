pub const BASE_URL_ENV: &str = "POSE_SERVER_BASE_URL";
pub const REQUEST_TIMEOUT_ENV: &str = "POSE_REQUEST_TIMEOUT_MS";
pub const LOG_BODIES_ENV: &str = "POSE_LOG_BODIES";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 15_000;

pub const IMAGE_PART_NAME: &str = "image";
pub const IMAGE_MIME: &str = "image/*";

pub const BODY_PREVIEW_CHARS: usize = 200;
