mod client;
mod error;
mod gateway;
mod session;

pub use pose_coach_types as types;

pub use client::{Config, ConfigBuilder, PoseClient, RawResponse};
pub use error::{AnalysisError, TransportError};
pub use gateway::{AnalysisRequest, PoseApi, PoseGateway, Variant, MODE_PUSHUP, MODE_SQUAT};
pub use session::{AnalysisState, PoseSession};
