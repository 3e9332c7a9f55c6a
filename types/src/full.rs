use std::collections::BTreeMap;

use serde_json::Value;

/// Payload of a `format=full` analysis: raw landmarks, per-joint angles in
/// degrees, free-form metrics, and a list of coaching tips. Everything but
/// the `ok` flag is optional.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FullResult {
    ok: bool,

    /// One record per detected landmark, in model order.
    landmarks: Option<Vec<serde_json::Map<String, Value>>>,

    /// Joint name to angle in degrees.
    angles: Option<BTreeMap<String, f64>>,

    metrics: Option<serde_json::Map<String, Value>>,

    feedback: Option<Vec<String>>,
}

impl FullResult {
    pub fn new(ok: bool) -> Self {
        Self {
            ok,
            landmarks: None,
            angles: None,
            metrics: None,
            feedback: None,
        }
    }

    pub fn with_landmarks(mut self, landmarks: Vec<serde_json::Map<String, Value>>) -> Self {
        self.landmarks = Some(landmarks);
        self
    }

    pub fn with_angles(mut self, angles: BTreeMap<String, f64>) -> Self {
        self.angles = Some(angles);
        self
    }

    pub fn with_metrics(mut self, metrics: serde_json::Map<String, Value>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_feedback(mut self, feedback: Vec<String>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    pub fn ok(&self) -> bool {
        self.ok
    }

    pub fn landmarks(&self) -> Option<&[serde_json::Map<String, Value>]> {
        self.landmarks.as_deref()
    }

    pub fn angles(&self) -> Option<&BTreeMap<String, f64>> {
        self.angles.as_ref()
    }

    pub fn metrics(&self) -> Option<&serde_json::Map<String, Value>> {
        self.metrics.as_ref()
    }

    pub fn feedback(&self) -> Option<&[String]> {
        self.feedback.as_deref()
    }
}
