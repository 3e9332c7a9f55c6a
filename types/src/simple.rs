/// Payload of a `format=simple` analysis. The server may omit any field,
/// so all of them decode as optional.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimpleResult {
    /// Detected pose label, ex: "squat".
    pose: Option<String>,

    /// One-line coaching tip.
    feedback: Option<String>,

    /// Form score, 0..=100.
    score: Option<i64>,
}

impl SimpleResult {
    pub fn new() -> Self {
        Self {
            pose: None,
            feedback: None,
            score: None,
        }
    }

    pub fn with_pose(mut self, pose: &str) -> Self {
        self.pose = Some(pose.to_string());
        self
    }

    pub fn with_feedback(mut self, feedback: &str) -> Self {
        self.feedback = Some(feedback.to_string());
        self
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn pose(&self) -> Option<&str> {
        self.pose.as_deref()
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub fn score(&self) -> Option<i64> {
        self.score
    }
}

impl Default for SimpleResult {
    fn default() -> Self {
        Self::new()
    }
}
