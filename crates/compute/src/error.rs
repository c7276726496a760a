use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    #[error("invalid {kind} payload: {reason}")]
    InvalidPayload { kind: &'static str, reason: String },
    #[error("{0} payload has no samples")]
    Empty(&'static str),
    #[error("analytics sink failed: {0}")]
    Sink(String),
}
