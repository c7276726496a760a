use catalog::CatalogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

impl From<ClientError> for CatalogError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Status { status, body } => CatalogError::Status { status, body },
            ClientError::Decode(msg) => CatalogError::Decode(msg),
            other => CatalogError::Transport(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("failed to create payment intent: {0}")]
    PaymentIntent(#[from] ClientError),
    #[error("payment intent response is missing {0}")]
    MissingField(&'static str),
    #[error("payment confirmation failed: {0}")]
    Confirmation(String),
}
