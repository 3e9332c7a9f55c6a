use std::io;

/// Network-layer failure, classified from the underlying client error.
/// Display output is the kind name, which is what subscribers see when a
/// request dies on the wire.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Timeout")]
    Timeout,
    #[error("ConnectionRefused")]
    ConnectionRefused,
    #[error("Interrupted")]
    Interrupted,
    #[error("{0}")]
    Unknown(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return TransportError::Timeout;
        }
        if let Some(io) = io_source(&err) {
            match io.kind() {
                io::ErrorKind::ConnectionRefused => return TransportError::ConnectionRefused,
                io::ErrorKind::TimedOut => return TransportError::Timeout,
                io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::Interrupted => return TransportError::Interrupted,
                _ => {}
            }
        }
        if err.is_connect() {
            return TransportError::ConnectionRefused;
        }
        TransportError::Unknown(err.to_string())
    }
}

/// The error kind lives on the `std::io::Error` buried in reqwest's source
/// chain; walk down to it.
fn io_source(err: &reqwest::Error) -> Option<&io::Error> {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<io::Error>() {
            return Some(io);
        }
        source = cause.source();
    }
    None
}

/// Everything that can go wrong between an intent and its typed result.
/// Display output is the exact message published to subscribers.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The image file could not be read.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// The request never produced an HTTP response.
    #[error("{0}")]
    TransportFailed(#[from] TransportError),

    /// The server answered outside 2xx; status and body are surfaced verbatim.
    #[error("HTTP {status}: {body}")]
    ServerRejected { status: u16, body: String },

    /// 2xx response whose body did not decode as the expected shape.
    #[error("malformed response: {preview}")]
    MalformedResponse { preview: String },
}
