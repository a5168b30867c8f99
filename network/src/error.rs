use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("send to peer {peer} failed: {reason}")]
    SendFailed { peer: String, reason: String },

    #[error("peer {0} not found")]
    PeerNotFound(String),

    #[error("unknown channel {0:#04x}")]
    UnknownChannel(u8),

    #[error("IO error: {0}")]
    Io(String),
}
