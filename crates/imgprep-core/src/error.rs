use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file type: {mime_type} (allowed: {allowed})")]
    UnsupportedType { mime_type: String, allowed: String },

    #[error("File too large: {size} bytes (limit: {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Could not encode image: {0}")]
    Encode(String),

    #[error("Invalid crop: {0}")]
    InvalidCrop(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Operation not allowed while {0}")]
    InvalidState(String),

    #[error("Another image is still being processed")]
    SessionBusy,

    #[error("Processing was cancelled")]
    Cancelled,

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

/// Coarse classification used by hosts to pick a recovery path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; the user must pick another file.
    Validation,
    /// The file could not be read as an image.
    Decode,
    /// The encoder failed; the environment cannot produce output.
    Encode,
    /// The session was aborted by the host or the user.
    Cancelled,
    /// The API was driven out of order.
    Usage,
}

impl PrepError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedType { .. } | Self::FileTooLarge { .. } => ErrorKind::Validation,
            Self::Decode(_) | Self::ImageError(_) | Self::Io(_) => ErrorKind::Decode,
            Self::Encode(_) => ErrorKind::Encode,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::InvalidCrop(_)
            | Self::InvalidConfig(_)
            | Self::InvalidState(_)
            | Self::SessionBusy => ErrorKind::Usage,
        }
    }

    /// Only encoder failures are treated as unrecoverable for a session.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Encode
    }
}

pub type Result<T> = std::result::Result<T, PrepError>;
