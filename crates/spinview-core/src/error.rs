use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("frame count must be positive")]
    InvalidFrameCount,

    #[error("step size must be positive")]
    InvalidStepSize,

    #[error("motion path has no samples")]
    EmptyPath,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
