use thiserror::Error;

/// Failures reported by a [`GraphicsBackend`](crate::GraphicsBackend).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("shader program failed to build: {0}")]
    Program(String),
    #[error("drawing surface unavailable: {0}")]
    Surface(String),
    #[error("uniform data does not match the program layout: {0}")]
    Layout(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// An explicit render was requested before any kernel was attached.
    #[error("no visual kernel attached")]
    NoKernel,
    #[error(transparent)]
    Backend(#[from] BackendError),
}
