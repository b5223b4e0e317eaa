use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    /// No declaration, export or member chain matches the path. Also covers
    /// a missing member partway through the path.
    #[error("Symbol '{path}' not found")]
    NotFound { path: String },

    /// The path is empty or has an empty segment (`Array..map`).
    #[error("invalid symbol path '{0}'")]
    InvalidPath(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl LookupError {
    pub fn not_found(path: impl Into<String>) -> Self {
        LookupError::NotFound { path: path.into() }
    }
}
