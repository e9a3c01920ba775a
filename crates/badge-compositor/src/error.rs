//! Error taxonomy for the compositing pipeline.

/// Errors that can abort a composite request.
///
/// Every variant is terminal for the request that produced it; nothing in
/// the pipeline retries.
#[derive(Debug, thiserror::Error)]
pub enum CompositeError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Failed to resolve overlay asset {identifier}: {reason}")]
    AssetResolution { identifier: u32, reason: String },

    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl CompositeError {
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    pub fn asset(identifier: u32, reason: impl ToString) -> Self {
        Self::AssetResolution {
            identifier,
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for compositing operations.
pub type Result<T> = std::result::Result<T, CompositeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_error_names_the_identifier() {
        let err = CompositeError::asset(42, "permission denied");
        assert_eq!(
            err.to_string(),
            "Failed to resolve overlay asset 42: permission denied"
        );
    }
}
