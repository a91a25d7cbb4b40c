pub type PreviewResult<T> = Result<T, PreviewError>;

#[derive(thiserror::Error, Debug)]
pub enum PreviewError {
    #[error("content error: {0}")]
    Content(String),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("image generation error: {0}")]
    ImageGeneration(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PreviewError {
    pub fn content(msg: impl Into<String>) -> Self {
        Self::Content(msg.into())
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    pub fn image_generation(msg: impl Into<String>) -> Self {
        Self::ImageGeneration(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_json::Error> for PreviewError {
    fn from(err: serde_json::Error) -> Self {
        Self::Content(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(PreviewError::content("x")
            .to_string()
            .contains("content error:"));
        assert!(PreviewError::surface("x")
            .to_string()
            .contains("surface error:"));
        assert!(PreviewError::image_generation("x")
            .to_string()
            .contains("image generation error:"));
        assert!(PreviewError::config("x")
            .to_string()
            .contains("config error:"));
    }

    #[test]
    fn json_errors_become_content_errors() {
        let err: PreviewError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, PreviewError::Content(_)));
    }
}
