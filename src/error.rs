pub type NumrollResult<T> = Result<T, NumrollError>;

#[derive(thiserror::Error, Debug)]
pub enum NumrollError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NumrollError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            NumrollError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            NumrollError::animation("x")
                .to_string()
                .contains("animation error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = NumrollError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
