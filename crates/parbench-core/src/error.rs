//! Harness error type.

/// Error type for harness operations.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The sequential reference run produced no usable result.
    #[error("sequential reference run produced no {0}")]
    BaselineUnavailable(&'static str),

    /// The external program could not be run.
    #[error("program invocation failed: {0}")]
    Invocation(String),

    /// The run was cancelled.
    #[error("run cancelled")]
    Cancelled,

    /// Writing or reading input data failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            HarnessError::Config("empty thread list".into()).to_string(),
            "configuration error: empty thread list"
        );
        assert_eq!(
            HarnessError::BaselineUnavailable("execution time").to_string(),
            "sequential reference run produced no execution time"
        );
        assert!(HarnessError::Invocation("failed to start './main'".into())
            .to_string()
            .contains("./main"));
    }

    #[test]
    fn io_conversion() {
        let err: HarnessError = std::io::Error::other("disk full").into();
        assert!(matches!(err, HarnessError::Io(_)));
    }
}
