use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("Timeline actor has stopped.")]
    Stopped,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
