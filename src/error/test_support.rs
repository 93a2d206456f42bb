use super::{BridgeError, ConfigError, ScriptError, TimelineError, ValidationError};

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::TestExpectation { message }
    }
}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ConfigError {
    fn from(message: &'static str) -> Self {
        ConfigError::TestExpectation { message }
    }
}

impl From<String> for ConfigError {
    fn from(value: String) -> Self {
        ConfigError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for BridgeError {
    fn from(message: &'static str) -> Self {
        BridgeError::TestExpectation { message }
    }
}

impl From<String> for BridgeError {
    fn from(value: String) -> Self {
        BridgeError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ScriptError {
    fn from(message: &'static str) -> Self {
        ScriptError::TestExpectation { message }
    }
}

impl From<String> for ScriptError {
    fn from(value: String) -> Self {
        ScriptError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for TimelineError {
    fn from(message: &'static str) -> Self {
        TimelineError::TestExpectation { message }
    }
}

impl From<String> for TimelineError {
    fn from(value: String) -> Self {
        TimelineError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}
