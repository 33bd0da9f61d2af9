use thiserror::Error;

/// Failures raised by the dispatch machinery itself.
///
/// Errors produced by handlers and decorators never pass through this type;
/// they reach the caller as the `anyhow::Error` they were created as.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispatchError {
    #[error("no handler registered for request '{request}'{}", describe_response(.response))]
    HandlerNotFound {
        request: &'static str,
        response: Option<&'static str>,
    },

    #[error("handler registered for '{request}' is not a {expected}")]
    HandlerShapeMismatch {
        request: &'static str,
        expected: &'static str,
    },

    #[error("pipeline for '{request}' produced no result")]
    NullResult { request: &'static str },

    #[error("pipeline for '{request}' must produce '{expected}', but produced '{actual}'")]
    TypeContractViolation {
        request: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("no handlers registered for notification '{notification}'")]
    NotificationHandlersNotFound { notification: &'static str },

    #[error("{} handlers failed for notification '{notification}'", .errors.len())]
    Aggregate {
        notification: &'static str,
        errors: Vec<anyhow::Error>,
    },
}

impl DispatchError {
    /// Stable label for log fields and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::HandlerNotFound { .. } => "handler_not_found",
            Self::HandlerShapeMismatch { .. } => "handler_shape_mismatch",
            Self::NullResult { .. } => "null_result",
            Self::TypeContractViolation { .. } => "type_contract_violation",
            Self::NotificationHandlersNotFound { .. } => "notification_handlers_not_found",
            Self::Aggregate { .. } => "aggregate",
        }
    }
}

fn describe_response(response: &Option<&'static str>) -> String {
    match response {
        Some(response) => format!(" and response '{response}'"),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid value '{value}' for '{key}', expected one of: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_not_found_names_request_only_for_void() {
        let err = DispatchError::HandlerNotFound {
            request: "app::Ping",
            response: None,
        };

        assert_eq!(
            err.to_string(),
            "no handler registered for request 'app::Ping'"
        );
    }

    #[test]
    fn test_handler_not_found_names_response_for_typed() {
        let err = DispatchError::HandlerNotFound {
            request: "app::GetInt",
            response: Some("i32"),
        };

        assert_eq!(
            err.to_string(),
            "no handler registered for request 'app::GetInt' and response 'i32'"
        );
        assert_eq!(err.code(), "handler_not_found");
    }

    #[test]
    fn test_aggregate_counts_failures() {
        let err = DispatchError::Aggregate {
            notification: "app::Joined",
            errors: vec![anyhow::anyhow!("a"), anyhow::anyhow!("b")],
        };

        assert_eq!(
            err.to_string(),
            "2 handlers failed for notification 'app::Joined'"
        );
    }
}
