use crate::config::ConfigError;
use crate::scoring::router::DecisionRequestError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Payload(serde_json::Error),
    Decision(DecisionRequestError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Payload(err) => write!(f, "payload error: {}", err),
            AppError::Decision(err) => write!(f, "decision error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Payload(err) => Some(err),
            AppError::Decision(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Payload(value)
    }
}

impl From<DecisionRequestError> for AppError {
    fn from(value: DecisionRequestError) -> Self {
        Self::Decision(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn rejected_decision_request_surfaces_as_cli_error() {
        let err = AppError::from(DecisionRequestError::EmptyPayload);

        assert!(matches!(err, AppError::Decision(_)));
        assert_eq!(err.to_string(), "decision error: No JSON payload provided");
        assert_eq!(
            err.source().map(|source| source.to_string()),
            Some("No JSON payload provided".to_string())
        );
    }

    #[test]
    fn unreadable_payload_file_surfaces_as_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "application.json");
        let err = AppError::from(io);
        assert!(err.to_string().starts_with("io error: "));
    }
}
