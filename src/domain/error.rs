use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::{json, Value};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Internal(String),
    ValidationError(String),
    ConfigurationError(String),
    UpstreamError {
        status: Option<u16>,
        details: Value,
    },
    UpstreamTimeout(u64),
    ShapingFailure(String),
}

impl AppError {
    pub fn upstream(status: Option<u16>, details: impl Into<Value>) -> Self {
        AppError::UpstreamError {
            status,
            details: details.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "{}", msg),
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            // A success status only fails when the body could not be decoded.
            AppError::UpstreamError {
                status: Some(status),
                ..
            } if (200..300).contains(status) => {
                write!(f, "Upstream service returned an unreadable response")
            }
            AppError::UpstreamError {
                status: Some(status),
                ..
            } => write!(f, "Upstream service error (status {})", status),
            AppError::UpstreamError { status: None, .. } => {
                write!(f, "Upstream service request failed")
            }
            AppError::UpstreamTimeout(secs) => {
                write!(f, "Upstream service did not respond within {}s", secs)
            }
            AppError::ShapingFailure(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigurationError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| camel_case_field(&field.to_string()))
            .collect();
        fields.sort_unstable();
        AppError::ValidationError(format!("Missing or empty field(s): {}", fields.join(", ")))
    }
}

// Request bodies are camelCase on the wire; report field names the way the caller sent them.
fn camel_case_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            AppError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_)
            | AppError::ConfigurationError(_)
            | AppError::ShapingFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::UpstreamError { details, .. } => json!({
                "error": self.to_string(),
                "details": details,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ConfigurationError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::upstream(Some(429), "busy").status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::UpstreamTimeout(30).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::ShapingFailure("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_display_includes_status() {
        let err = AppError::upstream(Some(503), json!({"error": "down"}));
        assert_eq!(err.to_string(), "Upstream service error (status 503)");
        let err = AppError::upstream(None, "connection refused");
        assert_eq!(err.to_string(), "Upstream service request failed");
        let err = AppError::upstream(Some(200), "Failed to parse JSON");
        assert_eq!(
            err.to_string(),
            "Upstream service returned an unreadable response"
        );
    }

    #[derive(Validate)]
    struct Probe {
        #[validate(required)]
        original_phrase: Option<String>,
    }

    #[test]
    fn test_validation_errors_use_wire_names() {
        let errors = Probe {
            original_phrase: None,
        }
        .validate()
        .unwrap_err();
        let err = AppError::from(errors);
        assert_eq!(
            err.to_string(),
            "Missing or empty field(s): originalPhrase"
        );
    }
}
