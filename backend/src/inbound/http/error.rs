//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while allowing Actix handlers
//! to turn domain failures into consistent JSON responses and status codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for status mapping and redaction.

    use actix_web::ResponseError;
    use actix_web::http::StatusCode;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Error::invalid_request("x"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("x"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("x"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("x"), StatusCode::NOT_FOUND)]
    #[case(Error::conflict("x"), StatusCode::CONFLICT)]
    #[case(Error::service_unavailable("x"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::internal("x"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_codes_to_statuses(#[case] error: Error, #[case] status: StatusCode) {
        assert_eq!(error.status_code(), status);
    }

    #[rstest]
    fn internal_errors_are_redacted() {
        let redacted = redact_if_internal(&Error::internal("pool exploded at 10.0.0.3"));
        assert_eq!(redacted.message(), "Internal server error");
    }

    #[rstest]
    fn expected_errors_keep_their_message() {
        let kept = redact_if_internal(&Error::conflict("event is full"));
        assert_eq!(kept.message(), "event is full");
    }
}
