use actix_web::{
  error::ResponseError,
  http::StatusCode,
  HttpResponse
};
use derive_more::Display;
use log::error;
use crate::validation::FieldErrors;
use super::dtos::ValidationProblemDto;

// The full message of internal errors should only
// appear in logs, not in responses to random internet
// people. Hence the generic display strings for these.
#[derive(Debug, Display)]
pub enum Error {
  #[display(fmt = "Internal Server Error")]
  InternalServerError(String),
  #[display(fmt = "Database Error")]
  DatabaseError(String),
  #[display(fmt = "Not Found: {}", _0)]
  NotFound(String),
  #[display(fmt = "Bad Request: {}", _0)]
  BadRequest(String),
  #[display(fmt = "Payload Too Large")]
  PayloadTooLarge(String),
  #[display(fmt = "One or more validation errors occurred.")]
  ValidationFailed(FieldErrors),
  // Row changed under our feet while it still exists.
  // Nothing sensible to do about it, so it's a 500.
  #[display(fmt = "Internal Server Error")]
  Conflict(String)
}

// Plain text for everything except validation failures,
// which carry the per-field messages as JSON.
impl ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    match self {
      Error::InternalServerError(_)
        | Error::DatabaseError(_)
        | Error::Conflict(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::BadRequest(_) | Error::ValidationFailed(_) => StatusCode::BAD_REQUEST,
      Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE
    }
  }

  fn error_response(&self) -> HttpResponse {
    match self {
      Error::ValidationFailed(errors) => HttpResponse::BadRequest().json(
        ValidationProblemDto::new(self.to_string(), errors.clone())
      ),
      _ => HttpResponse::build(self.status_code()).body(self.to_string())
    }
  }
}

pub fn map_db_error(e: eyre::Report) -> Error {
  error!("Database error - {:?}", e);
  Error::DatabaseError(e.to_string())
}
