//! Client side of the review service.
//!
//! `api` talks HTTP to the server, `form`, `list` and `detail`
//! hold the state of the three screens a user goes through. None
//! of them render anything fancy, the CLI just prints them.

mod error;
pub mod api;
pub mod detail;
pub mod form;
pub mod list;

pub use error::ClientError;
pub use api::{HttpReviewApi, ImageFile, ReviewApi, ReviewSubmission};

#[cfg(test)]
pub(crate) mod mock;
