use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use crate::db::entities::*;
use crate::utils::image_utils;
use crate::validation::FieldErrors;

// Entities get converted to DTOs with From, the
// client deserializes the very same structs.

/// What GET endpoints send back: the image travels as
/// base64 next to its MIME type, both null without image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
  pub id: i64,
  pub title: String,
  pub author: String,
  pub rating: i32,
  pub read_date: NaiveDate,
  pub review: String,
  pub image_base64: Option<String>,
  pub image_mime_type: Option<String>
}

impl From<Review> for ReviewDto {
  fn from(review: Review) -> Self {
    let (image_base64, image_mime_type) = match review.image {
      Some(image) => (Some(BASE64.encode(&image.data)), Some(image.mime_type)),
      None => (None, None)
    };
    Self {
      id: review.id,
      title: review.title,
      author: review.author,
      rating: review.rating,
      read_date: review.read_date,
      review: review.review,
      image_base64,
      image_mime_type
    }
  }
}

impl ReviewDto {

  pub fn image_bytes(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
    self.image_base64.as_ref().map(|b64| BASE64.decode(b64))
  }

  // Ready to be used as an image source.
  pub fn image_data_url(&self) -> Option<String> {
    self.image_base64.as_ref().map(|b64| image_utils::data_url(
      self.image_mime_type.as_deref()
        .unwrap_or(image_utils::FALLBACK_MIME_TYPE),
      b64
    ))
  }

}

/// Body of the 201 response when creating a review: the
/// submitted fields plus the id, raw image bytes in base64.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReviewDto {
  pub id: i64,
  pub title: String,
  pub author: String,
  pub rating: i32,
  pub read_date: NaiveDate,
  pub review: String,
  pub image: Option<String>
}

impl From<Review> for CreatedReviewDto {
  fn from(review: Review) -> Self {
    Self {
      id: review.id,
      title: review.title,
      author: review.author,
      rating: review.rating,
      read_date: review.read_date,
      review: review.review,
      image: review.image.map(|i| BASE64.encode(&i.data))
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationProblemDto {
  pub title: String,
  pub status: u16,
  pub errors: FieldErrors
}

impl ValidationProblemDto {
  pub fn new(title: String, errors: FieldErrors) -> Self {
    Self {
      title,
      status: 400,
      errors
    }
  }
}
