use chrono::NaiveDate;
use crate::validation::ValidReview;

// Plain datatypes mapping the reviews table, the JSON
// representations live in app::dtos.

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewImage {
  pub data: Vec<u8>,
  pub mime_type: String
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
  pub id: i64,
  pub title: String,
  pub author: String,
  pub rating: i32,
  pub read_date: NaiveDate,
  pub review: String,
  pub image: Option<ReviewImage>
}

impl Review {
  // The id is -1 until the review gets inserted.
  pub fn new(valid: ValidReview, image: Option<ReviewImage>) -> Self {
    Self {
      id: -1,
      title: valid.title,
      author: valid.author,
      rating: valid.rating,
      read_date: valid.read_date,
      review: valid.review,
      image
    }
  }
}

// Every scalar field gets overwritten, the image only
// when a new one was uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewUpdate {
  pub id: i64,
  pub title: String,
  pub author: String,
  pub rating: i32,
  pub read_date: NaiveDate,
  pub review: String,
  pub image: Option<ReviewImage>
}

impl ReviewUpdate {
  pub fn new(id: i64, valid: ValidReview, image: Option<ReviewImage>) -> Self {
    Self {
      id,
      title: valid.title,
      author: valid.author,
      rating: valid.rating,
      read_date: valid.read_date,
      review: valid.review,
      image
    }
  }
}
