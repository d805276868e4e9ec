//! Field rules for a review, shared by the API handlers and the
//! client form so both sides reject exactly the same input.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::utils::time_utils;

pub const MAX_TEXT_LENGTH: usize = 255;
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;
pub const DEFAULT_MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

// Field names as they appear on the wire (form parts and
// JSON keys).
pub const FIELD_TITLE: &'static str = "title";
pub const FIELD_AUTHOR: &'static str = "author";
pub const FIELD_RATING: &'static str = "rating";
pub const FIELD_READ_DATE: &'static str = "readDate";
pub const FIELD_REVIEW: &'static str = "review";
pub const FIELD_IMAGE: &'static str = "image";

/// One message per failing field, keyed by wire field name.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {

  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self.0.insert(field.to_string(), message.into());
  }

  pub fn clear(&mut self, field: &str) {
    self.0.remove(field);
  }

  pub fn get(&self, field: &str) -> Option<&str> {
    self.0.get(field).map(String::as_str)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  // Stores the outcome of a single field check, removing
  // any stale message when the field now passes.
  pub fn record<T>(&mut self, field: &str, outcome: &Result<T, String>) {
    match outcome {
      Ok(_) => self.clear(field),
      Err(message) => self.add(field, message.clone())
    }
  }

}

/// Raw review fields, exactly as typed in a form.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReviewFields {
  pub title: String,
  pub author: String,
  pub rating: String,
  pub read_date: String,
  pub review: String
}

/// A review that passed every rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidReview {
  pub title: String,
  pub author: String,
  pub rating: i32,
  pub read_date: NaiveDate,
  pub review: String
}

pub fn validate_title(title: &str) -> Result<(), String> {
  if title.trim().is_empty() {
    Err("Title is required.".to_string())
  } else if title.chars().count() > MAX_TEXT_LENGTH {
    Err(format!("Title must be {} characters or less.", MAX_TEXT_LENGTH))
  } else {
    Ok(())
  }
}

pub fn validate_author(author: &str) -> Result<(), String> {
  lazy_static! {
    static ref AUTHOR_REGEX: Regex = Regex::new(r"^[A-Za-z\s]+$").unwrap();
  }
  if author.trim().is_empty() {
    Err("Author name is required.".to_string())
  } else if !AUTHOR_REGEX.is_match(author) {
    Err("Author name should contain only alphabetic characters.".to_string())
  } else if author.chars().count() > MAX_TEXT_LENGTH {
    Err(format!("Author name must be {} characters or less.", MAX_TEXT_LENGTH))
  } else {
    Ok(())
  }
}

pub fn validate_rating(rating: &str) -> Result<i32, String> {
  let rating = rating.trim();
  if rating.is_empty() {
    return Err("Rating is required.".to_string());
  }
  match rating.parse::<i32>() {
    Ok(r) if (MIN_RATING..=MAX_RATING).contains(&r) => Ok(r),
    _ => Err(format!(
      "Rating must be between {} and {}.", MIN_RATING, MAX_RATING
    ))
  }
}

pub fn validate_read_date(
  read_date: &str,
  today: NaiveDate
) -> Result<NaiveDate, String> {
  if read_date.trim().is_empty() {
    return Err("Read date is required.".to_string());
  }
  match time_utils::parse_date(read_date) {
    Some(date) if date > today =>
      Err("Read date cannot be in the future.".to_string()),
    Some(date) => Ok(date),
    None => Err("Read date must be a valid date (YYYY-MM-DD).".to_string())
  }
}

pub fn validate_review_text(review: &str) -> Result<(), String> {
  if review.trim().is_empty() {
    Err("Review is required.".to_string())
  } else {
    Ok(())
  }
}

pub fn validate_image_size(size: usize, max_size: usize) -> Result<(), String> {
  if size <= max_size {
    Ok(())
  } else {
    Err(format!("Image size must be less than {}.", human_size(max_size)))
  }
}

fn human_size(bytes: usize) -> String {
  const MIB: usize = 1024 * 1024;
  if bytes >= MIB && bytes % MIB == 0 {
    format!("{}MB", bytes / MIB)
  } else {
    format!("{} bytes", bytes)
  }
}

/// Runs every rule and collects all the failures at once.
pub fn validate_review(
  fields: &ReviewFields,
  today: NaiveDate
) -> Result<ValidReview, FieldErrors> {
  let mut errors = FieldErrors::new();
  let title = validate_title(&fields.title);
  let author = validate_author(&fields.author);
  let rating = validate_rating(&fields.rating);
  let read_date = validate_read_date(&fields.read_date, today);
  let review = validate_review_text(&fields.review);
  errors.record(FIELD_TITLE, &title);
  errors.record(FIELD_AUTHOR, &author);
  errors.record(FIELD_RATING, &rating);
  errors.record(FIELD_READ_DATE, &read_date);
  errors.record(FIELD_REVIEW, &review);

  match (rating, read_date) {
    (Ok(rating), Ok(read_date)) if errors.is_empty() => Ok(ValidReview {
      title: fields.title.clone(),
      author: fields.author.clone(),
      rating,
      read_date,
      review: fields.review.clone()
    }),
    _ => Err(errors)
  }
}
