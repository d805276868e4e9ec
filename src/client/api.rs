use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::blocking::{multipart::{Form, Part}, Client, Response};
use reqwest::StatusCode;
use std::fs;
use std::path::Path;
use crate::app::dtos::{CreatedReviewDto, ReviewDto, ValidationProblemDto};
use crate::utils::{image_utils, time_utils};
use crate::validation;
use super::ClientError;

/// An image picked by the user, fully loaded in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
  pub file_name: String,
  pub mime_type: String,
  pub data: Vec<u8>
}

impl ImageFile {

  pub fn from_path(path: &Path) -> Result<ImageFile, ClientError> {
    let data = fs::read(path)
      .map_err(|e| ClientError::Image(format!("{} - {}", path.display(), e)))?;
    let file_name = path.file_name()
      .map(|n| n.to_string_lossy().to_string())
      .unwrap_or_else(|| "image".to_string());
    Ok(ImageFile {
      file_name,
      mime_type: image_utils::resolve_mime_type(None, &data),
      data
    })
  }

  pub fn size(&self) -> usize {
    self.data.len()
  }

}

/// The write shape: what create and update send as
/// multipart/form-data.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSubmission {
  pub title: String,
  pub author: String,
  pub rating: i32,
  pub read_date: NaiveDate,
  pub review: String,
  pub image: Option<ImageFile>
}

impl ReviewSubmission {

  pub fn to_form(&self) -> Result<Form, ClientError> {
    let mut form = Form::new()
      .text(validation::FIELD_TITLE, self.title.clone())
      .text(validation::FIELD_AUTHOR, self.author.clone())
      .text(validation::FIELD_RATING, self.rating.to_string())
      .text(validation::FIELD_READ_DATE, time_utils::date_to_string(&self.read_date))
      .text(validation::FIELD_REVIEW, self.review.clone());
    if let Some(image) = &self.image {
      let part = Part::bytes(image.data.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.mime_type)?;
      form = form.part(validation::FIELD_IMAGE, part);
    }
    Ok(form)
  }

}

/// The five operations of the review API.
pub trait ReviewApi {
  fn list(&self) -> Result<Vec<ReviewDto>, ClientError>;
  fn get(&self, id: i64) -> Result<ReviewDto, ClientError>;
  fn create(&self, submission: &ReviewSubmission) -> Result<CreatedReviewDto, ClientError>;
  fn update(&self, id: i64, submission: &ReviewSubmission) -> Result<(), ClientError>;
  fn delete(&self, id: i64) -> Result<(), ClientError>;
}

pub struct HttpReviewApi {
  base_url: String,
  client: Client
}

impl HttpReviewApi {

  pub fn new(base_url: &str) -> Self {
    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      client: Client::new()
    }
  }

  fn reviews_url(&self) -> String {
    format!("{}/reviews", self.base_url)
  }

  fn review_url(&self, id: i64) -> String {
    format!("{}/reviews/{}", self.base_url, id)
  }

}

// Turns anything but a 2xx into the matching ClientError.
fn check_status(response: Response) -> Result<Response, ClientError> {
  let status = response.status();
  debug!("{} {}", status, response.url());
  if status.is_success() {
    return Ok(response);
  }
  let body = response.text().unwrap_or_default();
  Err(status_error(status, &body))
}

// A 400 should carry the per-field messages as JSON.
fn status_error(status: StatusCode, body: &str) -> ClientError {
  match status {
    StatusCode::NOT_FOUND => ClientError::NotFound,
    StatusCode::BAD_REQUEST => match serde_json::from_str::<ValidationProblemDto>(body) {
      Ok(problem) => ClientError::Validation(problem.errors),
      Err(e) => {
        warn!("Bad request without validation details - {}", e);
        ClientError::UnexpectedStatus(status.as_u16())
      }
    },
    _ => ClientError::UnexpectedStatus(status.as_u16())
  }
}

impl ReviewApi for HttpReviewApi {

  fn list(&self) -> Result<Vec<ReviewDto>, ClientError> {
    let response = self.client.get(self.reviews_url()).send()?;
    Ok(check_status(response)?.json()?)
  }

  fn get(&self, id: i64) -> Result<ReviewDto, ClientError> {
    let response = self.client.get(self.review_url(id)).send()?;
    Ok(check_status(response)?.json()?)
  }

  fn create(&self, submission: &ReviewSubmission) -> Result<CreatedReviewDto, ClientError> {
    let response = self.client.post(self.reviews_url())
      .multipart(submission.to_form()?)
      .send()?;
    Ok(check_status(response)?.json()?)
  }

  fn update(&self, id: i64, submission: &ReviewSubmission) -> Result<(), ClientError> {
    let response = self.client.put(self.review_url(id))
      .multipart(submission.to_form()?)
      .send()?;
    check_status(response).map(|_| ())
  }

  fn delete(&self, id: i64) -> Result<(), ClientError> {
    let response = self.client.delete(self.review_url(id)).send()?;
    check_status(response).map(|_| ())
  }

}
