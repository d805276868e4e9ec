use std::cell::RefCell;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use crate::app::dtos::{CreatedReviewDto, ReviewDto};
use super::{ClientError, ReviewApi, ReviewSubmission};

// In-memory stand-in for the HTTP API, records every call.
#[derive(Default)]
pub struct MockApi {
  pub reviews: RefCell<Vec<ReviewDto>>,
  pub calls: RefCell<Vec<String>>,
  pub fail_with: RefCell<Option<ClientError>>
}

impl MockApi {
  pub fn with_reviews(reviews: Vec<ReviewDto>) -> Self {
    let api = Self::default();
    *api.reviews.borrow_mut() = reviews;
    api
  }

  fn failure(&self) -> Result<(), ClientError> {
    match self.fail_with.borrow_mut().take() {
      Some(e) => Err(e),
      None => Ok(())
    }
  }

  fn to_dto(id: i64, submission: &ReviewSubmission) -> ReviewDto {
    ReviewDto {
      id,
      title: submission.title.clone(),
      author: submission.author.clone(),
      rating: submission.rating,
      read_date: submission.read_date,
      review: submission.review.clone(),
      image_base64: submission.image.as_ref().map(|i| BASE64.encode(&i.data)),
      image_mime_type: submission.image.as_ref().map(|i| i.mime_type.clone())
    }
  }
}

impl ReviewApi for MockApi {
  fn list(&self) -> Result<Vec<ReviewDto>, ClientError> {
    self.calls.borrow_mut().push("list".to_string());
    self.failure()?;
    Ok(self.reviews.borrow().clone())
  }

  fn get(&self, id: i64) -> Result<ReviewDto, ClientError> {
    self.calls.borrow_mut().push(format!("get {}", id));
    self.failure()?;
    self.reviews.borrow().iter()
      .find(|r| r.id == id)
      .cloned()
      .ok_or(ClientError::NotFound)
  }

  fn create(&self, submission: &ReviewSubmission) -> Result<CreatedReviewDto, ClientError> {
    self.calls.borrow_mut().push("create".to_string());
    self.failure()?;
    let id = self.reviews.borrow().iter().map(|r| r.id).max().unwrap_or(0) + 1;
    let dto = Self::to_dto(id, submission);
    self.reviews.borrow_mut().push(dto.clone());
    Ok(CreatedReviewDto {
      id,
      title: dto.title,
      author: dto.author,
      rating: dto.rating,
      read_date: dto.read_date,
      review: dto.review,
      image: dto.image_base64
    })
  }

  fn update(&self, id: i64, submission: &ReviewSubmission) -> Result<(), ClientError> {
    self.calls.borrow_mut().push(format!("update {}", id));
    self.failure()?;
    let mut reviews = self.reviews.borrow_mut();
    let existing = reviews.iter_mut()
      .find(|r| r.id == id)
      .ok_or(ClientError::NotFound)?;
    let mut updated = Self::to_dto(id, submission);
    if submission.image.is_none() {
      updated.image_base64 = existing.image_base64.take();
      updated.image_mime_type = existing.image_mime_type.take();
    }
    *existing = updated;
    Ok(())
  }

  fn delete(&self, id: i64) -> Result<(), ClientError> {
    self.calls.borrow_mut().push(format!("delete {}", id));
    self.failure()?;
    let mut reviews = self.reviews.borrow_mut();
    let before = reviews.len();
    reviews.retain(|r| r.id != id);
    if reviews.len() == before {
      Err(ClientError::NotFound)
    } else {
      Ok(())
    }
  }
}
