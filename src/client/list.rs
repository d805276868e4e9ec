use log::error;
use crate::app::dtos::ReviewDto;
use super::{ClientError, ReviewApi};

// Shown on cards for reviews without a cover.
pub const PLACEHOLDER_IMAGE: &'static str = "default-book-placeholder.png";

const LOAD_ERROR: &'static str =
  "There was an error loading the books. Please try again later.";
const DELETE_ERROR: &'static str = "Failed to delete book";

/// One summary card of the list.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewCard {
  pub id: i64,
  pub title: String,
  pub author: String,
  pub image_src: String
}

impl From<&ReviewDto> for ReviewCard {
  fn from(review: &ReviewDto) -> Self {
    Self {
      id: review.id,
      title: review.title.clone(),
      author: review.author.clone(),
      image_src: review.image_data_url()
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
    }
  }
}

/// The list of all reviews. Deleting goes through a
/// confirmation step, and a deleted review is dropped from
/// the list in place instead of fetching everything again.
#[derive(Debug, Default)]
pub struct ReviewList {
  reviews: Vec<ReviewDto>,
  pending_delete: Option<i64>,
  error: Option<String>
}

impl ReviewList {

  pub fn load(api: &impl ReviewApi) -> Self {
    let mut list = Self::default();
    list.refresh(api);
    list
  }

  pub fn refresh(&mut self, api: &impl ReviewApi) {
    match api.list() {
      Ok(reviews) => {
        self.reviews = reviews;
        self.error = None;
      },
      Err(e) => {
        error!("Error fetching books - {}", e);
        self.error = Some(LOAD_ERROR.to_string());
      }
    }
  }

  pub fn reviews(&self) -> &[ReviewDto] {
    &self.reviews
  }

  pub fn cards(&self) -> Vec<ReviewCard> {
    self.reviews.iter().map(ReviewCard::from).collect()
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn pending_delete(&self) -> Option<i64> {
    self.pending_delete
  }

  // Opens the "are you sure?" step. Unknown ids are ignored.
  pub fn request_delete(&mut self, id: i64) -> bool {
    if self.reviews.iter().any(|r| r.id == id) {
      self.pending_delete = Some(id);
      true
    } else {
      false
    }
  }

  pub fn cancel_delete(&mut self) {
    self.pending_delete = None;
  }

  /// Deletes the review waiting for confirmation, if any.
  /// The confirmation step is closed whatever happens.
  pub fn confirm_delete(&mut self, api: &impl ReviewApi) -> Result<Option<i64>, ClientError> {
    let id = match self.pending_delete.take() {
      Some(id) => id,
      None => return Ok(None)
    };
    match api.delete(id) {
      Ok(()) => {
        self.reviews.retain(|r| r.id != id);
        Ok(Some(id))
      },
      Err(e) => {
        error!("Error deleting book {} - {}", id, e);
        self.error = Some(DELETE_ERROR.to_string());
        Err(e)
      }
    }
  }

  pub fn render(&self) -> String {
    if let Some(e) = &self.error {
      return e.clone();
    }
    if self.reviews.is_empty() {
      return "No books available".to_string();
    }
    self.reviews.iter()
      .map(|r| {
        let cover = if r.image_base64.is_some() { "[cover]" } else { "[no cover]" };
        format!("#{} {} by {} {}", r.id, r.title, r.author, cover)
      })
      .collect::<Vec<String>>()
      .join("\n")
  }

}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;
  use crate::client::mock::MockApi;

  fn dto(id: i64, title: &str, image: Option<&str>) -> ReviewDto {
    ReviewDto {
      id,
      title: title.to_string(),
      author: "Someone".to_string(),
      rating: 4,
      read_date: NaiveDate::from_ymd_opt(2022, 2, 2).unwrap(),
      review: "Fine".to_string(),
      image_base64: image.map(String::from),
      image_mime_type: image.map(|_| "image/jpeg".to_string())
    }
  }

  #[test]
  fn cards_use_placeholder_without_image() {
    let api = MockApi::with_reviews(vec![dto(1, "Dune", None), dto(2, "Emma", Some("AQID"))]);
    let list = ReviewList::load(&api);
    let cards = list.cards();
    assert_eq!(PLACEHOLDER_IMAGE, cards[0].image_src);
    assert_eq!("data:image/jpeg;base64,AQID", cards[1].image_src);
  }

  #[test]
  fn delete_needs_confirmation() {
    let api = MockApi::with_reviews(vec![dto(1, "Dune", None), dto(2, "Emma", None)]);
    let mut list = ReviewList::load(&api);
    assert!(list.request_delete(2));
    list.cancel_delete();
    assert_eq!(Ok(None), list.confirm_delete(&api).map_err(|e| e.to_string()));
    assert_eq!(vec!["list".to_string()], *api.calls.borrow());

    assert!(list.request_delete(2));
    assert_eq!(Some(2), list.confirm_delete(&api).unwrap());
    assert_eq!(None, list.pending_delete());
    let ids: Vec<i64> = list.reviews().iter().map(|r| r.id).collect();
    assert_eq!(vec![1], ids);
    // Removed in place, no second fetch.
    assert_eq!(
      vec!["list".to_string(), "delete 2".to_string()],
      *api.calls.borrow()
    );
  }

  #[test]
  fn failed_delete_keeps_the_item() {
    let api = MockApi::with_reviews(vec![dto(1, "Dune", None)]);
    let mut list = ReviewList::load(&api);
    *api.fail_with.borrow_mut() = Some(ClientError::Transport("down".to_string()));
    list.request_delete(1);
    assert!(list.confirm_delete(&api).is_err());
    assert_eq!(1, list.reviews().len());
    assert_eq!(Some("Failed to delete book"), list.error());
    assert_eq!(None, list.pending_delete());
  }

  #[test]
  fn unknown_id_cannot_be_requested() {
    let api = MockApi::with_reviews(vec![dto(1, "Dune", None)]);
    let mut list = ReviewList::load(&api);
    assert!(!list.request_delete(999));
    assert_eq!(None, list.pending_delete());
  }

  #[test]
  fn load_failure_and_empty_list_render_messages() {
    let api = MockApi::default();
    *api.fail_with.borrow_mut() = Some(ClientError::UnexpectedStatus(500));
    let list = ReviewList::load(&api);
    assert_eq!(Some(LOAD_ERROR), list.error());
    assert_eq!(LOAD_ERROR, list.render());

    let list = ReviewList::load(&MockApi::default());
    assert_eq!("No books available", list.render());
  }
}
