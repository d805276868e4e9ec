use log::warn;
use crate::app::dtos::ReviewDto;
use super::{ClientError, ReviewApi};

const TOTAL_STARS: i32 = 5;

/// Filled stars up to the rating, empty ones after that.
pub fn star_rating(rating: i32) -> String {
  (1..=TOTAL_STARS)
    .map(|i| if i <= rating { '★' } else { '☆' })
    .collect()
}

/// A single review, ready to be displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDetail {
  pub review: ReviewDto,
  // data: URL, None without image or when the base64
  // turned out to be garbage.
  pub image_src: Option<String>
}

impl From<ReviewDto> for ReviewDetail {
  fn from(review: ReviewDto) -> Self {
    let image_src = match review.image_bytes() {
      Some(Ok(_)) => review.image_data_url(),
      Some(Err(e)) => {
        warn!("Review {} has an undecodable image - {}", review.id, e);
        None
      },
      None => None
    };
    Self { review, image_src }
  }
}

impl ReviewDetail {

  // NotFound comes back as is so callers can tell it
  // apart from other failures.
  pub fn load(api: &impl ReviewApi, id: i64) -> Result<Self, ClientError> {
    api.get(id).map(ReviewDetail::from)
  }

  pub fn stars(&self) -> String {
    star_rating(self.review.rating)
  }

  pub fn render(&self) -> String {
    let r = &self.review;
    let image = match (&self.image_src, &r.image_mime_type) {
      (Some(_), Some(mime)) => format!("Cover: {} image", mime),
      _ => "Cover: none".to_string()
    };
    format!(
      "{}\nby {}\n{}\nRead on {}\n{}\n\n{}",
      r.title, r.author, self.stars(), r.read_date, image, r.review
    )
  }

}
