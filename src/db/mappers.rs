use super::entities::*;
use crate::utils::image_utils;
use rusqlite::{Row, Error};

// Column order has to match REVIEW_COLUMNS in the
// parent module.
pub fn map_review(row: &Row) -> Result<Review, Error> {
  let image: Option<Vec<u8>> = row.get(6)?;
  let mime_type: Option<String> = row.get(7)?;
  Ok(Review {
    id: row.get(0)?,
    title: row.get(1)?,
    author: row.get(2)?,
    rating: row.get(3)?,
    read_date: row.get(4)?,
    review: row.get(5)?,
    // Rows written without a MIME type get one guessed
    // from the data.
    image: image.map(|data| {
      let mime_type = mime_type.unwrap_or_else(
        || image_utils::resolve_mime_type(None, &data)
      );
      ReviewImage { data, mime_type }
    })
  })
}
