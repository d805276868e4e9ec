use actix_multipart::{Field, Multipart, MultipartError};
use futures::StreamExt;
use log::warn;
use crate::config::Limits;
use crate::db::entities::ReviewImage;
use crate::utils::image_utils;
use crate::validation::{self, ReviewFields};
use super::error::Error;

/// Everything a create or update form carried.
#[derive(Debug, Default)]
pub struct ReviewUpload {
  pub fields: ReviewFields,
  pub image: Option<ReviewImage>,
  // Set when the image part went over the size limit.
  pub image_error: Option<String>
}

fn multipart_error(e: MultipartError) -> Error {
  warn!("Malformed multipart payload - {}", e);
  Error::BadRequest("Malformed multipart payload".to_string())
}

// What's left of the byte allowance for the whole body.
// Every part counts against it, including the ones we ignore.
struct PayloadBudget {
  remaining: usize
}

impl PayloadBudget {
  fn consume(&mut self, len: usize) -> Result<(), Error> {
    match self.remaining.checked_sub(len) {
      Some(left) => {
        self.remaining = left;
        Ok(())
      },
      None => {
        warn!("Multipart payload went over the size limit");
        Err(Error::PayloadTooLarge("Multipart payload over the limit".to_string()))
      }
    }
  }
}

// Reads the whole part. Past max_size we keep consuming
// the stream but stop buffering; the total size still
// comes back so the caller can complain about it.
async fn read_field(
  field: &mut Field,
  max_size: usize,
  budget: &mut PayloadBudget
) -> Result<(Option<Vec<u8>>, usize), Error> {
  let mut data: Option<Vec<u8>> = Some(Vec::new());
  let mut size: usize = 0;
  while let Some(chunk) = field.next().await {
    let chunk = chunk.map_err(multipart_error)?;
    budget.consume(chunk.len())?;
    size += chunk.len();
    if size > max_size {
      data = None;
    } else if let Some(buf) = data.as_mut() {
      buf.extend_from_slice(&chunk);
    }
  }
  Ok((data, size))
}

// Text parts have no size of their own, only the
// payload budget bounds them.
async fn read_text_field(
  field: &mut Field,
  budget: &mut PayloadBudget
) -> Result<String, Error> {
  let (data, _) = read_field(field, usize::MAX, budget).await?;
  String::from_utf8(data.unwrap_or_default())
    .map_err(|_| Error::BadRequest("Form fields must be UTF-8".to_string()))
}

/// Drains a multipart/form-data payload into review fields.
///
/// Missing text parts end up as empty strings and are reported
/// by validation later. An empty file part (what browsers send
/// when no file was picked) counts as no image. Going over
/// `max_payload_size` in total stops reading with a 413.
pub async fn read_review_form(
  mut payload: Multipart,
  limits: &Limits
) -> Result<ReviewUpload, Error> {
  let mut upload = ReviewUpload::default();
  let mut budget = PayloadBudget { remaining: limits.max_payload_size };
  let max_image_size = limits.max_image_size;
  while let Some(item) = payload.next().await {
    let mut field = item.map_err(multipart_error)?;
    let name = field.content_disposition()
      .get_name()
      .unwrap_or_default()
      .to_string();
    match name.as_str() {
      validation::FIELD_TITLE => upload.fields.title = read_text_field(&mut field, &mut budget).await?,
      validation::FIELD_AUTHOR => upload.fields.author = read_text_field(&mut field, &mut budget).await?,
      validation::FIELD_RATING => upload.fields.rating = read_text_field(&mut field, &mut budget).await?,
      validation::FIELD_READ_DATE => upload.fields.read_date = read_text_field(&mut field, &mut budget).await?,
      validation::FIELD_REVIEW => upload.fields.review = read_text_field(&mut field, &mut budget).await?,
      validation::FIELD_IMAGE => {
        let declared = field.content_type()
          .map(|mime| mime.essence_str().to_string());
        match read_field(&mut field, max_image_size, &mut budget).await? {
          (_, 0) => {},
          (Some(data), _) => {
            let mime_type = image_utils::resolve_mime_type(declared.as_deref(), &data);
            upload.image = Some(ReviewImage { data, mime_type });
            upload.image_error = None;
          },
          (None, size) => {
            upload.image = None;
            upload.image_error = validation::validate_image_size(size, max_image_size).err();
          }
        }
      },
      // Whatever else the client sent us gets ignored.
      _ => {
        read_field(&mut field, 0, &mut budget).await?;
      }
    }
  }
  Ok(upload)
}
