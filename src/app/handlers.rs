use actix_web::{
  http::header,
  web,
  HttpResponse,
  Result
};
use actix_multipart::Multipart;
use crate::db::entities::*;
use crate::db;
use crate::utils::time_utils;
use crate::validation::{self, ValidReview};
use log::{error, info};
use super::dtos::*;
use super::error::{Error, map_db_error};
use super::multipart::{read_review_form, ReviewUpload};
use super::AppState;

// Module with all the API handler functions.
// Every handler returns a Result, see the "error"
// module for the Error to response conversions.

fn review_not_found(id: i64) -> Error {
  Error::NotFound(format!("Review {} does not exist", id))
}

// An UPDATE that touched no row: if the review is gone it
// got deleted concurrently, anything else is a mystery.
fn unchanged_update(id: i64, still_exists: bool) -> Error {
  if still_exists {
    error!("Update of review {} touched no row although it exists", id);
    Error::Conflict(format!("Concurrent update on review {}", id))
  } else {
    review_not_found(id)
  }
}

// Field rules and the image size check end up in the
// same list of per-field messages.
fn validated(upload: &ReviewUpload) -> Result<ValidReview, Error> {
  let checked = validation::validate_review(&upload.fields, time_utils::today());
  match (checked, &upload.image_error) {
    (Ok(valid), None) => Ok(valid),
    (Ok(_), Some(image_error)) => {
      let mut errors = validation::FieldErrors::new();
      errors.add(validation::FIELD_IMAGE, image_error.clone());
      Err(Error::ValidationFailed(errors))
    },
    (Err(mut errors), image_error) => {
      if let Some(message) = image_error {
        errors.add(validation::FIELD_IMAGE, message.clone());
      }
      Err(Error::ValidationFailed(errors))
    }
  }
}

// Default response when no route matched the request:
pub async fn not_found() -> Result<HttpResponse, Error> {
  Err(Error::NotFound(String::from("Endpoint doesn't exist")))
}

pub async fn all_reviews(
  app_state: web::Data<AppState>
) -> Result<HttpResponse, Error> {
  let reviews: Vec<ReviewDto> = db::all_reviews(&app_state.pool)
    .map_err(map_db_error)?
    .into_iter()
    .map(Into::into)
    .collect();
  Ok(HttpResponse::Ok().json(reviews))
}

// Path variables have to be in a tuple.
pub async fn review(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>
) -> Result<HttpResponse, Error> {
  let id = path.into_inner().0;
  match db::review_by_id(&app_state.pool, id).map_err(map_db_error)? {
    Some(review) => Ok(HttpResponse::Ok().json(ReviewDto::from(review))),
    None => Err(review_not_found(id))
  }
}

pub async fn create_review(
  app_state: web::Data<AppState>,
  payload: Multipart
) -> Result<HttpResponse, Error> {
  let upload = read_review_form(payload, &app_state.limits).await?;
  let valid = validated(&upload)?;
  let mut review = Review::new(valid, upload.image);

  db::insert_review(&app_state.pool, &mut review)
    .map_err(|e| {
      error!("Could not insert a review - {:?}", e);
      Error::DatabaseError(format!("Failed to insert review - {}", e))
    })?;
  info!("Created review {}", review.id);

  Ok(
    HttpResponse::Created()
      .insert_header((header::LOCATION, format!("/reviews/{}", review.id)))
      .json(CreatedReviewDto::from(review))
  )
}

// The existence check comes first: an unknown id is a 404
// no matter what the form looks like. The image is only
// replaced when the form has one.
pub async fn update_review(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>,
  payload: Multipart
) -> Result<HttpResponse, Error> {
  let id = path.into_inner().0;
  if !db::review_exists(&app_state.pool, id).map_err(map_db_error)? {
    return Err(review_not_found(id));
  }

  let upload = read_review_form(payload, &app_state.limits).await?;
  let valid = validated(&upload)?;
  let update = ReviewUpdate::new(id, valid, upload.image);

  let updated = db::update_review(&app_state.pool, &update)
    .map_err(map_db_error)?;
  if !updated {
    let still_exists = db::review_exists(&app_state.pool, id)
      .map_err(map_db_error)?;
    return Err(unchanged_update(id, still_exists));
  }
  info!("Updated review {}", id);

  Ok(HttpResponse::NoContent().finish())
}

pub async fn delete_review(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>
) -> Result<HttpResponse, Error> {
  let id = path.into_inner().0;
  if db::delete_review(&app_state.pool, id).map_err(map_db_error)? {
    info!("Deleted review {}", id);
    Ok(HttpResponse::NoContent().finish())
  } else {
    Err(review_not_found(id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{http::StatusCode, ResponseError};

  #[test]
  fn vanished_review_is_not_found() {
    let e = unchanged_update(3, false);
    assert!(matches!(e, Error::NotFound(_)));
    assert_eq!(StatusCode::NOT_FOUND, e.status_code());
  }

  #[test]
  fn untouched_existing_review_is_a_conflict() {
    let e = unchanged_update(3, true);
    assert!(matches!(e, Error::Conflict(_)));
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, e.status_code());
    assert_eq!("Internal Server Error", e.to_string());
  }

  #[test]
  fn image_error_joins_the_field_errors() {
    let upload = ReviewUpload {
      image_error: Some("Image size must be less than 5MB.".to_string()),
      ..ReviewUpload::default()
    };
    match validated(&upload) {
      Err(Error::ValidationFailed(errors)) => {
        assert_eq!(Some("Image size must be less than 5MB."), errors.get("image"));
        assert_eq!(Some("Title is required."), errors.get("title"));
      },
      other => panic!("Expected a validation failure, got {:?}", other.map(|_| ()))
    }
  }
}
