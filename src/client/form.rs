use log::error;
use crate::app::dtos::ReviewDto;
use crate::utils::time_utils;
use crate::validation::{self, FieldErrors, ReviewFields, DEFAULT_MAX_IMAGE_SIZE};
use super::{ClientError, ImageFile, ReviewSubmission};

// A fresh form starts at one star.
const DEFAULT_RATING: &'static str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
  Create,
  Edit
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Title,
  Author,
  Rating,
  ReadDate,
  Review
}

impl Field {
  pub const ALL: [Field; 5] = [
    Field::Title, Field::Author, Field::Rating, Field::ReadDate, Field::Review
  ];

  pub fn name(&self) -> &'static str {
    match self {
      Field::Title => validation::FIELD_TITLE,
      Field::Author => validation::FIELD_AUTHOR,
      Field::Rating => validation::FIELD_RATING,
      Field::ReadDate => validation::FIELD_READ_DATE,
      Field::Review => validation::FIELD_REVIEW
    }
  }
}

/// State of the add/edit form.
///
/// Each field is validated whenever it changes or loses focus,
/// and everything is validated again on submit. The submit
/// handler only runs when all fields pass.
#[derive(Debug, Clone)]
pub struct ReviewForm {
  mode: FormMode,
  fields: ReviewFields,
  image: Option<ImageFile>,
  errors: FieldErrors,
  max_image_size: usize,
  populated: bool
}

impl ReviewForm {

  pub fn new(mode: FormMode, max_image_size: usize) -> Self {
    Self {
      mode,
      fields: ReviewFields {
        rating: DEFAULT_RATING.to_string(),
        ..ReviewFields::default()
      },
      image: None,
      errors: FieldErrors::new(),
      max_image_size,
      populated: false
    }
  }

  pub fn for_create() -> Self {
    Self::new(FormMode::Create, DEFAULT_MAX_IMAGE_SIZE)
  }

  pub fn for_edit() -> Self {
    Self::new(FormMode::Edit, DEFAULT_MAX_IMAGE_SIZE)
  }

  pub fn mode(&self) -> FormMode {
    self.mode
  }

  // Only the first call does anything, later ones would
  // overwrite what the user already typed.
  // The stored image isn't copied in: leaving it out of the
  // update keeps it on the server.
  pub fn populate(&mut self, review: &ReviewDto) -> bool {
    if self.populated {
      return false;
    }
    self.fields = ReviewFields {
      title: review.title.clone(),
      author: review.author.clone(),
      rating: review.rating.to_string(),
      read_date: time_utils::date_to_string(&review.read_date),
      review: review.review.clone()
    };
    self.populated = true;
    true
  }

  pub fn value(&self, field: Field) -> &str {
    match field {
      Field::Title => &self.fields.title,
      Field::Author => &self.fields.author,
      Field::Rating => &self.fields.rating,
      Field::ReadDate => &self.fields.read_date,
      Field::Review => &self.fields.review
    }
  }

  pub fn change(&mut self, field: Field, value: impl Into<String>) {
    let value = value.into();
    match field {
      Field::Title => self.fields.title = value,
      Field::Author => self.fields.author = value,
      Field::Rating => self.fields.rating = value,
      Field::ReadDate => self.fields.read_date = value,
      Field::Review => self.fields.review = value
    }
    self.validate_field(field);
  }

  pub fn blur(&mut self, field: Field) {
    self.validate_field(field);
  }

  /// Keeps the image if it fits. Otherwise the image error is
  /// set and no image is kept, not even an earlier one.
  pub fn select_image(&mut self, image: ImageFile) -> bool {
    let outcome = validation::validate_image_size(image.size(), self.max_image_size);
    self.errors.record(validation::FIELD_IMAGE, &outcome);
    match outcome {
      Ok(()) => {
        self.image = Some(image);
        true
      },
      Err(_) => {
        self.image = None;
        false
      }
    }
  }

  pub fn remove_image(&mut self) {
    self.image = None;
    self.errors.clear(validation::FIELD_IMAGE);
  }

  pub fn image(&self) -> Option<&ImageFile> {
    self.image.as_ref()
  }

  pub fn errors(&self) -> &FieldErrors {
    &self.errors
  }

  pub fn error(&self, field: Field) -> Option<&str> {
    self.errors.get(field.name())
  }

  fn validate_field(&mut self, field: Field) -> bool {
    let value = self.value(field);
    let outcome = match field {
      Field::Title => validation::validate_title(value),
      Field::Author => validation::validate_author(value),
      Field::Rating => validation::validate_rating(value).map(|_| ()),
      Field::ReadDate => validation::validate_read_date(value, time_utils::today())
        .map(|_| ()),
      Field::Review => validation::validate_review_text(value)
    };
    self.errors.record(field.name(), &outcome);
    outcome.is_ok()
  }

  /// Validates every field and builds the write shape when
  /// they all pass. A rejected image doesn't block anything,
  /// it simply isn't part of the submission.
  pub fn submission(&mut self) -> Option<ReviewSubmission> {
    let mut all_valid = true;
    for field in Field::ALL.iter() {
      all_valid &= self.validate_field(*field);
    }
    if !all_valid {
      return None;
    }
    validation::validate_review(&self.fields, time_utils::today())
      .ok()
      .map(|valid| ReviewSubmission {
        title: valid.title,
        author: valid.author,
        rating: valid.rating,
        read_date: valid.read_date,
        review: valid.review,
        image: self.image.clone()
      })
  }

  /// Runs the handler with the write shape if the form is
  /// valid. A successful create clears the form, an edit
  /// form keeps its values. Validation messages coming back
  /// from the server end up next to the fields.
  pub fn submit<T, F>(&mut self, handler: F) -> Result<T, ClientError>
    where F: FnOnce(ReviewSubmission) -> Result<T, ClientError>
  {
    let submission = match self.submission() {
      Some(s) => s,
      None => return Err(ClientError::Validation(self.errors.clone()))
    };
    match handler(submission) {
      Ok(result) => {
        if self.mode == FormMode::Create {
          self.reset();
        }
        Ok(result)
      },
      Err(ClientError::Validation(server_errors)) => {
        for (field, message) in server_errors.iter() {
          self.errors.add(field, message);
        }
        Err(ClientError::Validation(server_errors))
      },
      Err(e) => {
        error!("Review form submission failed - {}", e);
        Err(e)
      }
    }
  }

  fn reset(&mut self) {
    self.fields = ReviewFields {
      rating: DEFAULT_RATING.to_string(),
      ..ReviewFields::default()
    };
    self.image = None;
    self.errors = FieldErrors::new();
  }

}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, NaiveDate};
  use crate::client::mock::MockApi;
  use crate::client::ReviewApi;

  fn fill(form: &mut ReviewForm) {
    form.change(Field::Title, "Dune");
    form.change(Field::Author, "Herbert");
    form.change(Field::Rating, "5");
    form.change(Field::ReadDate, "2023-01-01");
    form.change(Field::Review, "Great");
  }

  fn image(size: usize) -> ImageFile {
    ImageFile {
      file_name: "cover.jpg".to_string(),
      mime_type: "image/jpeg".to_string(),
      data: vec![0; size]
    }
  }

  #[test]
  fn change_validates_the_field() {
    let mut form = ReviewForm::for_create();
    form.change(Field::Author, "R2D2");
    assert_eq!(
      Some("Author name should contain only alphabetic characters."),
      form.error(Field::Author)
    );
    form.change(Field::Author, "Herbert");
    assert_eq!(None, form.error(Field::Author));
  }

  #[test]
  fn blur_flags_empty_fields() {
    let mut form = ReviewForm::for_create();
    form.blur(Field::Title);
    assert_eq!(Some("Title is required."), form.error(Field::Title));
    // Untouched fields stay quiet until submit.
    assert_eq!(None, form.error(Field::Review));
  }

  #[test]
  fn invalid_form_never_calls_the_handler() {
    let api = MockApi::default();
    let mut form = ReviewForm::for_create();
    form.change(Field::Title, "Dune");
    let tomorrow = time_utils::today() + Duration::days(1);
    form.change(Field::ReadDate, time_utils::date_to_string(&tomorrow));
    let result = form.submit(|s| api.create(&s));
    assert!(matches!(result, Err(ClientError::Validation(_))));
    assert!(api.calls.borrow().is_empty());
    assert_eq!(Some("Author name is required."), form.error(Field::Author));
    assert_eq!(
      Some("Read date cannot be in the future."),
      form.error(Field::ReadDate)
    );
    assert_eq!(Some("Review is required."), form.error(Field::Review));
    // The default rating is fine.
    assert_eq!(None, form.error(Field::Rating));
  }

  #[test]
  fn successful_create_resets_the_form() {
    let api = MockApi::default();
    let mut form = ReviewForm::for_create();
    fill(&mut form);
    assert!(form.select_image(image(10)));
    let created = form.submit(|s| api.create(&s)).unwrap();
    assert_eq!(1, created.id);
    assert!(created.image.is_some());
    assert_eq!("", form.value(Field::Title));
    assert_eq!("1", form.value(Field::Rating));
    assert_eq!(None, form.image());
    assert!(form.errors().is_empty());
  }

  #[test]
  fn failed_create_keeps_the_values() {
    let api = MockApi::default();
    *api.fail_with.borrow_mut() = Some(ClientError::UnexpectedStatus(500));
    let mut form = ReviewForm::for_create();
    fill(&mut form);
    assert!(form.submit(|s| api.create(&s)).is_err());
    assert_eq!("Dune", form.value(Field::Title));
  }

  #[test]
  fn edit_form_is_populated_once_and_not_reset() {
    let api = MockApi::default();
    let mut create = ReviewForm::for_create();
    fill(&mut create);
    create.submit(|s| api.create(&s)).unwrap();
    let stored = api.get(1).unwrap();

    let mut form = ReviewForm::for_edit();
    assert!(form.populate(&stored));
    form.change(Field::Rating, "3");
    // A late refetch must not clobber the user's edits.
    assert!(!form.populate(&stored));
    assert_eq!("3", form.value(Field::Rating));
    assert_eq!("2023-01-01", form.value(Field::ReadDate));

    form.submit(|s| api.update(1, &s)).unwrap();
    assert_eq!("3", form.value(Field::Rating));
    assert_eq!(3, api.get(1).unwrap().rating);
  }

  #[test]
  fn oversized_image_is_not_kept() {
    let mut form = ReviewForm::new(FormMode::Create, 8);
    assert!(!form.select_image(image(9)));
    assert_eq!(None, form.image());
    assert_eq!(
      Some("Image size must be less than 8 bytes."),
      form.errors().get(validation::FIELD_IMAGE)
    );
    assert!(form.select_image(image(8)));
    assert_eq!(None, form.errors().get(validation::FIELD_IMAGE));
  }

  #[test]
  fn rejected_image_replaces_the_earlier_one() {
    let mut form = ReviewForm::new(FormMode::Create, 8);
    fill(&mut form);
    assert!(form.select_image(image(4)));
    assert!(!form.select_image(image(9)));
    assert_eq!(None, form.image());
    assert_eq!(None, form.submission().unwrap().image);
  }

  #[test]
  fn server_validation_errors_show_up_in_the_form() {
    let mut form = ReviewForm::for_create();
    fill(&mut form);
    let result: Result<(), ClientError> = form.submit(|_| {
      let mut errors = FieldErrors::new();
      errors.add("title", "Title must be 255 characters or less.");
      Err(ClientError::Validation(errors))
    });
    assert!(result.is_err());
    assert_eq!(
      Some("Title must be 255 characters or less."),
      form.error(Field::Title)
    );
  }

  #[test]
  fn submission_carries_parsed_values() {
    let mut form = ReviewForm::for_create();
    fill(&mut form);
    let submission = form.submission().unwrap();
    assert_eq!(5, submission.rating);
    assert_eq!(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), submission.read_date);
    assert_eq!(None, submission.image);
  }
}
