use derive_more::Display;
use crate::validation::FieldErrors;

#[derive(Debug, Display)]
pub enum ClientError {
  #[display(fmt = "Review not found")]
  NotFound,
  #[display(fmt = "Validation failed")]
  Validation(FieldErrors),
  #[display(fmt = "Unexpected response status {}", _0)]
  UnexpectedStatus(u16),
  #[display(fmt = "Transport error: {}", _0)]
  Transport(String),
  #[display(fmt = "Could not read image file: {}", _0)]
  Image(String)
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
  fn from(e: reqwest::Error) -> Self {
    ClientError::Transport(e.to_string())
  }
}

impl ClientError {

  // What we show to users. Details go to the logs.
  pub fn user_message(&self) -> String {
    match self {
      ClientError::NotFound => "Book review not found.".to_string(),
      ClientError::Validation(errors) => {
        let mut message = String::from("Please fix the following:");
        for (field, error) in errors.iter() {
          message.push_str(&format!("\n  {}: {}", field, error));
        }
        message
      },
      ClientError::Image(e) => format!("Could not read the image: {}", e),
      ClientError::UnexpectedStatus(_) | ClientError::Transport(_) =>
        "An error occurred. Please try again later.".to_string()
    }
  }

}
