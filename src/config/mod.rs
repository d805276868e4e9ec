// Adding the context method to errors:
use eyre::WrapErr;
use color_eyre::Result;
use serde::Deserialize;
use std::convert::From;
use crate::validation::DEFAULT_MAX_IMAGE_SIZE;

// Everything a single create or update request may carry,
// all parts included.
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct Config {
  pub db_path: String,
  pub bind_address: String,
  // Upper bound for uploaded images, in bytes:
  pub max_image_size: usize,
  // Upper bound for a whole multipart body, in bytes:
  pub max_payload_size: usize,
  pub pool_size: u32
}

// The handlers only need the limits, no reason to move
// the whole config (with paths and addresses) into the
// app state.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
  pub max_image_size: usize,
  pub max_payload_size: usize
}

impl From<Config> for Limits {
  fn from(config: Config) -> Self {
    Self {
      max_image_size: config.max_image_size,
      max_payload_size: config.max_payload_size
    }
  }
}

impl Default for Limits {
  fn default() -> Self {
    Self {
      max_image_size: DEFAULT_MAX_IMAGE_SIZE,
      max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE
    }
  }
}

impl Config {

  pub fn from_env() -> Result<Config> {
    // RUST_LOG is already set in main.rs if it
    // was absent.
    // Keys have to be lowercase when compared to
    // what's in the .env file.
    ::config::Config::builder()
      .set_default("db_path", "./book_reviews.db")?
      .set_default("bind_address", "127.0.0.1:8080")?
      .set_default("max_image_size", DEFAULT_MAX_IMAGE_SIZE as u64)?
      .set_default("max_payload_size", DEFAULT_MAX_PAYLOAD_SIZE as u64)?
      .set_default("pool_size", 8)?
      .add_source(::config::Environment::default())
      .build()
      .context("Building configuration")?
      .try_deserialize()
      .context("Loading configuration from env")
  }

}
