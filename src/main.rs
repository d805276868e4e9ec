use color_eyre::Result;
use eyre::WrapErr;
use dotenv::dotenv;
use std::env;
use book_reviews::app;
// Has to be the crate module, there's also a
// dependency called "config".
use book_reviews::config::Config;

#[actix_web::main]
async fn main() -> Result<()> {
  dotenv().ok();
  // Default to info logging when RUST_LOG is absent,
  // otherwise the request logger stays silent.
  if env::var("RUST_LOG").is_err() {
    env::set_var("RUST_LOG", "info");
  }
  env_logger::init();
  color_eyre::install()?;

  let config = Config::from_env()
    .context("Configuration (environment or .env file) is invalid")?;
  app::run(config).await
}
