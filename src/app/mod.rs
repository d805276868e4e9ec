use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use color_eyre::Result;
use eyre::WrapErr;
use log::{debug, info};
// Has to be crate:: because of the other crate
// named "config" that we use as a dependency.
use crate::config::{Config, Limits};
use crate::db::{self, Pool};
mod handlers;
pub mod dtos;
pub mod error;
mod multipart;

// Declare app state struct:
pub struct AppState {
  pub pool: Pool,
  pub limits: Limits
}

// Function to start the server, called from main.rs
// under #[actix_web::main].
pub async fn run(config: Config) -> Result<()> {
  debug!("Current config: {:?}", config);
  let pool = db::open_pool(&config.db_path, config.pool_size)?;
  db::init_schema(&pool)?;

  // Got to save the bind_address for later because
  // "config" gets moved into app_state as Limits.
  let bind_address = config.bind_address.clone();

  let app_state = web::Data::new(
    AppState {
      pool,
      limits: config.into()
    }
  );

  info!("Starting server on {}", bind_address);
  HttpServer::new(move|| {
    App::new()
      .app_data(app_state.clone())
      // Any origin, any method, any header. Fine for a demo,
      // not something to put in front of real users.
      .wrap(Cors::permissive())
      .wrap(middleware::Logger::default())
      .configure(base_endpoints_config)
      .default_service(web::route().to(handlers::not_found))
  })
  .bind(bind_address)?
  .run()
  .await
  .context("Start Actix web server")
}

// Route configuration:
fn base_endpoints_config(cfg: &mut web::ServiceConfig) {
  cfg.app_data(web::PathConfig::default().error_handler(|_, _| {
      actix_web::error::ErrorBadRequest("Invalid path arguments")
    }))
    .service(
      web::resource("/reviews")
        .route(web::get().to(handlers::all_reviews))
        .route(web::post().to(handlers::create_review))
    )
    .service(
      web::resource("/reviews/{id}")
        .route(web::get().to(handlers::review))
        .route(web::put().to(handlers::update_review))
        .route(web::delete().to(handlers::delete_review))
    );
}
