#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the fatality map application.
//!
//! Loads every input table once at startup and serves filter options,
//! per-county totals, and ready-to-draw choropleth figures. The dataset is
//! immutable after load and shared between workers through an [`Arc`], so
//! requests never contend on anything.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use fatality_map_ingest::{DataPaths, Dataset};

/// Shared application state.
pub struct AppState {
    /// Every input table, read-only.
    pub dataset: Arc<Dataset>,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/filters", web::get().to(handlers::filters))
            .route("/totals", web::get().to(handlers::totals))
            .route("/map", web::get().to(handlers::map)),
    );
}

/// Starts the fatality map API server.
///
/// Loads the dataset named by `paths` and binds to `BIND_ADDR`/`PORT`
/// (default `127.0.0.1:8080`). The caller is responsible for providing the
/// async runtime (e.g. via `#[actix_web::main]`) and for initializing the
/// logger.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the dataset cannot be loaded, the
/// HTTP server fails to bind, or it encounters a runtime error.
pub async fn run_server(paths: DataPaths) -> std::io::Result<()> {
    log::info!("Loading dataset...");
    let dataset = Dataset::load(&paths).map_err(std::io::Error::other)?;

    let state = web::Data::new(AppState {
        dataset: Arc::new(dataset),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
