use crate::app::AppState;
use crate::config::AppConfig;
use crate::db::{init_db, Database};
use crate::router::handle;
use astra::Server;
use std::net::SocketAddr;

mod app;
mod config;
mod db;
mod domain;
mod errors;
mod logging;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    logging::init_tracing();

    let config = match AppConfig::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let db = Database::new(config.server.database.clone());
    if let Err(e) = init_db(&db, &config.server.schema) {
        tracing::error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    let addr: SocketAddr = match config.server.bind.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(bind = %config.server.bind, error = %e, "invalid bind address");
            std::process::exit(1);
        }
    };
    tracing::info!(
        %addr,
        rooms = config.rate_card.rooms.len(),
        periods = config.rate_card.periods.len(),
        "starting server"
    );

    let server = Server::bind(&addr).max_workers(config.server.max_workers);
    let app = AppState::new(db, config);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => templates::html_error_response(err),
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
    }

    tracing::info!("server shut down");
}
