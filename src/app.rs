// src/app.rs
use crate::config::AppConfig;
use crate::db::channels::load_or_seed_channel_book;
use crate::db::connection::Database;
use crate::domain::channels::ChannelBook;
use crate::errors::ServerError;
use chrono::{Local, NaiveDate};

/// Shared, read-only handles passed to every request.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        Self { db, config }
    }

    /// Work date used when saving a snapshot.
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn room_ids(&self) -> Vec<&str> {
        self.config.rate_card.room_ids().collect()
    }

    /// Stored channel book, seeded with the default channel on first use.
    pub fn channel_book(&self) -> Result<ChannelBook, ServerError> {
        let room_ids = self.room_ids();
        self.db.with_conn(|conn| {
            load_or_seed_channel_book(
                conn,
                &self.config.default_channel,
                room_ids.iter().copied(),
            )
        })
    }
}
