// src/domain/channels.rs

use crate::domain::pricing::final_price;
use crate::errors::ServerError;
use serde::{Deserialize, Serialize};

/// What a channel sells one room type as, and how its price departs from the base rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub room_id: String,
    pub display_name: String,
    pub discount_percent: f64,
    pub flat_adjustment: i64,
}

impl Promotion {
    pub fn new_default(channel: &str, room_id: &str) -> Self {
        Self {
            room_id: room_id.to_string(),
            display_name: format!("{channel}_{room_id}"),
            discount_percent: 0.0,
            flat_adjustment: 0,
        }
    }

    pub fn price(&self, base_price: i64) -> i64 {
        final_price(base_price, self.discount_percent, self.flat_adjustment)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub promotions: Vec<Promotion>,
}

impl Channel {
    pub fn new<'a>(name: &str, room_ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            name: name.to_string(),
            promotions: room_ids
                .into_iter()
                .map(|rid| Promotion::new_default(name, rid))
                .collect(),
        }
    }

    pub fn promotion(&self, room_id: &str) -> Option<&Promotion> {
        self.promotions.iter().find(|p| p.room_id == room_id)
    }
}

/// Sales channels in the order the operator added them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelBook {
    pub channels: Vec<Channel>,
}

impl ChannelBook {
    pub fn with_default<'a>(name: &str, room_ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            channels: vec![Channel::new(name, room_ids)],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Returns `false` when a channel with that name already exists.
    pub fn add_channel<'a>(
        &mut self,
        name: &str,
        room_ids: impl IntoIterator<Item = &'a str>,
    ) -> Result<bool, ServerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServerError::BadRequest("channel name must not be empty".into()));
        }
        if self.get(name).is_some() {
            return Ok(false);
        }
        self.channels.push(Channel::new(name, room_ids));
        Ok(true)
    }

    /// Matches the trimmed name, the same key `add_channel` stores.
    pub fn remove_channel(&mut self, name: &str) -> bool {
        let name = name.trim();
        let before = self.channels.len();
        self.channels.retain(|c| c.name != name);
        self.channels.len() != before
    }

    pub fn update_promotion(
        &mut self,
        channel: &str,
        room_id: &str,
        display_name: &str,
        discount_percent: f64,
        flat_adjustment: i64,
    ) -> Result<(), ServerError> {
        if !discount_percent.is_finite() {
            return Err(ServerError::BadRequest("discount must be a number".into()));
        }

        let promo = self
            .channels
            .iter_mut()
            .find(|c| c.name == channel)
            .ok_or(ServerError::NotFound)?
            .promotions
            .iter_mut()
            .find(|p| p.room_id == room_id)
            .ok_or(ServerError::NotFound)?;

        promo.display_name = display_name.trim().to_string();
        promo.discount_percent = discount_percent;
        promo.flat_adjustment = flat_adjustment;
        Ok(())
    }
}
