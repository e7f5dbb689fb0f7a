// src/db/channels.rs
use crate::domain::channels::{Channel, ChannelBook, Promotion};
use crate::errors::ServerError;
use rusqlite::{params, Connection};

/// Loads the channel book; promotions come back in room order of insertion.
pub fn load_channel_book(conn: &Connection) -> Result<ChannelBook, ServerError> {
    let mut stmt = conn
        .prepare("select name from channels order by position")
        .map_err(|e| ServerError::DbError(e.to_string()))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| ServerError::DbError(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut promo_stmt = conn
        .prepare(
            r#"
            select room_id, display_name, discount_percent, flat_adjustment
            from promotions
            where channel = ?
            order by rowid
            "#,
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut channels = Vec::with_capacity(names.len());
    for name in names {
        let promotions = promo_stmt
            .query_map(params![name], |row| {
                Ok(Promotion {
                    room_id: row.get(0)?,
                    display_name: row.get(1)?,
                    discount_percent: row.get(2)?,
                    flat_adjustment: row.get(3)?,
                })
            })
            .map_err(|e| ServerError::DbError(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()?;
        channels.push(Channel { name, promotions });
    }

    Ok(ChannelBook { channels })
}

/// Overwrites the stored book with `book`.
pub fn save_channel_book(conn: &mut Connection, book: &ChannelBook) -> Result<(), ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    tx.execute_batch("delete from promotions; delete from channels;")
        .map_err(|e| ServerError::DbError(format!("clear channels failed: {e}")))?;

    for (position, channel) in book.channels.iter().enumerate() {
        tx.execute(
            "insert into channels (name, position) values (?, ?)",
            params![channel.name, position as i64],
        )
        .map_err(|e| ServerError::DbError(format!("insert channel failed: {e}")))?;

        for promo in &channel.promotions {
            tx.execute(
                r#"
                insert into promotions (channel, room_id, display_name, discount_percent, flat_adjustment)
                values (?, ?, ?, ?, ?)
                "#,
                params![
                    channel.name,
                    promo.room_id,
                    promo.display_name,
                    promo.discount_percent,
                    promo.flat_adjustment
                ],
            )
            .map_err(|e| ServerError::DbError(format!("insert promotion failed: {e}")))?;
        }
    }

    tx.commit()
        .map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(())
}

/// Stored book, or a fresh one holding `default_channel` when nothing is stored yet.
///
/// Rooms added to the config after a channel was created get a default promotion.
pub fn load_or_seed_channel_book<'a>(
    conn: &mut Connection,
    default_channel: &str,
    room_ids: impl IntoIterator<Item = &'a str> + Clone,
) -> Result<ChannelBook, ServerError> {
    let mut book = load_channel_book(conn)?;
    let mut dirty = false;

    if book.channels.is_empty() {
        book = ChannelBook::with_default(default_channel, room_ids.clone());
        dirty = true;
    }

    for channel in &mut book.channels {
        for rid in room_ids.clone() {
            if channel.promotion(rid).is_none() {
                channel.promotions.push(Promotion::new_default(&channel.name, rid));
                dirty = true;
            }
        }
    }

    if dirty {
        save_channel_book(conn, &book)?;
    }
    Ok(book)
}
