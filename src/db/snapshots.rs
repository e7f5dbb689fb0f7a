use crate::domain::channels::ChannelBook;
use crate::domain::inventory::InventoryRow;
use crate::errors::ServerError;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

/// A saved copy of one day's inventory, plus the channel setup in force when it was saved.
#[derive(Debug)]
pub struct Snapshot {
    pub id: i64,
    pub work_date: NaiveDate,
    pub saved_at: i64,
    pub rows: Vec<InventoryRow>,
    /// Absent for snapshots saved before channel setups were stored.
    pub channels: Option<ChannelBook>,
}

#[derive(Debug)]
pub struct SnapshotSummary {
    pub work_date: NaiveDate,
    pub saved_at: i64,
    pub row_count: usize,
}

pub fn save_snapshot(
    conn: &Connection,
    work_date: NaiveDate,
    saved_at: i64,
    rows: &[InventoryRow],
    channels: &ChannelBook,
) -> Result<i64, ServerError> {
    let rows_json = serde_json::to_string(rows)?;
    let channels_json = serde_json::to_string(channels)?;

    conn.execute(
        "insert into snapshots (work_date, saved_at, rows_json, channels_json) values (?, ?, ?, ?)",
        params![work_date, saved_at, rows_json, channels_json],
    )
    .map_err(|e| ServerError::DbError(format!("save snapshot failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

/// Latest snapshot saved for `work_date`, if any.
pub fn get_snapshot_by_date(
    conn: &Connection,
    work_date: NaiveDate,
) -> Result<Option<Snapshot>, ServerError> {
    let found = conn
        .query_row(
            r#"
            select id, work_date, saved_at, rows_json, channels_json
            from snapshots
            where work_date = ?
            order by saved_at desc, id desc
            limit 1
            "#,
            params![work_date],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, NaiveDate>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            },
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("snapshot lookup failed: {e}")))?;

    let Some((id, work_date, saved_at, rows_json, channels_json)) = found else {
        return Ok(None);
    };

    let rows: Vec<InventoryRow> = serde_json::from_str(&rows_json)?;
    let channels = channels_json
        .as_deref()
        .map(serde_json::from_str::<ChannelBook>)
        .transpose()?;

    Ok(Some(Snapshot {
        id,
        work_date,
        saved_at,
        rows,
        channels,
    }))
}

pub fn list_snapshots(conn: &Connection) -> Result<Vec<SnapshotSummary>, ServerError> {
    let mut stmt = conn
        .prepare(
            "select work_date, saved_at, json_array_length(rows_json) from snapshots order by saved_at desc, id desc limit 100",
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(SnapshotSummary {
                work_date: row.get(0)?,
                saved_at: row.get(1)?,
                row_count: row.get::<_, i64>(2)? as usize,
            })
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(include_str!("../../sql/schema.sql")).unwrap();
        conn
    }

    fn row(day: u32, available: i64) -> InventoryRow {
        InventoryRow {
            date: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            room_id: "FDB".into(),
            available,
            total: 20,
        }
    }

    #[test]
    fn round_trips_rows_and_channels() {
        let conn = conn();
        let work_date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let rows = vec![row(5, 3), row(6, 7)];
        let channels = ChannelBook::with_default("Naver", ["FDB"]);

        save_snapshot(&conn, work_date, 1_000, &rows, &channels).unwrap();

        let snap = get_snapshot_by_date(&conn, work_date).unwrap().unwrap();
        assert_eq!(snap.work_date, work_date);
        assert_eq!(snap.rows, rows);
        assert_eq!(snap.channels, Some(channels));
    }

    #[test]
    fn latest_save_of_the_day_wins() {
        let conn = conn();
        let work_date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let channels = ChannelBook::default();
        save_snapshot(&conn, work_date, 1_000, &[row(5, 3)], &channels).unwrap();
        save_snapshot(&conn, work_date, 2_000, &[row(5, 1)], &channels).unwrap();

        let snap = get_snapshot_by_date(&conn, work_date).unwrap().unwrap();
        assert_eq!(snap.saved_at, 2_000);
        assert_eq!(snap.rows[0].available, 1);

        let summaries = list_snapshots(&conn).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].saved_at, 2_000);
        assert_eq!(summaries[0].row_count, 1);
    }

    #[test]
    fn absent_date_is_none() {
        let conn = conn();
        let other = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(get_snapshot_by_date(&conn, other).unwrap().is_none());
    }

    #[test]
    fn snapshot_without_channels_still_loads() {
        let conn = conn();
        conn.execute(
            "insert into snapshots (work_date, saved_at, rows_json) values ('2026-10-02', 5, '[]')",
            [],
        )
        .unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 2).unwrap();
        let snap = get_snapshot_by_date(&conn, date).unwrap().unwrap();
        assert!(snap.rows.is_empty());
        assert!(snap.channels.is_none());
    }
}
