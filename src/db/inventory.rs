use crate::domain::inventory::InventoryRow;
use crate::errors::ServerError;
use rusqlite::{params, Connection};

/// Replaces (or, with `append`, extends) the working inventory in one transaction.
///
/// An appended row replaces any stored row for the same room and stay date.
pub fn store_working_inventory(
    conn: &mut Connection,
    rows: &[InventoryRow],
    append: bool,
) -> Result<(), ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    if append {
        let mut stmt = tx
            .prepare("delete from working_inventory where stay_date = ? and room_id = ?")
            .map_err(|e| ServerError::DbError(e.to_string()))?;
        for row in rows {
            stmt.execute(params![row.date, row.room_id])
                .map_err(|e| ServerError::DbError(format!("drop stale inventory row failed: {e}")))?;
        }
    } else {
        tx.execute("delete from working_inventory", [])
            .map_err(|e| ServerError::DbError(format!("clear working inventory failed: {e}")))?;
    }

    {
        let mut stmt = tx
            .prepare(
                "insert into working_inventory (stay_date, room_id, available, total) values (?, ?, ?, ?)",
            )
            .map_err(|e| ServerError::DbError(e.to_string()))?;
        for row in rows {
            stmt.execute(params![row.date, row.room_id, row.available, row.total])
                .map_err(|e| ServerError::DbError(format!("insert inventory row failed: {e}")))?;
        }
    }

    tx.commit()
        .map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(())
}

/// Rows in upload order.
pub fn load_working_inventory(conn: &Connection) -> Result<Vec<InventoryRow>, ServerError> {
    let mut stmt = conn
        .prepare("select stay_date, room_id, available, total from working_inventory order by id")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(InventoryRow {
                date: row.get(0)?,
                room_id: row.get(1)?,
                available: row.get(2)?,
                total: row.get(3)?,
            })
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(room: &str, available: i64) -> InventoryRow {
        InventoryRow {
            date: NaiveDate::from_ymd_opt(2026, 10, 4).unwrap(),
            room_id: room.into(),
            available,
            total: 10,
        }
    }

    #[test]
    fn replace_then_append() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(include_str!("../../sql/schema.sql")).unwrap();

        store_working_inventory(&mut conn, &[row("FDB", 1), row("FDE", 2)], false).unwrap();
        store_working_inventory(&mut conn, &[row("HDP", 3)], false).unwrap();
        assert_eq!(load_working_inventory(&conn).unwrap(), vec![row("HDP", 3)]);

        store_working_inventory(&mut conn, &[row("HDT", 4)], true).unwrap();
        assert_eq!(
            load_working_inventory(&conn).unwrap(),
            vec![row("HDP", 3), row("HDT", 4)]
        );
    }

    #[test]
    fn appended_rows_replace_stale_cells() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(include_str!("../../sql/schema.sql")).unwrap();

        store_working_inventory(&mut conn, &[row("FDB", 9), row("FDE", 2)], false).unwrap();
        store_working_inventory(&mut conn, &[row("FDB", 1)], true).unwrap();

        assert_eq!(
            load_working_inventory(&conn).unwrap(),
            vec![row("FDE", 2), row("FDB", 1)]
        );
    }
}
