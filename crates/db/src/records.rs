use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::params;
use units_core::{MEASUREMENT, Record};

use crate::Db;
use crate::error::{DbError, Result};

impl Db {
    /// Writes every field of every record in one transaction. Returns the
    /// number of records written.
    pub fn insert_records(&mut self, records: &[Record]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0usize;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO unit_record (measurement, ts, ts_ms, field, value, tags_json)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;
            for record in records {
                let ts = record.time.to_rfc3339_opts(SecondsFormat::Millis, true);
                let tags = if record.tags.is_empty() {
                    None
                } else {
                    Some(serde_json::to_string(&record.tags)?)
                };
                let mut rows = 0usize;
                for (field, value) in &record.fields {
                    rows += stmt.execute(params![
                        MEASUREMENT,
                        ts,
                        record.time.timestamp_millis(),
                        field,
                        value,
                        tags,
                    ])?;
                }
                if rows > 0 {
                    inserted += 1;
                }
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    pub fn first_timestamp(&self, field: &str) -> Result<Option<DateTime<Utc>>> {
        self.boundary_timestamp("MIN", field)
    }

    pub fn last_timestamp(&self, field: &str) -> Result<Option<DateTime<Utc>>> {
        self.boundary_timestamp("MAX", field)
    }

    pub fn count_records(&self, field: &str) -> Result<u64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM unit_record WHERE measurement = ?1 AND field = ?2",
            params![MEASUREMENT, field],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// Field values with `start <= ts < stop`, oldest first.
    pub(crate) fn load_points(
        &self,
        field: &str,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    ) -> Result<Vec<(DateTime<Utc>, f64)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT ts_ms, value
            FROM unit_record
            WHERE measurement = ?1 AND field = ?2 AND ts_ms >= ?3 AND ts_ms < ?4
            ORDER BY ts_ms ASC
            "#,
        )?;
        let rows = stmt.query_map(
            params![
                MEASUREMENT,
                field,
                start.timestamp_millis(),
                stop.timestamp_millis()
            ],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?)),
        )?;
        let mut points = Vec::new();
        for row in rows {
            let (millis, value) = row?;
            points.push((millis_to_utc(millis)?, value));
        }
        Ok(points)
    }

    fn boundary_timestamp(&self, aggregate: &str, field: &str) -> Result<Option<DateTime<Utc>>> {
        let sql = format!(
            "SELECT {aggregate}(ts_ms) FROM unit_record WHERE measurement = ?1 AND field = ?2"
        );
        let millis = self
            .conn
            .query_row(&sql, params![MEASUREMENT, field], |row| {
                row.get::<_, Option<i64>>(0)
            })?;
        millis.map(millis_to_utc).transpose()
    }
}

fn millis_to_utc(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or(DbError::InvalidTimestamp(millis))
}
