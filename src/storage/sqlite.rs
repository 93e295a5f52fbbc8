//! SQLite storage implementation

use std::path::Path;
use chrono::{DateTime, Local, NaiveDateTime};
use rusqlite::{Connection, params, OptionalExtension};
use crate::{Result, Error};
use crate::media::{MediaEntry, MediaType, NewEntry};
use super::schema::{self, ENTRY_COLUMNS, TIMESTAMP_FORMAT};

/// Title matching rules for [`MediaStore::search`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Substring match instead of whole-title match
    pub fuzzy: bool,
    pub case_sensitive: bool,
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fuzzy: true,
            case_sensitive: false,
            max_results: 50,
        }
    }
}

/// Per-year aggregate row
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub movies: usize,
    pub dramas: usize,
    /// Mean of non-zero ratings, 0.0 when nothing in the year is rated
    pub average_rating: f64,
}

/// SQLite-backed storage for watched entries
pub struct MediaStore {
    conn: Connection,
    rating_scale: f64,
}

impl MediaStore {
    /// Open a database file (creates it and its directory if missing)
    pub fn open(path: &Path, rating_scale: f64) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        tracing::debug!("Opened media store at {}", path.display());
        Self::with_connection(conn, rating_scale)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory(rating_scale: f64) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, rating_scale)
    }

    fn with_connection(conn: Connection, rating_scale: f64) -> Result<Self> {
        let store = Self {
            conn,
            rating_scale: rating_scale.min(schema::MAX_STORED_RATING),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Upper bound applied to ratings on every write
    pub fn rating_scale(&self) -> f64 {
        self.rating_scale
    }

    // ========== Write Operations ==========

    /// Insert a new entry watched "now" and return its id
    pub fn create(&self, entry: &NewEntry) -> Result<i64> {
        self.insert_watched_at(entry, Local::now().naive_local())
    }

    pub(crate) fn insert_watched_at(&self, entry: &NewEntry, watched: NaiveDateTime) -> Result<i64> {
        entry.validate(self.rating_scale)?;
        self.conn.execute(
            r#"
            INSERT INTO media (title, type, rating, comment, date_watched)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                entry.title,
                entry.media_type.as_str(),
                entry.rating,
                entry.comment,
                watched.format(TIMESTAMP_FORMAT).to_string(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, title = %entry.title, media_type = %entry.media_type, "inserted entry");
        Ok(id)
    }

    /// Replace the editable fields of an entry and re-stamp its watched date
    pub fn update_by_id(&self, id: i64, entry: &NewEntry) -> Result<()> {
        entry.validate(self.rating_scale)?;
        let now = Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string();
        let changed = self.conn.execute(
            r#"
            UPDATE media
            SET title = ?1, type = ?2, rating = ?3, comment = ?4, date_watched = ?5
            WHERE id = ?6
            "#,
            params![
                entry.title,
                entry.media_type.as_str(),
                entry.rating,
                entry.comment,
                now,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("No entry found with ID {}", id)));
        }
        tracing::debug!(id, "updated entry");
        Ok(())
    }

    /// Delete an entry by id, returning the number of rows removed
    pub fn delete_by_id(&self, id: i64) -> Result<usize> {
        let count = self.conn.execute("DELETE FROM media WHERE id = ?1", [id])?;
        tracing::debug!(id, count, "delete by id");
        Ok(count)
    }

    /// Delete an entry by id, only if it has the given type
    pub fn delete_by_id_and_type(&self, id: i64, media_type: MediaType) -> Result<usize> {
        let count = self.conn.execute(
            "DELETE FROM media WHERE id = ?1 AND type = ?2",
            params![id, media_type.as_str()],
        )?;
        tracing::debug!(id, %media_type, count, "delete by id and type");
        Ok(count)
    }

    /// Delete every entry with an exact title and type
    pub fn delete_by_title_and_type(&self, title: &str, media_type: MediaType) -> Result<usize> {
        let count = self.conn.execute(
            "DELETE FROM media WHERE title = ?1 AND type = ?2",
            params![title, media_type.as_str()],
        )?;
        tracing::debug!(title, %media_type, count, "delete by title and type");
        Ok(count)
    }

    /// Delete all entries
    pub fn delete_all(&self) -> Result<usize> {
        let count = self.conn.execute("DELETE FROM media", [])?;
        tracing::debug!(count, "delete all");
        Ok(count)
    }

    /// Delete all entries of one type
    pub fn delete_all_by_type(&self, media_type: MediaType) -> Result<usize> {
        let count = self
            .conn
            .execute("DELETE FROM media WHERE type = ?1", [media_type.as_str()])?;
        tracing::debug!(%media_type, count, "delete all by type");
        Ok(count)
    }

    // ========== Read Operations ==========

    /// Get an entry by id
    pub fn find_by_id(&self, id: i64) -> Result<MediaEntry> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM media WHERE id = ?1");
        self.conn
            .query_row(&sql, [id], row_to_entry)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("No entry found with ID {}", id)))
    }

    /// Get an entry by id, only if it has the given type
    pub fn find_by_id_and_type(&self, id: i64, media_type: MediaType) -> Result<MediaEntry> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM media WHERE id = ?1 AND type = ?2");
        self.conn
            .query_row(&sql, params![id, media_type.as_str()], row_to_entry)
            .optional()?
            .ok_or_else(|| {
                Error::NotFound(format!("No entry found with ID {} ({})", id, media_type))
            })
    }

    /// Find every entry with an exact, case-sensitive title and type
    pub fn find_all_by_title_and_type(&self, title: &str, media_type: MediaType) -> Result<Vec<MediaEntry>> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM media WHERE title = ?1 AND type = ?2 ORDER BY id DESC"
        );
        let entries = self.query_entries(&sql, params![title, media_type.as_str()])?;
        if entries.is_empty() {
            return Err(Error::NotFound(format!(
                "Entry not found for \"{}\" ({})",
                title, media_type
            )));
        }
        Ok(entries)
    }

    /// All entries, most recently created first
    pub fn list_all(&self) -> Result<Vec<MediaEntry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM media ORDER BY id DESC");
        self.query_entries(&sql, [])
    }

    /// Distinct watched years, newest first
    pub fn list_years(&self) -> Result<Vec<i32>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT DISTINCT CAST(strftime('%Y', date_watched) AS INTEGER) AS year
            FROM media
            WHERE strftime('%Y', date_watched) IS NOT NULL
            ORDER BY year DESC
            "#,
        )?;
        let years = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i32>>>()?;
        Ok(years)
    }

    /// Entries watched in a given year, most recently created first
    pub fn list_by_year(&self, year: i32) -> Result<Vec<MediaEntry>> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM media WHERE strftime('%Y', date_watched) = ?1 ORDER BY id DESC"
        );
        self.query_entries(&sql, [format!("{:04}", year)])
    }

    /// Search titles, optionally restricted to one type
    pub fn search(&self, query: &str, media_type: Option<MediaType>, options: &SearchOptions) -> Result<Vec<MediaEntry>> {
        let predicate = match (options.fuzzy, options.case_sensitive) {
            (true, true) => "instr(title, ?1) > 0",
            (true, false) => "instr(lower(title), lower(?1)) > 0",
            (false, true) => "title = ?1",
            (false, false) => "lower(title) = lower(?1)",
        };
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM media
             WHERE {predicate} AND (?2 IS NULL OR type = ?2)
             ORDER BY id DESC
             LIMIT ?3"
        );
        self.query_entries(
            &sql,
            params![
                query,
                media_type.map(|t| t.as_str()),
                options.max_results as i64
            ],
        )
    }

    fn query_entries<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<MediaEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let entries = stmt
            .query_map(params, row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    // ========== Aggregate Queries ==========

    /// Count all entries
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM media", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count entries of one type
    pub fn count_by_type(&self, media_type: MediaType) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM media WHERE type = ?1",
            [media_type.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Mean rating, ignoring entries rated exactly zero.
    ///
    /// Returns 0.0 when there is nothing to average.
    pub fn average_rating(&self, media_type: Option<MediaType>) -> Result<f64> {
        let avg: Option<f64> = self.conn.query_row(
            "SELECT AVG(rating) FROM media WHERE rating > 0 AND (?1 IS NULL OR type = ?1)",
            [media_type.map(|t| t.as_str())],
            |row| row.get(0),
        )?;
        Ok(avg.unwrap_or(0.0))
    }

    /// Every stored rating, missing ones read as zero
    pub fn ratings(&self) -> Result<Vec<f64>> {
        let mut stmt = self.conn.prepare("SELECT rating FROM media")?;
        let ratings = stmt
            .query_map([], |row| row.get::<_, Option<f64>>(0))?
            .map(|r| r.map(|rating| rating.unwrap_or(0.0)))
            .collect::<rusqlite::Result<Vec<f64>>>()?;
        Ok(ratings)
    }

    /// Per-year type counts and average rating, newest year first
    pub fn year_summaries(&self) -> Result<Vec<YearSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT CAST(strftime('%Y', date_watched) AS INTEGER) AS year,
                   SUM(CASE WHEN type = 'movie' THEN 1 ELSE 0 END),
                   SUM(CASE WHEN type = 'drama' THEN 1 ELSE 0 END),
                   AVG(CASE WHEN rating > 0 THEN rating END)
            FROM media
            WHERE strftime('%Y', date_watched) IS NOT NULL
            GROUP BY year
            ORDER BY year DESC
            "#,
        )?;
        let summaries = stmt
            .query_map([], |row| {
                let movies: i64 = row.get(1)?;
                let dramas: i64 = row.get(2)?;
                let average: Option<f64> = row.get(3)?;
                Ok(YearSummary {
                    year: row.get(0)?,
                    movies: movies as usize,
                    dramas: dramas as usize,
                    average_rating: average.unwrap_or(0.0),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(summaries)
    }

    /// Latest watched date, `None` for an empty store
    pub fn last_watched(&self) -> Result<Option<NaiveDateTime>> {
        let latest: Option<String> =
            self.conn
                .query_row("SELECT MAX(date_watched) FROM media", [], |row| row.get(0))?;
        latest.as_deref().map(parse_timestamp).transpose()
    }
}

/// Helper to convert a row to a MediaEntry
fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<MediaEntry> {
    let type_str: String = row.get(2)?;
    let media_type: MediaType = type_str.parse().map_err(|e: Error| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let watched_str: String = row.get(5)?;
    let watched_date = parse_timestamp(&watched_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;

    // created_at is informational; an unreadable value falls back to the epoch
    let created_str: Option<String> = row.get(6)?;
    let created_at = created_str
        .as_deref()
        .and_then(|s| parse_timestamp(s).ok())
        .unwrap_or_default();

    Ok(MediaEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        media_type,
        rating: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
        comment: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        watched_date,
        created_at,
    })
}

/// Parse a stored timestamp, trying each format the table may contain
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    const FORMATS: &[&str] = &[
        TIMESTAMP_FORMAT,
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S%.fZ",
    ];

    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.naive_local());
    }

    Err(Error::Timestamp(format!("unable to parse time: {}", value)))
}
