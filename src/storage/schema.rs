//! Database schema definitions

/// SQL to create the media table
pub const CREATE_MEDIA_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS media (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    type TEXT CHECK(type IN ('movie', 'drama')) NOT NULL,
    rating REAL CHECK(rating >= 0 AND rating <= 5),
    comment TEXT,
    date_watched DATETIME NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_media_type ON media(type)",
    "CREATE INDEX IF NOT EXISTS idx_media_rating ON media(rating)",
    "CREATE INDEX IF NOT EXISTS idx_media_date_watched ON media(date_watched)",
];

/// Columns selected for every entry query, in `row_to_entry` order
pub const ENTRY_COLUMNS: &str = "id, title, type, rating, comment, date_watched, created_at";

/// Upper bound enforced by the `rating` CHECK constraint
pub const MAX_STORED_RATING: f64 = 5.0;

/// Format used when writing timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_MEDIA_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
