use crate::media::MediaEntry;
use tabled::{
    settings::{object::Columns, Modify, Style, Width},
    Table, Tabled,
};

const MIN_TERMINAL_WIDTH: usize = 80;
const MAX_TERMINAL_WIDTH: usize = 200;
const FALLBACK_TERMINAL_WIDTH: usize = 120;
/// Vertical borders drawn around six columns
const BORDER_SPACE: usize = 7;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

/// Content widths of the truncated entry columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidths {
    pub title: usize,
    pub comment: usize,
}

impl ColumnWidths {
    pub fn for_terminal_width(width: usize) -> Self {
        let width = width.clamp(MIN_TERMINAL_WIDTH, MAX_TERMINAL_WIDTH);
        let content = (width - BORDER_SPACE) as f64;
        Self {
            title: ((content * 0.35) as usize).max(20),
            comment: ((content * 0.25) as usize).max(15),
        }
    }

    pub fn detect() -> Self {
        let width = match console::Term::stdout().size_checked() {
            Some((_, cols)) => cols as usize,
            None => FALLBACK_TERMINAL_WIDTH,
        };
        Self::for_terminal_width(width)
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    media_type: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Date Watched")]
    watched: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

/// Render entries as a table, truncating long titles and comments
pub fn entry_table(entries: &[MediaEntry], date_format: &str, widths: ColumnWidths) -> String {
    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|entry| EntryRow {
            id: entry.id,
            title: entry.title.clone(),
            media_type: entry.media_type.to_string(),
            rating: format!("{:.1}", entry.rating),
            watched: entry.watched_date.format(date_format).to_string(),
            comment: entry.comment.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Columns::single(1)).with(Width::truncate(widths.title).suffix("...")))
        .with(Modify::new(Columns::single(5)).with(Width::truncate(widths.comment).suffix("...")));
    table.to_string()
}

pub fn stats_table(stats: &[(&str, String)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaType;
    use chrono::NaiveDate;

    fn entry(title: &str, comment: &str) -> MediaEntry {
        let watched = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        MediaEntry {
            id: 7,
            title: title.to_string(),
            media_type: MediaType::Drama,
            rating: 4.0,
            comment: comment.to_string(),
            watched_date: watched,
            created_at: watched,
        }
    }

    #[test]
    fn test_widths_clamped_to_terminal_bounds() {
        assert_eq!(
            ColumnWidths::for_terminal_width(10),
            ColumnWidths::for_terminal_width(MIN_TERMINAL_WIDTH)
        );
        assert_eq!(
            ColumnWidths::for_terminal_width(1000),
            ColumnWidths::for_terminal_width(MAX_TERMINAL_WIDTH)
        );
        let narrow = ColumnWidths::for_terminal_width(80);
        assert_eq!(narrow, ColumnWidths { title: 25, comment: 18 });
    }

    #[test]
    fn test_entry_table_formats_and_truncates() {
        let long_comment = "a".repeat(100);
        let table = entry_table(
            &[entry("Reply 1988", &long_comment)],
            "%b %d, %Y",
            ColumnWidths { title: 20, comment: 15 },
        );

        assert!(table.contains("Reply 1988"));
        assert!(table.contains("Mar 09, 2024"));
        assert!(table.contains("4.0"));
        assert!(table.contains("drama"));
        assert!(table.contains("..."));
        assert!(!table.contains(&long_comment));
    }

    #[test]
    fn test_stats_table_empty() {
        assert!(stats_table(&[]).is_empty());
        let table = stats_table(&[("Total", "3".to_string())]);
        assert!(table.contains("Metric"));
        assert!(table.contains("Total"));
    }
}
