pub mod icons;
pub mod output;
pub mod prompt;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::Printer;
pub use table::{entry_table, stats_table, ColumnWidths, TableBuilder};
pub use theme::Theme;
