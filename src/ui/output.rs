use crate::config::Config;
use crate::ui::{Icons, Theme};
use crate::ErrorKind;
use owo_colors::OwoColorize;

/// Terminal writer carrying the theme and emoji preference
#[derive(Debug, Clone)]
pub struct Printer {
    theme: Theme,
    emojis: bool,
}

impl Printer {
    pub fn new(config: &Config) -> Self {
        Self {
            theme: Theme::detect(),
            emojis: config.display.show_emojis,
        }
    }

    /// No colors, no emojis; used before the config is loaded
    pub fn plain() -> Self {
        Self {
            theme: Theme::plain(),
            emojis: false,
        }
    }

    pub fn with_theme(theme: Theme, emojis: bool) -> Self {
        Self { theme, emojis }
    }

    /// Prefix `text` with `icon` when emojis are enabled
    pub fn icon_line(&self, icon: &str, text: &str) -> String {
        if self.emojis {
            format!("{} {}", icon, text)
        } else {
            text.to_string()
        }
    }

    pub fn header(&self, icon: &str, text: &str) {
        println!("{}", self.icon_line(icon, &text.style(self.theme.header.clone()).to_string()));
    }

    pub fn success(&self, label: &str) {
        println!("{}", self.icon_line(Icons::CHECK, &label.style(self.theme.success.clone()).to_string()));
    }

    pub fn warn(&self, label: &str) {
        eprintln!("{}", self.icon_line(Icons::WARN, &label.style(self.theme.warn.clone()).to_string()));
    }

    pub fn failure(&self, kind: ErrorKind, message: &str) {
        let icon = match kind {
            ErrorKind::Validation => Icons::WARN,
            ErrorKind::UserInput => Icons::CROSS,
            ErrorKind::NotFound => Icons::SEARCH,
            ErrorKind::Database => Icons::DATABASE,
            ErrorKind::System => Icons::BOOM,
        };
        eprintln!("{}", self.icon_line(icon, &message.style(self.theme.error.clone()).to_string()));
    }

    pub fn notice(&self, icon: &str, text: &str) {
        println!("{}", self.icon_line(icon, text));
    }

    pub fn section(&self, title: &str) {
        println!();
        println!("{}", title.style(self.theme.header.clone()));
    }

    pub fn field(&self, icon: &str, label: &str, value: &str) {
        let label = format!("{:<10}:", label);
        println!(
            "{} {}",
            self.icon_line(icon, &label.style(self.theme.dim.clone()).to_string()),
            value
        );
    }

    pub fn summary_row(&self, label: &str, value: &str) {
        println!("  {} {}", label.style(self.theme.dim.clone()), value);
    }

    pub fn rule(&self, width: usize) {
        println!("{}", "━".repeat(width).style(self.theme.muted.clone()));
    }

    pub fn rating(&self, text: &str) -> String {
        text.style(self.theme.rating.clone()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_line_respects_emoji_setting() {
        let with = Printer::with_theme(Theme::plain(), true);
        let without = Printer::with_theme(Theme::plain(), false);
        assert_eq!(with.icon_line(Icons::CHECK, "saved"), "✅ saved");
        assert_eq!(without.icon_line(Icons::CHECK, "saved"), "saved");
    }
}
