use owo_colors::Style;

/// Styles for each kind of terminal text
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub rating: Style,
    pub dim: Style,
    pub muted: Style,
}

impl Theme {
    /// Colored on a terminal, plain when piped
    pub fn detect() -> Self {
        Self::new(console::Term::stdout().is_term())
    }

    pub fn new(colored: bool) -> Self {
        if !colored {
            return Self::plain();
        }
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            rating: Style::new().yellow(),
            dim: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            rating: Style::new(),
            dim: Style::new(),
            muted: Style::new(),
        }
    }
}
