pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const SEARCH: &str = "🔍";
    pub const STATS: &str = "📊";
    pub const DATABASE: &str = "🗄️";
    pub const DEL: &str = "🗑️";
    pub const BOOM: &str = "💥";
    pub const EMPTY: &str = "📭";
    pub const MOVIE: &str = "📽️";
    pub const DRAMA: &str = "📺";
    pub const STAR: &str = "⭐";
    pub const CHART: &str = "📈";
    pub const CALENDAR: &str = "📅";
    pub const CLOCK: &str = "🕒";
    pub const PIN: &str = "📌";
    pub const COMMENT: &str = "💬";
}
