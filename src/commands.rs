use crate::{Context, OutputMode, emit_success};
use morama::config;
use morama::ui::{entry_table, prompt, stats_table, ColumnWidths, Icons};
use morama::{Error, MediaEntry, MediaStore, MediaType, NewEntry, StatsEngine, StatsSnapshot};

const DETAIL_WIDTH: usize = 60;

impl Context {
    fn open_store(&self) -> morama::Result<MediaStore> {
        MediaStore::open(
            &config::database_path_in(&self.data_dir),
            self.config.display.rating_scale,
        )
    }

    fn format_date(&self, entry: &MediaEntry) -> String {
        entry.watched_date.format(&self.config.display.date_format).to_string()
    }
}

pub fn run_add(ctx: &Context, title: &str, media_type: MediaType) -> anyhow::Result<()> {
    tracing::info!(action = "add_entry", title, %media_type);
    let scale = ctx.config.display.rating_scale;
    let entry = NewEntry::new(title, media_type, 0.0, "");
    entry.validate(scale)?;

    let rating = prompt::rating(scale, None)?;
    let comment = prompt::comment(None)?;

    let store = ctx.open_store()?;
    let id = store.create(&NewEntry { rating, comment, ..entry })?;
    tracing::info!(action = "entry_added", id, title, %media_type, rating);

    if ctx.output.is_human() {
        ctx.printer.success(&format!("Successfully saved! (ID {})", id));
    } else {
        emit_success(ctx.output, "add", serde_json::to_value(store.find_by_id(id)?)?)?;
    }
    Ok(())
}

pub fn run_edit(ctx: &Context, title: &str, id: i64, media_type: MediaType) -> anyhow::Result<()> {
    tracing::info!(action = "edit_entry", id, title, %media_type);
    let scale = ctx.config.display.rating_scale;
    let store = ctx.open_store()?;
    let existing = edit_target(&store, title, id, media_type)?;

    let rating = prompt::rating(scale, Some(existing.rating))?;
    let comment = prompt::comment(Some(&existing.comment))?;

    store.update_by_id(id, &NewEntry::new(existing.title, media_type, rating, comment))?;
    tracing::info!(action = "entry_updated", id, rating);

    if ctx.output.is_human() {
        ctx.printer.success("Successfully updated!");
    } else {
        emit_success(ctx.output, "edit", serde_json::to_value(store.find_by_id(id)?)?)?;
    }
    Ok(())
}

/// The entry titled `title` with the given id; the title must match
fn edit_target(
    store: &MediaStore,
    title: &str,
    id: i64,
    media_type: MediaType,
) -> morama::Result<MediaEntry> {
    store
        .find_all_by_title_and_type(title, media_type)?
        .into_iter()
        .find(|entry| entry.id == id)
        .ok_or_else(|| Error::NotFound(format!("No entry found with ID {} for \"{}\"", id, title)))
}

/// What a `delete` invocation removes
#[derive(Debug, Clone, PartialEq)]
enum DeleteTarget {
    All(Option<MediaType>),
    Id(i64, Option<MediaType>),
    Title(String, MediaType),
}

impl DeleteTarget {
    fn is_bulk(&self) -> bool {
        matches!(self, DeleteTarget::All(_))
    }

    fn describe(&self) -> String {
        match self {
            DeleteTarget::All(Some(t)) => format!("all {} entries", t),
            DeleteTarget::All(None) => "all entries".to_string(),
            DeleteTarget::Id(id, Some(t)) => format!("ID {} ({})", id, t),
            DeleteTarget::Id(id, None) => format!("ID {}", id),
            DeleteTarget::Title(title, t) => format!("\"{}\" ({})", title, t),
        }
    }

    /// Run the delete; removing nothing is an error unless bulk
    fn apply(&self, store: &MediaStore) -> morama::Result<usize> {
        let deleted = match self {
            DeleteTarget::All(Some(t)) => store.delete_all_by_type(*t)?,
            DeleteTarget::All(None) => store.delete_all()?,
            DeleteTarget::Id(id, Some(t)) => store.delete_by_id_and_type(*id, *t)?,
            DeleteTarget::Id(id, None) => store.delete_by_id(*id)?,
            DeleteTarget::Title(title, t) => store.delete_by_title_and_type(title, *t)?,
        };
        if deleted == 0 && !self.is_bulk() {
            return Err(Error::NotFound(format!("No entry found for {}", self.describe())));
        }
        Ok(deleted)
    }
}

/// Resolve the positional target and flags; a numeric target is an id
fn delete_target(
    target: Option<&str>,
    media_type: Option<MediaType>,
    all: bool,
) -> morama::Result<DeleteTarget> {
    match (target, all) {
        (Some(_), true) => Err(Error::Validation(
            "--all cannot be combined with an id or title".to_string(),
        )),
        (None, true) => Ok(DeleteTarget::All(media_type)),
        (None, false) => Err(Error::Validation(
            "Provide an id or title to delete, or use --all".to_string(),
        )),
        (Some(target), false) => match (target.parse::<i64>(), media_type) {
            (Ok(id), media_type) => Ok(DeleteTarget::Id(id, media_type)),
            (Err(_), Some(t)) => Ok(DeleteTarget::Title(target.to_string(), t)),
            (Err(_), None) => Err(Error::Validation(
                "Deleting by title requires --movie or --drama".to_string(),
            )),
        },
    }
}

/// Bulk deletes ask first; JSON mode cannot prompt and needs `--yes`
fn confirm_bulk(output: OutputMode, yes: bool, what: &str) -> morama::Result<bool> {
    if yes {
        return Ok(true);
    }
    if !output.is_human() {
        return Err(Error::UserInput(format!(
            "Refusing to delete {} without --yes in JSON mode",
            what
        )));
    }
    prompt::confirm(&format!("Delete {}?", what))
}

pub fn run_delete(
    ctx: &Context,
    target: Option<&str>,
    media_type: Option<MediaType>,
    all: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let target = delete_target(target, media_type, all)?;
    let what = target.describe();

    if target.is_bulk() && !confirm_bulk(ctx.output, yes, &what)? {
        ctx.printer.notice(Icons::INFO, "Nothing deleted.");
        return Ok(());
    }

    let store = ctx.open_store()?;
    let deleted = target.apply(&store)?;
    tracing::info!(action = "delete", target = %what, deleted);

    if ctx.output.is_human() {
        ctx.printer.notice(Icons::DEL, &format!("Deleted {} ({} removed)", what, deleted));
    } else {
        emit_success(ctx.output, "delete", serde_json::json!({ "deleted": deleted }))?;
    }
    Ok(())
}

pub fn run_list(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let years = store.list_years()?;

    if !ctx.output.is_human() {
        let mut groups = Vec::with_capacity(years.len());
        for year in years {
            groups.push(serde_json::json!({ "year": year, "entries": store.list_by_year(year)? }));
        }
        return emit_success(ctx.output, "list", serde_json::Value::Array(groups));
    }

    if years.is_empty() {
        ctx.printer.notice(
            Icons::EMPTY,
            "No entries found. Add some movies or dramas with 'morama add'!",
        );
        return Ok(());
    }

    let widths = ColumnWidths::detect();
    for year in years {
        let entries = store.list_by_year(year)?;
        if entries.is_empty() {
            continue;
        }
        ctx.printer.section(&format!("Watched in {}", year));
        println!("{}", entry_table(&entries, &ctx.config.display.date_format, widths));
    }
    Ok(())
}

pub fn run_show(ctx: &Context, title: &str, media_type: MediaType) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let entries = store.find_all_by_title_and_type(title, media_type)?;

    if !ctx.output.is_human() {
        return emit_success(ctx.output, "show", serde_json::to_value(&entries)?);
    }

    let scale = ctx.config.display.rating_scale;
    for entry in &entries {
        let printer = &ctx.printer;
        printer.rule(DETAIL_WIDTH);
        printer.field(Icons::PIN, "Title", &entry.title);
        let icon = match entry.media_type {
            MediaType::Movie => Icons::MOVIE,
            MediaType::Drama => Icons::DRAMA,
        };
        printer.field(icon, "Type", &capitalize(entry.media_type.as_str()));
        printer.field(
            Icons::STAR,
            "Rating",
            &printer.rating(&format!("{:.1} / {:.1}", entry.rating, scale)),
        );
        printer.field(Icons::CALENDAR, "Watched", &ctx.format_date(entry));
        printer.field(Icons::COMMENT, "Comment", &entry.comment);
        printer.field(Icons::INFO, "ID", &entry.id.to_string());
    }
    ctx.printer.rule(DETAIL_WIDTH);
    Ok(())
}

pub fn run_search(ctx: &Context, query: &str, media_type: Option<MediaType>) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let options = ctx.config.search_options();
    let entries = store.search(query, media_type, &options)?;
    tracing::info!(action = "search", query, results = entries.len());

    if !ctx.output.is_human() {
        return emit_success(ctx.output, "search", serde_json::to_value(&entries)?);
    }

    if entries.is_empty() {
        ctx.printer.notice(Icons::SEARCH, &format!("No entries match '{}'.", query));
        return Ok(());
    }
    println!(
        "{}",
        entry_table(&entries, &ctx.config.display.date_format, ColumnWidths::detect())
    );
    Ok(())
}

pub fn run_stats(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let stats = StatsEngine::new(&store).compute()?;
    tracing::info!(action = "stats_completed", total = stats.total());

    if ctx.output.is_human() {
        render_stats(ctx, &stats);
    } else {
        emit_success(ctx.output, "stats", serde_json::to_value(&stats)?)?;
    }
    Ok(())
}

fn render_stats(ctx: &Context, stats: &StatsSnapshot) {
    let printer = &ctx.printer;
    let scale = ctx.config.display.rating_scale;
    printer.header(Icons::STATS, "Collection Statistics");

    let mut rows = vec![
        ("Total Movies", stats.total_by_type.movie.to_string()),
        ("Total Dramas", stats.total_by_type.drama.to_string()),
        ("Total Entries", stats.total().to_string()),
    ];
    if stats.total_by_type.movie > 0 {
        rows.push((
            "Average Movie Rating",
            format!("{:.2}/{:.1}", stats.average_rating_by_type.movie, scale),
        ));
    }
    if stats.total_by_type.drama > 0 {
        rows.push((
            "Average Drama Rating",
            format!("{:.2}/{:.1}", stats.average_rating_by_type.drama, scale),
        ));
    }
    if stats.total() > 0 {
        rows.push((
            "Overall Average Rating",
            format!("{:.2}/{:.1}", stats.average_rating_overall, scale),
        ));
    }
    println!("{}", stats_table(&rows));

    if stats.total() == 0 {
        return;
    }

    printer.section(&printer.icon_line(Icons::CHART, "Rating Distribution"));
    for bucket in stats.rating_distribution.iter().rev().filter(|b| b.count > 0) {
        printer.summary_row(
            &format!("{} stars:", bucket.label()),
            &format!("{} entries ({:.1}%)", bucket.count, stats.percentage(bucket)),
        );
    }

    printer.section(&printer.icon_line(Icons::CALENDAR, "Yearly Breakdown"));
    for year in &stats.yearly_breakdown {
        printer.summary_row(
            &format!("{}:", year.year),
            &format!(
                "{} movies, {} dramas (avg: {:.2})",
                year.movies, year.dramas, year.average_rating
            ),
        );
    }

    if let Some(last) = stats.last_watched {
        println!();
        printer.notice(
            Icons::CLOCK,
            &format!(
                "Last Watched: {}",
                last.format(&ctx.config.display.date_format)
            ),
        );
    }
}

pub fn run_version(output_mode: OutputMode) -> anyhow::Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let commit = option_env!("MORAMA_GIT_COMMIT").unwrap_or("unknown");
    let built = option_env!("MORAMA_BUILD_DATE").unwrap_or("unknown");

    if output_mode.is_human() {
        println!("morama version {}", version);
        println!("Git commit: {}", commit);
        println!("Built: {}", built);
    } else {
        let data = serde_json::json!({
            "version": version,
            "commit": commit,
            "built": built,
        });
        emit_success(output_mode, "version", data)?;
    }
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
