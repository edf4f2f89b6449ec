use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use meeple_bgg::{HttpTransport, PaginatedCollector, RateLimitedFetcher, RecordQuery, resolve_date_range};
use meeple_core::{DestinationError, format_human};
use meeple_import::{
    Declining, Disambiguator, ImportError, ImportEvent, ImportPipeline, ImportSummary,
    PipelineContext, PipelineMessage, PipelineStage, UserIdentityMap, spawn_pipeline,
};
use meeple_ludopedia::{LudopediaClient, Settings};

use crate::CliError;
use crate::cli_types::{AccountArgs, ImportArgs};
use crate::prompt;

/// What to import.
pub(crate) enum ImportKind {
    Collection,
    Plays {
        from: Option<String>,
        to: Option<String>,
    },
}

/// Everything the pipeline thread needs, owned so it can move there.
struct ImportJob {
    email: String,
    password: String,
    username: String,
    query: RecordQuery,
    user_map: PathBuf,
    retry_interval: Duration,
    max_fetch_attempts: Option<u32>,
    non_interactive: bool,
}

impl ImportJob {
    fn from_settings(
        settings: &Settings,
        kind: ImportKind,
        args: &ImportArgs,
    ) -> Result<Self, CliError> {
        let username = settings.require_bgg_username()?.to_string();
        let (email, password) = settings.require_login()?;
        let query = build_query(&username, kind, chrono::Local::now().date_naive());

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
            username,
            query,
            user_map: settings.user_map.clone(),
            retry_interval: settings.retry_interval,
            max_fetch_attempts: settings.max_fetch_attempts,
            non_interactive: args.non_interactive,
        })
    }

    /// Runs on the pipeline thread.
    fn run(self, ctx: PipelineContext) -> Result<ImportSummary, ImportError> {
        log::debug!("Logging in to Ludopedia as {}", self.email);
        let (client, my_id) =
            LudopediaClient::login(&self.email, &self.password).map_err(DestinationError::from)?;

        let mut users = match self.query {
            RecordQuery::Plays { .. } => UserIdentityMap::load(&self.user_map, &client),
            RecordQuery::Collection { .. } => UserIdentityMap::new(),
        };
        users.ensure_user(&self.username, my_id.as_deref());

        let fetcher = RateLimitedFetcher::new(HttpTransport::new()?)
            .with_retry_interval(self.retry_interval)
            .with_max_attempts(self.max_fetch_attempts);
        let mut collector = PaginatedCollector::new(fetcher);

        let mut channel = ctx.disambiguator();
        let mut declining = Declining;
        let disambiguator: &mut dyn Disambiguator = if self.non_interactive {
            &mut declining
        } else {
            &mut channel
        };
        let progress = ctx.progress();

        let mut pipeline = ImportPipeline::new(&client, disambiguator, &progress)
            .with_cancel(ctx.cancel.clone());
        pipeline.run(collector.collect(self.query), &self.username, &users)
    }
}

/// Build the source query. Plays default to today; a missing end date
/// repeats the start date.
pub(crate) fn build_query(username: &str, kind: ImportKind, today: chrono::NaiveDate) -> RecordQuery {
    match kind {
        ImportKind::Collection => RecordQuery::collection(username),
        ImportKind::Plays { from, to } => {
            let from = from.unwrap_or_else(|| format_human(today));
            let to = to.unwrap_or_else(|| from.clone());
            let (min_date, max_date) = resolve_date_range(&from, &to, today);
            RecordQuery::plays(username, min_date, max_date)
        }
    }
}

/// Run an import, answering the pipeline's questions on this thread.
pub(crate) fn run_import(
    account: &AccountArgs,
    kind: ImportKind,
    args: &ImportArgs,
    quiet: bool,
) -> Result<(), CliError> {
    let settings = crate::load_settings(account);
    let job = ImportJob::from_settings(&settings, kind, args)?;

    match &job.query {
        RecordQuery::Collection { username } => log::info!(
            "Importing the collection of {}",
            username.if_supports_color(Stdout, |t| t.cyan()),
        ),
        RecordQuery::Plays {
            username,
            min_date,
            max_date,
        } => log::info!(
            "Importing plays of {} from {} to {}",
            username.if_supports_color(Stdout, |t| t.cyan()),
            format_human(*min_date),
            format_human(*max_date),
        ),
    }
    crate::log_blank();

    let handle = spawn_pipeline(move |ctx| job.run(ctx));

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .expect("static pattern")
                .tick_chars("/-\\|"),
        );
        pb.set_message("Logging in...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    for message in handle.messages().iter() {
        match message {
            PipelineMessage::Event(event) => show_event(&pb, event),
            PipelineMessage::Disambiguate(pending) => pb.suspend(|| prompt::answer(pending)),
        }
    }
    pb.finish_and_clear();

    match handle.join() {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(ImportError::Cancelled) => {
            log::warn!(
                "{} Import cancelled",
                "\u{2718}".if_supports_color(Stdout, |t| t.yellow()),
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn show_event(pb: &ProgressBar, event: ImportEvent) {
    match event {
        ImportEvent::StageChanged(PipelineStage::Fetching) => {
            pb.set_message("Reading from BoardGameGeek...");
        }
        ImportEvent::StageChanged(_) => {}
        ImportEvent::RecordStarted { index, label } => {
            pb.set_message(format!("[{}] {}", index + 1, label));
        }
        ImportEvent::Matched {
            label,
            destination,
            method,
            ..
        } => {
            log::debug!("{} -> {} ({})", label, destination, method);
        }
        ImportEvent::Imported { index, label } => pb.suspend(|| {
            log::info!(
                "  {} [{}] {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                index + 1,
                label,
            );
        }),
        ImportEvent::RecordFailed { index, label, error } => pb.suspend(|| {
            log::warn!(
                "  {} [{}] {}: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                index + 1,
                label,
                error,
            );
        }),
        // The pipeline already logged these.
        ImportEvent::UnmappedUser { .. } | ImportEvent::FatalError { .. } => {}
        ImportEvent::Done { .. } => pb.set_message("Done"),
    }
}

fn print_summary(summary: &ImportSummary) {
    crate::log_blank();
    let ratio = summary.ratio();
    if summary.failures.is_empty() {
        log::info!(
            "{} {} imported",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            ratio.if_supports_color(Stdout, |t| t.bold()),
        );
        return;
    }

    log::info!(
        "{} imported, {} failed:",
        ratio.if_supports_color(Stdout, |t| t.bold()),
        summary
            .failures
            .len()
            .if_supports_color(Stdout, |t| t.red()),
    );
    for failure in &summary.failures {
        log::info!(
            "  {} {}",
            format!("[{}] {}:", failure.index + 1, failure.label)
                .if_supports_color(Stdout, |t| t.yellow()),
            failure.reason,
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_plays_default_to_today() {
        let today = day(2024, 3, 9);
        let query = build_query("alice", ImportKind::Plays { from: None, to: None }, today);
        assert_eq!(query, RecordQuery::plays("alice", today, today));
    }

    #[test]
    fn test_missing_end_repeats_start() {
        let query = build_query(
            "alice",
            ImportKind::Plays {
                from: Some("01/02/2024".to_string()),
                to: None,
            },
            day(2024, 3, 9),
        );
        assert_eq!(query, RecordQuery::plays("alice", day(2024, 2, 1), day(2024, 2, 1)));
    }

    #[test]
    fn test_explicit_range() {
        let query = build_query(
            "alice",
            ImportKind::Plays {
                from: Some("01/02/2024".to_string()),
                to: Some("29/02/2024".to_string()),
            },
            day(2024, 3, 9),
        );
        assert_eq!(query, RecordQuery::plays("alice", day(2024, 2, 1), day(2024, 2, 29)));
    }

    #[test]
    fn test_collection_query() {
        let query = build_query("alice", ImportKind::Collection, day(2024, 3, 9));
        assert_eq!(query, RecordQuery::collection("alice"));
    }
}
