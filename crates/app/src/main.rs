mod take;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use assess_core::model::AssessmentId;
use services::{
    ApiConfig, AssessmentApi, AssessmentSessionService, Clock, DraftAuthoringService,
    HttpAssessmentApi, Notice, NoticeLevel, Notifier, SessionConfig,
};
use storage::{DraftKey, Storage};

#[derive(Debug, Parser)]
#[command(name = "assess", about = "Take timed assessments and manage authoring drafts")]
struct Cli {
    /// Base URL of the assessment backend.
    #[arg(long, env = "ASSESS_API_BASE_URL", default_value = "http://localhost:8080/api")]
    api_url: String,

    /// Bearer token sent with every request.
    #[arg(long, env = "ASSESS_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// SQLite database holding authoring drafts.
    #[arg(long, env = "ASSESS_DB_URL", default_value = "sqlite://drafts.sqlite3")]
    db: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Take an assessment in the terminal.
    Take {
        assessment_id: AssessmentId,

        #[arg(long, default_value_t = services::session::DEFAULT_TIME_BUDGET_SECS)]
        budget_secs: u32,
    },
    /// Inspect or publish stored authoring drafts.
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
}

#[derive(Debug, Subcommand)]
enum DraftAction {
    List,
    Show { key: String },
    Publish { key: String },
    Clear { key: String },
}

/// Prints notices for the person at the terminal; logs go through tracing.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => eprintln!("error: {}", notice.message),
            level => eprintln!("{level}: {}", notice.message),
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn build_api(cli: &Cli) -> Arc<dyn AssessmentApi> {
    let config = ApiConfig::new(cli.api_url.clone()).with_token(cli.token.clone());
    Arc::new(HttpAssessmentApi::new(config))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let api = build_api(&cli);
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);

    match cli.command {
        Command::Take {
            assessment_id,
            budget_secs,
        } => {
            let config = SessionConfig {
                time_budget_secs: budget_secs,
                tick_period: Duration::from_secs(1),
            };
            let service =
                AssessmentSessionService::new(Clock::system(), config, api).with_notifier(notifier);
            take::run(&service, assessment_id).await
        }
        Command::Draft { action } => {
            let db_url = normalize_sqlite_url(&cli.db);
            prepare_sqlite_file(&db_url)?;
            let storage = Storage::sqlite(&db_url)
                .await
                .with_context(|| format!("opening {db_url}"))?;
            run_draft(action, storage, api, notifier).await
        }
    }
}

async fn run_draft(
    action: DraftAction,
    storage: Storage,
    api: Arc<dyn AssessmentApi>,
    notifier: Arc<dyn Notifier>,
) -> anyhow::Result<()> {
    let drafts = Arc::clone(&storage.drafts);
    match action {
        DraftAction::List => {
            for key in drafts.list_draft_keys().await? {
                println!("{key}");
            }
        }
        DraftAction::Show { key } => {
            let key = DraftKey::new(key)?;
            let Some(draft) = drafts.load_draft(&key).await? else {
                bail!("no draft stored under {key}");
            };
            println!("title:    {}", draft.title);
            if let Some(id) = draft.remote_id {
                println!("remote:   {id}");
            }
            if draft.header_needs_save() {
                println!("header:   pending");
            }
            println!("pending:  {}/{}", draft.pending_count(), draft.questions.len());
            for (index, question) in draft.questions.iter().enumerate() {
                let marker = if question.needs_save() { '*' } else { ' ' };
                println!("{marker} {}. {}", index + 1, question.text);
            }
        }
        DraftAction::Publish { key } => {
            let service = DraftAuthoringService::new(api, drafts, notifier);
            let mut session = service.open(DraftKey::new(key)?).await?;
            let id = session.publish().await?;
            println!("{} -> {id}", session.key());
        }
        DraftAction::Clear { key } => {
            let key = DraftKey::new(key)?;
            if !drafts.clear_draft(&key).await? {
                bail!("no draft stored under {key}");
            }
        }
    }
    Ok(())
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// sqlx refuses to open a missing file without `mode=rwc`, so create it up front.
fn prepare_sqlite_file(db_url: &str) -> anyhow::Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid database url: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid database url: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("sqlite:data/drafts.sqlite3");
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/drafts.sqlite3"));
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(normalize_sqlite_url(" sqlite:///tmp/x.db "), "sqlite:///tmp/x.db");
    }

    #[test]
    fn cli_parses_take_with_budget() {
        let cli = Cli::try_parse_from([
            "assess",
            "--api-url",
            "http://api.test",
            "take",
            "42",
            "--budget-secs",
            "90",
        ])
        .unwrap();
        match cli.command {
            Command::Take {
                assessment_id,
                budget_secs,
            } => {
                assert_eq!(assessment_id, AssessmentId::new(42));
                assert_eq!(budget_secs, 90);
            }
            Command::Draft { .. } => panic!("expected take"),
        }
    }

    #[test]
    fn rejects_non_numeric_assessment_id() {
        assert!(Cli::try_parse_from(["assess", "take", "abc"]).is_err());
    }
}
