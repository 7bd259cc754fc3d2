use std::{
    io::{self, Write as _},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{
    config::validate_backend_url, load_settings, load_settings_from, title_reveal,
    ClientSettings, DeleteOutcome, HttpRecommendationBackend, IgnoredReason, QueryController,
    RenameOutcome, SubmitOutcome, FAILURE_TRANSCRIPT,
};
use shared::domain::SessionId;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::{parse_line, Command};

#[derive(Parser, Debug)]
#[command(name = "recommender", about = "Movie and TV recommendations in the terminal")]
struct Args {
    /// Recommendation endpoint, overrides config and environment.
    #[arg(long)]
    backend_url: Option<String>,
    /// Settings file to read instead of ./recommender.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Ask a single question, print the answer and exit.
    #[arg(long)]
    once: Option<String>,
    #[arg(long)]
    no_reveal: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => load_settings_from(Some(path.as_path()))?,
        None => load_settings()?,
    };
    if let Some(url) = args.backend_url {
        validate_backend_url(&url)?;
        settings.backend_url = url;
    }
    info!(backend = %settings.backend_url, "settings loaded");

    let backend = HttpRecommendationBackend::from_settings(&settings)
        .context("failed to build http client")?;
    let controller = QueryController::with_settings(Arc::new(backend), &settings);
    let settings = Arc::new(settings);

    if let Some(query) = args.once {
        return run_once(&controller, &settings, &query).await;
    }
    repl(controller, settings, !args.no_reveal).await
}

async fn run_once(
    controller: &QueryController,
    settings: &ClientSettings,
    query: &str,
) -> Result<()> {
    match controller.submit(query).await {
        SubmitOutcome::Created {
            session_id,
            result_count,
        } => {
            controller.finish_reveal(session_id);
            print_created(controller, settings, session_id, result_count, true);
            Ok(())
        }
        SubmitOutcome::Failed { message } => bail!("{message}"),
        SubmitOutcome::Ignored(_) => bail!("query is empty"),
    }
}

async fn repl(
    controller: Arc<QueryController>,
    settings: Arc<ClientSettings>,
    reveal: bool,
) -> Result<()> {
    println!("What would you like to watch? Type a query, or /help.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match command {
            Command::Submit(query) => spawn_submit(
                Arc::clone(&controller),
                Arc::clone(&settings),
                reveal,
                query,
            ),
            Command::NewChat => {
                controller.new_chat();
                println!("Started a new chat.");
            }
            Command::ListSessions => {
                print!("{}", render::session_list(&controller.snapshot().sessions));
            }
            Command::Open(position) => match controller.session_at(position) {
                Some(session) => {
                    controller.select(session.id);
                    println!("{}", session.title);
                    print!(
                        "{}",
                        render::result_cards(&session.results, settings.max_display_items)
                    );
                }
                None => eprintln!("No session {position}."),
            },
            Command::Rename { position, title } => {
                let Some(session) = controller.session_at(position) else {
                    eprintln!("No session {position}.");
                    continue;
                };
                match controller.rename(session.id, &title) {
                    RenameOutcome::Renamed => println!("Renamed to \"{}\".", title.trim()),
                    RenameOutcome::Unchanged => println!("Title unchanged."),
                    RenameOutcome::NotFound => eprintln!("No session {position}."),
                }
            }
            Command::Delete(position) => {
                let Some(session) = controller.session_at(position) else {
                    eprintln!("No session {position}.");
                    continue;
                };
                println!(
                    "Delete \"{}\"? This cannot be undone. [y/N]",
                    session.title
                );
                let answer = lines.next_line().await?.unwrap_or_default();
                if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                    println!("Kept.");
                    continue;
                }
                match controller.delete(session.id) {
                    DeleteOutcome::Deleted { was_active: true } => {
                        println!("Deleted. Started a new chat.")
                    }
                    DeleteOutcome::Deleted { was_active: false } => println!("Deleted."),
                    DeleteOutcome::NotFound => eprintln!("No session {position}."),
                }
            }
            Command::Show(position) => {
                let results = controller.results();
                match position.checked_sub(1).and_then(|index| results.get(index)) {
                    Some(item) => print!("{}", render::item_detail(item)),
                    None => eprintln!("No item {position} in the current results."),
                }
            }
            Command::Help => print!("{}", render::HELP_TEXT),
            Command::Quit => break,
        }
    }
    Ok(())
}

/// Runs the request off the prompt loop so further lines are still read.
fn spawn_submit(
    controller: Arc<QueryController>,
    settings: Arc<ClientSettings>,
    reveal: bool,
    query: String,
) {
    tokio::spawn(async move {
        match controller.submit(&query).await {
            SubmitOutcome::Created {
                session_id,
                result_count,
            } => {
                if reveal {
                    title_reveal::play(
                        &controller,
                        session_id,
                        settings.reveal_interval(),
                        |frame| {
                            print!("\r{frame}");
                            let _ = io::stdout().flush();
                        },
                    )
                    .await;
                    println!();
                } else {
                    controller.finish_reveal(session_id);
                }
                print_created(&controller, &settings, session_id, result_count, !reveal);
            }
            SubmitOutcome::Failed { message } => {
                eprintln!("{FAILURE_TRANSCRIPT}");
                eprintln!("Error: {message}");
            }
            SubmitOutcome::Ignored(IgnoredReason::RequestPending) => {
                debug!("request already pending, line ignored");
            }
            SubmitOutcome::Ignored(IgnoredReason::EmptyQuery) => {}
        }
    });
}

fn print_created(
    controller: &QueryController,
    settings: &ClientSettings,
    session_id: SessionId,
    result_count: usize,
    with_title: bool,
) {
    let Some(session) = controller.session(session_id) else {
        return;
    };
    if with_title {
        println!("{}", session.title);
    }
    println!("{}", render::found_line(result_count, &session.query));
    print!(
        "{}",
        render::result_cards(&session.results, settings.max_display_items)
    );
}
