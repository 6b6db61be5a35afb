//! LiveSports - Live and upcoming sports events in the terminal
//!
//! Fetches the TopEmbed schedule, builds the match board and prints it as
//! cards. With `--watch` it keeps the live count current and refetches once
//! the cached schedule expires.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use livesports::cli::{Cli, StartupConfig};
use livesports::config::ScheduleConfig;
use livesports::data::{EventsByDate, ScheduleError, SportsApiClient};
use livesports::pipeline::{LoadState, MatchBoard};
use livesports::refresh::{RefreshConfig, RefreshHandle, RefreshMessage};
use livesports::view::{MatchCard, ScheduleView};

/// JSON document printed with `--json`
#[derive(Serialize)]
struct JsonOutput {
    live_count: usize,
    filter: String,
    view: ScheduleView,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("livesports=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Fetches the event groups selected by the startup flags
async fn fetch_groups(
    client: &SportsApiClient,
    startup: &StartupConfig,
) -> Result<EventsByDate, ScheduleError> {
    let events = match &startup.sport {
        Some(sport) => client.get_events_by_sport(sport).await?,
        None => client.fetch_events(startup.format).await?.events,
    };

    if startup.live_only {
        Ok(client.live_events(&events))
    } else {
        Ok(events)
    }
}

/// Runs one fetch-then-process cycle against the board
async fn load_matches(client: &SportsApiClient, board: &mut MatchBoard, startup: &StartupConfig) {
    let sequence = board.begin_request();

    match fetch_groups(client, startup).await {
        Ok(events) => {
            board.apply_response(sequence, &events, Utc::now().timestamp());
        }
        Err(e) => {
            error!(error = %e, "Error loading matches");
            board.record_failure(sequence, e.to_string());
        }
    }
}

fn render(board: &MatchBoard, startup: &StartupConfig) -> Result<()> {
    let view = board.view();

    if startup.json_output {
        let output = JsonOutput {
            live_count: board.live_count(),
            filter: board.filter().to_string(),
            view,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("LiveSports | {} live now", board.live_count());
    println!();

    match view {
        ScheduleView::Loading => println!("Loading live matches..."),
        ScheduleView::Failed { .. } => {
            println!("Unable to Load Matches");
            println!("Please check your connection and try again.");
        }
        ScheduleView::Empty => {
            println!("No Matches Found");
            println!("Try selecting a different sport or check back later.");
        }
        ScheduleView::Cards(cards) => {
            for card in &cards {
                print_card(card);
            }
        }
    }

    Ok(())
}

fn print_card(card: &MatchCard) {
    let badge = if card.is_live { "[LIVE] " } else { "" };

    println!("{badge}{} ({})", card.tournament, card.sport);
    println!("  {}", card.title);
    println!("  {} | {}", card.time_label, card.date_label);
    if let Some(streams) = &card.stream_label {
        println!("  {streams}");
    }
    println!("  {}", card.stream_url);
    println!();
}

async fn watch(
    client: &SportsApiClient,
    board: &mut MatchBoard,
    startup: &StartupConfig,
    config: &ScheduleConfig,
) -> Result<()> {
    let mut ticker = RefreshHandle::spawn(RefreshConfig {
        live_count_interval: config.refresh_interval,
        enabled: true,
    });

    let mut refetch = tokio::time::interval(config.cache_ttl.max(Duration::from_secs(1)));
    refetch.tick().await;

    loop {
        tokio::select! {
            message = ticker.recv() => match message {
                Some(RefreshMessage::LiveCountTick) => {
                    let live = board.refresh_live_count();
                    if !startup.json_output {
                        println!("LiveSports | {live} live now");
                    }
                }
                None => break,
            },
            _ = refetch.tick() => {
                load_matches(client, board, startup).await;
                render(board, startup)?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping");
                break;
            }
        }
    }

    ticker.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let startup = StartupConfig::from_cli(&cli)?;

    init_tracing();

    let config = ScheduleConfig::from_env();
    let client = SportsApiClient::with_config(config.clone());
    let mut board = MatchBoard::new(&config);
    board.set_filter(startup.filter.clone());

    load_matches(&client, &mut board, &startup).await;
    render(&board, &startup)?;

    if startup.watch {
        watch(&client, &mut board, &startup, &config).await?;
    }

    if matches!(board.state(), LoadState::Failed(_)) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
