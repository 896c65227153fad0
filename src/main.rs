//! px-gallery - browse a photo and video catalog in your terminal
//!
//! Curated photos, popular videos, search and random picks, paged on demand.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use px_gallery::core::CatalogClient;
use px_gallery::core::{ContentController, FetchOutcome, HttpCatalog, LoadMore, SkipReason};
use px_gallery::storage::config;
use px_gallery::types::{AppState, ContentState, Item, MediaKind, MenuItem, RetrievalMode};
use px_gallery::ui::render::{format_error, format_item_detail, format_item_label, format_status};
use px_gallery::ui::selector::{Selector, create_selector};

/// Browse photos and videos from a media catalog in your terminal.
#[derive(Parser, Debug)]
#[command(name = "px-gallery")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Search query (starts the session in search mode)
    #[arg(trailing_var_arg = true)]
    query: Vec<String>,

    /// Start on videos instead of photos
    #[arg(long)]
    video: bool,

    /// Starting retrieval mode for the selected kind
    #[arg(short, long, value_enum)]
    mode: Option<RetrievalMode>,

    /// Items per page
    #[arg(short = 'n', long)]
    page_size: Option<u32>,

    /// Catalog base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Check catalog health and quota, then exit
    #[arg(long)]
    check: bool,

    /// Edit the configuration file
    #[arg(short, long)]
    edit: bool,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

type Controller = ContentController<HttpCatalog>;

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "px_gallery=warn",
        1 => "px_gallery=debug",
        _ => "px_gallery=trace,reqwest=debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// Run `fut` behind a spinner
async fn with_spinner<F: Future>(message: &str, fut: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = fut.await;
    spinner.finish_and_clear();
    output
}

fn report(outcome: &FetchOutcome) {
    match outcome {
        FetchOutcome::Applied { received } => {
            println!("{}", format!("Loaded {} items", received).dimmed());
        }
        FetchOutcome::Failed(info) => {
            eprintln!("{} {}", "Error:".red(), format_error(info));
        }
        FetchOutcome::Superseded => {}
    }
}

/// Determine starting kind and mode from CLI options
fn build_controller(
    cli: &Cli,
    catalog: Arc<HttpCatalog>,
    page_size: u32,
) -> anyhow::Result<Controller> {
    let kind = if cli.video {
        MediaKind::Video
    } else {
        MediaKind::Photo
    };
    let mode = match cli.mode {
        Some(mode) => mode,
        None if !cli.query.is_empty() => RetrievalMode::Search,
        None => kind.default_mode(),
    };

    let controller = ContentController::new(catalog, page_size)
        .with_active_kind(kind)
        .with_mode(kind, mode)?;
    Ok(controller)
}

fn browse_menu(state: &ContentState) -> Vec<MenuItem<AppState>> {
    let mut menu = Vec::new();

    if !state.items.is_empty() {
        menu.push(MenuItem {
            label: format!("🖼  View results ({})", state.items.len()),
            value: AppState::ViewItem,
        });
    }
    if state.mode.is_paginated() && state.has_more && !state.items.is_empty() {
        menu.push(MenuItem {
            label: "⏬ Load more".into(),
            value: AppState::LoadMore,
        });
    }
    menu.push(MenuItem {
        label: "🔍 Search".into(),
        value: AppState::Search,
    });
    menu.push(MenuItem {
        label: "🎛  Change mode".into(),
        value: AppState::ChangeMode,
    });
    menu.push(MenuItem {
        label: format!("🔁 Switch to {}", state.kind.other()),
        value: AppState::SwitchKind,
    });
    menu.push(MenuItem {
        label: if state.mode == RetrievalMode::Random {
            "🔀 Shuffle".into()
        } else {
            "♻️  Refresh".into()
        },
        value: AppState::Refresh,
    });
    menu.push(MenuItem {
        label: "👋 Quit".into(),
        value: AppState::Exit,
    });
    menu
}

async fn view_item(selector: &Selector, catalog: &HttpCatalog, state: &ContentState) {
    let menu_items: Vec<MenuItem<usize>> = state
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| MenuItem {
            label: format_item_label(item),
            value: i,
        })
        .collect();

    let header = format_status(state);
    let Some(index) = selector.select(&menu_items, "Select item", Some(&header)) else {
        return;
    };
    let Some(item) = state.items.get(index) else {
        return;
    };

    // Photos can be re-read individually; fall back to the buffered record
    let detail = match item {
        Item::Photo(p) => match catalog.photo(p.id).await {
            Ok(fresh) => Item::Photo(fresh),
            Err(e) => {
                warn!(id = p.id, error = %e, "photo lookup failed, showing cached record");
                item.clone()
            }
        },
        Item::Video(_) => item.clone(),
    };

    println!();
    println!("{}", format_item_detail(&detail));
    println!();
}

async fn run_check(catalog: &HttpCatalog) -> anyhow::Result<()> {
    let health = catalog.health().await?;
    println!("{} {} ({})", "Catalog:".green(), health.status, catalog.base_url());

    let info = catalog.info().await?;
    println!("{} {}", "Requests remaining:".green(), info.remaining_requests);
    Ok(())
}

async fn browse(controller: &Controller, catalog: &HttpCatalog, selector: &Selector) {
    let mut state = AppState::Browse;

    while state != AppState::Exit {
        state = match state {
            AppState::Browse => {
                let snapshot = controller.active_snapshot();
                if let Some(info) = &snapshot.error {
                    eprintln!("{} {}", "Error:".red(), format_error(info));
                }
                if snapshot.items.is_empty() && snapshot.error.is_none() {
                    println!("{}", "No results.".yellow());
                }

                let header = format_status(&snapshot);
                selector
                    .select(&browse_menu(&snapshot), "Select Action", Some(&header))
                    .unwrap_or(AppState::Exit)
            }

            AppState::SwitchKind => {
                let kind = controller.active_kind().other();
                let message = format!("Loading {}...", kind);
                let outcome = with_spinner(&message, controller.set_active_kind(kind)).await;
                report(&outcome);
                AppState::Browse
            }

            AppState::ChangeMode => {
                let kind = controller.active_kind();
                let menu_items: Vec<MenuItem<RetrievalMode>> = kind
                    .modes()
                    .iter()
                    .map(|m| MenuItem {
                        label: m.to_string(),
                        value: *m,
                    })
                    .collect();

                if let Some(mode) = selector.select(&menu_items, "Select Mode", None) {
                    if mode == RetrievalMode::Search {
                        AppState::Search
                    } else {
                        match with_spinner("Loading...", controller.set_mode(kind, mode)).await {
                            Ok(outcome) => report(&outcome),
                            Err(e) => eprintln!("{} {}", "Error:".red(), e),
                        }
                        AppState::Browse
                    }
                } else {
                    AppState::Browse
                }
            }

            AppState::Search => {
                let input = dialoguer::Input::<String>::new()
                    .with_prompt(format!("Search {}", controller.active_kind()))
                    .with_initial_text(controller.query())
                    .allow_empty(true)
                    .interact_text();

                match input {
                    Ok(text) => {
                        controller.set_query(text);
                        let outcome =
                            with_spinner("Searching...", controller.submit_search()).await;
                        report(&outcome);
                    }
                    Err(e) => eprintln!("{} {}", "Error:".red(), e),
                }
                AppState::Browse
            }

            AppState::LoadMore => {
                match with_spinner("Loading more...", controller.load_more()).await {
                    Ok(LoadMore::Fetched(outcome)) => report(&outcome),
                    Ok(LoadMore::Skipped(SkipReason::Loading)) => {
                        println!("{}", "Still loading, try again shortly.".yellow());
                    }
                    Ok(LoadMore::Skipped(SkipReason::Exhausted)) => {
                        println!("{}", "No more results.".yellow());
                    }
                    Err(e) => eprintln!("{} {}", "Error:".red(), e),
                }
                AppState::Browse
            }

            AppState::Refresh => {
                let outcome = with_spinner("Loading...", controller.refresh()).await;
                report(&outcome);
                AppState::Browse
            }

            AppState::ViewItem => {
                view_item(selector, catalog, &controller.active_snapshot()).await;
                AppState::Browse
            }

            AppState::Exit => break,
        };
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Handle --edit flag
    if cli.edit {
        let cfg = config::load_config().await?;
        config::edit_config(&cfg.editor).await?;
        return Ok(());
    }

    let mut cfg = config::load_config().await?;
    if let Some(url) = &cli.base_url {
        cfg.base_url = url.clone();
    }
    if let Some(n) = cli.page_size {
        cfg.page_size = n;
    }
    let cfg = config::apply_overrides(cfg, None)?;

    let catalog = Arc::new(HttpCatalog::from_config(&cfg)?);

    if cli.check {
        return run_check(&catalog).await;
    }

    let controller = build_controller(&cli, catalog.clone(), cfg.page_size)?;
    controller.set_query(if cli.query.is_empty() {
        cfg.default_query.clone()
    } else {
        cli.query.join(" ")
    });

    // Quota is informational; fetched once alongside the first load
    let (info, _) = with_spinner(
        "Loading catalog...",
        async { tokio::join!(catalog.info(), controller.initialize()) },
    )
    .await;
    match info {
        Ok(info) => println!(
            "{} {}",
            "API requests remaining:".dimmed(),
            info.remaining_requests
        ),
        Err(e) => {
            warn!(error = %e, "could not load quota info");
            if let Some(remaining) = catalog.remaining_requests() {
                println!("{} {}", "API requests remaining:".dimmed(), remaining);
            }
        }
    }

    let selector = create_selector(cfg.selector);
    browse(&controller, &catalog, &selector).await;

    println!("👋 Bye.");
    Ok(())
}
