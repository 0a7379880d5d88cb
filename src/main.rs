//! Todos CLI Entry Point
//!
//! Prints one list view by running the list controller against the backend.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use todo_lists::commands::TodoClient;
use todo_lists::config::ClientConfig;
use todo_lists::context::HistoryRouter;
use todo_lists::controller::{ListController, ListHandle};
use todo_lists::screens::{StatusListScreen, TodoView};
use todo_lists::store::ListViewState;

#[derive(Parser)]
#[command(name = "todos")]
#[command(about = "Show a todo list view", long_about = None)]
#[command(version)]
struct Cli {
    /// One of: available, tomorrow, future, completed, deleted
    #[arg(default_value = "available")]
    view: TodoView,

    /// Search text (future, completed and deleted views)
    #[arg(long)]
    search: Option<String>,

    /// Number of pages to load on paginated views
    #[arg(long, default_value = "1")]
    pages: u32,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend URL, overrides the config file and TODOS_API_URL
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(state) if state.error.is_none() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ListViewState> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    }
    .with_env_overrides();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    if let Some(log_dir) = &config.log_dir {
        rolling_logger::init_logger(log_dir, "todos")
            .with_context(|| format!("failed to start logging in {}", log_dir.display()))?;
        let _ = rolling_logger::info(&format!("showing {} todos from {}", cli.view, config.api_url));
    }

    let router = Arc::new(HistoryRouter::new(format!("/todos/{}", cli.view)));
    let todos = Arc::new(TodoClient::new(&config));
    let screen = StatusListScreen::new(cli.view, todos, router);

    let handle = ListController::new(Arc::new(screen))
        .search_debounce(config.search_debounce())
        .initial_search(cli.search.unwrap_or_default())
        .spawn();

    let mut state = settled(&handle, |_| true).await?;
    for _ in 1..cli.pages {
        if state.error.is_some() || !state.can_load_more() {
            break;
        }
        let page_number = state.page_number;
        handle.load_more();
        state = settled(&handle, |state| {
            state.page_number > page_number || state.error.is_some()
        })
        .await?;
    }

    print_state(cli.view, &state);
    handle.unmount().await;
    Ok(state)
}

/// Wait for a finished load that satisfies `done`
async fn settled(
    handle: &ListHandle,
    mut done: impl FnMut(&ListViewState) -> bool,
) -> Result<ListViewState> {
    handle
        .wait_for(|state| !state.is_loading && done(state))
        .await
        .ok_or_else(|| anyhow!("list controller stopped before loading finished"))
}

fn print_state(view: TodoView, state: &ListViewState) {
    println!("{}", view.title());

    if let Some(error) = state.error {
        eprintln!("{}", error);
    }
    if state.todo_count() == 0 && state.error.is_none() {
        println!("{}", view.empty_message(&state.search_text));
        return;
    }

    for group in &state.todo_groups {
        println!();
        println!("{} ({})", group.label, group.todos.len());
        for todo in &group.todos {
            println!("  - {}", todo.name);
        }
    }

    if state.can_load_more() {
        println!();
        println!(
            "page {} of {}, pass --pages to load more",
            state.page_number,
            state.max_page_number.unwrap_or(state.page_number)
        );
    }
}
