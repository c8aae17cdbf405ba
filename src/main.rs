//! Purpose: `kantodex` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, drives the explorer, prints tables or JSON.
//! Invariants: Machine output goes to stdout; logs and errors go to stderr.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::aot::Shell;
use serde_json::json;
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use command_dispatch::dispatch_command;
use kantodex::api::{
    DEFAULT_BASE_URL, Error, Explorer, Pokemon, RemoteClient, SortKey, SortOrder, ViewMode,
    to_exit_code,
};
use kantodex::core::catalog::{display_name, format_height, format_weight, padded_id};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }
}

#[derive(Parser)]
#[command(
    name = "kantodex",
    version,
    about = "Explore the first-generation Pokédex from the terminal"
)]
struct Cli {
    /// Base URL of the upstream catalog API.
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the catalog and print one page of the derived view.
    List {
        /// Match against names (case-insensitive) or decimal identifiers.
        #[arg(long)]
        search: Option<String>,
        /// Keep only entities carrying at least one of these type tags.
        #[arg(long = "type", value_name = "TAG")]
        types: Vec<String>,
        #[arg(long, default_value = "id")]
        sort: SortKey,
        #[arg(long, default_value = "asc")]
        order: SortOrder,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value = "grid")]
        view: ViewMode,
        /// Emit the page as a JSON envelope instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Fetch one entity's detail and description on demand.
    Show {
        id: u32,
        #[arg(long)]
        json: bool,
    },
    /// Emit shell completions.
    Completion { shell: Shell },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let client = match RemoteClient::new(&cli.api_url) {
        Ok(client) => client,
        Err(err) => return fail(&err),
    };
    match dispatch_command(cli.command, client) {
        Ok(outcome) => ExitCode::from(outcome.exit_code as u8),
        Err(err) => fail(&err),
    }
}

fn fail(err: &Error) -> ExitCode {
    eprintln!("{}", error_json(err));
    ExitCode::from(to_exit_code(err.kind()) as u8)
}

fn error_json(err: &Error) -> String {
    json!({
        "error": {
            "kind": format!("{:?}", err.kind()),
            "message": err.to_string(),
            "status": err.status(),
        }
    })
    .to_string()
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn print_page_json(explorer: &Explorer) {
    let envelope = json!({
        "entities": explorer.current_page_entities(),
        "page": explorer.current_page(),
        "total_pages": explorer.total_pages(),
        "matched": explorer.filtered().len(),
        "total": explorer.entities().len(),
        "search": explorer.search_term(),
        "types": explorer.selected_types(),
        "sort": explorer.sort_by(),
        "order": explorer.sort_order(),
        "view": explorer.view_mode(),
    });
    println!("{envelope}");
}

fn print_page_human(explorer: &Explorer) {
    let slice = explorer.current_page_entities();
    match explorer.view_mode() {
        ViewMode::Grid => {
            for row in slice.chunks(4) {
                let cells: Vec<String> = row.iter().map(grid_cell).collect();
                println!("{}", cells.join("  "));
            }
        }
        ViewMode::List => {
            for entry in slice {
                println!("{}", list_line(entry));
            }
        }
    }
    println!(
        "page {}/{} · {} shown · {} matched of {}",
        explorer.current_page(),
        explorer.total_pages(),
        slice.len(),
        explorer.filtered().len(),
        explorer.entities().len(),
    );
}

fn grid_cell(entry: &Pokemon) -> String {
    format!("#{} {:<12}", padded_id(entry.id), display_name(&entry.name))
}

fn list_line(entry: &Pokemon) -> String {
    let types = if entry.types.is_empty() {
        "?".to_string()
    } else {
        entry.types.join("/")
    };
    let height = entry
        .height
        .map(format_height)
        .unwrap_or_else(|| "-".to_string());
    let weight = entry
        .weight
        .map(format_weight)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "#{} {:<12} {:<16} {:>7} {:>8}",
        padded_id(entry.id),
        display_name(&entry.name),
        types,
        height,
        weight,
    )
}

fn print_entity_human(entity: &Pokemon) {
    println!("#{} {}", padded_id(entity.id), display_name(&entity.name));
    if !entity.types.is_empty() {
        println!("types: {}", entity.types.join("/"));
    }
    if let (Some(height), Some(weight)) = (entity.height, entity.weight) {
        println!("size: {} · {}", format_height(height), format_weight(weight));
    }
    for ability in &entity.abilities {
        let marker = if ability.hidden { " (hidden)" } else { "" };
        println!("ability: {}{marker}", ability.name);
    }
    for stat in &entity.stats {
        println!("{:<16} {:>4}", stat.name, stat.base);
    }
    if let Some(description) = &entity.description {
        println!("{description}");
    }
}
