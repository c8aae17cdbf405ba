//! Purpose: Hold top-level CLI command dispatch for `kantodex`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: A load error that leaves the collection empty maps to its kind's exit code.
//! Invariants: Output envelopes stay stable; rendering helpers live in `main.rs`.

use super::*;

pub(super) fn dispatch_command(
    command: Command,
    client: RemoteClient,
) -> Result<RunOutcome, Error> {
    match command {
        Command::List {
            search,
            types,
            sort,
            order,
            page,
            view,
            json,
        } => {
            let mut explorer = Explorer::new(client);
            explorer.load();
            if let Some(err) = explorer.error() {
                eprintln!("{}", error_json(err));
                return Ok(RunOutcome {
                    exit_code: to_exit_code(err.kind()),
                });
            }

            if let Some(term) = search {
                explorer.set_search_term(term);
            }
            if !types.is_empty() {
                explorer.set_selected_types(types);
            }
            explorer.set_sort_by(sort);
            explorer.set_sort_order(order);
            explorer.set_view_mode(view);
            explorer.set_current_page(page);

            if json {
                print_page_json(&explorer);
            } else {
                print_page_human(&explorer);
            }
            Ok(RunOutcome::ok())
        }
        Command::Show { id, json } => {
            let mut explorer = Explorer::new(client);
            let entity = explorer.entity_detail(id)?;
            if json {
                println!("{}", json!({ "entity": entity }));
            } else {
                print_entity_human(&entity);
            }
            Ok(RunOutcome::ok())
        }
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "kantodex", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
    }
}
