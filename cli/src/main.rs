//! Interactive terminal shell for the todo list.
//!
//! Reads one command per line from stdin, runs it through `TodoSession`
//! and re-renders the list after every command.

mod command;
mod transport;

use std::io::{self, BufRead, Write};

use clap::Parser;
use todo_core::{view, ItemId, Outcome, TodoClient, TodoItem, TodoSession};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use command::{Command, USAGE};
use transport::UreqTransport;

#[derive(Parser, Debug)]
#[command(name = "todo", about = "Terminal client for the todo list API")]
struct Cli {
    /// Server origin; the client talks to `<base-url>/api/item/`.
    #[arg(long, env = "TODO_API_URL", default_value = "http://localhost:8000")]
    base_url: String,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, env = "TODO_LOG_JSON")]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    tracing::info!(base_url = %cli.base_url, "starting");

    let mut session = TodoSession::new(TodoClient::new(&cli.base_url), UreqTransport::new());
    let _ = session.fetch_all();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", view::render(session.state(), &chrono::Local))?;

    let stdin = io::stdin();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(msg) => {
                writeln!(out, "{msg}\n{USAGE}")?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Some(note) = dispatch(&mut session, command) {
            writeln!(out, "{note}")?;
        }
        write!(out, "{}", view::render(session.state(), &chrono::Local))?;
    }
    Ok(())
}

/// Run one command; returns a note to print above the list.
fn dispatch(session: &mut TodoSession<UreqTransport>, command: Command) -> Option<String> {
    let outcome = match command {
        Command::Add { title, description } => {
            session.set_new_title(title);
            session.set_new_description(description);
            session.create()
        }
        Command::Toggle(n) => match nth(session, n) {
            Ok(item) => session.toggle(&item),
            Err(msg) => return Some(msg),
        },
        Command::Edit(n) => match nth(session, n) {
            Ok(item) => {
                session.begin_edit(&item);
                return None;
            }
            Err(msg) => return Some(msg),
        },
        Command::Set { field, value } => {
            if session.state().draft().is_none() {
                return Some("nothing is being edited".to_string());
            }
            session.update_draft_field(field, value);
            return None;
        }
        Command::Save => {
            if session.state().draft().is_none() {
                return Some("nothing is being edited".to_string());
            }
            session.save_edit()
        }
        Command::Cancel => {
            session.cancel_edit();
            return None;
        }
        Command::Delete(n) => match nth(session, n) {
            Ok(item) => session.delete_item(item.id),
            Err(msg) => return Some(msg),
        },
        Command::Show(n) => {
            let id = match nth(session, n) {
                Ok(item) => item.id,
                Err(msg) => return Some(msg),
            };
            return session.show(id).map(|item| describe(id, &item));
        }
        Command::Refresh => session.fetch_all(),
        Command::Help => return Some(USAGE.to_string()),
        Command::Quit => return None,
    };
    match outcome {
        Outcome::Skipped => Some("a title is required".to_string()),
        Outcome::Applied | Outcome::Failed => None,
    }
}

fn nth(session: &TodoSession<UreqTransport>, n: usize) -> Result<TodoItem, String> {
    session
        .state()
        .items()
        .get(n - 1)
        .cloned()
        .ok_or_else(|| format!("no item {n}"))
}

fn describe(id: ItemId, item: &TodoItem) -> String {
    format!(
        "#{id} {:?} completed={} description={:?} created_at={}",
        item.title,
        item.completed,
        item.description.as_deref().unwrap_or(""),
        item.created_at.to_rfc3339()
    )
}
