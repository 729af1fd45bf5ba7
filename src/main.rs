//! Line-oriented terminal front end.
//!
//! A thin presentation layer over the engine: it reads commands from stdin,
//! dispatches them through an [`EngineHandle`], and prints the rendered view
//! model whenever the engine publishes a new snapshot.
//!
//! # Lifecycle
//!
//! 1. **Load**: Read configuration (optional path as the first argument)
//! 2. **Observe**: Initialize logging to the data directory
//! 3. **Start**: Build engine state, spawn the runtime
//! 4. **Loop**: Interleave stdin commands with snapshot changes
//! 5. **Stop**: `quit` or end of input shuts the engine down
//!
//! # Commands
//!
//! - `type <text>`: Update the search bar (debounced search)
//! - `search <text>`: Search immediately
//! - `open <n|id>`: Show details for the nth card or an id
//! - `close`: Close the detail overlay
//! - `save`: Save or unsave the item in the overlay
//! - `saved` / `back`: Switch between the saved collection and search
//! - `broken [n|id]`: Report that artwork failed to load
//! - `trailer`: Print the trailer link of the open item
//! - `quit`

use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

use marquee::api::OmdbClient;
use marquee::observability::init_tracing;
use marquee::ui::{render, OverlayView};
use marquee::{initialize, Config, EngineHandle, EngineState, Runtime};

const RENDER_COLS: usize = 80;

/// Parsed stdin command.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Type(String),
    Search(String),
    Open(String),
    Close,
    Save,
    Saved,
    Back,
    Broken(Option<String>),
    Trailer,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (verb, rest) = line
        .trim_start()
        .split_once(' ')
        .unwrap_or((line.trim(), ""));
    let arg = rest.trim();

    let command = match verb {
        "type" => Command::Type(rest.trim_end().to_string()),
        "search" => Command::Search(arg.to_string()),
        "open" if !arg.is_empty() => Command::Open(arg.to_string()),
        "close" => Command::Close,
        "save" => Command::Save,
        "saved" => Command::Saved,
        "back" => Command::Back,
        "broken" => Command::Broken((!arg.is_empty()).then(|| arg.to_string())),
        "trailer" => Command::Trailer,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Resolves a 1-based card number or a literal id against the current view.
fn resolve_id(state: &EngineState, target: &str) -> String {
    target
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| state.compute_viewmodel().cards.get(idx).map(|card| card.id.clone()))
        .unwrap_or_else(|| target.to_string())
}

/// Executes one command. Returns `Ok(false)` when the user quits.
fn execute(handle: &EngineHandle, command: Command) -> marquee::Result<bool> {
    let state = handle.snapshot();
    match command {
        Command::Type(text) => handle.on_input(text)?,
        Command::Search(text) => handle.submit_search(text)?,
        Command::Open(target) => handle.select_item(resolve_id(&state, &target))?,
        Command::Close => handle.close_overlay()?,
        Command::Save => match state.selected_detail.clone().filter(|_| state.is_modal_open()) {
            Some(detail) => handle.toggle_save(detail)?,
            None => println!("open an item first"),
        },
        Command::Saved => handle.view_saved_collection()?,
        Command::Back => handle.back_to_search()?,
        Command::Broken(Some(target)) => handle.mark_image_faulted(resolve_id(&state, &target))?,
        Command::Broken(None) => handle.mark_detail_image_faulted()?,
        Command::Trailer => match state.compute_viewmodel().overlay {
            OverlayView::Detail(detail) => {
                println!("{}", detail.trailer_url.unwrap_or_else(|| "no trailer link".to_string()));
            }
            _ => println!("open an item first"),
        },
        Command::Help => println!("{}", state.compute_viewmodel().footer.keybindings),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn print_view(state: &EngineState) {
    println!("{}", render(&state.compute_viewmodel(), RENDER_COLS));
}

async fn run() -> marquee::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;
    init_tracing(&config);

    let startup = tracing::info_span!("startup").entered();
    tracing::info!(data_dir = %config.data_dir.display(), api_base = %config.api_base, "starting marquee");
    let api = OmdbClient::new(&config)?;
    let (runtime, handle) = Runtime::new(initialize(&config), api);
    drop(startup);

    let mut snapshots = runtime.subscribe();
    let engine = tokio::spawn(runtime.run());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_view(&snapshots.borrow_and_update());
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Some(command) => {
                        if !execute(&handle, command)? {
                            break;
                        }
                    }
                    None => println!("unknown command; try `help`"),
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                print_view(&snapshots.borrow_and_update());
            }
        }
    }

    let _ = handle.shutdown();
    let _ = engine.await;
    tracing::info!("marquee stopped");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("marquee: {e}");
            ExitCode::FAILURE
        }
    }
}
