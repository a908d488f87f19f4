mod app;
mod board;
mod config;
mod input;
mod logging;
mod store;
mod ui;
mod worker;

use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, WrapErr};

use board::{Board, Column, Priority};
use config::{detect_board, env_var, resolve_db_path, Config, ConfigError};
use store::{SqliteStore, Store, StoreError};
use worker::{Worker, WorkerError};

#[derive(Parser)]
#[command(name = "kb", about = "A keyboard-first personal kanban board")]
struct Cli {
    /// Database file (overrides KB_DB and the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Config file (default: <config dir>/kb/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Board to open or operate on
    #[arg(short, long, global = true)]
    board: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List all boards
    Boards,
    /// Create a new board with the default columns
    Init {
        /// Board name
        name: String,
        /// Optional description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Add a card to the current board
    Add {
        /// Card title
        title: String,
        /// Column name (defaults to the first column)
        #[arg(short, long)]
        column: Option<String>,
        /// Card description
        #[arg(short, long)]
        description: Option<String>,
        /// Priority (low, medium, high, urgent)
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
    },
    /// Set the WIP limit of a column
    Wip {
        /// Column name
        column: String,
        /// WIP limit (0 to remove)
        limit: u32,
    },
}

fn main() {
    // Install color_eyre for unexpected panics/errors (developer bugs).
    let _ = color_eyre::install();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        print_user_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> color_eyre::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    logging::init(&config.log_filter);

    let db_path = resolve_db_path(cli.db.as_deref(), env_var, &config)?;
    let mut store = SqliteStore::open(&db_path)
        .wrap_err_with(|| format!("opening database {}", db_path.display()))?;
    tracing::info!(db = %db_path.display(), "database opened");

    let cwd = env::current_dir().ok();
    let detected = detect_board(cli.board.as_deref(), env_var, &config, cwd.as_deref());

    match cli.command {
        Some(Command::Boards) => cmd_boards(&store),
        Some(Command::Init { name, description }) => cmd_init(&mut store, &name, &description),
        Some(Command::Add {
            title,
            column,
            description,
            priority,
        }) => cmd_add(
            &mut store,
            detected.as_deref(),
            &title,
            column.as_deref(),
            description.as_deref(),
            priority,
        ),
        Some(Command::Wip { column, limit }) => cmd_wip(&mut store, detected.as_deref(), &column, limit),
        None => cmd_tui(store, &config, detected),
    }
}

/// Print a user-friendly error message, with actionable hints for known error types.
fn print_user_error(error: &color_eyre::Report) {
    if let Some(config_err) = error.downcast_ref::<ConfigError>() {
        eprintln!("error: {config_err}");
        match config_err {
            ConfigError::Parse(_) | ConfigError::InvalidValue { .. } => {
                eprintln!("  Fix the config file or pass --config with another one.");
            }
            ConfigError::NoDataDir => {
                eprintln!("  Set XDG_DATA_HOME, or pass --db <path>.");
            }
            ConfigError::Io { .. } => {}
        }
        return;
    }

    if let Some(store_err) = error.downcast_ref::<StoreError>() {
        match store_err {
            StoreError::Sqlite(e) => {
                eprintln!("error: database failure.");
                eprintln!("  {e}");
                eprintln!("  Check that the database path is writable, or pass --db <path>.");
            }
            StoreError::Duplicate(name) => {
                eprintln!("error: a board named '{name}' already exists.");
                eprintln!("  Run `kb boards` to list boards.");
            }
            other => eprintln!("error: {other}"),
        }
        return;
    }

    if let Some(WorkerError::Spawn(e)) = error.downcast_ref::<WorkerError>() {
        eprintln!("error: could not start the storage thread.");
        eprintln!("  {e}");
        return;
    }

    // For eyre!() / bail!() messages, print the full error chain.
    eprintln!("error: {e:#}", e = error);
}

fn cmd_boards(store: &dyn Store) -> color_eyre::Result<()> {
    let boards = store.list_boards()?;
    if boards.is_empty() {
        println!("No boards yet. Run `kb init <name>` to create one.");
        return Ok(());
    }
    for board in boards {
        if board.description.is_empty() {
            println!("{}", board.name);
        } else {
            println!("{}  {}", board.name, board.description);
        }
    }
    Ok(())
}

fn cmd_init(store: &mut dyn Store, name: &str, description: &str) -> color_eyre::Result<()> {
    let board = store.create_board(name.trim(), description.trim())?;
    let columns = store.list_columns(&board.id)?;
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    println!("Created board '{}'", board.name);
    println!("Columns: {}", names.join(", "));
    Ok(())
}

/// Board named by `--board`/environment detection; must already exist.
fn require_board(store: &dyn Store, name: Option<&str>) -> color_eyre::Result<Board> {
    let Some(name) = name else {
        bail!("No board selected. Pass --board <name> or set KB_BOARD.");
    };
    store
        .get_board_by_name(name)?
        .ok_or_else(|| eyre!("Board '{name}' not found. Run `kb init {name}` to create it."))
}

/// Column by case-insensitive name.
fn find_column(columns: Vec<Column>, name: &str) -> color_eyre::Result<Column> {
    let wanted = name.trim().to_lowercase();
    let available: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
    columns
        .into_iter()
        .find(|c| c.name.to_lowercase() == wanted)
        .ok_or_else(|| eyre!("Column '{name}' not found. Available: {}", available.join(", ")))
}

fn cmd_add(
    store: &mut dyn Store,
    board_name: Option<&str>,
    title: &str,
    column: Option<&str>,
    description: Option<&str>,
    priority: Priority,
) -> color_eyre::Result<()> {
    let board = require_board(store, board_name)?;
    let columns = store.list_columns(&board.id)?;
    let target = match column {
        Some(name) => find_column(columns, name)?,
        None => match columns.into_iter().next() {
            Some(first) => first,
            None => bail!("Board '{}' has no columns.", board.name),
        },
    };

    if let Some(limit) = target.wip_limit {
        let count = store.count_cards_in_column(&target.id)?;
        if count >= limit as usize {
            bail!("Column '{}' is at its WIP limit ({limit}).", target.name);
        }
    }

    let mut card = store.create_card(&target.id, title.trim(), priority)?;
    if let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) {
        card.description = description.to_string();
        store.update_card(&card)?;
    }
    println!("Added '{}' to {} ({})", card.title, target.name, card.priority.as_str());
    Ok(())
}

fn cmd_wip(store: &mut dyn Store, board_name: Option<&str>, column: &str, limit: u32) -> color_eyre::Result<()> {
    let board = require_board(store, board_name)?;
    let target = find_column(store.list_columns(&board.id)?, column)?;
    let limit = (limit > 0).then_some(limit);
    store.update_column_wip_limit(&target.id, limit)?;
    match limit {
        Some(n) => println!("WIP limit for '{}' set to {n}", target.name),
        None => println!("WIP limit for '{}' removed", target.name),
    }
    Ok(())
}

fn cmd_tui(store: SqliteStore, config: &Config, detected: Option<String>) -> color_eyre::Result<()> {
    let worker = Worker::spawn(Box::new(store))?;
    let mut state = app::AppState::new(config.column_width, detected);

    let mut terminal = ratatui::init();
    let result = app::run(&mut terminal, &mut state, &worker);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_board() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.create_board("work", "").unwrap();
        store
    }

    fn cards_in(store: &SqliteStore, column: &str) -> Vec<String> {
        let board = store.get_board_by_name("work").unwrap().unwrap();
        let column = find_column(store.list_columns(&board.id).unwrap(), column).unwrap();
        store
            .list_cards(&column.id)
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect()
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::try_parse_from(["kb", "--board", "work", "add", "x", "-p", "high"]).unwrap();
        assert_eq!(cli.board.as_deref(), Some("work"));
        assert!(matches!(
            cli.command,
            Some(Command::Add { priority: Priority::High, .. })
        ));
    }

    #[test]
    fn cli_rejects_bad_priority() {
        assert!(Cli::try_parse_from(["kb", "add", "x", "-p", "soon"]).is_err());
    }

    #[test]
    fn init_creates_board() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        cmd_init(&mut store, "home", "chores").unwrap();
        let board = store.get_board_by_name("home").unwrap().unwrap();
        assert_eq!(board.description, "chores");
        assert!(cmd_init(&mut store, "home", "").is_err());
    }

    #[test]
    fn add_defaults_to_first_column() {
        let mut store = store_with_board();
        cmd_add(&mut store, Some("work"), "write docs", None, None, Priority::Low).unwrap();
        assert_eq!(cards_in(&store, "backlog"), vec!["write docs"]);
    }

    #[test]
    fn add_to_named_column() {
        let mut store = store_with_board();
        cmd_add(&mut store, Some("work"), "review", Some("in progress"), None, Priority::Medium).unwrap();
        assert_eq!(cards_in(&store, "In Progress"), vec!["review"]);
        assert!(cmd_add(&mut store, Some("work"), "x", Some("nowhere"), None, Priority::Medium).is_err());
    }

    #[test]
    fn add_with_description() {
        let mut store = store_with_board();
        let description = Some("  rotate the OAuth keys ");
        cmd_add(&mut store, Some("work"), "keys", None, description, Priority::High).unwrap();
        let board = store.get_board_by_name("work").unwrap().unwrap();
        let backlog = &store.list_columns(&board.id).unwrap()[0];
        let card = &store.list_cards(&backlog.id).unwrap()[0];
        assert_eq!(card.description, "rotate the OAuth keys");
        assert_eq!(card.priority, Priority::High);
    }

    #[test]
    fn cli_parses_description() {
        let cli = Cli::try_parse_from(["kb", "add", "x", "--description", "more"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Add { description: Some(ref d), .. }) if d == "more"
        ));
    }

    #[test]
    fn add_requires_existing_board() {
        let mut store = store_with_board();
        assert!(cmd_add(&mut store, Some("other"), "x", None, None, Priority::Medium).is_err());
        assert!(cmd_add(&mut store, None, "x", None, None, Priority::Medium).is_err());
    }

    #[test]
    fn add_respects_wip_limit() {
        let mut store = store_with_board();
        cmd_wip(&mut store, Some("work"), "todo", 1).unwrap();
        cmd_add(&mut store, Some("work"), "one", Some("todo"), None, Priority::Medium).unwrap();
        assert!(cmd_add(&mut store, Some("work"), "two", Some("todo"), None, Priority::Medium).is_err());
        assert_eq!(cards_in(&store, "todo"), vec!["one"]);
    }

    #[test]
    fn wip_zero_clears_limit() {
        let mut store = store_with_board();
        cmd_wip(&mut store, Some("work"), "Todo", 3).unwrap();
        let board = store.get_board_by_name("work").unwrap().unwrap();
        let todo = || find_column(store.list_columns(&board.id).unwrap(), "todo").unwrap();
        assert_eq!(todo().wip_limit, Some(3));
        cmd_wip(&mut store, Some("work"), "todo", 0).unwrap();
        assert_eq!(store.list_columns(&board.id).unwrap()[1].wip_limit, None);
    }

    #[test]
    fn boards_lists_without_error() {
        let store = store_with_board();
        assert!(cmd_boards(&store).is_ok());
    }
}
