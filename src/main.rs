use std::{
    io::{self, Write},
    panic,
    path::PathBuf,
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    style::ResetColor,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use tracing::{info, warn};
use tuirealm::{
    PollStrategy,
    terminal::{CrosstermTerminalAdapter, TerminalBridge},
};

use todo_app::{
    app::{App, resolve_db_path},
    cli::{self, RootCommand},
    logging::{init_logging, print_log_location},
    realm::{RootId, apply_message, init_application, should_quit},
    settings::Settings,
    theme::ThemePreset,
};

#[derive(Parser, Debug)]
#[command(
    name = "todo-app",
    about = "Terminal to-do list backed by a local SQLite file",
    long_about = "A TUI to-do list: browse, add, edit, complete and delete todos stored in a seeded SQLite database.",
    version = env!("CARGO_PKG_VERSION"),
    author
)]
struct Cli {
    /// Database file to use instead of the configured location.
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[arg(long, value_name = "PRESET")]
    theme: Option<String>,

    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<RootCommand>,
}

enum RunOutcome {
    Continue,
    Exit(i32),
}

static TERMINAL_RESTORED: AtomicBool = AtomicBool::new(false);

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_session = match init_logging() {
        Ok(session) => Some(session),
        Err(err) => {
            eprintln!("warning: failed to initialize logging: {err}");
            None
        }
    };
    if let Some(session) = log_session.as_ref() {
        install_panic_hook_with_log(session.path().to_path_buf());
    }

    let outcome = run_app(cli);
    let log_path = log_session.as_ref().map(|session| session.path().to_path_buf());
    // Flushes the non-blocking writer; `process::exit` would skip it.
    drop(log_session);

    match outcome {
        Ok(RunOutcome::Continue) => {
            if let Some(path) = log_path.as_ref() {
                print_log_location(path);
            }
            Ok(())
        }
        Ok(RunOutcome::Exit(code)) => {
            std::process::exit(code);
        }
        Err(err) => {
            if let Some(path) = log_path.as_ref() {
                print_log_location(path);
            }
            Err(err)
        }
    }
}

fn run_app(cli: Cli) -> Result<RunOutcome> {
    if let Some(command) = cli.command {
        let settings = Settings::load();
        let db_path = match resolve_db_path(cli.db.as_deref(), &settings) {
            Ok(path) => path,
            Err(err) => {
                eprintln!("error[DB_PATH_UNAVAILABLE]: {err:#}");
                return Ok(RunOutcome::Exit(5));
            }
        };
        let code = cli::run(&db_path, command, cli.json, cli.quiet);
        return Ok(RunOutcome::Exit(code));
    }

    let cli_theme_override = cli.theme.as_deref().and_then(|value| {
        let parsed = ThemePreset::from_str(value).ok();
        if parsed.is_none() {
            warn!(
                theme = value,
                expected = %ThemePreset::names(),
                "unknown theme preset on command line; ignoring"
            );
        }
        parsed
    });

    // Open the store before touching the terminal so startup errors stay readable.
    let app = Arc::new(Mutex::new(App::new(cli.db.as_deref(), cli_theme_override)?));

    let _guard = TerminalGuard;
    let mut terminal = setup_terminal()?;
    let mut realm = init_application(Arc::clone(&app))?;
    info!("interactive session started");

    let mut redraw = true;
    while !should_quit(&app)? {
        if redraw {
            terminal
                .draw(|frame| realm.view(&RootId::Screen, frame, frame.area()))
                .context("failed to render frame")?;
            redraw = false;
        }

        let messages = realm
            .tick(PollStrategy::Once)
            .context("failed to process tui-realm tick")?;

        if !messages.is_empty() {
            redraw = true;
        }

        for message in messages {
            apply_message(&app, message)?;
        }
    }

    info!("interactive session finished");
    let _ = execute!(io::stdout(), DisableMouseCapture);
    let _ = terminal.disable_raw_mode();
    let _ = terminal.leave_alternate_screen();
    let _ = terminal.clear_screen();
    TERMINAL_RESTORED.store(true, Ordering::SeqCst);

    Ok(RunOutcome::Continue)
}

fn setup_terminal() -> Result<TerminalBridge<CrosstermTerminalAdapter>> {
    TERMINAL_RESTORED.store(false, Ordering::SeqCst);

    let mut terminal =
        TerminalBridge::new_crossterm().context("failed to initialize terminal bridge")?;

    terminal
        .enable_raw_mode()
        .context("failed to enable raw mode")?;
    terminal
        .enter_alternate_screen()
        .context("failed to enter alternate screen")?;
    execute!(io::stdout(), EnableMouseCapture).context("failed to enable mouse capture")?;

    Ok(terminal)
}

fn install_panic_hook_with_log(log_path: PathBuf) {
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        eprintln!();
        eprintln!("todo-app crashed. Log file: {}", log_path.display());
        eprintln!();
        previous_hook(panic_info);
    }));
}

fn restore_terminal() -> Result<()> {
    if TERMINAL_RESTORED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let _ = disable_raw_mode();

    let mut stderr = io::stderr();
    let _ = execute!(
        stderr,
        LeaveAlternateScreen,
        DisableMouseCapture,
        Show,
        ResetColor
    );
    let _ = stderr.write_all(b"\x1b[?1049l\x1b[?1000l\x1b[?1002l\x1b[?1006l\x1b[?25h\x1b[0m");
    let _ = stderr.flush();

    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::{CommandFactory, Parser};
    use todo_app::cli::RootCommand;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn version_comes_from_package_metadata() {
        assert_eq!(
            Cli::command().get_version(),
            Some(env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn no_subcommand_launches_interactive_mode() {
        let cli = Cli::try_parse_from(["todo-app", "--theme", "light"]).expect("valid args");
        assert!(cli.command.is_none());
        assert_eq!(cli.theme.as_deref(), Some("light"));
    }

    #[test]
    fn add_subcommand_accepts_global_db_flag() {
        let cli = Cli::try_parse_from([
            "todo-app",
            "add",
            "--name",
            "Call mom",
            "--description",
            "Sunday",
            "--priority",
            "high",
            "--db",
            "/tmp/todo.db",
            "--json",
        ])
        .expect("valid args");

        assert!(cli.json);
        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/todo.db")));
        match cli.command {
            Some(RootCommand::Add(args)) => {
                assert_eq!(args.name, "Call mom");
                assert_eq!(args.priority, "high");
                assert!(args.deadline.is_none());
            }
            other => panic!("expected add command, got {other:?}"),
        }
    }

    #[test]
    fn toggle_requires_id() {
        assert!(Cli::try_parse_from(["todo-app", "toggle"]).is_err());
        assert!(Cli::try_parse_from(["todo-app", "toggle", "--id", "x"]).is_err());
    }
}
