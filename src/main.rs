use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste, Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use gitpulse::app::{
    handle_key_event, process_action, refresh_all, Action, AppState, Config, Scheduler,
};
use gitpulse::git::GitSync;
use gitpulse::ui::{AppWidget, Theme};
use gitpulse::util::expand_home;

const VERSION: &str = env!("BUILD_VERSION");
const TICK_INTERVAL: Duration = Duration::from_millis(100);

const USAGE: &str = "\
Usage: gitpulse [--config <path>]

Options:
  -c, --config <path>  Use this config file instead of the default location
  -V, --version        Print version and exit
  -h, --help           Print this help and exit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run { config_path: Option<PathBuf> },
    Version,
    Help,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command> {
    let mut config_path = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-V" | "--version" => return Ok(Command::Version),
            "-h" | "--help" => return Ok(Command::Help),
            "-c" | "--config" => {
                let value = args.next().context("--config needs a path")?;
                config_path = Some(expand_home(&value));
            }
            other => anyhow::bail!("Unknown argument: {}\n\n{}", other, USAGE),
        }
    }
    Ok(Command::Run { config_path })
}

/// `RUST_LOG` wins over the configured level when it is set.
fn log_filter(config: &Config, rust_log: Option<&str>) -> EnvFilter {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(config.log_level.directive()),
    }
}

fn init_tracing(config: &Config) {
    let log_path = std::env::temp_dir().join("gitpulse.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    let filter = log_filter(config, std::env::var("RUST_LOG").ok().as_deref());

    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Arc::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = match parse_args(std::env::args().skip(1))? {
        Command::Version => {
            println!("gitpulse {}", VERSION);
            return Ok(());
        }
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Run { config_path } => match config_path {
            Some(path) => path,
            None => Config::config_path()?,
        },
    };

    let Some(config) = Config::load_from(&config_path)? else {
        return first_run_setup(&config_path);
    };

    if config.repos.is_empty() {
        println!("No repositories configured.");
        println!("Add repositories to {}", config_path.display());
        std::process::exit(1);
    }

    init_tracing(&config);
    tracing::info!("=== gitpulse {} starting ===", VERSION);
    tracing::info!("Monitoring {} repositories", config.repos.len());
    if !Theme::names().any(|name| name.eq_ignore_ascii_case(&config.theme)) {
        tracing::warn!(
            "Unknown theme '{}', using {}. Available: {}",
            config.theme,
            Theme::default().name,
            Theme::names().collect::<Vec<_>>().join(", ")
        );
    }

    let mut state = AppState::new(config);

    let (action_tx, action_rx) = mpsc::unbounded_channel::<Action>();
    let scheduler = Scheduler::new(Arc::new(GitSync::new()), action_tx.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    refresh_all(&mut state, &scheduler);
    let result = run_app(&mut terminal, &mut state, &scheduler, &action_tx, action_rx).await;

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!("Exiting on error: {:#}", e);
    }
    tracing::info!("=== gitpulse exiting ===");
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    scheduler: &Scheduler,
    action_tx: &mpsc::UnboundedSender<Action>,
    mut action_rx: mpsc::UnboundedReceiver<Action>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);

    while state.running {
        terminal.draw(|f| AppWidget::new(state).with_version(VERSION).render(f))?;

        tokio::select! {
            Some(event) = events.next() => match event? {
                Event::Key(key) => {
                    if let Some(action) = handle_key_event(key, state) {
                        action_tx.send(action)?;
                    }
                }
                Event::Paste(text) => action_tx.send(Action::ModalPaste(text))?,
                _ => {}
            },
            Some(action) = action_rx.recv() => {
                process_action(action, state, scheduler);
            }
            _ = ticker.tick() => action_tx.send(Action::Tick)?,
        }

        // Apply everything that queued up before the next redraw
        while let Ok(action) = action_rx.try_recv() {
            if process_action(action, state, scheduler) {
                break;
            }
        }
    }

    Ok(())
}

/// Interactive setup when no config file exists yet.
fn first_run_setup(config_path: &Path) -> Result<()> {
    println!();
    println!("  gitpulse");
    println!();
    println!("  Config file not found.");
    println!();
    println!("  Expected location: {}", config_path.display());
    println!();
    println!("  Example config:");
    println!();
    for line in Config::example().lines() {
        println!("  {}", line);
    }
    println!();
    print!("  Would you like to create a config now? [Y/n] ");
    io::stdout().flush()?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let answer = lines.next().transpose()?.unwrap_or_default();
    if !is_yes(&answer) {
        println!();
        println!("  No config created. Exiting.");
        return Ok(());
    }

    println!();
    println!("  Enter repository paths (one per line, empty line to finish):");
    println!();

    let mut repos = Vec::new();
    loop {
        print!("  > ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        let expanded = expand_home(line);
        if !expanded.exists() {
            println!("    {} does not exist, adding anyway", line);
        } else if !expanded.join(".git").exists() {
            println!("    {} is not a git repository, adding anyway", line);
        }
        repos.push(line.to_string());
    }

    if repos.is_empty() {
        println!();
        println!("  No repositories added. Exiting.");
        return Ok(());
    }

    let config = Config {
        repos,
        ..Default::default()
    };
    config.save_to(config_path)?;

    println!();
    println!("  Config saved to {}", config_path.display());
    println!();
    println!("  Run gitpulse again to start monitoring your repos.");
    Ok(())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "" | "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(
            parse_args(args(&[])).unwrap(),
            Command::Run { config_path: None }
        );
    }

    #[test]
    fn test_parse_config_path() {
        assert_eq!(
            parse_args(args(&["--config", "/etc/gitpulse.toml"])).unwrap(),
            Command::Run {
                config_path: Some(PathBuf::from("/etc/gitpulse.toml"))
            }
        );
    }

    #[test]
    fn test_parse_flags() {
        assert_eq!(parse_args(args(&["-V"])).unwrap(), Command::Version);
        assert_eq!(parse_args(args(&["--help"])).unwrap(), Command::Help);
        assert!(parse_args(args(&["--config"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_log_filter_from_config() {
        let config = Config::default();
        assert_eq!(log_filter(&config, None).to_string(), "gitpulse=info");
        assert_eq!(log_filter(&config, Some(" ")).to_string(), "gitpulse=info");
    }

    #[test]
    fn test_log_filter_rust_log_wins() {
        let config = Config::default();
        assert_eq!(
            log_filter(&config, Some("gitpulse=trace")).to_string(),
            "gitpulse=trace"
        );
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes(""));
        assert!(is_yes("Y"));
        assert!(is_yes(" yes\n"));
        assert!(!is_yes("n"));
    }
}
