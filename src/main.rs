mod calc;
mod cmd;
mod data;
mod logging;
mod ui;

use calc::ViewMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "studycal", about = "calendar view for a generated study plan")]
struct Cli {
    /// Path to the data directory containing config and plan files (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    /// Plan JSON file to display instead of the configured one
    #[arg(long)]
    plan: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and a sample plan for the current week
    Init,
    /// Print the calendar window for a date
    Show {
        /// Grid granularity (defaults to the configured view)
        #[arg(short, long, value_enum)]
        mode: Option<ViewMode>,
        /// Reference date, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List every scheduled session in plan order
    Days,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // The TUI installs its own file logger once the config is read.
    if cli.command.is_some() {
        logging::init_stderr()?;
    }

    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && dir_needs_init(&data_dir) {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    let plan = cli.plan.as_deref();
    match cli.command {
        None => cmd::root::run(plan),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Show { mode, date }) => cmd::show::run(mode, date.as_deref(), plan),
        Some(Commands::Days) => cmd::days::run(plan),
    }
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dir_needs_init_nonexistent() {
        let tmp = TempDir::new().unwrap();
        assert!(dir_needs_init(&tmp.path().join("does_not_exist")));
    }

    #[test]
    fn test_dir_needs_init_empty_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(dir_needs_init(tmp.path()));
    }

    #[test]
    fn test_dir_needs_init_nonempty_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("plan.json"), "[]").unwrap();
        assert!(!dir_needs_init(tmp.path()));
    }

    #[test]
    fn test_cli_parses_show_arguments() {
        let cli = Cli::try_parse_from([
            "studycal", "--plan", "/tmp/p.json", "show", "--mode", "monthly", "--date", "2024-06-15",
        ])
        .unwrap();
        assert_eq!(cli.plan, Some(PathBuf::from("/tmp/p.json")));
        match cli.command {
            Some(Commands::Show { mode, date }) => {
                assert_eq!(mode, Some(ViewMode::Monthly));
                assert_eq!(date.as_deref(), Some("2024-06-15"));
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["studycal", "show", "--mode", "yearly"]).is_err());
    }

    #[test]
    fn test_cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
