use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tcell",
    about = "T-Cell - look up known buggy components on your system",
    version
)]
pub struct Cli {
    /// Defaults to `scan`
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding the <distro>-<kernel>-bug.json databases
    #[arg(long, global = true, value_name = "DIR")]
    pub database_dir: Option<PathBuf>,

    /// Read configuration from this file only
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log diagnostics to stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Enumerate devices and report known issues (default)
    Scan,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (auto-detected if omitted)
        shell: Option<Shell>,
    },
}

/// Print shell completions to stdout.
pub fn print_completions(shell: Option<Shell>) {
    let shell = shell.or_else(Shell::from_env).unwrap_or_else(|| {
        eprintln!(
            "Could not detect shell. Specify one: tcell completions bash|zsh|fish|elvish|powershell"
        );
        std::process::exit(1);
    });
    clap_complete::generate(shell, &mut Cli::command(), "tcell", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_means_scan() {
        let cli = Cli::try_parse_from(["tcell"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_global_options() {
        let cli =
            Cli::try_parse_from(["tcell", "scan", "--database-dir", "/tmp/db", "-vv"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Scan)));
        assert_eq!(cli.database_dir, Some(PathBuf::from("/tmp/db")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }
}
