use anyhow::{Context, Result};
use clap::Parser;
use tcell::cli::{Cli, Command};
use tcell::config::TcellConfig;
use tcell::identity::SystemIdentity;
use tcell::probe::HostProbe;
use tcell::scan::{self, ScanOptions};
use tcell::sysfs::SysfsRoot;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        None | Some(Command::Scan) => cmd_scan(&cli)?,
        Some(Command::Completions { shell }) => tcell::cli::print_completions(*shell),
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_scan(cli: &Cli) -> Result<()> {
    let config: TcellConfig = tcell::config::load(cli.config.as_deref());
    let sysfs = SysfsRoot::system();

    let identity = SystemIdentity::detect(
        &sysfs,
        config.identity.distro.as_deref(),
        config.identity.kernel.as_deref(),
    )
    .context("cannot pick a bug database")?;

    let opts = ScanOptions {
        database_dir: config.database_dir(cli.database_dir.as_deref()),
        common_database: config.database.common.clone(),
        touchpad: config.touchpad.enabled,
        display: config.display(),
    };

    let probe = HostProbe::new(sysfs);
    let mut stdout = std::io::stdout().lock();
    scan::run(&probe, &identity, &opts, &mut stdout)?;

    Ok(())
}
