mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use servicemaker::config::{self, InstallSpec};
use servicemaker::install;

fn main() {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(e) = real_main() {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<()> {
    let args = cli::Args::parse();

    match args.sub {
        cli::Cmd::Install { spec, skip_config } => handle_install(&spec, skip_config),
        cli::Cmd::RenderUnit { spec } => handle_render_unit(&spec),
        cli::Cmd::ExampleSpec => handle_example_spec(),
    }
}

fn handle_install(spec_path: &Path, skip_config: bool) -> Result<()> {
    let mut spec = config::load_spec(spec_path)?;
    if skip_config {
        spec.skip_config = true;
    }

    if !is_root() {
        warn!("Not running as root; privileged steps will likely fail");
    }

    info!("Installing service from {}", spec_path.display());
    install::install(&spec)
        .with_context(|| format!("Failed to install {}", spec.service_path.display()))?;

    println!(
        "{} installed and enabled; start it with `systemctl start {}`",
        spec.exec_path().display(),
        spec.service_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );
    Ok(())
}

fn handle_render_unit(spec_path: &Path) -> Result<()> {
    let spec = config::load_spec(spec_path)?;
    let unit = install::render_unit(&spec).context("Failed to render unit file")?;
    print!("{unit}");
    Ok(())
}

fn handle_example_spec() -> Result<()> {
    let text = toml::to_string_pretty(&InstallSpec::example())
        .context("Failed to serialize example spec")?;
    print!("{text}");
    Ok(())
}

#[inline]
fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}
