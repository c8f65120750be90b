pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
pub mod session;
pub mod transport;

use std::ffi::OsString;
use std::io::{self, IsTerminal};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        "starting tally CLI"
    );

    let mut cfg = config::Config::load(cli.config.as_deref())?;
    cfg.apply_overrides(cli.api_base.clone(), cli.data.clone());
    debug!(api_base = %cfg.api_base, loaded_from = ?cfg.loaded_from, "effective config");

    let data_dir = config::resolve_data_dir(&cfg).context("failed to resolve data directory")?;
    let session = session::FileSessionStore::open(&data_dir);
    let transport = transport::HttpTransport::new(&cfg.api_base, cfg.timeout())?;
    let renderer = render::Renderer::new(cfg.color && io::stdout().is_terminal());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let mut out = io::stdout().lock();
    runtime.block_on(commands::dispatch(
        &transport,
        &session,
        &renderer,
        &mut out,
        cli.command,
    ))?;

    info!("done");
    Ok(())
}
