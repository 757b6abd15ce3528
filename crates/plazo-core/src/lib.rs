pub mod calendar;
pub mod cli;
pub mod color;
pub mod commands;
pub mod config;
pub mod datetime;
pub mod notify;
pub mod render;
pub mod shell;
pub mod store;
pub mod task;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use tracing::info;

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(verbose = cli.verbose, quiet = cli.quiet, "starting plazo CLI");

    let cfg = config::Config::load(cli.config.as_deref());
    let data_path = config::resolve_data_path(&cfg, cli.data.as_deref())
        .context("failed to resolve task file path")?;

    let store = store::TaskStore::open(&data_path)
        .with_context(|| format!("failed to open task store at {}", data_path.display()))?;

    let mut renderer = render::Renderer::new(&cfg);
    let now = chrono::Local::now().naive_local();

    commands::dispatch(&store, &cfg, &mut renderer, cli.command, now)?;

    info!("done");
    Ok(())
}
