use clap::Parser;
use cli::Cli;
use color_eyre::{eyre::eyre, Result};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;

use crate::{action::Action, app::App, config::Config, queryworker::QueryWorker};

mod action;
mod app;
mod cli;
mod compid;
mod components;
mod config;
mod errors;
mod helper;
mod logging;
mod queryworker;
mod session;
mod statelib;
mod svclient;
mod tui;

/// Creates the query worker and the app. The query worker is already running in the returned set;
/// the app is left to the caller.
pub fn start_workers(
    config: Config,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
    tick_rate: f64,
    frame_rate: f64,
    token: CancellationToken,
) -> Result<(App, JoinSet<Result<()>>)> {
    let mut qw = QueryWorker::new(action_tx.clone(), &config, token.clone())?;
    let query_tx = qw.get_tx();

    let mut set = JoinSet::new();
    // Start query worker
    set.spawn(async move { qw.run().await });

    let app = App::new(
        config, action_tx, action_rx, query_tx, tick_rate, frame_rate, token,
    );
    Ok((app, set))
}

#[tokio::main]
async fn main() -> Result<()> {
    crate::errors::init()?;

    let args = Cli::parse();
    if let Some(msg) = args.is_valid() {
        return Err(eyre!(msg));
    }
    let paths = args.paths();
    crate::logging::init(paths.data.as_deref())?;

    let config = Config::new(paths)?.with_host(args.host.clone());
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let token = CancellationToken::new();
    let (mut app, mut set) = start_workers(
        config,
        action_tx,
        action_rx,
        args.tick_rate,
        args.frame_rate,
        token,
    )?;
    // Start app
    set.spawn(async move { app.run().await });

    while let Some(res) = set.join_next().await {
        res??;
    }
    Ok(())
}
