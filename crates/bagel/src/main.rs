use bagel::config;
use bagel::gui::app::AppModel;
use bagel::sys::runtime;
use bagel::sys::server::{self, Command};
use clap::Parser;
use relm4::prelude::*;

/// Radial launcher menu with tap, hold and glide selection.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Send a command to the running daemon instead of starting one
    #[command(subcommand)]
    command: Option<Command>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(command) = cli.command {
        return server::send_command(command);
    }

    env_logger::init();

    let config = config::load_or_setup();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.bagel.menu");
    app.run::<AppModel>((config, rx));
    Ok(())
}
