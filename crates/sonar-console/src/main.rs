mod app;
mod audio;
mod cli;
mod hud;
mod logging;
mod sensors;

use clap::Parser;
use sonar_config::Config;
use tracing::info;

use crate::app::App;
use crate::audio::PingSound;
use crate::cli::Cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let log_path = logging::init(cli.log_file.as_deref());

    let mut config = Config::load(cli.config.as_deref());
    cli.apply(&mut config);

    if let Some(path) = &cli.export_ping {
        PingSound::standard().write_wav(path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        log = ?log_path,
        "starting sonar console"
    );
    let app = App::new(config, cli.config.clone(), cli.persist(), cli.seed);

    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}
