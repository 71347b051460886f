use anyhow::Result;
use gochi_engine::device::GpuInit;
use gochi_engine::logging::{LoggingConfig, init_logging};
use gochi_engine::window::{Runtime, RuntimeConfig};
use gochi_game::game::TITLE;
use gochi_game::{ControlsConfig, Game, GameConfig};

fn run() -> Result<()> {
    let game = Game::new(GameConfig::default(), ControlsConfig::default());

    let config = RuntimeConfig {
        title: TITLE.to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), game)
}

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(err) = run() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}
