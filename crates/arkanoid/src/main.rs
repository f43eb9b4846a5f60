use arkanoid::config::GameConfig;
use arkanoid::game::Game;
use arkanoid_engine::device::GpuInit;
use arkanoid_engine::logging::{init_logging, LoggingConfig};
use arkanoid_engine::window::Runtime;

fn main() {
    init_logging(LoggingConfig::default());

    let config = GameConfig::default();
    log::info!("starting {} ({}x{})", config.title, config.width, config.height);

    if let Err(e) = Runtime::run(config.runtime_config(), GpuInit::default(), Game::new(config)) {
        eprintln!("arkanoid: {e:#}");
        std::process::exit(1);
    }
}
