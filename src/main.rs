use anyhow::Result;
use glstep::{config, App};
use log::info;
use simple_logger::SimpleLogger;

fn main() -> Result<()> {
    // Optional first argument: path to a config file
    let config = match std::env::args_os().nth(1) {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_create_config()?,
    };

    SimpleLogger::new().with_level(config.log_level()).init()?;
    info!("Starting exercise {:?}", config.rendering.exercise);

    let (app, event_loop) = App::new(&config)?;
    app.run(event_loop)
}
