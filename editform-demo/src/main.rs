mod form;
mod models;
mod paths;
mod validators;

use std::fs::{self, File};
use std::sync::Arc;

use editform::ServiceProvider;
use simplelog::{Config, LevelFilter, WriteLogger};

fn init_logging() {
    paths::rotate_logs();

    let path = paths::log_file();
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }

    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(LevelFilter::Debug, Config::default(), file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create log file {}: {}", path.display(), e),
    }
}

#[tokio::main]
async fn main() {
    init_logging();

    let services = Arc::new(ServiceProvider::from_registry());
    log::info!("registered {} validator(s)", services.len());

    if let Err(e) = form::run(services).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
