mod config;
mod core;
mod render;
mod report;
mod types;
mod ui;

use std::fs::File;

/// The alternate screen owns stdout, so logs go to a file instead. Enabled
/// only when RUST_LOG is set to keep normal runs from leaving files behind.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let log_file = File::create("wordfall.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;
    ui::run()
}
