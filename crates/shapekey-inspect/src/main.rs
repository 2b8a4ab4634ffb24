//! Shapekey inspector.
//!
//! Reads a JSON scene, applies its style stages, and prints the kind, bounds
//! and geometry key of every stage.

mod scene;

use scene::{InspectError, InspectResult, Scene};

fn run() -> InspectResult<()> {
    let path = std::env::args().nth(1).ok_or(InspectError::Usage)?;
    let scene = Scene::load(std::path::Path::new(&path))?;
    let reports = scene.inspect()?;
    log::info!("Inspected {} stage(s) from {}", reports.len(), path);
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
