#![warn(non_snake_case)]
//! # rust_snap inspection tool
//!
//! Loads a scene (or generates one), runs a single drag gesture on its selection and
//! prints the resulting snap frame as JSON.
//!
//! ```text
//! rust_snap [scene.json|-] [config.json|-] [dx dy]
//! ```
//!
//! `-` (or a missing argument) means a generated scene or the default config.
//!
//! ## License
//! Licensed under the MIT License.

use std::env;
use std::error::Error;

use log::{info, warn};

use rust_snap::document::{Document, GeneratorConfig, LayoutGenerator};
use rust_snap::{SnapConfig, SnapError, SnapSession};

const DEFAULT_DELTA: (f64, f64) = (1.0, 1.0);

fn load_scene(arg: Option<&String>) -> Result<Document, Box<dyn Error>> {
    match arg.map(String::as_str) {
        Some(path) if path != "-" => {
            info!("Loading scene from {}", path);
            let text = std::fs::read_to_string(path)?;
            Ok(Document::from_json_str(&text)?)
        }
        _ => {
            let doc = LayoutGenerator::new(GeneratorConfig::default()).generate()?;
            let first = doc
                .elements
                .read()
                .iter()
                .map(|e| e.id)
                .find(|id| Some(*id) != doc.root)
                .ok_or_else(|| SnapError::InvalidConfig("generated scene is empty".into()))?;
            doc.select(&[first]);
            Ok(doc)
        }
    }
}

fn load_config(arg: Option<&String>) -> Result<SnapConfig, Box<dyn Error>> {
    match arg.map(String::as_str) {
        Some(path) if path != "-" => Ok(SnapConfig::load(path)?),
        _ => Ok(SnapConfig::default()),
    }
}

fn parse_delta(args: &[String]) -> Result<(f64, f64), Box<dyn Error>> {
    match (args.get(2), args.get(3)) {
        (Some(dx), Some(dy)) => Ok((dx.parse()?, dy.parse()?)),
        (None, None) => Ok(DEFAULT_DELTA),
        _ => Err("expected both dx and dy".into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging.
    env_logger::init();
    info!("rust_snap starting...");

    let args: Vec<String> = env::args().skip(1).collect();
    let doc = load_scene(args.first())?;
    let config = load_config(args.get(1))?;
    let (dx, dy) = parse_delta(&args)?;

    let selection = doc.selected();
    if selection.is_empty() {
        warn!("Scene has no selection; nothing to drag");
        return Ok(());
    }

    let mut session = SnapSession::new(doc, config)?;
    session.on_gesture_start(&selection)?;
    match session.on_gesture_move(&selection, dx, dy) {
        Some(frame) => println!("{}", serde_json::to_string_pretty(frame)?),
        None => warn!("Gesture produced no frame"),
    }
    session.on_gesture_end();

    info!("rust_snap exiting.");
    Ok(())
}
