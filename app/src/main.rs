//! Noty entry point: opens the data directory and lists its notes

use noty::{init_logging, load_settings, AppContext};
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let data_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".noty"));

    let settings = load_settings(&data_dir);
    init_logging(&settings.logging.filter);
    tracing::info!("Starting Noty in {:?}", data_dir);

    let ctx = match AppContext::open_with_settings(&data_dir, settings) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("Failed to open application context: {}", e);
            std::process::exit(1);
        }
    };

    let active = ctx.notes().active_note_id();
    for note in ctx.notes().notes() {
        let marker = if active.as_deref() == Some(note.id.as_str()) { "*" } else { " " };
        println!("{} {}  {}", marker, note.id, note.title);
    }

    let stats = ctx.text().stats();
    println!(
        "scratch: {} words, {} characters, theme {}",
        stats.words,
        stats.characters,
        ctx.theme().theme()
    );

    if let Err(e) = ctx.teardown() {
        tracing::error!("Failed to close application context: {}", e);
        std::process::exit(1);
    }
}
