//! Narrate a short storybook out loud.
//!
//! Start the narration proxy first (`storybook-server`), then run:
//! `cargo run --example narrate_book`

use std::sync::Arc;
use std::time::Duration;
use storybook_core::book::{Page, Storybook};
use storybook_spk::{Narrator, NarratorConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let book = Arc::new(Storybook::new(
        vec![
            Page::new(
                "The Fox",
                vec!["A fox crossed the clearing at dusk".to_string()],
            ),
            Page::new(
                "The River",
                vec!["The river ran quick and cold".to_string()],
            ),
        ],
        "The End",
    ));

    let narrator = Narrator::with_config(&NarratorConfig::default(), book.clone())?;

    match narrator.load_voice_list().await {
        Ok(voices) => println!("{} remote voices available", voices.len()),
        Err(e) => eprintln!("Voice list unavailable, using defaults: {}", e),
    }

    book.open();
    narrator.set_enabled(true).await;

    while book.flip_forward() {
        tokio::time::sleep(Duration::from_secs(4)).await;
        narrator.narrate_current().await;
    }

    tokio::time::sleep(Duration::from_secs(4)).await;
    narrator.stop_narration();
    Ok(())
}
