use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let cards = app.service.list_cards()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No flashcards yet.");
                return Ok(());
            }

            for card in &cards {
                let reading = card
                    .reading
                    .as_deref()
                    .map(|r| format!(" ({})", r))
                    .unwrap_or_default();
                println!("{}  {}{} — {}", card.id, card.front, reading, card.back);
            }

            println!("\n{} cards total", cards.len());
        }
    }

    Ok(())
}
