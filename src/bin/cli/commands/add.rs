use anyhow::Result;
use chrono::Utc;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    front: String,
    back: String,
    reading: Option<String>,
    notes: Option<String>,
    tags: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let tags: Vec<String> = tags
        .map(|t| {
            t.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let card = app
        .service
        .create_card(front, back, reading, notes, tags, Utc::now())?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        OutputFormat::Plain => {
            println!("Added card {}", card.id);
            println!("  {} — {}", card.front, card.back);
        }
    }

    Ok(())
}
