use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use kioku::srs::algorithm::format_interval;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, card_id: Uuid, rating: i32, format: &OutputFormat) -> Result<()> {
    let state = app.service.submit_review(card_id, rating, Utc::now())?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        OutputFormat::Plain => {
            println!(
                "Card {} is now {:?}, next review in {}",
                card_id,
                state.phase,
                format_interval(state.interval_days)
            );
        }
    }

    Ok(())
}
