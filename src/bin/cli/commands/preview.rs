use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use kioku::srs::Grade;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, card_id: Uuid, format: &OutputFormat) -> Result<()> {
    let preview = app.service.preview(card_id, Utc::now())?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
        OutputFormat::Plain => {
            println!("Card {}:", card_id);
            for (grade, formatted) in Grade::ALL.iter().zip(preview.formatted.iter()) {
                println!("  {:>5?} ({}) -> {}", grade, grade.rating(), formatted);
            }
        }
    }

    Ok(())
}
