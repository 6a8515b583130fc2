use anyhow::Result;
use uuid::Uuid;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, card_id: Uuid, format: &OutputFormat) -> Result<()> {
    app.service.delete_card(card_id)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "deleted": card_id }));
        }
        OutputFormat::Plain => {
            println!("Deleted card {} and its schedule", card_id);
        }
    }

    Ok(())
}
