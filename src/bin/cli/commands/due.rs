use anyhow::Result;
use chrono::Utc;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, limit: Option<usize>, format: &OutputFormat) -> Result<()> {
    let limit = limit.unwrap_or(app.batch_size);
    let batch = app.service.due_batch(Utc::now(), limit)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&batch)?);
        }
        OutputFormat::Plain => {
            if batch.is_empty() {
                println!("Nothing due. Go read some manga.");
                return Ok(());
            }

            for due in &batch {
                println!(
                    "{}  [{:?}] {} — {}",
                    due.card.id, due.state.phase, due.card.front, due.card.back
                );
            }

            println!("\n{} cards due", batch.len());
        }
    }

    Ok(())
}
