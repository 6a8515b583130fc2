use anyhow::Result;
use chrono::Utc;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let stats = app.service.stats(Utc::now())?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("Cards");
            println!("  total       {}", stats.total_cards);
            println!("  new         {}", stats.new_cards);
            println!("  learning    {}", stats.learning_cards);
            println!("  review      {}", stats.review_cards);
            println!("  relearning  {}", stats.relearning_cards);
            println!("  due now     {}", stats.due_cards);
            println!("  learned     {}", stats.cards_learned);
            println!("  mature      {}", stats.cards_mature);
            println!("Reviews");
            println!("  total       {}", stats.total_reviews);
            println!("  correct     {}", stats.correct_answers);
            println!("  accuracy    {:.1}%", stats.accuracy);
            println!("  avg ease    {:.2}", stats.average_ease);
        }
    }

    Ok(())
}
