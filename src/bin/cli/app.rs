use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use kioku::{Config, StudyService};

/// Shared application state for CLI commands
pub struct App {
    pub service: StudyService,
    pub batch_size: usize,
}

impl App {
    pub fn new(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::load(config_path).context("Failed to load config")?;
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }

        let service = StudyService::new(config.data_dir.clone(), config.review.new_card_order)
            .context("Failed to initialize storage")?;

        Ok(Self {
            service,
            batch_size: config.review.batch_size,
        })
    }
}
