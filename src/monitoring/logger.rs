use anyhow::Result;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;

use crate::analytics::scanner::ClassifiedMarket;

pub struct CsvLogger {
    log_path: String,
}

impl CsvLogger {
    pub fn new(log_path: String) -> Result<Self> {
        // Create CSV file with headers if it doesn't exist
        if !std::path::Path::new(&log_path).exists() {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .open(&log_path)?;

            writeln!(
                file,
                "timestamp,game_id,market,state,side,probability,deviation_points,confidence,odds"
            )?;
        }

        Ok(Self { log_path })
    }

    /// Log a classified market to CSV
    pub fn log_signal(&self, market: &ClassifiedMarket) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.log_path)?;

        let side_str = market.classification.side.as_deref().unwrap_or("");

        writeln!(
            file,
            "{},{},{},{},{},{:.4},{:.2},{:.1},{}",
            Utc::now().to_rfc3339(),
            market.game_id,
            market.kind,
            market.classification.state,
            side_str,
            market.classification.probability,
            market.signal.deviation_points,
            market.signal.confidence_score,
            market.american_odds
        )?;

        Ok(())
    }

    /// Log a lifecycle event
    pub fn log_event(&self, event: &str) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.log_path)?;

        writeln!(file, "{},EVENT,{},,,,,,", Utc::now().to_rfc3339(), event)?;

        Ok(())
    }
}
