use std::path::PathBuf;

use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use crate::core::reading::RawReading;
use crate::port::ReadingFeed;

/// Development feed: bulk history from a JSONL export, live pushes as
/// JSONL lines on stdin. Stands in for the realtime backing store,
/// which the core treats as an opaque transport anyway.
pub struct JsonlFeed {
    history_file: Option<PathBuf>,
}

impl JsonlFeed {
    pub fn new(history_file: Option<PathBuf>) -> Self {
        Self { history_file }
    }
}

impl ReadingFeed for JsonlFeed {
    async fn bulk_load(&self, device_id: &str, days: u32) -> Result<Vec<RawReading>> {
        let Some(path) = &self.history_file else {
            tracing::debug!("No history file configured for {}", device_id);
            return Ok(vec![]);
        };

        tracing::debug!("Loading up to {} days of history for {} from {:?}", days, device_id, path);
        let content = tokio::fs::read_to_string(path).await?;

        let mut readings = vec![];
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(line) {
                Ok(raw) => readings.push(raw),
                Err(e) => tracing::warn!("Skipping malformed history line: {}", e),
            }
        }

        Ok(readings)
    }

    fn subscribe(&self, _device_id: &str) -> mpsc::Receiver<RawReading> {
        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

            while let Ok(Some(line)) = lines.next_line().await {
                if line.trim().is_empty() {
                    continue;
                }

                match serde_json::from_str::<RawReading>(&line) {
                    Ok(raw) => {
                        //receiver dropped means the session is gone
                        if tx.send(raw).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!("Skipping malformed reading: {}", e),
                }
            }
        });

        rx
    }
}
