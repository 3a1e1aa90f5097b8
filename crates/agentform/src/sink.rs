use anyhow::Result as AnyhowResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::value::InputValue;

/// One validated input, as handed to storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInputRecord {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    pub field_name: String,
    pub chat_session_id: String,
    pub value: InputValue,
    pub is_valid: bool,
    pub validated_at: DateTime<Utc>,
}

/// Storage for submitted inputs.
///
/// Implementations persist a whole batch for one chat session. The batch arrives already
/// validated and in display order.
#[async_trait]
pub trait InputSink: Send + Sync {
    async fn save(&self, records: Vec<AgentInputRecord>) -> AnyhowResult<()>;
}

/// Keeps records in memory
#[derive(Debug, Default)]
pub struct MemoryInputSink {
    records: Mutex<Vec<AgentInputRecord>>,
}

impl MemoryInputSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<AgentInputRecord> {
        self.records.lock().await.clone()
    }

    pub async fn for_session(&self, chat_session_id: &str) -> Vec<AgentInputRecord> {
        self.records
            .lock()
            .await
            .iter()
            .filter(|record| record.chat_session_id == chat_session_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl InputSink for MemoryInputSink {
    async fn save(&self, records: Vec<AgentInputRecord>) -> AnyhowResult<()> {
        self.records.lock().await.extend(records);
        Ok(())
    }
}

/// Appends each saved record to a file as one JSON line
#[derive(Debug)]
pub struct JsonlInputSink {
    path: PathBuf,
    // batches are written one at a time
    write_lock: Mutex<()>,
}

impl JsonlInputSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl InputSink for JsonlInputSink {
    async fn save(&self, records: Vec<AgentInputRecord>) -> AnyhowResult<()> {
        let _guard = self.write_lock.lock().await;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);

        for record in &records {
            serde_json::to_writer(&mut writer, record)?;
            writeln!(writer)?;
        }

        writer.flush()?;
        Ok(())
    }
}
