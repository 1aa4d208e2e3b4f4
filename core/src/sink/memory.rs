//! In-memory sink for tests and dry runs. Clones share one store, so a
//! second run against a clone sees the first run's rows.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::config::WriteMode;
use crate::errors::SinkError;
use crate::sink::{RecordSink, TableBuffer, TableSpec};

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<SinkState>>,
}

#[derive(Debug, Default)]
struct SinkState {
    stored: HashMap<String, Vec<Value>>,
    buffers: HashMap<String, TableBuffer>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently persisted for a table (flushed state, not buffers).
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock().stored.get(table).cloned().unwrap_or_default()
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.lock().stored.get(table).map_or(0, Vec::len)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn prepare(&mut self, table: &TableSpec, mode: WriteMode) -> Result<(), SinkError> {
        let mut state = self.lock();
        let existing = state.stored.get(table.name).cloned().unwrap_or_default();
        state
            .buffers
            .insert(table.name.to_string(), TableBuffer::new(table, mode, existing));
        Ok(())
    }

    async fn write_batch(
        &mut self,
        table: &TableSpec,
        records: Vec<Value>,
    ) -> Result<(), SinkError> {
        let mut state = self.lock();
        let buffer = state
            .buffers
            .get_mut(table.name)
            .ok_or_else(|| SinkError::Write {
                table: table.name.to_string(),
                reason: "table was not prepared for this run".to_string(),
            })?;
        buffer.absorb(records);
        Ok(())
    }

    async fn flush(&mut self) -> Result<HashMap<String, usize>, SinkError> {
        let mut state = self.lock();
        let buffers: Vec<(String, TableBuffer)> = state.buffers.drain().collect();

        let mut counts = HashMap::new();
        for (name, buffer) in buffers {
            counts.insert(name.clone(), buffer.len());
            state.stored.insert(name, buffer.into_rows());
        }
        Ok(counts)
    }
}
