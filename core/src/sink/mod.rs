pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlSink;
pub use memory::MemorySink;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::WriteMode;
use crate::errors::SinkError;

/// A destination table: its name plus the record field used as primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub primary_key: &'static str,
}

/// Contract for any destination store.
///
/// `prepare` declares a table and applies its write disposition for this
/// run, `write_batch` accepts serialized records for a prepared table, and
/// `flush` persists everything and reports final row counts per table.
/// Nothing here is transactional across tables.
#[async_trait]
pub trait RecordSink: Send {
    async fn prepare(&mut self, table: &TableSpec, mode: WriteMode) -> Result<(), SinkError>;

    async fn write_batch(
        &mut self,
        table: &TableSpec,
        records: Vec<Value>,
    ) -> Result<(), SinkError>;

    async fn flush(&mut self) -> Result<HashMap<String, usize>, SinkError>;
}

/// One table's rows for the current run, with the write disposition folded
/// in as rows arrive: merge upserts by primary key, replace starts from an
/// empty table, append keeps prior rows and never dedups.
#[derive(Debug)]
pub(crate) struct TableBuffer {
    primary_key: &'static str,
    mode: WriteMode,
    rows: Vec<Value>,
    // primary-key value -> row position, merge mode only
    index: HashMap<String, usize>,
}

impl TableBuffer {
    pub(crate) fn new(table: &TableSpec, mode: WriteMode, existing: Vec<Value>) -> Self {
        let mut buffer = Self {
            primary_key: table.primary_key,
            mode,
            rows: Vec::new(),
            index: HashMap::new(),
        };
        match mode {
            WriteMode::Replace => {}
            WriteMode::Merge => buffer.absorb(existing),
            WriteMode::Append => buffer.rows.extend(existing),
        }
        buffer
    }

    pub(crate) fn absorb(&mut self, records: Vec<Value>) {
        for row in records {
            if self.mode == WriteMode::Merge {
                if let Some(key) = self.key_of(&row) {
                    if let Some(&pos) = self.index.get(&key) {
                        self.rows[pos] = row;
                        continue;
                    }
                    self.index.insert(key, self.rows.len());
                }
            }
            self.rows.push(row);
        }
    }

    fn key_of(&self, row: &Value) -> Option<String> {
        row.get(self.primary_key).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub(crate) fn into_rows(self) -> Vec<Value> {
        self.rows
    }
}
