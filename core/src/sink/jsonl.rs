//! JSONL-backed sink: one `{table}.jsonl` file per table under a dataset
//! directory, rewritten on flush. The local analogue of the original
//! warehouse "bronze" dataset.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::config::WriteMode;
use crate::errors::SinkError;
use crate::sink::{RecordSink, TableBuffer, TableSpec};

pub struct JsonlSink {
    dir: PathBuf,
    buffers: HashMap<String, TableBuffer>,
}

impl JsonlSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            buffers: HashMap::new(),
        }
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.jsonl"))
    }

    async fn load_existing(&self, table: &TableSpec) -> Result<Vec<Value>, SinkError> {
        let path = self.table_path(table.name);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SinkError::Prepare {
                    table: table.name.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| SinkError::Prepare {
                    table: table.name.to_string(),
                    reason: format!("corrupt row in {}: {e}", path.display()),
                })
            })
            .collect()
    }
}

#[async_trait]
impl RecordSink for JsonlSink {
    async fn prepare(&mut self, table: &TableSpec, mode: WriteMode) -> Result<(), SinkError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SinkError::Prepare {
                table: table.name.to_string(),
                reason: e.to_string(),
            })?;

        let existing = self.load_existing(table).await?;
        self.buffers
            .insert(table.name.to_string(), TableBuffer::new(table, mode, existing));
        Ok(())
    }

    async fn write_batch(
        &mut self,
        table: &TableSpec,
        records: Vec<Value>,
    ) -> Result<(), SinkError> {
        let buffer = self
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
        let mut counts = HashMap::new();

        for (name, buffer) in self.buffers.drain() {
            let mut data = String::new();
            for row in buffer.rows() {
                let line = serde_json::to_string(row).map_err(|e| SinkError::Flush {
                    reason: e.to_string(),
                })?;
                data.push_str(&line);
                data.push('\n');
            }

            let path = self.dir.join(format!("{name}.jsonl"));
            tokio::fs::write(&path, data)
                .await
                .map_err(|e| SinkError::Flush {
                    reason: format!("{}: {e}", path.display()),
                })?;

            info!(table = %name, rows = buffer.len(), path = %path.display(), "flushed table");
            counts.insert(name, buffer.len());
        }

        Ok(counts)
    }
}
