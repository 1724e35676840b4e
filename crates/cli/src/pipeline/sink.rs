//! Snapshot sinks - where rendered HUD frames go

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ar_tracker::HudSnapshot;
use tracing::{debug, info, instrument};

use crate::error::CliError;

/// Output for HUD snapshots
pub trait SnapshotSink: Send {
    /// Sink name (used for logging)
    fn name(&self) -> &str;

    fn write(&mut self, snapshot: &HudSnapshot) -> Result<(), CliError>;

    fn flush(&mut self) -> Result<(), CliError>;
}

/// Sink that logs a one-line summary per snapshot
pub struct LogSink {
    name: String,
}

impl LogSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl SnapshotSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, snapshot: &HudSnapshot) -> Result<(), CliError> {
        debug!(
            sink = %self.name,
            scanning = snapshot.scanning,
            stability = snapshot.stability,
            low_stability = snapshot.low_stability,
            locked = ?snapshot.locked,
            active = ?snapshot.active,
            "HUD snapshot"
        );
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CliError> {
        Ok(())
    }
}

/// Sink that appends one JSON document per line
pub struct JsonlSink {
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl JsonlSink {
    pub fn create(name: impl Into<String>, path: &Path) -> Result<Self, CliError> {
        let name = name.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CliError::sink(&name, e))?;
        }
        let file = File::create(path).map_err(|e| CliError::sink(&name, e))?;
        info!(sink = %name, path = %path.display(), "Snapshot file opened");

        Ok(Self {
            name,
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl SnapshotSink for JsonlSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "jsonl_sink_write", skip(self, snapshot), fields(sink = %self.name))]
    fn write(&mut self, snapshot: &HudSnapshot) -> Result<(), CliError> {
        serde_json::to_writer(&mut self.writer, snapshot)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            .and_then(|_| self.writer.write_all(b"\n"))
            .map_err(|e| CliError::sink(&self.name, e))?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CliError> {
        self.writer
            .flush()
            .map_err(|e| CliError::sink(&self.name, e))?;
        debug!(sink = %self.name, path = %self.path.display(), written = self.written, "Snapshot file flushed");
        Ok(())
    }
}
