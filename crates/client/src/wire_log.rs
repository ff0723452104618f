//! Wire transcript - JSON lines of everything sent and received
//!
//! Each record is `{"dir":"in"|"out","ts":<unix ms>,"line":"..."}`. The
//! transcript is best effort: the first write failure is logged and turns the
//! transcript off for the rest of the session.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "in")]
    In,
    #[serde(rename = "out")]
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecord<'a> {
    pub dir: Direction,
    pub ts: u64,
    /// Borrowed when read back unless the JSON had escapes.
    #[serde(borrow)]
    pub line: Cow<'a, str>,
}

pub struct WireLog {
    path: PathBuf,
    file: Option<File>,
    buf: Vec<u8>,
}

impl WireLog {
    /// Open `path` for appending, creating it if needed.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self {
            path,
            file: Some(file),
            buf: Vec::with_capacity(256),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub async fn record(&mut self, dir: Direction, line: &str) {
        let Some(file) = self.file.as_mut() else {
            return;
        };

        let rec = WireRecord {
            dir,
            ts: current_timestamp_ms(),
            line: Cow::Borrowed(line.trim_end_matches(['\r', '\n'])),
        };

        self.buf.clear();
        if serde_json::to_writer(&mut self.buf, &rec).is_err() {
            return;
        }
        self.buf.push(b'\n');

        let buf = &self.buf;
        let written = async {
            file.write_all(buf).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            warn!(path = %self.path.display(), error = %e, "wire transcript disabled");
            self.file = None;
        }
    }
}

fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
