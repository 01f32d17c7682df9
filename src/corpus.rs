//! Placement corpus - the durable record of played placements
//!
//! Every landed piece becomes a `PlacementRecord`; the predictor rebuilds
//! its frequency tables from the full record list. Loading tolerates a
//! missing or malformed corpus file by starting empty, and persistence can
//! run inline or on a dedicated background runtime so disk writes never
//! stall the tick loop.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::types::{Coord, PieceKind};

/// How a placement entered the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordReason {
    /// Recorded by the spawner when a piece landed in play.
    Auto,
    /// Imported or written by an operator.
    Manual,
}

/// One played placement, the unit the predictor learns from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub piece: PieceKind,
    pub landed_coordinates: Vec<Coord>,
    pub rotation: u8,
    pub lines_cleared: u32,
    pub next_pieces_queue: Vec<PieceKind>,
    pub timestamp: u64,
    pub reason: RecordReason,
}

impl PlacementRecord {
    /// Dedup key comparison: piece kind, exact coordinate list, rotation.
    pub fn same_placement(&self, piece: PieceKind, coords: &[Coord], rotation: u8) -> bool {
        self.piece == piece
            && self.rotation == rotation
            && self.landed_coordinates.as_slice() == coords
    }
}

/// Milliseconds since the Unix epoch, zero if the clock is misbehaving.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Load records from `path`. A missing or malformed file yields an empty
/// corpus; corpus I/O never fails gameplay.
pub fn load_records(path: &Path) -> Vec<PlacementRecord> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return Vec::new(),
    };
    serde_json::from_str(&raw).unwrap_or_default()
}

/// Write the full record set to `path` as pretty JSON.
pub fn save_records(path: &Path, records: &[PlacementRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}

/// Where the spawner's accepted records go.
pub enum CorpusStore {
    /// Keep records in memory only.
    Memory,
    /// Synchronous read-modify-write of a JSON corpus file.
    File(PathBuf),
    /// Hand each accepted record set to a background writer.
    Background(PersistHandle),
}

impl CorpusStore {
    /// Records available at round start.
    pub fn load(&self) -> Vec<PlacementRecord> {
        match self {
            CorpusStore::Memory => Vec::new(),
            CorpusStore::File(path) => load_records(path),
            CorpusStore::Background(handle) => load_records(handle.path()),
        }
    }

    /// Persist the full record set. Failures are reported and swallowed.
    pub fn persist(&mut self, records: &[PlacementRecord]) {
        match self {
            CorpusStore::Memory => {}
            CorpusStore::File(path) => {
                if let Err(err) = save_records(path, records) {
                    eprintln!("corpus write failed: {:#}", err);
                }
            }
            CorpusStore::Background(handle) => handle.submit(records.to_vec()),
        }
    }
}

/// Background corpus writer.
///
/// Owns a small runtime whose single task drains a channel of record sets
/// and writes the newest one. Dropping the handle closes the channel and
/// gives the worker a bounded window to finish the final write, so every
/// accepted record set is written at least once unless the process dies.
pub struct PersistHandle {
    rt: Option<Runtime>,
    tx: Option<mpsc::UnboundedSender<Vec<PlacementRecord>>>,
    worker: Option<tokio::task::JoinHandle<()>>,
    path: PathBuf,
}

impl PersistHandle {
    pub fn start(path: PathBuf) -> Result<Self> {
        let rt = Runtime::new()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let worker_path = path.clone();
        let worker = rt.spawn(async move {
            persist_loop(worker_path, rx).await;
        });
        Ok(Self {
            rt: Some(rt),
            tx: Some(tx),
            worker: Some(worker),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Queue the full record set for writing.
    pub fn submit(&self, records: Vec<PlacementRecord>) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(records);
        }
    }
}

impl Drop for PersistHandle {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain its backlog and exit;
        // wait for that before tearing the runtime down so the final record
        // set reaches the disk.
        self.tx.take();
        if let Some(rt) = self.rt.take() {
            if let Some(worker) = self.worker.take() {
                let _ = rt.block_on(async {
                    tokio::time::timeout(Duration::from_secs(1), worker).await
                });
            }
            rt.shutdown_timeout(Duration::from_secs(1));
        }
    }
}

/// Write each record set as it arrives, coalescing bursts so only the
/// newest set in the channel hits the disk.
async fn persist_loop(path: PathBuf, mut rx: mpsc::UnboundedReceiver<Vec<PlacementRecord>>) {
    while let Some(mut records) = rx.recv().await {
        while let Ok(newer) = rx.try_recv() {
            records = newer;
        }
        if let Err(err) = save_records(&path, &records) {
            eprintln!("corpus write failed: {:#}", err);
        }
    }
}
