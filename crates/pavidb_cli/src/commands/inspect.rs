//! Inspect command implementation.

use pavidb_core::{Store, COLLECTIONS};
use pavidb_storage::{FileBackend, StorageBackend};
use serde::Serialize;
use std::path::Path;

/// Store inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Store path.
    pub path: String,
    /// Total snapshot size in bytes.
    pub total_size: u64,
    /// Total record count.
    pub record_count: usize,
    /// Total pending-sync record count.
    pub pending_count: usize,
    /// Per-collection statistics.
    pub collections: Vec<CollectionStats>,
}

/// Statistics for a single collection.
#[derive(Debug, Serialize)]
pub struct CollectionStats {
    /// Collection name.
    pub name: String,
    /// Number of records.
    pub record_count: usize,
    /// Number of records pending sync.
    pub pending_count: usize,
    /// Snapshot file size in bytes.
    pub snapshot_size: u64,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !path.is_dir() {
        return Err(format!("No store found at {:?}", path).into());
    }

    let store = Store::open(path)?;

    let mut result = InspectResult {
        path: path.display().to_string(),
        total_size: 0,
        record_count: 0,
        pending_count: 0,
        collections: Vec::with_capacity(COLLECTIONS.len()),
    };

    for collection in COLLECTIONS {
        let snapshot_path = path.join(format!("{collection}.dat"));
        let snapshot_size = if snapshot_path.exists() {
            FileBackend::open(&snapshot_path)?.size()?
        } else {
            0
        };

        let stats = CollectionStats {
            name: collection.to_string(),
            record_count: store.count(collection)?,
            pending_count: store.dirty_count(collection)?,
            snapshot_size,
        };
        result.total_size += stats.snapshot_size;
        result.record_count += stats.record_count;
        result.pending_count += stats.pending_count;
        result.collections.push(stats);
    }

    store.close()?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("PavIDB Store Inspection");
    println!("=======================");
    println!();
    println!("Path: {}", result.path);
    println!();
    println!("Totals:");
    println!("  Records:   {}", result.record_count);
    println!("  Pending:   {}", result.pending_count);
    println!("  Size:      {}", format_size(result.total_size));
    println!();
    println!("Collections:");
    for col in &result.collections {
        println!(
            "  {:<15} {:>6} records, {:>4} pending, {}",
            col.name,
            col.record_count,
            col.pending_count,
            format_size(col.snapshot_size)
        );
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
