//! Export command implementation.

use chrono::Local;
use pavidb_core::backup::export_all;
use pavidb_core::{Store, COLLECTIONS};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Runs the export command.
pub fn run(path: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(path)?;

    let document = export_all(&store)?;

    let output = output.map_or_else(default_output_path, Path::to_path_buf);
    let mut file = fs::File::create(&output)?;
    file.write_all(document.as_bytes())?;
    file.sync_all()?;

    info!("exported store {:?} to {:?}", path, output);

    println!("✓ Backup created successfully");
    println!("  Path: {:?}", output);
    println!("  Size: {} bytes", document.len());
    for collection in COLLECTIONS {
        println!("  {:<15} {}", collection, store.count(collection)?);
    }

    store.close()?;
    Ok(())
}

fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "PAVINSPECT_BACKUP_{}.json",
        Local::now().format("%Y-%m-%d")
    ))
}
