//! Status command implementation.

use pavidb_core::sync::pending_counts;
use pavidb_core::{Store, COLLECTIONS};
use std::path::Path;

/// Runs the status command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(path)?;

    println!("PavIDB Store Status");
    println!("===================");
    println!();
    println!("Path: {}", path.display());
    println!();
    println!("Records:");
    for collection in COLLECTIONS {
        println!(
            "  {:<15} {:>6} ({} pending)",
            collection,
            store.count(collection)?,
            store.dirty_count(collection)?
        );
    }

    let pending = pending_counts(&store)?;
    println!();
    if pending.total() == 0 {
        println!("Everything is synced.");
    } else {
        println!("{} record(s) pending sync.", pending.total());
    }

    store.close()?;
    Ok(())
}
