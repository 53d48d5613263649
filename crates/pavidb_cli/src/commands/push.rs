//! Push command implementation.

use pavidb_core::sync::push_pending;
use pavidb_core::Store;
use std::path::Path;

/// Runs the push command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(path)?;

    let pushed = push_pending(&store)?;

    if pushed.total() == 0 {
        println!("Nothing pending; store is already synced.");
    } else {
        println!("✓ {} record(s) marked as synced", pushed.total());
        println!("  Contracts:     {}", pushed.contracts);
        println!("  Measurements:  {}", pushed.measurements);
        println!("  Streets:       {}", pushed.streets);
        println!("  Segments:      {}", pushed.segments);
        println!("  Professionals: {}", pushed.professionals);
        println!("  Services:      {}", pushed.services);
    }

    store.close()?;
    Ok(())
}
