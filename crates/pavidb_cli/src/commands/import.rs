//! Import command implementation.
//!
//! Conflicts pause the import: each conflicting contract number is shown
//! and the operator chooses a resolution per conflict. `--replace-all`
//! and `--abort-on-conflict` settle everything without prompting.

use pavidb_core::backup::ImportSession;
use pavidb_core::{CoreError, Store};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::info;

/// Runs the import command.
pub fn run(
    path: &Path,
    input: &Path,
    replace_all: bool,
    abort_on_conflict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = fs::read_to_string(input)?;
    let store = Store::open(path)?;

    let mut session = ImportSession::begin(&store, &document)?;

    let conflict_count = session.conflicts().len();
    if conflict_count > 0 {
        println!(
            "{} contract number conflict(s) found in {:?}",
            conflict_count, input
        );

        if abort_on_conflict {
            store.close()?;
            return Err("Import aborted: conflicts present".into());
        }

        for index in 0..conflict_count {
            let number = session.conflicts()[index].number.clone();
            if replace_all {
                session.resolve_replace(index)?;
                println!("  [{index}] \"{number}\": replacing local contract");
            } else if !resolve_interactive(&mut session, index, &number)? {
                store.close()?;
                return Err("Import aborted by operator".into());
            }
        }
    }

    let report = session.commit()?;
    info!("imported {:?} into {:?}", input, path);

    println!("✓ Import committed");
    println!("  Records imported: {}", report.total());
    println!("  Contracts:     {}", report.contracts);
    println!("  Measurements:  {}", report.measurements);
    println!("  Streets:       {}", report.streets);
    println!("  Segments:      {}", report.segments);
    println!("  Professionals: {}", report.professionals);
    println!("  Services:      {}", report.services);
    if report.renamed > 0 {
        println!("  Conflicts renamed:  {}", report.renamed);
    }
    if report.replaced > 0 {
        println!("  Contracts replaced: {}", report.replaced);
    }

    store.close()?;
    Ok(())
}

/// Prompts for one conflict. Returns false when the operator aborts.
fn resolve_interactive(
    session: &mut ImportSession<'_>,
    index: usize,
    number: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    loop {
        print!("Contract \"{number}\" already exists. [r]ename incoming / re[p]lace local / [a]bort? ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(false);
        }

        match line.trim().to_lowercase().as_str() {
            "r" | "rename" => {
                print!("New number for the incoming contract: ");
                io::stdout().flush()?;
                let mut new_number = String::new();
                stdin.lock().read_line(&mut new_number)?;

                match session.resolve_rename(index, new_number.trim()) {
                    Ok(()) => return Ok(true),
                    Err(CoreError::DuplicateContractNumber { number }) => {
                        println!("Number \"{number}\" is already taken; try another.");
                    }
                    Err(CoreError::RequiredField { .. }) => {
                        println!("The new number cannot be empty.");
                    }
                    Err(other) => return Err(other.into()),
                }
            }
            "p" | "replace" => {
                session.resolve_replace(index)?;
                return Ok(true);
            }
            "a" | "abort" => return Ok(false),
            _ => println!("Please answer r, p, or a."),
        }
    }
}
