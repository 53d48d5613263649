//! Full-database export and import.
//!
//! A backup is a single JSON document: one array of records per collection.
//! Records travel as raw JSON, so fields this build does not know about
//! survive an export/import round trip untouched.
//!
//! Importing is a two-phase affair. [`ImportSession::begin`] parses and
//! stages the document and detects contract-number conflicts (an incoming
//! contract whose normalized number matches a local contract with a
//! different id). Nothing touches the store until every conflict carries a
//! resolution and [`ImportSession::commit`] runs. Dropping the session
//! without committing aborts the import.

use crate::cascade::delete_contract_cascade;
use crate::entity::EntityId;
use crate::error::{CoreError, CoreResult};
use crate::store::{Store, COLLECTIONS};
use crate::validate::normalize_number;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Serializes the whole store as a backup document.
///
/// Collections the store holds no records for still appear as empty
/// arrays, so a backup is always structurally complete.
pub fn export_all(store: &Store) -> CoreResult<String> {
    let mut doc = Map::new();
    for collection in COLLECTIONS {
        let records = store.get_all_raw(collection)?;
        doc.insert(collection.to_string(), Value::Array(records));
    }
    Ok(serde_json::to_string_pretty(&Value::Object(doc))?)
}

/// How to settle one contract-number conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictResolution {
    /// Keep both: the incoming contract is imported under a new number.
    Rename(String),
    /// The incoming contract wins: the local contract and everything it
    /// owns are deleted first.
    Replace,
}

/// An incoming contract whose number collides with a local contract.
#[derive(Debug, Clone)]
pub struct ContractConflict {
    /// The colliding number, as carried by the incoming record.
    pub number: String,
    /// Id of the incoming contract.
    pub incoming_id: String,
    /// Id of the local contract holding the number.
    pub local_id: String,
    /// Chosen resolution, if any.
    pub resolution: Option<ConflictResolution>,
}

impl ContractConflict {
    /// Whether a resolution has been chosen.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }
}

/// Records accepted per collection by a committed import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Contracts imported.
    pub contracts: usize,
    /// Measurements imported.
    pub measurements: usize,
    /// Streets imported.
    pub streets: usize,
    /// Segments imported.
    pub segments: usize,
    /// Professionals imported.
    pub professionals: usize,
    /// Curb services imported.
    pub services: usize,
    /// Conflicts settled by rename.
    pub renamed: usize,
    /// Conflicts settled by replacing the local contract.
    pub replaced: usize,
}

impl ImportReport {
    /// Total records imported across all collections.
    #[must_use]
    pub fn total(&self) -> usize {
        self.contracts
            + self.measurements
            + self.streets
            + self.segments
            + self.professionals
            + self.services
    }

    fn slot_mut(&mut self, collection: &str) -> Option<&mut usize> {
        match collection {
            "contratos" => Some(&mut self.contracts),
            "medicoes" => Some(&mut self.measurements),
            "ruas" => Some(&mut self.streets),
            "trechos" => Some(&mut self.segments),
            "profissionais" => Some(&mut self.professionals),
            "servicos" => Some(&mut self.services),
            _ => None,
        }
    }
}

/// A staged, not-yet-committed import.
pub struct ImportSession<'a> {
    store: &'a Store,
    staged: BTreeMap<&'static str, Vec<Value>>,
    conflicts: Vec<ContractConflict>,
}

impl<'a> ImportSession<'a> {
    /// Parses a backup document and stages it against the store.
    ///
    /// Tolerates missing collections (staged as empty). Unknown top-level
    /// keys are logged and skipped; records without a string `id` are
    /// logged and skipped. A collection that is present but not an array
    /// fails the whole document.
    pub fn begin(store: &'a Store, document: &str) -> CoreResult<Self> {
        let parsed: Value = serde_json::from_str(document)
            .map_err(|e| CoreError::invalid_backup(format!("not valid JSON: {e}")))?;
        let Value::Object(mut doc) = parsed else {
            return Err(CoreError::invalid_backup("document is not a JSON object"));
        };

        let mut staged: BTreeMap<&'static str, Vec<Value>> = BTreeMap::new();
        for collection in COLLECTIONS {
            let records = match doc.remove(collection) {
                None => Vec::new(),
                Some(Value::Array(records)) => records,
                Some(_) => {
                    return Err(CoreError::invalid_backup(format!(
                        "collection is not an array: {collection}"
                    )));
                }
            };

            let mut kept = Vec::with_capacity(records.len());
            for record in records {
                if record.get("id").and_then(Value::as_str).is_some() {
                    kept.push(record);
                } else {
                    warn!(collection, "skipping imported record without id");
                }
            }
            staged.insert(collection, kept);
        }

        for key in doc.keys() {
            warn!(key = %key, "skipping unknown collection in backup");
        }

        let conflicts = detect_conflicts(store, &staged)?;
        Ok(Self {
            store,
            staged,
            conflicts,
        })
    }

    /// The detected contract-number conflicts.
    #[must_use]
    pub fn conflicts(&self) -> &[ContractConflict] {
        &self.conflicts
    }

    /// Number of conflicts still without a resolution.
    #[must_use]
    pub fn unresolved(&self) -> usize {
        self.conflicts.iter().filter(|c| !c.is_resolved()).count()
    }

    /// Resolves a conflict by importing the incoming contract under a new
    /// number.
    ///
    /// The new number must not collide with any local contract, any other
    /// staged contract, or a rename already chosen for another conflict;
    /// on collision the conflict stays unresolved and an error is
    /// returned.
    pub fn resolve_rename(&mut self, index: usize, new_number: &str) -> CoreResult<()> {
        crate::validate::ensure_required("numero", new_number)?;
        let conflict = self
            .conflicts
            .get(index)
            .ok_or_else(|| CoreError::invalid_operation("no such conflict"))?;
        let wanted = normalize_number(new_number);

        for record in self.store.get_all_raw("contratos")? {
            let number = record.get("numero").and_then(Value::as_str).unwrap_or("");
            if normalize_number(number) == wanted {
                return Err(CoreError::DuplicateContractNumber {
                    number: new_number.to_string(),
                });
            }
        }
        for record in self.staged.get("contratos").into_iter().flatten() {
            if record.get("id").and_then(Value::as_str) == Some(conflict.incoming_id.as_str()) {
                continue;
            }
            let number = record.get("numero").and_then(Value::as_str).unwrap_or("");
            if !number.trim().is_empty() && normalize_number(number) == wanted {
                return Err(CoreError::DuplicateContractNumber {
                    number: new_number.to_string(),
                });
            }
        }
        for (other, settled) in self.conflicts.iter().enumerate() {
            if other == index {
                continue;
            }
            if let Some(ConflictResolution::Rename(pending)) = &settled.resolution {
                if normalize_number(pending) == wanted {
                    return Err(CoreError::DuplicateContractNumber {
                        number: new_number.to_string(),
                    });
                }
            }
        }

        self.conflicts[index].resolution =
            Some(ConflictResolution::Rename(new_number.trim().to_string()));
        Ok(())
    }

    /// Resolves a conflict by letting the incoming contract replace the
    /// local one (the local contract and its hierarchy are cascade-deleted
    /// on commit).
    pub fn resolve_replace(&mut self, index: usize) -> CoreResult<()> {
        let conflict = self
            .conflicts
            .get_mut(index)
            .ok_or_else(|| CoreError::invalid_operation("no such conflict"))?;
        conflict.resolution = Some(ConflictResolution::Replace);
        Ok(())
    }

    /// Applies the staged import to the store.
    ///
    /// Fails without touching the store while any conflict is unresolved.
    /// Imported records are saved as synced; staged contracts are stamped
    /// with `importedAt`.
    pub fn commit(mut self) -> CoreResult<ImportReport> {
        let unresolved = self.unresolved();
        if unresolved > 0 {
            return Err(CoreError::UnresolvedConflicts { count: unresolved });
        }

        let mut report = ImportReport::default();

        for conflict in &self.conflicts {
            match &conflict.resolution {
                Some(ConflictResolution::Replace) => {
                    if let Some(local_id) = EntityId::parse(&conflict.local_id) {
                        delete_contract_cascade(self.store, local_id)?;
                    } else {
                        self.store.delete_raw("contratos", &conflict.local_id)?;
                    }
                    report.replaced += 1;
                }
                Some(ConflictResolution::Rename(new_number)) => {
                    if let Some(contracts) = self.staged.get_mut("contratos") {
                        for record in contracts.iter_mut() {
                            if record.get("id").and_then(Value::as_str)
                                == Some(conflict.incoming_id.as_str())
                            {
                                if let Some(obj) = record.as_object_mut() {
                                    obj.insert(
                                        "numero".into(),
                                        Value::String(new_number.clone()),
                                    );
                                }
                            }
                        }
                    }
                    report.renamed += 1;
                }
                // unresolved() == 0 was checked above
                None => {}
            }
        }

        let imported_at = serde_json::to_value(Utc::now())?;
        if let Some(contracts) = self.staged.get_mut("contratos") {
            for record in contracts.iter_mut() {
                if let Some(obj) = record.as_object_mut() {
                    obj.insert("importedAt".into(), imported_at.clone());
                }
            }
        }

        for collection in COLLECTIONS {
            let records = self.staged.remove(collection).unwrap_or_default();
            if let Some(slot) = report.slot_mut(collection) {
                *slot = records.len();
            }
            for record in records {
                self.store.save_raw(collection, record, true)?;
            }
        }

        info!(
            total = report.total(),
            renamed = report.renamed,
            replaced = report.replaced,
            "import committed"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for ImportSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportSession")
            .field("conflicts", &self.conflicts)
            .finish_non_exhaustive()
    }
}

/// Finds incoming contracts whose normalized number matches a local
/// contract under a different id. Blank numbers never conflict.
fn detect_conflicts(
    store: &Store,
    staged: &BTreeMap<&'static str, Vec<Value>>,
) -> CoreResult<Vec<ContractConflict>> {
    let local: Vec<(String, String)> = store
        .get_all_raw("contratos")?
        .into_iter()
        .filter_map(|record| {
            let id = record.get("id").and_then(Value::as_str)?.to_string();
            let number = record
                .get("numero")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            Some((id, number))
        })
        .collect();

    let mut conflicts = Vec::new();
    for record in staged.get("contratos").into_iter().flatten() {
        let Some(incoming_id) = record.get("id").and_then(Value::as_str) else {
            continue;
        };
        let number = record.get("numero").and_then(Value::as_str).unwrap_or("");
        if number.trim().is_empty() {
            continue;
        }
        let wanted = normalize_number(number);

        for (local_id, local_number) in &local {
            if local_id != incoming_id && normalize_number(local_number) == wanted {
                conflicts.push(ContractConflict {
                    number: number.to_string(),
                    incoming_id: incoming_id.to_string(),
                    local_id: local_id.clone(),
                    resolution: None,
                });
                break;
            }
        }
    }
    Ok(conflicts)
}

/// One-shot import for documents expected to be conflict-free.
///
/// Fails before touching the store if any contract-number conflict is
/// detected; interactive callers use [`ImportSession`] instead.
pub fn import_all(store: &Store, document: &str) -> CoreResult<ImportReport> {
    let session = ImportSession::begin(store, document)?;
    if !session.conflicts().is_empty() {
        return Err(CoreError::UnresolvedConflicts {
            count: session.conflicts().len(),
        });
    }
    session.commit()
}
