//! Business-key validation.
//!
//! Contract numbers are unique store-wide; measurement numbers are unique
//! within their contract. Both comparisons run on the normalized form
//! (trimmed, lowercased), so `" 001/2024 "` and `"001/2024"` collide.
//!
//! The store itself does not enforce these rules; callers run them before
//! saving. The import path reuses [`normalize_number`] for conflict
//! detection.

use crate::entity::EntityId;
use crate::error::{CoreError, CoreResult};
use crate::store::Store;
use serde_json::Value;

/// Normalizes a business number for comparison.
#[must_use]
pub fn normalize_number(number: &str) -> String {
    number.trim().to_lowercase()
}

/// Rejects an empty (or whitespace-only) required field.
pub fn ensure_required(field: &'static str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::RequiredField { field });
    }
    Ok(())
}

/// Checks that no other contract carries this number.
///
/// Pass the record's own id in `exclude` when validating an edit, so a
/// contract never conflicts with itself.
pub fn ensure_unique_contract_number(
    store: &Store,
    number: &str,
    exclude: Option<EntityId>,
) -> CoreResult<()> {
    ensure_required("numero", number)?;
    let wanted = normalize_number(number);
    let exclude = exclude.map(|id| id.to_string());

    for record in store.get_all_raw("contratos")? {
        if record.get("id").and_then(Value::as_str) == exclude.as_deref() {
            continue;
        }
        let existing = record.get("numero").and_then(Value::as_str).unwrap_or("");
        if normalize_number(existing) == wanted {
            return Err(CoreError::DuplicateContractNumber {
                number: number.to_string(),
            });
        }
    }
    Ok(())
}

/// Checks that no other measurement in the same contract carries this number.
pub fn ensure_unique_measurement_number(
    store: &Store,
    contract_id: EntityId,
    number: &str,
    exclude: Option<EntityId>,
) -> CoreResult<()> {
    ensure_required("numero", number)?;
    let wanted = normalize_number(number);
    let contract = contract_id.to_string();
    let exclude = exclude.map(|id| id.to_string());

    for record in store.get_all_raw("medicoes")? {
        if record.get("contratoId").and_then(Value::as_str) != Some(contract.as_str()) {
            continue;
        }
        if record.get("id").and_then(Value::as_str) == exclude.as_deref() {
            continue;
        }
        let existing = record.get("numero").and_then(Value::as_str).unwrap_or("");
        if normalize_number(existing) == wanted {
            return Err(CoreError::DuplicateMeasurementNumber {
                number: number.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Contract, Measurement};

    #[test]
    fn normalization_trims_and_folds_case() {
        assert_eq!(normalize_number("  001/2024 "), "001/2024");
        assert_eq!(normalize_number("CT-42"), "ct-42");
    }

    #[test]
    fn required_rejects_blank() {
        assert!(ensure_required("numero", "042").is_ok());
        assert!(matches!(
            ensure_required("numero", "   "),
            Err(CoreError::RequiredField { field: "numero" })
        ));
    }

    #[test]
    fn contract_number_collides_after_normalization() {
        let store = Store::open_in_memory().unwrap();
        store.save(&Contract::new("CT-001"), false).unwrap();

        let result = ensure_unique_contract_number(&store, "  ct-001 ", None);
        assert!(matches!(
            result,
            Err(CoreError::DuplicateContractNumber { .. })
        ));

        ensure_unique_contract_number(&store, "CT-002", None).unwrap();
    }

    #[test]
    fn contract_edit_skips_itself() {
        let store = Store::open_in_memory().unwrap();
        let contract = store.save(&Contract::new("CT-001"), false).unwrap();

        ensure_unique_contract_number(&store, "CT-001", Some(contract.id)).unwrap();
    }

    #[test]
    fn measurement_numbers_are_scoped_to_the_contract() {
        let store = Store::open_in_memory().unwrap();
        let a = store.save(&Contract::new("A"), false).unwrap();
        let b = store.save(&Contract::new("B"), false).unwrap();
        store
            .save(&Measurement::new(a.id, "01", "07/2024"), false)
            .unwrap();

        // Same number under another contract is fine.
        ensure_unique_measurement_number(&store, b.id, "01", None).unwrap();

        let result = ensure_unique_measurement_number(&store, a.id, " 01 ", None);
        assert!(matches!(
            result,
            Err(CoreError::DuplicateMeasurementNumber { .. })
        ));
    }
}
