//! Cascade deletion along the ownership hierarchy.
//!
//! Deleting a parent removes everything it owns: a contract takes its
//! measurements, each measurement its streets, each street its segments
//! and curb services. Professionals are never cascaded; segments keeping
//! a dangling `profissionalId` afterwards is expected.
//!
//! Children are removed before their parent, so an interrupted cascade
//! never strands records whose owner is already gone.

use crate::entity::EntityId;
use crate::error::CoreResult;
use crate::store::Store;
use serde_json::Value;
use tracing::info;

/// Returns the ids of records in `collection` whose `field` equals `parent`.
fn children_of(
    store: &Store,
    collection: &str,
    field: &str,
    parent: &str,
) -> CoreResult<Vec<String>> {
    Ok(store
        .get_all_raw(collection)?
        .into_iter()
        .filter(|record| record.get(field).and_then(Value::as_str) == Some(parent))
        .filter_map(|record| {
            record
                .get("id")
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
        .collect())
}

/// Deletes a street together with its segments and curb services.
pub fn delete_street_cascade(store: &Store, street_id: EntityId) -> CoreResult<()> {
    let street = street_id.to_string();

    for id in children_of(store, "trechos", "ruaId", &street)? {
        store.delete_raw("trechos", &id)?;
    }
    for id in children_of(store, "servicos", "ruaId", &street)? {
        store.delete_raw("servicos", &id)?;
    }
    store.delete_raw("ruas", &street)?;

    info!(street = %street, "cascade-deleted street");
    Ok(())
}

/// Deletes a measurement together with its streets (and their children).
pub fn delete_measurement_cascade(store: &Store, measurement_id: EntityId) -> CoreResult<()> {
    let measurement = measurement_id.to_string();

    for id in children_of(store, "ruas", "medicaoId", &measurement)? {
        if let Some(street_id) = EntityId::parse(&id) {
            delete_street_cascade(store, street_id)?;
        }
    }
    store.delete_raw("medicoes", &measurement)?;

    info!(measurement = %measurement, "cascade-deleted measurement");
    Ok(())
}

/// Deletes a contract together with its measurements (and their children).
pub fn delete_contract_cascade(store: &Store, contract_id: EntityId) -> CoreResult<()> {
    let contract = contract_id.to_string();

    for id in children_of(store, "medicoes", "contratoId", &contract)? {
        if let Some(measurement_id) = EntityId::parse(&id) {
            delete_measurement_cascade(store, measurement_id)?;
        }
    }
    store.delete_raw("contratos", &contract)?;

    info!(contract = %contract, "cascade-deleted contract");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Contract, InterventionKind, Measurement, PavementKind, Professional, Segment, Service,
        ServiceKind, Street,
    };

    struct Fixture {
        store: Store,
        contract: Contract,
        measurement: Measurement,
        street: Street,
        other_street: Street,
        professional: Professional,
    }

    /// One contract, one measurement, two streets. The first street has a
    /// segment and a service; the second only a segment.
    fn fixture() -> Fixture {
        let store = Store::open_in_memory().unwrap();

        let professional = store.save(&Professional::new("Maria Souza"), false).unwrap();
        let contract = store.save(&Contract::new("001/2024"), false).unwrap();
        let measurement = store
            .save(&Measurement::new(contract.id, "01", "07/2024"), false)
            .unwrap();
        let street = store
            .save(
                &Street::new(
                    measurement.id,
                    "Rua A",
                    "Centro",
                    "Horizonte",
                    InterventionKind::New,
                ),
                false,
            )
            .unwrap();
        let other_street = store
            .save(
                &Street::new(
                    measurement.id,
                    "Rua B",
                    "Centro",
                    "Horizonte",
                    InterventionKind::Recovery,
                ),
                false,
            )
            .unwrap();

        store
            .save(
                &Segment::new(
                    street.id,
                    professional.id,
                    -5.7,
                    -35.2,
                    10.0,
                    2.0,
                    InterventionKind::New,
                    PavementKind::InterlockedH8,
                ),
                false,
            )
            .unwrap();
        store
            .save(
                &Segment::new(
                    other_street.id,
                    professional.id,
                    -5.7,
                    -35.2,
                    8.0,
                    2.5,
                    InterventionKind::Recovery,
                    PavementKind::Concrete,
                ),
                false,
            )
            .unwrap();
        store
            .save(
                &Service::new(street.id, ServiceKind::CurbInstallation, 20.0),
                false,
            )
            .unwrap();

        Fixture {
            store,
            contract,
            measurement,
            street,
            other_street,
            professional,
        }
    }

    #[test]
    fn street_cascade_takes_segments_and_services() {
        let f = fixture();

        delete_street_cascade(&f.store, f.street.id).unwrap();

        assert!(f.store.get::<Street>(f.street.id).unwrap().is_none());
        assert_eq!(f.store.count("servicos").unwrap(), 0);
        // The other street's segment is untouched.
        assert_eq!(f.store.count("trechos").unwrap(), 1);
        assert!(f.store.get::<Street>(f.other_street.id).unwrap().is_some());
    }

    #[test]
    fn measurement_cascade_takes_all_streets() {
        let f = fixture();

        delete_measurement_cascade(&f.store, f.measurement.id).unwrap();

        assert_eq!(f.store.count("medicoes").unwrap(), 0);
        assert_eq!(f.store.count("ruas").unwrap(), 0);
        assert_eq!(f.store.count("trechos").unwrap(), 0);
        assert_eq!(f.store.count("servicos").unwrap(), 0);
        assert!(f.store.get::<Contract>(f.contract.id).unwrap().is_some());
    }

    #[test]
    fn contract_cascade_empties_the_hierarchy() {
        let f = fixture();

        delete_contract_cascade(&f.store, f.contract.id).unwrap();

        assert_eq!(f.store.count("contratos").unwrap(), 0);
        assert_eq!(f.store.count("medicoes").unwrap(), 0);
        assert_eq!(f.store.count("ruas").unwrap(), 0);
        assert_eq!(f.store.count("trechos").unwrap(), 0);
        assert_eq!(f.store.count("servicos").unwrap(), 0);
    }

    #[test]
    fn professionals_are_never_cascaded() {
        let f = fixture();

        delete_contract_cascade(&f.store, f.contract.id).unwrap();

        assert!(f
            .store
            .get::<Professional>(f.professional.id)
            .unwrap()
            .is_some());
    }

    #[test]
    fn cascade_of_missing_parent_is_a_no_op() {
        let f = fixture();
        let before = f.store.count("ruas").unwrap();

        delete_street_cascade(&f.store, EntityId::new()).unwrap();

        assert_eq!(f.store.count("ruas").unwrap(), before);
    }
}
