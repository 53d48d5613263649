//! Typed records for the inspection hierarchy.
//!
//! The ownership hierarchy is:
//!
//! ```text
//! Contract (contratos)
//! └─ Measurement (medicoes)
//!    └─ Street (ruas)
//!       ├─ Segment (trechos)   — references a Professional (non-owning)
//!       └─ Service (servicos)  — optionally references a Segment
//! ```
//!
//! Professionals (`profissionais`) live outside the hierarchy; deleting one
//! never cascades, and a segment keeping a dangling `profissionalId` is a
//! normal state for display layers to handle.
//!
//! Wire names follow the interchange format of the original field tool
//! (Portuguese, camelCase), so exported documents remain readable by other
//! devices holding the same data.

use crate::entity::{Entity, EntityId, SyncMeta};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Activity status of a professional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfessionalStatus {
    /// Currently active in the field.
    #[serde(rename = "Ativo")]
    Active,
    /// No longer assigned.
    #[serde(rename = "Inativo")]
    Inactive,
}

/// Kind of pavement intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterventionKind {
    /// Newly paved.
    #[serde(rename = "NOVA")]
    New,
    /// Recovery of existing pavement.
    #[serde(rename = "RECUPERACAO")]
    Recovery,
}

/// Pavement type of a measured segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PavementKind {
    /// Rough stone.
    #[serde(rename = "PEDRA_TOSCA")]
    RoughStone,
    /// Interlocked pavers, 4 cm.
    #[serde(rename = "INTERTRAVADO_H4")]
    InterlockedH4,
    /// Interlocked pavers, 6 cm.
    #[serde(rename = "INTERTRAVADO_H6")]
    InterlockedH6,
    /// Interlocked pavers, 8 cm.
    #[serde(rename = "INTERTRAVADO_H8")]
    InterlockedH8,
    /// Hexagonal interlocked pavers, 8 cm.
    #[serde(rename = "INTERTRAVADO_SEXTAVADO_H8")]
    InterlockedHexH8,
    /// Poured concrete.
    #[serde(rename = "CONCRETO")]
    Concrete,
    /// Cobblestone.
    #[serde(rename = "PARALELEPIPEDO")]
    Cobblestone,
    /// Portuguese stone.
    #[serde(rename = "PEDRA_PORTUGUESA")]
    PortugueseStone,
}

/// Kind of complementary curb service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceKind {
    /// Removal of existing curb.
    #[serde(rename = "RETIRADA_MEIO_FIO")]
    CurbRemoval,
    /// Installation of new curb.
    #[serde(rename = "ASSENTAMENTO_MEIO_FIO")]
    CurbInstallation,
}

/// Stage tag of an evidence photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotoKind {
    /// Before the intervention.
    #[serde(rename = "Antes")]
    Before,
    /// During the intervention.
    #[serde(rename = "Durante")]
    During,
    /// After the intervention.
    #[serde(rename = "Depois")]
    After,
    /// General context.
    #[serde(rename = "Geral")]
    General,
}

/// An evidence photo embedded inline on a record.
///
/// Payloads are kept as inline base64 data URIs so a full-database export
/// stays a single portable file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoEvidence {
    /// Photo identity.
    pub id: EntityId,
    /// Base64 data-URI payload.
    pub base64: String,
    /// Stage tag.
    #[serde(rename = "tipo")]
    pub kind: PhotoKind,
    /// Capture date (`YYYY-MM-DD`).
    #[serde(rename = "data")]
    pub date: String,
    /// Capture time (`HH:MM`).
    #[serde(rename = "hora")]
    pub time: String,
}

/// A field professional responsible for measured segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Professional {
    /// Record identity.
    pub id: EntityId,
    /// Full name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Nickname used in the field.
    #[serde(rename = "apelido", default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Contact phone.
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Activity status.
    pub status: ProfessionalStatus,
    /// Sync metadata.
    #[serde(flatten)]
    pub sync: SyncMeta,
}

impl Professional {
    /// Creates a new active professional.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            nickname: None,
            phone: None,
            status: ProfessionalStatus::Active,
            sync: SyncMeta::dirty(),
        }
    }
}

impl Entity for Professional {
    const COLLECTION: &'static str = "profissionais";

    fn id(&self) -> EntityId {
        self.id
    }

    fn sync(&self) -> &SyncMeta {
        &self.sync
    }

    fn sync_mut(&mut self) -> &mut SyncMeta {
        &mut self.sync
    }
}

/// A pavement-works contract, root of the ownership hierarchy.
///
/// The `number` is the business key: unique across all contracts after
/// trimming and case folding (see [`crate::validate`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Record identity.
    pub id: EntityId,
    /// Human-assigned contract number, e.g. `042/2024`.
    #[serde(rename = "numero")]
    pub number: String,
    /// Set by the import path when this record arrived from a backup.
    #[serde(
        rename = "importedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub imported_at: Option<DateTime<Utc>>,
    /// Sync metadata.
    #[serde(flatten)]
    pub sync: SyncMeta,
}

impl Contract {
    /// Creates a new contract with the given number.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            number: number.into(),
            imported_at: None,
            sync: SyncMeta::dirty(),
        }
    }
}

impl Entity for Contract {
    const COLLECTION: &'static str = "contratos";

    fn id(&self) -> EntityId {
        self.id
    }

    fn sync(&self) -> &SyncMeta {
        &self.sync
    }

    fn sync_mut(&mut self) -> &mut SyncMeta {
        &mut self.sync
    }
}

/// A measurement campaign within a contract.
///
/// The `number` is unique within its contract (normalized like contract
/// numbers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Record identity.
    pub id: EntityId,
    /// Owning contract.
    #[serde(rename = "contratoId")]
    pub contract_id: EntityId,
    /// Campaign number within the contract.
    #[serde(rename = "numero")]
    pub number: String,
    /// Period label, e.g. `01/2024 - 02/2024`.
    #[serde(rename = "periodo")]
    pub period: String,
    /// Free-text notes.
    #[serde(
        rename = "observacoes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    /// Sync metadata.
    #[serde(flatten)]
    pub sync: SyncMeta,
}

impl Measurement {
    /// Creates a new measurement under the given contract.
    #[must_use]
    pub fn new(
        contract_id: EntityId,
        number: impl Into<String>,
        period: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::new(),
            contract_id,
            number: number.into(),
            period: period.into(),
            notes: None,
            sync: SyncMeta::dirty(),
        }
    }
}

impl Entity for Measurement {
    const COLLECTION: &'static str = "medicoes";

    fn id(&self) -> EntityId {
        self.id
    }

    fn sync(&self) -> &SyncMeta {
        &self.sync
    }

    fn sync_mut(&mut self) -> &mut SyncMeta {
        &mut self.sync
    }
}

/// A street under a measurement campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Street {
    /// Record identity.
    pub id: EntityId,
    /// Owning measurement.
    #[serde(rename = "medicaoId")]
    pub measurement_id: EntityId,
    /// Street name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Neighborhood.
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    /// Municipality.
    #[serde(rename = "municipio")]
    pub municipality: String,
    /// GPS latitude, if captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// GPS longitude, if captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Kind of intervention planned for the street.
    #[serde(rename = "tipoIntervencao")]
    pub intervention: InterventionKind,
    /// "Before" evidence photos.
    #[serde(rename = "fotos", default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<PhotoEvidence>,
    /// Sync metadata.
    #[serde(flatten)]
    pub sync: SyncMeta,
}

impl Street {
    /// Creates a new street under the given measurement.
    #[must_use]
    pub fn new(
        measurement_id: EntityId,
        name: impl Into<String>,
        neighborhood: impl Into<String>,
        municipality: impl Into<String>,
        intervention: InterventionKind,
    ) -> Self {
        Self {
            id: EntityId::new(),
            measurement_id,
            name: name.into(),
            neighborhood: neighborhood.into(),
            municipality: municipality.into(),
            latitude: None,
            longitude: None,
            intervention,
            photos: Vec::new(),
            sync: SyncMeta::dirty(),
        }
    }
}

impl Entity for Street {
    const COLLECTION: &'static str = "ruas";

    fn id(&self) -> EntityId {
        self.id
    }

    fn sync(&self) -> &SyncMeta {
        &self.sync
    }

    fn sync_mut(&mut self) -> &mut SyncMeta {
        &mut self.sync
    }
}

/// A measured stretch of a street.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Record identity.
    pub id: EntityId,
    /// Owning street.
    #[serde(rename = "ruaId")]
    pub street_id: EntityId,
    /// GPS latitude of the measurement point.
    pub latitude: f64,
    /// GPS longitude of the measurement point.
    pub longitude: f64,
    /// Measurement date (`YYYY-MM-DD`).
    #[serde(rename = "data")]
    pub date: String,
    /// Measurement time (`HH:MM`).
    #[serde(rename = "hora")]
    pub time: String,
    /// Length in meters.
    #[serde(rename = "comprimento")]
    pub length: f64,
    /// Average width in meters.
    #[serde(rename = "larguraMedia")]
    pub average_width: f64,
    /// Pavement thickness in meters, when measured.
    #[serde(rename = "espessura", default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    /// Computed area in square meters (`length × average_width`).
    pub area: f64,
    /// Tagged evidence photos.
    #[serde(rename = "fotos", default)]
    pub photos: Vec<PhotoEvidence>,
    /// Responsible professional (non-owning reference; may dangle).
    #[serde(rename = "profissionalId")]
    pub professional_id: EntityId,
    /// Kind of intervention.
    #[serde(rename = "tipoIntervencao")]
    pub intervention: InterventionKind,
    /// Pavement type.
    #[serde(rename = "tipoPavimentacao")]
    pub pavement: PavementKind,
    /// Free-text notes.
    #[serde(
        rename = "observacoes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    /// Sync metadata.
    #[serde(flatten)]
    pub sync: SyncMeta,
}

impl Segment {
    /// Creates a new segment; `area` is computed as `length × average_width`.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        street_id: EntityId,
        professional_id: EntityId,
        latitude: f64,
        longitude: f64,
        length: f64,
        average_width: f64,
        intervention: InterventionKind,
        pavement: PavementKind,
    ) -> Self {
        Self {
            id: EntityId::new(),
            street_id,
            latitude,
            longitude,
            date: String::new(),
            time: String::new(),
            length,
            average_width,
            thickness: None,
            area: length * average_width,
            photos: Vec::new(),
            professional_id,
            intervention,
            pavement,
            notes: None,
            sync: SyncMeta::dirty(),
        }
    }

    /// Recomputes the stored area from the current dimensions.
    pub fn recompute_area(&mut self) {
        self.area = self.length * self.average_width;
    }

    /// Volume in cubic meters, when a thickness was measured.
    #[must_use]
    pub fn volume(&self) -> Option<f64> {
        self.thickness.map(|t| self.area * t)
    }
}

impl Entity for Segment {
    const COLLECTION: &'static str = "trechos";

    fn id(&self) -> EntityId {
        self.id
    }

    fn sync(&self) -> &SyncMeta {
        &self.sync
    }

    fn sync_mut(&mut self) -> &mut SyncMeta {
        &mut self.sync
    }
}

/// A complementary curb service on a street.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Record identity.
    pub id: EntityId,
    /// Owning street.
    #[serde(rename = "ruaId")]
    pub street_id: EntityId,
    /// Specific segment, when the service is tied to one.
    #[serde(rename = "trechoId", default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<EntityId>,
    /// Kind of curb work.
    #[serde(rename = "tipo")]
    pub kind: ServiceKind,
    /// Quantity in linear meters.
    #[serde(rename = "quantidade")]
    pub quantity: f64,
    /// Service date (`YYYY-MM-DD`).
    #[serde(rename = "data")]
    pub date: String,
    /// Service time (`HH:MM`).
    #[serde(rename = "hora")]
    pub time: String,
    /// Free-text notes.
    #[serde(
        rename = "observacoes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    /// Sync metadata.
    #[serde(flatten)]
    pub sync: SyncMeta,
}

impl Service {
    /// Creates a new curb service on the given street.
    #[must_use]
    pub fn new(street_id: EntityId, kind: ServiceKind, quantity: f64) -> Self {
        Self {
            id: EntityId::new(),
            street_id,
            segment_id: None,
            kind,
            quantity,
            date: String::new(),
            time: String::new(),
            notes: None,
            sync: SyncMeta::dirty(),
        }
    }
}

impl Entity for Service {
    const COLLECTION: &'static str = "servicos";

    fn id(&self) -> EntityId {
        self.id
    }

    fn sync(&self) -> &SyncMeta {
        &self.sync
    }

    fn sync_mut(&mut self) -> &mut SyncMeta {
        &mut self.sync
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_area_is_computed() {
        let seg = Segment::new(
            EntityId::new(),
            EntityId::new(),
            -5.79448,
            -35.211,
            10.0,
            2.0,
            InterventionKind::New,
            PavementKind::InterlockedH8,
        );
        assert!((seg.area - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn segment_volume_requires_thickness() {
        let mut seg = Segment::new(
            EntityId::new(),
            EntityId::new(),
            0.0,
            0.0,
            10.0,
            2.0,
            InterventionKind::Recovery,
            PavementKind::Concrete,
        );
        assert!(seg.volume().is_none());

        seg.thickness = Some(0.08);
        let volume = seg.volume().unwrap();
        assert!((volume - 1.6).abs() < 1e-9);
    }

    #[test]
    fn recompute_area_tracks_dimensions() {
        let mut seg = Segment::new(
            EntityId::new(),
            EntityId::new(),
            0.0,
            0.0,
            10.0,
            2.0,
            InterventionKind::New,
            PavementKind::RoughStone,
        );
        seg.length = 15.0;
        seg.recompute_area();
        assert!((seg.area - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn contract_wire_names() {
        let contract = Contract::new("042/2024");
        let json = serde_json::to_value(&contract).unwrap();

        assert_eq!(json["numero"], "042/2024");
        assert_eq!(json["isDirty"], true);
        assert!(json.get("number").is_none());
        assert!(json.get("importedAt").is_none());
    }

    #[test]
    fn segment_wire_names() {
        let seg = Segment::new(
            EntityId::new(),
            EntityId::new(),
            -5.7,
            -35.2,
            12.5,
            3.0,
            InterventionKind::Recovery,
            PavementKind::Cobblestone,
        );
        let json = serde_json::to_value(&seg).unwrap();

        assert_eq!(json["ruaId"], seg.street_id.to_string());
        assert_eq!(json["comprimento"], 12.5);
        assert_eq!(json["larguraMedia"], 3.0);
        assert_eq!(json["tipoIntervencao"], "RECUPERACAO");
        assert_eq!(json["tipoPavimentacao"], "PARALELEPIPEDO");
    }

    #[test]
    fn optional_fields_tolerated_on_deserialize() {
        // A record from an older device: no photos, no GPS, no sync metadata.
        let json = serde_json::json!({
            "id": EntityId::new().to_string(),
            "medicaoId": EntityId::new().to_string(),
            "nome": "Rua das Flores",
            "bairro": "Centro",
            "municipio": "Horizonte",
            "tipoIntervencao": "NOVA",
        });

        let street: Street = serde_json::from_value(json).unwrap();
        assert!(street.photos.is_empty());
        assert!(street.latitude.is_none());
        assert!(!street.sync.is_dirty);
    }

    #[test]
    fn service_kind_wire_values() {
        let svc = Service::new(EntityId::new(), ServiceKind::CurbInstallation, 35.0);
        let json = serde_json::to_value(&svc).unwrap();
        assert_eq!(json["tipo"], "ASSENTAMENTO_MEIO_FIO");
        assert_eq!(json["quantidade"], 35.0);
        assert!(json.get("trechoId").is_none());
    }

    #[test]
    fn photo_kind_wire_values() {
        let photo = PhotoEvidence {
            id: EntityId::new(),
            base64: "data:image/jpeg;base64,/9j/4AAQ".into(),
            kind: PhotoKind::Before,
            date: "2024-07-01".into(),
            time: "08:30".into(),
        };
        let json = serde_json::to_value(&photo).unwrap();
        assert_eq!(json["tipo"], "Antes");
    }
}
