//! Market stalls. Listings return a flattened row with the market and
//! business type names; detail returns the foreign keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::Timestamps;
use crate::query::QueryParamNames;
use crate::resource::Resource;
use crate::validation::{Field, Schema, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KiosRow {
    pub id: u64,
    pub nomor: String,
    pub nama_pasar: String,
    pub nama_jenis_usaha: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kios {
    pub id: u64,
    pub nomor: String,
    pub pasar_id: u64,
    pub jenis_usaha_id: u64,
    #[serde(default)]
    pub nama_pemilik: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

crate::impl_entity!(KiosRow, Kios);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewKios {
    pub nomor: String,
    pub pasar_id: u64,
    pub jenis_usaha_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nama_pemilik: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KiosPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nomor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pasar_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jenis_usaha_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nama_pemilik: Option<String>,
}

pub static KIOS: Resource<KiosRow, Kios, NewKios, KiosPatch> = Resource::new("/kios")
    .with_params(QueryParamNames::CAMEL)
    .with_sort_fields(&["nomor", "created_at"]);

pub fn create_schema() -> Schema {
    Schema::new()
        .field("nomor", Field::string().max_len(20).label("Nomor kios"))
        .field("pasar_id", Field::selector().label("Pasar"))
        .field("jenis_usaha_id", Field::selector().label("Jenis usaha"))
        .field("nama_pemilik", Field::string().max_len(100).optional().label("Nama pemilik"))
}

pub fn update_schema() -> Schema {
    create_schema().partial()
}

/// Listing input with optional market and business type filters.
pub fn query_schema() -> Schema {
    KIOS.query_schema()
        .field("pasar_id", Field::selector().optional().label("Pasar"))
        .field("jenis_usaha_id", Field::selector().optional().label("Jenis usaha"))
}

pub fn validate_create(input: &Value) -> Result<NewKios, ValidationErrors> {
    create_schema().validate(input)
}

pub fn validate_update(input: &Value) -> Result<KiosPatch, ValidationErrors> {
    update_schema().validate(input)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unselected_pickers_are_reported() {
        let err = validate_create(&json!({"nomor": "A-01", "pasar_id": 0, "jenis_usaha_id": ""})).unwrap_err();
        assert_eq!(err.field("pasar_id"), Some("Pasar harus dipilih"));
        assert_eq!(err.field("jenis_usaha_id"), Some("Jenis usaha wajib diisi"));
    }

    #[test]
    fn selector_values_from_forms_are_coerced() {
        let kios = validate_create(&json!({"nomor": "A-01", "pasar_id": "3", "jenis_usaha_id": 2})).unwrap();
        assert_eq!(kios.pasar_id, 3);
        assert_eq!(kios.jenis_usaha_id, 2);
    }

    #[test]
    fn listing_uses_camel_case_names() {
        let query = KIOS
            .validate_query(&query_schema(), &json!({"limit": 50, "pasar_id": 3}))
            .unwrap();
        let req = KIOS.build_list(&query).unwrap();
        assert_eq!(req.query_value("perPage"), Some("50"));
        assert_eq!(req.query_value("sortOrder"), Some("desc"));
        assert_eq!(req.query_value("pasar_id"), Some("3"));
    }
}
