//! Guest book messages left by visitors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::envelope::Timestamps;
use crate::resource::Resource;
use crate::validation::{Field, Format, Schema, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BukuTamu {
    pub id: u64,
    pub nama: String,
    pub email: String,
    #[serde(default)]
    pub instansi: Option<String>,
    pub pesan: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

crate::impl_entity!(BukuTamu);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBukuTamu {
    pub nama: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instansi: Option<String>,
    pub pesan: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BukuTamuPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nama: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instansi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pesan: Option<String>,
}

pub static BUKU_TAMU: Resource<BukuTamu, BukuTamu, NewBukuTamu, BukuTamuPatch> =
    Resource::new("/buku-tamu").with_sort_fields(&["nama", "created_at"]);

pub fn create_schema() -> Schema {
    Schema::new()
        .field("nama", Field::string().max_len(100).label("Nama"))
        .field("email", Field::string().format(Format::Email).label("Email"))
        .field("instansi", Field::string().max_len(150).optional().label("Instansi"))
        .field("pesan", Field::string().max_len(1000).label("Pesan"))
}

pub fn update_schema() -> Schema {
    create_schema().partial()
}

fn range_in_order(input: &Map<String, Value>) -> bool {
    match (
        input.get("startDate").and_then(Value::as_str),
        input.get("endDate").and_then(Value::as_str),
    ) {
        // YYYY-MM-DD compares chronologically as text.
        (Some(start), Some(end)) => start <= end,
        _ => true,
    }
}

/// Listing input with a `startDate`..`endDate` visit range.
pub fn query_schema() -> Schema {
    BUKU_TAMU
        .query_schema()
        .field("startDate", Field::string().format(Format::Date).optional().label("Tanggal mulai"))
        .field("endDate", Field::string().format(Format::Date).optional().label("Tanggal akhir"))
        .refine(
            "startDate",
            "Tanggal mulai tidak boleh setelah tanggal akhir",
            range_in_order,
        )
}

pub fn validate_create(input: &Value) -> Result<NewBukuTamu, ValidationErrors> {
    create_schema().validate(input)
}

pub fn validate_update(input: &Value) -> Result<BukuTamuPatch, ValidationErrors> {
    update_schema().validate(input)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reversed_range_is_rejected_on_start_date() {
        let err = query_schema()
            .parse(&json!({"startDate": "2024-06-10", "endDate": "2024-06-01"}))
            .unwrap_err();
        assert_eq!(err.paths(), vec!["startDate"]);
    }

    #[test]
    fn open_ended_range_is_fine() {
        let query = BUKU_TAMU
            .validate_query(&query_schema(), &json!({"startDate": "2024-06-01"}))
            .unwrap();
        assert_eq!(query.filters, vec![("startDate".to_string(), "2024-06-01".to_string())]);
    }

    #[test]
    fn email_is_checked() {
        let err = validate_create(&json!({"nama": "Budi", "email": "budi", "pesan": "Halo"})).unwrap_err();
        assert_eq!(err.paths(), vec!["email"]);
    }
}
