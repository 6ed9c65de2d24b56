//! Service satisfaction survey responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::Timestamps;
use crate::resource::Resource;
use crate::validation::{Field, Schema, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survei {
    pub id: u64,
    pub layanan_id: u64,
    pub nilai: u8,
    #[serde(default)]
    pub saran: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

crate::impl_entity!(Survei);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSurvei {
    pub layanan_id: u64,
    pub nilai: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saran: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveiPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layanan_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nilai: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saran: Option<String>,
}

pub static SURVEI: Resource<Survei, Survei, NewSurvei, SurveiPatch> =
    Resource::new("/survei-kepuasan").with_sort_fields(&["nilai", "created_at"]);

pub fn create_schema() -> Schema {
    Schema::new()
        .field("layanan_id", Field::selector().label("Layanan"))
        .field("nilai", Field::integer().min(1).max(5).label("Nilai"))
        .field("saran", Field::string().max_len(500).optional().label("Saran"))
}

pub fn update_schema() -> Schema {
    create_schema().partial()
}

pub fn validate_create(input: &Value) -> Result<NewSurvei, ValidationErrors> {
    create_schema().validate(input)
}

pub fn validate_update(input: &Value) -> Result<SurveiPatch, ValidationErrors> {
    update_schema().validate(input)
}
