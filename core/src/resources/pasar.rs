//! Traditional markets managed by the city.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::Timestamps;
use crate::resource::Resource;
use crate::validation::{Field, Schema, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pasar {
    pub id: u64,
    pub nama: String,
    pub alamat: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

crate::impl_entity!(Pasar);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPasar {
    pub nama: String,
    pub alamat: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasarPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nama: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alamat: Option<String>,
}

pub static PASAR: Resource<Pasar, Pasar, NewPasar, PasarPatch> =
    Resource::new("/pasar").with_sort_fields(&["nama", "created_at"]);

pub fn create_schema() -> Schema {
    Schema::new()
        .field("nama", Field::string().min_len(3).max_len(100).label("Nama pasar"))
        .field("alamat", Field::string().max_len(255).label("Alamat"))
}

pub fn update_schema() -> Schema {
    create_schema().partial()
}

pub fn validate_create(input: &Value) -> Result<NewPasar, ValidationErrors> {
    create_schema().validate(input)
}

pub fn validate_update(input: &Value) -> Result<PasarPatch, ValidationErrors> {
    update_schema().validate(input)
}
