//! Business types of market stalls, each with a map colour.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::Timestamps;
use crate::resource::Resource;
use crate::validation::{Field, Format, Schema, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JenisUsaha {
    pub id: u64,
    pub nama: String,
    pub warna: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

crate::impl_entity!(JenisUsaha);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJenisUsaha {
    pub nama: String,
    pub warna: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JenisUsahaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nama: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warna: Option<String>,
}

pub static JENIS_USAHA: Resource<JenisUsaha, JenisUsaha, NewJenisUsaha, JenisUsahaPatch> =
    Resource::new("/jenis-usaha").with_sort_fields(&["nama", "created_at"]);

pub fn create_schema() -> Schema {
    Schema::new()
        .field("nama", Field::string().max_len(100).label("Nama jenis usaha"))
        .field("warna", Field::string().format(Format::HexColor).label("Warna"))
}

pub fn update_schema() -> Schema {
    create_schema().partial()
}

pub fn validate_create(input: &Value) -> Result<NewJenisUsaha, ValidationErrors> {
    create_schema().validate(input)
}

pub fn validate_update(input: &Value) -> Result<JenisUsahaPatch, ValidationErrors> {
    update_schema().validate(input)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn colour_boundaries() {
        assert!(validate_create(&json!({"nama": "Kuliner", "warna": "#FF69B4"})).is_ok());
        for bad in ["FF69B4", "#ZZZZZZ"] {
            let err = validate_create(&json!({"nama": "Kuliner", "warna": bad})).unwrap_err();
            assert_eq!(err.paths(), vec!["warna"], "{bad}");
        }
    }
}
