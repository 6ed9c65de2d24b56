//! Streaming radio stations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::Timestamps;
use crate::resource::Resource;
use crate::validation::{Field, Format, Schema, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Radio {
    pub id: u64,
    pub judul: String,
    pub link: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

crate::impl_entity!(Radio);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRadio {
    pub judul: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judul: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

pub static RADIO: Resource<Radio, Radio, NewRadio, RadioPatch> =
    Resource::new("/radio").with_sort_fields(&["judul", "created_at"]);

pub fn create_schema() -> Schema {
    Schema::new()
        .field("judul", Field::string().max_len(255).label("Judul"))
        .field("link", Field::string().format(Format::Url).label("Link streaming"))
}

pub fn update_schema() -> Schema {
    create_schema().partial()
}

pub fn validate_create(input: &Value) -> Result<NewRadio, ValidationErrors> {
    create_schema().validate(input)
}

pub fn validate_update(input: &Value) -> Result<RadioPatch, ValidationErrors> {
    update_schema().validate(input)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_title_and_bad_link_both_reported() {
        let err = validate_create(&json!({"judul": "", "link": "not-a-url"})).unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err.field("judul"), Some("Judul wajib diisi"));
        assert_eq!(err.field("link"), Some("Link streaming harus berupa URL yang valid"));
    }

    #[test]
    fn valid_radio() {
        let radio = validate_create(&json!({"judul": "Radio Kota", "link": "https://stream.kota.go.id/live"})).unwrap();
        assert_eq!(radio.judul, "Radio Kota");
    }

    #[test]
    fn update_still_checks_link_format() {
        assert!(validate_update(&json!({})).is_ok());
        assert!(validate_update(&json!({"link": "ftp://x"})).is_err());
    }

    #[test]
    fn update_rejects_blanked_title() {
        let err = validate_update(&json!({"judul": "   "})).unwrap_err();
        assert_eq!(err.field("judul"), Some("Judul wajib diisi"));
        assert!(validate_update(&json!({"judul": ""})).is_err());
    }
}
