//! Released versions of the installable web app.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::Timestamps;
use crate::resource::Resource;
use crate::validation::{Field, Format, Schema, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwaVersion {
    pub id: u64,
    pub version: String,
    #[serde(default)]
    pub catatan: Option<String>,
    #[serde(default)]
    pub wajib_update: bool,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

crate::impl_entity!(PwaVersion);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPwaVersion {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catatan: Option<String>,
    pub wajib_update: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwaVersionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catatan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wajib_update: Option<bool>,
}

pub static PWA_VERSION: Resource<PwaVersion, PwaVersion, NewPwaVersion, PwaVersionPatch> =
    Resource::new("/pwa-version").with_sort_fields(&["version", "created_at"]);

pub fn create_schema() -> Schema {
    Schema::new()
        .field("version", Field::string().format(Format::Version).label("Versi"))
        .field("catatan", Field::string().max_len(1000).optional().label("Catatan rilis"))
        .field("wajib_update", Field::boolean().default(false))
}

pub fn update_schema() -> Schema {
    create_schema().partial()
}

pub fn validate_create(input: &Value) -> Result<NewPwaVersion, ValidationErrors> {
    create_schema().validate(input)
}

pub fn validate_update(input: &Value) -> Result<PwaVersionPatch, ValidationErrors> {
    update_schema().validate(input)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn version_boundaries() {
        let ok = validate_create(&json!({"version": "v1.0.0"})).unwrap();
        assert_eq!(ok.version, "v1.0.0");
        assert!(!ok.wajib_update);
        assert!(validate_create(&json!({"version": "v1.0.0.12"})).is_ok());
        for bad in ["1.0.0", "v1.0"] {
            let err = validate_create(&json!({ "version": bad })).unwrap_err();
            assert_eq!(err.paths(), vec!["version"], "{bad}");
        }
    }

    #[test]
    fn forced_update_flag_coerces_from_form_values() {
        let ok = validate_create(&json!({"version": "v2.1.0", "wajib_update": "1"})).unwrap();
        assert!(ok.wajib_update);
    }
}
