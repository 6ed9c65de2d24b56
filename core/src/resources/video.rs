//! Video gallery entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::Timestamps;
use crate::resource::Resource;
use crate::validation::{Field, Format, Schema, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: u64,
    pub judul: String,
    pub link: String,
    #[serde(default)]
    pub deskripsi: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

crate::impl_entity!(Video);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVideo {
    pub judul: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deskripsi: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judul: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deskripsi: Option<String>,
}

pub static VIDEO: Resource<Video, Video, NewVideo, VideoPatch> =
    Resource::new("/video").with_sort_fields(&["judul", "created_at"]);

pub fn create_schema() -> Schema {
    Schema::new()
        .field("judul", Field::string().max_len(255).label("Judul"))
        .field("link", Field::string().format(Format::Url).label("Link video"))
        .field("deskripsi", Field::string().max_len(2000).optional().label("Deskripsi"))
}

pub fn update_schema() -> Schema {
    create_schema().partial()
}

pub fn validate_create(input: &Value) -> Result<NewVideo, ValidationErrors> {
    create_schema().validate(input)
}

pub fn validate_update(input: &Value) -> Result<VideoPatch, ValidationErrors> {
    update_schema().validate(input)
}
