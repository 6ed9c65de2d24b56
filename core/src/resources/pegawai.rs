//! Staff records and their face-identifier photos.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::envelope::Timestamps;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, MultipartForm, RequestBody};
use crate::query::QueryParamNames;
use crate::resource::{Resource, Upload};
use crate::transport::Transport;
use crate::validation::{Field, Format, Schema, ValidationErrors};

/// Multipart field the face photo travels in.
pub const FACE_FIELD: &str = "image";
pub const FACE_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png"];
pub const FACE_MAX_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pegawai {
    pub id: u64,
    pub nama: String,
    pub nip: String,
    pub jabatan: String,
    pub unit_kerja_id: u64,
    #[serde(default)]
    pub foto_wajah: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

crate::impl_entity!(Pegawai);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPegawai {
    pub nama: String,
    pub nip: String,
    pub jabatan: String,
    pub unit_kerja_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PegawaiPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nama: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jabatan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_kerja_id: Option<u64>,
}

pub static PEGAWAI: Resource<Pegawai, Pegawai, NewPegawai, PegawaiPatch> = Resource::new("/pegawai")
    .with_params(QueryParamNames::CAMEL)
    .with_sort_fields(&["nama", "nip", "created_at"]);

pub fn create_schema() -> Schema {
    Schema::new()
        .field("nama", Field::string().max_len(150).label("Nama"))
        .field("nip", Field::string().format(Format::Digits(18)).label("NIP"))
        .field("jabatan", Field::string().max_len(100).label("Jabatan"))
        .field("unit_kerja_id", Field::selector().label("Unit kerja"))
}

pub fn update_schema() -> Schema {
    create_schema().partial()
}

pub fn face_schema() -> Schema {
    Schema::new().field(
        FACE_FIELD,
        Field::file(FACE_MEDIA_TYPES)
            .max_size(FACE_MAX_BYTES)
            .label("Foto wajah"),
    )
}

pub fn validate_create(input: &Value) -> Result<NewPegawai, ValidationErrors> {
    create_schema().validate(input)
}

pub fn validate_update(input: &Value) -> Result<PegawaiPatch, ValidationErrors> {
    update_schema().validate(input)
}

pub fn build_face_upload(id: u64, photo: &Upload) -> Result<HttpRequest, ApiError> {
    face_schema().parse(&json!({ FACE_FIELD: photo.meta() }))?;
    let path = format!("{}/face", PEGAWAI.build_get(id)?.path);
    let form = photo.attach(MultipartForm::new(), FACE_FIELD);
    Ok(HttpRequest::new(HttpMethod::Post, path).with_body(RequestBody::Multipart(form)))
}

/// Upload the face-identifier photo of staff member `id`.
pub async fn upload_face<T: Transport + ?Sized>(transport: &T, id: u64, photo: &Upload) -> Result<Pegawai, ApiError> {
    let request = build_face_upload(id, photo)?;
    let response = transport.execute(request).await?;
    PEGAWAI.parse_update(response)
}
