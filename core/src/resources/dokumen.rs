//! Public documents. Files travel as multipart; only PDF is accepted, and a
//! record may exist before its file is attached.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::envelope::Timestamps;
use crate::error::ApiError;
use crate::http::MultipartForm;
use crate::resource::{Resource, Upload};
use crate::transport::Transport;
use crate::validation::{Field, Schema, ValidationErrors};

pub const FILE_FIELD: &str = "file";
pub const MEDIA_TYPES: &[&str] = &["application/pdf"];
pub const MAX_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dokumen {
    pub id: u64,
    pub judul: String,
    #[serde(default)]
    pub deskripsi: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

crate::impl_entity!(Dokumen);

/// Create form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDokumen {
    pub judul: String,
    pub deskripsi: Option<String>,
    pub file: Option<Upload>,
}

/// Update form. Omitted fields, including the file, stay as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DokumenPatch {
    pub judul: Option<String>,
    pub deskripsi: Option<String>,
    pub file: Option<Upload>,
}

pub static DOKUMEN: Resource<Dokumen, Dokumen, NewDokumen, DokumenPatch> =
    Resource::new("/dokumen").with_sort_fields(&["judul", "created_at"]);

fn file_field() -> Field {
    Field::file(MEDIA_TYPES).max_size(MAX_BYTES).optional().label("File dokumen")
}

pub fn create_schema() -> Schema {
    Schema::new()
        .field("judul", Field::string().max_len(255).label("Judul"))
        .field("deskripsi", Field::string().max_len(1000).optional().label("Deskripsi"))
        .field(FILE_FIELD, file_field())
}

pub fn update_schema() -> Schema {
    create_schema().partial()
}

fn form_input(judul: Option<&str>, deskripsi: Option<&str>, file: Option<&Upload>) -> Value {
    let mut input = Map::new();
    if let Some(judul) = judul {
        input.insert("judul".to_string(), Value::from(judul));
    }
    if let Some(deskripsi) = deskripsi {
        input.insert("deskripsi".to_string(), Value::from(deskripsi));
    }
    if let Some(file) = file {
        input.insert(FILE_FIELD.to_string(), file.meta());
    }
    Value::Object(input)
}

fn encode_form(parsed: &Map<String, Value>, file: Option<&Upload>) -> MultipartForm {
    let mut form = MultipartForm::new();
    for key in ["judul", "deskripsi"] {
        if let Some(value) = parsed.get(key).and_then(Value::as_str) {
            form = form.text(key, value);
        }
    }
    match file {
        Some(file) => file.attach(form, FILE_FIELD),
        None => form,
    }
}

impl NewDokumen {
    /// Validate and encode as the multipart create body.
    pub fn to_form(&self) -> Result<MultipartForm, ValidationErrors> {
        let input = form_input(Some(self.judul.as_str()), self.deskripsi.as_deref(), self.file.as_ref());
        let parsed = create_schema().parse(&input)?;
        Ok(encode_form(&parsed, self.file.as_ref()))
    }
}

impl DokumenPatch {
    pub fn to_form(&self) -> Result<MultipartForm, ValidationErrors> {
        let input = form_input(self.judul.as_deref(), self.deskripsi.as_deref(), self.file.as_ref());
        let parsed = update_schema().parse(&input)?;
        Ok(encode_form(&parsed, self.file.as_ref()))
    }
}

pub async fn create<T: Transport + ?Sized>(transport: &T, input: &NewDokumen) -> Result<Dokumen, ApiError> {
    let form = input.to_form()?;
    DOKUMEN.client(transport).create_multipart(form).await
}

pub async fn update<T: Transport + ?Sized>(transport: &T, id: u64, input: &DokumenPatch) -> Result<Dokumen, ApiError> {
    let form = input.to_form()?;
    DOKUMEN.client(transport).update_multipart(id, form).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::FormPart;

    fn pdf() -> Upload {
        Upload::new("perda.pdf", "application/pdf", b"%PDF-1.7".to_vec())
    }

    #[test]
    fn create_without_file_is_allowed() {
        let parsed = create_schema().parse(&json!({"judul": "Perda 1/2024"})).unwrap();
        assert!(parsed.get(FILE_FIELD).is_none());
        let input = NewDokumen {
            judul: "Perda 1/2024".to_string(),
            deskripsi: None,
            file: None,
        };
        let form = input.to_form().unwrap();
        assert!(form.part(FILE_FIELD).is_none());
        assert!(form.part("judul").is_some());
    }

    #[test]
    fn only_pdf_is_accepted() {
        let input = NewDokumen {
            judul: "Perda".to_string(),
            deskripsi: None,
            file: Some(Upload::new("perda.docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document", vec![1])),
        };
        let err = input.to_form().unwrap_err();
        assert_eq!(err.field(FILE_FIELD), Some("File dokumen harus bertipe application/pdf"));
    }

    #[test]
    fn create_form_carries_trimmed_text_and_file() {
        let input = NewDokumen {
            judul: "  Perda 1/2024 ".to_string(),
            deskripsi: Some("Tentang pasar".to_string()),
            file: Some(pdf()),
        };
        let form = input.to_form().unwrap();
        assert!(matches!(form.part("judul"), Some(FormPart::Text { value, .. }) if value == "Perda 1/2024"));
        assert!(matches!(form.part(FILE_FIELD), Some(FormPart::File { file_name, .. }) if file_name == "perda.pdf"));
    }

    #[test]
    fn update_without_file_is_allowed() {
        let patch = DokumenPatch {
            judul: Some("Perda revisi".to_string()),
            ..DokumenPatch::default()
        };
        let form = patch.to_form().unwrap();
        assert!(form.part(FILE_FIELD).is_none());
        assert!(form.part("deskripsi").is_none());
    }

    #[test]
    fn update_with_blank_title_is_rejected() {
        let patch = DokumenPatch {
            judul: Some(" ".to_string()),
            ..DokumenPatch::default()
        };
        assert_eq!(patch.to_form().unwrap_err().paths(), vec!["judul"]);
    }
}
