//! News articles, plus the job that scrapes candidate articles from an
//! external source for review before they are published.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::Timestamps;
use crate::job::JobEndpoint;
use crate::resource::Resource;
use crate::validation::{Field, Format, Schema, ValidationErrors};

pub const MAX_SCRAPE_ITEMS: i64 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Berita {
    pub id: u64,
    pub judul: String,
    pub isi: String,
    #[serde(default)]
    pub sumber: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

crate::impl_entity!(Berita);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBerita {
    pub judul: String,
    pub isi: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sumber: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeritaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judul: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sumber: Option<String>,
}

/// Input of a scrape job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartScrape {
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// One candidate article produced by a scrape job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedBerita {
    pub judul: String,
    pub isi: String,
    pub sumber: String,
}

pub static BERITA: Resource<Berita, Berita, NewBerita, BeritaPatch> =
    Resource::new("/berita").with_sort_fields(&["judul", "created_at"]);

pub static SCRAPE: JobEndpoint<StartScrape, ScrapedBerita> = JobEndpoint::new("/berita/scrape");

pub fn create_schema() -> Schema {
    Schema::new()
        .field("judul", Field::string().max_len(255).label("Judul"))
        .field("isi", Field::string().min_len(10).label("Isi berita"))
        .field("sumber", Field::string().format(Format::Url).optional().label("Sumber"))
}

pub fn update_schema() -> Schema {
    create_schema().partial()
}

pub fn scrape_schema() -> Schema {
    Schema::new()
        .field("source_url", Field::string().format(Format::Url).label("URL sumber"))
        .field("limit", Field::integer().positive().max(MAX_SCRAPE_ITEMS).optional().label("Jumlah berita"))
}

pub fn validate_create(input: &Value) -> Result<NewBerita, ValidationErrors> {
    create_schema().validate(input)
}

pub fn validate_update(input: &Value) -> Result<BeritaPatch, ValidationErrors> {
    update_schema().validate(input)
}

pub fn validate_scrape(input: &Value) -> Result<StartScrape, ValidationErrors> {
    scrape_schema().validate(input)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;

    #[test]
    fn scrape_input_is_checked() {
        let err = validate_scrape(&json!({"source_url": "kompas", "limit": 500})).unwrap_err();
        assert_eq!(err.paths(), vec!["source_url", "limit"]);
        let ok = validate_scrape(&json!({"source_url": "https://news.example.id/kota"})).unwrap();
        assert_eq!(ok.limit, None);
    }

    #[test]
    fn start_posts_to_job_root() {
        let req = SCRAPE
            .build_start(&StartScrape {
                source_url: "https://news.example.id".to_string(),
                limit: Some(5),
            })
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "/berita/scrape");
    }
}
