//! Public holidays.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::{Paginated, Timestamps};
use crate::error::ApiError;
use crate::query::{ListQuery, SortOrder, DEFAULT_PER_PAGE};
use crate::resource::Resource;
use crate::transport::Transport;
use crate::validation::{Field, Format, Schema, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HariLibur {
    pub id: u64,
    pub nama: String,
    pub tanggal: String,
    #[serde(default)]
    pub keterangan: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

crate::impl_entity!(HariLibur);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHariLibur {
    pub nama: String,
    pub tanggal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keterangan: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HariLiburPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nama: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tanggal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keterangan: Option<String>,
}

pub static HARI_LIBUR: Resource<HariLibur, HariLibur, NewHariLibur, HariLiburPatch> =
    Resource::new("/hari-libur").with_sort_fields(&["tanggal", "nama", "created_at"]);

pub fn create_schema() -> Schema {
    Schema::new()
        .field("nama", Field::string().max_len(255).label("Nama hari libur"))
        .field("tanggal", Field::string().format(Format::Date).label("Tanggal"))
        .field("keterangan", Field::string().max_len(500).optional().label("Keterangan"))
}

pub fn update_schema() -> Schema {
    create_schema().partial()
}

/// Listing input: `page`, `limit`, `search`, sorting and a `tanggal` filter.
pub fn query_schema() -> Schema {
    HARI_LIBUR
        .query_schema()
        .field("tanggal", Field::string().format(Format::Date).optional().label("Tanggal"))
}

/// Typed listing input, as produced by [`query_schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HariLiburQuery {
    pub page: u32,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    #[serde(default)]
    pub tanggal: Option<String>,
}

impl HariLiburQuery {
    pub fn parse(input: &Value) -> Result<Self, ValidationErrors> {
        query_schema().validate(input)
    }

    pub fn into_list_query(self) -> ListQuery {
        let mut query = ListQuery::new()
            .page(self.page)
            .per_page(self.limit.unwrap_or(DEFAULT_PER_PAGE));
        query.search = self.search;
        query.sort_by = self.sort_by;
        query.sort_order = self.sort_order;
        match self.tanggal {
            Some(tanggal) => query.filter("tanggal", tanggal),
            None => query,
        }
    }
}

/// Validate raw listing input and fetch the page.
pub async fn list<T: Transport + ?Sized>(transport: &T, input: &Value) -> Result<Paginated<HariLibur>, ApiError> {
    let query = HariLiburQuery::parse(input)?.into_list_query();
    HARI_LIBUR.client(transport).list(&query).await
}

pub fn validate_create(input: &Value) -> Result<NewHariLibur, ValidationErrors> {
    create_schema().validate(input)
}

pub fn validate_update(input: &Value) -> Result<HariLiburPatch, ValidationErrors> {
    update_schema().validate(input)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_query_defaults_are_stable() {
        let first = query_schema().parse(&json!({})).unwrap();
        let second = query_schema().parse(&json!({})).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.get("page"), Some(&json!(1)));
        assert!(first.get("search").is_none());
        assert!(first.get("tanggal").is_none());
    }

    #[test]
    fn tanggal_filter_becomes_query_param() {
        let query = HARI_LIBUR
            .validate_query(&query_schema(), &json!({"tanggal": "2024-08-17"}))
            .unwrap();
        let req = HARI_LIBUR.build_list(&query).unwrap();
        assert_eq!(req.query_value("tanggal"), Some("2024-08-17"));
        assert_eq!(req.query_value("per_page"), Some("10"));
    }

    #[test]
    fn typed_query_matches_generic_conversion() {
        let input = json!({"page": "3", "limit": 20, "search": " merdeka ", "sort_by": "tanggal", "tanggal": "2024-08-17"});
        let typed = HariLiburQuery::parse(&input).unwrap();
        assert_eq!(typed.sort_order, SortOrder::Desc);
        assert_eq!(
            typed.into_list_query(),
            HARI_LIBUR.validate_query(&query_schema(), &input).unwrap()
        );
    }

    #[test]
    fn bad_filter_date_is_rejected() {
        let err = query_schema().parse(&json!({"tanggal": "17-08-2024"})).unwrap_err();
        assert_eq!(err.paths(), vec!["tanggal"]);
    }

    #[test]
    fn create_requires_name_and_date() {
        let err = validate_create(&json!({})).unwrap_err();
        assert_eq!(err.paths(), vec!["nama", "tanggal"]);
        let ok = validate_create(&json!({"nama": " Hari Kemerdekaan ", "tanggal": "2024-08-17"})).unwrap();
        assert_eq!(ok.nama, "Hari Kemerdekaan");
        assert_eq!(ok.keterangan, None);
    }

    #[test]
    fn update_accepts_any_subset() {
        let patch = validate_update(&json!({"keterangan": "Cuti bersama"})).unwrap();
        assert_eq!(
            patch,
            HariLiburPatch {
                keterangan: Some("Cuti bersama".to_string()),
                ..HariLiburPatch::default()
            }
        );
    }

    #[test]
    fn update_rejects_blanked_name_but_clears_nothing_else() {
        let err = validate_update(&json!({"nama": ""})).unwrap_err();
        assert_eq!(err.paths(), vec!["nama"]);
        let patch = validate_update(&json!({"keterangan": ""})).unwrap();
        assert_eq!(patch, HariLiburPatch::default());
    }
}
