//! Listing parameters and their wire encoding.
//!
//! # Design
//! Backends disagree on parameter names (`per_page` vs `perPage`), so every
//! resource carries an explicit `QueryParamNames` table instead of relying on
//! one convention. `ListQuery::to_params` checks the query against the
//! resource's sort allow-list before anything is sent.

use serde::{Deserialize, Serialize};

use crate::validation::{FieldError, ValidationErrors};

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;
pub const MAX_SEARCH_LEN: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const VALUES: &'static [&'static str] = &["asc", "desc"];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Wire names of the listing parameters for one backend resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryParamNames {
    pub page: &'static str,
    pub per_page: &'static str,
    pub search: &'static str,
    pub sort_by: &'static str,
    pub sort_order: &'static str,
}

impl QueryParamNames {
    pub const SNAKE: Self = Self {
        page: "page",
        per_page: "per_page",
        search: "search",
        sort_by: "sort_by",
        sort_order: "sort_order",
    };

    pub const CAMEL: Self = Self {
        page: "page",
        per_page: "perPage",
        search: "search",
        sort_by: "sortBy",
        sort_order: "sortOrder",
    };
}

/// A listing request: page, page size, search, sort and extra filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    /// Resource-specific filters, sent after the standard parameters in
    /// insertion order.
    pub filters: Vec<(String, String)>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            search: None,
            sort_by: None,
            sort_order: SortOrder::default(),
            filters: Vec::new(),
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = order;
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Encode as ordered query pairs using `names`, rejecting anything the
    /// backend would misread.
    pub fn to_params(
        &self,
        names: &QueryParamNames,
        sort_fields: &[&str],
    ) -> Result<Vec<(String, String)>, ValidationErrors> {
        let mut errors = Vec::new();
        if self.page < 1 {
            errors.push(FieldError::new("page", "page minimal 1"));
        }
        if !(1..=MAX_PER_PAGE).contains(&self.per_page) {
            errors.push(FieldError::new(
                "per_page",
                format!("per_page harus antara 1 dan {MAX_PER_PAGE}"),
            ));
        }
        let search = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        if let Some(search) = search {
            if search.chars().count() > MAX_SEARCH_LEN {
                errors.push(FieldError::new(
                    "search",
                    format!("search maksimal {MAX_SEARCH_LEN} karakter"),
                ));
            }
        }
        if let Some(field) = &self.sort_by {
            if !sort_fields.contains(&field.as_str()) {
                errors.push(FieldError::new(
                    "sort_by",
                    format!("sort_by harus salah satu dari: {}", sort_fields.join(", ")),
                ));
            }
        }
        if let Some(errors) = ValidationErrors::from_vec(errors) {
            return Err(errors);
        }

        let mut params = vec![
            (names.page.to_string(), self.page.to_string()),
            (names.per_page.to_string(), self.per_page.to_string()),
        ];
        if let Some(search) = search {
            params.push((names.search.to_string(), search.to_string()));
        }
        if let Some(field) = &self.sort_by {
            params.push((names.sort_by.to_string(), field.clone()));
        }
        params.push((
            names.sort_order.to_string(),
            self.sort_order.as_str().to_string(),
        ));
        params.extend(self.filters.iter().cloned());
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SORTS: &[&str] = &["tanggal", "nama"];

    fn pairs(params: &[(String, String)]) -> Vec<(&str, &str)> {
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn defaults_encode_page_size_and_order() {
        let params = ListQuery::new().to_params(&QueryParamNames::SNAKE, SORTS).unwrap();
        assert_eq!(
            pairs(&params),
            vec![("page", "1"), ("per_page", "10"), ("sort_order", "desc")]
        );
    }

    #[test]
    fn camel_names_are_used_verbatim() {
        let params = ListQuery::new()
            .per_page(25)
            .sort("nama", SortOrder::Asc)
            .to_params(&QueryParamNames::CAMEL, SORTS)
            .unwrap();
        assert_eq!(
            pairs(&params),
            vec![("page", "1"), ("perPage", "25"), ("sortBy", "nama"), ("sortOrder", "asc")]
        );
    }

    #[test]
    fn blank_search_is_omitted_and_filters_follow() {
        let params = ListQuery::new()
            .search("   ")
            .filter("tanggal", "2024-08-17")
            .to_params(&QueryParamNames::SNAKE, SORTS)
            .unwrap();
        assert!(params.iter().all(|(k, _)| k != "search"));
        assert_eq!(params.last().unwrap(), &("tanggal".to_string(), "2024-08-17".to_string()));
    }

    #[test]
    fn search_is_trimmed() {
        let params = ListQuery::new()
            .search("  nasional ")
            .to_params(&QueryParamNames::SNAKE, SORTS)
            .unwrap();
        assert!(params.contains(&("search".to_string(), "nasional".to_string())));
    }

    #[test]
    fn every_bad_parameter_is_reported() {
        let err = ListQuery::new()
            .page(0)
            .per_page(101)
            .search("x".repeat(101))
            .sort("id; drop", SortOrder::Asc)
            .to_params(&QueryParamNames::SNAKE, SORTS)
            .unwrap_err();
        assert_eq!(err.paths(), vec!["page", "per_page", "search", "sort_by"]);
    }

    #[test]
    fn encoding_is_deterministic() {
        let query = ListQuery::new().page(3).search("pasar").sort("tanggal", SortOrder::Asc);
        assert_eq!(
            query.to_params(&QueryParamNames::SNAKE, SORTS).unwrap(),
            query.to_params(&QueryParamNames::SNAKE, SORTS).unwrap()
        );
    }
}
