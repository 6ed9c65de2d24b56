//! Resource descriptors: one value per backend collection.
//!
//! # Design
//! A `Resource<L, D, C, U>` is plain configuration (base path, listing
//! parameter names, sort allow-list) with the list-item, detail, create and
//! update shapes carried as type parameters. It has no state, so each
//! collection is declared once as a `static`. Each operation is split into
//! `build_*`, producing an `HttpRequest`, and `parse_*`, consuming an
//! `HttpResponse`; the `ResourceClient` in `client` glues the two around a
//! `Transport`.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::ResourceClient;
use crate::envelope::{Data, Paginated};
use crate::error::{check_status, ApiError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody};
use crate::query::{ListQuery, QueryParamNames, SortOrder, DEFAULT_PER_PAGE, MAX_PER_PAGE, MAX_SEARCH_LEN};
use crate::transport::Transport;
use crate::validation::{Field, Schema, ValidationErrors};

/// Caller-side names of the standard listing fields in a query schema.
const STANDARD_QUERY_FIELDS: &[&str] = &["page", "limit", "search", "sort_by", "sort_order"];

/// Descriptor of one backend collection.
///
/// `L` is the list item, `D` the detail returned by get/create/update, `C`
/// the create payload and `U` the partial update payload.
pub struct Resource<L, D, C, U> {
    path: &'static str,
    params: QueryParamNames,
    sort_fields: &'static [&'static str],
    _shapes: PhantomData<fn() -> (L, D, C, U)>,
}

impl<L, D, C, U> Clone for Resource<L, D, C, U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L, D, C, U> Copy for Resource<L, D, C, U> {}

impl<L, D, C, U> fmt::Debug for Resource<L, D, C, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path)
            .field("params", &self.params)
            .field("sort_fields", &self.sort_fields)
            .finish()
    }
}

impl<L, D, C, U> Resource<L, D, C, U> {
    /// Resource at `path` using snake_case listing parameters and no
    /// sortable fields.
    pub const fn new(path: &'static str) -> Self {
        Self {
            path,
            params: QueryParamNames::SNAKE,
            sort_fields: &[],
            _shapes: PhantomData,
        }
    }

    pub const fn with_params(self, params: QueryParamNames) -> Self {
        Self {
            path: self.path,
            params,
            sort_fields: self.sort_fields,
            _shapes: PhantomData,
        }
    }

    pub const fn with_sort_fields(self, sort_fields: &'static [&'static str]) -> Self {
        Self {
            path: self.path,
            params: self.params,
            sort_fields,
            _shapes: PhantomData,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn params(&self) -> &QueryParamNames {
        &self.params
    }

    pub fn sort_fields(&self) -> &'static [&'static str] {
        self.sort_fields
    }

    pub fn client<'a, T: Transport + ?Sized>(
        &'a self,
        transport: &'a T,
    ) -> ResourceClient<'a, T, L, D, C, U> {
        ResourceClient::new(self, transport)
    }

    /// Schema for the caller-side listing input (`page`, `limit`, `search`,
    /// `sort_by`, `sort_order`). `sort_by` is checked against this
    /// resource's own allow-list, so a resource without sortable columns
    /// rejects any `sort_by`. Extend with `.field(..)` for filters.
    pub fn query_schema(&self) -> Schema {
        Schema::new()
            .field(
                "page",
                Field::integer().positive().max(i64::from(u32::MAX)).default(1),
            )
            .field(
                "limit",
                Field::integer().min(1).max(i64::from(MAX_PER_PAGE)).optional(),
            )
            .field("search", Field::string().max_len(MAX_SEARCH_LEN).optional())
            .field("sort_by", Field::one_of(self.sort_fields).optional())
            .field("sort_order", Field::one_of(SortOrder::VALUES).default("desc"))
    }

    /// Validate listing input against `schema` and turn it into a
    /// `ListQuery`. Fields beyond the standard ones become filters.
    pub fn validate_query(&self, schema: &Schema, input: &Value) -> Result<ListQuery, ValidationErrors> {
        let parsed = schema.parse(input)?;
        Ok(list_query_from(parsed))
    }

    fn item_path(&self, id: u64) -> Result<String, ApiError> {
        if id == 0 {
            return Err(ValidationErrors::single("id", "id harus bilangan bulat positif").into());
        }
        Ok(format!("{}/{id}", self.path))
    }

    pub fn build_list(&self, query: &ListQuery) -> Result<HttpRequest, ApiError> {
        let params = query.to_params(&self.params, self.sort_fields)?;
        Ok(HttpRequest::new(HttpMethod::Get, self.path).with_query(params))
    }

    pub fn build_get(&self, id: u64) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Get, self.item_path(id)?))
    }

    pub fn build_delete(&self, id: u64) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Delete, self.item_path(id)?))
    }

    /// Multipart create for upload endpoints.
    pub fn build_create_multipart(&self, form: MultipartForm) -> HttpRequest {
        HttpRequest::new(HttpMethod::Post, self.path).with_body(RequestBody::Multipart(form))
    }

    /// Multipart update. Sent as `POST` with a `_method=PUT` part because
    /// the backend only reads multipart bodies on `POST`.
    pub fn build_update_multipart(&self, id: u64, form: MultipartForm) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Post, self.item_path(id)?)
            .with_body(RequestBody::Multipart(form.text("_method", "PUT"))))
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

impl<L: DeserializeOwned, D, C, U> Resource<L, D, C, U> {
    pub fn parse_list(&self, response: HttpResponse) -> Result<Paginated<L>, ApiError> {
        check_status(&response)?;
        let page: Paginated<L> = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        if !page.is_consistent() {
            tracing::warn!(
                resource = self.path,
                current_page = page.meta.current_page,
                last_page = page.meta.last_page,
                total = page.meta.total,
                items = page.data.len(),
                "inconsistent pagination metadata"
            );
        }
        Ok(page)
    }
}

impl<L, D: DeserializeOwned, C, U> Resource<L, D, C, U> {
    pub fn parse_get(&self, response: HttpResponse) -> Result<D, ApiError> {
        parse_data(response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<D, ApiError> {
        parse_data(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<D, ApiError> {
        parse_data(response)
    }
}

impl<L, D, C: Serialize, U> Resource<L, D, C, U> {
    pub fn build_create(&self, input: &C) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Post, self.path).with_body(json_body(input)?))
    }
}

impl<L, D, C, U: Serialize> Resource<L, D, C, U> {
    /// Partial update: fields the payload leaves out are not serialized and
    /// keep their stored values.
    pub fn build_update(&self, id: u64, input: &U) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Put, self.item_path(id)?).with_body(json_body(input)?))
    }
}

pub(crate) fn json_body<P: Serialize + ?Sized>(input: &P) -> Result<RequestBody, ApiError> {
    let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok(RequestBody::Json(body))
}

/// Check the status and unwrap a `{"data": ...}` envelope.
pub(crate) fn parse_data<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    let envelope: Data<T> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;
    Ok(envelope.data)
}

fn list_query_from(mut parsed: Map<String, Value>) -> ListQuery {
    let as_u32 = |v: Option<Value>| v.and_then(|v| v.as_u64()).and_then(|n| u32::try_from(n).ok());
    let as_string = |v: Option<Value>| v.and_then(|v| v.as_str().map(str::to_string));

    let mut query = ListQuery::new();
    if let Some(page) = as_u32(parsed.remove("page")) {
        query.page = page;
    }
    query.per_page = as_u32(parsed.remove("limit")).unwrap_or(DEFAULT_PER_PAGE);
    query.search = as_string(parsed.remove("search"));
    query.sort_by = as_string(parsed.remove("sort_by"));
    if let Some(order) = parsed.remove("sort_order") {
        query.sort_order = serde_json::from_value(order).unwrap_or_default();
    }
    debug_assert!(STANDARD_QUERY_FIELDS.iter().all(|f| !parsed.contains_key(*f)));
    query.filters = parsed
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect();
    query
}

/// A file picked for upload, with the metadata validation schemas check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// `{"name", "type", "size"}`, the shape `Field::file` validates.
    pub fn meta(&self) -> Value {
        serde_json::to_value(FileMeta {
            name: self.file_name.clone(),
            media_type: self.media_type.clone(),
            size: self.bytes.len() as u64,
        })
        .unwrap_or(Value::Null)
    }

    pub(crate) fn attach(&self, form: MultipartForm, field: &str) -> MultipartForm {
        form.file(field, &self.file_name, &self.media_type, self.bytes.clone())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FileMeta {
    name: String,
    #[serde(rename = "type")]
    media_type: String,
    size: u64,
}
