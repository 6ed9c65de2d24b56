//! Typed client core for the government portal REST API.
//!
//! # Overview
//! Every backend collection (holidays, radio streams, staff, market stalls,
//! documents, ...) is consumed through the same five operations. A
//! `Resource` descriptor builds `HttpRequest` values and parses
//! `HttpResponse` values without touching the network; a `Transport`
//! executes the round-trip. Input is checked by declarative validation
//! schemas before it is sent.
//!
//! # Design
//! - `Resource<L, D, C, U>` is pure configuration, one `static` per
//!   collection, carrying list/detail/create/update shapes as types.
//! - Listing parameter names are an explicit per-resource table, and the
//!   sort allow-list feeds both request building and the query schema.
//! - `ResourceClient` is stateless: no retries, no caching, no coordination
//!   between concurrent calls.
//! - Errors keep their kind from transport to caller (`ApiError`).

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod job;
pub mod query;
pub mod resource;
pub mod resources;
pub mod transport;
pub mod validation;

pub use client::ResourceClient;
pub use config::{ClientConfig, ConfigError};
pub use envelope::{Data, Entity, PageLinks, PageMeta, Paginated, Timestamps};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody};
pub use job::{JobEndpoint, JobId, JobState, JobStatus};
pub use query::{ListQuery, QueryParamNames, SortOrder};
pub use resource::{Resource, Upload};
pub use transport::{Transport, UreqTransport};
pub use validation::{Field, FieldError, Format, Schema, ValidationErrors};
