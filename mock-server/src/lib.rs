//! In-memory stand-in for the portal REST API.
//!
//! Every collection lives under `/{resource}` with Laravel-style envelopes:
//! `{"data": ...}` for single records and `{"data", "links", "meta"}` for
//! listings. Records are soft-deleted and hidden afterwards. A few
//! collections enforce a unique field. `/berita/scrape` runs a fake scrape
//! job that advances one state per status poll.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use uuid::Uuid;

const DEFAULT_PER_PAGE: u64 = 10;
const MAX_PER_PAGE: u64 = 100;
const SCRAPE_RESOURCE: &str = "berita";
const SCRAPE_SEGMENT: &str = "scrape";

/// Fields that must be unique among live records of a collection.
const UNIQUE_FIELDS: &[(&str, &str)] = &[
    ("hari-libur", "tanggal"),
    ("pwa-version", "version"),
    ("jenis-usaha", "nama"),
];

/// Keys the list endpoint treats as paging, search or sort controls.
const CONTROL_PARAMS: &[&str] = &[
    "page", "per_page", "perPage", "search", "sort_by", "sortBy", "sort_order", "sortOrder",
];

pub type Record = Map<String, Value>;

#[derive(Debug, Default)]
pub struct Collection {
    next_id: u64,
    records: BTreeMap<u64, Record>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobState {
    Pending,
    Running,
    Done,
}

impl JobState {
    fn as_str(self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Done => "done",
        }
    }
}

#[derive(Debug)]
struct Job {
    state: JobState,
    items: Vec<Value>,
}

#[derive(Debug, Default)]
pub struct Store {
    collections: RwLock<HashMap<String, Collection>>,
    jobs: RwLock<HashMap<Uuid, Job>>,
    clock: AtomicU64,
}

pub type Db = Arc<Store>;

impl Store {
    pub fn new() -> Db {
        Arc::new(Self::default())
    }

    /// Fake wall clock: every call is one second later than the last.
    fn now(&self) -> String {
        let n = self.clock.fetch_add(1, Ordering::Relaxed);
        format!(
            "2024-01-01T{:02}:{:02}:{:02}.000000Z",
            (n / 3600) % 24,
            (n / 60) % 60,
            n % 60
        )
    }

    /// Insert records as if created through the API; returns their ids.
    pub async fn seed(&self, resource: &str, records: Vec<Value>) -> Vec<u64> {
        let mut collections = self.collections.write().await;
        let collection = collections.entry(resource.to_string()).or_default();
        records
            .into_iter()
            .map(|record| {
                let fields = match record {
                    Value::Object(fields) => fields,
                    _ => Map::new(),
                };
                insert(collection, fields, self.now())
            })
            .collect()
    }

    /// Raw stored record, soft-deleted or not.
    pub async fn record(&self, resource: &str, id: u64) -> Option<Record> {
        let collections = self.collections.read().await;
        collections.get(resource)?.records.get(&id).cloned()
    }
}

fn insert(collection: &mut Collection, mut fields: Record, now: String) -> u64 {
    collection.next_id += 1;
    let id = collection.next_id;
    fields.insert("id".to_string(), json!(id));
    fields.insert("created_at".to_string(), json!(now));
    fields.insert("updated_at".to_string(), json!(now));
    fields.insert("deleted_at".to_string(), Value::Null);
    collection.records.insert(id, fields);
    id
}

fn is_live(record: &Record) -> bool {
    record.get("deleted_at").map_or(true, Value::is_null)
}

/// Error answer with a JSON body.
#[derive(Debug)]
pub struct Failure(StatusCode, Value);

impl Failure {
    fn not_found() -> Self {
        Failure(StatusCode::NOT_FOUND, json!({"message": "Not Found"}))
    }

    fn conflict(message: &str) -> Self {
        Failure(StatusCode::CONFLICT, json!({ "message": message }))
    }

    fn invalid(field: &str, message: String) -> Self {
        Failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"message": "The given data was invalid.", "errors": { field: [message] }}),
        )
    }

    fn bad_request(message: String) -> Self {
        Failure(StatusCode::BAD_REQUEST, json!({ "message": message }))
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

type Reply = Result<(StatusCode, Json<Value>), Failure>;

fn ok(data: Value) -> Reply {
    Ok((StatusCode::OK, Json(json!({ "data": data }))))
}

pub fn app() -> Router {
    app_with(Store::new())
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/{resource}", get(list_records).post(create_record))
        .route(
            "/{resource}/{id}",
            get(get_record)
                .put(update_record)
                .patch(update_record)
                .delete(delete_record)
                .post(post_item),
        )
        .route("/{resource}/{id}/{action}", get(get_sub).post(post_sub))
        .route("/{resource}/{id}/{job}/{action}", get(get_job_output).post(post_job_action))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Store::new()).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

fn parse_id(raw: &str) -> Result<u64, Failure> {
    raw.parse().ok().filter(|id| *id > 0).ok_or_else(Failure::not_found)
}

fn parse_job(raw: &str) -> Result<Uuid, Failure> {
    Uuid::parse_str(raw).map_err(|_| Failure::not_found())
}

// --- request bodies ---

/// JSON object or multipart form. File parts become `{name}_url` fields.
async fn read_fields(db: &Db, resource: &str, request: Request) -> Result<Record, Failure> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if !is_multipart {
        let Json(body) = Json::<Value>::from_request(request, db)
            .await
            .map_err(|e| Failure(StatusCode::UNPROCESSABLE_ENTITY, json!({"message": e.body_text()})))?;
        return match body {
            Value::Object(fields) => Ok(fields),
            _ => Err(Failure::bad_request("expected a JSON object".to_string())),
        };
    }

    let mut multipart = Multipart::from_request(request, db)
        .await
        .map_err(|e| Failure::bad_request(e.body_text()))?;
    let mut fields = Map::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Failure::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                field
                    .bytes()
                    .await
                    .map_err(|e| Failure::bad_request(e.body_text()))?;
                fields.insert(
                    format!("{name}_url"),
                    json!(format!("/storage/{resource}/{file_name}")),
                );
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Failure::bad_request(e.body_text()))?;
                fields.insert(name, Value::String(text));
            }
        }
    }
    Ok(fields)
}

fn strip_managed(fields: &mut Record) {
    for key in ["id", "created_at", "updated_at", "deleted_at", "_method"] {
        fields.remove(key);
    }
}

fn check_unique(resource: &str, collection: &Collection, fields: &Record, except: Option<u64>) -> Result<(), Failure> {
    let Some((_, field)) = UNIQUE_FIELDS.iter().find(|(r, _)| *r == resource) else {
        return Ok(());
    };
    let Some(value) = fields.get(*field) else {
        return Ok(());
    };
    let taken = collection
        .records
        .iter()
        .any(|(id, record)| Some(*id) != except && is_live(record) && record.get(*field) == Some(value));
    if taken {
        return Err(Failure::invalid(field, format!("{field} sudah digunakan")));
    }
    Ok(())
}

// --- collection handlers ---

async fn list_records(
    State(db): State<Db>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let param = |keys: &[&str]| keys.iter().find_map(|k| params.get(*k)).map(String::as_str);
    let page: u64 = param(&["page"]).and_then(|v| v.parse().ok()).unwrap_or(1).max(1);
    let per_page: u64 = param(&["per_page", "perPage"])
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let search = param(&["search"]).map(str::to_lowercase);
    let sort_by = param(&["sort_by", "sortBy"]);
    let descending = param(&["sort_order", "sortOrder"]) != Some("asc");

    let collections = db.collections.read().await;
    let mut rows: Vec<&Record> = collections
        .get(&resource)
        .map(|c| c.records.values().filter(|r| is_live(r)).collect())
        .unwrap_or_default();

    if let Some(search) = &search {
        rows.retain(|record| {
            record
                .values()
                .filter_map(Value::as_str)
                .any(|text| text.to_lowercase().contains(search.as_str()))
        });
    }
    for (key, expected) in params.iter().filter(|(k, _)| !CONTROL_PARAMS.contains(&k.as_str())) {
        rows.retain(|record| match record.get(key) {
            Some(Value::String(s)) => s == expected,
            Some(other) => other.to_string() == *expected,
            None => false,
        });
    }

    let sort_key = sort_by.unwrap_or("id");
    rows.sort_by(|a, b| compare(a.get(sort_key), b.get(sort_key)));
    if descending && sort_by.is_some() {
        rows.reverse();
    }

    let total = rows.len() as u64;
    let last_page = total.div_ceil(per_page).max(1);
    let start = per_page.saturating_mul(page - 1);
    let data: Vec<Value> = rows
        .into_iter()
        .skip(start as usize)
        .take(per_page as usize)
        .map(|r| Value::Object(r.clone()))
        .collect();
    let (from, to) = if data.is_empty() {
        (Value::Null, Value::Null)
    } else {
        (json!(start + 1), json!(start + data.len() as u64))
    };
    let link = |p: u64| json!(format!("/{resource}?page={p}"));

    tracing::debug!(%resource, page, per_page, total, "list");
    Ok((
        StatusCode::OK,
        Json(json!({
            "data": data,
            "links": {
                "first": link(1),
                "last": link(last_page),
                "prev": if page > 1 { link(page - 1) } else { Value::Null },
                "next": if page < last_page { link(page + 1) } else { Value::Null },
            },
            "meta": {
                "current_page": page,
                "from": from,
                "last_page": last_page,
                "per_page": per_page,
                "to": to,
                "total": total,
            },
        })),
    ))
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        _ => std::cmp::Ordering::Equal,
    }
}

async fn create_record(State(db): State<Db>, Path(resource): Path<String>, request: Request) -> Reply {
    let mut fields = read_fields(&db, &resource, request).await?;
    strip_managed(&mut fields);

    let now = db.now();
    let mut collections = db.collections.write().await;
    let collection = collections.entry(resource.clone()).or_default();
    check_unique(&resource, collection, &fields, None)?;
    let id = insert(collection, fields, now);
    tracing::debug!(%resource, id, "created");
    let record = collection.records.get(&id).cloned().unwrap_or_default();
    Ok((StatusCode::CREATED, Json(json!({ "data": record }))))
}

async fn get_record(State(db): State<Db>, Path((resource, id)): Path<(String, String)>) -> Reply {
    let id = parse_id(&id)?;
    let collections = db.collections.read().await;
    let record = collections
        .get(&resource)
        .and_then(|c| c.records.get(&id))
        .filter(|r| is_live(r))
        .ok_or_else(Failure::not_found)?;
    ok(Value::Object(record.clone()))
}

async fn apply_update(db: &Db, resource: &str, id: u64, mut fields: Record) -> Reply {
    strip_managed(&mut fields);
    let now = db.now();
    let mut collections = db.collections.write().await;
    let collection = collections.get_mut(resource).ok_or_else(Failure::not_found)?;
    if !collection.records.get(&id).is_some_and(is_live) {
        return Err(Failure::not_found());
    }
    check_unique(resource, collection, &fields, Some(id))?;
    let record = collection.records.get_mut(&id).ok_or_else(Failure::not_found)?;
    for (key, value) in fields {
        record.insert(key, value);
    }
    record.insert("updated_at".to_string(), json!(now));
    tracing::debug!(%resource, id, "updated");
    ok(Value::Object(record.clone()))
}

async fn update_record(
    State(db): State<Db>,
    Path((resource, id)): Path<(String, String)>,
    request: Request,
) -> Reply {
    let id = parse_id(&id)?;
    let fields = read_fields(&db, &resource, request).await?;
    apply_update(&db, &resource, id, fields).await
}

async fn delete_record(State(db): State<Db>, Path((resource, id)): Path<(String, String)>) -> Reply {
    let id = parse_id(&id)?;
    let now = db.now();
    let mut collections = db.collections.write().await;
    let record = collections
        .get_mut(&resource)
        .and_then(|c| c.records.get_mut(&id))
        .filter(|r| is_live(r))
        .ok_or_else(Failure::not_found)?;
    record.insert("deleted_at".to_string(), json!(now));
    tracing::debug!(%resource, id, "soft-deleted");
    ok(Value::Null)
}

/// `POST /{resource}/{id}`: starts a scrape job on `/berita/scrape`,
/// otherwise a multipart update spoofed with `_method=PUT`.
async fn post_item(
    State(db): State<Db>,
    Path((resource, id)): Path<(String, String)>,
    request: Request,
) -> Reply {
    if resource == SCRAPE_RESOURCE && id == SCRAPE_SEGMENT {
        return start_scrape(&db, request).await;
    }
    let id = parse_id(&id)?;
    let fields = read_fields(&db, &resource, request).await?;
    match fields.get("_method").and_then(Value::as_str) {
        Some("PUT") | Some("PATCH") => apply_update(&db, &resource, id, fields).await,
        _ => Err(Failure(
            StatusCode::METHOD_NOT_ALLOWED,
            json!({"message": "Method Not Allowed"}),
        )),
    }
}

// --- sub-resources ---

async fn get_sub(State(db): State<Db>, Path((resource, id, action)): Path<(String, String, String)>) -> Reply {
    if resource == SCRAPE_RESOURCE && id == SCRAPE_SEGMENT {
        return scrape_status(&db, parse_job(&action)?).await;
    }
    Err(Failure::not_found())
}

async fn post_sub(
    State(db): State<Db>,
    Path((resource, id, action)): Path<(String, String, String)>,
    request: Request,
) -> Reply {
    if resource != "pegawai" || action != "face" {
        return Err(Failure::not_found());
    }
    let id = parse_id(&id)?;
    let mut fields = read_fields(&db, &resource, request).await?;
    let Some(url) = fields.remove("image_url") else {
        return Err(Failure::invalid("image", "Foto wajah wajib diunggah".to_string()));
    };
    let mut update = Map::new();
    update.insert("foto_wajah".to_string(), url);
    apply_update(&db, &resource, id, update).await
}

async fn get_job_output(
    State(db): State<Db>,
    Path((resource, id, job, action)): Path<(String, String, String, String)>,
) -> Reply {
    if resource != SCRAPE_RESOURCE || id != SCRAPE_SEGMENT || action != "result" {
        return Err(Failure::not_found());
    }
    let job = parse_job(&job)?;
    let jobs = db.jobs.read().await;
    let job = jobs.get(&job).ok_or_else(Failure::not_found)?;
    if job.state != JobState::Done {
        return Err(Failure::conflict("job not finished"));
    }
    ok(Value::Array(job.items.clone()))
}

async fn post_job_action(
    State(db): State<Db>,
    Path((resource, id, job, action)): Path<(String, String, String, String)>,
    Json(body): Json<Value>,
) -> Reply {
    if resource != SCRAPE_RESOURCE || id != SCRAPE_SEGMENT || action != "commit" {
        return Err(Failure::not_found());
    }
    let job = parse_job(&job)?;
    let selected: Vec<Value> = {
        let jobs = db.jobs.read().await;
        let job = jobs.get(&job).ok_or_else(Failure::not_found)?;
        if job.state != JobState::Done {
            return Err(Failure::conflict("job not finished"));
        }
        let indices = body
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| Failure::invalid("items", "items wajib diisi".to_string()))?;
        let mut selected = Vec::with_capacity(indices.len());
        for index in indices {
            let item = index
                .as_u64()
                .and_then(|i| job.items.get(i as usize))
                .ok_or_else(|| Failure::invalid("items", format!("indeks {index} tidak ada")))?;
            selected.push(item.clone());
        }
        selected
    };

    let created = selected.len();
    let mut collections = db.collections.write().await;
    let collection = collections.entry(SCRAPE_RESOURCE.to_string()).or_default();
    for item in selected {
        if let Value::Object(fields) = item {
            insert(collection, fields, db.now());
        }
    }
    tracing::debug!(created, "committed scraped berita");
    ok(json!({ "created": created }))
}

// --- scrape job ---

async fn start_scrape(db: &Db, request: Request) -> Reply {
    let fields = read_fields(db, SCRAPE_RESOURCE, request).await?;
    let Some(source) = fields.get("source_url").and_then(Value::as_str) else {
        return Err(Failure::invalid("source_url", "source_url wajib diisi".to_string()));
    };
    let limit = fields.get("limit").and_then(Value::as_u64).unwrap_or(3);
    let items = (1..=limit)
        .map(|i| {
            json!({
                "judul": format!("Berita {i} dari {source}"),
                "isi": format!("Isi berita ke-{i} hasil pengambilan otomatis."),
                "sumber": format!("{}/{i}", source.trim_end_matches('/')),
            })
        })
        .collect();
    let id = Uuid::new_v4();
    db.jobs.write().await.insert(
        id,
        Job {
            state: JobState::Pending,
            items,
        },
    );
    tracing::debug!(job = %id, "scrape started");
    Ok((StatusCode::ACCEPTED, Json(json!({"data": {"job_id": id}}))))
}

/// Report the current state, then advance it one step.
async fn scrape_status(db: &Db, id: Uuid) -> Reply {
    let mut jobs = db.jobs.write().await;
    let job = jobs.get_mut(&id).ok_or_else(Failure::not_found)?;
    let total = job.items.len();
    let processed = match job.state {
        JobState::Pending => 0,
        JobState::Running => total / 2,
        JobState::Done => total,
    };
    let reply = json!({
        "state": job.state.as_str(),
        "processed": processed,
        "total": total,
    });
    job.state = match job.state {
        JobState::Pending => JobState::Running,
        _ => JobState::Done,
    };
    ok(reply)
}
