//! Client behaviour over an in-process transport.
//!
//! The stub answers every request from a closure and records what it was
//! sent, so these tests see exactly which requests reach the wire.

use std::sync::Mutex;

use async_trait::async_trait;
use portal_core::resources::{buku_tamu, jenis_usaha, pegawai, pwa_version, survei, video};
use portal_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, ListQuery, RequestBody, Transport, Upload};
use serde_json::{json, Value};

struct Stub<F> {
    respond: F,
    sent: Mutex<Vec<HttpRequest>>,
}

impl<F> Stub<F>
where
    F: Fn(&HttpRequest) -> HttpResponse + Send + Sync,
{
    fn new(respond: F) -> Self {
        Self {
            respond,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl<F> Transport for Stub<F>
where
    F: Fn(&HttpRequest) -> HttpResponse + Send + Sync,
{
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let response = (self.respond)(&request);
        self.sent.lock().unwrap().push(request);
        Ok(response)
    }
}

/// Echo a JSON body back as a freshly stored record.
fn echo(request: &HttpRequest) -> HttpResponse {
    let mut record: Value = request
        .body
        .as_ref()
        .and_then(RequestBody::as_json)
        .map(|json| serde_json::from_str(json).unwrap())
        .unwrap_or_else(|| json!({}));
    record["id"] = json!(9);
    record["created_at"] = json!("2024-05-01T08:00:00.000000Z");
    record["updated_at"] = json!("2024-05-01T08:00:00.000000Z");
    HttpResponse::new(201, json!({ "data": record }).to_string())
}

#[tokio::test]
async fn create_round_trip_returns_server_fields() {
    let stub = Stub::new(echo);
    let input = video::validate_create(&json!({
        "judul": "Profil Kabupaten",
        "link": "https://video.example.id/profil",
    }))
    .unwrap();

    let created = video::VIDEO.client(&stub).create(&input).await.unwrap();

    assert_eq!(created.id, 9);
    assert_eq!(created.judul, "Profil Kabupaten");
    assert_eq!(created.timestamps.created_at, "2024-05-01T08:00:00.000000Z");
    let sent = stub.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, HttpMethod::Post);
    assert_eq!(sent[0].path, "/video");
}

#[tokio::test]
async fn rejected_input_sends_nothing() {
    let stub = Stub::new(echo);

    let err = pwa_version::validate_create(&json!({"version": "v1"}))
        .map_err(ApiError::from)
        .unwrap_err();
    assert!(err.validation_errors().is_some());

    let err = jenis_usaha::JENIS_USAHA.client(&stub).get(0).await.unwrap_err();
    assert_eq!(err.validation_errors().unwrap().paths(), vec!["id"]);

    let err = jenis_usaha::JENIS_USAHA
        .client(&stub)
        .list(&ListQuery::new().sort("password", Default::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    assert!(stub.sent().is_empty());
}

#[tokio::test]
async fn oversized_face_photo_is_rejected_locally() {
    let stub = Stub::new(echo);
    let photo = Upload::new("besar.jpg", "image/jpeg", vec![0; pegawai::FACE_MAX_BYTES as usize + 1]);

    let err = pegawai::upload_face(&stub, 1, &photo).await.unwrap_err();

    assert_eq!(err.validation_errors().unwrap().paths(), vec![pegawai::FACE_FIELD]);
    assert!(stub.sent().is_empty());
}

#[tokio::test]
async fn guest_book_range_checked_before_listing() {
    let err = buku_tamu::query_schema()
        .parse(&json!({"startDate": "2024-06-30", "endDate": "2024-06-01"}))
        .unwrap_err();
    assert_eq!(err.paths(), vec!["startDate"]);

    let stub = Stub::new(|_: &HttpRequest| {
        HttpResponse::new(
            200,
            json!({"data": [], "meta": {"current_page": 1, "last_page": 1, "per_page": 10, "total": 0}}).to_string(),
        )
    });
    let query = buku_tamu::BUKU_TAMU
        .validate_query(
            &buku_tamu::query_schema(),
            &json!({"startDate": "2024-06-01", "endDate": "2024-06-30"}),
        )
        .unwrap();
    let page = buku_tamu::BUKU_TAMU.client(&stub).list(&query).await.unwrap();

    assert!(page.data.is_empty());
    let sent = stub.sent();
    assert_eq!(sent[0].query_value("startDate"), Some("2024-06-01"));
    assert_eq!(sent[0].query_value("endDate"), Some("2024-06-30"));
}

#[tokio::test]
async fn server_failure_surfaces_unchanged() {
    let stub = Stub::new(|_: &HttpRequest| HttpResponse::new(500, r#"{"message":"Server Error"}"#));

    let err = survei::SURVEI.client(&stub).get(4).await.unwrap_err();

    assert!(!err.is_retryable());
    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Server Error");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let stub = Stub::new(|request: &HttpRequest| {
        let id: u64 = request.path.rsplit('/').next().unwrap().parse().unwrap();
        HttpResponse::new(
            200,
            json!({"data": {
                "id": id,
                "judul": format!("Video {id}"),
                "link": "https://video.example.id/x",
                "created_at": "2024-05-01T08:00:00.000000Z",
                "updated_at": "2024-05-01T08:00:00.000000Z",
            }})
            .to_string(),
        )
    });
    let client = video::VIDEO.client(&stub);

    let (a, b, c) = tokio::join!(client.get(1), client.get(2), client.get(3));

    assert_eq!(a.unwrap().judul, "Video 1");
    assert_eq!(b.unwrap().judul, "Video 2");
    assert_eq!(c.unwrap().judul, "Video 3");
    assert_eq!(stub.sent().len(), 3);
}
