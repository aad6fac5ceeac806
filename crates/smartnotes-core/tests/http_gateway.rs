//! HTTP gateway behavior against a mock backend.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use smartnotes_core::{
    models::Credentials, ClientConfig, ClientPhase, Error, HttpGateway, ListFilter,
    MemoryTokenStore, NewNote, NoteId, NotePatch, NotesClient, NotesGateway,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> HttpGateway {
    let config = ClientConfig {
        api_base_url: format!("{}/api/", server.uri()),
        http_timeout_secs: 5,
    };
    HttpGateway::new(&config).expect("gateway")
}

fn note_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "owner_id": 1,
        "title": title,
        "content": "body",
        "tags": ["work"],
        "ai_summary": null,
        "ai_tags": null,
        "is_pinned": false,
        "is_archived": false,
        "created_at": "2024-10-26T12:00:00",
        "updated_at": "2024-10-26T12:00:00.250000"
    })
}

fn profile_json() -> Value {
    json!({
        "id": 1,
        "email": "ada@example.com",
        "username": "ada",
        "full_name": "Ada Lovelace",
        "is_active": true,
        "created_at": "2024-10-26T12:00:00"
    })
}

#[tokio::test]
async fn login_posts_json_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "ada", "password": "x"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok", "token_type": "bearer"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let token = gateway_for(&server)
        .login(&Credentials::new("ada", "x"))
        .await
        .expect("login");

    assert_eq!(token.access_token, "tok");
}

#[tokio::test]
async fn profile_request_carries_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .expect(1)
        .mount(&server)
        .await;

    let profile = gateway_for(&server).fetch_profile("tok").await.expect("profile");

    assert_eq!(profile.id, 1);
    assert_eq!(profile.display_name(), "Ada Lovelace");
}

#[tokio::test]
async fn listing_sends_filter_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .and(query_param("search", "rust"))
        .and(query_param("include_archived", "true"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([note_json(2, "B"), note_json(1, "A")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let filter = ListFilter {
        search: Some("rust".to_string()),
        include_archived: true,
    };
    let notes = gateway_for(&server)
        .list_notes("tok", &filter)
        .await
        .expect("list");

    assert_eq!(
        notes.iter().map(|note| note.id).collect::<Vec<_>>(),
        vec![NoteId::new(2), NoteId::new(1)]
    );
    assert_eq!(notes[0].user_tags(), vec!["work".to_string()]);
}

#[tokio::test]
async fn create_defaults_to_ai_enrichment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes"))
        .and(body_json(json!({
            "title": "T",
            "content": "C",
            "is_pinned": false,
            "is_archived": false,
            "use_ai": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(note_json(7, "T")))
        .expect(1)
        .mount(&server)
        .await;

    let note = gateway_for(&server)
        .create_note("tok", &NewNote::new("T", "C"))
        .await
        .expect("create");

    assert_eq!(note.id, NoteId::new(7));
}

#[tokio::test]
async fn patch_sends_only_present_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/notes/3"))
        .and(body_json(json!({"is_pinned": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(note_json(3, "A")))
        .expect(1)
        .mount(&server)
        .await;

    gateway_for(&server)
        .update_note("tok", NoteId::new(3), &NotePatch::pin(true))
        .await
        .expect("update");
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/notes/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    gateway_for(&server)
        .delete_note("tok", NoteId::new(3))
        .await
        .expect("delete");
}

#[tokio::test]
async fn rejected_token_is_an_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Could not validate credentials"})),
        )
        .mount(&server)
        .await;

    let error = gateway_for(&server)
        .list_notes("stale", &ListFilter::default())
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Authentication(ref message) if message == "Could not validate credentials"));
}

#[tokio::test]
async fn missing_note_uses_backend_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Note not found"})))
        .mount(&server)
        .await;

    let error = gateway_for(&server)
        .fetch_note("tok", NoteId::new(99))
        .await
        .unwrap_err();

    assert!(matches!(error, Error::NotFound(ref message) if message == "Note not found"));
}

#[tokio::test]
async fn client_signs_in_and_loads_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok", "token_type": "bearer"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([note_json(1, "A")])))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = MemoryTokenStore::default();
    let mut client = NotesClient::new(gateway_for(&server), tokens.clone());
    client
        .login(&Credentials::new("ada", "x"))
        .await
        .expect("login");

    let snapshot = client.snapshot().await;
    assert_eq!(snapshot.phase, ClientPhase::Authenticated);
    assert_eq!(snapshot.notes.len(), 1);
    assert_eq!(
        smartnotes_core::TokenPersistence::load_token(&tokens).expect("token"),
        Some("tok".to_string())
    );
}
