//! End-to-end tests for `FolioClient`: restarts over a file-backed store,
//! registration, and a full run against an HTTP fake of the directory.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router as HttpRouter};
use chrono::NaiveDate;
use folio::prelude::*;
use folio::registration::RegistrationError;
use serde_json::{Value, json};
use tokio::sync::Mutex;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn ann() -> User {
    User::new(UserId::Number(1), "a@x.com")
        .with_name("Ann")
        .with_password("pw")
}

fn cat_form() -> RegistrationForm {
    RegistrationForm {
        username: "Cat".into(),
        email: "c@x.com".into(),
        dob: NaiveDate::from_ymd_opt(2000, 1, 31),
        password: "pw3".into(),
    }
}

fn file_client(
    dir: &std::path::Path,
    directory: InMemoryDirectory,
) -> FolioClient<FileStore, InMemoryDirectory> {
    FolioClient::new(
        FileStore::new(dir).unwrap(),
        directory,
        SessionConfig::default(),
    )
}

// =========================================================================
// Restarts
// =========================================================================

#[tokio::test]
async fn test_login_survives_restart() {
    let data = tempfile::tempdir().unwrap();
    let directory = InMemoryDirectory::with_users(vec![ann()]);

    let first = file_client(data.path(), directory.clone());
    first.start().await;
    first.login(&LoginForm::new("a@x.com", "pw")).await.unwrap();
    drop(first);

    let second = file_client(data.path(), directory);
    let settled = second.start().await;

    assert_eq!(settled.session, Session::Authenticated(ann()));
    assert_eq!(second.router().current(), Screen::Home);
}

#[tokio::test]
async fn test_logout_survives_restart() {
    let data = tempfile::tempdir().unwrap();
    let directory = InMemoryDirectory::with_users(vec![ann()]);

    let first = file_client(data.path(), directory.clone());
    first.login(&LoginForm::new("a@x.com", "pw")).await.unwrap();
    first.logout().await;
    drop(first);

    let second = file_client(data.path(), directory);
    let settled = second.start().await;

    assert_eq!(settled.session, Session::Unauthenticated);
    assert_eq!(second.router().current(), Screen::Login);
}

#[tokio::test]
async fn test_corrupt_snapshot_on_disk_starts_logged_out() {
    let data = tempfile::tempdir().unwrap();
    std::fs::write(data.path().join("user.json"), "{not json").unwrap();

    let client = file_client(data.path(), InMemoryDirectory::new());
    let settled = client.start().await;

    assert_eq!(settled.session, Session::Unauthenticated);
}

// =========================================================================
// Registration
// =========================================================================

#[tokio::test]
async fn test_register_existing_email_issues_no_create() {
    let directory = InMemoryDirectory::with_users(vec![ann()]);
    let client = FolioClient::new(
        MemoryStore::new(),
        directory.clone(),
        SessionConfig::default(),
    );
    let form = RegistrationForm {
        email: "a@x.com".into(),
        ..cat_form()
    };

    let err = client.register(&form, today()).await.unwrap_err();

    assert!(matches!(
        err,
        FolioError::Registration(RegistrationError::AlreadyRegistered)
    ));
    assert_eq!(err.user_message(), "Email is already registered");
    assert_eq!(directory.calls().create, 0);
    assert_eq!(directory.users().await.len(), 1);
}

#[tokio::test]
async fn test_register_does_not_log_in() {
    let client = FolioClient::new(
        MemoryStore::new(),
        InMemoryDirectory::new(),
        SessionConfig::default(),
    );

    let user = client.register(&cat_form(), today()).await.unwrap();

    assert_eq!(user.email, "c@x.com");
    assert_eq!(client.session(), Session::Unauthenticated);
}

#[tokio::test]
async fn test_register_double_submit_creates_once() {
    let directory = InMemoryDirectory::new();
    let client = Arc::new(FolioClient::new(
        MemoryStore::new(),
        directory.clone(),
        SessionConfig::default(),
    ));

    let (form_a, form_b) = (cat_form(), cat_form());
    let (a, b) = tokio::join!(
        client.register(&form_a, today()),
        client.register(&form_b, today()),
    );

    assert!(a.is_ok() != b.is_ok(), "exactly one submit should succeed");
    assert_eq!(directory.calls().create, 1);
    assert_eq!(directory.users().await.len(), 1);
}

#[tokio::test]
async fn test_registered_user_can_log_in() {
    let client = FolioClient::new(
        MemoryStore::new(),
        InMemoryDirectory::new(),
        SessionConfig::default(),
    );
    let created = client.register(&cat_form(), today()).await.unwrap();

    let settled = client
        .login(&LoginForm::new("c@x.com", "pw3"))
        .await
        .unwrap();

    assert_eq!(settled.session.user(), Some(&created));
    assert_eq!(greeting(&created), "Welcome Cat");
}

// =========================================================================
// Over HTTP
// =========================================================================

type Records = Arc<Mutex<Vec<Value>>>;

async fn list_users(
    State(records): State<Records>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let records = records.lock().await;
    let matches = records
        .iter()
        .filter(|record| {
            params
                .iter()
                .all(|(field, wanted)| record[field].as_str() == Some(wanted.as_str()))
        })
        .cloned()
        .collect();
    Json(Value::Array(matches))
}

async fn create_user(
    State(records): State<Records>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut records = records.lock().await;
    body["id"] = json!((records.len() + 1).to_string());
    records.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn start_fake() -> String {
    let records: Records = Arc::new(Mutex::new(Vec::new()));
    let app = HttpRouter::new()
        .route("/users", get(list_users).post(create_user))
        .with_state(records);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().expect("should have local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_http_register_login_logout_round() {
    let base_url = start_fake().await;
    let data = tempfile::tempdir().unwrap();
    let client = FolioClient::builder()
        .base_url(&base_url)
        .timeout(Duration::from_secs(5))
        .data_dir(data.path())
        .build_http()
        .unwrap();
    client.start().await;

    let created = client.register(&cat_form(), today()).await.unwrap();
    assert_eq!(created.id, UserId::Text("1".into()));

    let again = client.register(&cat_form(), today()).await.unwrap_err();
    assert_eq!(again.user_message(), "Email is already registered");

    let settled = client
        .login(&LoginForm::new("c@x.com", "pw3"))
        .await
        .unwrap();
    assert_eq!(settled.session.user(), Some(&created));
    assert!(data.path().join("user.json").exists());

    client.logout().await;
    assert!(!data.path().join("user.json").exists());
    assert_eq!(client.router().screen_set(), ScreenSet::Auth);
}

#[tokio::test]
async fn test_http_wrong_password_reports_invalid_credentials() {
    let base_url = start_fake().await;
    let client = FolioClient::builder()
        .base_url(&base_url)
        .build_http()
        .unwrap();
    client.register(&cat_form(), today()).await.unwrap();

    let settled = client
        .login(&LoginForm::new("c@x.com", "nope"))
        .await
        .unwrap();

    assert_eq!(settled.session.error(), Some("Invalid credentials"));
}
