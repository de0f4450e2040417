//! Integration tests for the participant API.
//!
//! Each test starts the router in-process on an ephemeral port and talks
//! to it over real HTTP, either through `HttpRemote` directly or through
//! a full `AdminConsole`.

use std::path::PathBuf;
use std::sync::Arc;

use certdesk_core::{
    AdminConsole, ConsoleError, Field, GateOutcome, HttpRemote, Operation, Participant, Remote,
    RemoteError, Secret, SubmitKind,
};
use certdesk_server::{app, AppState, Roster};

const PASSWORD: &str = "s3cret";

/// Start the API on 127.0.0.1 with a random port; returns its base URL.
async fn spawn_server(roster: Roster, data_file: Option<PathBuf>) -> String {
    let state = Arc::new(AppState::new(roster, Secret::new(PASSWORD), data_file));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.expect("server");
    });
    format!("http://{}", addr)
}

fn participant(serial: &str, name: &str, position: &str) -> Participant {
    Participant {
        serial_number: serial.to_string(),
        name: name.to_string(),
        program_events: "Workshop".to_string(),
        issue_date: "2025-03-01".to_string(),
        position: position.to_string(),
        ..Participant::default()
    }
}

fn status_of<T: std::fmt::Debug>(result: Result<T, RemoteError>) -> u16 {
    result
        .expect_err("expected an error status")
        .status()
        .expect("expected an HTTP status error")
}

// ──────────────────────────────────────────────
// Raw endpoint behavior
// ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn health_reports_record_count() {
    let base = spawn_server(Roster::new(vec![participant("A20250001", "Jane", "Lead")]), None).await;
    let url = format!("{}/health", base);
    let body: serde_json::Value = tokio::task::spawn_blocking(move || {
        ureq::get(&url)
            .call()
            .unwrap()
            .into_body()
            .read_json()
            .unwrap()
    })
    .await
    .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["records"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_keeps_insertion_order() {
    let base = spawn_server(Roster::default(), None).await;
    let remote = HttpRemote::new(&base).unwrap();
    remote.create(&participant("A20250002", "B", "Lead")).await.unwrap();
    remote.create(&participant("A20250001", "A", "Lead")).await.unwrap();
    let serials: Vec<_> = remote
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.serial_number)
        .collect();
    assert_eq!(serials, ["A20250002", "A20250001"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_rejects_invalid_and_duplicate() {
    let base = spawn_server(Roster::new(vec![participant("A20250001", "A", "Lead")]), None).await;
    let remote = HttpRemote::new(&base).unwrap();

    assert_eq!(
        status_of(remote.create(&participant("X1234567", "A", "Lead")).await),
        422
    );
    let err = remote
        .create(&participant("A20250001", "Again", "Lead"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RemoteError::Status {
            status: 409,
            message: "serial number A20250001 already exists".to_string()
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn verify_accepts_only_the_admin_password() {
    let base = spawn_server(Roster::default(), None).await;
    let remote = HttpRemote::new(&base).unwrap();
    assert!(remote.verify(&Secret::new(PASSWORD)).await.is_ok());
    assert_eq!(status_of(remote.verify(&Secret::new("nope")).await), 401);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_checks_password_existence_and_serial() {
    let base = spawn_server(Roster::new(vec![participant("A20250001", "A", "Lead")]), None).await;
    let remote = HttpRemote::new(&base).unwrap();
    let good = Secret::new(PASSWORD);

    let changed = participant("A20250001", "A", "Volunteer");
    assert_eq!(
        status_of(remote.update("A20250001", &changed, &Secret::new("bad")).await),
        401
    );
    assert_eq!(
        status_of(
            remote
                .update("A20250009", &participant("A20250009", "A", "Lead"), &good)
                .await
        ),
        404
    );
    assert_eq!(
        status_of(
            remote
                .update("A20250001", &participant("A99999999", "A", "Lead"), &good)
                .await
        ),
        409
    );
    remote.update("A20250001", &changed, &good).await.unwrap();
    assert_eq!(remote.list().await.unwrap()[0].position, "Volunteer");
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_checks_password_and_existence() {
    let base = spawn_server(Roster::new(vec![participant("A20250001", "A", "Lead")]), None).await;
    let remote = HttpRemote::new(&base).unwrap();

    assert_eq!(
        status_of(remote.delete("A20250001", &Secret::new("bad")).await),
        401
    );
    assert_eq!(
        status_of(remote.delete("A20250009", &Secret::new(PASSWORD)).await),
        404
    );
    remote
        .delete("A20250001", &Secret::new(PASSWORD))
        .await
        .unwrap();
    assert!(remote.list().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_route_is_json_404() {
    let base = spawn_server(Roster::default(), None).await;
    let url = format!("{}/nope", base);
    let (status, body) = tokio::task::spawn_blocking(move || {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        let mut response = agent.get(&url).call().unwrap();
        let status = response.status().as_u16();
        let body: serde_json::Value = response.body_mut().read_json().unwrap();
        (status, body)
    })
    .await
    .unwrap();
    assert_eq!(status, 404);
    assert_eq!(body["error"], "not found");
}

#[tokio::test(flavor = "multi_thread")]
async fn mutations_are_written_to_the_data_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("participants.json");
    let base = spawn_server(Roster::default(), Some(path.clone())).await;
    let remote = HttpRemote::new(&base).unwrap();

    remote
        .create(&participant("A20250001", "A", "Lead"))
        .await
        .unwrap();
    let saved = Roster::load(&path).await.unwrap();
    assert_eq!(saved.records()[0].serial_number, "A20250001");

    remote
        .delete("A20250001", &Secret::new(PASSWORD))
        .await
        .unwrap();
    assert!(Roster::load(&path).await.unwrap().is_empty());
}

// ──────────────────────────────────────────────
// Console end to end
// ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn console_create_edit_delete_round() {
    let base = spawn_server(Roster::default(), None).await;
    let mut console = AdminConsole::new(HttpRemote::new(&base).unwrap());
    console.refresh().await.unwrap();
    assert!(console.store().is_empty());

    // create
    console.fill_form(participant("A20250002", "Jane Doe", "Volunteer"));
    let outcome = console.submit().await.unwrap();
    assert_eq!(outcome.kind, SubmitKind::Created);
    assert_eq!(
        console.store().get("A20250002").map(|p| p.name.as_str()),
        Some("Jane Doe")
    );

    // edit, with the identifier field tampered with
    console.request_edit("A20250002").unwrap();
    assert_eq!(
        console.confirm(PASSWORD).await.unwrap(),
        GateOutcome::EditStarted {
            serial: "A20250002".to_string()
        }
    );
    console.set_field(Field::SerialNumber, "A99999999");
    console.set_field(Field::Position, "Lead");
    let outcome = console.submit().await.unwrap();
    assert_eq!(outcome.kind, SubmitKind::Updated);
    assert_eq!(console.store().len(), 1);
    assert_eq!(console.store().get("A20250002").unwrap().position, "Lead");
    assert!(console.store().get("A99999999").is_none());

    // delete with the wrong password
    console.request_delete("A20250002").unwrap();
    let err = console.confirm("wrong").await.unwrap_err();
    assert!(matches!(
        err,
        ConsoleError::MutationFailed {
            operation: Operation::Delete,
            ..
        }
    ));
    console.refresh().await.unwrap();
    assert!(console.store().get("A20250002").is_some());

    // delete with the right password
    console.request_delete("A20250002").unwrap();
    let outcome = console.confirm(PASSWORD).await.unwrap();
    assert_eq!(
        outcome,
        GateOutcome::Deleted {
            serial: "A20250002".to_string(),
            stale: false
        }
    );
    assert!(console.store().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn console_wrong_password_never_enters_edit_mode() {
    let base = spawn_server(
        Roster::new(vec![participant("A20250001", "Jane", "Volunteer")]),
        None,
    )
    .await;
    let mut console = AdminConsole::new(HttpRemote::new(&base).unwrap());
    console.refresh().await.unwrap();

    console.request_edit("A20250001").unwrap();
    assert_eq!(
        console.confirm("wrong").await.unwrap_err(),
        ConsoleError::InvalidCredential
    );
    assert!(console.form().is_empty());
    assert!(!console.form().is_editing());
}
