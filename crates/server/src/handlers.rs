//! HTTP route handlers for the participant API.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use certdesk_core::{validate, MessageBody, Participant, Secret};
use serde::Deserialize;

use super::json_error;
use crate::roster::{Roster, RosterError};
use crate::state::AppState;

/// `{ "password": ... }`, with the password allowed to be absent so a
/// missing password is reported as 401 rather than a parse error.
#[derive(Debug, Deserialize)]
pub(crate) struct PasswordRequest {
    #[serde(default)]
    password: Option<Secret>,
}

/// PUT body: participant fields plus the password.
#[derive(Debug, Deserialize)]
pub(crate) struct UpdateRequest {
    #[serde(flatten)]
    record: Participant,
    #[serde(default)]
    password: Option<Secret>,
}

fn message(status: StatusCode, text: &str) -> Response {
    (
        status,
        Json(MessageBody {
            message: text.to_string(),
        }),
    )
        .into_response()
}

fn rejection(err: JsonRejection) -> Response {
    json_error(err.status(), &err.body_text()).into_response()
}

fn roster_error(err: RosterError) -> Response {
    let status = match err {
        RosterError::NotFound(_) => StatusCode::NOT_FOUND,
        RosterError::Duplicate(_) | RosterError::SerialChanged { .. } => StatusCode::CONFLICT,
    };
    json_error(status, &err.to_string()).into_response()
}

fn unauthorized() -> Response {
    json_error(StatusCode::UNAUTHORIZED, "invalid password").into_response()
}

/// Apply `mutate` to a copy of the roster, persist the copy, then swap it in.
///
/// Holding the write lock across the save keeps mutations serialized, and
/// a failed save leaves the in-memory roster untouched.
async fn commit<F>(state: &AppState, mutate: F) -> Result<(), Response>
where
    F: FnOnce(&mut Roster) -> Result<(), RosterError>,
{
    let mut roster = state.roster.write().await;
    let mut next = roster.clone();
    mutate(&mut next).map_err(roster_error)?;
    if let Err(e) = state.persist(&next).await {
        tracing::error!(error = %e, "failed to persist roster");
        return Err(
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "could not save participants")
                .into_response(),
        );
    }
    *roster = next;
    Ok(())
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let records = state.roster.read().await.len();
    let response = serde_json::json!({
        "status": "ok",
        "records": records,
    });
    (StatusCode::OK, Json(response))
}

/// GET /participants
pub(crate) async fn handle_list(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let roster = state.roster.read().await;
    (StatusCode::OK, Json(roster.records().to_vec()))
}

/// POST /participants
pub(crate) async fn handle_create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Participant>, JsonRejection>,
) -> Response {
    let Json(record) = match payload {
        Ok(p) => p,
        Err(e) => return rejection(e),
    };
    if let Err(e) = validate(&record) {
        return json_error(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()).into_response();
    }

    let serial = record.serial_number.clone();
    if let Err(response) = commit(&state, |roster| roster.insert(record)).await {
        return response;
    }
    tracing::info!(%serial, "participant added");
    message(StatusCode::CREATED, "Participant added successfully.")
}

/// PUT /participants/{serial}
pub(crate) async fn handle_update(
    State(state): State<Arc<AppState>>,
    Path(serial): Path<String>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(e) => return rejection(e),
    };
    if !state.password_matches(request.password.as_ref()) {
        tracing::warn!(%serial, "update rejected: bad password");
        return unauthorized();
    }
    if let Err(e) = validate(&request.record) {
        return json_error(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()).into_response();
    }

    if let Err(response) = commit(&state, |roster| roster.update(&serial, request.record)).await {
        return response;
    }
    tracing::info!(%serial, "participant updated");
    message(StatusCode::OK, "Participant updated.")
}

/// DELETE /participants/{serial}
pub(crate) async fn handle_delete(
    State(state): State<Arc<AppState>>,
    Path(serial): Path<String>,
    payload: Result<Json<PasswordRequest>, JsonRejection>,
) -> Response {
    // A missing or unreadable body simply carries no password.
    let password = payload.ok().and_then(|Json(body)| body.password);
    if !state.password_matches(password.as_ref()) {
        tracing::warn!(%serial, "delete rejected: bad password");
        return unauthorized();
    }

    if let Err(response) = commit(&state, |roster| roster.remove(&serial).map(|_| ())).await {
        return response;
    }
    tracing::info!(%serial, "participant deleted");
    message(StatusCode::OK, "Participant deleted.")
}

/// POST /verify-password
pub(crate) async fn handle_verify(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PasswordRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(p) => p,
        Err(e) => return rejection(e),
    };
    if state.password_matches(body.password.as_ref()) {
        (StatusCode::OK, Json(serde_json::json!({"valid": true}))).into_response()
    } else {
        unauthorized()
    }
}
