use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::audit;
use crate::auth::{RequireAdmin, RequireAuth};
use crate::server::AppState;
use crate::server::dto::{CreateOngoingRequest, UpdateOngoingRequest};
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::{non_negative, parse_date_input, parse_drive_status, require_field};
use crate::types::{AuditAction, OngoingDrive, OngoingDriveWithAdmin};

const TABLE: &str = "ongoing_drives";

pub fn ongoing_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_ongoing))
        .route("/", post(create_ongoing))
        .route("/{id}", put(update_ongoing))
        .route("/{id}", delete(delete_ongoing))
}

async fn list_ongoing(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OngoingDriveWithAdmin>>, ApiError> {
    let drives = state
        .store
        .list_ongoing()
        .api_err("Failed to fetch ongoing drives")?;

    Ok(Json(drives))
}

async fn create_ongoing(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOngoingRequest>,
) -> Result<(StatusCode, Json<OngoingDrive>), ApiError> {
    const MISSING: &str = "Name, JD, and status are required";
    let name = require_field(req.name, MISSING)?;
    let jd = require_field(req.jd, MISSING)?;
    let status = parse_drive_status(&require_field(req.status, MISSING)?)?;

    let gform_deadline = match req.gform_deadline.filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_date_input(&raw, "gform deadline")?),
        None => None,
    };

    let drive = OngoingDrive {
        id: Uuid::new_v4().to_string(),
        name,
        jd,
        status,
        current_round: req.current_round,
        round_number: non_negative(req.round_number.unwrap_or(0), "Round number")?,
        total_rounds: non_negative(req.total_rounds.unwrap_or(0), "Total rounds")?,
        gform_link: req.gform_link,
        gform_deadline,
        created_by: admin.0.sub.clone(),
        created_at: Utc::now(),
    };

    state
        .store
        .create_ongoing(&drive)
        .api_err("Failed to create ongoing drive")?;

    audit::record(
        state.store.as_ref(),
        &admin.0.sub,
        AuditAction::Create,
        TABLE,
        &drive.id,
        None,
        audit::snapshot(&drive),
    );

    Ok((StatusCode::CREATED, Json(drive)))
}

async fn update_ongoing(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateOngoingRequest>,
) -> Result<Json<OngoingDrive>, ApiError> {
    let mut drive = state
        .store
        .get_ongoing(&id)
        .api_err("Failed to fetch ongoing drive")?
        .or_not_found("Drive not found")?;

    let old_data = audit::snapshot(&drive);

    if let Some(name) = req.name {
        if !name.is_empty() {
            drive.name = name;
        }
    }
    if let Some(jd) = req.jd {
        if !jd.is_empty() {
            drive.jd = jd;
        }
    }
    if let Some(status) = req.status {
        if !status.is_empty() {
            drive.status = parse_drive_status(&status)?;
        }
    }
    if let Some(current_round) = req.current_round {
        drive.current_round = current_round;
    }
    if let Some(round_number) = req.round_number {
        drive.round_number = non_negative(round_number, "Round number")?;
    }
    if let Some(total_rounds) = req.total_rounds {
        drive.total_rounds = non_negative(total_rounds, "Total rounds")?;
    }
    if let Some(gform_link) = req.gform_link {
        drive.gform_link = gform_link;
    }
    if let Some(gform_deadline) = req.gform_deadline {
        drive.gform_deadline = match gform_deadline.filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_date_input(&raw, "gform deadline")?),
            None => None,
        };
    }

    state
        .store
        .update_ongoing(&drive)
        .api_err("Failed to update ongoing drive")?;

    audit::record(
        state.store.as_ref(),
        &admin.0.sub,
        AuditAction::Update,
        TABLE,
        &id,
        old_data,
        audit::snapshot(&drive),
    );

    Ok(Json(drive))
}

async fn delete_ongoing(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let drive = state
        .store
        .get_ongoing(&id)
        .api_err("Failed to fetch ongoing drive")?
        .or_not_found("Drive not found")?;

    let old_data = audit::snapshot(&drive);

    state
        .store
        .delete_ongoing(&id)
        .api_err("Failed to delete ongoing drive")?;

    audit::record(
        state.store.as_ref(),
        &admin.0.sub,
        AuditAction::Delete,
        TABLE,
        &id,
        old_data,
        None,
    );

    Ok(Json(json!({ "message": "Drive deleted successfully" })))
}
