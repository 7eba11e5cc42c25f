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
use crate::server::dto::{CreateCompletedRequest, UpdateCompletedRequest};
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::{non_negative, require_field};
use crate::types::{AuditAction, CompletedDrive, CompletedDriveWithAdmin};

const TABLE: &str = "completed_drives";

pub fn completed_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_completed))
        .route("/", post(create_completed))
        .route("/{id}", put(update_completed))
        .route("/{id}", delete(delete_completed))
}

async fn list_completed(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CompletedDriveWithAdmin>>, ApiError> {
    let drives = state
        .store
        .list_completed()
        .api_err("Failed to fetch completed drives")?;

    Ok(Json(drives))
}

async fn create_completed(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCompletedRequest>,
) -> Result<(StatusCode, Json<CompletedDrive>), ApiError> {
    const MISSING: &str = "Name, JD, and SPC member name are required";
    let name = require_field(req.name, MISSING)?;
    let jd = require_field(req.jd, MISSING)?;
    let spc_member_name = require_field(req.spc_member_name, MISSING)?;

    let drive = CompletedDrive {
        id: Uuid::new_v4().to_string(),
        name,
        jd,
        final_list_name: req.final_list_name,
        final_list_url: req.final_list_url,
        selected_list_name: req.selected_list_name,
        selected_list_url: req.selected_list_url,
        selected_count: non_negative(req.selected_count.unwrap_or(0), "Selected count")?,
        spc_member_name,
        spc_member_phone: req.spc_member_phone,
        spc_member_email: req.spc_member_email,
        created_by: admin.0.sub.clone(),
        created_at: Utc::now(),
    };

    state
        .store
        .create_completed(&drive)
        .api_err("Failed to create completed drive")?;

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

async fn update_completed(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCompletedRequest>,
) -> Result<Json<CompletedDrive>, ApiError> {
    let mut drive = state
        .store
        .get_completed(&id)
        .api_err("Failed to fetch completed drive")?
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
    if let Some(spc_member_name) = req.spc_member_name {
        if !spc_member_name.is_empty() {
            drive.spc_member_name = spc_member_name;
        }
    }
    if let Some(final_list_name) = req.final_list_name {
        drive.final_list_name = final_list_name;
    }
    if let Some(final_list_url) = req.final_list_url {
        drive.final_list_url = final_list_url;
    }
    if let Some(selected_list_name) = req.selected_list_name {
        drive.selected_list_name = selected_list_name;
    }
    if let Some(selected_list_url) = req.selected_list_url {
        drive.selected_list_url = selected_list_url;
    }
    if let Some(selected_count) = req.selected_count {
        drive.selected_count = non_negative(selected_count, "Selected count")?;
    }
    if let Some(spc_member_phone) = req.spc_member_phone {
        drive.spc_member_phone = spc_member_phone;
    }
    if let Some(spc_member_email) = req.spc_member_email {
        drive.spc_member_email = spc_member_email;
    }

    state
        .store
        .update_completed(&drive)
        .api_err("Failed to update completed drive")?;

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

async fn delete_completed(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let drive = state
        .store
        .get_completed(&id)
        .api_err("Failed to fetch completed drive")?
        .or_not_found("Drive not found")?;

    let old_data = audit::snapshot(&drive);

    state
        .store
        .delete_completed(&id)
        .api_err("Failed to delete completed drive")?;

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
