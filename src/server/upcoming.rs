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
use crate::server::dto::{CreateUpcomingRequest, UpdateUpcomingRequest};
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::{parse_date_input, require_field};
use crate::types::{AuditAction, UpcomingCompany, UpcomingCompanyWithAdmin};

const TABLE: &str = "upcoming_companies";

pub fn upcoming_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_upcoming))
        .route("/", post(create_upcoming))
        .route("/{id}", put(update_upcoming))
        .route("/{id}", delete(delete_upcoming))
}

async fn list_upcoming(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UpcomingCompanyWithAdmin>>, ApiError> {
    let companies = state
        .store
        .list_upcoming()
        .api_err("Failed to fetch upcoming companies")?;

    Ok(Json(companies))
}

async fn create_upcoming(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUpcomingRequest>,
) -> Result<(StatusCode, Json<UpcomingCompany>), ApiError> {
    const MISSING: &str = "Name and tentative date are required";
    let name = require_field(req.name, MISSING)?;
    let date_raw = require_field(req.tentative_date, MISSING)?;
    let tentative_date = parse_date_input(&date_raw, "tentative date")?;

    let company = UpcomingCompany {
        id: Uuid::new_v4().to_string(),
        name,
        tentative_date,
        info: req.info,
        attachment_name: req.attachment_name,
        attachment_url: req.attachment_url,
        created_by: admin.0.sub.clone(),
        created_at: Utc::now(),
    };

    state
        .store
        .create_upcoming(&company)
        .api_err("Failed to create upcoming company")?;

    audit::record(
        state.store.as_ref(),
        &admin.0.sub,
        AuditAction::Create,
        TABLE,
        &company.id,
        None,
        audit::snapshot(&company),
    );

    Ok((StatusCode::CREATED, Json(company)))
}

async fn update_upcoming(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUpcomingRequest>,
) -> Result<Json<UpcomingCompany>, ApiError> {
    let mut company = state
        .store
        .get_upcoming(&id)
        .api_err("Failed to fetch upcoming company")?
        .or_not_found("Company not found")?;

    let old_data = audit::snapshot(&company);

    if let Some(name) = req.name {
        if !name.is_empty() {
            company.name = name;
        }
    }
    if let Some(raw) = req.tentative_date {
        if !raw.is_empty() {
            company.tentative_date = parse_date_input(&raw, "tentative date")?;
        }
    }
    if let Some(info) = req.info {
        company.info = info;
    }
    if let Some(attachment_name) = req.attachment_name {
        company.attachment_name = attachment_name;
    }
    if let Some(attachment_url) = req.attachment_url {
        company.attachment_url = attachment_url;
    }

    state
        .store
        .update_upcoming(&company)
        .api_err("Failed to update upcoming company")?;

    audit::record(
        state.store.as_ref(),
        &admin.0.sub,
        AuditAction::Update,
        TABLE,
        &id,
        old_data,
        audit::snapshot(&company),
    );

    Ok(Json(company))
}

async fn delete_upcoming(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let company = state
        .store
        .get_upcoming(&id)
        .api_err("Failed to fetch upcoming company")?
        .or_not_found("Company not found")?;

    let old_data = audit::snapshot(&company);

    state
        .store
        .delete_upcoming(&id)
        .api_err("Failed to delete upcoming company")?;

    audit::record(
        state.store.as_ref(),
        &admin.0.sub,
        AuditAction::Delete,
        TABLE,
        &id,
        old_data,
        None,
    );

    Ok(Json(json!({ "message": "Company deleted successfully" })))
}
