use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::auth::{RequireAuth, Role, SESSION_COOKIE, SESSION_TTL_HOURS, verify_password};
use crate::server::AppState;
use crate::server::dto::{AdminLoginRequest, LoginResponse, SessionUser, StudentLoginRequest};
use crate::server::response::{ApiError, StoreResultExt};
use crate::types::StudentSession;

const STUDENT_EMAIL_DOMAIN: &str = "student.jmi.ac.in";

pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/login", post(admin_login))
        .route("/student/login", post(student_login))
        .route("/me", get(me))
        .route("/logout", post(logout))
}

/// Builds the session cookie mirrored alongside the bearer token. Production
/// deployments serve the frontend cross-site over TLS, so the cookie needs
/// `Secure; SameSite=None` there and `SameSite=Lax` everywhere else.
fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::hours(SESSION_TTL_HOURS));
    if state.secure_cookies {
        cookie.set_secure(true);
        cookie.set_same_site(SameSite::None);
    } else {
        cookie.set_same_site(SameSite::Lax);
    }
    cookie
}

/// Fallback address for students who log in without one: lowercased name
/// with whitespace runs collapsed to dots, under the institute domain.
fn synthesize_student_email(name: &str) -> String {
    let local: Vec<String> = name
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    format!("{}@{STUDENT_EMAIL_DOMAIN}", local.join("."))
}

async fn admin_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<AdminLoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let missing = || ApiError::bad_request("Email and password are required");
    let email = req.email.filter(|s| !s.is_empty()).ok_or_else(missing)?;
    let password = req.password.filter(|s| !s.is_empty()).ok_or_else(missing)?;

    // Unknown email, inactive account, and wrong password all fail with the
    // same shape; nothing leaks which one it was.
    let invalid = || ApiError::unauthorized("Invalid email or password");

    let admin = state
        .store
        .get_admin_by_email(&email)
        .api_err("Failed to look up admin")?
        .filter(|a| a.is_active)
        .ok_or_else(invalid)?;

    if !verify_password(&password, &admin.password_hash)
        .api_err("Failed to verify admin password")?
    {
        return Err(invalid());
    }

    let token = state
        .sessions
        .sign_admin(&admin)
        .api_err("Failed to sign session token")?;

    let jar = jar.add(session_cookie(&state, token.clone()));

    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            user: SessionUser {
                id: admin.id,
                name: admin.name,
                email: Some(admin.email),
                branch: None,
                role: Role::Admin,
            },
            token,
        }),
    ))
}

async fn student_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<StudentLoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let missing = || ApiError::bad_request("Name and branch are required");
    let name = req.name.filter(|s| !s.is_empty()).ok_or_else(missing)?;
    let branch = req.branch.filter(|s| !s.is_empty()).ok_or_else(missing)?;

    let google_email = match req.google_email.filter(|s| !s.is_empty()) {
        Some(email) => email,
        None => synthesize_student_email(&name),
    };

    // Every login is logged as a fresh session row, repeated logins included.
    let session = StudentSession {
        id: Uuid::new_v4().to_string(),
        name,
        branch,
        google_email,
        created_at: Utc::now(),
    };

    state
        .store
        .create_student_session(&session)
        .api_err("Failed to log student session")?;

    let token = state
        .sessions
        .sign_student(&session)
        .api_err("Failed to sign session token")?;

    let jar = jar.add(session_cookie(&state, token.clone()));

    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            user: SessionUser {
                id: session.id,
                name: session.name,
                email: None,
                branch: Some(session.branch),
                role: Role::Student,
            },
            token,
        }),
    ))
}

/// Returns the decoded session claims; the token is the source of truth, no
/// store lookup happens here.
async fn me(RequireAuth(claims): RequireAuth) -> Json<Value> {
    Json(json!({ "user": claims }))
}

async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = jar.remove(session_cookie(&state, String::new()));
    (jar, Json(json!({ "message": "Logged out successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_email_collapses_whitespace() {
        assert_eq!(
            synthesize_student_email("Ayesha Khan"),
            "ayesha.khan@student.jmi.ac.in"
        );
        assert_eq!(
            synthesize_student_email("  Mohd   Faiz  Ansari "),
            "mohd.faiz.ansari@student.jmi.ac.in"
        );
    }
}
