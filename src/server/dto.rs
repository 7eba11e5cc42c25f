use serde::{Deserialize, Deserializer, Serialize};

use crate::auth::Role;

/// Deserializes a field into `Some(inner)` whenever the key is present,
/// keeping `None` for keys that are absent from the payload. This is what
/// lets partial updates tell "leave untouched" apart from "clear this".
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

// Auth

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentLoginRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub google_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: SessionUser,
    pub token: String,
}

// Upcoming companies

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUpcomingRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tentative_date: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub attachment_name: Option<String>,
    #[serde(default)]
    pub attachment_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUpcomingRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tentative_date: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub info: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub attachment_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub attachment_url: Option<Option<String>>,
}

// Ongoing drives

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOngoingRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub jd: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub current_round: Option<String>,
    #[serde(default)]
    pub round_number: Option<i64>,
    #[serde(default)]
    pub total_rounds: Option<i64>,
    #[serde(default)]
    pub gform_link: Option<String>,
    #[serde(default)]
    pub gform_deadline: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOngoingRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub jd: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub current_round: Option<Option<String>>,
    #[serde(default)]
    pub round_number: Option<i64>,
    #[serde(default)]
    pub total_rounds: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub gform_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub gform_deadline: Option<Option<String>>,
}

// Completed drives

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompletedRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub jd: Option<String>,
    #[serde(default)]
    pub final_list_name: Option<String>,
    #[serde(default)]
    pub final_list_url: Option<String>,
    #[serde(default)]
    pub selected_list_name: Option<String>,
    #[serde(default)]
    pub selected_list_url: Option<String>,
    #[serde(default)]
    pub selected_count: Option<i64>,
    #[serde(default)]
    pub spc_member_name: Option<String>,
    #[serde(default)]
    pub spc_member_phone: Option<String>,
    #[serde(default)]
    pub spc_member_email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompletedRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub jd: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub final_list_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub final_list_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub selected_list_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub selected_list_url: Option<Option<String>>,
    #[serde(default)]
    pub selected_count: Option<i64>,
    #[serde(default)]
    pub spc_member_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub spc_member_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub spc_member_email: Option<Option<String>>,
}
