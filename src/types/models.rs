use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A placement-cell administrator. Created via `driveboard admin create`,
/// never through the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// One row per student login. Not an account: no password, no uniqueness,
/// never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSession {
    pub id: String,
    pub name: String,
    pub branch: String,
    pub google_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingCompany {
    pub id: String,
    pub name: String,
    pub tentative_date: DateTime<Utc>,
    pub info: Option<String>,
    pub attachment_name: Option<String>,
    pub attachment_url: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Stage an ongoing drive is in. The record keeps both field families in
/// storage; the tag alone decides which one is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveStatus {
    Gform,
    Round,
}

impl DriveStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DriveStatus::Gform => "gform",
            DriveStatus::Round => "round",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "gform" => Some(DriveStatus::Gform),
            "round" => Some(DriveStatus::Round),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OngoingDrive {
    pub id: String,
    pub name: String,
    pub jd: String,
    pub status: DriveStatus,
    pub current_round: Option<String>,
    pub round_number: i64,
    pub total_rounds: i64,
    pub gform_link: Option<String>,
    pub gform_deadline: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedDrive {
    pub id: String,
    pub name: String,
    pub jd: String,
    pub final_list_name: Option<String>,
    pub final_list_url: Option<String>,
    pub selected_list_name: Option<String>,
    pub selected_list_url: Option<String>,
    pub selected_count: i64,
    pub spc_member_name: String,
    pub spc_member_phone: Option<String>,
    pub spc_member_email: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATE" => Some(AuditAction::Create),
            "UPDATE" => Some(AuditAction::Update),
            "DELETE" => Some(AuditAction::Delete),
            _ => None,
        }
    }
}

/// Append-only record of an admin mutation. `old_data` is present for
/// UPDATE/DELETE, `new_data` for CREATE/UPDATE.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,
    pub admin_id: String,
    pub action: AuditAction,
    pub table_name: String,
    pub record_id: String,
    pub old_data: Option<serde_json::Value>,
    pub new_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Display attribution for list endpoints: who created the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorInfo {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingCompanyWithAdmin {
    #[serde(flatten)]
    pub company: UpcomingCompany,
    pub admin: CreatorInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct OngoingDriveWithAdmin {
    #[serde(flatten)]
    pub drive: OngoingDrive,
    pub admin: CreatorInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletedDriveWithAdmin {
    #[serde(flatten)]
    pub drive: CompletedDrive,
    pub admin: CreatorInfo,
}
