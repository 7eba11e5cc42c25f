mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Admin operations
    fn create_admin(&self, admin: &Admin) -> Result<()>;
    fn get_admin(&self, id: &str) -> Result<Option<Admin>>;
    fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>>;
    fn has_admin(&self) -> Result<bool>;

    // Student session log (append-only)
    fn create_student_session(&self, session: &StudentSession) -> Result<()>;

    // Upcoming company operations
    fn create_upcoming(&self, company: &UpcomingCompany) -> Result<()>;
    fn get_upcoming(&self, id: &str) -> Result<Option<UpcomingCompany>>;
    fn list_upcoming(&self) -> Result<Vec<UpcomingCompanyWithAdmin>>;
    fn update_upcoming(&self, company: &UpcomingCompany) -> Result<()>;
    fn delete_upcoming(&self, id: &str) -> Result<bool>;

    // Ongoing drive operations
    fn create_ongoing(&self, drive: &OngoingDrive) -> Result<()>;
    fn get_ongoing(&self, id: &str) -> Result<Option<OngoingDrive>>;
    fn list_ongoing(&self) -> Result<Vec<OngoingDriveWithAdmin>>;
    fn update_ongoing(&self, drive: &OngoingDrive) -> Result<()>;
    fn delete_ongoing(&self, id: &str) -> Result<bool>;

    // Completed drive operations
    fn create_completed(&self, drive: &CompletedDrive) -> Result<()>;
    fn get_completed(&self, id: &str) -> Result<Option<CompletedDrive>>;
    fn list_completed(&self) -> Result<Vec<CompletedDriveWithAdmin>>;
    fn update_completed(&self, drive: &CompletedDrive) -> Result<()>;
    fn delete_completed(&self, id: &str) -> Result<bool>;

    // Audit trail (append-only)
    fn append_audit(&self, entry: &AuditLog) -> Result<()>;
    fn list_audit(&self, limit: i64) -> Result<Vec<AuditLog>>;
}
