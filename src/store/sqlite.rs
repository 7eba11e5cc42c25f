use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn conversion_err(
    idx: usize,
    message: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, message.into())
}

fn parse_status(idx: usize, raw: &str) -> rusqlite::Result<DriveStatus> {
    DriveStatus::parse(raw).ok_or_else(|| conversion_err(idx, format!("invalid drive status: {raw}")))
}

fn parse_json_column(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<serde_json::Value>> {
    match raw {
        Some(s) => serde_json::from_str(&s)
            .map(Some)
            .map_err(|e| conversion_err(idx, Box::new(e))),
        None => Ok(None),
    }
}

fn admin_from_row(row: &Row<'_>) -> rusqlite::Result<Admin> {
    Ok(Admin {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        phone: row.get(4)?,
        is_active: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn upcoming_from_row(row: &Row<'_>) -> rusqlite::Result<UpcomingCompany> {
    Ok(UpcomingCompany {
        id: row.get(0)?,
        name: row.get(1)?,
        tentative_date: parse_datetime(&row.get::<_, String>(2)?),
        info: row.get(3)?,
        attachment_name: row.get(4)?,
        attachment_url: row.get(5)?,
        created_by: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

fn ongoing_from_row(row: &Row<'_>) -> rusqlite::Result<OngoingDrive> {
    let status: String = row.get(3)?;
    Ok(OngoingDrive {
        id: row.get(0)?,
        name: row.get(1)?,
        jd: row.get(2)?,
        status: parse_status(3, &status)?,
        current_round: row.get(4)?,
        round_number: row.get(5)?,
        total_rounds: row.get(6)?,
        gform_link: row.get(7)?,
        gform_deadline: row
            .get::<_, Option<String>>(8)?
            .map(|s| parse_datetime(&s)),
        created_by: row.get(9)?,
        created_at: parse_datetime(&row.get::<_, String>(10)?),
    })
}

fn completed_from_row(row: &Row<'_>) -> rusqlite::Result<CompletedDrive> {
    Ok(CompletedDrive {
        id: row.get(0)?,
        name: row.get(1)?,
        jd: row.get(2)?,
        final_list_name: row.get(3)?,
        final_list_url: row.get(4)?,
        selected_list_name: row.get(5)?,
        selected_list_url: row.get(6)?,
        selected_count: row.get(7)?,
        spc_member_name: row.get(8)?,
        spc_member_phone: row.get(9)?,
        spc_member_email: row.get(10)?,
        created_by: row.get(11)?,
        created_at: parse_datetime(&row.get::<_, String>(12)?),
    })
}

fn audit_from_row(row: &Row<'_>) -> rusqlite::Result<AuditLog> {
    let action: String = row.get(2)?;
    Ok(AuditLog {
        id: row.get(0)?,
        admin_id: row.get(1)?,
        action: AuditAction::parse(&action)
            .ok_or_else(|| conversion_err(2, format!("invalid audit action: {action}")))?,
        table_name: row.get(3)?,
        record_id: row.get(4)?,
        old_data: parse_json_column(5, row.get(5)?)?,
        new_data: parse_json_column(6, row.get(6)?)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

fn creator_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<CreatorInfo> {
    Ok(CreatorInfo {
        name: row.get(offset)?,
        email: row.get(offset + 1)?,
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Admin operations

    fn create_admin(&self, admin: &Admin) -> Result<()> {
        self.conn().execute(
            "INSERT INTO spc_admins (id, name, email, password_hash, phone, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                admin.id,
                admin.name,
                admin.email,
                admin.password_hash,
                admin.phone,
                admin.is_active,
                format_datetime(&admin.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_admin(&self, id: &str) -> Result<Option<Admin>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, email, password_hash, phone, is_active, created_at
             FROM spc_admins WHERE id = ?1",
            params![id],
            admin_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, email, password_hash, phone, is_active, created_at
             FROM spc_admins WHERE email = ?1",
            params![email],
            admin_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn has_admin(&self) -> Result<bool> {
        let conn = self.conn();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM spc_admins", [], |row| row.get(0))?;
        Ok(count > 0)
    }

    // Student session log

    fn create_student_session(&self, session: &StudentSession) -> Result<()> {
        self.conn().execute(
            "INSERT INTO student_sessions (id, name, branch, google_email, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session.id,
                session.name,
                session.branch,
                session.google_email,
                format_datetime(&session.created_at),
            ],
        )?;
        Ok(())
    }

    // Upcoming company operations

    fn create_upcoming(&self, company: &UpcomingCompany) -> Result<()> {
        self.conn().execute(
            "INSERT INTO upcoming_companies
             (id, name, tentative_date, info, attachment_name, attachment_url, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                company.id,
                company.name,
                format_datetime(&company.tentative_date),
                company.info,
                company.attachment_name,
                company.attachment_url,
                company.created_by,
                format_datetime(&company.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_upcoming(&self, id: &str) -> Result<Option<UpcomingCompany>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, tentative_date, info, attachment_name, attachment_url, created_by, created_at
             FROM upcoming_companies WHERE id = ?1",
            params![id],
            upcoming_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_upcoming(&self) -> Result<Vec<UpcomingCompanyWithAdmin>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT u.id, u.name, u.tentative_date, u.info, u.attachment_name, u.attachment_url,
                    u.created_by, u.created_at, a.name, a.email
             FROM upcoming_companies u
             JOIN spc_admins a ON a.id = u.created_by
             ORDER BY u.tentative_date ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(UpcomingCompanyWithAdmin {
                company: upcoming_from_row(row)?,
                admin: creator_from_row(row, 8)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_upcoming(&self, company: &UpcomingCompany) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE upcoming_companies
             SET name = ?1, tentative_date = ?2, info = ?3, attachment_name = ?4, attachment_url = ?5
             WHERE id = ?6",
            params![
                company.name,
                format_datetime(&company.tentative_date),
                company.info,
                company.attachment_name,
                company.attachment_url,
                company.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_upcoming(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM upcoming_companies WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Ongoing drive operations

    fn create_ongoing(&self, drive: &OngoingDrive) -> Result<()> {
        self.conn().execute(
            "INSERT INTO ongoing_drives
             (id, name, jd, status, current_round, round_number, total_rounds,
              gform_link, gform_deadline, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                drive.id,
                drive.name,
                drive.jd,
                drive.status.as_str(),
                drive.current_round,
                drive.round_number,
                drive.total_rounds,
                drive.gform_link,
                drive.gform_deadline.as_ref().map(format_datetime),
                drive.created_by,
                format_datetime(&drive.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_ongoing(&self, id: &str) -> Result<Option<OngoingDrive>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, jd, status, current_round, round_number, total_rounds,
                    gform_link, gform_deadline, created_by, created_at
             FROM ongoing_drives WHERE id = ?1",
            params![id],
            ongoing_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_ongoing(&self) -> Result<Vec<OngoingDriveWithAdmin>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT d.id, d.name, d.jd, d.status, d.current_round, d.round_number, d.total_rounds,
                    d.gform_link, d.gform_deadline, d.created_by, d.created_at, a.name, a.email
             FROM ongoing_drives d
             JOIN spc_admins a ON a.id = d.created_by
             ORDER BY d.created_at DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(OngoingDriveWithAdmin {
                drive: ongoing_from_row(row)?,
                admin: creator_from_row(row, 11)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_ongoing(&self, drive: &OngoingDrive) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE ongoing_drives
             SET name = ?1, jd = ?2, status = ?3, current_round = ?4, round_number = ?5,
                 total_rounds = ?6, gform_link = ?7, gform_deadline = ?8
             WHERE id = ?9",
            params![
                drive.name,
                drive.jd,
                drive.status.as_str(),
                drive.current_round,
                drive.round_number,
                drive.total_rounds,
                drive.gform_link,
                drive.gform_deadline.as_ref().map(format_datetime),
                drive.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_ongoing(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM ongoing_drives WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Completed drive operations

    fn create_completed(&self, drive: &CompletedDrive) -> Result<()> {
        self.conn().execute(
            "INSERT INTO completed_drives
             (id, name, jd, final_list_name, final_list_url, selected_list_name, selected_list_url,
              selected_count, spc_member_name, spc_member_phone, spc_member_email, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                drive.id,
                drive.name,
                drive.jd,
                drive.final_list_name,
                drive.final_list_url,
                drive.selected_list_name,
                drive.selected_list_url,
                drive.selected_count,
                drive.spc_member_name,
                drive.spc_member_phone,
                drive.spc_member_email,
                drive.created_by,
                format_datetime(&drive.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_completed(&self, id: &str) -> Result<Option<CompletedDrive>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, jd, final_list_name, final_list_url, selected_list_name,
                    selected_list_url, selected_count, spc_member_name, spc_member_phone,
                    spc_member_email, created_by, created_at
             FROM completed_drives WHERE id = ?1",
            params![id],
            completed_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_completed(&self) -> Result<Vec<CompletedDriveWithAdmin>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT d.id, d.name, d.jd, d.final_list_name, d.final_list_url, d.selected_list_name,
                    d.selected_list_url, d.selected_count, d.spc_member_name, d.spc_member_phone,
                    d.spc_member_email, d.created_by, d.created_at, a.name, a.email
             FROM completed_drives d
             JOIN spc_admins a ON a.id = d.created_by
             ORDER BY d.created_at DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(CompletedDriveWithAdmin {
                drive: completed_from_row(row)?,
                admin: creator_from_row(row, 13)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_completed(&self, drive: &CompletedDrive) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE completed_drives
             SET name = ?1, jd = ?2, final_list_name = ?3, final_list_url = ?4,
                 selected_list_name = ?5, selected_list_url = ?6, selected_count = ?7,
                 spc_member_name = ?8, spc_member_phone = ?9, spc_member_email = ?10
             WHERE id = ?11",
            params![
                drive.name,
                drive.jd,
                drive.final_list_name,
                drive.final_list_url,
                drive.selected_list_name,
                drive.selected_list_url,
                drive.selected_count,
                drive.spc_member_name,
                drive.spc_member_phone,
                drive.spc_member_email,
                drive.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_completed(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM completed_drives WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Audit trail

    fn append_audit(&self, entry: &AuditLog) -> Result<()> {
        self.conn().execute(
            "INSERT INTO audit_logs
             (id, admin_id, action, table_name, record_id, old_data, new_data, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entry.id,
                entry.admin_id,
                entry.action.as_str(),
                entry.table_name,
                entry.record_id,
                entry.old_data.as_ref().map(|v| v.to_string()),
                entry.new_data.as_ref().map(|v| v.to_string()),
                format_datetime(&entry.created_at),
            ],
        )?;
        Ok(())
    }

    fn list_audit(&self, limit: i64) -> Result<Vec<AuditLog>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, admin_id, action, table_name, record_id, old_data, new_data, created_at
             FROM audit_logs ORDER BY created_at DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], audit_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}
