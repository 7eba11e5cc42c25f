pub const SCHEMA: &str = r#"
-- Placement-cell administrators; seeded from the CLI, never via the API
CREATE TABLE IF NOT EXISTS spc_admins (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2id hash with embedded salt
    phone TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT DEFAULT (datetime('now'))
);

-- One row per student login; append-only, no account semantics
CREATE TABLE IF NOT EXISTS student_sessions (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    branch TEXT NOT NULL,
    google_email TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Companies expected to visit; listed by tentative date
CREATE TABLE IF NOT EXISTS upcoming_companies (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    tentative_date TEXT NOT NULL,
    info TEXT,
    attachment_name TEXT,
    attachment_url TEXT,
    created_by TEXT NOT NULL REFERENCES spc_admins(id),
    created_at TEXT DEFAULT (datetime('now'))
);

-- Drives in progress; status is 'gform' or 'round', both field families
-- persist regardless of the active status
CREATE TABLE IF NOT EXISTS ongoing_drives (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    jd TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('gform', 'round')),
    current_round TEXT,
    round_number INTEGER NOT NULL DEFAULT 0,
    total_rounds INTEGER NOT NULL DEFAULT 0,
    gform_link TEXT,
    gform_deadline TEXT,
    created_by TEXT NOT NULL REFERENCES spc_admins(id),
    created_at TEXT DEFAULT (datetime('now'))
);

-- Finished drives with outcomes
CREATE TABLE IF NOT EXISTS completed_drives (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    jd TEXT NOT NULL,
    final_list_name TEXT,
    final_list_url TEXT,
    selected_list_name TEXT,
    selected_list_url TEXT,
    selected_count INTEGER NOT NULL DEFAULT 0,
    spc_member_name TEXT NOT NULL,
    spc_member_phone TEXT,
    spc_member_email TEXT,
    created_by TEXT NOT NULL REFERENCES spc_admins(id),
    created_at TEXT DEFAULT (datetime('now'))
);

-- Append-only mutation trail; never updated or deleted
CREATE TABLE IF NOT EXISTS audit_logs (
    id TEXT PRIMARY KEY,
    admin_id TEXT NOT NULL REFERENCES spc_admins(id),
    action TEXT NOT NULL CHECK (action IN ('CREATE', 'UPDATE', 'DELETE')),
    table_name TEXT NOT NULL,
    record_id TEXT NOT NULL,
    old_data TEXT,   -- JSON snapshot before the mutation
    new_data TEXT,   -- JSON snapshot after the mutation
    created_at TEXT DEFAULT (datetime('now'))
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_upcoming_tentative_date ON upcoming_companies(tentative_date);
CREATE INDEX IF NOT EXISTS idx_ongoing_created_at ON ongoing_drives(created_at);
CREATE INDEX IF NOT EXISTS idx_completed_created_at ON completed_drives(created_at);
CREATE INDEX IF NOT EXISTS idx_audit_logs_table_record ON audit_logs(table_name, record_id);
CREATE INDEX IF NOT EXISTS idx_audit_logs_admin ON audit_logs(admin_id);
"#;
