//! Append-only audit trail for admin mutations.
//!
//! Every successful create/update/delete on an entity table produces exactly
//! one audit row with before/after snapshots. Snapshots are captured by the
//! caller at mutation time; a delete's old state no longer exists afterwards.

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::store::Store;
use crate::types::{AuditAction, AuditLog};

/// Appends one audit row for a committed admin mutation.
///
/// The entity mutation has already committed when this runs. A failed audit
/// write is logged at error level and not surfaced to the caller; the trail
/// is best-effort attribution, not a transactional ledger.
pub fn record(
    store: &dyn Store,
    admin_id: &str,
    action: AuditAction,
    table_name: &str,
    record_id: &str,
    old_data: Option<serde_json::Value>,
    new_data: Option<serde_json::Value>,
) {
    let entry = AuditLog {
        id: Uuid::new_v4().to_string(),
        admin_id: admin_id.to_string(),
        action,
        table_name: table_name.to_string(),
        record_id: record_id.to_string(),
        old_data,
        new_data,
        created_at: Utc::now(),
    };

    if let Err(e) = store.append_audit(&entry) {
        tracing::error!(
            "Failed to record {} audit entry for {}/{}: {e}",
            action.as_str(),
            table_name,
            record_id
        );
    }
}

/// Serializes a record into an audit snapshot.
pub fn snapshot<T: Serialize>(record: &T) -> Option<serde_json::Value> {
    match serde_json::to_value(record) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!("Failed to serialize audit snapshot: {e}");
            None
        }
    }
}
