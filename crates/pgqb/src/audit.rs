//! Audit-field stamping for INSERT and UPDATE statements.
//!
//! The statement builders never inject audit columns on their own. A call
//! site that wants stamping merges the audit columns into its column list
//! with [`add_audit_to_insert`] / [`add_audit_to_update`] and takes the
//! bound values from [`prepare_audit_fields`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::QbResult;
use crate::param::Param;
use crate::schema::Schema;

/// Values for a statement's audit columns.
///
/// Timestamps left unset are stamped with the current time when the
/// fields are prepared. Subjects are serialized to JSON up front and
/// bound as `jsonb` values.
#[derive(Debug, Clone, Default)]
pub struct AuditData {
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    created_by: Option<Value>,
    updated_by: Option<Value>,
}

impl AuditData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit creation time instead of the current time.
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Use an explicit update time instead of the current time.
    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Record who created the row.
    pub fn created_by<T: Serialize>(mut self, subject: &T) -> QbResult<Self> {
        self.created_by = Some(serde_json::to_value(subject)?);
        Ok(self)
    }

    /// Record who performed the update.
    pub fn updated_by<T: Serialize>(mut self, subject: &T) -> QbResult<Self> {
        self.updated_by = Some(serde_json::to_value(subject)?);
        Ok(self)
    }
}

/// Column/value pairs for a schema's audit fields.
///
/// An INSERT (`for_update == false`) stamps both the created and updated
/// pairs; an UPDATE stamps only the updated pair. Subject columns appear
/// only when [`AuditData`] carries a subject. Schemas without audit
/// fields produce an empty map.
pub fn prepare_audit_fields(
    schema: &Schema,
    data: &AuditData,
    for_update: bool,
) -> HashMap<String, Param> {
    let Some(audit) = schema.audit() else {
        return HashMap::new();
    };

    let mut values = HashMap::new();
    if !for_update {
        let at = data.created_at.unwrap_or_else(Utc::now);
        values.insert(audit.created_at.clone(), Param::new(at));
        if let Some(subject) = &data.created_by {
            values.insert(audit.created_by.clone(), Param::new(subject.clone()));
        }
    }
    let at = data.updated_at.unwrap_or_else(Utc::now);
    values.insert(audit.updated_at.clone(), Param::new(at));
    if let Some(subject) = &data.updated_by {
        values.insert(audit.updated_by.clone(), Param::new(subject.clone()));
    }
    values
}

/// Append the audit columns an INSERT will stamp to a column list,
/// skipping names already present. Appended order is created-at,
/// created-by, updated-at, updated-by.
pub fn add_audit_to_insert(schema: &Schema, columns: &[&str], data: &AuditData) -> Vec<String> {
    let mut merged: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    let Some(audit) = schema.audit() else {
        return merged;
    };
    push_missing(&mut merged, &audit.created_at);
    if data.created_by.is_some() {
        push_missing(&mut merged, &audit.created_by);
    }
    push_missing(&mut merged, &audit.updated_at);
    if data.updated_by.is_some() {
        push_missing(&mut merged, &audit.updated_by);
    }
    merged
}

/// Append the audit columns an UPDATE will stamp to a column list,
/// skipping names already present.
pub fn add_audit_to_update(schema: &Schema, columns: &[&str], data: &AuditData) -> Vec<String> {
    let mut merged: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    let Some(audit) = schema.audit() else {
        return merged;
    };
    push_missing(&mut merged, &audit.updated_at);
    if data.updated_by.is_some() {
        push_missing(&mut merged, &audit.updated_by);
    }
    merged
}

fn push_missing(columns: &mut Vec<String>, name: &str) {
    if !columns.iter().any(|c| c == name) {
        columns.push(name.to_string());
    }
}
