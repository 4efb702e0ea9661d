//! SQLite-backed record store.
//!
//! # Responsibility
//! - Serve every remote collection from one JSON document table.
//! - Emulate server-side behavior: id assignment, `createdAt` stamping and
//!   read-after-write responses.
//!
//! # Invariants
//! - `id` and `createdAt` of a stored record never change on update.
//! - Blocking SQLite calls run on the blocking thread pool, never on the
//!   async executor.

use super::{
    validate_field_name, FieldFilter, OrderBy, RecordStore, RemoteError, RemoteResult,
    SortDirection,
};
use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use async_trait::async_trait;
use chrono::Utc;
use log::info;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const CREATED_AT_FIELD: &str = "createdAt";
const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Record store over the migrated `records` table.
#[derive(Clone)]
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        let conn = open_db(path)?;
        info!(
            "event=record_store_open module=remote status=ok path={}",
            path.display()
        );
        Ok(Self::new(conn))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    async fn with_conn<T, F>(&self, op: &'static str, work: F) -> RemoteResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> RemoteResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| DbError::ConnectionPoisoned)?;
            work(&mut guard)
        })
        .await
        .map_err(|err| RemoteError::Transport(format!("{op} worker failed: {err}")))?
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn select(
        &self,
        table: &str,
        filter: Option<&FieldFilter>,
        order: &OrderBy,
    ) -> RemoteResult<Vec<Value>> {
        let sql = select_sql(filter, order)?;
        let mut bind_values = vec![SqlValue::Text(table.to_string())];
        if let Some(filter) = filter {
            bind_values.push(SqlValue::Text(filter.value.clone()));
        }

        self.with_conn("select", move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                let body: String = row.get(0)?;
                records.push(serde_json::from_str(&body)?);
            }
            Ok(records)
        })
        .await
    }

    async fn insert(&self, table: &str, record: Value) -> RemoteResult<Value> {
        let mut object = into_object(record)?;
        let id = match object.get("id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        object.insert("id".to_string(), Value::String(id.clone()));
        if object.get(CREATED_AT_FIELD).map_or(true, Value::is_null) {
            object.insert(
                CREATED_AT_FIELD.to_string(),
                Value::String(Utc::now().format(CREATED_AT_FORMAT).to_string()),
            );
        }
        let body = serde_json::to_string(&Value::Object(object))?;
        let table = table.to_string();

        self.with_conn("insert", move |conn| {
            let inserted = conn.execute(
                "INSERT INTO records (collection, id, body) VALUES (?1, ?2, ?3);",
                params![table, id, body],
            );
            match inserted {
                Ok(_) => read_back(conn, &table, &id),
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    Err(RemoteError::Conflict { table, id })
                }
                Err(err) => Err(err.into()),
            }
        })
        .await
    }

    async fn update(&self, table: &str, id: &str, partial: Value) -> RemoteResult<Value> {
        let patch = serde_json::to_string(&Value::Object(into_object(partial)?))?;
        let table = table.to_string();
        let id = id.to_string();

        self.with_conn("update", move |conn| {
            let changed = conn.execute(
                "UPDATE records
                 SET body = json_set(
                     json_patch(body, ?1),
                     '$.id', ?3,
                     '$.createdAt', json_extract(body, '$.createdAt')
                 )
                 WHERE collection = ?2 AND id = ?3;",
                params![patch, table, id],
            )?;
            if changed == 0 {
                return Err(RemoteError::NotFound { table, id });
            }
            read_back(conn, &table, &id)
        })
        .await
    }

    async fn delete(&self, table: &str, id: &str) -> RemoteResult<()> {
        let table = table.to_string();
        let id = id.to_string();

        self.with_conn("delete", move |conn| {
            conn.execute(
                "DELETE FROM records WHERE collection = ?1 AND id = ?2;",
                params![table, id],
            )?;
            Ok(())
        })
        .await
    }
}

/// Builds the `select` statement; binds are `collection` then the filter value.
///
/// Field paths are inlined as literals so `json_extract` terms match the
/// expression indexes from migration 0002.
fn select_sql(filter: Option<&FieldFilter>, order: &OrderBy) -> RemoteResult<String> {
    let mut sql = String::from("SELECT body FROM records WHERE collection = ?1");
    if let Some(filter) = filter {
        sql.push_str(&format!(" AND {} = ?2", json_field(&filter.field)?));
    }

    let direction = match order.direction {
        SortDirection::Ascending => "ASC",
        SortDirection::Descending => "DESC",
    };
    sql.push_str(&format!(
        " ORDER BY {} {direction}, seq {direction}",
        json_field(&order.field)?
    ));
    Ok(sql)
}

fn json_field(field: &str) -> RemoteResult<String> {
    // Only identifiers reach the SQL text.
    validate_field_name(field)?;
    Ok(format!("json_extract(body, '$.{field}')"))
}

fn into_object(record: Value) -> RemoteResult<Map<String, Value>> {
    match record {
        Value::Object(object) => Ok(object),
        other => Err(RemoteError::InvalidRecord(format!(
            "expected a JSON object, got `{other}`"
        ))),
    }
}

fn read_back(conn: &Connection, table: &str, id: &str) -> RemoteResult<Value> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM records WHERE collection = ?1 AND id = ?2;",
            params![table, id],
            |row| row.get(0),
        )
        .optional()?;

    match body {
        Some(body) => Ok(serde_json::from_str(&body)?),
        None => Err(RemoteError::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::select_sql;
    use crate::db::open_db_in_memory;
    use crate::remote::{FieldFilter, OrderBy, RemoteError};
    use rusqlite::{params_from_iter, Connection};

    fn query_plan(conn: &Connection, sql: &str, binds: &[&str]) -> String {
        let mut stmt = conn.prepare(&format!("EXPLAIN QUERY PLAN {sql}")).unwrap();
        let details: Vec<String> = stmt
            .query_map(params_from_iter(binds.iter()), |row| row.get(3))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        details.join("\n")
    }

    #[test]
    fn calendar_fetch_uses_the_date_index() {
        let conn = open_db_in_memory().unwrap();
        let sql = select_sql(None, &OrderBy::ascending("date")).unwrap();

        let plan = query_plan(&conn, &sql, &["appointments"]);
        assert!(plan.contains("idx_records_date"), "{plan}");
    }

    #[test]
    fn note_lookup_uses_the_appointment_id_index() {
        let conn = open_db_in_memory().unwrap();
        let filter = FieldFilter::eq("appointmentId", "appt-1");
        let sql = select_sql(Some(&filter), &OrderBy::descending("createdAt")).unwrap();

        let plan = query_plan(&conn, &sql, &["consultation_notes", "appt-1"]);
        assert!(plan.contains("idx_records_appointment_id"), "{plan}");
    }

    #[test]
    fn unsafe_field_names_never_reach_sql() {
        let filter = FieldFilter::eq("id') OR 1=1 --", "x");
        assert!(matches!(
            select_sql(Some(&filter), &OrderBy::ascending("date")),
            Err(RemoteError::InvalidField(_))
        ));
        assert!(matches!(
            select_sql(None, &OrderBy::ascending("$.date")),
            Err(RemoteError::InvalidField(_))
        ));
    }
}
