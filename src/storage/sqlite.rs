use std::path::{Path, PathBuf};

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::Connection;

use crate::error::{OpsdeckError, Result};
use crate::storage::service::{DataService, Row, RowValue};

const OPSDECK_DIR: &str = ".opsdeck";
const OPS_DB: &str = "ops.db";

/// Tables the service will touch. Names are interpolated into SQL, so
/// everything must come from this list; values are always bound.
const TABLES: &[&str] = &[
    "employees",
    "documents",
    "document_shares",
    "tasks",
    "task_assignments",
    "tickets",
    "ticket_history",
    "ticket_chat",
    "subscriptions",
];

/// SQLite-backed implementation of the data service.
pub struct SqliteService {
    conn: Connection,
    ops_dir: PathBuf,
}

impl SqliteService {
    /// Create the workspace directory and database.
    pub fn init(root: &Path) -> Result<Self> {
        let ops_dir = root.join(OPSDECK_DIR);
        if ops_dir.exists() {
            return Err(OpsdeckError::AlreadyInitialized);
        }
        std::fs::create_dir_all(&ops_dir)?;

        let conn = Connection::open(ops_dir.join(OPS_DB))?;
        let service = Self { conn, ops_dir };
        service.init_schema()?;
        Ok(service)
    }

    /// Open an existing workspace database.
    pub fn open(root: &Path) -> Result<Self> {
        let ops_dir = root.join(OPSDECK_DIR);
        let db = ops_dir.join(OPS_DB);
        if !db.exists() {
            return Err(OpsdeckError::NotInitialized);
        }
        let conn = Connection::open(db)?;
        let service = Self { conn, ops_dir };
        service.init_schema()?;
        Ok(service)
    }

    /// The workspace directory, also the object-store root.
    pub fn ops_dir(&self) -> &Path {
        &self.ops_dir
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS employees (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                department TEXT NOT NULL,
                role TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                category TEXT NOT NULL,
                file_url TEXT,
                uploaded_by TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS document_shares (
                id TEXT PRIMARY KEY,
                document_id TEXT NOT NULL,
                employee_id TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_shares_document
                ON document_shares(document_id);
            CREATE INDEX IF NOT EXISTS idx_shares_employee
                ON document_shares(employee_id);

            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL,
                priority TEXT NOT NULL,
                due_date TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS task_assignments (
                id TEXT PRIMARY KEY,
                task_id TEXT NOT NULL,
                employee_id TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_assignments_task
                ON task_assignments(task_id);
            CREATE INDEX IF NOT EXISTS idx_assignments_employee
                ON task_assignments(employee_id);

            CREATE TABLE IF NOT EXISTS tickets (
                id TEXT PRIMARY KEY,
                issue TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL,
                priority TEXT NOT NULL,
                category TEXT NOT NULL,
                company TEXT,
                client_name TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS ticket_history (
                id TEXT PRIMARY KEY,
                ticket_id TEXT NOT NULL,
                note TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_history_ticket
                ON ticket_history(ticket_id);

            CREATE TABLE IF NOT EXISTS ticket_chat (
                id TEXT PRIMARY KEY,
                ticket_id TEXT NOT NULL,
                author TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_chat_ticket
                ON ticket_chat(ticket_id);

            CREATE TABLE IF NOT EXISTS subscriptions (
                id TEXT PRIMARY KEY,
                service TEXT NOT NULL,
                vendor TEXT NOT NULL,
                status TEXT NOT NULL,
                cost_cents INTEGER NOT NULL DEFAULT 0,
                expiry_date TEXT,
                account_email TEXT,
                created_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }
}

fn check_table(table: &str) -> Result<()> {
    if TABLES.contains(&table) {
        return Ok(());
    }
    Err(OpsdeckError::Service(format!("unknown table: {}", table)))
}

fn check_column(column: &str) -> Result<()> {
    let ok = !column.is_empty()
        && column
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        return Ok(());
    }
    Err(OpsdeckError::Service(format!("invalid column: {}", column)))
}

fn to_sql_value(value: &RowValue) -> SqlValue {
    match value {
        RowValue::Null => SqlValue::Null,
        RowValue::Integer(n) => SqlValue::Integer(*n),
        RowValue::Text(s) => SqlValue::Text(s.clone()),
    }
}

fn from_sql_value(value: ValueRef<'_>) -> RowValue {
    match value {
        ValueRef::Null => RowValue::Null,
        ValueRef::Integer(n) => RowValue::Integer(n),
        ValueRef::Text(t) => RowValue::Text(String::from_utf8_lossy(t).into_owned()),
        // The schema declares no real or blob columns.
        _ => RowValue::Null,
    }
}

fn read_rows(stmt: &mut rusqlite::Statement<'_>, params: &[SqlValue]) -> Result<Vec<Row>> {
    let names: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut mapped = Row::new();
        for (index, name) in names.iter().enumerate() {
            mapped.insert(name.clone(), from_sql_value(row.get_ref(index)?));
        }
        out.push(mapped);
    }
    Ok(out)
}

impl DataService for SqliteService {
    fn fetch_all(&self, table: &str, order_by: &str) -> Result<Vec<Row>> {
        check_table(table)?;
        check_column(order_by)?;
        let sql = format!("SELECT * FROM {} ORDER BY {} DESC", table, order_by);
        let mut stmt = self.conn.prepare(&sql)?;
        read_rows(&mut stmt, &[])
    }

    fn insert(&self, table: &str, row: &Row) -> Result<()> {
        check_table(table)?;
        let mut columns = Vec::with_capacity(row.len());
        let mut placeholders = Vec::with_capacity(row.len());
        let mut params = Vec::with_capacity(row.len());
        for (index, (column, value)) in row.iter().enumerate() {
            check_column(column)?;
            columns.push(column.as_str());
            placeholders.push(format!("?{}", index + 1));
            params.push(to_sql_value(value));
        }
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        );
        self.conn
            .execute(&sql, rusqlite::params_from_iter(params.iter()))?;
        Ok(())
    }

    fn update(&self, table: &str, id: &str, changes: &Row) -> Result<()> {
        check_table(table)?;
        if changes.is_empty() {
            return Ok(());
        }
        let mut assignments = Vec::with_capacity(changes.len());
        let mut params = Vec::with_capacity(changes.len() + 1);
        for (index, (column, value)) in changes.iter().enumerate() {
            check_column(column)?;
            assignments.push(format!("{} = ?{}", column, index + 1));
            params.push(to_sql_value(value));
        }
        params.push(SqlValue::Text(id.to_string()));
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            table,
            assignments.join(", "),
            changes.len() + 1
        );
        let affected = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(params.iter()))?;
        if affected == 0 {
            return Err(OpsdeckError::RecordNotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete(&self, table: &str, id: &str) -> Result<()> {
        check_table(table)?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", table);
        let affected = self.conn.execute(&sql, [id])?;
        if affected == 0 {
            return Err(OpsdeckError::RecordNotFound(id.to_string()));
        }
        Ok(())
    }

    fn select_in(&self, table: &str, column: &str, values: &[String]) -> Result<Vec<Row>> {
        check_table(table)?;
        check_column(column)?;
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders: Vec<String> =
            (1..=values.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "SELECT * FROM {} WHERE {} IN ({})",
            table,
            column,
            placeholders.join(", ")
        );
        let params: Vec<SqlValue> = values
            .iter()
            .map(|v| SqlValue::Text(v.clone()))
            .collect();
        let mut stmt = self.conn.prepare(&sql)?;
        read_rows(&mut stmt, &params)
    }
}
