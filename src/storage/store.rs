//! Domain operations over the row-oriented data service.
//!
//! Loads do the bulk fetch plus the related lookups each screen needs,
//! folding the results into denormalized fields. The primary query
//! failing aborts the load; a lookup failing only degrades it. Writes
//! compose cascade deletes and compensating rollbacks out of the five
//! service operations, child rows always going before their parent.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::entity::{
    Department, Document, DocumentCategory, Employee, Priority, RecordKind, Subscription,
    SubscriptionStatus, Task, TaskStatus, Ticket, TicketCategory, TicketMessage, TicketNote,
    TicketStatus,
};
use crate::error::{OpsdeckError, Result};
use crate::storage::service::{text_column, DataService, Row, RowValue};
use crate::warnings::LoadWarning;

/// A loaded snapshot plus any non-fatal problems hit along the way.
#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub warnings: Vec<LoadWarning>,
}

/// Partial update for an employee. `None` leaves the field untouched.
#[derive(Default)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<Department>,
    pub role: Option<String>,
}

/// Partial update for a document.
#[derive(Default)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<DocumentCategory>,
    pub file_url: Option<Option<String>>, // Some(None) to clear
}

/// Partial update for a task.
#[derive(Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>, // Some(None) to clear
}

/// Partial update for a ticket.
#[derive(Default)]
pub struct TicketUpdate {
    pub issue: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
    pub category: Option<TicketCategory>,
    pub company: Option<String>,
    pub client_name: Option<String>,
}

/// Partial update for a subscription.
#[derive(Default)]
pub struct SubscriptionUpdate {
    pub service: Option<String>,
    pub vendor: Option<String>,
    pub status: Option<SubscriptionStatus>,
    pub cost_cents: Option<i64>,
    pub expiry_date: Option<Option<NaiveDate>>, // Some(None) to clear
    pub account_email: Option<Option<String>>,  // Some(None) to clear
}

pub struct OpsStore<'a> {
    svc: &'a dyn DataService,
}

impl<'a> OpsStore<'a> {
    pub fn new(svc: &'a dyn DataService) -> Self {
        Self { svc }
    }

    // ---- loads ----

    pub fn load_employees(&self) -> Result<Loaded<Employee>> {
        let rows = self.svc.fetch_all("employees", "created_at")?;
        let mut warnings = Vec::new();
        let records = rows
            .iter()
            .map(|r| Employee::from_row(r, &mut warnings))
            .collect::<Result<Vec<_>>>()?;
        Ok(Loaded { records, warnings })
    }

    pub fn load_tasks(&self) -> Result<Loaded<Task>> {
        let rows = self.svc.fetch_all("tasks", "created_at")?;
        let mut warnings = Vec::new();
        let mut records = rows
            .iter()
            .map(|r| Task::from_row(r, &mut warnings))
            .collect::<Result<Vec<_>>>()?;

        let ids: Vec<String> = records.iter().map(|t| t.id.to_string()).collect();
        match self.svc.select_in("task_assignments", "task_id", &ids) {
            Ok(assignment_rows) => {
                let names = self.employee_names(&mut warnings);
                for row in &assignment_rows {
                    let Some(task_id) = text_column(row, "task_id") else {
                        continue;
                    };
                    let Some(employee_id) = text_column(row, "employee_id") else {
                        continue;
                    };
                    if let Some(task) =
                        records.iter_mut().find(|t| t.id.to_string() == task_id)
                    {
                        if let Ok(parsed) = employee_id.parse() {
                            task.assignee_ids.push(parsed);
                        }
                        if let Some(name) = names.get(&employee_id) {
                            task.assignee_names.push(name.clone());
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "task assignment lookup failed");
                warnings.push(LoadWarning::MissingRelation {
                    table: "task_assignments".to_string(),
                    detail: e.to_string(),
                });
            }
        }

        Ok(Loaded { records, warnings })
    }

    pub fn load_documents(&self) -> Result<Loaded<Document>> {
        let rows = self.svc.fetch_all("documents", "created_at")?;
        let mut warnings = Vec::new();
        let mut records = rows
            .iter()
            .map(|r| Document::from_row(r, &mut warnings))
            .collect::<Result<Vec<_>>>()?;

        let names = self.employee_names(&mut warnings);
        for doc in &mut records {
            doc.uploaded_by_name = doc
                .uploaded_by
                .and_then(|id| names.get(&id.to_string()).cloned());
        }

        let ids: Vec<String> = records.iter().map(|d| d.id.to_string()).collect();
        match self.svc.select_in("document_shares", "document_id", &ids) {
            Ok(share_rows) => {
                for row in &share_rows {
                    let Some(document_id) = text_column(row, "document_id") else {
                        continue;
                    };
                    let Some(employee_id) = text_column(row, "employee_id") else {
                        continue;
                    };
                    if let Some(doc) =
                        records.iter_mut().find(|d| d.id.to_string() == document_id)
                    {
                        if let Some(name) = names.get(&employee_id) {
                            doc.shared_with.push(name.clone());
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "document share lookup failed");
                warnings.push(LoadWarning::MissingRelation {
                    table: "document_shares".to_string(),
                    detail: e.to_string(),
                });
            }
        }

        Ok(Loaded { records, warnings })
    }

    pub fn load_tickets(&self) -> Result<Loaded<Ticket>> {
        let rows = self.svc.fetch_all("tickets", "created_at")?;
        let mut warnings = Vec::new();
        let records = rows
            .iter()
            .map(|r| Ticket::from_row(r, &mut warnings))
            .collect::<Result<Vec<_>>>()?;
        Ok(Loaded { records, warnings })
    }

    pub fn load_subscriptions(&self) -> Result<Loaded<Subscription>> {
        let rows = self.svc.fetch_all("subscriptions", "created_at")?;
        let mut warnings = Vec::new();
        let records = rows
            .iter()
            .map(|r| Subscription::from_row(r, &mut warnings))
            .collect::<Result<Vec<_>>>()?;
        Ok(Loaded { records, warnings })
    }

    pub fn load_ticket_history(&self, ticket_id: Uuid) -> Result<Vec<TicketNote>> {
        let rows =
            self.svc
                .select_in("ticket_history", "ticket_id", &[ticket_id.to_string()])?;
        let mut warnings = Vec::new();
        let mut notes = rows
            .iter()
            .map(|r| TicketNote::from_row(r, &mut warnings))
            .collect::<Result<Vec<_>>>()?;
        notes.sort_by_key(|n| n.created_at);
        Ok(notes)
    }

    pub fn load_ticket_chat(&self, ticket_id: Uuid) -> Result<Vec<TicketMessage>> {
        let rows = self
            .svc
            .select_in("ticket_chat", "ticket_id", &[ticket_id.to_string()])?;
        let mut warnings = Vec::new();
        let mut messages = rows
            .iter()
            .map(|r| TicketMessage::from_row(r, &mut warnings))
            .collect::<Result<Vec<_>>>()?;
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    /// Employee id to display name, degrading to an empty map when the
    /// lookup itself fails.
    fn employee_names(&self, warnings: &mut Vec<LoadWarning>) -> HashMap<String, String> {
        match self.svc.fetch_all("employees", "created_at") {
            Ok(rows) => rows
                .iter()
                .filter_map(|row| {
                    Some((text_column(row, "id")?, text_column(row, "name")?))
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "employee name lookup failed");
                warnings.push(LoadWarning::MissingRelation {
                    table: "employees".to_string(),
                    detail: e.to_string(),
                });
                HashMap::new()
            }
        }
    }

    // ---- getters ----

    pub fn get_employee(&self, id: Uuid) -> Result<Employee> {
        let rows = self
            .svc
            .select_in("employees", "id", &[id.to_string()])?;
        let row = rows
            .first()
            .ok_or_else(|| OpsdeckError::RecordNotFound(id.to_string()))?;
        Employee::from_row(row, &mut Vec::new())
    }

    pub fn get_document(&self, id: Uuid) -> Result<Document> {
        let rows = self
            .svc
            .select_in("documents", "id", &[id.to_string()])?;
        let row = rows
            .first()
            .ok_or_else(|| OpsdeckError::RecordNotFound(id.to_string()))?;
        let mut warnings = Vec::new();
        let mut document = Document::from_row(row, &mut warnings)?;

        let names = self.employee_names(&mut warnings);
        document.uploaded_by_name = document
            .uploaded_by
            .and_then(|id| names.get(&id.to_string()).cloned());

        let share_rows =
            self.svc
                .select_in("document_shares", "document_id", &[id.to_string()])?;
        for row in &share_rows {
            if let Some(employee_id) = text_column(row, "employee_id") {
                if let Some(name) = names.get(&employee_id) {
                    document.shared_with.push(name.clone());
                }
            }
        }

        Ok(document)
    }

    pub fn get_task(&self, id: Uuid) -> Result<Task> {
        let rows = self.svc.select_in("tasks", "id", &[id.to_string()])?;
        let row = rows
            .first()
            .ok_or_else(|| OpsdeckError::RecordNotFound(id.to_string()))?;
        let mut warnings = Vec::new();
        let mut task = Task::from_row(row, &mut warnings)?;

        let names = self.employee_names(&mut warnings);
        let assignment_rows =
            self.svc
                .select_in("task_assignments", "task_id", &[id.to_string()])?;
        for row in &assignment_rows {
            let Some(employee_id) = text_column(row, "employee_id") else {
                continue;
            };
            if let Ok(parsed) = employee_id.parse() {
                task.assignee_ids.push(parsed);
            }
            if let Some(name) = names.get(&employee_id) {
                task.assignee_names.push(name.clone());
            }
        }

        Ok(task)
    }

    pub fn get_ticket(&self, id: Uuid) -> Result<Ticket> {
        let rows = self.svc.select_in("tickets", "id", &[id.to_string()])?;
        let row = rows
            .first()
            .ok_or_else(|| OpsdeckError::RecordNotFound(id.to_string()))?;
        Ticket::from_row(row, &mut Vec::new())
    }

    pub fn get_subscription(&self, id: Uuid) -> Result<Subscription> {
        let rows = self
            .svc
            .select_in("subscriptions", "id", &[id.to_string()])?;
        let row = rows
            .first()
            .ok_or_else(|| OpsdeckError::RecordNotFound(id.to_string()))?;
        Subscription::from_row(row, &mut Vec::new())
    }

    /// Resolve a full id or an unambiguous prefix against one table.
    pub fn resolve_id(&self, kind: RecordKind, prefix: &str) -> Result<Uuid> {
        if let Ok(id) = prefix.parse() {
            return Ok(id);
        }
        let rows = self.svc.fetch_all(kind.table(), "created_at")?;
        let matches: Vec<String> = rows
            .iter()
            .filter_map(|row| text_column(row, "id"))
            .filter(|id| id.starts_with(prefix))
            .collect();
        match matches.as_slice() {
            [] => Err(OpsdeckError::RecordNotFound(prefix.to_string())),
            [only] => only
                .parse()
                .map_err(|_| OpsdeckError::RecordNotFound(prefix.to_string())),
            _ => Err(OpsdeckError::Validation(format!(
                "id prefix '{}' is ambiguous ({} matches)",
                prefix,
                matches.len()
            ))),
        }
    }

    // ---- creates ----

    pub fn create_employee(&self, employee: &Employee) -> Result<()> {
        self.svc.insert("employees", &employee.to_row())
    }

    pub fn create_document(&self, document: &Document) -> Result<()> {
        self.svc.insert("documents", &document.to_row())
    }

    pub fn create_ticket(&self, ticket: &Ticket) -> Result<()> {
        self.svc.insert("tickets", &ticket.to_row())
    }

    pub fn create_subscription(&self, subscription: &Subscription) -> Result<()> {
        self.svc.insert("subscriptions", &subscription.to_row())
    }

    /// Insert the task and its assignment rows. If a child insert fails
    /// after the parent went in, the already-written rows are deleted so
    /// no orphaned parent survives the failure.
    pub fn create_task(&self, task: &Task, assignees: &[Uuid]) -> Result<()> {
        self.require_employees(assignees)?;

        self.svc.insert("tasks", &task.to_row())?;
        let mut inserted: Vec<String> = Vec::new();
        for employee_id in assignees {
            let row = assignment_row(task.id, *employee_id);
            let row_id = text_column(&row, "id").unwrap_or_default();
            if let Err(e) = self.svc.insert("task_assignments", &row) {
                for child in &inserted {
                    let _ = self.svc.delete("task_assignments", child);
                }
                let _ = self.svc.delete("tasks", &task.id.to_string());
                return Err(e);
            }
            inserted.push(row_id);
        }
        Ok(())
    }

    fn require_employees(&self, ids: &[Uuid]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let wanted: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let found = self.svc.select_in("employees", "id", &wanted)?;
        if found.len() != wanted.len() {
            return Err(OpsdeckError::RecordNotFound(
                "one or more employees do not exist".to_string(),
            ));
        }
        Ok(())
    }

    // ---- updates ----

    pub fn update_employee(&self, id: Uuid, update: &EmployeeUpdate) -> Result<()> {
        let mut changes = Row::new();
        if let Some(v) = &update.name {
            changes.insert("name".into(), v.as_str().into());
        }
        if let Some(v) = &update.email {
            changes.insert("email".into(), v.as_str().into());
        }
        if let Some(v) = update.department {
            changes.insert("department".into(), v.to_string().into());
        }
        if let Some(v) = &update.role {
            changes.insert("role".into(), v.as_str().into());
        }
        self.svc.update("employees", &id.to_string(), &changes)
    }

    pub fn update_document(&self, id: Uuid, update: &DocumentUpdate) -> Result<()> {
        let mut changes = Row::new();
        if let Some(v) = &update.title {
            changes.insert("title".into(), v.as_str().into());
        }
        if let Some(v) = &update.description {
            changes.insert("description".into(), v.as_str().into());
        }
        if let Some(v) = update.category {
            changes.insert("category".into(), v.to_string().into());
        }
        if let Some(v) = &update.file_url {
            changes.insert("file_url".into(), RowValue::from(v.clone()));
        }
        self.svc.update("documents", &id.to_string(), &changes)
    }

    pub fn update_task(&self, id: Uuid, update: &TaskUpdate) -> Result<()> {
        let mut changes = Row::new();
        if let Some(v) = &update.title {
            changes.insert("title".into(), v.as_str().into());
        }
        if let Some(v) = &update.description {
            changes.insert("description".into(), v.as_str().into());
        }
        if let Some(v) = update.status {
            changes.insert("status".into(), v.to_string().into());
        }
        if let Some(v) = update.priority {
            changes.insert("priority".into(), v.to_string().into());
        }
        if let Some(v) = update.due_date {
            changes.insert(
                "due_date".into(),
                RowValue::from(v.map(|d| d.format("%Y-%m-%d").to_string())),
            );
        }
        self.svc.update("tasks", &id.to_string(), &changes)
    }

    pub fn update_ticket(&self, id: Uuid, update: &TicketUpdate) -> Result<()> {
        let mut changes = Row::new();
        if let Some(v) = &update.issue {
            changes.insert("issue".into(), v.as_str().into());
        }
        if let Some(v) = &update.description {
            changes.insert("description".into(), v.as_str().into());
        }
        if let Some(v) = update.status {
            changes.insert("status".into(), v.to_string().into());
        }
        if let Some(v) = update.priority {
            changes.insert("priority".into(), v.to_string().into());
        }
        if let Some(v) = update.category {
            changes.insert("category".into(), v.to_string().into());
        }
        if let Some(v) = &update.company {
            changes.insert("company".into(), v.as_str().into());
        }
        if let Some(v) = &update.client_name {
            changes.insert("client_name".into(), v.as_str().into());
        }
        self.svc.update("tickets", &id.to_string(), &changes)
    }

    pub fn update_subscription(&self, id: Uuid, update: &SubscriptionUpdate) -> Result<()> {
        let mut changes = Row::new();
        if let Some(v) = &update.service {
            changes.insert("service".into(), v.as_str().into());
        }
        if let Some(v) = &update.vendor {
            changes.insert("vendor".into(), v.as_str().into());
        }
        if let Some(v) = update.status {
            changes.insert("status".into(), v.to_string().into());
        }
        if let Some(v) = update.cost_cents {
            changes.insert("cost_cents".into(), v.into());
        }
        if let Some(v) = update.expiry_date {
            changes.insert(
                "expiry_date".into(),
                RowValue::from(v.map(|d| d.format("%Y-%m-%d").to_string())),
            );
        }
        if let Some(v) = &update.account_email {
            changes.insert("account_email".into(), RowValue::from(v.clone()));
        }
        self.svc.update("subscriptions", &id.to_string(), &changes)
    }

    // ---- deletes ----

    /// Delete every `child_table` row whose `fk_column` points at the
    /// parent. Children go before the parent so a failure can never
    /// leave a dangling join row.
    fn delete_children(&self, child_table: &str, fk_column: &str, parent: Uuid) -> Result<()> {
        let rows = self
            .svc
            .select_in(child_table, fk_column, &[parent.to_string()])?;
        for row in &rows {
            if let Some(id) = text_column(row, "id") {
                self.svc.delete(child_table, &id)?;
            }
        }
        Ok(())
    }

    pub fn delete_employee(&self, id: Uuid) -> Result<()> {
        self.delete_children("task_assignments", "employee_id", id)?;
        self.delete_children("document_shares", "employee_id", id)?;
        self.svc.delete("employees", &id.to_string())
    }

    pub fn delete_document(&self, id: Uuid) -> Result<()> {
        self.delete_children("document_shares", "document_id", id)?;
        self.svc.delete("documents", &id.to_string())
    }

    pub fn delete_task(&self, id: Uuid) -> Result<()> {
        self.delete_children("task_assignments", "task_id", id)?;
        self.svc.delete("tasks", &id.to_string())
    }

    pub fn delete_ticket(&self, id: Uuid) -> Result<()> {
        self.delete_children("ticket_history", "ticket_id", id)?;
        self.delete_children("ticket_chat", "ticket_id", id)?;
        self.svc.delete("tickets", &id.to_string())
    }

    pub fn delete_subscription(&self, id: Uuid) -> Result<()> {
        self.svc.delete("subscriptions", &id.to_string())
    }

    // ---- join-table operations ----

    pub fn assign_task(&self, task_id: Uuid, employee_id: Uuid) -> Result<()> {
        self.get_task(task_id)?;
        self.require_employees(&[employee_id])?;

        let wanted = employee_id.to_string();
        let existing = self
            .svc
            .select_in("task_assignments", "task_id", &[task_id.to_string()])?;
        let already = existing
            .iter()
            .any(|row| text_column(row, "employee_id").as_deref() == Some(wanted.as_str()));
        if already {
            return Err(OpsdeckError::Validation(
                "employee is already assigned to this task".to_string(),
            ));
        }

        self.svc
            .insert("task_assignments", &assignment_row(task_id, employee_id))
    }

    pub fn unassign_task(&self, task_id: Uuid, employee_id: Uuid) -> Result<()> {
        let wanted = employee_id.to_string();
        let rows = self
            .svc
            .select_in("task_assignments", "task_id", &[task_id.to_string()])?;
        let target = rows
            .iter()
            .find(|row| text_column(row, "employee_id").as_deref() == Some(wanted.as_str()));
        match target.and_then(|row| text_column(row, "id")) {
            Some(id) => self.svc.delete("task_assignments", &id),
            None => Err(OpsdeckError::RecordNotFound(format!(
                "no assignment of {} on task {}",
                employee_id, task_id
            ))),
        }
    }

    pub fn share_document(&self, document_id: Uuid, employee_id: Uuid) -> Result<()> {
        self.get_document(document_id)?;
        self.require_employees(&[employee_id])?;

        let wanted = employee_id.to_string();
        let existing = self.svc.select_in(
            "document_shares",
            "document_id",
            &[document_id.to_string()],
        )?;
        let already = existing
            .iter()
            .any(|row| text_column(row, "employee_id").as_deref() == Some(wanted.as_str()));
        if already {
            return Err(OpsdeckError::Validation(
                "document is already shared with this employee".to_string(),
            ));
        }

        let mut row = Row::new();
        row.insert("id".into(), Uuid::new_v4().to_string().into());
        row.insert("document_id".into(), document_id.to_string().into());
        row.insert("employee_id".into(), employee_id.to_string().into());
        row.insert("created_at".into(), Utc::now().to_rfc3339().into());
        self.svc.insert("document_shares", &row)
    }

    pub fn unshare_document(&self, document_id: Uuid, employee_id: Uuid) -> Result<()> {
        let wanted = employee_id.to_string();
        let rows = self.svc.select_in(
            "document_shares",
            "document_id",
            &[document_id.to_string()],
        )?;
        let target = rows
            .iter()
            .find(|row| text_column(row, "employee_id").as_deref() == Some(wanted.as_str()));
        match target.and_then(|row| text_column(row, "id")) {
            Some(id) => self.svc.delete("document_shares", &id),
            None => Err(OpsdeckError::RecordNotFound(format!(
                "document {} is not shared with {}",
                document_id, employee_id
            ))),
        }
    }

    pub fn add_ticket_note(&self, ticket_id: Uuid, note: &str) -> Result<TicketNote> {
        self.get_ticket(ticket_id)?;
        let entry = TicketNote::new(ticket_id, note.to_string());
        self.svc.insert("ticket_history", &entry.to_row())?;
        Ok(entry)
    }

    pub fn add_ticket_chat(
        &self,
        ticket_id: Uuid,
        author: &str,
        message: &str,
    ) -> Result<TicketMessage> {
        self.get_ticket(ticket_id)?;
        let entry = TicketMessage::new(ticket_id, author.to_string(), message.to_string());
        self.svc.insert("ticket_chat", &entry.to_row())?;
        Ok(entry)
    }
}

fn assignment_row(task_id: Uuid, employee_id: Uuid) -> Row {
    let mut row = Row::new();
    row.insert("id".into(), Uuid::new_v4().to_string().into());
    row.insert("task_id".into(), task_id.to_string().into());
    row.insert("employee_id".into(), employee_id.to_string().into());
    row.insert("created_at".into(), Utc::now().to_rfc3339().into());
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::SqliteService;
    use tempfile::TempDir;

    /// Wraps a real service and fails every call against one table.
    struct Flaky<'a> {
        inner: &'a SqliteService,
        fail_table: &'static str,
    }

    impl Flaky<'_> {
        fn check(&self, table: &str) -> Result<()> {
            if table == self.fail_table {
                return Err(OpsdeckError::Service(format!(
                    "injected failure on {}",
                    table
                )));
            }
            Ok(())
        }
    }

    impl DataService for Flaky<'_> {
        fn fetch_all(&self, table: &str, order_by: &str) -> Result<Vec<Row>> {
            self.check(table)?;
            self.inner.fetch_all(table, order_by)
        }

        fn insert(&self, table: &str, row: &Row) -> Result<()> {
            self.check(table)?;
            self.inner.insert(table, row)
        }

        fn update(&self, table: &str, id: &str, changes: &Row) -> Result<()> {
            self.check(table)?;
            self.inner.update(table, id, changes)
        }

        fn delete(&self, table: &str, id: &str) -> Result<()> {
            self.inner.delete(table, id)
        }

        fn select_in(&self, table: &str, column: &str, values: &[String]) -> Result<Vec<Row>> {
            self.check(table)?;
            self.inner.select_in(table, column, values)
        }
    }

    fn workspace() -> (TempDir, SqliteService) {
        let tmp = TempDir::new().unwrap();
        let svc = SqliteService::init(tmp.path()).unwrap();
        (tmp, svc)
    }

    fn seed_employee(store: &OpsStore<'_>, name: &str) -> Employee {
        let employee = Employee::new(name.to_string(), format!("{}@corp.test", name));
        store.create_employee(&employee).unwrap();
        employee
    }

    #[test]
    fn test_load_tasks_denormalizes_assignees() {
        let (_tmp, svc) = workspace();
        let store = OpsStore::new(&svc);
        let alice = seed_employee(&store, "Alice");

        let task = Task::new("Renew lease".to_string());
        store.create_task(&task, &[alice.id]).unwrap();

        let loaded = store.load_tasks().unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].assignee_names, vec!["Alice".to_string()]);
        assert_eq!(loaded.records[0].assignee_ids, vec![alice.id]);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_primary_load_failure_aborts() {
        let (_tmp, svc) = workspace();
        let flaky = Flaky {
            inner: &svc,
            fail_table: "tasks",
        };
        let store = OpsStore::new(&flaky);
        assert!(store.load_tasks().is_err());
    }

    #[test]
    fn test_lookup_failure_degrades_with_warning() {
        let (_tmp, svc) = workspace();
        {
            let store = OpsStore::new(&svc);
            let alice = seed_employee(&store, "Alice");
            let task = Task::new("Renew lease".to_string());
            store.create_task(&task, &[alice.id]).unwrap();
        }

        let flaky = Flaky {
            inner: &svc,
            fail_table: "task_assignments",
        };
        let store = OpsStore::new(&flaky);
        let loaded = store.load_tasks().unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert!(loaded.records[0].assignee_names.is_empty());
        assert!(loaded
            .warnings
            .iter()
            .any(|w| matches!(w, LoadWarning::MissingRelation { .. })));
    }

    #[test]
    fn test_create_task_rolls_back_parent_on_child_failure() {
        let (_tmp, svc) = workspace();
        let alice = {
            let store = OpsStore::new(&svc);
            seed_employee(&store, "Alice")
        };

        let flaky = Flaky {
            inner: &svc,
            fail_table: "task_assignments",
        };
        let store = OpsStore::new(&flaky);
        let task = Task::new("Doomed".to_string());
        assert!(store.create_task(&task, &[alice.id]).is_err());

        // No orphaned parent row.
        let clean = OpsStore::new(&svc);
        assert!(clean.load_tasks().unwrap().records.is_empty());
    }

    #[test]
    fn test_delete_task_cascades_assignments() {
        let (_tmp, svc) = workspace();
        let store = OpsStore::new(&svc);
        let alice = seed_employee(&store, "Alice");
        let task = Task::new("Renew lease".to_string());
        store.create_task(&task, &[alice.id]).unwrap();

        store.delete_task(task.id).unwrap();

        let remaining = svc
            .select_in("task_assignments", "task_id", &[task.id.to_string()])
            .unwrap();
        assert!(remaining.is_empty());
        assert!(matches!(
            store.get_task(task.id),
            Err(OpsdeckError::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_delete_ticket_cascades_history_and_chat() {
        let (_tmp, svc) = workspace();
        let store = OpsStore::new(&svc);
        let ticket = Ticket::new("Login broken".to_string(), "Acme".to_string());
        store.create_ticket(&ticket).unwrap();
        store.add_ticket_note(ticket.id, "escalated").unwrap();
        store.add_ticket_chat(ticket.id, "sam", "looking into it").unwrap();

        store.delete_ticket(ticket.id).unwrap();

        assert!(store.load_ticket_history(ticket.id).unwrap().is_empty());
        assert!(store.load_ticket_chat(ticket.id).unwrap().is_empty());
    }

    #[test]
    fn test_update_task_is_partial() {
        let (_tmp, svc) = workspace();
        let store = OpsStore::new(&svc);
        let mut task = Task::new("Original".to_string());
        task.description = Some("keep me".to_string());
        store.create_task(&task, &[]).unwrap();

        let update = TaskUpdate {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        store.update_task(task.id, &update).unwrap();

        let fetched = store.get_task(task.id).unwrap();
        assert_eq!(fetched.status, TaskStatus::Completed);
        assert_eq!(fetched.title, "Original");
        assert_eq!(fetched.description.as_deref(), Some("keep me"));
    }

    #[test]
    fn test_assign_twice_is_rejected() {
        let (_tmp, svc) = workspace();
        let store = OpsStore::new(&svc);
        let alice = seed_employee(&store, "Alice");
        let task = Task::new("Shared work".to_string());
        store.create_task(&task, &[]).unwrap();

        store.assign_task(task.id, alice.id).unwrap();
        assert!(matches!(
            store.assign_task(task.id, alice.id),
            Err(OpsdeckError::Validation(_))
        ));

        store.unassign_task(task.id, alice.id).unwrap();
        assert!(matches!(
            store.unassign_task(task.id, alice.id),
            Err(OpsdeckError::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_share_and_unshare_document() {
        let (_tmp, svc) = workspace();
        let store = OpsStore::new(&svc);
        let alice = seed_employee(&store, "Alice");
        let doc = Document::new("Handbook".to_string());
        store.create_document(&doc).unwrap();

        store.share_document(doc.id, alice.id).unwrap();
        let loaded = store.load_documents().unwrap();
        assert_eq!(loaded.records[0].shared_with, vec!["Alice".to_string()]);

        store.unshare_document(doc.id, alice.id).unwrap();
        let loaded = store.load_documents().unwrap();
        assert!(loaded.records[0].shared_with.is_empty());
    }

    #[test]
    fn test_resolve_id_by_prefix() {
        let (_tmp, svc) = workspace();
        let store = OpsStore::new(&svc);
        let alice = seed_employee(&store, "Alice");

        let prefix = &alice.id.to_string()[..8];
        let resolved = store.resolve_id(RecordKind::Employee, prefix).unwrap();
        assert_eq!(resolved, alice.id);

        assert!(matches!(
            store.resolve_id(RecordKind::Employee, "zzzz"),
            Err(OpsdeckError::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_unknown_status_loads_as_unknown() {
        let (_tmp, svc) = workspace();
        let mut row = Row::new();
        row.insert("id".into(), Uuid::new_v4().to_string().into());
        row.insert("title".into(), "Odd".into());
        row.insert("status".into(), "paused".into());
        row.insert("priority".into(), "medium".into());
        row.insert("created_at".into(), Utc::now().to_rfc3339().into());
        svc.insert("tasks", &row).unwrap();

        let store = OpsStore::new(&svc);
        let loaded = store.load_tasks().unwrap();
        assert_eq!(loaded.records[0].status, TaskStatus::Unknown);
        assert!(loaded
            .warnings
            .iter()
            .any(|w| matches!(w, LoadWarning::UnknownCategory { .. })));
    }
}
