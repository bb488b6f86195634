use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::cli::commands::{AddRecord, ListArgs, TicketAction, UpdateCommand};
use crate::cli::query::parse_query;
use crate::entity::{
    Document, DocumentCategory, Employee, Priority, RecordKind, Subscription, SubscriptionStatus,
    Task, TaskStatus, Ticket, TicketCategory, TicketMessage, TicketNote, TicketStatus,
};
use crate::error::{OpsdeckError, Result};
use crate::notify::{ConsoleNotifier, NotificationSink};
use crate::pipeline::{ColumnSet, Direction, FilterSet, Listable, PageSize, TimeBucket};
use crate::storage::{
    DocumentUpdate, EmployeeUpdate, FsObjectStore, ObjectStore, OpsStore, SqliteService,
    SubscriptionUpdate, TaskUpdate, TicketUpdate,
};
use crate::view::{ListView, ViewEvent};
use crate::warnings::{format_warning, LoadWarning};

/// Find the workspace root by looking for .opsdeck/ or .git/
fn find_workspace_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(".opsdeck").exists() || current.join(".git").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}

fn open_service() -> Result<SqliteService> {
    SqliteService::open(&find_workspace_root())
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn short_id(id: &uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Strict parse for user-supplied enum values. Unlike row decoding, a bad
/// value here is rejected instead of degraded.
fn parse_strict<T>(raw: &str) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse().map_err(OpsdeckError::Validation)
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| OpsdeckError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// Dates on update commands accept "none" to clear the stored value.
fn parse_clearable_date(raw: &str) -> Result<Option<NaiveDate>> {
    if raw.eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        parse_date(raw).map(Some)
    }
}

fn parse_kind(raw: &str) -> Result<RecordKind> {
    raw.parse()
        .map_err(|_| OpsdeckError::InvalidRecordType(raw.to_string()))
}

/// Default column order per record type.
fn columns_for(kind: RecordKind) -> &'static [&'static str] {
    match kind {
        RecordKind::Employee => &["id", "name", "email", "department", "role", "created_at"],
        RecordKind::Document => &["id", "title", "category", "uploaded_by", "created_at"],
        RecordKind::Task => &["id", "title", "status", "priority", "due_date", "assignees", "created_at"],
        RecordKind::Ticket => &[
            "id",
            "issue",
            "status",
            "priority",
            "category",
            "company",
            "client_name",
            "created_at",
        ],
        RecordKind::Subscription => &["id", "service", "vendor", "status", "cost", "expiry_date", "created_at"],
    }
}

pub fn handle_init() -> Result<()> {
    let root = env::current_dir()?;

    let _svc = SqliteService::init(&root)?;

    println!("Initialized opsdeck workspace in {}", root.display());

    Ok(())
}

// ---------------------------------------------------------------------------
// List / query

/// Translate CLI list flags into a filter set.
fn filters_from_args(args: &ListArgs) -> Result<FilterSet> {
    let mut filters = FilterSet::new();

    if let Some(term) = &args.search {
        filters.search = term.clone();
    }
    for value in &args.statuses {
        filters.accept("status", value);
    }
    for value in &args.priorities {
        filters.accept("priority", value);
    }
    for value in &args.categories {
        filters.accept("category", value);
    }
    for value in &args.departments {
        filters.accept("department", value);
    }
    for raw in &args.due {
        let bucket: TimeBucket = raw.parse().map_err(OpsdeckError::Validation)?;
        filters.buckets.insert(bucket);
    }

    Ok(filters)
}

/// Drive a list view with the loaded snapshot and the requested
/// presentation, then render the visible page.
fn run_list<T>(
    records: Vec<T>,
    warnings: &[LoadWarning],
    kind: RecordKind,
    filters: FilterSet,
    args: &ListArgs,
) -> Result<()>
where
    T: Listable + Clone + Serialize,
{
    let notifier = ConsoleNotifier;
    let now = today();

    let mut view: ListView<T> = ListView::new(ColumnSet::new(columns_for(kind)));
    view.finish_load(Ok(records), now);

    if !filters.search.is_empty() {
        view.apply(ViewEvent::SetSearch(filters.search.clone()), now);
    }
    for (dimension, values) in &filters.dimensions {
        for value in values {
            view.apply(
                ViewEvent::ToggleDimension {
                    dimension: dimension.clone(),
                    value: value.clone(),
                },
                now,
            );
        }
    }
    if !filters.buckets.is_empty() {
        view.apply(ViewEvent::SetBuckets(filters.buckets.clone()), now);
    }

    if let Some(field) = &args.sort {
        let direction = if args.desc {
            Direction::Descending
        } else {
            Direction::Ascending
        };
        view.apply(
            ViewEvent::SetSort {
                field: field.clone(),
                direction,
            },
            now,
        );
    } else if args.desc {
        view.apply(
            ViewEvent::SetSort {
                field: view.query.sort_field.clone(),
                direction: Direction::Descending,
            },
            now,
        );
    }

    let page_size: PageSize = parse_strict(&args.page_size)?;
    view.apply(ViewEvent::SetPageSize(page_size), now);
    for key in &args.hidden {
        view.apply(ViewEvent::ToggleColumn(key.clone()), now);
    }
    // Page selection last: filter and size changes reset the page index.
    view.apply(ViewEvent::GoToPage(args.page), now);

    let page = view.visible_page(now);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        let columns = view.query.columns.visible_keys();
        print_table(&page.records, &columns);
        println!(
            "page {}/{} ({} record{})",
            page.page_index + 1,
            page.total_pages.max(1),
            page.total_count,
            if page.total_count == 1 { "" } else { "s" }
        );
    }

    for warning in warnings {
        notifier.warn(&format_warning(warning));
    }

    Ok(())
}

fn print_table<T: Listable>(records: &[T], columns: &[&str]) {
    if records.is_empty() {
        println!("No records found.");
        return;
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|key| {
                    let cell = record.field(key).display();
                    if *key == "id" && cell.len() > 8 {
                        cell[..8].to_string()
                    } else {
                        cell
                    }
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(key, width)| format!("{:<1$}", key.to_uppercase(), width))
        .collect();
    println!("{}", header.join("  "));

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<1$}", cell, width))
            .collect();
        println!("{}", line.join("  "));
    }
}

pub fn handle_list(kind: String, args: ListArgs) -> Result<()> {
    let kind = parse_kind(&kind)?;
    let filters = filters_from_args(&args)?;
    dispatch_list(kind, filters, &args)
}

pub fn handle_query(kind: String, expr: String, json: bool) -> Result<()> {
    let kind = parse_kind(&kind)?;
    let filters = parse_query(&expr)?;
    let args = ListArgs {
        json,
        page_size: "10".to_string(),
        ..Default::default()
    };
    dispatch_list(kind, filters, &args)
}

fn dispatch_list(kind: RecordKind, filters: FilterSet, args: &ListArgs) -> Result<()> {
    let svc = open_service()?;
    let store = OpsStore::new(&svc);

    match kind {
        RecordKind::Employee => {
            let loaded = store.load_employees()?;
            run_list(loaded.records, &loaded.warnings, kind, filters, args)
        }
        RecordKind::Document => {
            let loaded = store.load_documents()?;
            run_list(loaded.records, &loaded.warnings, kind, filters, args)
        }
        RecordKind::Task => {
            let loaded = store.load_tasks()?;
            run_list(loaded.records, &loaded.warnings, kind, filters, args)
        }
        RecordKind::Ticket => {
            let loaded = store.load_tickets()?;
            run_list(loaded.records, &loaded.warnings, kind, filters, args)
        }
        RecordKind::Subscription => {
            let loaded = store.load_subscriptions()?;
            run_list(loaded.records, &loaded.warnings, kind, filters, args)
        }
    }
}

// ---------------------------------------------------------------------------
// Add

pub fn handle_add(record: AddRecord) -> Result<()> {
    let svc = open_service()?;
    let store = OpsStore::new(&svc);

    match record {
        AddRecord::Employee {
            name,
            email,
            department,
            role,
            json,
        } => {
            let mut employee = Employee::new(name, email);
            employee.department = parse_strict(&department)?;
            employee.role = role.unwrap_or_default();

            store.create_employee(&employee)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&employee)?);
            } else {
                println!("Created employee {} - {}", short_id(&employee.id), employee.name);
            }
            Ok(())
        }
        AddRecord::Document {
            title,
            category,
            description,
            file,
            uploaded_by,
            json,
        } => {
            let mut document = Document::new(title);
            document.category = parse_strict::<DocumentCategory>(&category)?;
            document.description = description;

            if let Some(prefix) = &uploaded_by {
                let employee_id = store.resolve_id(RecordKind::Employee, prefix)?;
                let employee = store.get_employee(employee_id)?;
                document.uploaded_by = Some(employee.id);
                document.uploaded_by_name = Some(employee.name);
            }

            if let Some(path) = &file {
                let bytes = fs::read(path)?;
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .ok_or_else(|| {
                        OpsdeckError::Validation(format!("Invalid file name: {}", path.display()))
                    })?;
                let object_store = FsObjectStore::new(svc.ops_dir());
                let url = object_store.upload(name, &bytes)?;
                document.file_url = Some(url);
            }

            store.create_document(&document)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&document)?);
            } else {
                println!("Created document {} - {}", short_id(&document.id), document.title);
            }
            Ok(())
        }
        AddRecord::Task {
            title,
            status,
            priority,
            due,
            assignees,
            description,
            stdin,
            json,
        } => {
            let mut task = Task::new(title);
            task.status = parse_strict::<TaskStatus>(&status)?;
            task.priority = parse_strict::<Priority>(&priority)?;
            task.description = description;
            if let Some(raw) = &due {
                task.due_date = Some(parse_date(raw)?);
            }

            if stdin {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                if !content.is_empty() {
                    task.description = Some(content);
                }
            }

            let mut assignee_ids = Vec::new();
            for prefix in &assignees {
                assignee_ids.push(store.resolve_id(RecordKind::Employee, prefix)?);
            }
            task.assignee_ids = assignee_ids.clone();

            store.create_task(&task, &assignee_ids)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("Created task {} - {}", short_id(&task.id), task.title);
            }
            Ok(())
        }
        AddRecord::Ticket {
            issue,
            company,
            client,
            status,
            priority,
            category,
            description,
            json,
        } => {
            let mut ticket = Ticket::new(issue, company);
            ticket.status = parse_strict::<TicketStatus>(&status)?;
            ticket.priority = parse_strict::<Priority>(&priority)?;
            ticket.category = parse_strict::<TicketCategory>(&category)?;
            ticket.client_name = client.unwrap_or_default();
            ticket.description = description;

            store.create_ticket(&ticket)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&ticket)?);
            } else {
                println!("Created ticket {} - {}", short_id(&ticket.id), ticket.issue);
            }
            Ok(())
        }
        AddRecord::Subscription {
            service,
            vendor,
            status,
            cost,
            expires,
            email,
            json,
        } => {
            let mut subscription = Subscription::new(service, vendor);
            subscription.status = parse_strict::<SubscriptionStatus>(&status)?;
            subscription.cost_cents = cost.unwrap_or(0);
            subscription.account_email = email;
            if let Some(raw) = &expires {
                subscription.expiry_date = Some(parse_date(raw)?);
            }

            store.create_subscription(&subscription)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&subscription)?);
            } else {
                println!(
                    "Created subscription {} - {}",
                    short_id(&subscription.id),
                    subscription.service
                );
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Get

pub fn handle_get(kind: String, id: String, json: bool) -> Result<()> {
    let kind = parse_kind(&kind)?;
    let svc = open_service()?;
    let store = OpsStore::new(&svc);
    let record_id = store.resolve_id(kind, &id)?;

    match kind {
        RecordKind::Employee => {
            let employee = store.get_employee(record_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&employee)?);
            } else {
                println!("Employee {}", short_id(&employee.id));
                println!("  name:       {}", employee.name);
                println!("  email:      {}", employee.email);
                println!("  department: {}", employee.department);
                println!("  role:       {}", display_or_dash(&employee.role));
                println!("  created:    {}", employee.created_at.format("%Y-%m-%d %H:%M"));
            }
        }
        RecordKind::Document => {
            let document = store.get_document(record_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&document)?);
            } else {
                println!("Document {}", short_id(&document.id));
                println!("  title:       {}", document.title);
                println!("  category:    {}", document.category);
                println!(
                    "  description: {}",
                    display_or_dash(document.description.as_deref().unwrap_or(""))
                );
                println!(
                    "  file:        {}",
                    display_or_dash(document.file_url.as_deref().unwrap_or(""))
                );
                println!(
                    "  uploaded by: {}",
                    display_or_dash(document.uploaded_by_name.as_deref().unwrap_or(""))
                );
                if !document.shared_with.is_empty() {
                    println!("  shared with: {}", document.shared_with.join(", "));
                }
                println!("  created:     {}", document.created_at.format("%Y-%m-%d %H:%M"));
            }
        }
        RecordKind::Task => {
            let task = store.get_task(record_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("Task {}", short_id(&task.id));
                println!("  title:     {}", task.title);
                println!("  status:    {}", task.status);
                println!("  priority:  {}", task.priority);
                println!(
                    "  due:       {}",
                    task.due_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
                if !task.assignee_names.is_empty() {
                    println!("  assignees: {}", task.assignee_names.join(", "));
                }
                if let Some(description) = &task.description {
                    println!("  description: {}", description);
                }
                println!("  created:   {}", task.created_at.format("%Y-%m-%d %H:%M"));
            }
        }
        RecordKind::Ticket => {
            let ticket = store.get_ticket(record_id)?;
            let history = store.load_ticket_history(ticket.id)?;
            let chat = store.load_ticket_chat(ticket.id)?;
            if json {
                #[derive(Serialize)]
                struct TicketDetails {
                    #[serde(flatten)]
                    ticket: Ticket,
                    history: Vec<TicketNote>,
                    chat: Vec<TicketMessage>,
                }
                let details = TicketDetails {
                    ticket,
                    history,
                    chat,
                };
                println!("{}", serde_json::to_string_pretty(&details)?);
            } else {
                println!("Ticket {}", short_id(&ticket.id));
                println!("  issue:    {}", ticket.issue);
                println!("  status:   {}", ticket.status);
                println!("  priority: {}", ticket.priority);
                println!("  category: {}", ticket.category);
                println!("  company:  {}", display_or_dash(&ticket.company));
                println!("  client:   {}", display_or_dash(&ticket.client_name));
                if let Some(description) = &ticket.description {
                    println!("  description: {}", description);
                }
                println!("  created:  {}", ticket.created_at.format("%Y-%m-%d %H:%M"));
                if !history.is_empty() {
                    println!("  history:");
                    for note in &history {
                        println!("    [{}] {}", note.created_at.format("%Y-%m-%d %H:%M"), note.note);
                    }
                }
                if !chat.is_empty() {
                    println!("  chat:");
                    for message in &chat {
                        println!(
                            "    [{}] {}: {}",
                            message.created_at.format("%Y-%m-%d %H:%M"),
                            message.author,
                            message.message
                        );
                    }
                }
            }
        }
        RecordKind::Subscription => {
            let subscription = store.get_subscription(record_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&subscription)?);
            } else {
                println!("Subscription {}", short_id(&subscription.id));
                println!("  service: {}", subscription.service);
                println!("  vendor:  {}", subscription.vendor);
                println!("  status:  {}", subscription.status);
                println!("  cost:    {} cents/month", subscription.cost_cents);
                println!(
                    "  expires: {}",
                    subscription
                        .expiry_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
                println!(
                    "  email:   {}",
                    display_or_dash(subscription.account_email.as_deref().unwrap_or(""))
                );
                println!("  created: {}", subscription.created_at.format("%Y-%m-%d %H:%M"));
            }
        }
    }

    Ok(())
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Update

pub fn handle_update(cmd: UpdateCommand) -> Result<()> {
    let kind = parse_kind(&cmd.kind)?;
    let svc = open_service()?;
    let store = OpsStore::new(&svc);
    let record_id = store.resolve_id(kind, &cmd.id)?;

    match kind {
        RecordKind::Employee => {
            let mut update = EmployeeUpdate {
                name: cmd.name,
                email: cmd.email,
                role: cmd.role,
                ..Default::default()
            };
            if let Some(raw) = &cmd.category {
                update.department = Some(parse_strict(raw)?);
            }
            store.update_employee(record_id, &update)?;
        }
        RecordKind::Document => {
            let mut update = DocumentUpdate {
                title: cmd.title,
                description: cmd.description,
                ..Default::default()
            };
            if let Some(raw) = &cmd.category {
                update.category = Some(parse_strict(raw)?);
            }
            store.update_document(record_id, &update)?;
        }
        RecordKind::Task => {
            let mut update = TaskUpdate {
                title: cmd.title,
                description: cmd.description,
                ..Default::default()
            };
            if let Some(raw) = &cmd.status {
                update.status = Some(parse_strict(raw)?);
            }
            if let Some(raw) = &cmd.priority {
                update.priority = Some(parse_strict(raw)?);
            }
            if let Some(raw) = &cmd.due {
                update.due_date = Some(parse_clearable_date(raw)?);
            }
            store.update_task(record_id, &update)?;
        }
        RecordKind::Ticket => {
            let mut update = TicketUpdate {
                issue: cmd.title,
                description: cmd.description,
                company: cmd.company,
                client_name: cmd.client,
                ..Default::default()
            };
            if let Some(raw) = &cmd.status {
                update.status = Some(parse_strict(raw)?);
            }
            if let Some(raw) = &cmd.priority {
                update.priority = Some(parse_strict(raw)?);
            }
            if let Some(raw) = &cmd.category {
                update.category = Some(parse_strict(raw)?);
            }
            store.update_ticket(record_id, &update)?;
        }
        RecordKind::Subscription => {
            let mut update = SubscriptionUpdate {
                service: cmd.title,
                vendor: cmd.vendor,
                cost_cents: cmd.cost,
                account_email: cmd.email.map(Some),
                ..Default::default()
            };
            if let Some(raw) = &cmd.status {
                update.status = Some(parse_strict(raw)?);
            }
            if let Some(raw) = &cmd.due {
                update.expiry_date = Some(parse_clearable_date(raw)?);
            }
            store.update_subscription(record_id, &update)?;
        }
    }

    if cmd.json {
        handle_get(kind.to_string(), record_id.to_string(), true)?;
    } else {
        println!("Updated {} {}", kind, short_id(&record_id));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Delete

pub fn handle_delete(kind: String, id: String, force: bool) -> Result<()> {
    let kind = parse_kind(&kind)?;
    let svc = open_service()?;
    let store = OpsStore::new(&svc);
    let record_id = store.resolve_id(kind, &id)?;

    if !force {
        eprintln!("Delete {} {}? [y/N] ", kind, short_id(&record_id));

        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        } else {
            return Err(OpsdeckError::Validation(
                "Use --force to delete in non-interactive mode".to_string(),
            ));
        }
    }

    match kind {
        RecordKind::Employee => store.delete_employee(record_id)?,
        RecordKind::Document => store.delete_document(record_id)?,
        RecordKind::Task => store.delete_task(record_id)?,
        RecordKind::Ticket => store.delete_ticket(record_id)?,
        RecordKind::Subscription => store.delete_subscription(record_id)?,
    }

    println!("Deleted {} {}", kind, short_id(&record_id));

    Ok(())
}

// ---------------------------------------------------------------------------
// Relations

pub fn handle_assign(task: String, employee: String) -> Result<()> {
    let svc = open_service()?;
    let store = OpsStore::new(&svc);

    let task_id = store.resolve_id(RecordKind::Task, &task)?;
    let employee_id = store.resolve_id(RecordKind::Employee, &employee)?;
    store.assign_task(task_id, employee_id)?;

    let assignee = store.get_employee(employee_id)?;
    println!("Assigned {} to task {}", assignee.name, short_id(&task_id));

    Ok(())
}

pub fn handle_unassign(task: String, employee: String) -> Result<()> {
    let svc = open_service()?;
    let store = OpsStore::new(&svc);

    let task_id = store.resolve_id(RecordKind::Task, &task)?;
    let employee_id = store.resolve_id(RecordKind::Employee, &employee)?;
    store.unassign_task(task_id, employee_id)?;

    println!("Removed assignment from task {}", short_id(&task_id));

    Ok(())
}

pub fn handle_share(document: String, employee: String) -> Result<()> {
    let svc = open_service()?;
    let store = OpsStore::new(&svc);

    let document_id = store.resolve_id(RecordKind::Document, &document)?;
    let employee_id = store.resolve_id(RecordKind::Employee, &employee)?;
    store.share_document(document_id, employee_id)?;

    let recipient = store.get_employee(employee_id)?;
    println!("Shared document {} with {}", short_id(&document_id), recipient.name);

    Ok(())
}

pub fn handle_unshare(document: String, employee: String) -> Result<()> {
    let svc = open_service()?;
    let store = OpsStore::new(&svc);

    let document_id = store.resolve_id(RecordKind::Document, &document)?;
    let employee_id = store.resolve_id(RecordKind::Employee, &employee)?;
    store.unshare_document(document_id, employee_id)?;

    println!("Removed share from document {}", short_id(&document_id));

    Ok(())
}

// ---------------------------------------------------------------------------
// Ticket history and chat

pub fn handle_ticket(action: TicketAction) -> Result<()> {
    let svc = open_service()?;
    let store = OpsStore::new(&svc);

    match action {
        TicketAction::Note { id, text } => {
            let ticket_id = store.resolve_id(RecordKind::Ticket, &id)?;
            let note = store.add_ticket_note(ticket_id, &text)?;
            println!("Added note {} to ticket {}", short_id(&note.id), short_id(&ticket_id));
        }
        TicketAction::Chat { id, author, message } => {
            let ticket_id = store.resolve_id(RecordKind::Ticket, &id)?;
            let entry = store.add_ticket_chat(ticket_id, &author, &message)?;
            println!(
                "Added chat message {} to ticket {}",
                short_id(&entry.id),
                short_id(&ticket_id)
            );
        }
        TicketAction::History { id, json } => {
            let ticket_id = store.resolve_id(RecordKind::Ticket, &id)?;
            let history = store.load_ticket_history(ticket_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else if history.is_empty() {
                println!("No history for ticket {}", short_id(&ticket_id));
            } else {
                for note in &history {
                    println!("[{}] {}", note.created_at.format("%Y-%m-%d %H:%M"), note.note);
                }
            }
        }
    }

    Ok(())
}
