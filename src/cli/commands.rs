use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "opsdeck")]
#[command(version, about = "A local-first engine for internal business operations")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize an opsdeck workspace in the current directory
    Init,

    /// Add a new record
    Add(AddCommand),

    /// List records with filtering, sorting and pagination
    List(ListCommand),

    /// List records using a filter expression (status:open due:overdue text)
    Query {
        /// Record type (employee, document, task, ticket, subscription)
        kind: String,

        /// Filter expression
        expr: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one record by id or id prefix
    Get {
        /// Record type
        kind: String,

        /// Record id or unambiguous prefix
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update fields on an existing record
    Update(UpdateCommand),

    /// Delete a record and its dependent rows
    Delete {
        /// Record type
        kind: String,

        /// Record id or unambiguous prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Assign an employee to a task
    Assign {
        /// Task id or prefix
        task: String,

        /// Employee id or prefix
        employee: String,
    },

    /// Remove a task assignment
    Unassign {
        task: String,
        employee: String,
    },

    /// Share a document with an employee
    Share {
        /// Document id or prefix
        document: String,

        /// Employee id or prefix
        employee: String,
    },

    /// Remove a document share
    Unshare {
        document: String,
        employee: String,
    },

    /// Ticket history and chat
    Ticket(TicketCommand),
}

#[derive(Args, Debug)]
pub struct AddCommand {
    #[command(subcommand)]
    pub record: AddRecord,
}

#[derive(Subcommand, Debug)]
pub enum AddRecord {
    /// Add an employee to the directory
    Employee {
        /// Full name
        name: String,

        /// Work email
        email: String,

        /// Department (engineering, sales, finance, hr, operations)
        #[arg(long, default_value = "operations")]
        department: String,

        /// Role title
        #[arg(long)]
        role: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a document
    Document {
        /// Document title
        title: String,

        /// Category (contract, invoice, report, policy, other)
        #[arg(long, default_value = "other")]
        category: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Attach a local file; it is uploaded to object storage
        #[arg(long)]
        file: Option<std::path::PathBuf>,

        /// Uploading employee (id or prefix)
        #[arg(long = "uploaded-by")]
        uploaded_by: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a task
    Task {
        /// Task title
        title: String,

        /// Status (todo, in_progress, completed)
        #[arg(long, default_value = "todo")]
        status: String,

        /// Priority (low, medium, high, urgent)
        #[arg(long, default_value = "medium")]
        priority: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Assign an employee (id or prefix, repeatable)
        #[arg(long = "assignee", short = 'a')]
        assignees: Vec<String>,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Read the description from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a support ticket
    Ticket {
        /// One-line issue summary
        issue: String,

        /// Company name
        #[arg(long, default_value = "")]
        company: String,

        /// Client contact name
        #[arg(long)]
        client: Option<String>,

        /// Status (open, in_progress, resolved, closed)
        #[arg(long, default_value = "open")]
        status: String,

        /// Priority (low, medium, high, urgent)
        #[arg(long, default_value = "medium")]
        priority: String,

        /// Category (billing, technical, account, general)
        #[arg(long, default_value = "general")]
        category: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a subscription
    Subscription {
        /// Service name
        service: String,

        /// Vendor name
        vendor: String,

        /// Status (active, expired, cancelled)
        #[arg(long, default_value = "active")]
        status: String,

        /// Monthly cost in cents
        #[arg(long)]
        cost: Option<i64>,

        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expires: Option<String>,

        /// Account email the subscription is registered under
        #[arg(long)]
        email: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct ListCommand {
    /// Record type (employee, document, task, ticket, subscription)
    pub kind: String,

    #[command(flatten)]
    pub args: ListArgs,
}

/// The presentation flags shared by `list` and `query`.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Case-insensitive substring search
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Accept a status value (repeatable, OR-combined)
    #[arg(long = "status")]
    pub statuses: Vec<String>,

    /// Accept a priority value (repeatable)
    #[arg(long = "priority")]
    pub priorities: Vec<String>,

    /// Accept a category value (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Accept a department value (repeatable, employees only)
    #[arg(long = "department")]
    pub departments: Vec<String>,

    /// Select a time bucket (today, week, month, overdue; repeatable)
    #[arg(long = "due")]
    pub due: Vec<String>,

    /// Sort field
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long)]
    pub desc: bool,

    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// Records per page (10, 20, 50, 100)
    #[arg(long = "page-size", default_value = "10")]
    pub page_size: String,

    /// Hide a column (repeatable)
    #[arg(long = "hide")]
    pub hidden: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct UpdateCommand {
    /// Record type
    pub kind: String,

    /// Record id or unambiguous prefix
    pub id: String,

    /// New title (document title, task title, ticket issue, service name)
    #[arg(long)]
    pub title: Option<String>,

    /// New status
    #[arg(long)]
    pub status: Option<String>,

    /// New priority
    #[arg(long)]
    pub priority: Option<String>,

    /// New category or department
    #[arg(long)]
    pub category: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New due/expiry date (YYYY-MM-DD, or "none" to clear)
    #[arg(long)]
    pub due: Option<String>,

    /// New name (employees)
    #[arg(long)]
    pub name: Option<String>,

    /// New email (employees, subscriptions)
    #[arg(long)]
    pub email: Option<String>,

    /// New role title (employees)
    #[arg(long)]
    pub role: Option<String>,

    /// New company (tickets)
    #[arg(long)]
    pub company: Option<String>,

    /// New client contact (tickets)
    #[arg(long)]
    pub client: Option<String>,

    /// New vendor (subscriptions)
    #[arg(long)]
    pub vendor: Option<String>,

    /// New cost in cents (subscriptions)
    #[arg(long)]
    pub cost: Option<i64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TicketCommand {
    #[command(subcommand)]
    pub action: TicketAction,
}

#[derive(Subcommand, Debug)]
pub enum TicketAction {
    /// Append an internal history note
    Note {
        /// Ticket id or prefix
        id: String,

        /// Note text
        text: String,
    },

    /// Append a chat message
    Chat {
        /// Ticket id or prefix
        id: String,

        /// Author name
        author: String,

        /// Message text
        message: String,
    },

    /// Show a ticket's history notes
    History {
        /// Ticket id or prefix
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
