pub mod object_store;
pub mod service;
mod sqlite;
mod store;

pub use object_store::{FsObjectStore, ObjectStore};
pub use service::{DataService, Row, RowValue};
pub use sqlite::SqliteService;
pub use store::{
    DocumentUpdate, EmployeeUpdate, Loaded, OpsStore, SubscriptionUpdate, TaskUpdate,
    TicketUpdate,
};
