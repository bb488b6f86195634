pub mod cli;
pub mod entity;
pub mod error;
pub mod notify;
pub mod pipeline;
pub mod storage;
pub mod view;
pub mod warnings;

pub use error::{OpsdeckError, Result};
pub use storage::{OpsStore, SqliteService};
pub use view::ListView;
