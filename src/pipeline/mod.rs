//! The data-shaping pipeline shared by every list view:
//! filter, then sort, then paginate, with column visibility applied
//! orthogonally at render time.
//!
//! Each stage is pure and synchronous; it reads a snapshot and returns
//! a new sequence. Suspension only ever happens at the storage layer.

mod columns;
mod filter;
mod page;
mod sort;
mod value;

pub use columns::ColumnSet;
pub use filter::{filter, FilterSet, TimeBucket};
pub use page::{paginate, Page, PageSize};
pub use sort::{sorted, Direction};
pub use value::{FieldValue, Listable};
