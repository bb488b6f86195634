mod commands;
mod handlers;
mod query;

pub use commands::{
    AddCommand, AddRecord, Cli, Commands, ListArgs, ListCommand, TicketAction, TicketCommand,
    UpdateCommand,
};
pub use handlers::{
    handle_add, handle_assign, handle_delete, handle_get, handle_init, handle_list, handle_query,
    handle_share, handle_ticket, handle_unassign, handle_unshare, handle_update,
};
pub use query::parse_query;
