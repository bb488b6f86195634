use clap::Parser;
use opsdeck::cli::{
    handle_add, handle_assign, handle_delete, handle_get, handle_init, handle_list, handle_query,
    handle_share, handle_ticket, handle_unassign, handle_unshare, handle_update, Cli, Commands,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Add(add) => handle_add(add.record),
        Commands::List(list) => handle_list(list.kind, list.args),
        Commands::Query { kind, expr, json } => handle_query(kind, expr, json),
        Commands::Get { kind, id, json } => handle_get(kind, id, json),
        Commands::Update(update) => handle_update(update),
        Commands::Delete { kind, id, force } => handle_delete(kind, id, force),
        Commands::Assign { task, employee } => handle_assign(task, employee),
        Commands::Unassign { task, employee } => handle_unassign(task, employee),
        Commands::Share { document, employee } => handle_share(document, employee),
        Commands::Unshare { document, employee } => handle_unshare(document, employee),
        Commands::Ticket(ticket) => handle_ticket(ticket.action),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
