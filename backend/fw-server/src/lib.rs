pub mod error;
pub mod health;
pub mod ingest;
pub mod logger;
pub mod prometheus;
pub mod routes;
pub mod server_state;
pub mod settings;

#[cfg(test)]
mod tests;

pub use error::{Result as ServerErrorResult, ServerError};
pub use ingest::IngestServer;
pub use routes::build_router;
pub use server_state::ServerState;
