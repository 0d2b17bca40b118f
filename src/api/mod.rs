mod cli;
mod commands;
pub mod prometheus;
pub mod routes;
mod server;
pub mod state;

pub use prometheus::PrometheusObserver;
pub use routes::router;
pub use state::AppState;

use crate::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
