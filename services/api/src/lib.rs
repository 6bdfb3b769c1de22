mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use burnout_guard::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
