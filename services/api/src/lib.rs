mod cli;
mod infra;
mod jobs;
mod routes;
mod seed;
mod server;

use swipe::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
