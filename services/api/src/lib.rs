mod assess;
mod cli;
mod infra;
mod routes;
mod server;

use health_risk::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
