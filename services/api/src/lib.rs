mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use parcel_recon::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
