mod config;
mod main_lib;

use crosslist_core::ComparisonServiceTrait;

use config::Config;
use main_lib::{build_request, build_service, init_tracing, parse_dates};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_format);

    let (date1, date2) = parse_dates(std::env::args().skip(1))?;
    let service = build_service(&config)?;
    let request = build_request(&config, date1, date2);

    tracing::info!(
        "Comparing {} instruments from {} to {}",
        request.universe.len(),
        date1,
        date2
    );
    let report = service.compare_detailed(&request).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
