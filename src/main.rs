use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    skylog_core::init()?;

    let (config, _) = skylog_core::Config::load_validated()?;
    tracing::info!(base_url = %config.api.base_url, "starting Skylog");

    // Wire the gateway into the application and run startup
    let gateway = skylog_api::ApiClient::new(&config.api.base_url);
    let app = skylog_app::App::new(gateway);
    app.initialize().await;

    let snapshot = app.snapshot();
    println!("Skylog - Weather Lookup");
    println!("Status: {}", snapshot.api_status.label());
    println!("Saved searches: {}", snapshot.history.records.len());

    Ok(())
}
