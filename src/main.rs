use growshop::{config::ServerConfig, server::run_server};

#[actix_web::main]
async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();
    log::info!("Main - Starting GrowShop control panel");

    let config = ServerConfig::from_env_or_default();
    match run_server(config).await {
        Ok(()) => log::info!("Main - GrowShop control panel stopped"),
        Err(err) => log::error!("Main - GrowShop control panel failed: {}", err.to_string()),
    }
}
