use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    bot::RedisStore, config::ServerConfig, errors::ServerError, license::machine_hwid, routes,
    supervisor::BotSupervisor,
};

/* Server is the entry point of the control panel.
 * It owns the application context shared by every route:
 * the configuration, the license database and the bot supervisor.
 */

pub struct AppContext {
    pub config: ServerConfig,
    pub license_store: Option<RedisStore>,
    pub hwid: String,
    pub supervisor: BotSupervisor,
}

impl AppContext {
    pub fn new(config: ServerConfig, license_store: Option<RedisStore>, hwid: String) -> Self {
        AppContext {
            config,
            license_store,
            hwid,
            supervisor: BotSupervisor::new(),
        }
    }
}

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let hwid = machine_hwid(config.machine_id.as_deref()).map_err(|err| {
        ServerError::InitializeError(format!("could not determine the machine id: {err}"))
    })?;
    log::info!("Server - HWID of this machine is {}", hwid);

    let license_store = match config.license_db_uri.as_deref() {
        Some(uri) => Some(
            RedisStore::open(uri).map_err(|err| ServerError::InitializeError(err.to_string()))?,
        ),
        None => None,
    };

    let ctx = web::Data::new(AppContext::new(config, license_store, hwid));
    let srv = create_server_instance(ctx.clone())?;
    srv.await?;

    // The HTTP server is down, take the bot down with it
    if ctx.supervisor.stop().await.is_ok() {
        log::info!("Server - Stopped the running bot on shutdown");
    }
    Ok(())
}

pub fn create_server_instance(ctx: web::Data<AppContext>) -> Result<Server, ServerError> {
    let host = ctx.config.host.clone();
    let port = ctx.config.port;
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("growshop::access_log"))
            .app_data(ctx.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run();

    log::info!("Server - Dashboard listening on http://{}:{}", host, port);
    Ok(srv)
}
