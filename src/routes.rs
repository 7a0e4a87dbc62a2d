use actix_web::{get, http::header::ContentType, post, web, HttpResponse, Responder};

use crate::{
    data_objects::{LicenseRequest, LicenseResponse, LifecycleResponse, StartBotRequest},
    errors::{LicenseError, LifecycleError},
    license::validate_license,
    server::AppContext,
    supervisor::launch_bot,
};

/* Routes of the control panel.
 * Each route is a thin shell, license checks live in `license`
 * and the bot lifecycle in `supervisor`.
 */

const DASHBOARD: &str = include_str!("../frontend/index.html");

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard)
        .service(validate_license_route)
        .service(start_bot)
        .service(stop_bot);
}

#[get("/")]
pub async fn dashboard() -> impl Responder {
    HttpResponse::Ok()
        .insert_header(ContentType::html())
        .body(DASHBOARD)
}

#[post("/validate-license")]
pub async fn validate_license_route(
    body: web::Json<LicenseRequest>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, LicenseError> {
    let store = match ctx.license_store.as_ref() {
        Some(store) => store,
        None => {
            let err = LicenseError::Connection("LICENSE_DB_URI is not set".to_string());
            log::error!("Validate License - {}", err.to_string());
            return Err(err);
        }
    };

    match validate_license(store, &body.license_key, &ctx.hwid).await {
        Ok(()) => {
            log::info!("Validate License - License accepted");
            Ok(HttpResponse::Ok().json(LicenseResponse::valid()))
        }
        Err(err) => {
            log::warn!("Validate License - License refused: {}", err.to_string());
            Err(err)
        }
    }
}

#[post("/start-bot")]
pub async fn start_bot(
    body: web::Json<StartBotRequest>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, LifecycleError> {
    let req = body.into_inner();
    let result = ctx
        .supervisor
        .start(move || async move {
            let settings = req.bot_settings()?;
            let database_uri = req.database_uri()?;
            launch_bot(req.token.trim(), settings, database_uri).await
        })
        .await;

    match result {
        Ok(username) => {
            log::info!("Start Bot - Bot started as @{}", username);
            let message = format!("Bot started as @{username}");
            Ok(HttpResponse::Ok().json(LifecycleResponse::success(&message)))
        }
        Err(err) => {
            log::warn!("Start Bot - Could not start bot: {}", err.to_string());
            Err(err)
        }
    }
}

#[post("/stop-bot")]
pub async fn stop_bot(ctx: web::Data<AppContext>) -> Result<HttpResponse, LifecycleError> {
    ctx.supervisor.stop().await?;
    Ok(HttpResponse::Ok().json(LifecycleResponse::success("Bot stopped successfully.")))
}
