use std::time::Duration;

use actix_web::{web, App, HttpServer};
use campus_backend::config::db::db_url;
use campus_backend::infra::state::build_state;
use campus_backend::middleware::{RequestTrace, StructuredLogger};
use campus_backend::routes;
use campus_backend::state::security_config::SecurityConfig;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("PORT must be a valid port number");
            std::process::exit(1);
        });

    let jwt = match std::env::var("JWT_SECRET") {
        Ok(jwt) => jwt,
        Err(_) => {
            eprintln!("JWT_SECRET must be set");
            std::process::exit(1);
        }
    };
    let mut security_config = SecurityConfig::new(jwt.as_bytes());
    if let Ok(ttl) = std::env::var("JWT_EXPIRATION") {
        match ttl.parse::<u64>() {
            Ok(secs) => {
                security_config = security_config.with_token_ttl(Duration::from_secs(secs));
            }
            Err(_) => {
                eprintln!("JWT_EXPIRATION must be a number of seconds");
                std::process::exit(1);
            }
        }
    }

    let url = match db_url() {
        Ok(url) => url,
        Err(e) => {
            eprintln!("invalid database configuration: {e}");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_db_url(url)
        .with_security(security_config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(host = %host, port, "starting campus backend");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
