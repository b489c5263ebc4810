use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};

use taskboard::auth::AuthSettings;
use taskboard::config::Config;
use taskboard::routes;
use taskboard::state::AppState;

fn cors(config: &Config) -> Cors {
    let cors = match &config.cors_allowed_origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };
    cors.allow_any_method().allow_any_header().max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    let state = web::Data::new(AppState::in_memory(AuthSettings::from(&config)));

    info!("Starting TaskBoard server at {}", config.server_url());
    let bind = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors(&config))
            .wrap(Logger::default())
            .configure(routes::configure_app)
    })
    .bind(bind)?
    .run()
    .await
}
