use std::env;
use std::sync::Arc;

use actix_web::web;
use campus_market::persistence::json_file::JsonFileStore;
use campus_market::{build_server, AppState, CommerceService, GeminiClient};
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("PORT must be a valid number");
    let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

    let persistence = JsonFileStore::new(&data_dir).expect("Failed to open the data directory");
    let service =
        CommerceService::new(Arc::new(persistence)).expect("Failed to load persisted state");
    let state = web::Data::new(AppState {
        service,
        ai: GeminiClient::from_env(),
    });

    log::info!("Starting server at http://{}:{}", host, port);

    build_server(state, &host, port)?.await
}
