pub mod ai;
pub mod application;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod persistence;
pub mod store;

use actix_web::{middleware::Logger, web, App, HttpServer};

pub use ai::GeminiClient;
pub use application::commerce::CommerceService;

/// Everything the handlers need: the commerce core and the hosted-model
/// client.
pub struct AppState {
    pub service: CommerceService,
    pub ai: GeminiClient,
}

/// Route table, shared between `build_server` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::post().to(handlers::products::create_product))
            .route("", web::get().to(handlers::products::list_products))
            .route("/{id}", web::get().to(handlers::products::get_product))
            .route("/{id}", web::put().to(handlers::products::update_product))
            .route("/{id}", web::delete().to(handlers::products::delete_product)),
    )
    .service(
        web::scope("/orders")
            .route("", web::post().to(handlers::orders::create_order))
            .route("", web::get().to(handlers::orders::list_orders))
            .route("/{id}", web::get().to(handlers::orders::get_order))
            .route("/{id}/status", web::post().to(handlers::orders::advance_status))
            .route(
                "/{id}/driver-location",
                web::post().to(handlers::orders::update_driver_location),
            ),
    )
    .service(
        web::scope("/users")
            .route("", web::post().to(handlers::users::register_user))
            .route("", web::get().to(handlers::users::list_users))
            .route("/{id}", web::get().to(handlers::users::get_user))
            .route("/{id}", web::delete().to(handlers::users::delete_account))
            .route(
                "/{id}/delete-store",
                web::post().to(handlers::users::delete_store),
            )
            .route(
                "/{id}/schedule",
                web::post().to(handlers::users::attach_schedule),
            )
            .route("/{id}/zone", web::post().to(handlers::users::resolve_zone)),
    )
    .route(
        "/identity/verify",
        web::post().to(handlers::users::verify_identity),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((host.to_string(), port))?
    .run())
}
