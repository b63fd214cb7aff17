use crate::handlers;
use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig, max_json_payload_size: usize) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(max_json_payload_size)
            .error_handler(handlers::json_error_handler),
    )
    .route("/", web::get().to(handlers::root))
    .route("/health", web::get().to(handlers::health_check))
    .route("/simplify", web::post().to(handlers::simplify));
}
