// shop/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::cart_handlers;

// Liveness only; storage health shows up as request failures.
async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called in `main.rs` (and by tests) to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      // One resource, dispatched on method. Every verb needs an
      // `X-User-ID` header resolved by the `AuthenticatedUser` extractor.
      .service(
        web::resource("/carts")
          .route(web::post().to(cart_handlers::add_to_cart_handler))
          .route(web::get().to(cart_handlers::list_cart_handler))
          .route(web::delete().to(cart_handlers::delete_cart_items_handler))
          .route(web::patch().to(cart_handlers::update_quantity_handler)),
      ),
  );
}
