use super::controller::{login_user, me, register_user, update_me};
use actix_web::web;

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register_user))
            .route("/login", web::post().to(login_user))
            .route("/me", web::get().to(me))
            .route("/me", web::patch().to(update_me)),
    );
}
