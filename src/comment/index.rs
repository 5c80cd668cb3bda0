use super::controller::delete_comment;
use actix_web::web;

pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/comments").route("/{id}", web::delete().to(delete_comment)),
    );
}
