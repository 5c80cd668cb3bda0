use super::post_controller::{
    create_post, delete_post, get_post, list_posts, my_drafts, my_posts, trending_posts,
    update_post,
};
use crate::comment::controller::{add_comment, list_comments};
use crate::like::controller::{like_post, unlike_post};
use actix_web::web;

pub fn post_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .route("/trending", web::get().to(trending_posts))
            .route("/mine", web::get().to(my_posts))
            .route("/drafts", web::get().to(my_drafts))
            .route("", web::get().to(list_posts))
            .route("", web::post().to(create_post))
            .route("/{id}/like", web::post().to(like_post))
            .route("/{id}/like", web::delete().to(unlike_post))
            .route("/{id}/comments", web::post().to(add_comment))
            .route("/{id}/comments", web::get().to(list_comments))
            .route("/{id}", web::get().to(get_post))
            .route("/{id}", web::patch().to(update_post))
            .route("/{id}", web::delete().to(delete_post)),
    );
}
