use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use mongodb::bson::doc;
use serde_json::json;

mod comment;
mod database;
mod like;
mod middleware;
mod post;
mod router;
mod user;
mod utils;

use comment::service::CommentService;
use like::service::LikeService;
use middleware::not_found::not_found;
use post::post_service::PostService;
use router::index::routes;
use user::service::UserService;
use utils::error::CustomError;

#[get("/")]
async fn default() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "ok": true,
        "name": "MiniSocial API",
    }))
}

#[get("/health")]
async fn health(mongo_client: web::Data<mongodb::Client>) -> impl Responder {
    let ping = mongo_client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await;

    let db = database::app_database(mongo_client.get_ref());
    let db_name = db.name().to_string();

    HttpResponse::Ok().json(json!({
        "ok": true,
        "db_state": if ping.is_ok() { "connected" } else { "disconnected" },
        "db_name": db_name,
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logger with environment variable support
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mongo_client = database::connect_to_mongo()
        .await
        .expect("Failed to connect to MongoDB");

    let user_service = web::Data::new(UserService::new(&mongo_client));
    let post_service = web::Data::new(PostService::new(&mongo_client));
    let like_service = web::Data::new(LikeService::new(&mongo_client));
    let comment_service = web::Data::new(CommentService::new(&mongo_client));

    // The unique indexes back the duplicate-like and duplicate-registration
    // guarantees, so refuse to start without them.
    user_service
        .ensure_indexes()
        .await
        .expect("Failed to create user indexes");
    post_service
        .ensure_indexes()
        .await
        .expect("Failed to create post indexes");
    like_service
        .ensure_indexes()
        .await
        .expect("Failed to create like indexes");
    comment_service
        .ensure_indexes()
        .await
        .expect("Failed to create comment indexes");

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(4000);

    info!("Starting server on http://localhost:{}", port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(mongo_client.clone()))
            .app_data(user_service.clone())
            .app_data(post_service.clone())
            .app_data(like_service.clone())
            .app_data(comment_service.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                CustomError::BadRequestError(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                CustomError::BadRequestError(err.to_string()).into()
            }))
            .configure(routes)
            .service(default)
            .service(health)
            .default_service(web::route().to(not_found))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}
