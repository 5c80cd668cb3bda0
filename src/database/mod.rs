mod db;

pub use db::{app_database, connect_to_mongo, is_duplicate_key_error};
