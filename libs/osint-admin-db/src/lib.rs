pub mod db;
pub mod models;
pub mod repositories;

pub use db::{init_db, ping};
pub use sqlx;
