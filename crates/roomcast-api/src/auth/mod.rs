pub mod middleware;
pub mod models;
