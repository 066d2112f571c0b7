pub mod config;
pub mod evaluate;
pub mod schema;
pub mod validate;
