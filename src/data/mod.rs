pub mod models;
pub mod synthetic;
pub mod upload;
