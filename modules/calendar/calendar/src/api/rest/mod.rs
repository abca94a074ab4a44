pub mod auth;
pub mod dto;
pub mod error;
pub(crate) mod handlers;
pub mod problem;
pub mod routes;
