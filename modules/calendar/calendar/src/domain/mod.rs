pub mod error;
pub mod filter;
pub mod repo;
pub mod service;
pub mod timezone;
pub mod window;

#[cfg(test)]
mod service_test;
