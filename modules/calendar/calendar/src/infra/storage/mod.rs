//! Event and user storage backends.

pub mod db;
pub mod entity;
pub mod mapper;
pub mod memory;
pub mod migrations;
pub mod sea_orm_repo;
pub mod users_sea_repo;

#[cfg(test)]
mod mapper_test;

use crate::domain::error::DomainError;

/// Storage failures keep their details in the message for logs only.
pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::storage(e.to_string())
}
