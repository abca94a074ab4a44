//! Composition of the calendar module: stores, service, clients and routes.

use std::sync::Arc;

use anyhow::Context;
use calendar_sdk::{CalendarClientV1, User};
use tracing::{debug, info};

use crate::api::rest::auth::JwtKeys;
use crate::api::rest::routes;
use crate::config::{CalendarConfig, StoreBackend};
use crate::domain::repo::{EventStore, UserDirectory};
use crate::domain::service::Service;
use crate::domain::timezone;
use crate::infra::storage::db;
use crate::infra::{
    InMemoryEventStore, InMemoryUserDirectory, SeaOrmEventStore, SeaOrmUserDirectory,
};
use crate::local_client::CalendarLocalClient;

/// Calendar module.
///
/// Owns the event store selected by configuration; nothing else in the
/// process holds a store.
#[derive(Clone)]
pub struct CalendarModule {
    service: Arc<Service>,
    keys: Arc<JwtKeys>,
}

impl CalendarModule {
    /// Build the stores named by `cfg` and wire the service.
    ///
    /// # Errors
    ///
    /// Fails on an invalid seeded user timezone, a missing `database`
    /// section for the database backend, or a database that cannot be
    /// reached or migrated.
    pub async fn init(cfg: &CalendarConfig) -> anyhow::Result<Self> {
        info!(backend = ?cfg.backend, precision = ?cfg.time_to_precision, "Initializing calendar module");

        for u in &cfg.users {
            timezone::validate(&u.timezone)
                .with_context(|| format!("calendar.users: user '{}'", u.login))?;
        }
        let users: Vec<User> = cfg.users.iter().map(User::from).collect();

        let (store, directory): (Arc<dyn EventStore>, Arc<dyn UserDirectory>) = match cfg.backend
        {
            StoreBackend::Memory => (
                Arc::new(InMemoryEventStore::new(cfg.time_to_precision)),
                Arc::new(InMemoryUserDirectory::new(users)),
            ),
            StoreBackend::Database => {
                let db_cfg = cfg.database.as_ref().ok_or_else(|| {
                    anyhow::anyhow!("calendar.database is required for the database backend")
                })?;
                let conn = db::connect(db_cfg).await?;

                let directory = SeaOrmUserDirectory::new(conn.clone());
                directory.seed(&users).await?;

                (
                    Arc::new(SeaOrmEventStore::new(conn, cfg.time_to_precision)),
                    Arc::new(directory),
                )
            }
        };

        debug!(users = cfg.users.len(), "Calendar stores ready");
        Ok(Self::from_parts(store, directory, JwtKeys::from_secret(&cfg.auth.jwt_secret)))
    }

    /// Wire the module from already-built stores.
    #[must_use]
    pub fn from_parts(
        store: Arc<dyn EventStore>,
        users: Arc<dyn UserDirectory>,
        keys: JwtKeys,
    ) -> Self {
        Self {
            service: Arc::new(Service::new(store, users)),
            keys: Arc::new(keys),
        }
    }

    #[must_use]
    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    #[must_use]
    pub fn keys(&self) -> Arc<JwtKeys> {
        self.keys.clone()
    }

    /// In-process API for other components.
    #[must_use]
    pub fn client(&self) -> Arc<dyn CalendarClientV1> {
        Arc::new(CalendarLocalClient::new(self.service.clone()))
    }

    /// REST routes under `/calendar/v1`.
    #[must_use]
    pub fn router(&self) -> axum::Router {
        info!("Registering calendar REST routes");
        routes::router(self.service.clone(), self.keys.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, UserConfig};
    use calendar_sdk::CallerContext;
    use uuid::Uuid;

    fn user(tz: &str) -> UserConfig {
        UserConfig {
            id: Uuid::new_v4(),
            login: "dave".to_owned(),
            timezone: tz.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_init_memory_backend() {
        let cfg = CalendarConfig {
            users: vec![user("Europe/Riga")],
            ..CalendarConfig::default()
        };
        let module = CalendarModule::init(&cfg).await.unwrap();

        let metrics = module
            .client()
            .metrics(&CallerContext::anonymous())
            .await
            .unwrap();
        assert_eq!(metrics.users, 1);
    }

    #[tokio::test]
    async fn test_init_rejects_bad_seed_timezone() {
        let cfg = CalendarConfig {
            users: vec![user("Europe/Nowhere")],
            ..CalendarConfig::default()
        };
        let err = CalendarModule::init(&cfg).await.err().unwrap();
        assert!(format!("{err:#}").contains("dave"));
    }

    #[tokio::test]
    async fn test_database_backend_requires_section() {
        let cfg = CalendarConfig {
            backend: StoreBackend::Database,
            ..CalendarConfig::default()
        };
        assert!(CalendarModule::init(&cfg).await.is_err());
    }

    #[tokio::test]
    async fn test_init_database_backend_seeds_users() {
        let alice = user("Asia/Tokyo");
        let cfg = CalendarConfig {
            backend: StoreBackend::Database,
            database: Some(DatabaseConfig {
                dsn: "sqlite::memory:".to_owned(),
                max_conns: Some(1),
                ..DatabaseConfig::default()
            }),
            users: vec![alice.clone()],
            ..CalendarConfig::default()
        };
        let module = CalendarModule::init(&cfg).await.unwrap();

        let found = module.service().authenticate(alice.id).await.unwrap();
        assert_eq!(found.timezone, "Asia/Tokyo");
    }
}
