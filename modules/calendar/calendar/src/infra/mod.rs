pub mod storage;

pub use storage::memory::{InMemoryEventStore, InMemoryUserDirectory};
pub use storage::sea_orm_repo::SeaOrmEventStore;
pub use storage::users_sea_repo::SeaOrmUserDirectory;
