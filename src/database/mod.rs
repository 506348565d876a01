pub mod manager;
pub mod models;
pub mod postgres;
pub mod query_builder;
pub mod repository;
pub mod resource;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use postgres::PgStore;
pub use query_builder::{PartialUpdateBuilder, UpdateError, UpdateOperation};
pub use repository::{ResourceError, ResourceRepository};
pub use resource::Resource;
pub use store::{RecordStore, UserStore};
