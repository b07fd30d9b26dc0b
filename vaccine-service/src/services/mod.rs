pub mod database;
pub mod memory;
pub mod store;

pub use database::MongoDb;
pub use memory::InMemoryStore;
pub use store::{DoseFilter, DoseStore, VaccineFilter, VaccineStore};
