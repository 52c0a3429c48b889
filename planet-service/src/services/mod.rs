pub mod database;
pub mod store;

pub use database::PlanetDb;
pub use store::{InMemoryPlanetStore, PlanetStore, StoreError};
