pub mod planet;

pub use planet::{coerce_id, solar_system, valid_id_range, Planet};
