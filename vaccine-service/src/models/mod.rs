pub mod dose;
pub mod vaccine;

pub use dose::{Dose, DoseStatus};
pub use vaccine::Vaccine;
