pub mod card;
pub mod task;

pub use card::*;
pub use task::*;
