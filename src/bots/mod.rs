pub mod first;
pub mod human;
pub mod random;
pub mod registry;

pub use first::FirstMatchBot;
pub use human::HumanBot;
pub use random::RandomBot;
