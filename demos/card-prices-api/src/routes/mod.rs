pub mod cards;
pub mod listings;
