//! Query engines over the card price store.
//!
//! Each engine borrows a [`Connection`](crate::connection::Connection), holds
//! no state between calls and returns typed rows.

pub mod cards;
pub mod price_diffs;

pub use cards::{CardQuery, NameMatch};
pub use price_diffs::{DiffStrategy, PriceDiffQuery};
