//! SeaORM entity definitions for the dealer management domain.

pub mod branch;
pub mod dealer;
pub mod product_supply;
pub mod role;
pub mod user;
