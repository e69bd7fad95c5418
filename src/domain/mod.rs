//! Domain layer: records, value objects and the ports the application layer
//! depends on. Nothing in here performs I/O.

pub mod catalog;
pub mod money;
pub mod order;
pub mod payment;
pub mod ports;
pub mod promo;
pub mod user;
