#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod deck;
pub mod error;
pub mod metrics;
pub mod round;
