pub mod account;
pub mod client;
pub mod market_data;
pub mod trading;

pub use client::RestV2;
