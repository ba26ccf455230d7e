pub mod builder;
pub mod converters;
pub mod models;
pub mod types;
pub mod v1;
pub mod v2;

// Re-export main types for easier importing
pub use builder::{build_client, ClientBuilder};
pub use types::{
    from_record, Candle, FundingOffer, FundingOfferRequest, FundingTicker, HistoryQuery, Order,
    OrderRequest, Position, TradingTicker, TransferRequest, Wallet,
};
pub use v1::{LegacyOrderRequest, RestV1};
pub use v2::RestV2;
