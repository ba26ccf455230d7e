//! Positional layouts of the wire records.
//!
//! Each builder lists the array index of every named field; indices the
//! protocol reserves (placeholders) are left out.

use crate::core::kernel::RecordBuilder;

pub const TRADING_TICKER: RecordBuilder = RecordBuilder::new(
    "TradingTicker",
    &[
        (0, "symbol"),
        (1, "bid"),
        (2, "bidSize"),
        (3, "ask"),
        (4, "askSize"),
        (5, "dailyChange"),
        (6, "dailyChangePerc"),
        (7, "lastPrice"),
        (8, "volume"),
        (9, "high"),
        (10, "low"),
    ],
);

pub const FUNDING_TICKER: RecordBuilder = RecordBuilder::new(
    "FundingTicker",
    &[
        (0, "symbol"),
        (1, "frr"),
        (2, "bid"),
        (3, "bidPeriod"),
        (4, "bidSize"),
        (5, "ask"),
        (6, "askPeriod"),
        (7, "askSize"),
        (8, "dailyChange"),
        (9, "dailyChangePerc"),
        (10, "lastPrice"),
        (11, "volume"),
        (12, "high"),
        (13, "low"),
        (16, "frrAmountAvailable"),
    ],
);

pub const CANDLE: RecordBuilder = RecordBuilder::new(
    "Candle",
    &[
        (0, "mts"),
        (1, "open"),
        (2, "close"),
        (3, "high"),
        (4, "low"),
        (5, "volume"),
    ],
);

pub const PUBLIC_TRADE: RecordBuilder = RecordBuilder::new(
    "PublicTrade",
    &[(0, "id"), (1, "mts"), (2, "amount"), (3, "price")],
);

pub const TRADE: RecordBuilder = RecordBuilder::new(
    "Trade",
    &[
        (0, "id"),
        (1, "symbol"),
        (2, "mtsCreate"),
        (3, "orderID"),
        (4, "execAmount"),
        (5, "execPrice"),
        (6, "orderType"),
        (7, "orderPrice"),
        (8, "maker"),
        (9, "fee"),
        (10, "feeCurrency"),
        (11, "cid"),
    ],
);

pub const ORDER: RecordBuilder = RecordBuilder::new(
    "Order",
    &[
        (0, "id"),
        (1, "gid"),
        (2, "cid"),
        (3, "symbol"),
        (4, "mtsCreate"),
        (5, "mtsUpdate"),
        (6, "amount"),
        (7, "amountOrig"),
        (8, "type"),
        (9, "typePrev"),
        (10, "mtsTIF"),
        (12, "flags"),
        (13, "status"),
        (16, "price"),
        (17, "priceAvg"),
        (18, "priceTrailing"),
        (19, "priceAuxLimit"),
        (23, "notify"),
        (24, "hidden"),
        (25, "placedId"),
        (28, "routing"),
        (31, "meta"),
    ],
);

pub const POSITION: RecordBuilder = RecordBuilder::new(
    "Position",
    &[
        (0, "symbol"),
        (1, "status"),
        (2, "amount"),
        (3, "basePrice"),
        (4, "marginFunding"),
        (5, "marginFundingType"),
        (6, "pl"),
        (7, "plPerc"),
        (8, "liquidationPrice"),
        (9, "leverage"),
        (11, "id"),
        (12, "mtsCreate"),
        (13, "mtsUpdate"),
        (15, "type"),
        (17, "collateral"),
        (18, "collateralMin"),
        (19, "meta"),
    ],
);

pub const WALLET: RecordBuilder = RecordBuilder::new(
    "Wallet",
    &[
        (0, "type"),
        (1, "currency"),
        (2, "balance"),
        (3, "unsettledInterest"),
        (4, "balanceAvailable"),
        (5, "description"),
        (6, "meta"),
    ],
);

pub const FUNDING_OFFER: RecordBuilder = RecordBuilder::new(
    "FundingOffer",
    &[
        (0, "id"),
        (1, "symbol"),
        (2, "mtsCreate"),
        (3, "mtsUpdate"),
        (4, "amount"),
        (5, "amountOrig"),
        (6, "type"),
        (9, "flags"),
        (10, "status"),
        (14, "rate"),
        (15, "period"),
        (16, "notify"),
        (17, "hidden"),
        (19, "renew"),
        (20, "rateReal"),
    ],
);

/// Shared by funding credits and loans
const FUNDING_POSITION_FIELDS: &[(usize, &str)] = &[
    (0, "id"),
    (1, "symbol"),
    (2, "side"),
    (3, "mtsCreate"),
    (4, "mtsUpdate"),
    (5, "amount"),
    (6, "flags"),
    (7, "status"),
    (11, "rate"),
    (12, "period"),
    (13, "mtsOpening"),
    (14, "mtsLastPayout"),
    (15, "notify"),
    (16, "hidden"),
    (18, "renew"),
    (20, "noClose"),
    (21, "positionPair"),
];

pub const FUNDING_CREDIT: RecordBuilder =
    RecordBuilder::new("FundingCredit", FUNDING_POSITION_FIELDS);

pub const FUNDING_LOAN: RecordBuilder = RecordBuilder::new("FundingLoan", FUNDING_POSITION_FIELDS);

pub const LEDGER_ENTRY: RecordBuilder = RecordBuilder::new(
    "LedgerEntry",
    &[
        (0, "id"),
        (1, "currency"),
        (3, "mts"),
        (5, "amount"),
        (6, "balance"),
        (8, "description"),
    ],
);

pub const ALERT: RecordBuilder = RecordBuilder::new(
    "Alert",
    &[(0, "key"), (1, "type"), (2, "symbol"), (3, "price")],
);

pub const NOTIFICATION: RecordBuilder = RecordBuilder::new(
    "Notification",
    &[
        (0, "mts"),
        (1, "type"),
        (2, "messageID"),
        (4, "notifyInfo"),
        (5, "code"),
        (6, "status"),
        (7, "text"),
    ],
);

pub const CURRENCY: RecordBuilder = RecordBuilder::new(
    "Currency",
    &[
        (0, "id"),
        (1, "name"),
        (2, "pool"),
        (3, "explorer"),
        (4, "symbol"),
        (5, "walletFx"),
    ],
);

pub const USER_INFO: RecordBuilder = RecordBuilder::new(
    "UserInfo",
    &[
        (0, "id"),
        (1, "email"),
        (2, "username"),
        (3, "mtsAccountCreate"),
        (4, "verified"),
        (5, "verificationLevel"),
        (7, "timezone"),
        (8, "locale"),
        (9, "company"),
    ],
);

pub const INVOICE: RecordBuilder = RecordBuilder::new(
    "Invoice",
    &[(0, "invoiceHash"), (1, "invoice"), (4, "amount")],
);

pub const STATUS_MESSAGES_DERIV: RecordBuilder = RecordBuilder::new(
    "StatusMessagesDeriv",
    &[
        (0, "key"),
        (1, "timestamp"),
        (3, "price"),
        (4, "priceSpot"),
        (6, "fundBal"),
        (8, "fundingEventMts"),
        (9, "fundingAccrued"),
        (10, "fundingStep"),
        (12, "currentFunding"),
        (15, "markPrice"),
        (18, "openInterest"),
    ],
);

/// Order flag closing the position the order reduces
pub const ORDER_FLAG_POS_CLOSE: u64 = 512;
