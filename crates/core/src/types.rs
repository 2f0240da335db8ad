/// Order sessions are keyed by a random v4 UUID.
pub type SessionId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Prices are whole US dollars. Signed so discounts can be represented.
pub type Dollars = i64;
