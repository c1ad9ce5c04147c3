//! Client-side identifiers for bills and payments.

use chrono::Utc;
use uuid::Uuid;

/// Bill id: time-ordered UUID (v7), valid under the bills API charset
pub(crate) fn bill_id() -> String {
    Uuid::now_v7().to_string()
}

/// Payment transaction id: milliseconds since epoch times 1000 plus a random suffix
pub(crate) fn transaction_id() -> String {
    let millis = Utc::now().timestamp_millis() as u128;
    let suffix = Uuid::new_v4().as_u128() % 1000;
    (millis * 1000 + suffix).to_string()
}
