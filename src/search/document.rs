use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auctions::Auction;

/// Fields covered by the text index
pub const TEXT_SEARCH_FIELDS: [&str; 3] = ["make", "model", "color"];

/// Field the index sorts on when looking for the newest document
pub const SORT_FIELD: &str = "updated_at_ts";

/// A flattened auction projection stored in the search index
///
/// `updated_at_ts` duplicates `updated_at` as Unix milliseconds; the index
/// sorts on the integer because RFC 3339 strings with variable fractional
/// precision do not sort reliably.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub id: Uuid,
    pub seller: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub mileage: i32,
    pub image_url: Option<String>,
    pub current_high_bid: Option<i64>,
    pub auction_end: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_at_ts: i64,
}

impl From<Auction> for SearchDocument {
    fn from(auction: Auction) -> Self {
        SearchDocument {
            id: auction.id,
            seller: auction.seller,
            make: auction.item.make,
            model: auction.item.model,
            year: auction.item.year,
            color: auction.item.color,
            mileage: auction.item.mileage,
            image_url: auction.item.image_url,
            current_high_bid: auction.current_high_bid,
            auction_end: auction.auction_end,
            updated_at: auction.updated_at,
            updated_at_ts: auction.updated_at.timestamp_millis(),
        }
    }
}
