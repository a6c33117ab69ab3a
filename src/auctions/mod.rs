pub mod client;
pub mod error;
pub mod fake;
pub mod models;
pub mod retry;
pub mod source;

pub use client::AuctionApiClient;
pub use error::FetchError;
pub use models::{Auction, ItemDetails};
pub use retry::{RetryPolicy, RetryingClient};
pub use source::AuctionSource;
