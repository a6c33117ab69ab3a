pub mod document;
pub mod error;
pub mod fake;
pub mod meili;
pub mod store;

pub use document::SearchDocument;
pub use error::SearchStoreError;
pub use meili::MeiliSearchStore;
pub use store::SearchStore;

#[cfg(test)]
mod tests;
