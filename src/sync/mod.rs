pub mod bootstrapper;

pub use bootstrapper::{Bootstrapper, SyncReport};
