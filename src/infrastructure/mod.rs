pub mod core;
pub mod mock;
pub mod observability;
pub mod sentiment;
pub mod stooq;

pub use self::core::{HttpClientFactory, RetrievalChain};
