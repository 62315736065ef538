pub mod http_client_factory;
pub mod retrieval;

pub use http_client_factory::HttpClientFactory;
pub use retrieval::{DirectRetriever, ProxyRetriever, RetrievalChain};
