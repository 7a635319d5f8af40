pub mod http;
pub mod storage;

pub use http::HttpFetcher;
pub use storage::LocalStorage;
