pub mod config;
pub mod error;
pub mod explorer;
pub mod listing;
pub mod protocol;
pub mod remote;
pub mod server;
pub mod sessions;
pub mod transport;

pub use error::ExplorerError;
pub type Result<T> = std::result::Result<T, ExplorerError>;
