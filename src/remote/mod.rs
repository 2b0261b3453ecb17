pub mod executor;
pub mod transfer;

pub use executor::CommandExecutor;
pub use transfer::TransferChannel;
