use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("SSH connection failed: {0}")]
    Connection(String),

    #[error("Remote command '{command}' failed (exit {status}): {output}")]
    RemoteCommand {
        command: String,
        status: i32,
        output: String,
    },

    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Path not allowed: {0}")]
    PathNotAllowed(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
