use crate::transport::Transport;
use crate::Result;
use tracing::info;

/// Runs one-shot shell commands over a transport. Each call gets its own
/// channel; a failed command leaves the session usable.
pub struct CommandExecutor<'a> {
    conn: &'a dyn Transport,
}

impl<'a> CommandExecutor<'a> {
    pub fn new(conn: &'a dyn Transport) -> Self {
        Self { conn }
    }

    /// Execute `command` and return stdout and stderr combined.
    pub fn exec(&self, command: &str) -> Result<Vec<u8>> {
        info!("exec: {}", command);
        self.conn.exec(command)
    }

    /// Execute `command` for its side effect only. Failures still propagate.
    pub fn exec_only(&self, command: &str) -> Result<()> {
        self.exec(command).map(|_| ())
    }
}
