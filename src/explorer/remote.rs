use crate::explorer::{anchor_path, normalize_path, FileExplorer};
use crate::listing::{parse_ls_output, DirEntry};
use crate::remote::{CommandExecutor, TransferChannel};
use crate::transport::ssh::{SshConfig, SshConnection};
use crate::transport::Transport;
use crate::{ExplorerError, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Opens transports for a [`RemoteFileExplorer`].
pub trait Connector: Send {
    fn connect(&self) -> Result<Box<dyn Transport>>;
    /// Human readable target, for logs.
    fn target(&self) -> String;
}

impl Connector for SshConfig {
    fn connect(&self) -> Result<Box<dyn Transport>> {
        Ok(Box::new(SshConnection::connect(self)?))
    }

    fn target(&self) -> String {
        format!("{}@{}", self.credentials.user, self.credentials.host)
    }
}

/// File explorer that drives a POSIX shell and the file-transfer channel
/// over a single remote connection.
pub struct RemoteFileExplorer<C: Connector = SshConfig> {
    connector: C,
    staging_dir: PathBuf,
    conn: Option<Box<dyn Transport>>,
}

pub type SshFileExplorer = RemoteFileExplorer<SshConfig>;

impl<C: Connector> RemoteFileExplorer<C> {
    pub fn new(connector: C, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            connector,
            staging_dir: staging_dir.into(),
            conn: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> Result<&dyn Transport> {
        self.conn.as_deref().ok_or(ExplorerError::NotConnected)
    }

    fn executor(&self) -> Result<CommandExecutor<'_>> {
        Ok(CommandExecutor::new(self.conn()?))
    }

    fn transfer(&self) -> Result<TransferChannel<'_>> {
        Ok(TransferChannel::new(self.conn()?, &self.staging_dir))
    }
}

impl<C: Connector> FileExplorer for RemoteFileExplorer<C> {
    fn init(&mut self) -> Result<()> {
        if self.conn.is_some() {
            return Err(ExplorerError::Connection("Already connected".into()));
        }
        let target = self.connector.target();
        info!("Connecting to {}...", target);
        self.conn = Some(self.connector.connect()?);
        info!("Connected to {}.", target);
        Ok(())
    }

    fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        let output = self
            .executor()?
            .exec(&format!("ls --time-style=long-iso -l {}", normalize_path(path)))?;
        let entries = parse_ls_output(&String::from_utf8_lossy(&output));
        debug!("Listed {} entries in {}", entries.len(), path);
        Ok(entries)
    }

    fn move_path(&self, path: &str, new_path: &str) -> Result<()> {
        self.executor()?
            .exec_only(&format!("mv {} {}", normalize_path(path), normalize_path(new_path)))
    }

    fn copy(&self, path: &str, new_path: &str) -> Result<()> {
        self.executor()?
            .exec_only(&format!("cp -r {} {}", normalize_path(path), normalize_path(new_path)))
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.executor()?.exec_only(&format!("rm -r {}", normalize_path(path)))
    }

    fn chmod(&self, path: &str, perms_code: &str, recursive: bool) -> Result<()> {
        let flag = if recursive { "-r " } else { "" };
        self.executor()?
            .exec_only(&format!("chmod {}{} {}", flag, perms_code, normalize_path(path)))
    }

    fn mkdir(&self, path: &str, name: &str) -> Result<()> {
        self.executor()?
            .exec_only(&format!("mkdir -p {}/{}", normalize_path(path), name))
    }

    fn save(&self, path: &str, data: &[u8]) -> Result<()> {
        self.transfer()?.write(&anchor_path(path), data)
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        self.transfer()?.read(&anchor_path(path))
    }

    fn close(&mut self) -> Result<()> {
        let conn = self.conn.take().ok_or(ExplorerError::NotConnected)?;
        info!("Closing connection to {}", self.connector.target());
        conn.close()
    }
}
