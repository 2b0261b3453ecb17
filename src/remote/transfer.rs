use crate::transport::Transport;
use crate::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

const READ_PREFIX: &str = "sshfe-readfile-";
const WRITE_PREFIX: &str = "sshfe-edit-";

/// Moves whole files between the remote host and memory, staging every
/// payload through a local temporary file. The staging file is removed
/// when the operation returns, on error paths included.
pub struct TransferChannel<'a> {
    conn: &'a dyn Transport,
    staging_dir: &'a Path,
}

impl<'a> TransferChannel<'a> {
    pub fn new(conn: &'a dyn Transport, staging_dir: &'a Path) -> Self {
        Self { conn, staging_dir }
    }

    fn staging_file(&self, prefix: &str) -> Result<NamedTempFile> {
        Ok(tempfile::Builder::new().prefix(prefix).tempfile_in(self.staging_dir)?)
    }

    /// Fetch the full contents of `remote`.
    pub fn read(&self, remote: &str) -> Result<Vec<u8>> {
        let mut staging = self.staging_file(READ_PREFIX)?;
        let copied = self.conn.download(remote, staging.as_file_mut())?;
        debug!("Downloaded {} bytes from {} via {:?}", copied, remote, staging.path());
        Ok(std::fs::read(staging.path())?)
    }

    /// Replace `remote` with `data`.
    pub fn write(&self, remote: &str, data: &[u8]) -> Result<()> {
        let mut staging = self.staging_file(WRITE_PREFIX)?;
        staging.write_all(data)?;
        staging.flush()?;

        let mut reader = staging.reopen()?;
        let copied = self.conn.upload(&mut reader, remote)?;
        debug!("Uploaded {} bytes to {} via {:?}", copied, remote, staging.path());
        Ok(())
    }
}
