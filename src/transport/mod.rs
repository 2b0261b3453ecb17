use crate::Result;
use std::io::{Read, Write};

pub mod ssh;


/// A live, authenticated connection to the remote host.
pub trait Transport: Send {
    /// Run `command` in a fresh channel and return stdout and stderr combined.
    /// A non-zero exit status is an error.
    fn exec(&self, command: &str) -> Result<Vec<u8>>;
    /// Stream the remote file at `remote` into `dest`. Returns bytes copied.
    fn download(&self, remote: &str, dest: &mut dyn Write) -> Result<u64>;
    /// Create or truncate the remote file at `remote` and stream `src` into it.
    fn upload(&self, src: &mut dyn Read, remote: &str) -> Result<u64>;
    /// Tear the connection down.
    fn close(&self) -> Result<()>;
}

/// Size of each read/write issued on the file-transfer sub-protocol.
pub const TRANSFER_CHUNK_SIZE: usize = 32 * 1024;

/// Copy `src` into `dest` in fixed [`TRANSFER_CHUNK_SIZE`] chunks.
pub fn copy_chunked(src: &mut dyn Read, dest: &mut dyn Write) -> std::io::Result<u64> {
    let mut buf = vec![0u8; TRANSFER_CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        dest.write_all(&buf[..n])?;
        total += n as u64;
    }
    dest.flush()?;
    Ok(total)
}
