use crate::listing::DirEntry;
use crate::Result;

pub mod remote;

pub use remote::{Connector, RemoteFileExplorer, SshFileExplorer};

/// Capability set offered to the request layer. Call `init` once before
/// anything else and `close` once when done.
pub trait FileExplorer: Send {
    fn init(&mut self) -> Result<()>;
    fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>>;
    fn move_path(&self, path: &str, new_path: &str) -> Result<()>;
    fn copy(&self, path: &str, new_path: &str) -> Result<()>;
    fn delete(&self, path: &str) -> Result<()>;
    fn chmod(&self, path: &str, perms_code: &str, recursive: bool) -> Result<()>;
    fn mkdir(&self, path: &str, name: &str) -> Result<()>;
    fn save(&self, path: &str, data: &[u8]) -> Result<()>;
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn close(&mut self) -> Result<()>;
}

/// Prepare a path for interpolation into a shell command.
///
/// Relative paths are anchored at `/`; absolute paths are wrapped in single
/// quotes. Only the absolute form is protected against spaces.
pub fn normalize_path(path: &str) -> String {
    if !path.starts_with('/') {
        return format!("/{}", path);
    }
    format!("'{}'", path)
}

/// Anchor a path at `/` without shell quoting, for the file-transfer channel.
pub fn anchor_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
