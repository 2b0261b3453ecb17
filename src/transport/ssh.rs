use crate::transport::{copy_chunked, Transport};
use crate::{ExplorerError, Result};
use ssh2::{ExtendedData, Session};
use std::fmt;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_PORT: u16 = 22;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Password credentials for one remote login. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// `host` or `host:port`
    pub host: String,
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(host: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    fn socket_addrs(&self) -> Result<Vec<SocketAddr>> {
        let addrs = match self.host.to_socket_addrs() {
            Ok(addrs) => addrs.collect::<Vec<_>>(),
            Err(_) => (self.host.as_str(), DEFAULT_PORT)
                .to_socket_addrs()
                .map_err(|e| ExplorerError::Connection(format!("Cannot resolve {}: {}", self.host, e)))?
                .collect(),
        };
        if addrs.is_empty() {
            return Err(ExplorerError::Connection(format!("No address for {}", self.host)));
        }
        Ok(addrs)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SshConfig {
    pub credentials: Credentials,
    pub connect_timeout: Duration,
}

impl SshConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

pub struct SshConnection {
    session: Session,
    _tcp: TcpStream,
}

impl SshConnection {
    /// Dial, handshake and password-authenticate. Every failure is reported
    /// as [`ExplorerError::Connection`].
    pub fn connect(config: &SshConfig) -> Result<Self> {
        let creds = &config.credentials;
        let tcp = dial(&creds.socket_addrs()?, config.connect_timeout)?;

        let mut session = Session::new().map_err(|e| ExplorerError::Connection(e.to_string()))?;
        session.set_tcp_stream(tcp.try_clone().map_err(|e| ExplorerError::Connection(e.to_string()))?);
        session
            .handshake()
            .map_err(|e| ExplorerError::Connection(format!("Handshake with {} failed: {}", creds.host, e)))?;

        session
            .userauth_password(&creds.user, &creds.password)
            .map_err(|e| ExplorerError::Connection(format!("Authentication as {} failed: {}", creds.user, e)))?;
        if !session.authenticated() {
            return Err(ExplorerError::Connection(format!("Authentication as {} failed", creds.user)));
        }

        debug!("Authenticated to {} as {}", creds.host, creds.user);
        Ok(Self { session, _tcp: tcp })
    }

    fn sftp(&self) -> Result<ssh2::Sftp> {
        self.session
            .sftp()
            .map_err(|e| ExplorerError::Transfer(format!("SFTP init failed: {}", e)))
    }
}

fn dial(addrs: &[SocketAddr], timeout: Duration) -> Result<TcpStream> {
    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(tcp) => return Ok(tcp),
            Err(e) => last_err = Some(format!("{}: {}", addr, e)),
        }
    }
    Err(ExplorerError::Connection(format!(
        "Failed to connect: {}",
        last_err.unwrap_or_default()
    )))
}

impl Transport for SshConnection {
    fn exec(&self, command: &str) -> Result<Vec<u8>> {
        let command_err = |status: i32, output: String| ExplorerError::RemoteCommand {
            command: command.to_string(),
            status,
            output,
        };

        let mut channel = self
            .session
            .channel_session()
            .map_err(|e| command_err(-1, format!("Channel open failed: {}", e)))?;
        // stderr is folded into the stdout stream so ordering is preserved
        channel
            .handle_extended_data(ExtendedData::Merge)
            .map_err(|e| command_err(-1, e.to_string()))?;
        channel.exec(command).map_err(|e| command_err(-1, e.to_string()))?;

        let mut output = Vec::new();
        channel.read_to_end(&mut output)?;
        channel.wait_close().map_err(|e| command_err(-1, e.to_string()))?;
        let status = channel.exit_status().map_err(|e| command_err(-1, e.to_string()))?;

        if status != 0 {
            return Err(command_err(status, String::from_utf8_lossy(&output).into_owned()));
        }
        Ok(output)
    }

    fn download(&self, remote: &str, dest: &mut dyn Write) -> Result<u64> {
        let sftp = self.sftp()?;
        let mut file = sftp
            .open(Path::new(remote))
            .map_err(|e| ExplorerError::Transfer(format!("Open {} failed: {}", remote, e)))?;
        copy_chunked(&mut file, dest)
            .map_err(|e| ExplorerError::Transfer(format!("Reading {} failed: {}", remote, e)))
    }

    fn upload(&self, src: &mut dyn Read, remote: &str) -> Result<u64> {
        let sftp = self.sftp()?;
        let mut file = sftp
            .create(Path::new(remote))
            .map_err(|e| ExplorerError::Transfer(format!("Create {} failed: {}", remote, e)))?;
        copy_chunked(src, &mut file)
            .map_err(|e| ExplorerError::Transfer(format!("Writing {} failed: {}", remote, e)))
    }

    fn close(&self) -> Result<()> {
        self.session
            .disconnect(None, "closing", None)
            .map_err(|e| ExplorerError::Connection(format!("Disconnect failed: {}", e)))
    }
}
