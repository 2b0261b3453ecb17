use crate::transport::ssh::{Credentials, SshConfig, DEFAULT_CONNECT_TIMEOUT};
use crate::{ExplorerError, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Remote host (host or host:port)
    #[arg(long, env = "SSHFE_HOST")]
    pub host: String,

    /// Remote user for one-shot commands
    #[arg(short, long, env = "SSHFE_USER")]
    pub user: Option<String>,

    /// Password for one-shot commands
    #[arg(long, env = "SSHFE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Only allow paths under this prefix
    #[arg(long, env = "SSHFE_HOME", default_value = "")]
    pub home: String,

    /// Directory for temporary staging files
    #[arg(long)]
    pub staging_dir: Option<PathBuf>,

    /// Suppress non-error messages
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve JSON requests on stdin/stdout, one per line
    Serve,
    /// List a directory
    Ls { path: String },
    /// Move or rename
    Mv { path: String, new_path: String },
    /// Copy recursively
    Cp { path: String, new_path: String },
    /// Remove recursively
    Rm {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Create a directory
    Mkdir {
        path: String,
        #[arg(default_value = "")]
        name: String,
    },
    /// Change permissions
    Chmod {
        perms_code: String,
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(short = 'R', long, default_value_t = false)]
        recursive: bool,
    },
    /// Print a remote file
    Cat { path: String },
    /// Upload a local file
    Put { local: PathBuf, remote: String },
}

/// Settings handed to the core. Built once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub home: String,
    pub staging_dir: PathBuf,
    pub connect_timeout: Duration,
}

impl Settings {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            home: String::new(),
            staging_dir: std::env::temp_dir(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn from_args(args: &Args) -> Result<Self> {
        if args.host.trim().is_empty() {
            return Err(ExplorerError::Config("Host must not be empty".into()));
        }
        let mut settings = Settings::new(args.host.clone());
        settings.home = args.home.clone();
        if let Some(dir) = &args.staging_dir {
            if !dir.is_dir() {
                return Err(ExplorerError::Config(format!("Staging dir {:?} is not a directory", dir)));
            }
            settings.staging_dir = dir.clone();
        }
        Ok(settings)
    }

    /// Empty paths are always allowed; anything else must live under `home`.
    pub fn allows(&self, path: &str) -> bool {
        path.is_empty() || path.starts_with(&self.home)
    }

    pub fn ssh_config(&self, user: &str, password: &str) -> SshConfig {
        SshConfig {
            credentials: Credentials::new(self.host.clone(), user, password),
            connect_timeout: self.connect_timeout,
        }
    }
}
