use crate::config::Settings;
use crate::explorer::{FileExplorer, SshFileExplorer};
use crate::protocol::{Envelope, Request, Response};
use crate::sessions::SessionRegistry;
use crate::{ExplorerError, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{error, info, warn};

/// Builds an uninitialized explorer for a login attempt.
pub type ExplorerFactory = Box<dyn Fn(&Settings, &str, &str) -> Box<dyn FileExplorer> + Send>;

/// Request loop for the web layer: one JSON [`Envelope`] per input line,
/// one JSON [`Response`] per output line.
pub struct Server {
    settings: Settings,
    sessions: SessionRegistry,
    factory: ExplorerFactory,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self::with_factory(
            settings,
            Box::new(|settings: &Settings, user: &str, password: &str| -> Box<dyn FileExplorer> {
                Box::new(SshFileExplorer::new(
                    settings.ssh_config(user, password),
                    settings.staging_dir.clone(),
                ))
            }),
        )
    }

    pub fn with_factory(settings: Settings, factory: ExplorerFactory) -> Self {
        Self {
            settings,
            sessions: SessionRegistry::new(),
            factory,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Serve until stdin closes.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let result = self.serve(stdin.lock(), stdout.lock());
        self.sessions.close_all();
        result
    }

    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<Envelope>(&line) {
                Ok(envelope) => self.handle(envelope),
                Err(e) => {
                    warn!("Bad request: {}", e);
                    Response::error(format!("Bad request: {}", e))
                }
            };

            serde_json::to_writer(&mut output, &response)?;
            output.write_all(b"\n")?;
            output.flush()?;
        }
        Ok(())
    }

    pub fn handle(&mut self, envelope: Envelope) -> Response {
        match self.dispatch(envelope) {
            Ok(response) => response,
            Err(e) => {
                error!("Request failed: {}", e);
                Response::error(e.to_string())
            }
        }
    }

    fn dispatch(&mut self, envelope: Envelope) -> Result<Response> {
        if let Some(denied) = envelope.request.paths().into_iter().find(|p| !self.settings.allows(p)) {
            return Err(ExplorerError::PathNotAllowed(denied.to_string()));
        }

        match &envelope.request {
            Request::Login { username, password } => return self.login(username, password),
            Request::Logout => {
                let uid = envelope.uid.as_deref().ok_or(ExplorerError::NotConnected)?;
                self.sessions.remove(uid)?;
                return Ok(Response::ok());
            }
            Request::SaveFile | Request::Compress | Request::Extract => return Ok(Response::not_supported()),
            _ => {}
        }

        let uid = envelope.uid.as_deref().ok_or(ExplorerError::NotConnected)?;
        let explorer = self.sessions.get(uid).ok_or(ExplorerError::NotConnected)?;

        match envelope.request {
            Request::List { path } => Ok(Response::listing(explorer.list_dir(&path)?)),
            Request::Rename { item, new_item_path } => {
                explorer.move_path(&item, &new_item_path)?;
                Ok(Response::ok())
            }
            Request::Copy { item, new_item_path } => {
                explorer.copy(&item, &new_item_path)?;
                Ok(Response::ok())
            }
            Request::Remove { items } => {
                for item in &items {
                    explorer.delete(item)?;
                }
                Ok(Response::ok())
            }
            Request::Edit { item, content } => {
                explorer.save(&item, content.as_bytes())?;
                Ok(Response::ok())
            }
            Request::CreateFolder { new_path } => {
                explorer.mkdir(&new_path, "")?;
                Ok(Response::ok())
            }
            Request::ChangePermissions { items, perms_code, recursive } => {
                for item in &items {
                    explorer.chmod(item, &perms_code, recursive)?;
                }
                Ok(Response::ok())
            }
            Request::GetContent { item } => {
                let data = explorer.read_file(&item)?;
                Ok(Response::content(String::from_utf8_lossy(&data)))
            }
            Request::Move { items, new_path } => {
                for item in &items {
                    explorer.move_path(item, &join_base_name(&new_path, item))?;
                }
                Ok(Response::ok())
            }
            Request::Login { .. }
            | Request::Logout
            | Request::SaveFile
            | Request::Compress
            | Request::Extract => Ok(Response::not_supported()),
        }
    }

    fn login(&mut self, username: &str, password: &str) -> Result<Response> {
        if username.is_empty() || password.is_empty() {
            return Err(ExplorerError::Connection("Username and password are required".into()));
        }
        let mut explorer = (self.factory)(&self.settings, username, password);
        explorer.init()?;

        let uid = username.to_string();
        self.sessions.insert(uid.clone(), explorer);
        info!("{} logged in", uid);
        Ok(Response::session(uid))
    }
}

/// `dir` joined with the last component of `item`.
fn join_base_name(dir: &str, item: &str) -> String {
    let name = Path::new(item)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Path::new(dir).join(name).to_string_lossy().into_owned()
}
