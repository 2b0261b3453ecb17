#![allow(dead_code)]

use sshfe::explorer::{Connector, RemoteFileExplorer};
use sshfe::transport::{copy_chunked, Transport};
use sshfe::{ExplorerError, Result};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum Node {
    Dir,
    File(Vec<u8>),
}

/// In-memory remote host that understands the handful of shell commands
/// the explorer issues.
pub struct MockRemote {
    pub nodes: Mutex<BTreeMap<String, Node>>,
    pub commands: Mutex<Vec<String>>,
    pub fail_transfers: AtomicBool,
    pub reject_login: AtomicBool,
    pub closes: AtomicUsize,
}

impl MockRemote {
    pub fn new() -> Arc<Self> {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Dir);
        Arc::new(Self {
            nodes: Mutex::new(nodes),
            commands: Mutex::new(Vec::new()),
            fail_transfers: AtomicBool::new(false),
            reject_login: AtomicBool::new(false),
            closes: AtomicUsize::new(0),
        })
    }

    pub fn add_dir(&self, path: &str) {
        self.nodes.lock().unwrap().insert(path.to_string(), Node::Dir);
    }

    pub fn add_file(&self, path: &str, data: &[u8]) {
        self.nodes.lock().unwrap().insert(path.to_string(), Node::File(data.to_vec()));
    }

    pub fn exists(&self, path: &str) -> bool {
        self.nodes.lock().unwrap().contains_key(path)
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        match self.nodes.lock().unwrap().get(path) {
            Some(Node::File(data)) => Some(data.clone()),
            _ => None,
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    fn run(&self, command: &str) -> std::result::Result<String, String> {
        let words = shell_words(command);
        let args: Vec<&str> = words.iter().map(String::as_str).collect();
        let mut nodes = self.nodes.lock().unwrap();

        match args.as_slice() {
            ["ls", "--time-style=long-iso", "-l", path] => {
                let path = clean(path);
                match nodes.get(&path) {
                    Some(Node::Dir) => {}
                    Some(Node::File(_)) => return Err(format!("not a directory: {}", path)),
                    None => return Err(format!("ls: cannot access '{}': No such file or directory", path)),
                }
                let children: Vec<String> = nodes
                    .iter()
                    .filter(|(p, _)| p.as_str() != "/" && parent(p) == path)
                    .map(|(p, node)| {
                        let name = p.rsplit('/').next().unwrap_or_default();
                        match node {
                            Node::Dir => format!("drwxr-xr-x 2 alice staff 4096 2024-01-01 10:00 {}", name),
                            Node::File(data) => {
                                format!("-rw-r--r-- 1 alice staff {} 2024-01-02 11:30 {}", data.len(), name)
                            }
                        }
                    })
                    .collect();
                Ok(format!("total {}\n{}\n", children.len() * 4, children.join("\n")))
            }
            ["rm", "-r", path] => {
                let path = clean(path);
                if nodes.remove(&path).is_none() {
                    return Err(format!("rm: cannot remove '{}': No such file or directory", path));
                }
                let prefix = format!("{}/", path);
                nodes.retain(|p, _| !p.starts_with(&prefix));
                Ok(String::new())
            }
            ["mkdir", "-p", path] => {
                let path = clean(path);
                let mut current = String::new();
                for part in path.split('/').filter(|s| !s.is_empty()) {
                    current = format!("{}/{}", current, part);
                    if let Some(Node::File(_)) = nodes.get(&current) {
                        return Err(format!("mkdir: '{}' exists but is not a directory", current));
                    }
                    nodes.insert(current.clone(), Node::Dir);
                }
                Ok(String::new())
            }
            ["mv", from, to] => relocate(&mut nodes, &clean(from), &clean(to), true),
            ["cp", "-r", from, to] => relocate(&mut nodes, &clean(from), &clean(to), false),
            ["chmod", _code, path] | ["chmod", "-r", _code, path] => {
                if nodes.contains_key(&clean(path)) {
                    Ok(String::new())
                } else {
                    Err(format!("chmod: cannot access '{}'", path))
                }
            }
            _ => Err(format!("sh: unknown command: {}", command)),
        }
    }
}

fn relocate(
    nodes: &mut BTreeMap<String, Node>,
    from: &str,
    to: &str,
    remove_source: bool,
) -> std::result::Result<String, String> {
    if !nodes.contains_key(from) {
        return Err(format!("cannot stat '{}': No such file or directory", from));
    }
    let dest = match nodes.get(to) {
        Some(Node::Dir) => format!("{}/{}", to.trim_end_matches('/'), from.rsplit('/').next().unwrap_or_default()),
        _ => to.to_string(),
    };
    let prefix = format!("{}/", from);
    let moved: Vec<(String, Node)> = nodes
        .iter()
        .filter(|(p, _)| p.as_str() == from || p.starts_with(&prefix))
        .map(|(p, n)| (format!("{}{}", dest, &p[from.len()..]), n.clone()))
        .collect();
    if remove_source {
        nodes.retain(|p, _| p.as_str() != from && !p.starts_with(&prefix));
    }
    nodes.extend(moved);
    Ok(String::new())
}

/// Split on whitespace, honouring single quotes, then glue the pieces of
/// each word together (`'/a'/b` becomes `/a/b`).
fn shell_words(command: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_word = false;
    for c in command.chars() {
        match c {
            '\'' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

fn clean(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn parent(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(i) => path[..i].to_string(),
    }
}

pub struct MockConn(pub Arc<MockRemote>);

impl Transport for MockConn {
    fn exec(&self, command: &str) -> Result<Vec<u8>> {
        self.0.commands.lock().unwrap().push(command.to_string());
        self.0.run(command).map(String::into_bytes).map_err(|output| ExplorerError::RemoteCommand {
            command: command.to_string(),
            status: 1,
            output,
        })
    }

    fn download(&self, remote: &str, dest: &mut dyn Write) -> Result<u64> {
        if self.0.fail_transfers.load(Ordering::SeqCst) {
            dest.write_all(b"partial")?;
            return Err(ExplorerError::Transfer(format!("Reading {} failed", remote)));
        }
        let data = self
            .0
            .file(remote)
            .ok_or_else(|| ExplorerError::Transfer(format!("Open {} failed", remote)))?;
        Ok(copy_chunked(&mut data.as_slice(), dest)?)
    }

    fn upload(&self, src: &mut dyn Read, remote: &str) -> Result<u64> {
        if self.0.fail_transfers.load(Ordering::SeqCst) {
            return Err(ExplorerError::Transfer(format!("Create {} failed", remote)));
        }
        if !matches!(self.0.nodes.lock().unwrap().get(&parent(remote)), Some(Node::Dir)) {
            return Err(ExplorerError::Transfer(format!("Create {} failed: no such directory", remote)));
        }
        let mut data = Vec::new();
        let n = copy_chunked(src, &mut data)?;
        self.0.add_file(remote, &data);
        Ok(n)
    }

    fn close(&self) -> Result<()> {
        self.0.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone)]
pub struct MockConnector(pub Arc<MockRemote>);

impl Connector for MockConnector {
    fn connect(&self) -> Result<Box<dyn Transport>> {
        if self.0.reject_login.load(Ordering::SeqCst) {
            return Err(ExplorerError::Connection("Authentication failed".into()));
        }
        Ok(Box::new(MockConn(self.0.clone())))
    }

    fn target(&self) -> String {
        "alice@mock".into()
    }
}

pub fn explorer(remote: &Arc<MockRemote>, staging: &std::path::Path) -> RemoteFileExplorer<MockConnector> {
    RemoteFileExplorer::new(MockConnector(remote.clone()), staging)
}
