use crate::listing::DirEntry;
use serde::{Deserialize, Serialize};

/// One request from the web file manager. `mode` selects the operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum Request {
    #[serde(rename = "login")]
    Login { username: String, password: String },

    #[serde(rename = "logout")]
    Logout,

    #[serde(rename = "list")]
    List { path: String },

    /// Move one item to an explicit new path
    #[serde(rename = "rename")]
    Rename {
        item: String,
        #[serde(rename = "newItemPath")]
        new_item_path: String,
    },

    #[serde(rename = "copy")]
    Copy {
        item: String,
        #[serde(rename = "newItemPath")]
        new_item_path: String,
    },

    #[serde(rename = "remove")]
    Remove { items: Vec<String> },

    /// Overwrite a file with text content
    #[serde(rename = "edit")]
    Edit { item: String, content: String },

    #[serde(rename = "createFolder")]
    CreateFolder {
        #[serde(rename = "newPath")]
        new_path: String,
    },

    #[serde(rename = "changePermissions")]
    ChangePermissions {
        items: Vec<String>,
        #[serde(rename = "permsCode")]
        perms_code: String,
        #[serde(default)]
        recursive: bool,
    },

    #[serde(rename = "getContent")]
    GetContent { item: String },

    /// Move items into a directory, keeping their base names
    #[serde(rename = "move")]
    Move {
        items: Vec<String>,
        #[serde(rename = "newPath")]
        new_path: String,
    },

    #[serde(rename = "savefile")]
    SaveFile,

    #[serde(rename = "compress")]
    Compress,

    #[serde(rename = "extract")]
    Extract,
}

impl Request {
    /// Every remote path the request touches.
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Request::List { path } => vec![path.as_str()],
            Request::Rename { item, new_item_path } | Request::Copy { item, new_item_path } => {
                vec![item.as_str(), new_item_path.as_str()]
            }
            Request::Edit { item, .. } | Request::GetContent { item } => vec![item.as_str()],
            Request::CreateFolder { new_path } => vec![new_path.as_str()],
            Request::Remove { items } | Request::ChangePermissions { items, .. } => {
                items.iter().map(String::as_str).collect()
            }
            Request::Move { items, new_path } => {
                let mut paths: Vec<&str> = items.iter().map(String::as_str).collect();
                paths.push(new_path.as_str());
                paths
            }
            Request::Login { .. }
            | Request::Logout
            | Request::SaveFile
            | Request::Compress
            | Request::Extract => vec![],
        }
    }
}

/// A request plus the session it runs under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(flatten)]
    pub request: Request,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub result: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Status { success: bool, error: String },
    Session { uid: String },
    Listing(Vec<DirEntry>),
    Content(String),
}

impl Response {
    pub fn ok() -> Self {
        Self {
            result: ResponseBody::Status {
                success: true,
                error: String::new(),
            },
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result: ResponseBody::Status {
                success: false,
                error: message.into(),
            },
        }
    }

    pub fn not_supported() -> Self {
        Self::error("Not Supported")
    }

    pub fn session(uid: impl Into<String>) -> Self {
        Self {
            result: ResponseBody::Session { uid: uid.into() },
        }
    }

    pub fn listing(entries: Vec<DirEntry>) -> Self {
        Self {
            result: ResponseBody::Listing(entries),
        }
    }

    pub fn content(text: impl Into<String>) -> Self {
        Self {
            result: ResponseBody::Content(text.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self.result, ResponseBody::Status { success: false, .. })
    }
}
