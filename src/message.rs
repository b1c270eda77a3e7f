use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::RelayError, file::FileDescriptor};

pub const ADD_FILE_SOURCES: &str = "addFileSources";
pub const FILE_TRANSFER_NEW: &str = "fileTransferNew";

#[derive(Debug, Serialize)]
pub struct HandshakeRequest<'a> {
    pub mechanisms: [&'a str; 2],
    pub url: &'a str,
}

impl Default for HandshakeRequest<'_> {
    fn default() -> Self {
        HandshakeRequest {
            mechanisms: ["websocket", "long-polling"],
            url: "/transport/",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HandshakeResponse {
    #[serde(rename = "peer-id")]
    pub peer_id: String,
}

/// One file source as the relay expects it: `[name, mime, size]`.
pub type FileSource = (String, String, u64);

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P> {
    pub method: &'a str,
    pub params: P,
    pub id: &'a str,
}

impl<'a> RpcRequest<'a, Vec<FileSource>> {
    pub fn add_file_sources(file: &FileDescriptor) -> Self {
        RpcRequest {
            method: ADD_FILE_SOURCES,
            params: vec![(file.name.clone(), file.mime.clone(), file.size)],
            id: "1",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterReply {
    pub result: Vec<Vec<Value>>,
}

impl RegisterReply {
    /// Path of the first registered source, e.g. `/f/xyz`.
    pub fn download_path(&self) -> Result<&str, RelayError> {
        self.result
            .first()
            .and_then(|source| source.first())
            .and_then(Value::as_str)
            .ok_or_else(|| RelayError::protocol("register reply has no download path"))
    }
}

#[derive(Debug, Deserialize)]
pub struct RelayEvent {
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl RelayEvent {
    /// The downloader's token, if this event announces a new transfer.
    pub fn transfer_token(&self) -> Option<&str> {
        if self.method != FILE_TRANSFER_NEW {
            return None;
        }
        self.params.last().and_then(Value::as_str)
    }
}

pub fn frame<T: Serialize>(marker: char, payload: &T) -> Result<String, RelayError> {
    let json = serde_json::to_string(payload)?;
    let mut body = String::with_capacity(json.len() + marker.len_utf8());
    body.push(marker);
    body.push_str(&json);
    Ok(body)
}

/// Strips the leading marker. With `expected == None` any first character is
/// accepted and dropped.
pub fn unframe(body: &str, expected: Option<char>) -> Result<&str, RelayError> {
    let mut chars = body.chars();
    match (chars.next(), expected) {
        (None, _) => Err(RelayError::protocol("empty body, marker missing")),
        (Some(found), Some(want)) if found != want => Err(RelayError::protocol(format!(
            "expected marker {:?}, found {:?}",
            want, found
        ))),
        _ => Ok(chars.as_str()),
    }
}
