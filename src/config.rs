use reqwest::Url;

use crate::error::RelayError;

pub const DEFAULT_URL: &str = "https://filetea.me/";
pub const URL_ENV: &str = "FILETEAURL";

pub const HANDSHAKE_PATH: &str = "transport/handshake";
pub const SEND_PATH: &str = "transport/lp/send";
pub const RECEIVE_PATH: &str = "transport/lp/receive";

/// Marker characters framing the relay's JSON payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    /// Prefixed to every request body.
    pub request: char,
    /// Expected in front of the register reply.
    pub reply: char,
    /// Expected in front of poll events. `None` strips whatever comes first.
    pub event: Option<char>,
}

impl Default for Markers {
    fn default() -> Self {
        Markers {
            request: 'X',
            reply: '@',
            event: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub base_url: Url,
    pub markers: Markers,
}

impl RelayConfig {
    pub fn new(base_url: &str, markers: Markers) -> Result<Self, RelayError> {
        Ok(RelayConfig {
            base_url: parse_base_url(base_url)?,
            markers,
        })
    }

    /// Resolves `path` against the base url the way a browser resolves a link.
    pub fn endpoint(&self, path: &str) -> Result<Url, RelayError> {
        self.base_url
            .join(path)
            .map_err(|e| RelayError::protocol(format!("bad relay path {:?}: {}", path, e)))
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, RelayError> {
    let url = Url::parse(raw).map_err(|_| RelayError::InvalidUrl(raw.to_string()))?;
    if !url.has_host() {
        return Err(RelayError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}
