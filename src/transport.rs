use std::{fs::File, time::Duration};

use log::debug;
use reqwest::{
    blocking::{Body, Client},
    header::CONTENT_TYPE,
    StatusCode, Url,
};

use crate::error::RelayError;

/// The HTTP calls the relay protocol is made of. Every call blocks until the
/// relay answers.
pub trait Transport {
    /// POST a `text/plain` body and return the response text.
    fn post_text(&self, url: Url, body: String) -> Result<String, RelayError>;

    /// GET and return the response text. Used for long-polling, so this may
    /// block for as long as the relay holds the request.
    fn get_text(&self, url: Url) -> Result<String, RelayError>;

    /// PUT `len` bytes streamed from `file`.
    fn put_file(&self, url: Url, file: File, len: u64) -> Result<StatusCode, RelayError>;
}

/// Holds the session (cookies and pooled connections) for the whole run.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, RelayError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(None::<Duration>)
            .build()?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn post_text(&self, url: Url, body: String) -> Result<String, RelayError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()?;
        debug!("{:?}", response.headers());
        let text = response.text()?;
        debug!("{}", text);
        Ok(text)
    }

    fn get_text(&self, url: Url) -> Result<String, RelayError> {
        let response = self.client.get(url).send()?;
        debug!("{:?}", response.headers());
        let text = response.text()?;
        debug!("{}", text);
        Ok(text)
    }

    fn put_file(&self, url: Url, file: File, len: u64) -> Result<StatusCode, RelayError> {
        let response = self
            .client
            .put(url)
            .body(Body::sized(file, len))
            .send()?;
        debug!("{:?}", response);
        Ok(response.status())
    }
}

/// Appends the peer id as the bare query string, `path?<peer>`. Only bytes a
/// query can't hold get escaped; the relay must see its own token back.
pub fn with_peer(mut url: Url, peer_id: &str) -> Url {
    url.set_query(Some(peer_id));
    url
}
