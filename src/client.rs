use log::{debug, info};
use reqwest::Url;

use crate::{
    config::{RelayConfig, HANDSHAKE_PATH, RECEIVE_PATH, SEND_PATH},
    error::RelayError,
    file::FileDescriptor,
    message::{
        frame, unframe, HandshakeRequest, HandshakeResponse, RegisterReply, RelayEvent, RpcRequest,
    },
    transport::{with_peer, HttpTransport, Transport},
};

/// A downloader showed up and is waiting for the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub token: String,
}

/// A file registered with the relay under this run's peer id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    pub peer_id: String,
    pub url: Url,
}

pub struct RelayClient<T = HttpTransport> {
    config: RelayConfig,
    transport: T,
}

impl RelayClient<HttpTransport> {
    pub fn connect(config: RelayConfig) -> Result<Self, RelayError> {
        debug!("Using FileTea server {}", config.base_url);
        Ok(RelayClient::new(config, HttpTransport::new()?))
    }
}

impl<T: Transport> RelayClient<T> {
    pub fn new(config: RelayConfig, transport: T) -> Self {
        RelayClient { config, transport }
    }

    pub fn handshake(&self) -> Result<String, RelayError> {
        let body = serde_json::to_string(&HandshakeRequest::default())?;
        let text = self
            .transport
            .post_text(self.config.endpoint(HANDSHAKE_PATH)?, body)?;

        let response: HandshakeResponse = serde_json::from_str(&text)?;
        Ok(response.peer_id)
    }

    /// Announces `file` and returns the public download url.
    pub fn register(&self, peer_id: &str, file: &FileDescriptor) -> Result<Url, RelayError> {
        let body = frame(
            self.config.markers.request,
            &RpcRequest::add_file_sources(file),
        )?;
        info!("Sending: {}", body);

        let url = with_peer(self.config.endpoint(SEND_PATH)?, peer_id);
        let text = self.transport.post_text(url, body)?;

        let reply: RegisterReply =
            serde_json::from_str(unframe(&text, Some(self.config.markers.reply))?)?;
        debug!("Decoded JSON response: {:?}", reply);

        self.config.endpoint(reply.download_path()?)
    }

    /// Handshake then register, once per run.
    pub fn share(&self, file: &FileDescriptor) -> Result<Share, RelayError> {
        let peer_id = self.handshake()?;
        let url = self.register(&peer_id, file)?;
        Ok(Share { peer_id, url })
    }

    /// One long-poll round trip. Anything other than a new-transfer event is
    /// logged and reported as `None`; only transport failures are errors.
    pub fn poll_for_transfer(&self, peer_id: &str) -> Result<Option<TransferRequest>, RelayError> {
        let url = with_peer(self.config.endpoint(RECEIVE_PATH)?, peer_id);
        let text = self.transport.get_text(url)?;

        match decode_event(&text, self.config.markers.event) {
            Ok(event) => match event.transfer_token() {
                Some(token) => {
                    debug!("Got a file transfer request from token {}", token);
                    Ok(Some(TransferRequest {
                        token: token.to_string(),
                    }))
                }
                None => {
                    info!("Not a file transfer request ({})", event.method);
                    Ok(None)
                }
            },
            Err(e) => {
                info!("Not a file transfer request: {}", e);
                Ok(None)
            }
        }
    }

    pub fn upload_file(&self, token: &str, file: &FileDescriptor) -> Result<(), RelayError> {
        info!("Sending file {} to {}", file.path.display(), token);

        // the file may have changed since it was registered
        let handle = file.open()?;
        let len = handle.metadata()?.len();
        let status = self
            .transport
            .put_file(self.config.endpoint(token)?, handle, len)?;
        debug!("Upload finished with {}", status);
        Ok(())
    }

    /// Polls once and uploads if a downloader is waiting. Returns whether an
    /// upload happened.
    pub fn poll_once(&self, peer_id: &str, file: &FileDescriptor) -> Result<bool, RelayError> {
        info!("Waiting for a server response");
        match self.poll_for_transfer(peer_id)? {
            Some(request) => {
                println!(
                    "File transfer request received from token {}",
                    request.token
                );
                self.upload_file(&request.token, file)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Serves `file` until the process is interrupted. The relay paces the
    /// loop by holding each poll open.
    pub fn serve(&self, share: &Share, file: &FileDescriptor) -> Result<(), RelayError> {
        loop {
            self.poll_once(&share.peer_id, file)?;
        }
    }
}

fn decode_event(text: &str, marker: Option<char>) -> Result<RelayEvent, RelayError> {
    let event: RelayEvent = serde_json::from_str(unframe(text, marker)?)?;
    debug!("Decoded JSON response: {:?}", event);
    Ok(event)
}
