//! Identity resolution from connection addresses.
//!
//! An identity is the SHA-1 of the client's host, hex encoded. It is a
//! convenience key for content slots, not an authenticated principal: clients
//! behind one NAT share an identity and collisions are accepted.

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use sha1::{Digest, Sha1};
use tracing::{debug, warn};

use crate::BoardError;
use crate::types::Identity;

/// Audit mapping from identity token to the raw host it was derived from.
///
/// One file per token under `dir`, containing the host. Writers for
/// different tokens never touch the same file.
#[derive(Debug, Clone)]
pub struct IdentityRegistry {
    dir: PathBuf,
}

impl IdentityRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Record the host behind a token.
    pub fn record(&self, identity: &Identity, host: &str) -> Result<(), BoardError> {
        fs::create_dir_all(&self.dir).map_err(|e| BoardError::store(&self.dir, e))?;
        let path = self.dir.join(identity.as_str());
        fs::write(&path, host).map_err(|e| BoardError::store(&path, e))?;
        Ok(())
    }
}

/// Derives identity tokens, optionally recording them in a registry.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    registry: Option<IdentityRegistry>,
}

impl IdentityResolver {
    pub fn new(registry: IdentityRegistry) -> Self {
        Self {
            registry: Some(registry),
        }
    }

    /// A resolver that records nothing.
    pub fn without_registry() -> Self {
        Self { registry: None }
    }

    /// Resolve a textual source address such as `10.0.0.1:53412`.
    pub fn resolve(&self, address: &str) -> Identity {
        let host = host_of(address);
        let identity = digest(&host);

        if let Some(registry) = &self.registry
            && let Err(e) = registry.record(&identity, &host)
        {
            warn!(identity = %identity, error = %e, "failed to record identity mapping");
        }

        debug!(identity = %identity, "resolved identity");
        identity
    }

    /// Resolve a parsed socket address.
    pub fn resolve_socket(&self, address: SocketAddr) -> Identity {
        self.resolve(&address.ip().to_string())
    }
}

/// Token for a host: hex SHA-1 of its bytes.
pub fn digest(host: &str) -> Identity {
    Identity::from_digest(hex::encode(Sha1::digest(host.as_bytes())))
}

/// Host portion of an address, port stripped.
pub fn host_of(address: &str) -> String {
    let address = address.trim();

    if let Ok(socket) = address.parse::<SocketAddr>() {
        return socket.ip().to_string();
    }
    if let Ok(ip) = address.parse::<IpAddr>() {
        return ip.to_string();
    }
    if let Some((host, port)) = address.rsplit_once(':')
        && port.parse::<u16>().is_ok()
    {
        return host.trim_start_matches('[').trim_end_matches(']').to_string();
    }

    address.to_string()
}
