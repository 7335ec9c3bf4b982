//! Remote-procedure boundary.
//!
//! Message types and a transport-agnostic handler for the two calls launchers
//! make: fetch the config blob, fetch a client file. Platform types arrive as raw
//! integers and are validated here; anything outside the enumeration is rejected
//! with [`Error::UnknownPlatform`] rather than mapped to a default platform.
//! Lookup misses are not errors and produce an empty payload.

use crate::cache::AssetSlot;
use crate::error::Result;
use crate::platform::PlatformId;
use crate::service::AssetService;
use crate::utils::checksum_from_wire;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRequest {
    pub platform_type: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    /// Echo of the requested platform type.
    pub platform_type: i32,
    /// Config blob; empty if the platform has no bundle.
    pub config: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequest {
    pub platform_type: i32,
    pub file_name: String,
    /// CRC-32 the launcher already holds. Only the low 32 bits are significant.
    pub crc: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    /// Echo of the requested platform type.
    pub platform_type: i32,
    /// Stored file bytes; empty on a miss.
    pub client: Vec<u8>,
    /// `Content-Encoding` label of `client`, absent on a miss.
    pub content_encoding: Option<String>,
}

/// Serves [`ConfigRequest`]s and [`ClientRequest`]s from a published cache.
#[derive(Debug, Clone)]
pub struct RpcHandler {
    service: AssetService,
}

impl RpcHandler {
    pub fn new(service: AssetService) -> Self {
        Self { service }
    }

    /// Handler over the cache in `slot`. Fails with `NotReady` before publication.
    pub fn from_slot(slot: &AssetSlot) -> Result<Self> {
        slot.service().map(Self::new)
    }

    pub fn service(&self) -> &AssetService {
        &self.service
    }

    pub fn get_config(&self, request: &ConfigRequest) -> Result<ConfigResponse> {
        let platform = PlatformId::try_from(request.platform_type)?;

        Ok(ConfigResponse {
            platform_type: request.platform_type,
            config: self.service.config(platform).to_vec(),
        })
    }

    pub fn get_client(&self, request: &ClientRequest) -> Result<ClientResponse> {
        let platform = PlatformId::try_from(request.platform_type)?;
        let crc = checksum_from_wire(request.crc);

        let client = self
            .service
            .file(platform, &request.file_name, crc)
            .to_vec();
        let content_encoding = if client.is_empty() {
            None
        } else {
            self.service
                .entry(platform, &request.file_name)
                .map(|e| e.transform.content_encoding().to_string())
        };

        Ok(ClientResponse {
            platform_type: request.platform_type,
            client,
            content_encoding,
        })
    }
}
