//! tailgraph-types: Wire format of the upstream tailnet management API.
//!
//! Every type in this crate mirrors one upstream JSON payload field-for-field.
//! Nothing here is interpreted; the gateway maps these into its own output
//! records, so upstream schema drift stays confined to this crate.

#![warn(missing_docs)]

pub mod dns;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `GET /devices?fields=all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesResponse {
    /// Every device in the tailnet, in upstream order.
    pub devices: Vec<Device>,
}

/// One node of the tailnet as reported by the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Tailnet IP addresses assigned to the device.
    pub addresses: Vec<String>,
    /// Legacy numeric identifier, serialized as a string.
    pub id: String,
    /// Preferred stable identifier.
    pub node_id: String,
    /// Login name of the owning user.
    pub user: String,
    /// MagicDNS name.
    pub name: String,
    /// Machine hostname as reported by the client.
    pub hostname: String,
    /// Client software version string.
    pub client_version: String,
    /// Whether a newer client is available.
    pub update_available: bool,
    /// Operating system name.
    pub os: String,
    /// When the device was added, as returned upstream.
    pub created: String,
    /// When the device was last active, as returned upstream.
    pub last_seen: String,
    /// Whether node key expiry is disabled.
    pub key_expiry_disabled: bool,
    /// When the node key expires, as returned upstream.
    pub expires: String,
    /// Whether the device has been authorized to join.
    pub authorized: bool,
    /// Whether the device is shared in from another tailnet.
    pub is_external: bool,
    /// Machine key.
    pub machine_key: String,
    /// Node key.
    pub node_key: String,
    /// Whether the device refuses incoming connections.
    pub blocks_incoming_connections: bool,
    /// Subnet routes approved for the device.
    pub enabled_routes: Vec<String>,
    /// Subnet routes the device advertises.
    pub advertised_routes: Vec<String>,
    /// Connectivity report from the client.
    pub client_connectivity: ClientConnectivity,
    /// ACL tags; absent for user-owned devices.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Tailnet lock verification error, if any.
    #[serde(default)]
    pub tailnet_lock_error: Option<String>,
    /// Tailnet lock key, if any.
    #[serde(default)]
    pub tailnet_lock_key: Option<String>,
}

/// Connectivity report nested in [`Device`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConnectivity {
    /// Endpoints (ip:port) the client can be reached on.
    pub endpoints: Vec<String>,
    /// Whether the NAT mapping varies by destination address.
    #[serde(rename = "mappingVariesByDestIP")]
    pub mapping_varies_by_dest_ip: bool,
    /// Latency per DERP region; shape is not interpreted.
    pub latency: Value,
    /// Client feature support map; shape is not interpreted.
    pub client_supports: Value,
}

/// Body of `GET /keys`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysResponse {
    /// Every key visible to the API credential.
    pub keys: Vec<Key>,
}

/// An auth or API key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    /// Key identifier.
    pub id: String,
    /// Human description entered when the key was created.
    pub description: String,
}
