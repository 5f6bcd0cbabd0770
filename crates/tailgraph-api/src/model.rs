// Copyright (C) 2025 Joseph Sacchini
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU Affero General Public License as published by the Free
// Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Output records exposed through the GraphQL schema. Field names match the
//! upstream JSON names so clients see the same shape either way.

use async_graphql::{ID, Json, SimpleObject};
use serde_json::Value;

#[derive(Debug, Clone, SimpleObject)]
pub struct ClientConnectivity {
    pub endpoints: Vec<String>,
    #[graphql(name = "mappingVariesByDestIP")]
    pub mapping_varies_by_dest_ip: bool,
    pub latency: Json<Value>,
    pub client_supports: Json<Value>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Device {
    pub addresses: Vec<String>,
    pub id: ID,
    pub node_id: String,
    pub user: String,
    pub name: String,
    pub hostname: String,
    pub client_version: String,
    pub update_available: bool,
    pub os: String,
    pub created: String,
    pub last_seen: String,
    pub key_expiry_disabled: bool,
    pub expires: String,
    pub authorized: bool,
    pub is_external: bool,
    pub machine_key: String,
    pub node_key: String,
    pub blocks_incoming_connections: bool,
    pub enabled_routes: Vec<String>,
    pub advertised_routes: Vec<String>,
    pub client_connectivity: ClientConnectivity,
    pub tags: Option<Vec<String>>,
    pub tailnet_lock_error: Option<String>,
    pub tailnet_lock_key: Option<String>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Key {
    pub id: ID,
    pub description: String,
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "DNSPreferences")]
pub struct DnsPreferences {
    #[graphql(name = "magicDNS")]
    pub magic_dns: bool,
}
