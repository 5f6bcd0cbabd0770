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

//! Mapping from upstream wire payloads to output records.

use async_graphql::{ID, Json};
use tailgraph_types::dns::{Nameservers, Preferences, SearchPaths};
use tailgraph_types::{self as wire, DevicesResponse, KeysResponse};

use crate::model::{ClientConnectivity, Device, DnsPreferences, Key};

impl From<wire::ClientConnectivity> for ClientConnectivity {
    fn from(c: wire::ClientConnectivity) -> Self {
        Self {
            endpoints: c.endpoints,
            mapping_varies_by_dest_ip: c.mapping_varies_by_dest_ip,
            latency: Json(c.latency),
            client_supports: Json(c.client_supports),
        }
    }
}

impl From<wire::Device> for Device {
    fn from(d: wire::Device) -> Self {
        Self {
            addresses: d.addresses,
            id: ID(d.id),
            node_id: d.node_id,
            user: d.user,
            name: d.name,
            hostname: d.hostname,
            client_version: d.client_version,
            update_available: d.update_available,
            os: d.os,
            created: d.created,
            last_seen: d.last_seen,
            key_expiry_disabled: d.key_expiry_disabled,
            expires: d.expires,
            authorized: d.authorized,
            is_external: d.is_external,
            machine_key: d.machine_key,
            node_key: d.node_key,
            blocks_incoming_connections: d.blocks_incoming_connections,
            enabled_routes: d.enabled_routes,
            advertised_routes: d.advertised_routes,
            client_connectivity: d.client_connectivity.into(),
            tags: d.tags,
            tailnet_lock_error: d.tailnet_lock_error,
            tailnet_lock_key: d.tailnet_lock_key,
        }
    }
}

impl From<wire::Key> for Key {
    fn from(k: wire::Key) -> Self {
        Self {
            id: ID(k.id),
            description: k.description,
        }
    }
}

impl From<Preferences> for DnsPreferences {
    fn from(p: Preferences) -> Self {
        Self {
            magic_dns: p.magic_dns,
        }
    }
}

pub fn devices(resp: DevicesResponse) -> impl Iterator<Item = Device> {
    resp.devices.into_iter().map(Device::from)
}

pub fn keys(resp: KeysResponse) -> impl Iterator<Item = Key> {
    resp.keys.into_iter().map(Key::from)
}

pub fn nameservers(resp: Nameservers) -> impl Iterator<Item = String> {
    resp.dns.into_iter()
}

pub fn search_paths(resp: SearchPaths) -> impl Iterator<Item = String> {
    resp.search_paths.into_iter()
}
