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

//! Tailnet DNS settings payloads.

use serde::{Deserialize, Serialize};

/// Body of `GET /dns/nameservers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nameservers {
    /// Global nameservers, in resolution order.
    pub dns: Vec<String>,
}

/// Body of `GET /dns/preferences`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Whether MagicDNS is enabled for the tailnet.
    #[serde(rename = "magicDNS")]
    pub magic_dns: bool,
}

/// Body of `GET /dns/searchpaths`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPaths {
    /// Search domains, in order.
    pub search_paths: Vec<String>,
}
