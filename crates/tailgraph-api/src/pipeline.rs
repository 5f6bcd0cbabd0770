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

//! Filtering and ordering of the device list.
//!
//! Stages always run in the same order: tag filter, client-version filter,
//! then sort. Pagination is applied by the caller on the result.

use std::str::FromStr;

use semver::Version;
use thiserror::Error;
use tracing::debug;

use crate::model::Device;
use crate::version::{self, Operator, VersionError};

/// Field token accepted in front of a client-version filter.
const CLIENT_VERSION_FIELD: &str = "clientVersion";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("malformed client version filter {0:?}: expected \"<operator> <version>\"")]
    MalformedFilter(String),

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// A parsed `"<operator> <version>"` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFilter {
    pub op: Operator,
    pub version: Version,
}

impl FromStr for VersionFilter {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split(' ').collect();
        let (op, version) = match tokens.as_slice() {
            [op, version] => (*op, *version),
            [CLIENT_VERSION_FIELD, op, version] => (*op, *version),
            _ => return Err(PipelineError::MalformedFilter(s.to_string())),
        };

        Ok(Self {
            op: op.parse()?,
            version: version::parse(version)?,
        })
    }
}

impl VersionFilter {
    pub fn matches(&self, device: &Device) -> Result<bool, VersionError> {
        let theirs = version::parse(&device.client_version)?;
        Ok(self.op.accepts(theirs.cmp(&self.version)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Addresses,
    Id,
    NodeId,
    User,
    Name,
    Hostname,
    ClientVersion,
    UpdateAvailable,
    Os,
    Created,
    LastSeen,
    KeyExpiryDisabled,
    Expires,
    Authorized,
    IsExternal,
    MachineKey,
    NodeKey,
    BlocksIncomingConnections,
    EnabledRoutes,
    AdvertisedRoutes,
    Tags,
    TailnetLockError,
    TailnetLockKey,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey<'a> {
    Text(&'a str),
    Flag(bool),
    List(&'a [String]),
}

impl SortField {
    /// Resolve a device field by its public name. Unknown names yield `None`.
    pub fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "addresses" => Self::Addresses,
            "id" => Self::Id,
            "nodeId" => Self::NodeId,
            "user" => Self::User,
            "name" => Self::Name,
            "hostname" => Self::Hostname,
            "clientVersion" => Self::ClientVersion,
            "updateAvailable" => Self::UpdateAvailable,
            "os" => Self::Os,
            "created" => Self::Created,
            "lastSeen" => Self::LastSeen,
            "keyExpiryDisabled" => Self::KeyExpiryDisabled,
            "expires" => Self::Expires,
            "authorized" => Self::Authorized,
            "isExternal" => Self::IsExternal,
            "machineKey" => Self::MachineKey,
            "nodeKey" => Self::NodeKey,
            "blocksIncomingConnections" => Self::BlocksIncomingConnections,
            "enabledRoutes" => Self::EnabledRoutes,
            "advertisedRoutes" => Self::AdvertisedRoutes,
            "tags" => Self::Tags,
            "tailnetLockError" => Self::TailnetLockError,
            "tailnetLockKey" => Self::TailnetLockKey,
            _ => return None,
        })
    }

    /// The device's value for this field, or `None` when an optional field is
    /// absent on that device.
    pub fn key<'a>(&self, d: &'a Device) -> Option<SortKey<'a>> {
        use SortKey::*;
        Some(match self {
            Self::Addresses => List(&d.addresses),
            Self::Id => Text(d.id.as_str()),
            Self::NodeId => Text(&d.node_id),
            Self::User => Text(&d.user),
            Self::Name => Text(&d.name),
            Self::Hostname => Text(&d.hostname),
            Self::ClientVersion => Text(&d.client_version),
            Self::UpdateAvailable => Flag(d.update_available),
            Self::Os => Text(&d.os),
            Self::Created => Text(&d.created),
            Self::LastSeen => Text(&d.last_seen),
            Self::KeyExpiryDisabled => Flag(d.key_expiry_disabled),
            Self::Expires => Text(&d.expires),
            Self::Authorized => Flag(d.authorized),
            Self::IsExternal => Flag(d.is_external),
            Self::MachineKey => Text(&d.machine_key),
            Self::NodeKey => Text(&d.node_key),
            Self::BlocksIncomingConnections => Flag(d.blocks_incoming_connections),
            Self::EnabledRoutes => List(&d.enabled_routes),
            Self::AdvertisedRoutes => List(&d.advertised_routes),
            Self::Tags => List(d.tags.as_deref()?),
            Self::TailnetLockError => Text(d.tailnet_lock_error.as_deref()?),
            Self::TailnetLockKey => Text(d.tailnet_lock_key.as_deref()?),
        })
    }
}

/// `[-]field`; a leading `-` sorts descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: Option<SortField>,
    pub descending: bool,
    raw: String,
}

impl Sort {
    pub fn parse(s: &str) -> Self {
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        Self {
            field: SortField::lookup(name),
            descending,
            raw: name.to_string(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct DeviceQuery {
    pub tags: Option<Vec<String>>,
    pub client_version: Option<VersionFilter>,
    pub sort: Option<Sort>,
}

impl DeviceQuery {
    /// Parse raw query arguments. Filter errors surface here, before any
    /// device is inspected.
    pub fn new(
        tags: Option<Vec<String>>,
        client_version: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            tags,
            client_version: client_version.map(str::parse).transpose()?,
            sort: sort.map(Sort::parse),
        })
    }
}

pub fn has_any_tag(device: &Device, wanted: &[String]) -> bool {
    let Some(tags) = device.tags.as_deref() else {
        return false;
    };
    wanted.iter().any(|w| tags.contains(w))
}

pub fn sort_devices(devices: &mut [Device], sort: &Sort) {
    let Some(field) = sort.field else {
        debug!(field = %sort.raw, "unknown sort field, keeping order");
        return;
    };
    if devices.iter().any(|d| field.key(d).is_none()) {
        debug!(field = %sort.raw, "sort field missing on some devices, keeping order");
        return;
    }

    // sort_by is stable, and reversing an Equal ordering keeps it Equal.
    devices.sort_by(|a, b| {
        let ord = field.key(a).cmp(&field.key(b));
        if sort.descending { ord.reverse() } else { ord }
    });
}

pub fn filter_and_sort(
    devices: Vec<Device>,
    query: &DeviceQuery,
) -> Result<Vec<Device>, PipelineError> {
    let total = devices.len();
    let mut devices = devices;

    if let Some(wanted) = &query.tags {
        devices.retain(|d| has_any_tag(d, wanted));
        debug!(before = total, after = devices.len(), "applied tag filter");
    }

    if let Some(filter) = &query.client_version {
        let mut kept = Vec::with_capacity(devices.len());
        for device in devices {
            if filter.matches(&device)? {
                kept.push(device);
            }
        }
        debug!(op = %filter.op, version = %filter.version, after = kept.len(), "applied version filter");
        devices = kept;
    }

    if let Some(sort) = &query.sort {
        sort_devices(&mut devices, sort);
    }

    Ok(devices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::{ID, Json};
    use serde_json::json;
    use test_case::test_case;

    use crate::model::ClientConnectivity;

    fn device(id: &str, version: &str, tags: Option<&[&str]>) -> Device {
        Device {
            addresses: vec![format!("100.64.0.{}", id.len())],
            id: ID(id.to_string()),
            node_id: format!("n{id}"),
            user: "alice@example.com".into(),
            name: format!("{id}.example.ts.net"),
            hostname: id.to_string(),
            client_version: version.to_string(),
            update_available: false,
            os: "linux".into(),
            created: "2024-01-01T00:00:00Z".into(),
            last_seen: "2024-06-01T00:00:00Z".into(),
            key_expiry_disabled: false,
            expires: "2024-12-01T00:00:00Z".into(),
            authorized: true,
            is_external: false,
            machine_key: format!("mkey:{id}"),
            node_key: format!("nodekey:{id}"),
            blocks_incoming_connections: false,
            enabled_routes: vec![],
            advertised_routes: vec![],
            client_connectivity: ClientConnectivity {
                endpoints: vec![],
                mapping_varies_by_dest_ip: false,
                latency: Json(json!({})),
                client_supports: Json(json!({})),
            },
            tags: tags.map(|t| t.iter().map(|s| s.to_string()).collect()),
            tailnet_lock_error: None,
            tailnet_lock_key: None,
        }
    }

    fn ids(devices: &[Device]) -> Vec<&str> {
        devices.iter().map(|d| d.id.as_str()).collect()
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test_case(Some(&["a", "b"]), &["b", "c"], true ; "overlap kept")]
    #[test_case(Some(&["a", "b"]), &["x"], false ; "disjoint dropped")]
    #[test_case(Some(&[]), &["a"], false ; "empty tags dropped")]
    #[test_case(None, &["a"], false ; "missing tags dropped")]
    #[test_case(Some(&["tag:prod"]), &["tag:pro"], false ; "no prefix match")]
    #[test_case(Some(&["a"]), &[], false ; "empty filter keeps nothing")]
    fn tag_filter(device_tags: Option<&[&str]>, wanted: &[&str], kept: bool) {
        let d = device("1", "1.0.0", device_tags);
        assert_eq!(has_any_tag(&d, &strings(wanted)), kept);
    }

    #[test_case(">= 1.2.0", Operator::Ge, "1.2.0" ; "operator and version")]
    #[test_case("clientVersion >= 1.2.0", Operator::Ge, "1.2.0" ; "with field token")]
    #[test_case("< 2.0.0-beta", Operator::Lt, "2.0.0-beta" ; "prerelease")]
    fn version_filter_parses(input: &str, op: Operator, version: &str) {
        let filter: VersionFilter = input.parse().unwrap();
        assert_eq!(filter.op, op);
        assert_eq!(filter.version, Version::parse(version).unwrap());
    }

    #[test_case(">=1.2.0" ; "no space")]
    #[test_case(">=  1.2.0" ; "double space")]
    #[test_case("os >= 1.2.0" ; "other field")]
    #[test_case(">= 1.2.0 extra" ; "trailing token")]
    #[test_case("" ; "empty")]
    fn version_filter_malformed(input: &str) {
        assert!(matches!(
            input.parse::<VersionFilter>(),
            Err(PipelineError::MalformedFilter(_))
        ));
    }

    #[test]
    fn version_filter_bad_operator_and_version() {
        assert!(matches!(
            "!= 1.0.0".parse::<VersionFilter>(),
            Err(PipelineError::Version(VersionError::InvalidOperator(_)))
        ));
        assert!(matches!(
            ">= 1.0".parse::<VersionFilter>(),
            Err(PipelineError::Version(VersionError::Parse { .. }))
        ));
    }

    #[test]
    fn unparsable_device_version_fails() {
        let query = DeviceQuery::new(None, Some(">= 1.0.0"), None).unwrap();
        let devices = vec![device("a", "1.2.0", None), device("b", "unknown", None)];
        assert!(matches!(
            filter_and_sort(devices, &query),
            Err(PipelineError::Version(VersionError::Parse { .. }))
        ));
    }

    #[test]
    fn sort_ascending_and_descending() {
        let devices = vec![
            device("b", "1.0.0", None),
            device("c", "1.0.0", None),
            device("a", "1.0.0", None),
        ];

        let mut asc = devices.clone();
        sort_devices(&mut asc, &Sort::parse("hostname"));
        assert_eq!(ids(&asc), vec!["a", "b", "c"]);

        let mut desc = devices;
        sort_devices(&mut desc, &Sort::parse("-hostname"));
        assert_eq!(ids(&desc), vec!["c", "b", "a"]);
    }

    #[test_case("os" ; "ascending")]
    #[test_case("-os" ; "descending")]
    fn sort_is_stable(sort: &str) {
        let mut devices = vec![
            device("first", "1.0.0", None),
            device("second", "1.0.0", None),
            device("third", "1.0.0", None),
        ];
        devices[1].os = "windows".into();
        sort_devices(&mut devices, &Sort::parse(sort));

        let linux: Vec<_> = ids(&devices).into_iter().filter(|id| *id != "second").collect();
        assert_eq!(linux, vec!["first", "third"]);
    }

    #[test_case("doesNotExist" ; "unknown field")]
    #[test_case("-doesNotExist" ; "unknown descending")]
    #[test_case("clientConnectivity" ; "nested object")]
    #[test_case("tags" ; "optional field missing on some")]
    fn sort_noop(sort: &str) {
        let mut devices = vec![
            device("z", "1.0.0", Some(&["b"])),
            device("y", "1.0.0", None),
            device("x", "1.0.0", Some(&["a"])),
        ];
        sort_devices(&mut devices, &Sort::parse(sort));
        assert_eq!(ids(&devices), vec!["z", "y", "x"]);
    }

    #[test]
    fn sort_on_flags_and_lists() {
        let mut devices = vec![
            device("a", "1.0.0", Some(&["tag:b"])),
            device("b", "1.0.0", Some(&["tag:a"])),
        ];
        devices[0].authorized = true;
        devices[1].authorized = false;

        sort_devices(&mut devices, &Sort::parse("authorized"));
        assert_eq!(ids(&devices), vec!["b", "a"]);

        sort_devices(&mut devices, &Sort::parse("-tags"));
        assert_eq!(ids(&devices), vec!["a", "b"]);
    }

    #[test]
    fn version_filter_then_descending_sort() {
        let devices = vec![
            device("old", "1.0.0", None),
            device("mid", "1.2.0", None),
            device("new", "2.0.0", None),
        ];
        let query =
            DeviceQuery::new(None, Some("clientVersion >= 1.2.0"), Some("-clientVersion")).unwrap();
        let result = filter_and_sort(devices, &query).unwrap();
        let versions: Vec<_> = result.iter().map(|d| d.client_version.as_str()).collect();
        assert_eq!(versions, vec!["2.0.0", "1.2.0"]);
    }

    #[test]
    fn tag_filter_runs_before_version_filter() {
        // The only device with a bad version is untagged; the tag filter must
        // drop it before the version filter would reject the whole request.
        let devices = vec![
            device("tagged", "1.4.0", Some(&["tag:prod"])),
            device("broken", "not-a-version", None),
            device("also-tagged", "1.1.0", Some(&["tag:prod"])),
        ];
        let query = DeviceQuery::new(Some(strings(&["tag:prod"])), Some(">= 1.2.0"), None).unwrap();
        let result = filter_and_sort(devices, &query).unwrap();
        assert_eq!(ids(&result), vec!["tagged"]);
    }

    #[test]
    fn filters_run_before_sort() {
        // "tags" is absent on the untagged device, so sorting the unfiltered
        // list would be a no-op. After the tag filter every device has tags.
        let devices = vec![
            device("b", "1.0.0", Some(&["tag:z"])),
            device("none", "1.0.0", None),
            device("a", "1.0.0", Some(&["tag:y", "tag:z"])),
        ];
        let query = DeviceQuery::new(Some(strings(&["tag:z"])), None, Some("tags")).unwrap();
        let result = filter_and_sort(devices, &query).unwrap();
        assert_eq!(ids(&result), vec!["a", "b"]);
    }

    #[test]
    fn no_arguments_is_identity() {
        let devices = vec![device("2", "1.0.0", None), device("1", "1.0.0", None)];
        let result = filter_and_sort(devices, &DeviceQuery::default()).unwrap();
        assert_eq!(ids(&result), vec!["2", "1"]);
    }
}
