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

use async_graphql::connection::Connection;
use async_graphql::{Context, EmptyMutation, EmptySubscription, ErrorExtensions, Object, Schema};
use serde::de::DeserializeOwned;
use tailgraph_types::dns::{Nameservers, Preferences, SearchPaths};
use tailgraph_types::{DevicesResponse, KeysResponse};
use tracing::debug;

use crate::adapter;
use crate::error::ApiError;
use crate::model::{Device, DnsPreferences, Key};
use crate::pagination::{ArrayCursor, PageArgs, Window};
use crate::pipeline::{self, DeviceQuery};
use crate::upstream::Upstream;

pub type GatewaySchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Upper bound on `first`/`last` and the default page size.
#[derive(Debug, Clone, Copy)]
pub struct MaxPageSize(pub usize);

pub fn build_schema(upstream: Upstream, max_page_size: usize) -> GatewaySchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(upstream)
        .data(MaxPageSize(max_page_size))
        .finish()
}

fn upstream<'a>(ctx: &Context<'a>) -> Result<&'a Upstream, ApiError> {
    ctx.data::<Upstream>().map_err(|_| ApiError::Internal)
}

async fn fetch<T: DeserializeOwned + Send>(ctx: &Context<'_>, path: &str) -> async_graphql::Result<T> {
    let upstream = upstream(ctx).map_err(|e| e.extend())?;
    upstream.get(path).await.map_err(|e| ApiError::from(e).extend())
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn dns(&self) -> Dns {
        Dns
    }

    async fn keys(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Key>> {
        let resp: KeysResponse = fetch(ctx, "/keys").await?;
        Ok(adapter::keys(resp).collect())
    }

    #[allow(clippy::too_many_arguments)]
    async fn devices(
        &self,
        ctx: &Context<'_>,
        tags: Option<Vec<String>>,
        client_version: Option<String>,
        sort: Option<String>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> async_graphql::Result<Connection<ArrayCursor, Device>> {
        let args = PageArgs { after, before, first, last };
        devices(ctx, tags, client_version, sort, args)
            .await
            .map_err(|e| e.extend())
    }
}

async fn devices(
    ctx: &Context<'_>,
    tags: Option<Vec<String>>,
    client_version: Option<String>,
    sort: Option<String>,
    args: PageArgs,
) -> Result<Connection<ArrayCursor, Device>, ApiError> {
    let MaxPageSize(max_page_size) = *ctx.data::<MaxPageSize>().map_err(|_| ApiError::Internal)?;
    let query = DeviceQuery::new(tags, client_version.as_deref(), sort.as_deref())?;

    let resp: DevicesResponse = upstream(ctx)?.get("/devices?fields=all").await?;
    let devices = pipeline::filter_and_sort(adapter::devices(resp).collect(), &query)?;

    let window = Window::compute(devices.len(), &args, max_page_size)?;
    debug!(
        total = devices.len(),
        start = window.start,
        end = window.end,
        "paginating devices"
    );
    Ok(window.connect(devices))
}

/// Tailnet DNS settings. Each field is a separate upstream call.
pub struct Dns;

#[Object(name = "DNS")]
impl Dns {
    async fn nameservers(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<String>> {
        let resp: Nameservers = fetch(ctx, "/dns/nameservers").await?;
        Ok(adapter::nameservers(resp).collect())
    }

    async fn preferences(&self, ctx: &Context<'_>) -> async_graphql::Result<DnsPreferences> {
        let resp: Preferences = fetch(ctx, "/dns/preferences").await?;
        Ok(resp.into())
    }

    async fn search_paths(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<String>> {
        let resp: SearchPaths = fetch(ctx, "/dns/searchpaths").await?;
        Ok(adapter::search_paths(resp).collect())
    }
}
