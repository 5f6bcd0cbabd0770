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

//! Relay-style cursor pagination over an in-memory list.
//!
//! Cursors encode an index into the list as handed to [`Window::compute`].
//! They stay meaningful across calls only if the upstream list does.

use async_graphql::connection::{Connection, CursorType, Edge};
use async_graphql::OutputType;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

const CURSOR_PREFIX: &str = "arrayconnection:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("argument '{arg}' must be a non-negative integer")]
    Negative { arg: &'static str },

    #[error("argument '{arg}' cannot be higher than {max}")]
    TooLarge { arg: &'static str, max: usize },

    #[error("argument '{arg}' is not a valid cursor")]
    InvalidCursor { arg: &'static str },
}

/// Position of an item in the ordered result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayCursor(pub usize);

#[derive(Debug, Error)]
#[error("invalid cursor")]
pub struct CursorError;

impl CursorType for ArrayCursor {
    type Error = CursorError;

    fn decode_cursor(s: &str) -> Result<Self, Self::Error> {
        let bytes = STANDARD.decode(s).map_err(|_| CursorError)?;
        let text = String::from_utf8(bytes).map_err(|_| CursorError)?;
        let index = text
            .strip_prefix(CURSOR_PREFIX)
            .and_then(|n| n.parse().ok())
            .ok_or(CursorError)?;
        Ok(Self(index))
    }

    fn encode_cursor(&self) -> String {
        STANDARD.encode(format!("{CURSOR_PREFIX}{}", self.0))
    }
}

#[derive(Debug, Default, Clone)]
pub struct PageArgs {
    pub after: Option<String>,
    pub before: Option<String>,
    pub first: Option<i32>,
    pub last: Option<i32>,
}

fn decode(arg: &'static str, cursor: Option<&str>) -> Result<Option<usize>, PageError> {
    cursor
        .map(|c| {
            ArrayCursor::decode_cursor(c)
                .map(|ArrayCursor(i)| i)
                .map_err(|_| PageError::InvalidCursor { arg })
        })
        .transpose()
}

fn count(arg: &'static str, value: Option<i32>, max: usize) -> Result<Option<usize>, PageError> {
    match value {
        None => Ok(None),
        Some(n) if n < 0 => Err(PageError::Negative { arg }),
        Some(n) if n as usize > max => Err(PageError::TooLarge { arg, max }),
        Some(n) => Ok(Some(n as usize)),
    }
}

/// The `start..end` slice of a list selected by a set of page arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl Window {
    pub fn compute(total: usize, args: &PageArgs, max_page_size: usize) -> Result<Self, PageError> {
        let after = decode("after", args.after.as_deref())?;
        let before = decode("before", args.before.as_deref())?;
        let first = count("first", args.first, max_page_size)?;
        let last = count("last", args.last, max_page_size)?;

        let mut start = after.map_or(0, |i| i.saturating_add(1)).min(total);
        let mut end = before.map_or(total, |i| i.min(total)).max(start);

        if let Some(first) = first {
            end = end.min(start.saturating_add(first));
        }
        if let Some(last) = last {
            start = start.max(end.saturating_sub(last));
        }
        if first.is_none() && last.is_none() {
            end = end.min(start.saturating_add(max_page_size));
        }

        Ok(Self {
            start,
            end,
            has_previous_page: start > 0,
            has_next_page: end < total,
        })
    }

    /// Build a relay connection from the items this window selects.
    pub fn connect<T: OutputType>(self, items: Vec<T>) -> Connection<ArrayCursor, T> {
        let mut connection = Connection::new(self.has_previous_page, self.has_next_page);
        connection.edges.extend(
            items
                .into_iter()
                .enumerate()
                .skip(self.start)
                .take(self.end - self.start)
                .map(|(i, item)| Edge::new(ArrayCursor(i), item)),
        );
        connection
    }
}
