/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Deep-link resolution: turns an arbitrary activation URI into the
//! canonical start URL for the bundled map page.
//!
//! Parameters come from three sources in priority order: query parameters,
//! a trailing `lat,lon` path segment, then the fragment re-read as a query
//! string. A value that fails sanitization counts as absent, and a link
//! that resolves no usable location falls back to the default pin. The
//! whole pass is pure and total: any input, including none, yields a
//! loadable URL.

mod fields;
mod start_url;

use url::Url;

pub use fields::ResolvedParams;
pub use start_url::{DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_TITLE, StartUrl};

/// Parsed view of one activation URI. Holds only what resolution reads:
/// decoded query pairs (first occurrence per key wins), non-empty path
/// segments in order, and the raw fragment.
#[derive(Debug, Clone)]
pub struct DeepLink {
    query: Vec<(String, String)>,
    path_segments: Vec<String>,
    fragment: Option<String>,
}

impl DeepLink {
    /// Parses an activation string. Anything `Url` rejects is treated as
    /// no link at all, which downstream resolves to the defaults.
    pub fn parse(raw: &str) -> Option<DeepLink> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let url = Url::parse(trimmed).ok()?;
        let query = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        let path_segments = url
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|segment| !segment.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let fragment = url
            .fragment()
            .filter(|fragment| !fragment.is_empty())
            .map(str::to_string);
        Some(DeepLink {
            query,
            path_segments,
            fragment,
        })
    }

    fn query_value(&self, key: &str) -> Option<String> {
        self.query
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.clone())
    }

    /// Last path segment as a `lat,lon` pair. Trailing empty parts are
    /// discarded, then exactly two comma-separated parts are required,
    /// otherwise the segment is ignored. Leading and interior empty parts
    /// still count (and fail sanitization later).
    fn trailing_location_pair(&self) -> Option<(&str, &str)> {
        let last = self.path_segments.last()?;
        let mut parts = last.trim_end_matches(',').split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lon), None) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Reads one key out of the fragment re-interpreted as a query string
    /// (`a=1&b=2`, percent-decoded). First occurrence wins.
    fn fragment_value(&self, key: &str) -> Option<String> {
        let fragment = self.fragment.as_deref()?;
        url::form_urlencoded::parse(fragment.as_bytes())
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.into_owned())
    }
}

/// Resolves the canonical start URL for one activation. Deterministic and
/// side-effect-free; degrades to the default pin instead of failing.
pub fn resolve_start_url(link: Option<&DeepLink>, base_url: &str) -> StartUrl {
    let mut params = ResolvedParams::default();
    if let Some(link) = link {
        params.fill_from_source(|key| link.query_value(key));
        if !params.has_location()
            && let Some((lat_raw, lon_raw)) = link.trailing_location_pair()
        {
            params.replace_location_from_pair(lat_raw, lon_raw);
        }
        params.fill_from_source(|key| link.fragment_value(key));
    }
    start_url::assemble(&start_url::finalize(params), base_url)
}
