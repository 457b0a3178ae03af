/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::deeplink::fields::{self, ResolvedParams};

// Default pin: the Temple of Lemminkäinen cairn in Vantaa. Used whenever a
// deep link resolves no usable location.
pub const DEFAULT_LATITUDE: f64 = 60.2633;
pub const DEFAULT_LONGITUDE: f64 = 25.3244;
pub const DEFAULT_TITLE: &str = "Temple of Lemminkäinen";

// Input within this distance of the default pin on both axes, with no
// explicit caption, gets the default caption.
const DEFAULT_LOCATION_TOLERANCE: f64 = 1e-4;

// RFC 3986 unreserved characters stay verbatim in query and fragment
// values; everything else is %XX-escaped (space becomes %20, never '+').
const VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Canonical URL handed to the renderer. Construction goes through
/// [`finalize`] + [`assemble`], so the string always carries `lat` and
/// `lon` and every value is sanitized and percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartUrl(String);

impl StartUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StartUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameter set after default substitution: the location is no longer
/// optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StartParams {
    pub(crate) lat: String,
    pub(crate) lon: String,
    pub(crate) zoom: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) token: Option<String>,
    pub(crate) api_key: Option<String>,
}

/// Applies the default location and caption rules: a missing coordinate
/// forces both to the default pin; a caption appears only when explicitly
/// resolved or when the location is (or is within tolerance of) the
/// default pin.
pub(crate) fn finalize(params: ResolvedParams) -> StartParams {
    let (lat, lon, defaulted) = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => (lat, lon, false),
        _ => (
            fields::format_coordinate(DEFAULT_LATITUDE),
            fields::format_coordinate(DEFAULT_LONGITUDE),
            true,
        ),
    };
    let title = params.title.or_else(|| {
        (defaulted || near_default_pin(&lat, &lon)).then(|| DEFAULT_TITLE.to_string())
    });
    StartParams {
        lat,
        lon,
        zoom: params.zoom,
        title,
        token: params.token,
        api_key: params.api_key,
    }
}

fn near_default_pin(lat: &str, lon: &str) -> bool {
    near(lat, DEFAULT_LATITUDE) && near(lon, DEFAULT_LONGITUDE)
}

fn near(rendered: &str, target: f64) -> bool {
    rendered
        .parse::<f64>()
        .is_ok_and(|value| (value - target).abs() < DEFAULT_LOCATION_TOLERANCE)
}

/// Renders the canonical string: base + ordered query (`lat`, `lon`, then
/// `z` and `title` when present) + `#t=..&k=..` when a token or key
/// resolved, either half dropped when absent.
pub(crate) fn assemble(params: &StartParams, base_url: &str) -> StartUrl {
    let mut url = String::with_capacity(base_url.len() + 80);
    url.push_str(base_url);
    url.push('?');
    push_pair(&mut url, "lat", &params.lat);
    url.push('&');
    push_pair(&mut url, "lon", &params.lon);
    if let Some(zoom) = &params.zoom {
        url.push('&');
        push_pair(&mut url, "z", zoom);
    }
    if let Some(title) = &params.title {
        url.push('&');
        push_pair(&mut url, "title", title);
    }
    if let Some(fragment) = hash_fragment(params.token.as_deref(), params.api_key.as_deref()) {
        url.push('#');
        url.push_str(&fragment);
    }
    StartUrl(url)
}

fn push_pair(url: &mut String, key: &str, value: &str) {
    url.push_str(key);
    url.push('=');
    url.extend(utf8_percent_encode(value, VALUE_ENCODE_SET));
}

fn hash_fragment(token: Option<&str>, api_key: Option<&str>) -> Option<String> {
    let mut fragment = String::new();
    if let Some(token) = token {
        fragment.push_str("t=");
        fragment.extend(utf8_percent_encode(token, VALUE_ENCODE_SET));
    }
    if let Some(api_key) = api_key {
        if !fragment.is_empty() {
            fragment.push('&');
        }
        fragment.push_str("k=");
        fragment.extend(utf8_percent_encode(api_key, VALUE_ENCODE_SET));
    }
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}
