/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::ops::RangeInclusive;

// Closed acceptance ranges for geographic coordinates. Values on the
// boundary are valid.
pub(crate) const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
pub(crate) const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

// Hard cap on the caption, counted in Unicode scalar values. Anything
// longer is cut, not rejected.
pub(crate) const TITLE_MAX_CHARS: usize = 160;

/// Sanitized deep-link parameters, each independently optional. The merge
/// over the three parameter sources (query, trailing path pair, fragment)
/// runs through [`ResolvedParams::fill_from_source`], which only ever fills
/// holes, so source priority is the call order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolvedParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub zoom: Option<String>,
    pub title: Option<String>,
    pub token: Option<String>,
    pub api_key: Option<String>,
}

impl ResolvedParams {
    /// True once both coordinates carry a validated value.
    pub fn has_location(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }

    /// Pulls every still-unresolved field out of one parameter source.
    /// `raw` maps a parameter key to its raw (already percent-decoded)
    /// value; each hit runs through the field's sanitizer and a value that
    /// fails sanitization leaves the field unresolved for later sources.
    pub(crate) fn fill_from_source(&mut self, mut raw: impl FnMut(&str) -> Option<String>) {
        fill_with(&mut self.lat, || {
            raw("lat").as_deref().and_then(sanitize_latitude)
        });
        fill_with(&mut self.lon, || {
            raw("lon").as_deref().and_then(sanitize_longitude)
        });
        fill_with(&mut self.zoom, || raw("z").as_deref().and_then(sanitize_zoom));
        fill_with(&mut self.title, || {
            raw("title").as_deref().and_then(sanitize_title)
        });
        fill_with(&mut self.token, || {
            raw("t").as_deref().and_then(trim_to_non_empty)
        });
        fill_with(&mut self.api_key, || {
            raw("k").as_deref().and_then(trim_to_non_empty)
        });
    }

    /// Re-derives both coordinates from a trailing `lat,lon` path pair.
    /// The pair replaces the pair: a part that fails sanitization clears
    /// that coordinate even when an earlier source had resolved it.
    pub(crate) fn replace_location_from_pair(&mut self, lat_raw: &str, lon_raw: &str) {
        self.lat = sanitize_latitude(lat_raw);
        self.lon = sanitize_longitude(lon_raw);
    }
}

fn fill_with(slot: &mut Option<String>, resolve: impl FnOnce() -> Option<String>) {
    if slot.is_none() {
        *slot = resolve();
    }
}

pub(crate) fn sanitize_latitude(raw: &str) -> Option<String> {
    sanitize_coordinate(raw, LATITUDE_RANGE)
}

pub(crate) fn sanitize_longitude(raw: &str) -> Option<String> {
    sanitize_coordinate(raw, LONGITUDE_RANGE)
}

fn sanitize_coordinate(raw: &str, range: RangeInclusive<f64>) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = trimmed.parse().ok()?;
    if !value.is_finite() || !range.contains(&value) {
        return None;
    }
    Some(format_coordinate(value))
}

/// Canonical coordinate rendering: six fractional digits, `.` separator
/// regardless of locale.
pub(crate) fn format_coordinate(value: f64) -> String {
    format!("{value:.6}")
}

pub(crate) fn sanitize_zoom(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    // u32 rejects signs and fractions; re-rendering strips leading zeros.
    let value: u32 = trimmed.parse().ok()?;
    Some(value.to_string())
}

pub(crate) fn sanitize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => Some(trimmed[..cut].to_string()),
        None => Some(trimmed.to_string()),
    }
}

pub(crate) fn trim_to_non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
