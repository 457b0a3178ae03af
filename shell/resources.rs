/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Bundled pages. Both ship inside the binary and are unpacked into a
//! per-user directory on startup so the renderer can load them over
//! `file://`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use url::Url;

const ATLAS_PAGE: &str = include_str!("../assets/atlas.html");
const OFFLINE_PAGE: &str = include_str!("../assets/offline.html");

const ATLAS_FILE: &str = "atlas.html";
const OFFLINE_FILE: &str = "offline.html";

#[derive(Debug)]
pub enum ResourceError {
    Io(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Io(detail) => write!(f, "bundled page install failed: {detail}"),
        }
    }
}

/// Locations of the installed pages. The base URL is the map page the
/// resolver builds start URLs on; the fallback URL is the recovery target
/// and is always distinct from the base.
#[derive(Debug, Clone)]
pub struct BundledContent {
    base_url: String,
    fallback_url: String,
}

impl BundledContent {
    pub fn new(base_url: impl Into<String>, fallback_url: impl Into<String>) -> Self {
        BundledContent {
            base_url: base_url.into(),
            fallback_url: fallback_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fallback_url(&self) -> &str {
        &self.fallback_url
    }
}

/// Default install dir: platform data dir + `mapshell/pages`.
pub fn default_pages_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("mapshell").join("pages"))
}

/// Writes both pages under `dir` (creating it), refreshing copies whose
/// text drifted from the embedded version, and returns their `file://`
/// URLs.
pub fn install(dir: &Path) -> Result<BundledContent, ResourceError> {
    fs::create_dir_all(dir)
        .map_err(|err| ResourceError::Io(format!("create {}: {err}", dir.display())))?;
    let base_url = install_page(dir, ATLAS_FILE, ATLAS_PAGE)?;
    let fallback_url = install_page(dir, OFFLINE_FILE, OFFLINE_PAGE)?;
    Ok(BundledContent {
        base_url,
        fallback_url,
    })
}

fn install_page(dir: &Path, name: &str, contents: &str) -> Result<String, ResourceError> {
    let path = dir.join(name);
    let stale = match fs::read_to_string(&path) {
        Ok(existing) => existing != contents,
        Err(_) => true,
    };
    if stale {
        fs::write(&path, contents)
            .map_err(|err| ResourceError::Io(format!("write {}: {err}", path.display())))?;
        info!("installed bundled page {}", path.display());
    } else {
        debug!("bundled page {} is current", path.display());
    }
    file_url(&path)
}

fn file_url(path: &Path) -> Result<String, ResourceError> {
    let absolute = path
        .canonicalize()
        .map_err(|err| ResourceError::Io(format!("resolve {}: {err}", path.display())))?;
    Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|()| ResourceError::Io(format!("not an absolute path: {}", absolute.display())))
}
