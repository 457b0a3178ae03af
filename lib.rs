/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! mapshell: a thin desktop shell around an embedded web renderer that
//! shows a bundled interactive map page.
//!
//! The engineering lives in two places: [`deeplink`] turns an arbitrary
//! activation URI into a safe canonical start URL, and [`navigation`]
//! polices every navigation of the renderer and recovers from failed
//! loads. Everything under [`shell`] is glue: preferences, bundled page
//! install, the session tying resolver to guard, and the entry points.

pub mod deeplink;
pub mod navigation;
pub mod prefs;
pub mod shell;
pub mod test_utils;

use tracing_subscriber::EnvFilter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Installs the process-wide subscriber once; output from the `log`
/// facade is bridged in. Filter precedence: explicit argument, then
/// `MAPSHELL_LOG`, then `info`.
pub fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_env(prefs::ENV_LOG).unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
