/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Hosting-shell glue: bundled pages on disk, the session wiring the
//! resolver to the navigation guard, and the entry points.

pub mod cli;
#[cfg(feature = "wry")]
pub mod headed;
pub mod resources;
pub mod session;

use std::fmt;

#[derive(Debug)]
pub enum ShellError {
    Startup(String),
    #[cfg(feature = "wry")]
    Windowing(String),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Startup(detail) => write!(f, "startup failed: {detail}"),
            #[cfg(feature = "wry")]
            ShellError::Windowing(detail) => write!(f, "windowing failed: {detail}"),
        }
    }
}
