/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::process::ExitCode;

use log::error;

use crate::navigation::SystemOpener;
use crate::prefs::{self, ShellPreferences};
use crate::shell::session::ShellSession;
use crate::shell::{ShellError, resources};

/// Binary entry point: preferences, logging, bundled pages, then either
/// the headless report or the windowed shell.
pub fn main() -> ExitCode {
    let args = prefs::cli_args().run();
    let preferences = ShellPreferences::resolve(args);
    crate::init_logging(preferences.log_filter.as_deref());
    match run(preferences) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(preferences: ShellPreferences) -> Result<(), ShellError> {
    let pages_dir = preferences
        .data_dir
        .clone()
        .or_else(resources::default_pages_dir)
        .ok_or_else(|| {
            ShellError::Startup("no data directory available for bundled pages".to_string())
        })?;
    let content =
        resources::install(&pages_dir).map_err(|err| ShellError::Startup(err.to_string()))?;

    let mut session = ShellSession::new(preferences.recovery, content, Box::new(SystemOpener));
    let start = session.activate(preferences.link.as_deref());

    if preferences.headless {
        println!("{start}");
        return Ok(());
    }
    open_window(session, start)
}

#[cfg(feature = "wry")]
fn open_window(
    session: ShellSession,
    start: crate::deeplink::StartUrl,
) -> Result<(), ShellError> {
    crate::shell::headed::run(session, start)
}

#[cfg(not(feature = "wry"))]
fn open_window(
    _session: ShellSession,
    start: crate::deeplink::StartUrl,
) -> Result<(), ShellError> {
    log::info!("built without the `wry` feature; reporting the start URL instead of opening a window");
    println!("{start}");
    Ok(())
}
