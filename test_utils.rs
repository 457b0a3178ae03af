/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Support types for exercising the guard and session from tests.

use std::sync::{Arc, Mutex};

use crate::navigation::{ExternalOpener, NavigationDisposition, NavigationGuard, OpenError};

/// Opener that records every handoff instead of spawning anything.
#[derive(Clone, Default)]
pub struct RecordingOpener {
    opened: Arc<Mutex<Vec<String>>>,
    reject: bool,
}

impl RecordingOpener {
    pub fn new() -> Self {
        RecordingOpener::default()
    }

    /// Simulates a host with no external handler installed: the attempt
    /// is still recorded, then reported as unavailable.
    pub fn rejecting() -> Self {
        RecordingOpener {
            reject: true,
            ..RecordingOpener::default()
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().expect("opener log poisoned").clone()
    }
}

impl ExternalOpener for RecordingOpener {
    fn open(&self, uri: &str) -> Result<(), OpenError> {
        self.opened
            .lock()
            .expect("opener log poisoned")
            .push(uri.to_string());
        if self.reject {
            Err(OpenError::Unavailable("no handler registered".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Minimal scripted renderer: routes candidate navigations through the
/// guard the way an embedding webview would and tracks the committed
/// page.
#[derive(Debug, Default)]
pub struct FakeRenderer {
    current_url: Option<String>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        FakeRenderer::default()
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    /// One candidate navigation; commits the page only when the guard
    /// lets it through.
    pub fn navigate(&mut self, guard: &mut NavigationGuard, url: &str) -> NavigationDisposition {
        let disposition = guard.decide_navigation(url);
        if disposition == NavigationDisposition::Proceed {
            self.current_url = Some(url.to_string());
        }
        disposition
    }
}
