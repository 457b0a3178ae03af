/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use log::{info, warn};

use crate::deeplink::{self, DeepLink, StartUrl};
use crate::navigation::{ExternalOpener, NavigationGuard, RecoveryPolicy};
use crate::shell::resources::BundledContent;

/// One running shell: the bundled content plus the guard for its
/// renderer.
pub struct ShellSession {
    guard: NavigationGuard,
    content: BundledContent,
}

impl ShellSession {
    pub fn new(
        policy: RecoveryPolicy,
        content: BundledContent,
        opener: Box<dyn ExternalOpener>,
    ) -> Self {
        let guard = NavigationGuard::new(policy, content.fallback_url(), opener);
        ShellSession { guard, content }
    }

    /// Resolves one activation into a start URL and announces the load to
    /// the guard. Safe to call again while running; a re-activation
    /// supersedes the previous navigation.
    pub fn activate(&mut self, link: Option<&str>) -> StartUrl {
        let parsed = link.and_then(|raw| {
            let parsed = DeepLink::parse(raw);
            if parsed.is_none() {
                warn!("activation link is not a parsable URI, resolving defaults");
            }
            parsed
        });
        let start = deeplink::resolve_start_url(parsed.as_ref(), self.content.base_url());
        info!("activation resolved to {start}");
        self.guard.note_shell_load(start.as_str());
        start
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn guard_mut(&mut self) -> &mut NavigationGuard {
        &mut self.guard
    }

    pub fn content(&self) -> &BundledContent {
        &self.content
    }
}
