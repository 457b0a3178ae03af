/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Navigation guard and load monitor for the embedded renderer.
//!
//! The guard makes the synchronous keep-or-hand-off call for every
//! candidate navigation and runs a small load state machine
//! (`Idle -> Loading -> {Loaded, Failed}`) off an abstract renderer event
//! type, so the decision logic stays independent of any particular
//! webview's callback shapes. It owns no renderer handle: reactions come
//! back to the host as [`GuardEffect`] values, applied in order.

mod external;

use std::str::FromStr;

use log::{debug, error, info, warn};
use url::Url;

pub use external::{ExternalOpener, OpenError, SystemOpener};

/// Load progress of the renderer's main frame, per renderer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Whether a signal belongs to the top-level navigation or to one of the
/// page's sub-resources. Only main-frame signals move the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    MainFrame,
    Subresource,
}

/// Renderer load-lifecycle signals, normalized away from any host
/// callback shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererEvent {
    LoadStarted {
        url: String,
    },
    LoadError {
        frame: FrameKind,
        url: String,
        description: String,
    },
    HttpError {
        frame: FrameKind,
        url: String,
        status: u16,
    },
    TlsError {
        url: String,
        description: String,
    },
    Finished {
        url: String,
    },
}

/// Reactions the host applies on the guard's behalf, in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardEffect {
    /// Abort the secure-connection attempt behind a TLS failure. Emitted
    /// before any recovery effect and on every TLS signal.
    CancelSecureConnection,
    /// Re-point the renderer at the bundled fallback page.
    LoadFallback { url: String },
    /// Show a non-blocking, auto-dismissing notice. Hosts must dispatch
    /// this deferred, never from inside the signal callback.
    PostNotice { message: String },
    /// The fallback page finished loading.
    FallbackLoaded { url: String },
    /// A remote http(s) page finished loading.
    RemoteLoaded { url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDisposition {
    /// The renderer handles the navigation itself.
    Proceed,
    /// The navigation is suppressed in-app, whatever became of the
    /// external handoff.
    Intercepted,
}

/// What the guard does after a failed main-frame load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// Silently re-point the renderer at the bundled fallback page.
    #[default]
    FallbackPage,
    /// Leave content in place and post a transient notice.
    Notice,
}

impl FromStr for RecoveryPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fallback" | "fallback-page" => Ok(RecoveryPolicy::FallbackPage),
            "notice" => Ok(RecoveryPolicy::Notice),
            other => Err(format!(
                "unknown recovery policy `{other}` (expected `fallback` or `notice`)"
            )),
        }
    }
}

/// Per-renderer navigation guard. Single-threaded by design: the host
/// delivers interception calls and renderer events sequentially and
/// applies the returned effects on the same logical queue.
pub struct NavigationGuard {
    state: LoadState,
    policy: RecoveryPolicy,
    fallback_url: String,
    opener: Box<dyn ExternalOpener>,
    pending_shell_load: Option<String>,
    recovering: bool,
}

impl NavigationGuard {
    pub fn new(
        policy: RecoveryPolicy,
        fallback_url: impl Into<String>,
        opener: Box<dyn ExternalOpener>,
    ) -> Self {
        NavigationGuard {
            state: LoadState::Idle,
            policy,
            fallback_url: fallback_url.into(),
            opener,
            pending_shell_load: None,
            recovering: false,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn fallback_url(&self) -> &str {
        &self.fallback_url
    }

    /// Announces a load the shell itself is about to command. The matching
    /// candidate then passes interception exactly once without scheme
    /// policing; renderers that route programmatic loads through the same
    /// interception callback need this. Also supersedes tracking of any
    /// prior navigation.
    pub fn note_shell_load(&mut self, url: &str) {
        self.pending_shell_load = Some(url.to_string());
        self.recovering = false;
        self.state = LoadState::Loading;
    }

    /// Keep-or-hand-off decision for one candidate navigation. Synchronous
    /// and prompt; the only side effect is the external handoff attempt.
    pub fn decide_navigation(&mut self, candidate: &str) -> NavigationDisposition {
        if self.pending_shell_load.as_deref() == Some(candidate) {
            self.pending_shell_load = None;
            return NavigationDisposition::Proceed;
        }
        match candidate_scheme(candidate) {
            None => NavigationDisposition::Proceed,
            Some(scheme) if scheme == "http" || scheme == "https" => {
                NavigationDisposition::Proceed
            }
            Some(scheme) => {
                match self.opener.open(candidate) {
                    Ok(()) => info!("handed {scheme} link to the platform opener"),
                    Err(err) => debug!("no external handler for {scheme} link: {err}"),
                }
                NavigationDisposition::Intercepted
            }
        }
    }

    /// Feeds one renderer signal through the state machine.
    pub fn handle_event(&mut self, event: RendererEvent) -> Vec<GuardEffect> {
        match event {
            RendererEvent::LoadStarted { url } => {
                debug!("load started: {url}");
                self.state = LoadState::Loading;
                // Anything but the fallback page starting to load
                // supersedes a recovery in flight; its failure must
                // recover again.
                self.recovering = url == self.fallback_url;
                Vec::new()
            }
            RendererEvent::LoadError {
                frame,
                url,
                description,
            } => {
                if frame != FrameKind::MainFrame {
                    debug!("ignoring subresource error on {url}: {description}");
                    return Vec::new();
                }
                warn!("load failed for {url}: {description}");
                self.fail(&description)
            }
            RendererEvent::HttpError { frame, url, status } => {
                if frame != FrameKind::MainFrame || status < 400 {
                    debug!("ignoring http {status} on {url}");
                    return Vec::new();
                }
                warn!("http {status} for {url}");
                self.fail(&format!("HTTP {status}"))
            }
            RendererEvent::TlsError { url, description } => {
                warn!("tls failure for {url}: {description}");
                // Fail closed: the connection attempt dies even when the
                // state machine has nothing left to do.
                let mut effects = vec![GuardEffect::CancelSecureConnection];
                effects.extend(self.fail(&description));
                effects
            }
            RendererEvent::Finished { url } => {
                self.state = LoadState::Loaded;
                self.recovering = false;
                if url == self.fallback_url {
                    info!("fallback page loaded");
                    vec![GuardEffect::FallbackLoaded { url }]
                } else if has_web_scheme(&url) {
                    info!("remote page loaded: {url}");
                    vec![GuardEffect::RemoteLoaded { url }]
                } else {
                    debug!("local page loaded: {url}");
                    Vec::new()
                }
            }
        }
    }

    /// One recovery per failed navigation: repeat error signals while
    /// `Failed` are swallowed, and a failure of the fallback load itself
    /// is logged without another redirect.
    fn fail(&mut self, description: &str) -> Vec<GuardEffect> {
        if self.state == LoadState::Failed {
            debug!("already failed, suppressing repeat recovery");
            return Vec::new();
        }
        let fallback_was_in_flight = self.recovering;
        self.state = LoadState::Failed;
        if fallback_was_in_flight {
            error!("fallback page failed to load: {description}");
            return Vec::new();
        }
        match self.policy {
            RecoveryPolicy::FallbackPage => {
                self.recovering = true;
                self.pending_shell_load = Some(self.fallback_url.clone());
                vec![GuardEffect::LoadFallback {
                    url: self.fallback_url.clone(),
                }]
            }
            RecoveryPolicy::Notice => vec![GuardEffect::PostNotice {
                message: format!("Page failed to load: {description}"),
            }],
        }
    }
}

/// Scheme of a candidate URI, lowercased. `None` for anything `Url`
/// cannot parse as absolute, which the renderer handles as local.
fn candidate_scheme(candidate: &str) -> Option<String> {
    Url::parse(candidate)
        .ok()
        .map(|url| url.scheme().to_string())
}

fn has_web_scheme(url: &str) -> bool {
    let lowered = url.to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}
