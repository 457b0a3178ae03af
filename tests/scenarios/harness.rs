use mapshell::navigation::{GuardEffect, RecoveryPolicy};
use mapshell::shell::resources::BundledContent;
use mapshell::shell::session::ShellSession;
use mapshell::test_utils::{FakeRenderer, RecordingOpener};

pub(crate) const BASE: &str = "file:///shed/pages/atlas.html";
pub(crate) const FALLBACK: &str = "file:///shed/pages/offline.html";

/// One shell run against a scripted renderer: the session owns the guard,
/// the renderer commits whatever the guard lets through, the opener
/// records external handoffs.
pub(crate) struct Scenario {
    pub(crate) session: ShellSession,
    pub(crate) renderer: FakeRenderer,
    pub(crate) opener: RecordingOpener,
}

impl Scenario {
    pub(crate) fn new(policy: RecoveryPolicy) -> Self {
        let opener = RecordingOpener::new();
        let content = BundledContent::new(BASE, FALLBACK);
        let session = ShellSession::new(policy, content, Box::new(opener.clone()));
        Scenario {
            session,
            renderer: FakeRenderer::new(),
            opener,
        }
    }

    /// Applies guard effects the way a host shell would: fallback
    /// redirects are driven back through the renderer, everything else is
    /// handed back for the test to inspect.
    pub(crate) fn apply(&mut self, effects: Vec<GuardEffect>) -> Vec<GuardEffect> {
        let mut reported = Vec::new();
        for effect in effects {
            match effect {
                GuardEffect::LoadFallback { url } => {
                    self.renderer.navigate(self.session.guard_mut(), &url);
                }
                other => reported.push(other),
            }
        }
        reported
    }
}
