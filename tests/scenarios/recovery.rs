use mapshell::navigation::{
    FrameKind, GuardEffect, LoadState, NavigationDisposition, RecoveryPolicy, RendererEvent,
};

use super::harness::{self, Scenario};

/// Start the shell on the bundled page, then hop to a remote map layer.
fn start_and_reach(scenario: &mut Scenario, remote: &str) {
    let start = scenario.session.activate(None);
    scenario
        .renderer
        .navigate(scenario.session.guard_mut(), start.as_str());
    let disposition = scenario
        .renderer
        .navigate(scenario.session.guard_mut(), remote);
    assert_eq!(disposition, NavigationDisposition::Proceed);
    let effects = scenario.session.guard_mut().handle_event(RendererEvent::LoadStarted {
        url: remote.to_string(),
    });
    assert!(effects.is_empty());
}

#[test]
fn test_http_failure_swaps_in_offline_page_exactly_once() {
    let mut scenario = Scenario::new(RecoveryPolicy::FallbackPage);
    let remote = "https://tiles.example/regions/viewer";
    start_and_reach(&mut scenario, remote);

    let effects = scenario.session.guard_mut().handle_event(RendererEvent::HttpError {
        frame: FrameKind::MainFrame,
        url: remote.to_string(),
        status: 404,
    });
    let reported = scenario.apply(effects);
    assert!(reported.is_empty());
    assert_eq!(scenario.renderer.current_url(), Some(harness::FALLBACK));

    // The engine keeps signalling about the same dead load.
    let effects = scenario.session.guard_mut().handle_event(RendererEvent::LoadError {
        frame: FrameKind::MainFrame,
        url: remote.to_string(),
        description: "net::ERR_ABORTED".to_string(),
    });
    assert!(effects.is_empty(), "repeat failure must not redirect again");
    assert_eq!(scenario.renderer.current_url(), Some(harness::FALLBACK));

    let effects = scenario.session.guard_mut().handle_event(RendererEvent::LoadStarted {
        url: harness::FALLBACK.to_string(),
    });
    assert!(effects.is_empty());
    let effects = scenario.session.guard_mut().handle_event(RendererEvent::Finished {
        url: harness::FALLBACK.to_string(),
    });
    assert_eq!(
        effects,
        vec![GuardEffect::FallbackLoaded {
            url: harness::FALLBACK.to_string(),
        }]
    );
    assert_eq!(scenario.session.guard().state(), LoadState::Loaded);
}

#[test]
fn test_notice_policy_keeps_content_in_place() {
    let mut scenario = Scenario::new(RecoveryPolicy::Notice);
    let remote = "https://tiles.example/regions/viewer";
    start_and_reach(&mut scenario, remote);

    let effects = scenario.session.guard_mut().handle_event(RendererEvent::HttpError {
        frame: FrameKind::MainFrame,
        url: remote.to_string(),
        status: 503,
    });
    let reported = scenario.apply(effects);
    assert_eq!(
        reported,
        vec![GuardEffect::PostNotice {
            message: "Page failed to load: HTTP 503".to_string(),
        }]
    );
    assert_eq!(scenario.renderer.current_url(), Some(remote));
    assert_eq!(scenario.session.guard().state(), LoadState::Failed);

    // A follow-up navigation re-arms the machine.
    let next = "https://tiles.example/regions/other";
    let disposition = scenario
        .renderer
        .navigate(scenario.session.guard_mut(), next);
    assert_eq!(disposition, NavigationDisposition::Proceed);
    let effects = scenario.session.guard_mut().handle_event(RendererEvent::LoadStarted {
        url: next.to_string(),
    });
    assert!(effects.is_empty());
    assert_eq!(scenario.session.guard().state(), LoadState::Loading);
}

#[test]
fn test_mailto_click_stays_on_current_page() {
    let mut scenario = Scenario::new(RecoveryPolicy::FallbackPage);
    let start = scenario.session.activate(None);
    scenario
        .renderer
        .navigate(scenario.session.guard_mut(), start.as_str());

    let disposition = scenario
        .renderer
        .navigate(scenario.session.guard_mut(), "mailto:staff@example.org");
    assert_eq!(disposition, NavigationDisposition::Intercepted);
    assert_eq!(scenario.renderer.current_url(), Some(start.as_str()));
    assert_eq!(
        scenario.opener.opened(),
        vec!["mailto:staff@example.org".to_string()]
    );
}

#[test]
fn test_tls_failure_cancels_then_recovers() {
    let mut scenario = Scenario::new(RecoveryPolicy::FallbackPage);
    let remote = "https://self-signed.example/map";
    start_and_reach(&mut scenario, remote);

    let effects = scenario.session.guard_mut().handle_event(RendererEvent::TlsError {
        url: remote.to_string(),
        description: "certificate has expired".to_string(),
    });
    let reported = scenario.apply(effects);
    assert_eq!(reported, vec![GuardEffect::CancelSecureConnection]);
    assert_eq!(scenario.renderer.current_url(), Some(harness::FALLBACK));

    // Every TLS signal cancels, even with recovery already underway.
    let effects = scenario.session.guard_mut().handle_event(RendererEvent::TlsError {
        url: remote.to_string(),
        description: "certificate has expired".to_string(),
    });
    assert_eq!(effects, vec![GuardEffect::CancelSecureConnection]);
    assert_eq!(scenario.renderer.current_url(), Some(harness::FALLBACK));

    let effects = scenario.session.guard_mut().handle_event(RendererEvent::Finished {
        url: harness::FALLBACK.to_string(),
    });
    assert_eq!(
        effects,
        vec![GuardEffect::FallbackLoaded {
            url: harness::FALLBACK.to_string(),
        }]
    );
}
