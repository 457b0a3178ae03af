use mapshell::navigation::{LoadState, NavigationDisposition, RecoveryPolicy, RendererEvent};

use super::harness::{self, Scenario};

#[test]
fn test_cold_start_lands_on_default_pin() {
    let mut scenario = Scenario::new(RecoveryPolicy::FallbackPage);
    let start = scenario.session.activate(None);

    assert_eq!(
        start.as_str(),
        format!(
            "{}?lat=60.263300&lon=25.324400&title=Temple%20of%20Lemmink%C3%A4inen",
            harness::BASE
        )
    );

    // The shell's own load passes interception, and a local page finish
    // is not reported as remote content.
    let disposition = scenario
        .renderer
        .navigate(scenario.session.guard_mut(), start.as_str());
    assert_eq!(disposition, NavigationDisposition::Proceed);

    let effects = scenario.session.guard_mut().handle_event(RendererEvent::LoadStarted {
        url: start.as_str().to_string(),
    });
    assert!(effects.is_empty());
    let effects = scenario.session.guard_mut().handle_event(RendererEvent::Finished {
        url: start.as_str().to_string(),
    });
    assert!(effects.is_empty(), "local finish should produce no reports");
    assert_eq!(scenario.session.guard().state(), LoadState::Loaded);
}

#[test]
fn test_deep_link_parameters_reach_the_start_url() {
    let mut scenario = Scenario::new(RecoveryPolicy::FallbackPage);
    let start = scenario
        .session
        .activate(Some("mapshell://map/61.0,24.5?z=11#t=abc"));

    assert_eq!(
        start.as_str(),
        format!("{}?lat=61.000000&lon=24.500000&z=11#t=abc", harness::BASE)
    );
}

#[test]
fn test_reactivation_supersedes_previous_navigation() {
    let mut scenario = Scenario::new(RecoveryPolicy::FallbackPage);
    let first = scenario.session.activate(None);
    let disposition = scenario
        .renderer
        .navigate(scenario.session.guard_mut(), first.as_str());
    assert_eq!(disposition, NavigationDisposition::Proceed);

    let second = scenario
        .session
        .activate(Some("mapshell://open?lat=59.437&lon=24.7536&title=Tallinn"));
    assert_ne!(first.as_str(), second.as_str());

    let disposition = scenario
        .renderer
        .navigate(scenario.session.guard_mut(), second.as_str());
    assert_eq!(disposition, NavigationDisposition::Proceed);
    assert_eq!(scenario.renderer.current_url(), Some(second.as_str()));

    // The superseded start URL is no longer recognized as a shell load.
    let stale = scenario
        .renderer
        .navigate(scenario.session.guard_mut(), first.as_str());
    assert_eq!(stale, NavigationDisposition::Intercepted);
    assert_eq!(scenario.opener.opened(), vec![first.as_str().to_string()]);
    assert_eq!(scenario.renderer.current_url(), Some(second.as_str()));
}

#[test]
fn test_malformed_link_degrades_to_default_pin() {
    let mut with_garbage = Scenario::new(RecoveryPolicy::FallbackPage);
    let mut without_link = Scenario::new(RecoveryPolicy::FallbackPage);

    let from_garbage = with_garbage.session.activate(Some("not a uri at all"));
    let from_nothing = without_link.session.activate(None);

    assert_eq!(from_garbage.as_str(), from_nothing.as_str());
}
