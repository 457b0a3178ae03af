/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Windowed embedding on wry/tao: one window, one webview, with the
//! guard spliced into the webview's navigation and page-load callbacks.
//! Guard effects are never applied inside those callbacks; they travel
//! through the event-loop proxy and land on the next loop turn.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, error, warn};
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tao::window::{Window, WindowBuilder};
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use crate::deeplink::StartUrl;
use crate::navigation::{GuardEffect, NavigationDisposition, RendererEvent};
use crate::shell::ShellError;
use crate::shell::session::ShellSession;

const WINDOW_TITLE: &str = "Mapshell";

// How long the injected failure notice stays up.
const NOTICE_DISMISS_MS: u32 = 6000;

enum ShellUserEvent {
    Guard(Vec<GuardEffect>),
}

pub fn run(session: ShellSession, start: StartUrl) -> Result<(), ShellError> {
    let event_loop = EventLoopBuilder::<ShellUserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();
    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .build(&event_loop)
        .map_err(|err| ShellError::Windowing(err.to_string()))?;

    let session = Arc::new(Mutex::new(session));

    let builder = WebViewBuilder::new()
        .with_url(start.as_str())
        .with_navigation_handler({
            let session = Arc::clone(&session);
            move |candidate: String| {
                match lock_session(&session).guard_mut().decide_navigation(&candidate) {
                    NavigationDisposition::Proceed => true,
                    NavigationDisposition::Intercepted => false,
                }
            }
        })
        .with_on_page_load_handler({
            let session = Arc::clone(&session);
            let proxy = proxy.clone();
            move |event, url| {
                let renderer_event = match event {
                    PageLoadEvent::Started => RendererEvent::LoadStarted { url },
                    PageLoadEvent::Finished => RendererEvent::Finished { url },
                };
                let effects = lock_session(&session).guard_mut().handle_event(renderer_event);
                if !effects.is_empty() {
                    let _ = proxy.send_event(ShellUserEvent::Guard(effects));
                }
            }
        });
    let webview = build_webview(builder, &window)?;

    event_loop.run(move |event, _target, control_flow| {
        *control_flow = ControlFlow::Wait;
        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                *control_flow = ControlFlow::Exit;
            }
            Event::UserEvent(ShellUserEvent::Guard(effects)) => {
                for effect in effects {
                    apply_effect(&webview, &window, effect);
                }
            }
            _ => {}
        }
    });
}

fn lock_session(session: &Arc<Mutex<ShellSession>>) -> MutexGuard<'_, ShellSession> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn apply_effect(webview: &WebView, window: &Window, effect: GuardEffect) {
    match effect {
        GuardEffect::CancelSecureConnection => {
            // wry exposes no handshake handle; the platform webviews
            // already abandon the load on a certificate failure.
            debug!("secure connection attempt dropped");
        }
        GuardEffect::LoadFallback { url } => {
            if let Err(err) = webview.load_url(&url) {
                error!("fallback redirect failed: {err}");
            }
        }
        GuardEffect::PostNotice { message } => {
            if let Err(err) = webview.evaluate_script(&notice_script(&message)) {
                warn!("failure notice not shown: {err}");
            }
        }
        GuardEffect::FallbackLoaded { .. } => {
            window.set_title(&format!("{WINDOW_TITLE} (offline)"));
        }
        GuardEffect::RemoteLoaded { .. } => {
            window.set_title(WINDOW_TITLE);
        }
    }
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn build_webview(builder: WebViewBuilder<'_>, window: &Window) -> Result<WebView, ShellError> {
    use tao::platform::unix::WindowExtUnix;
    use wry::WebViewBuilderExtUnix;

    let vbox = window
        .default_vbox()
        .ok_or_else(|| ShellError::Windowing("window has no gtk vbox".to_string()))?;
    builder
        .build_gtk(vbox)
        .map_err(|err| ShellError::Windowing(err.to_string()))
}

#[cfg(any(target_os = "windows", target_os = "macos"))]
fn build_webview(builder: WebViewBuilder<'_>, window: &Window) -> Result<WebView, ShellError> {
    builder
        .build(window)
        .map_err(|err| ShellError::Windowing(err.to_string()))
}

/// Injected toast for the notice recovery policy; removes itself after
/// [`NOTICE_DISMISS_MS`].
fn notice_script(message: &str) -> String {
    format!(
        r#"(function() {{
  var notice = document.createElement('div');
  notice.textContent = {text};
  notice.style.cssText = 'position:fixed;left:50%;bottom:24px;transform:translateX(-50%);' +
    'background:#1f2430;color:#f4f6fa;padding:10px 18px;border-radius:6px;' +
    'font:14px system-ui,sans-serif;z-index:2147483647;opacity:0.95;';
  document.body.appendChild(notice);
  setTimeout(function() {{ notice.remove(); }}, {dismiss_ms});
}})();"#,
        text = js_string_literal(message),
        dismiss_ms = NOTICE_DISMISS_MS,
    )
}

fn js_string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for ch in value.chars() {
        match ch {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '<' => literal.push_str("\\u003c"),
            ch if (ch as u32) < 0x20 => {
                literal.push_str(&format!("\\u{:04x}", ch as u32));
            }
            ch => literal.push(ch),
        }
    }
    literal.push('"');
    literal
}
