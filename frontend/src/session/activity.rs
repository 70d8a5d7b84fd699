use std::rc::Rc;

use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    PointerMove,
    KeyPress,
    Click,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 3] = [
        ActivityKind::PointerMove,
        ActivityKind::KeyPress,
        ActivityKind::Click,
    ];

    pub fn event_name(self) -> &'static str {
        match self {
            ActivityKind::PointerMove => "mousemove",
            ActivityKind::KeyPress => "keypress",
            ActivityKind::Click => "click",
        }
    }
}

pub type ActivityHandler = Rc<dyn Fn(ActivityKind)>;

/// Emits user-interaction signals to subscribed handlers.
pub trait ActivitySource {
    fn subscribe(&self, handler: ActivityHandler) -> ActivitySubscription;
}

/// Live subscription to an [`ActivitySource`]. Listeners are removed when
/// this value is dropped.
#[must_use = "dropping the subscription removes its listeners"]
pub struct ActivitySubscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl ActivitySubscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn noop() -> Self {
        Self { release: None }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for ActivitySubscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for ActivitySubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivitySubscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Window-level `mousemove`, `keypress` and `click` listeners.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserActivitySource;

impl ActivitySource for BrowserActivitySource {
    fn subscribe(&self, handler: ActivityHandler) -> ActivitySubscription {
        use wasm_bindgen::{closure::Closure, JsCast};

        let window = match crate::utils::storage::window() {
            Ok(win) => win,
            Err(err) => {
                warn!("Activity tracking disabled: {}", err);
                return ActivitySubscription::noop();
            }
        };

        let mut registered = Vec::with_capacity(ActivityKind::ALL.len());
        for kind in ActivityKind::ALL {
            let handler = handler.clone();
            let closure = Closure::wrap(Box::new(move |_: web_sys::Event| handler(kind))
                as Box<dyn FnMut(web_sys::Event)>);
            if window
                .add_event_listener_with_callback(kind.event_name(), closure.as_ref().unchecked_ref())
                .is_err()
            {
                warn!("Failed to listen for {} events", kind.event_name());
                continue;
            }
            registered.push((kind.event_name(), closure));
        }

        ActivitySubscription::new(move || {
            for (name, closure) in registered {
                let _ = window
                    .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            }
        })
    }
}
