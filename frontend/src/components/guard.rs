use std::rc::Rc;

use leptos::*;

use crate::{
    config::{self, AccessConfig},
    session::{
        AccessGuard, ActivitySource, BrowserActivitySource, BrowserNavigator, BrowserSessionStore,
        Clock, Decision, Navigator, SessionStore, SystemClock,
    },
    state::session::SessionContext,
};

/// Collaborators the guard runs against. Provide one through context to
/// replace the browser defaults.
#[derive(Clone)]
pub struct GuardServices {
    pub config: Rc<AccessConfig>,
    pub store: Rc<dyn SessionStore>,
    pub navigator: Rc<dyn Navigator>,
    pub clock: Rc<dyn Clock>,
    pub activity: Rc<dyn ActivitySource>,
}

impl GuardServices {
    pub fn browser() -> Self {
        Self {
            config: Rc::new(config::access_config()),
            store: Rc::new(BrowserSessionStore),
            navigator: Rc::new(BrowserNavigator),
            clock: Rc::new(SystemClock),
            activity: Rc::new(BrowserActivitySource),
        }
    }

    pub fn build_guard(&self) -> AccessGuard {
        AccessGuard::new(
            self.config.clone(),
            self.store.clone(),
            self.navigator.clone(),
            self.clock.clone(),
        )
    }
}

#[cfg(target_arch = "wasm32")]
fn start_ticker(
    guard: &Rc<AccessGuard>,
    decision: RwSignal<Decision>,
    period_ms: u32,
) -> gloo_timers::callback::Interval {
    let guard = Rc::downgrade(guard);
    gloo_timers::callback::Interval::new(period_ms, move || {
        if let Some(guard) = guard.upgrade() {
            let path = guard.current_path();
            reevaluate(&guard, decision, &path);
        }
    })
}

/// Runs the access guard for `path` and renders `children` only while the
/// latest decision keeps the user on the page.
#[component]
pub fn SessionGuard(#[prop(into)] path: Signal<String>, children: ChildrenFn) -> impl IntoView {
    let services = use_context::<GuardServices>().unwrap_or_else(GuardServices::browser);
    let guard = Rc::new(services.build_guard());

    let initial = guard.evaluate_path(&path.get_untracked());
    let decision = create_rw_signal(initial.decision);

    let handle = guard.activate(services.activity.as_ref());
    #[cfg(target_arch = "wasm32")]
    let handle = handle.with_ticker(start_ticker(
        &guard,
        decision,
        services.config.check_interval_ms,
    ));
    // Dropped with the owning scope, which removes the listeners.
    let _handle = store_value(handle);

    provide_context(SessionContext::new(guard.clone(), decision.read_only()));

    let on_navigate = guard.clone();
    create_effect(move |prev: Option<()>| {
        let current = path.get();
        if prev.is_some() {
            reevaluate(&on_navigate, decision, &current);
        }
    });

    view! {
        <Show when=move || should_render_children(decision.get())>
            {children()}
        </Show>
    }
}

/// Runs the guard for `path` and publishes the outcome to `decision`.
pub fn reevaluate(guard: &AccessGuard, decision: RwSignal<Decision>, path: &str) -> Decision {
    let next = guard.evaluate_path(path).decision;
    decision.set(next);
    next
}

/// `true` when a decision keeps the guarded page rendered.
pub fn should_render_children(decision: Decision) -> bool {
    decision.permits_view()
}

#[cfg(test)]
mod tests {
    use super::should_render_children;
    use crate::session::Decision;

    #[test]
    fn guard_renders_only_for_non_redirecting_decisions() {
        assert!(should_render_children(Decision::Proceed));
        assert!(should_render_children(Decision::PublicAccess));
        assert!(!should_render_children(Decision::RequireLogin));
        assert!(!should_render_children(Decision::Expired));
        assert!(!should_render_children(Decision::Forbidden));
    }
}
