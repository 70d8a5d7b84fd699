use std::rc::Rc;

use leptos::*;

use crate::{
    components::guard::GuardServices,
    session::{AccessGuard, Decision, Session, SessionState},
};

/// Guard shared with everything rendered beneath a `SessionGuard`.
#[derive(Clone)]
pub struct SessionContext {
    guard: Rc<AccessGuard>,
    decision: ReadSignal<Decision>,
}

impl SessionContext {
    pub fn new(guard: Rc<AccessGuard>, decision: ReadSignal<Decision>) -> Self {
        Self { guard, decision }
    }

    pub fn guard(&self) -> &Rc<AccessGuard> {
        &self.guard
    }

    pub fn state(&self) -> Signal<SessionState> {
        let decision = self.decision;
        Signal::derive(move || decision.get().state())
    }

    pub fn is_signed_in(&self) -> bool {
        Session::load(self.guard.store().as_ref())
            .map(|session| session.is_authenticated())
            .unwrap_or(false)
    }

    /// Path prefixes the signed-in role may open, for navigation menus.
    /// Empty when signed out or when the role has no table entry.
    pub fn allowed_sections(&self) -> Vec<String> {
        let role = Session::load(self.guard.store().as_ref())
            .ok()
            .filter(Session::is_authenticated)
            .and_then(|session| session.role_id);
        role.and_then(|role| self.guard.config().allowed_prefixes(&role).map(<[String]>::to_vec))
            .unwrap_or_default()
    }

    pub fn logout(&self) {
        // Failures are logged by the guard; the redirect happens regardless.
        let _ = self.guard.logout();
    }
}

pub fn use_session() -> Option<SessionContext> {
    use_context::<SessionContext>()
}

/// Logout callback for buttons and menus. Outside a guarded tree it
/// falls back to the provided or browser services.
pub fn use_logout() -> impl Fn() + Clone + 'static {
    let session = use_session();
    let services = use_context::<GuardServices>();
    move || match (&session, &services) {
        (Some(ctx), _) => ctx.logout(),
        (None, Some(services)) => {
            let _ = services.build_guard().logout();
        }
        (None, None) => {
            let _ = GuardServices::browser().build_guard().logout();
        }
    }
}
