use std::rc::Rc;

use log::{debug, info, warn};

use super::{
    activity::{ActivityKind, ActivitySource, ActivitySubscription},
    clock::Clock,
    error::StoreError,
    navigator::Navigator,
    store::{stamp_activity, Session, SessionStore},
};
use crate::config::{AccessConfig, LOGIN_PATH, UNAUTHORIZED_PATH};

/// Session lifecycle states the guard moves between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Active,
    IdleTimeout,
    UnauthorizedAttempt,
}

/// Outcome of a single evaluation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Authenticated and permitted; `lastActivity` was refreshed.
    Proceed,
    /// No session, but the path is public.
    PublicAccess,
    /// No session on a protected path; sent to the login page.
    RequireLogin,
    /// Idle for longer than the timeout; store cleared and sent to login.
    Expired,
    /// Role does not cover the path; sent to the unauthorized page.
    Forbidden,
}

impl Decision {
    pub fn state(self) -> SessionState {
        match self {
            Decision::Proceed => SessionState::Active,
            Decision::PublicAccess | Decision::RequireLogin => SessionState::Unauthenticated,
            Decision::Expired => SessionState::IdleTimeout,
            Decision::Forbidden => SessionState::UnauthorizedAttempt,
        }
    }

    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            Decision::Proceed | Decision::PublicAccess => None,
            Decision::RequireLogin | Decision::Expired => Some(LOGIN_PATH),
            Decision::Forbidden => Some(UNAUTHORIZED_PATH),
        }
    }

    /// Whether the requested page may stay on screen.
    pub fn permits_view(self) -> bool {
        self.redirect_target().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub decision: Decision,
    /// Set when the store failed during this cycle. A failed read is
    /// evaluated as an unauthenticated session.
    pub store_error: Option<StoreError>,
}

impl Evaluation {
    pub fn state(&self) -> SessionState {
        self.decision.state()
    }
}

/// Pure access decision for one cycle, before any side effect is applied.
pub fn decide(config: &AccessConfig, session: &Session, path: &str, now_ms: i64) -> Decision {
    if session.token.is_none() {
        return if config.is_public(path) {
            Decision::PublicAccess
        } else {
            Decision::RequireLogin
        };
    }

    if let Some(last_activity) = session.last_activity_ms {
        if now_ms.saturating_sub(last_activity) > config.session_timeout_ms {
            return Decision::Expired;
        }
    }

    // The unauthorized page is where forbidden roles land, so only the
    // sign-in and timeout checks apply there.
    if path == UNAUTHORIZED_PATH {
        return Decision::Proceed;
    }

    if let Some(allowed) = session
        .role_id
        .as_deref()
        .and_then(|role| config.allowed_prefixes(role))
    {
        let is_allowed = allowed.iter().any(|prefix| path.starts_with(prefix.as_str()));
        if !is_allowed && !config.is_public(path) {
            return Decision::Forbidden;
        }
    }

    Decision::Proceed
}

/// Enforces session expiry and role-based route access over injected
/// collaborators.
pub struct AccessGuard {
    config: Rc<AccessConfig>,
    store: Rc<dyn SessionStore>,
    navigator: Rc<dyn Navigator>,
    clock: Rc<dyn Clock>,
}

impl AccessGuard {
    pub fn new(
        config: Rc<AccessConfig>,
        store: Rc<dyn SessionStore>,
        navigator: Rc<dyn Navigator>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            store,
            navigator,
            clock,
        }
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    pub fn store(&self) -> Rc<dyn SessionStore> {
        self.store.clone()
    }

    pub fn current_path(&self) -> String {
        self.navigator.current_path()
    }

    /// Evaluates the navigator's current path.
    pub fn evaluate(&self) -> Evaluation {
        self.evaluate_path(&self.current_path())
    }

    pub fn evaluate_path(&self, path: &str) -> Evaluation {
        let now = self.clock.now_ms();
        let (session, mut store_error) = match Session::load(self.store.as_ref()) {
            Ok(session) => (session, None),
            Err(err) => {
                warn!("Session store unavailable, treating as signed out: {}", err);
                (Session::default(), Some(err))
            }
        };

        let decision = decide(&self.config, &session, path, now);
        debug!("Access check for {}: {:?}", path, decision);

        match decision {
            Decision::Proceed => {
                if let Err(err) = stamp_activity(self.store.as_ref(), now) {
                    warn!("Failed to record activity: {}", err);
                    store_error.get_or_insert(err);
                }
            }
            Decision::Expired => {
                info!("Session idle for longer than {} ms, signing out", self.config.session_timeout_ms);
                if let Err(err) = self.store.clear() {
                    warn!("Failed to clear expired session: {}", err);
                    store_error.get_or_insert(err);
                }
            }
            Decision::Forbidden => {
                warn!("Role {:?} is not permitted to view {}", session.role_id, path);
            }
            Decision::PublicAccess | Decision::RequireLogin => {}
        }

        if let Some(target) = decision.redirect_target() {
            self.navigator.redirect(target);
        }

        Evaluation {
            decision,
            store_error,
        }
    }

    /// Refreshes `lastActivity`; called for every user-interaction signal.
    pub fn record_activity(&self) {
        if let Err(err) = stamp_activity(self.store.as_ref(), self.clock.now_ms()) {
            warn!("Failed to record activity: {}", err);
        }
    }

    /// Clears every session key and sends the user to the login page.
    /// The redirect is issued even when clearing fails.
    pub fn logout(&self) -> Result<(), StoreError> {
        info!("Signing out");
        let result = self.store.clear();
        if let Err(err) = &result {
            warn!("Failed to clear session on logout: {}", err);
        }
        self.navigator.redirect(LOGIN_PATH);
        result
    }

    /// Subscribes activity tracking for as long as the returned handle lives.
    pub fn activate(self: &Rc<Self>, source: &dyn ActivitySource) -> GuardHandle {
        let guard = Rc::downgrade(self);
        let subscription = source.subscribe(Rc::new(move |_kind: ActivityKind| {
            if let Some(guard) = guard.upgrade() {
                guard.record_activity();
            }
        }));
        GuardHandle {
            guard: self.clone(),
            _subscription: subscription,
            ticker: None,
        }
    }
}

/// Active guard. Dropping it removes activity listeners and stops the
/// periodic check.
pub struct GuardHandle {
    guard: Rc<AccessGuard>,
    _subscription: ActivitySubscription,
    // Held for its Drop, which cancels the timer.
    #[allow(dead_code)]
    ticker: Option<Box<dyn std::any::Any>>,
}

impl GuardHandle {
    pub fn guard(&self) -> &Rc<AccessGuard> {
        &self.guard
    }

    /// Keeps a periodic evaluation timer alive alongside the listeners.
    pub fn with_ticker(mut self, ticker: impl std::any::Any) -> Self {
        self.ticker = Some(Box::new(ticker));
        self
    }
}
