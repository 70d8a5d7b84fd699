//! Session validity and role-based route authorization.
//!
//! [`AccessGuard`] reads the session keys from an injected [`SessionStore`],
//! decides whether the current path may be shown, and redirects through a
//! [`Navigator`] when it may not. Activity tracking is tied to the lifetime
//! of the [`GuardHandle`] returned by [`AccessGuard::activate`].

pub mod activity;
pub mod clock;
pub mod error;
pub mod guard;
pub mod navigator;
pub mod store;

pub use activity::{ActivityKind, ActivitySource, ActivitySubscription, BrowserActivitySource};
pub use clock::{Clock, SystemClock};
pub use error::StoreError;
pub use guard::{decide, AccessGuard, Decision, Evaluation, GuardHandle, SessionState};
pub use navigator::{BrowserNavigator, Navigator};
pub use store::{BrowserSessionStore, MemoryStore, Session, SessionStore};
