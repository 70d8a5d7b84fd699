#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod ssr;

#[cfg(test)]
pub mod helpers {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use crate::components::guard::GuardServices;
    use crate::config::AccessConfig;
    use crate::session::{
        activity::{ActivityHandler, ActivityKind, ActivitySource, ActivitySubscription},
        store::{MemoryStore, LAST_ACTIVITY_KEY, ROLE_KEY, TOKEN_KEY},
        Clock, Navigator, SessionStore, StoreError,
    };

    pub struct ManualClock {
        now: Cell<i64>,
    }

    impl ManualClock {
        pub fn new(now: i64) -> Self {
            Self {
                now: Cell::new(now),
            }
        }

        pub fn set(&self, now: i64) {
            self.now.set(now);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            self.now.get()
        }
    }

    #[derive(Default)]
    pub struct RecordingNavigator {
        path: RefCell<String>,
        redirects: RefCell<Vec<String>>,
    }

    impl RecordingNavigator {
        pub fn at(path: &str) -> Self {
            Self {
                path: RefCell::new(path.to_string()),
                redirects: RefCell::new(Vec::new()),
            }
        }

        pub fn redirects(&self) -> Vec<String> {
            self.redirects.borrow().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn current_path(&self) -> String {
            self.path.borrow().clone()
        }

        fn redirect(&self, path: &str) {
            self.redirects.borrow_mut().push(path.to_string());
        }
    }

    type Listeners = Rc<RefCell<Vec<(usize, ActivityHandler)>>>;

    #[derive(Default)]
    pub struct ManualActivitySource {
        listeners: Listeners,
        next_id: Cell<usize>,
    }

    impl ManualActivitySource {
        pub fn emit(&self, kind: ActivityKind) {
            let handlers: Vec<_> = self
                .listeners
                .borrow()
                .iter()
                .map(|(_, handler)| handler.clone())
                .collect();
            for handler in handlers {
                handler(kind);
            }
        }

        pub fn emit_click(&self) {
            self.emit(ActivityKind::Click);
        }

        pub fn emit_key_press(&self) {
            self.emit(ActivityKind::KeyPress);
        }

        pub fn listener_count(&self) -> usize {
            self.listeners.borrow().len()
        }
    }

    impl ActivitySource for ManualActivitySource {
        fn subscribe(&self, handler: ActivityHandler) -> ActivitySubscription {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            self.listeners.borrow_mut().push((id, handler));
            let listeners = self.listeners.clone();
            ActivitySubscription::new(move || {
                listeners.borrow_mut().retain(|(listener, _)| *listener != id);
            })
        }
    }

    pub struct FailingStore;

    impl SessionStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("storage disabled".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("storage disabled".into()))
        }

        fn clear(&self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("storage disabled".into()))
        }
    }

    pub fn signed_in_store(role: &str, last_activity: i64) -> MemoryStore {
        let stamp = last_activity.to_string();
        MemoryStore::with_entries([
            (TOKEN_KEY, "token-1"),
            (ROLE_KEY, role),
            (LAST_ACTIVITY_KEY, stamp.as_str()),
        ])
    }

    pub struct FakeServices {
        pub store: Rc<MemoryStore>,
        pub navigator: Rc<RecordingNavigator>,
        pub clock: Rc<ManualClock>,
        pub activity: Rc<ManualActivitySource>,
    }

    impl FakeServices {
        pub fn new(store: MemoryStore, path: &str, now: i64) -> Self {
            Self {
                store: Rc::new(store),
                navigator: Rc::new(RecordingNavigator::at(path)),
                clock: Rc::new(ManualClock::new(now)),
                activity: Rc::new(ManualActivitySource::default()),
            }
        }

        pub fn services(&self) -> GuardServices {
            GuardServices {
                config: Rc::new(AccessConfig::default()),
                store: self.store.clone(),
                navigator: self.navigator.clone(),
                clock: self.clock.clone(),
                activity: self.activity.clone(),
            }
        }
    }
}
