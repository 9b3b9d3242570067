//! Theme context manager: the active theme of one scope and its subscribers
//!
//! All operations run synchronously on the caller's thread. The state lock is
//! never held while a subscriber runs, so subscribers may call back into the
//! manager. A `set_theme` issued from inside a notification is queued and
//! applied once the running pass finishes, in the order issued.

use std::{
    collections::VecDeque,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Weak},
};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{Result, SubscriberFailure, ThemeError},
    registry::ThemeRegistry,
    types::{ThemePayload, ThemeSnapshot},
};

/// Subscriber callback. Errors are collected and reported after the pass.
type Callback = Arc<dyn Fn(&ThemeSnapshot) -> anyhow::Result<()> + Send + Sync>;

struct Subscriber {
    id: u64,
    callback: Callback,
}

struct ManagerState {
    registry: ThemeRegistry,
    current: ThemeSnapshot,
    subscribers: Vec<Subscriber>,
    next_id: u64,
    /// Theme names waiting to be applied, oldest first
    pending: VecDeque<String>,
    /// A notification pass is running
    notifying: bool,
    disposed: bool,
}

impl ManagerState {
    fn is_live(&self, id: u64) -> bool {
        self.subscribers.iter().any(|s| s.id == id)
    }
}

/// Handle returned by [`ThemeContextManager::subscribe`]
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    manager: Weak<Mutex<ManagerState>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove this subscription from its manager. Calling it again is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(state) = self.manager.upgrade() {
            remove_subscriber(&state, self.id);
        }
    }
}

fn remove_subscriber(state: &Mutex<ManagerState>, id: u64) {
    let mut state = state.lock();
    let before = state.subscribers.len();
    state.subscribers.retain(|s| s.id != id);
    if state.subscribers.len() < before {
        debug!(subscription = id, "Unsubscribed from theme changes");
    }
}

/// Single source of truth for the active theme within a scope
///
/// Cloning yields another handle to the same manager.
#[derive(Clone)]
pub struct ThemeContextManager {
    state: Arc<Mutex<ManagerState>>,
}

impl std::fmt::Debug for ThemeContextManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ThemeContextManager")
            .field("current_theme", &state.current.name)
            .field("themes", &state.registry.len())
            .field("subscribers", &state.subscribers.len())
            .field("disposed", &state.disposed)
            .finish()
    }
}

impl ThemeContextManager {
    /// Create a manager over `registry` with `initial_theme` active.
    ///
    /// Fails with [`ThemeError::InvalidTheme`] if `initial_theme` is not registered.
    pub fn new(registry: ThemeRegistry, initial_theme: &str) -> Result<Self> {
        let current = registry
            .snapshot(initial_theme)
            .ok_or_else(|| ThemeError::InvalidTheme(initial_theme.to_string()))?;

        debug!(
            theme = initial_theme,
            themes = registry.len(),
            "Created theme context manager"
        );

        Ok(Self {
            state: Arc::new(Mutex::new(ManagerState {
                registry,
                current,
                subscribers: Vec::new(),
                next_id: 1,
                pending: VecDeque::new(),
                notifying: false,
                disposed: false,
            })),
        })
    }

    /// Get the active theme. Still answers after disposal.
    pub fn get_theme(&self) -> ThemeSnapshot {
        self.state.lock().current.clone()
    }

    /// Name of the active theme
    pub fn current_name(&self) -> String {
        self.state.lock().current.name.clone()
    }

    /// Switch the active theme and notify subscribers.
    ///
    /// Switching to the theme that is already active does nothing. When
    /// called from inside a subscriber the switch is queued and `Ok(())` is
    /// returned immediately; the outermost call applies it after the current
    /// pass and reports any subscriber failures of the queued passes too.
    pub fn set_theme(&self, name: &str) -> Result<()> {
        {
            let mut state = self.state.lock();
            if state.disposed {
                return Err(ThemeError::Disposed);
            }
            if !state.registry.contains(name) {
                return Err(ThemeError::UnknownTheme(name.to_string()));
            }
            state.pending.push_back(name.to_string());
            if state.notifying {
                debug!(theme = name, "Deferring theme switch until notification completes");
                return Ok(());
            }
            state.notifying = true;
        }

        let failures = self.drain_pending();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ThemeError::AggregateSubscriber(failures))
        }
    }

    /// Apply queued switches one pass at a time until the queue is empty
    fn drain_pending(&self) -> Vec<SubscriberFailure> {
        let mut failures = Vec::new();

        loop {
            let (snapshot, subscribers) = {
                let mut state = self.state.lock();
                if state.disposed {
                    state.pending.clear();
                }
                let Some(name) = state.pending.pop_front() else {
                    state.notifying = false;
                    break;
                };
                let Some(snapshot) = state.registry.snapshot(&name) else {
                    warn!(theme = %name, "Queued theme was unregistered before it could be applied");
                    continue;
                };
                if snapshot.same_as(&state.current) {
                    debug!(theme = %name, "Theme already active");
                    continue;
                }

                info!(from = %state.current.name, to = %name, "Theme changed");
                state.current = snapshot.clone();

                let subscribers: Vec<(u64, Callback)> = state
                    .subscribers
                    .iter()
                    .map(|s| (s.id, Arc::clone(&s.callback)))
                    .collect();
                (snapshot, subscribers)
            };

            for (id, callback) in subscribers {
                // Skip subscribers removed earlier in this pass
                if !self.state.lock().is_live(id) {
                    continue;
                }

                let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(&snapshot)));
                let message = match outcome {
                    Ok(Ok(())) => continue,
                    Ok(Err(e)) => format!("{:#}", e),
                    Err(payload) => panic_message(payload.as_ref()),
                };

                warn!(
                    subscription = id,
                    theme = %snapshot.name,
                    error = %message,
                    "Theme subscriber failed"
                );
                failures.push(SubscriberFailure {
                    subscription_id: id,
                    theme: snapshot.name.clone(),
                    message,
                });
            }
        }

        failures
    }

    /// Register or replace a theme.
    ///
    /// Never changes the active theme and never notifies, even when `name`
    /// is active. Call [`set_theme`](Self::set_theme) with the same name to
    /// adopt a replaced payload.
    pub fn register_theme(&self, name: impl Into<String>, payload: ThemePayload) -> Result<()> {
        let name = name.into();
        let mut state = self.state.lock();
        if state.disposed {
            return Err(ThemeError::Disposed);
        }
        let replaced = state.registry.register(name.clone(), payload).is_some();
        debug!(theme = %name, replaced, "Registered theme");
        Ok(())
    }

    /// Remove a theme. The active theme cannot be removed.
    ///
    /// Returns whether the theme was registered.
    pub fn unregister_theme(&self, name: &str) -> Result<bool> {
        let mut state = self.state.lock();
        if state.disposed {
            return Err(ThemeError::Disposed);
        }
        if state.current.name == name {
            return Err(ThemeError::ThemeInUse(name.to_string()));
        }
        let removed = state.registry.unregister(name).is_some();
        if removed {
            debug!(theme = name, "Unregistered theme");
        }
        Ok(removed)
    }

    /// Look up a registered theme without switching to it
    pub fn preview_theme(&self, name: &str) -> Result<ThemeSnapshot> {
        self.state
            .lock()
            .registry
            .snapshot(name)
            .ok_or_else(|| ThemeError::UnknownTheme(name.to_string()))
    }

    pub fn has_theme(&self, name: &str) -> bool {
        self.state.lock().registry.contains(name)
    }

    /// All registered theme names, sorted
    pub fn theme_names(&self) -> Vec<String> {
        self.state.lock().registry.names()
    }

    /// Subscribe to effective theme changes.
    ///
    /// The callback is not invoked for the theme active at subscription time.
    pub fn subscribe<F>(&self, callback: F) -> Result<Subscription>
    where
        F: Fn(&ThemeSnapshot) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let mut state = self.state.lock();
        if state.disposed {
            return Err(ThemeError::Disposed);
        }
        let id = state.next_id;
        state.next_id += 1;
        state.subscribers.push(Subscriber {
            id,
            callback: Arc::new(callback),
        });
        debug!(subscription = id, "Subscribed to theme changes");

        Ok(Subscription {
            id,
            manager: Arc::downgrade(&self.state),
        })
    }

    /// Subscribe with a listener that cannot fail
    pub fn on_theme_changed<F>(&self, listener: F) -> Result<Subscription>
    where
        F: Fn(&ThemeSnapshot) + Send + Sync + 'static,
    {
        self.subscribe(move |theme| {
            listener(theme);
            Ok(())
        })
    }

    /// Remove a subscription. Unknown, foreign or already removed handles are ignored.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        if !Weak::ptr_eq(&subscription.manager, &Arc::downgrade(&self.state)) {
            debug!(
                subscription = subscription.id,
                "Ignoring subscription owned by another theme context"
            );
            return;
        }
        remove_subscriber(&self.state, subscription.id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    /// Tear down the manager. Subscribers are released and no further
    /// notifications fire, including the rest of a pass in progress.
    pub fn dispose(&self) {
        let mut state = self.state.lock();
        if state.disposed {
            return;
        }
        state.disposed = true;
        state.pending.clear();
        let released = std::mem::take(&mut state.subscribers);
        info!(
            theme = %state.current.name,
            subscribers = released.len(),
            "Theme context disposed"
        );
        drop(state);
        // Callbacks may own manager handles; drop them outside the lock
        drop(released);
    }

    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}
