//! Single observable value with change notifications

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle returned by `listen`, used to detach the callback again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listeners<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(ListenerId, Callback<T>)>>,
}

struct Shared<T> {
    initial: T,
    current: Mutex<T>,
    listeners: Listeners<T>,
}

/// A mutable value that notifies subscribers whenever it changes.
///
/// Cloning yields another handle to the same value. Callbacks run
/// synchronously in registration order, after the internal lock has been
/// released, so a callback may read or even write the value it observes.
pub struct ObservableValue<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for ObservableValue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for ObservableValue<T>
where
    T: Clone + PartialEq + Send + std::fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableValue")
            .field("current", &self.get())
            .finish()
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T> ObservableValue<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    pub fn new(initial: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                current: Mutex::new(initial.clone()),
                initial,
                listeners: Listeners {
                    next_id: AtomicU64::new(1),
                    entries: Mutex::new(Vec::new()),
                },
            }),
        }
    }

    pub fn get(&self) -> T {
        lock(&self.shared.current).clone()
    }

    /// Replace the value, notifying listeners if it differs from the old one
    pub fn set(&self, value: T) {
        let changed = {
            let mut current = lock(&self.shared.current);
            if *current == value {
                false
            } else {
                *current = value.clone();
                true
            }
        };

        if changed {
            self.notify(&value);
        }
    }

    /// Mutate a copy of the value and store it; listeners fire only on an
    /// actual change.
    ///
    /// `mutate` runs without the lock held, so it may read this value. A
    /// write from another thread in between is overwritten.
    pub fn update(&self, mutate: impl FnOnce(&mut T)) {
        let mut next = self.get();
        mutate(&mut next);
        self.set(next);
    }

    /// Restore the value given at construction
    pub fn reset(&self) {
        self.set(self.shared.initial.clone());
    }

    pub fn listen(
        &self,
        callback: impl Fn(&T) + Send + Sync + 'static,
        notify_immediately: bool,
    ) -> ListenerId {
        let id = ListenerId(self.shared.listeners.next_id.fetch_add(1, Ordering::SeqCst));
        let callback: Callback<T> = Arc::new(callback);
        lock(&self.shared.listeners.entries).push((id, Arc::clone(&callback)));

        if notify_immediately {
            callback(&self.get());
        }
        id
    }

    pub fn unlisten(&self, id: ListenerId) {
        lock(&self.shared.listeners.entries).retain(|(entry, _)| *entry != id);
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.shared.listeners.entries).len()
    }

    fn notify(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = lock(&self.shared.listeners.entries)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(value);
        }
    }
}
