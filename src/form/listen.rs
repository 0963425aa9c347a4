//! Combined change notifications with optional debounce

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::error_map::ErrorMap;
use super::field_set::FieldSet;
use super::form_state::{Form, WeakForm};
use super::value_store::ValueStore;
use crate::observable::ObservableValue;
use crate::traits::SubmitResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenOptions {
    /// Fire once per source right away
    pub immediate: bool,
    /// Overrides the configured debounce; `Some(0)` disables it
    pub debounce_ms: Option<u64>,
}

type Notify = Arc<dyn Fn() + Send + Sync>;
type Detach = Box<dyn FnOnce() + Send + Sync>;

/// Handle for a [`Form::listen`] registration
pub struct Subscription {
    active: Arc<AtomicBool>,
    detach: Vec<Detach>,
}

impl Subscription {
    /// Detach from every source; pending debounced calls are dropped
    pub fn unsubscribe(self) {
        self.active.store(false, Ordering::SeqCst);
        for detach in self.detach {
            detach();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .field("sources", &self.detach.len())
            .finish()
    }
}

/// Something `listen` can subscribe to
trait Source {
    fn attach(&self, notify: Notify, immediate: bool) -> Detach;
}

impl<T> Source for ObservableValue<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn attach(&self, notify: Notify, immediate: bool) -> Detach {
        let id = self.listen(move |_| notify(), immediate);
        let source = self.clone();
        Box::new(move || source.unlisten(id))
    }
}

impl Source for FieldSet {
    fn attach(&self, notify: Notify, immediate: bool) -> Detach {
        let id = self.listen(move |_| notify(), immediate);
        let source = self.clone();
        Box::new(move || source.unlisten(id))
    }
}

impl Source for ErrorMap {
    fn attach(&self, notify: Notify, immediate: bool) -> Detach {
        let id = self.listen(move |_| notify(), immediate);
        let source = self.clone();
        Box::new(move || source.unlisten(id))
    }
}

impl Source for ValueStore {
    fn attach(&self, notify: Notify, immediate: bool) -> Detach {
        let id = self.listen(move |_| notify(), immediate);
        let source = self.clone();
        Box::new(move || source.unlisten(id))
    }
}

/// Routes every source notification to one callback, debounced per listener
struct Delivery<R: SubmitResult> {
    form: WeakForm<R>,
    callback: Arc<dyn Fn(&Form<R>) + Send + Sync>,
    debounce_ms: Option<u64>,
    active: Arc<AtomicBool>,
    generation: AtomicU64,
}

impl<R: SubmitResult> Delivery<R> {
    fn notify(self: &Arc<Self>) {
        if !self.active.load(Ordering::SeqCst) {
            return;
        }
        let Some(form) = self.form.upgrade() else {
            return;
        };

        let debounce_ms = self
            .debounce_ms
            .unwrap_or_else(|| form.settings().debounce_ms);
        if debounce_ms == 0 {
            (self.callback)(&form);
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No async runtime available, delivering form change without debounce");
            (self.callback)(&form);
            return;
        };
        drop(form);

        // Only the most recent scheduled call survives its sleep
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let delivery = Arc::clone(self);
        runtime.spawn(async move {
            tokio::time::sleep(Duration::from_millis(debounce_ms)).await;
            if delivery.generation.load(Ordering::SeqCst) != generation
                || !delivery.active.load(Ordering::SeqCst)
            {
                return;
            }
            if let Some(form) = delivery.form.upgrade() {
                (delivery.callback)(&form);
            }
        });
    }
}

impl<R: SubmitResult> Form<R> {
    /// Call `callback` with the form whenever any part of its state changes.
    ///
    /// With `immediate` the callback fires once per underlying source (eight
    /// times) unless a debounce folds those into a single call.
    pub fn listen(
        &self,
        callback: impl Fn(&Form<R>) + Send + Sync + 'static,
        options: ListenOptions,
    ) -> Subscription {
        let active = Arc::new(AtomicBool::new(true));
        let delivery = Arc::new(Delivery {
            form: self.downgrade(),
            callback: Arc::new(callback),
            debounce_ms: options.debounce_ms,
            active: Arc::clone(&active),
            generation: AtomicU64::new(0),
        });
        let notify: Notify = Arc::new(move || delivery.notify());

        let inner = &self.inner;
        let sources: [&dyn Source; 8] = [
            &inner.values,
            &inner.errors,
            &inner.dirty_fields,
            &inner.changed_fields,
            &inner.submitting,
            &inner.submitted,
            &inner.result,
            &inner.configuration,
        ];
        let detach = sources
            .iter()
            .map(|source| source.attach(Arc::clone(&notify), options.immediate))
            .collect();

        Subscription { active, detach }
    }
}
