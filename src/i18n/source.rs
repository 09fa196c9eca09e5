// SPDX-License-Identifier: MPL-2.0
//! Device locale sources and their change notifications.
//!
//! A source reports the ranked list of preferred locales and lets callers
//! subscribe to a "locale changed" notification. Everything runs on the
//! caller's thread: notifications are delivered synchronously from
//! [`SystemLocaleSource::poll`] or [`StaticLocaleSource::set_locales`].

use super::locale::LocaleDescriptor;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Identifies one subscription on a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Rc<RefCell<Box<dyn FnMut(&[LocaleDescriptor])>>>;

/// Callbacks registered for locale-change notifications.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Callback)>>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

impl ListenerRegistry {
    pub fn add(&self, callback: Box<dyn FnMut(&[LocaleDescriptor])>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let callback: Callback = Rc::new(RefCell::new(callback));
        self.listeners.borrow_mut().push((id, callback));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls every listener registered at the time of the call.
    ///
    /// The list is snapshotted first, so a callback may unsubscribe itself
    /// or others. A callback that is already running is skipped.
    pub fn notify(&self, locales: &[LocaleDescriptor]) {
        let snapshot: Vec<(ListenerId, Callback)> = self.listeners.borrow().clone();
        for (id, callback) in snapshot {
            if !self.listeners.borrow().iter().any(|(existing, _)| *existing == id) {
                continue;
            }
            match callback.try_borrow_mut() {
                Ok(mut callback) => (&mut *callback)(locales),
                Err(_) => tracing::warn!(?id, "skipping re-entrant locale listener"),
            }
        }
    }
}

// =============================================================================
// LocaleSource
// =============================================================================

/// Provider of device locale preferences.
pub trait LocaleSource {
    /// Preferred locales, most preferred first.
    fn preferred_locales(&self) -> Vec<LocaleDescriptor>;

    /// Registers `callback` for locale-change notifications.
    fn subscribe(&self, callback: Box<dyn FnMut(&[LocaleDescriptor])>) -> ListenerId;

    /// Removes a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: ListenerId);
}

/// Reads the operating system's preferred locales through `sys-locale`.
///
/// The OS offers no portable change event, so changes are detected by
/// comparing snapshots in [`SystemLocaleSource::poll`].
#[derive(Debug, Default)]
pub struct SystemLocaleSource {
    last_seen: RefCell<Vec<LocaleDescriptor>>,
    listeners: ListenerRegistry,
}

impl SystemLocaleSource {
    #[must_use]
    pub fn new() -> Self {
        let source = Self::default();
        source.last_seen.replace(Self::read());
        source
    }

    fn read() -> Vec<LocaleDescriptor> {
        LocaleDescriptor::parse_all(sys_locale::get_locales())
    }

    /// Re-reads the OS preferences and notifies listeners if they changed.
    ///
    /// Returns whether a change was seen.
    pub fn poll(&self) -> bool {
        let current = Self::read();
        if *self.last_seen.borrow() == current {
            return false;
        }
        tracing::info!(
            locales = ?current.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "device locales changed"
        );
        self.last_seen.replace(current.clone());
        self.listeners.notify(&current);
        true
    }
}

impl LocaleSource for SystemLocaleSource {
    fn preferred_locales(&self) -> Vec<LocaleDescriptor> {
        self.last_seen.borrow().clone()
    }

    fn subscribe(&self, callback: Box<dyn FnMut(&[LocaleDescriptor])>) -> ListenerId {
        self.listeners.add(callback)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

/// A source whose preferences are set by the caller.
#[derive(Debug, Default)]
pub struct StaticLocaleSource {
    locales: RefCell<Vec<LocaleDescriptor>>,
    listeners: ListenerRegistry,
}

impl StaticLocaleSource {
    #[must_use]
    pub fn new(locales: Vec<LocaleDescriptor>) -> Self {
        Self {
            locales: RefCell::new(locales),
            listeners: ListenerRegistry::default(),
        }
    }

    /// Parses `tags`, skipping invalid ones.
    #[must_use]
    pub fn from_tags(tags: &[&str]) -> Self {
        Self::new(LocaleDescriptor::parse_all(tags))
    }

    /// Replaces the preferences and notifies every listener.
    pub fn set_locales(&self, locales: Vec<LocaleDescriptor>) {
        self.locales.replace(locales.clone());
        self.listeners.notify(&locales);
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl LocaleSource for StaticLocaleSource {
    fn preferred_locales(&self) -> Vec<LocaleDescriptor> {
        self.locales.borrow().clone()
    }

    fn subscribe(&self, callback: Box<dyn FnMut(&[LocaleDescriptor])>) -> ListenerId {
        self.listeners.add(callback)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_reaches_every_listener() {
        let registry = ListenerRegistry::default();
        let seen = Rc::new(Cell::new(0));
        for _ in 0..2 {
            let seen = Rc::clone(&seen);
            registry.add(Box::new(move |_: &[LocaleDescriptor]| seen.set(seen.get() + 1)));
        }

        registry.notify(&[]);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let registry = ListenerRegistry::default();
        let seen = Rc::new(Cell::new(false));
        let flag = Rc::clone(&seen);
        let id = registry.add(Box::new(move |_: &[LocaleDescriptor]| flag.set(true)));

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        registry.notify(&[]);
        assert!(!seen.get());
    }

    #[test]
    fn listener_may_unsubscribe_another_during_notify() {
        let registry = Rc::new(ListenerRegistry::default());
        let second_called = Rc::new(Cell::new(false));
        let victim = Rc::new(Cell::new(None));

        let reg = Rc::clone(&registry);
        let target = Rc::clone(&victim);
        registry.add(Box::new(move |_: &[LocaleDescriptor]| {
            if let Some(id) = target.get() {
                reg.remove(id);
            }
        }));
        let flag = Rc::clone(&second_called);
        let second = registry.add(Box::new(move |_: &[LocaleDescriptor]| flag.set(true)));
        victim.set(Some(second));

        registry.notify(&[]);
        assert!(!second_called.get());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn static_source_delivers_new_locales() {
        let source = StaticLocaleSource::from_tags(&["en-GB"]);
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        source.subscribe(Box::new(move |locales: &[LocaleDescriptor]| {
            sink.borrow_mut()
                .extend(locales.iter().map(LocaleDescriptor::language_tag));
        }));

        source.set_locales(LocaleDescriptor::parse_all(["ar-SA"]));

        assert_eq!(*received.borrow(), vec!["ar-SA".to_string()]);
        assert_eq!(source.preferred_locales()[0].language_tag(), "ar-SA");
    }

    #[test]
    fn system_source_poll_is_quiet_without_change() {
        let source = SystemLocaleSource::new();
        let called = Rc::new(Cell::new(false));
        let flag = Rc::clone(&called);
        source.subscribe(Box::new(move |_: &[LocaleDescriptor]| flag.set(true)));

        // Preferences rarely change between two reads in a test run.
        if !source.poll() {
            assert!(!called.get());
        }
    }
}
