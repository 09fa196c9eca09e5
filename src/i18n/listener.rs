// SPDX-License-Identifier: MPL-2.0
//! Bridge from a locale source's change notification to a [`LocaleContext`].
//!
//! [`LocaleChangeListener::attach`] subscribes; dropping the listener
//! unsubscribes. The callback only holds weak references, so a notification
//! that arrives after the context or the screen is gone does nothing.
//! A notification that finds the context borrowed is parked in a
//! [`PendingResolve`] until the owner applies it.

use super::context::LocaleContext;
use super::locale::{ActiveLocale, LocaleDescriptor};
use super::source::{ListenerId, LocaleSource};
use crate::error::Result;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Signal sent to the presentation layer after a re-resolution.
pub type ChangeSignal = Rc<RefCell<dyn FnMut(&ActiveLocale)>>;

/// Preferred locales whose resolution was deferred. Only the latest list is kept.
#[derive(Debug, Clone, Default)]
pub struct PendingResolve(Rc<RefCell<Option<Vec<LocaleDescriptor>>>>);

impl PendingResolve {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn defer(&self, preferred: Vec<LocaleDescriptor>) {
        self.0.replace(Some(preferred));
    }

    fn discard(&self) {
        self.0.replace(None);
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.0.borrow().is_some()
    }

    /// Resolves the deferred list against `context`, if there is one.
    ///
    /// Returns the new active locale when a resolution ran.
    pub fn apply(&self, context: &mut LocaleContext) -> Result<Option<ActiveLocale>> {
        let Some(preferred) = self.0.take() else {
            return Ok(None);
        };
        context.resolve(&preferred)?;
        Ok(Some(context.active().clone()))
    }
}

/// Scoped subscription to locale-change notifications.
#[must_use = "dropping the listener unsubscribes immediately"]
pub struct LocaleChangeListener<'s, S: LocaleSource + ?Sized> {
    source: &'s S,
    id: ListenerId,
}

impl<'s, S: LocaleSource + ?Sized> LocaleChangeListener<'s, S> {
    /// Subscribes to `source`.
    ///
    /// On each notification the context re-resolves against the refreshed
    /// preferences (with `language_override` tried first), then `on_change`
    /// is signalled. If the context is borrowed at that moment, the
    /// preferences go to `pending` instead.
    pub fn attach(
        source: &'s S,
        context: &Rc<RefCell<LocaleContext>>,
        language_override: Option<LocaleDescriptor>,
        on_change: &ChangeSignal,
        pending: &PendingResolve,
    ) -> Self {
        let context: Weak<RefCell<LocaleContext>> = Rc::downgrade(context);
        let signal: Weak<RefCell<dyn FnMut(&ActiveLocale)>> = Rc::downgrade(on_change);
        let pending = pending.clone();

        let id = source.subscribe(Box::new(move |locales: &[LocaleDescriptor]| {
            let (Some(context), Some(signal)) = (context.upgrade(), signal.upgrade()) else {
                tracing::debug!("locale change after teardown ignored");
                return;
            };
            let preferred =
                super::resolver::with_override(language_override.as_ref(), locales.to_vec());
            let active = {
                let Ok(mut context) = context.try_borrow_mut() else {
                    tracing::debug!("locale context busy, resolution deferred");
                    pending.defer(preferred);
                    return;
                };
                if let Err(err) = context.resolve(&preferred) {
                    tracing::warn!(error = %err, "locale re-resolution failed");
                    return;
                }
                pending.discard();
                context.active().clone()
            };
            match signal.try_borrow_mut() {
                Ok(mut signal) => (&mut *signal)(&active),
                Err(_) => tracing::warn!("change signal busy, re-render skipped"),
            };
        }));
        tracing::debug!(?id, "locale change listener attached");

        Self { source, id }
    }

    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl<S: LocaleSource + ?Sized> Drop for LocaleChangeListener<'_, S> {
    fn drop(&mut self) {
        self.source.unsubscribe(self.id);
        tracing::debug!(id = ?self.id, "locale change listener detached");
    }
}
