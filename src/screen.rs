// SPDX-License-Identifier: MPL-2.0
//! Locale inspection screen.
//!
//! Renders read-only lines describing the device preferences, the resolved
//! language and a few translation examples. While mounted, the screen listens
//! for locale changes and flags itself for re-render.

use crate::config::{BEST_MATCH_PROBE, DEFAULT_EXAMPLE_KEYS};
use crate::i18n::{
    find_best_available_language, ActiveLocale, ChangeSignal, LocaleChangeListener,
    LocaleContext, LocaleDescriptor, LocaleSource, PendingResolve, SupportedLanguages,
    TranslationArgs,
};
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::fmt::Write as _;
use std::rc::Rc;

/// A translation shown on the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub key: String,
    pub args: Option<TranslationArgs>,
}

impl Example {
    #[must_use]
    pub fn new(key: impl Into<String>, args: Option<TranslationArgs>) -> Self {
        Self {
            key: key.into(),
            args,
        }
    }

    /// The built-in examples.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        DEFAULT_EXAMPLE_KEYS
            .iter()
            .map(|key| Self::new(*key, None))
            .collect()
    }
}

/// One displayed row: a label and a JSON-rendered value.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub name: String,
    pub value: Value,
}

impl Line {
    fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Contextual data needed to render the screen.
pub struct ViewContext<'a> {
    pub context: &'a mut LocaleContext,
    pub source: &'a dyn LocaleSource,
    pub examples: &'a [Example],
}

/// Builds the screen's lines.
#[must_use]
pub fn view(ctx: ViewContext<'_>) -> Vec<Line> {
    let preferred = ctx.source.preferred_locales();
    let mut lines = vec![Line::new(
        "Preferred locales",
        json!(preferred.iter().map(LocaleDescriptor::language_tag).collect::<Vec<_>>()),
    )];

    let probe_label = format!("Best available language for {:?}", BEST_MATCH_PROBE);
    let best = SupportedLanguages::parse(BEST_MATCH_PROBE)
        .ok()
        .and_then(|probe| find_best_available_language(&preferred, &probe))
        .map_or(Value::Null, |found| {
            json!({ "languageTag": found.language.to_string(), "isRTL": found.is_rtl() })
        });
    lines.push(Line::new(probe_label, best));

    let active = ctx.context.active().clone();
    lines.push(Line::new("Active language", json!(active.language.to_string())));
    let direction_key = ctx.context.layout_direction().i18n_key();
    let direction = ctx.context.tr(direction_key);
    lines.push(Line::new("Layout direction", json!(direction)));

    for example in ctx.examples {
        let value = ctx.context.translate(&example.key, example.args.as_ref());
        lines.push(Line::new(format!("Translation of \"{}\"", example.key), json!(value)));
    }

    let stats = ctx.context.cache_stats();
    lines.push(Line::new(
        "Translation cache",
        json!({
            "entries": ctx.context.cache().len(),
            "hits": stats.hits,
            "misses": stats.misses,
            "clears": stats.clears,
        }),
    ));
    lines
}

/// Renders lines as text, one label followed by its indented value.
#[must_use]
pub fn render(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        let value = serde_json::to_string_pretty(&line.value).unwrap_or_default();
        let _ = writeln!(out, "{}", line.name);
        for value_line in value.lines() {
            let _ = writeln!(out, "    {}", value_line);
        }
    }
    out
}

/// The mounted screen: owns the render flag the change listener sets and the
/// resolution it defers while the context is borrowed.
pub struct LocaleScreen {
    context: Rc<RefCell<LocaleContext>>,
    examples: Vec<Example>,
    needs_render: Rc<Cell<bool>>,
    signal: ChangeSignal,
    pending: PendingResolve,
}

impl LocaleScreen {
    #[must_use]
    pub fn new(context: Rc<RefCell<LocaleContext>>, examples: Vec<Example>) -> Self {
        let needs_render = Rc::new(Cell::new(true));
        let flag = Rc::clone(&needs_render);
        let signal: ChangeSignal = Rc::new(RefCell::new(move |active: &ActiveLocale| {
            tracing::debug!(%active, "screen invalidated");
            flag.set(true);
        }));
        Self {
            context,
            examples,
            needs_render,
            signal,
            pending: PendingResolve::new(),
        }
    }

    /// Subscribes to `source` for as long as the returned guard lives.
    pub fn mount<'s, S: LocaleSource + ?Sized>(
        &self,
        source: &'s S,
        language_override: Option<LocaleDescriptor>,
    ) -> LocaleChangeListener<'s, S> {
        LocaleChangeListener::attach(
            source,
            &self.context,
            language_override,
            &self.signal,
            &self.pending,
        )
    }

    /// Returns whether a render is due and clears the flag.
    ///
    /// A deferred resolution always makes a render due.
    pub fn take_needs_render(&self) -> bool {
        self.needs_render.replace(false) || self.pending.is_pending()
    }

    /// Renders the screen against `source`, applying a deferred resolution first.
    pub fn render(&self, source: &dyn LocaleSource) -> String {
        let mut context = self.context.borrow_mut();
        match self.pending.apply(&mut context) {
            Ok(Some(active)) => tracing::debug!(%active, "deferred locale change applied"),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "deferred re-resolution failed"),
        }
        render(&view(ViewContext {
            context: &mut context,
            source,
            examples: &self.examples,
        }))
    }

    #[must_use]
    pub fn context(&self) -> &Rc<RefCell<LocaleContext>> {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::StaticLocaleSource;

    fn screen_for(source: &StaticLocaleSource) -> LocaleScreen {
        let context = LocaleContext::with_embedded(&source.preferred_locales()).unwrap();
        LocaleScreen::new(Rc::new(RefCell::new(context)), Example::defaults())
    }

    #[test]
    fn view_lists_translations_for_active_language() {
        let source = StaticLocaleSource::from_tags(&["es-ES", "en-GB"]);
        let screen = screen_for(&source);
        let mut context = screen.context().borrow_mut();

        let lines = view(ViewContext {
            context: &mut context,
            source: &source,
            examples: &Example::defaults(),
        });

        let hello = lines
            .iter()
            .find(|line| line.name == "Translation of \"hello\"")
            .unwrap();
        assert_eq!(hello.value, json!("Hello"));
        assert_eq!(lines[0].value, json!(["es-ES", "en-GB"]));
    }

    #[test]
    fn best_match_row_reports_probe_result() {
        let source = StaticLocaleSource::from_tags(&["en-US"]);
        let screen = screen_for(&source);
        let mut context = screen.context().borrow_mut();

        let lines = view(ViewContext {
            context: &mut context,
            source: &source,
            examples: &[],
        });

        assert_eq!(lines[1].value, json!({ "languageTag": "en-US", "isRTL": false }));
    }

    #[test]
    fn arabic_screen_shows_right_to_left() {
        let source = StaticLocaleSource::from_tags(&["ar-SA"]);
        let screen = screen_for(&source);
        let text = screen.render(&source);

        assert!(text.contains("\"ar\""));
        assert!(text.contains("من اليمين إلى اليسار"));
    }

    #[test]
    fn render_indents_values() {
        let text = render(&[Line::new("Name", json!("value"))]);
        assert_eq!(text, "Name\n    \"value\"\n");
    }

    #[test]
    fn locale_change_requests_render() {
        let source = StaticLocaleSource::from_tags(&["en"]);
        let screen = screen_for(&source);
        assert!(screen.take_needs_render());
        assert!(!screen.take_needs_render());

        let _mounted = screen.mount(&source, None);
        source.set_locales(LocaleDescriptor::parse_all(["it-IT"]));

        assert!(screen.take_needs_render());
        assert!(screen.render(&source).contains("Ciao"));
    }

    #[test]
    fn change_during_render_borrow_is_applied_on_next_render() {
        let source = StaticLocaleSource::from_tags(&["en"]);
        let screen = screen_for(&source);
        screen.take_needs_render();
        let _mounted = screen.mount(&source, None);

        let busy = screen.context().borrow_mut();
        source.set_locales(LocaleDescriptor::parse_all(["it-IT"]));
        drop(busy);

        assert!(screen.take_needs_render());
        assert!(screen.render(&source).contains("Ciao"));
        assert_eq!(screen.context().borrow().active().language.to_string(), "it");
        assert!(!screen.take_needs_render());
    }

    #[test]
    fn unmounted_screen_ignores_changes() {
        let source = StaticLocaleSource::from_tags(&["en"]);
        let screen = screen_for(&source);
        screen.take_needs_render();

        drop(screen.mount(&source, None));
        source.set_locales(LocaleDescriptor::parse_all(["fr"]));

        assert!(!screen.take_needs_render());
    }
}
