// SPDX-License-Identifier: MPL-2.0
use locale_lens::config;
use locale_lens::i18n::{
    resolver, LocaleContext, LocaleDescriptor, LocaleSource, SystemLocaleSource, TranslationArgs,
};
use locale_lens::paths;
use locale_lens::screen::{Example, LocaleScreen};
use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
locale-lens: inspect locale resolution and translations

USAGE:
  locale-lens [OPTIONS] [KEY]...

OPTIONS:
  --lang TAG          Language tried before the device preferences
  --config-dir DIR    Directory holding settings.toml
  --i18n-dir DIR      Directory of <tag>.ftl files replacing the embedded ones
  --arg NAME=VALUE    Parameter passed to every KEY (repeatable)
  --watch             Re-render whenever the device locales change
  -h, --help          Print this help

ARGS:
  KEY                 Translation keys to show (default: hello test)
";

struct Flags {
    lang: Option<String>,
    config_dir: Option<String>,
    i18n_dir: Option<String>,
    args: Vec<String>,
    watch: bool,
    keys: Vec<String>,
}

fn parse_flags() -> Result<Option<Flags>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }
    let flags = Flags {
        lang: args.opt_value_from_str("--lang")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        i18n_dir: args.opt_value_from_str("--i18n-dir")?,
        args: args.values_from_str("--arg")?,
        watch: args.contains("--watch"),
        keys: args
            .finish()
            .into_iter()
            .filter_map(|s| s.into_string().ok())
            .collect(),
    };
    Ok(Some(flags))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("locale_lens=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn examples(flags: &Flags) -> Vec<Example> {
    let params: Option<TranslationArgs> = if flags.args.is_empty() {
        None
    } else {
        Some(
            flags
                .args
                .iter()
                .filter_map(|pair| {
                    let parsed = TranslationArgs::parse_pair(pair);
                    if parsed.is_none() {
                        tracing::warn!(%pair, "ignoring malformed --arg");
                    }
                    parsed
                })
                .collect(),
        )
    };
    if flags.keys.is_empty() {
        return Example::defaults();
    }
    flags
        .keys
        .iter()
        .map(|key| Example::new(key.clone(), params.clone()))
        .collect()
}

fn run(flags: Flags) -> locale_lens::error::Result<()> {
    paths::init_cli_override(flags.config_dir.clone());
    let (mut config, warning) = config::load();
    if let Some(key) = warning {
        tracing::warn!(%key, "config could not be read, using defaults");
    }
    if let Some(dir) = &flags.i18n_dir {
        config.i18n.translations_dir = Some(PathBuf::from(dir));
    }

    let language_override = match flags.lang.as_deref().or(config.general.language.as_deref()) {
        Some(tag) => Some(LocaleDescriptor::parse(tag)?),
        None => None,
    };

    let source = SystemLocaleSource::new();
    let preferred = resolver::with_override(language_override.as_ref(), source.preferred_locales());
    let context = LocaleContext::from_config(&config, &preferred)?;
    tracing::info!(active = %context.active(), "locale resolved");

    let screen = LocaleScreen::new(Rc::new(RefCell::new(context)), examples(&flags));
    let _mounted = screen.mount(&source, language_override);

    print!("{}", screen.render(&source));
    screen.take_needs_render();

    if flags.watch {
        let interval = config.watch.poll_interval();
        loop {
            std::thread::sleep(interval);
            source.poll();
            if screen.take_needs_render() {
                println!();
                print!("{}", screen.render(&source));
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let flags = match parse_flags() {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            print!("{}", HELP);
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            eprint!("{}", HELP);
            return ExitCode::from(2);
        }
    };

    match run(flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "locale-lens failed");
            ExitCode::FAILURE
        }
    }
}
