//! Initialisation du logging
//!
//! Un `Registry` tracing avec un filtre de niveau rechargeable, et une sortie
//! console optionnelle. [`LogHandle`] permet de changer le niveau à chaud.

use crate::{Error, Result};
use podconfig::Config;
use std::sync::{Arc, PoisonError, RwLock};
use tracing_subscriber::{
    Registry, filter::LevelFilter, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

/// Options d'initialisation du système de logging
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Niveau minimum au démarrage
    pub min_level: LevelFilter,
    /// Activer la sortie vers la console
    pub enable_console: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            min_level: LevelFilter::INFO,
            enable_console: true,
        }
    }
}

impl LoggingOptions {
    /// Lit `host.logger` ; un niveau invalide retombe sur `INFO`
    pub fn from_config(config: &Config) -> Self {
        let level = config.get_log_min_level();
        let min_level = parse_level(&level).unwrap_or_else(|_| {
            eprintln!("Invalid log level '{}' in configuration, using INFO", level);
            LevelFilter::INFO
        });

        Self {
            min_level,
            enable_console: config.get_log_enable_console(),
        }
    }
}

/// Poignée sur le filtre de niveau installé par [`init_logging`]
#[derive(Clone)]
pub struct LogHandle {
    level: Arc<RwLock<LevelFilter>>,
    reload_handle: reload::Handle<LevelFilter, Registry>,
}

impl LogHandle {
    pub fn level(&self) -> LevelFilter {
        *self.level.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Change le niveau minimum (`error`, `warn`, `info`, `debug`, `trace`, `off`)
    pub fn set_level(&self, level: &str) -> Result<LevelFilter> {
        let filter = parse_level(level)?;
        self.reload_handle.reload(filter)?;
        *self.level.write().unwrap_or_else(PoisonError::into_inner) = filter;
        Ok(filter)
    }
}

/// Analyse un nom de niveau, sans tenir compte de la casse
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| Error::InvalidLogLevel(level.to_string()))
}

/// Installe le subscriber global
///
/// Si un subscriber est déjà installé, il est conservé et la poignée
/// retournée reste sans effet sur lui.
///
/// ```rust,no_run
/// use podserver::logs::{LoggingOptions, init_logging};
///
/// let handle = init_logging(&LoggingOptions::default());
/// handle.set_level("debug").unwrap();
/// ```
pub fn init_logging(options: &LoggingOptions) -> LogHandle {
    let (filter, reload_handle) = reload::Layer::new(options.min_level);

    let console = options.enable_console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
    });

    // Le filtre doit être appliqué avant la console
    if let Err(e) = Registry::default().with(filter).with(console).try_init() {
        eprintln!("Logging already initialized: {}", e);
    }

    LogHandle {
        level: Arc::new(RwLock::new(options.min_level)),
        reload_handle,
    }
}
