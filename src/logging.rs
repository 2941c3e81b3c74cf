use std::collections::HashMap;
use std::ffi::OsString;
use std::io::stdout;
use std::path::{Path, PathBuf};

use tracing::dispatcher::Dispatch;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::Layer as FmtLayer;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::{Layer as LayerIntf, Registry};

use crate::config::{AppBasepathCfg, AppLogHandlerCfg, AppLoggerCfg, AppLoggingCfg};
use crate::constant::logging::Destination;
use crate::AppLogAlias;

pub type AppLogLevel = crate::constant::logging::Level;

// `tracing` orders severities the other way round, TRACE is the most
// verbose level there
pub const fn to_3rdparty_level(lvl: &AppLogLevel) -> tracing::Level {
    match lvl {
        AppLogLevel::FATAL | AppLogLevel::ERROR => tracing::Level::ERROR,
        AppLogLevel::WARNING => tracing::Level::WARN,
        AppLogLevel::INFO => tracing::Level::INFO,
        AppLogLevel::DEBUG => tracing::Level::DEBUG,
        AppLogLevel::TRACE => tracing::Level::TRACE,
    }
}

// one sink per configured handler, shared by every logger referencing
// its alias
struct SinkHandle {
    writer: NonBlocking,
    min_level: tracing::Level,
    flusher: WorkerGuard,
}

fn open_sink(basepath: &AppBasepathCfg, cfg: &AppLogHandlerCfg) -> SinkHandle {
    let (writer, flusher) = match &cfg.destination {
        Destination::CONSOLE => tracing_appender::non_blocking(stdout()),
        Destination::LOCALFS => {
            // config validation already rejected file handlers without a path
            let relpath = cfg.path.clone().unwrap_or_default();
            let fullpath = Path::new(basepath.system.as_str()).join(relpath);
            let dir = fullpath
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            let fname = fullpath
                .file_name()
                .map(OsString::from)
                .unwrap_or_else(|| OsString::from("server.log"));
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, fname);
            tracing_appender::non_blocking(appender)
        }
    };
    SinkHandle {
        writer,
        min_level: to_3rdparty_level(&cfg.min_level),
        flusher,
    }
}

fn build_dispatch(cfg: &AppLoggerCfg, sinks: &HashMap<AppLogAlias, SinkHandle>) -> Dispatch {
    let layers = cfg
        .handlers
        .iter()
        .filter_map(|alias| sinks.get(alias))
        .map(|sink| {
            let lvl = match cfg.level.as_ref() {
                Some(l) => to_3rdparty_level(l),
                None => sink.min_level,
            };
            FmtLayer::new()
                .with_writer(sink.writer.clone())
                .with_file(false)
                .with_target(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_filter(LevelFilter::from_level(lvl))
        })
        .collect::<Vec<_>>();
    Dispatch::new(Registry::default().with(layers))
}

pub struct AppLogContext {
    dispatchers: HashMap<AppLogAlias, Dispatch>,
    // the writers flush in background threads only while these are alive
    _flushers: Vec<WorkerGuard>,
}

impl AppLogContext {
    pub fn new(basepath: &AppBasepathCfg, cfg: &AppLoggingCfg) -> Self {
        let mut sinks = HashMap::new();
        for item in cfg.handlers.iter() {
            sinks.insert(item.alias.clone(), open_sink(basepath, item));
        }
        let dispatchers = cfg
            .loggers
            .iter()
            .map(|item| (item.alias.clone(), build_dispatch(item, &sinks)))
            .collect::<HashMap<_, _>>();
        let _flushers = sinks.into_values().map(|s| s.flusher).collect();
        Self {
            dispatchers,
            _flushers,
        }
    }

    // resolve the most specific logger configured for a module path,
    // walking up to parent modules so one config entry may cover a
    // whole subtree of the crate
    pub fn dispatcher_for(&self, mod_path: &str) -> Option<&Dispatch> {
        let mut key = mod_path;
        loop {
            if let Some(d) = self.dispatchers.get(&key.to_string()) {
                return Some(d);
            }
            key = key.rsplit_once("::")?.0;
        }
    }
} // end of impl AppLogContext

#[macro_export]
macro_rules! app_log_event {
    ( $ctx:ident, $lvl:expr, $($arg:tt)+ ) => {{
        if let Some(dispatcher) = $ctx.dispatcher_for(module_path!()) {
            const LVL_INNER: tracing::Level = $crate::logging::to_3rdparty_level(&$lvl);
            tracing::dispatcher::with_default(dispatcher, || {
                tracing::event!(LVL_INNER, $($arg)+);
            });
        } else {
            eprintln!("[log] no logger covers the module path: {}", module_path!());
            eprintln!($($arg)+);
        }
    }};
}

pub use app_log_event;
