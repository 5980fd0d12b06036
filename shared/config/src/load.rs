use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use arc_swap::ArcSwap;
use notify::{watcher, DebouncedEvent, RecursiveMode, Watcher};
use once_cell::sync::OnceCell;
use thiserror::Error;

use common::*;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parsing(#[from] ron::de::Error),

    #[error("Failed to watch config file: {0}")]
    Notify(#[from] notify::Error),

    #[error("Path is not a file")]
    NotAFile,

    #[error("Config has already been initialized")]
    AlreadyInitialized,
}

type ConfigResult<T> = std::result::Result<T, ConfigError>;

pub enum ConfigType<'a> {
    String(&'a str),
    File(&'a Path),
    WatchedFile(&'a Path),
}

/// Set once by [init], swapped on reload
static CONFIG: OnceCell<ArcSwap<Config>> = OnceCell::new();

/// Must be called once only, and before [get]
pub fn init(cfg: ConfigType) -> ConfigResult<()> {
    // parse config and fail early
    let config = cfg.load()?;

    CONFIG
        .set(ArcSwap::from_pointee(config))
        .map_err(|_| ConfigError::AlreadyInitialized)?;

    // watch directory for changes if requested
    if let ConfigType::WatchedFile(path) = cfg {
        watch(path.to_owned())?;
    }

    Ok(())
}

/// Current config snapshot, unaffected by later reloads
pub fn get() -> Arc<Config> {
    CONFIG
        .get()
        .expect("config has not been initialized")
        .load_full()
}

fn watch(path: PathBuf) -> ConfigResult<()> {
    let watch_file = path.file_name().ok_or(ConfigError::NotAFile)?.to_owned();
    let watch_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_owned(),
        _ => PathBuf::from("."),
    };

    let (tx, rx) = channel();
    let mut watcher = watcher(tx, Duration::from_secs(1))?;
    watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

    // start watcher thread
    thread::Builder::new()
        .name("cfg-watcher".to_owned())
        .spawn(move || {
            let _watcher = watcher; // keep alive
            loop {
                match rx.recv() {
                    Ok(event) => {
                        if should_reload(&event, &watch_file) {
                            info!("config was modified, reloading"; "path" => %path.display());
                            if let Some(cfg) = CONFIG.get() {
                                reload_into(cfg, &path);
                            }
                        }
                    }
                    Err(_) => {
                        debug!("config watcher disconnected");
                        break;
                    }
                }
            }
        })?;

    Ok(())
}

/// Only events touching the watched file itself count, the rest of the directory is ignored
fn should_reload(event: &DebouncedEvent, watch_file: &OsStr) -> bool {
    let is_config = |p: &PathBuf| p.file_name() == Some(watch_file);

    match event {
        DebouncedEvent::Write(p) | DebouncedEvent::Create(p) => is_config(p),
        DebouncedEvent::Remove(p) if is_config(p) => {
            warn!("config was deleted");
            true
        }
        DebouncedEvent::Rename(a, b) if is_config(a) || is_config(b) => {
            warn!("config was renamed");
            true
        }
        _ => false,
    }
}

/// Swaps in the config parsed from `path`, or keeps the current one if it can't be loaded.
/// Returns true if swapped
fn reload_into(cfg: &ArcSwap<Config>, path: &Path) -> bool {
    match ConfigType::File(path).load() {
        Ok(config) => {
            let new = Arc::new(config);
            let new_ptr = Arc::as_ptr(&new);

            let old = cfg.swap(new);
            let old_ptr = Arc::as_ptr(&old);

            debug!("swapped config instance"; "new" => ?new_ptr, "old" => ?old_ptr);
            true
        }
        Err(e) => {
            warn!("failed to reload config, keeping the old one"; "error" => %e);
            false
        }
    }
}

impl<'a> ConfigType<'a> {
    /// Parses without touching the global instance
    pub fn load(&self) -> ConfigResult<Config> {
        let bytes = match self {
            ConfigType::String(s) => Cow::Borrowed(*s),
            ConfigType::File(path) | ConfigType::WatchedFile(path) => {
                let contents = std::fs::read_to_string(*path)?;
                Cow::Owned(contents)
            }
        };

        ron::de::from_str(&bytes).map_err(ConfigError::Parsing)
    }
}
