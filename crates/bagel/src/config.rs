use crate::events::AppEvent;
use crate::sys::launch::{self, ExecCommand};
use async_channel::Sender;
use directories::ProjectDirs;
use glide::{BagelConfig, GestureConfig, ItemColor, ItemId, RadialItem};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SETUP_EXEC: &str = "BAGEL_SETUP";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemConfig {
    pub id: Option<ItemId>,
    pub label: String,
    pub color: Option<ItemColor>,
    pub exec: Option<ExecCommand>,
    #[serde(default)]
    pub children: Vec<ItemConfig>,
}

impl ItemConfig {
    fn leaf(label: &str, exec: &str) -> Self {
        Self {
            id: None,
            label: label.to_string(),
            color: None,
            exec: Some(ExecCommand::from(exec)),
            children: Vec::new(),
        }
    }

    /// Branches ignore `exec`; leaves without one are selectable but do nothing.
    pub fn to_item(&self) -> RadialItem {
        let id = self
            .id
            .clone()
            .unwrap_or_else(|| ItemId::new(self.label.to_lowercase()));
        let mut item = RadialItem::new(id, self.label.clone())
            .with_children(self.children.iter().map(Self::to_item).collect());
        item.color = self.color.clone();

        if item.is_leaf()
            && let Some(exec) = self.exec.clone()
        {
            item = item.with_action(move || run_exec(&exec));
        }
        item
    }
}

fn run_exec(exec: &ExecCommand) {
    if exec.as_str() == SETUP_EXEC {
        match write_default_config() {
            Ok(path) => {
                let open = format!("xdg-open {}", shell_words::quote(&path.to_string_lossy()));
                if let Err(e) = launch::launch(&ExecCommand::new(open)) {
                    log::error!("Failed to open {}: {}", path.display(), e);
                }
            }
            Err(e) => log::error!("Failed to write default config: {}", e),
        }
    } else if let Err(e) = launch::launch(exec) {
        log::error!("Failed to launch '{}': {}", exec, e);
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub menu: BagelConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

impl Config {
    pub fn build_items(&self) -> Vec<RadialItem> {
        self.items.iter().map(ItemConfig::to_item).collect()
    }

    fn setup() -> Self {
        Self {
            items: vec![ItemConfig::leaf("Setup", SETUP_EXEC)],
            ..Default::default()
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "bagel", "bagel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("BAGEL")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        return Config::setup();
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, falling back to setup menu: {}", e);
            Config::setup()
        }
    }
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if path.exists() {
        return Ok(path);
    }
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(&path, DEFAULT_CONFIG)?;
    log::info!("Wrote default config to {}", path.display());
    Ok(path)
}

fn touches_config(event: &notify::Event, config_path: &Path) -> bool {
    let relevant = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant && event.paths.iter().any(|p| p == config_path)
}

/// The directory is watched rather than the file so editors that replace the file on save still
/// trigger a reload.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    if let Err(e) = watch(&tx).await {
        log::error!("Config watcher stopped: {}", e);
    }
}

async fn watch(tx: &Sender<AppEvent>) -> Result<(), ConfigError> {
    let config_path = get_config_path()?;
    let Some(config_dir) = config_path.parent() else {
        return Err(ConfigError::ConfigDirNotFound);
    };
    fs_err::create_dir_all(config_dir)?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(config_dir, RecursiveMode::NonRecursive)?;

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if touches_config(&event, &config_path) => {
                log::debug!("Config changed: {:?}", event.kind);
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_tree_deserialization() {
        let json = r##"{
            "menu": { "ring_width": 64, "gap": 6 },
            "gesture": { "hold_delay": 300 },
            "items": [
                { "label": "Terminal", "exec": "foot", "color": "#3584e4" },
                { "id": "web", "label": "Web", "children": [
                    { "label": "Firefox", "exec": "firefox" },
                    { "label": "Chromium", "exec": "chromium" }
                ]}
            ]
        }"##;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.menu.ring_width, 64.0);
        assert_eq!(config.menu.inner_radius, BagelConfig::default().inner_radius);
        assert_eq!(config.gesture.hold_delay.as_millis(), 300);

        let items = config.build_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id.as_str(), "terminal");
        assert!(items[0].action.is_some());
        assert_eq!(items[0].color.as_ref().map(|c| c.as_str()), Some("#3584e4"));
        assert_eq!(items[1].id.as_str(), "web");
        assert!(items[1].is_branch());
        assert!(items[1].action.is_none());
        assert_eq!(glide::item::max_depth(&items), 2);
    }

    #[test]
    fn test_default_config_parses() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert!(!config.items.is_empty());
        assert!(config.build_items().iter().any(RadialItem::is_branch));
    }

    #[test]
    fn test_setup_menu() {
        let items = Config::setup().build_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Setup");
        assert!(items[0].action.is_some());
    }

    #[test]
    fn test_only_config_file_events_reload() {
        let config_path = PathBuf::from("/tmp/bagel-test/config.toml");
        let modify = notify::Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(config_path.clone());
        assert!(touches_config(&modify, &config_path));

        let other = notify::Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/bagel-test/config.toml.swp"));
        assert!(!touches_config(&other, &config_path));

        let access = notify::Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(config_path.clone());
        assert!(!touches_config(&access, &config_path));
    }
}
