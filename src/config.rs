//! Global configuration store.
//!
//! This module holds every global option as a typed field, knows each field's
//! default, and moves the whole record to and from `global_config.yaml`. The
//! file lives in `$XDG_CONFIG_HOME/ddev` when that variable is set, otherwise
//! in `~/.ddev`. A store is loaded once per invocation, mutated in memory by
//! [`crate::mutation`], optionally saved, and then dropped.

use crate::catalog::{CATALOG, OptionValue};
use crate::constants::{
    DEFAULT_INTERNET_DETECTION_TIMEOUT_MS, DEFAULT_TABLE_STYLE, DISPLAY_HEADER,
    GLOBAL_CONFIG_FILE, HOME_DIR_NAME, TEMP_SUFFIX, XDG_DIR_NAME,
};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub instrumentation_opt_in: bool,
    #[serde(default)]
    pub omit_containers: Vec<String>,
    #[serde(default)]
    pub web_environment: Vec<String>,
    #[serde(default)]
    pub mutagen_enabled: bool,
    #[serde(default)]
    pub nfs_mount_enabled: bool,
    #[serde(default)]
    pub router_bind_all_interfaces: bool,
    #[serde(default = "default_internet_detection_timeout_ms")]
    pub internet_detection_timeout_ms: i64,
    #[serde(default)]
    pub disable_http2: bool,
    #[serde(default)]
    pub use_letsencrypt: bool,
    #[serde(default)]
    pub letsencrypt_email: String,
    #[serde(default = "default_table_style")]
    pub table_style: String,
    #[serde(default)]
    pub simple_formatting: bool,
    #[serde(default)]
    pub auto_restart_containers: bool,
    #[serde(default)]
    pub use_hardened_images: bool,
    #[serde(default)]
    pub fail_on_hook_fail: bool,
    #[serde(default)]
    pub required_docker_compose_version: String,
    #[serde(default)]
    pub use_docker_compose_from_path: bool,
    #[serde(default)]
    pub project_tld: String,
    #[serde(default)]
    pub xdebug_ide_location: String,
}

fn default_internet_detection_timeout_ms() -> i64 {
    DEFAULT_INTERNET_DETECTION_TIMEOUT_MS
}

fn default_table_style() -> String {
    DEFAULT_TABLE_STYLE.to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalConfig {
    pub fn new() -> Self {
        Self {
            instrumentation_opt_in: false,
            omit_containers: Vec::new(),
            web_environment: Vec::new(),
            mutagen_enabled: false,
            nfs_mount_enabled: false,
            router_bind_all_interfaces: false,
            internet_detection_timeout_ms: default_internet_detection_timeout_ms(),
            disable_http2: false,
            use_letsencrypt: false,
            letsencrypt_email: String::new(),
            table_style: default_table_style(),
            simple_formatting: false,
            auto_restart_containers: false,
            use_hardened_images: false,
            fail_on_hook_fail: false,
            required_docker_compose_version: String::new(),
            use_docker_compose_from_path: false,
            project_tld: String::new(),
            xdebug_ide_location: String::new(),
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // XDG_CONFIG_HOME wins when set (also how tests isolate themselves)
        let config_dir = match std::env::var("XDG_CONFIG_HOME") {
            Ok(xdg_config) if !xdg_config.is_empty() => {
                PathBuf::from(shellexpand::tilde(&xdg_config).as_ref()).join(XDG_DIR_NAME)
            }
            _ => dirs::home_dir()
                .ok_or("Unable to find home directory")?
                .join(HOME_DIR_NAME),
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join(GLOBAL_CONFIG_FILE))
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    /// Load from the default location.
    pub fn load() -> Result<Self, Box<dyn Error>> {
        Ok(Self::load_from(&Self::config_path()?)?)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        Ok(self.save_to(&Self::config_path()?)?)
    }

    /// Read the store persisted at `path`, merged field by field over defaults.
    ///
    /// A missing (or blank) file yields a fully defaulted store. Anything that
    /// cannot be read, parsed, or fails an option's checks is a
    /// [`ConfigError::CorruptConfig`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No global config at {}, using defaults", path.display());
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(ConfigError::CorruptConfig {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        if contents.trim().is_empty() {
            return Ok(Self::new());
        }

        let mut config: GlobalConfig =
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::CorruptConfig {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.dedup_lists();
        config
            .check_values()
            .map_err(|reason| ConfigError::CorruptConfig {
                path: path.to_path_buf(),
                reason,
            })?;

        log::debug!("Loaded global config from {}", path.display());
        Ok(config)
    }

    /// Persist every field to `path`.
    ///
    /// The document is written to a scratch file next to `path` and renamed
    /// over it, so readers see either the old file or the new one.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_failed = |source: io::Error| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(write_failed)?;
            }
        }

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| write_failed(io::Error::other(e)))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| GLOBAL_CONFIG_FILE.to_string());
        let temp_path =
            path.with_file_name(format!(".{file_name}.{}.{TEMP_SUFFIX}", std::process::id()));

        let written = fs::File::create(&temp_path).and_then(|mut file| {
            file.write_all(yaml.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|()| fs::rename(&temp_path, path)) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_failed(e));
        }

        log::debug!("Saved global config to {}", path.display());
        Ok(())
    }

    /// Current value of the option `name`, or `None` if it is not in the catalog
    pub fn get(&self, name: &str) -> Option<OptionValue> {
        use OptionValue::{Bool, Int, List, Str};

        let value = match name {
            "instrumentation-opt-in" => Bool(self.instrumentation_opt_in),
            "omit-containers" => List(self.omit_containers.clone()),
            "web-environment" => List(self.web_environment.clone()),
            "mutagen-enabled" => Bool(self.mutagen_enabled),
            "nfs-mount-enabled" => Bool(self.nfs_mount_enabled),
            "router-bind-all-interfaces" => Bool(self.router_bind_all_interfaces),
            "internet-detection-timeout-ms" => Int(self.internet_detection_timeout_ms),
            "disable-http2" => Bool(self.disable_http2),
            "use-letsencrypt" => Bool(self.use_letsencrypt),
            "letsencrypt-email" => Str(self.letsencrypt_email.clone()),
            "table-style" => Str(self.table_style.clone()),
            "simple-formatting" => Bool(self.simple_formatting),
            "auto-restart-containers" => Bool(self.auto_restart_containers),
            "use-hardened-images" => Bool(self.use_hardened_images),
            "fail-on-hook-fail" => Bool(self.fail_on_hook_fail),
            "required-docker-compose-version" => Str(self.required_docker_compose_version.clone()),
            "use-docker-compose-from-path" => Bool(self.use_docker_compose_from_path),
            "project-tld" => Str(self.project_tld.clone()),
            "xdebug-ide-location" => Str(self.xdebug_ide_location.clone()),
            _ => return None,
        };
        Some(value)
    }

    /// Replace the option `name` with `value`.
    ///
    /// The value must already have the option's type; parsing from text is the
    /// mutation engine's job.
    pub fn set(&mut self, name: &str, value: OptionValue) -> Result<(), ConfigError> {
        use OptionValue::{Bool, Int, List, Str};

        match (name, value) {
            ("instrumentation-opt-in", Bool(v)) => self.instrumentation_opt_in = v,
            ("omit-containers", List(v)) => self.omit_containers = v,
            ("web-environment", List(v)) => self.web_environment = v,
            ("mutagen-enabled", Bool(v)) => self.mutagen_enabled = v,
            ("nfs-mount-enabled", Bool(v)) => self.nfs_mount_enabled = v,
            ("router-bind-all-interfaces", Bool(v)) => self.router_bind_all_interfaces = v,
            ("internet-detection-timeout-ms", Int(v)) => self.internet_detection_timeout_ms = v,
            ("disable-http2", Bool(v)) => self.disable_http2 = v,
            ("use-letsencrypt", Bool(v)) => self.use_letsencrypt = v,
            ("letsencrypt-email", Str(v)) => self.letsencrypt_email = v,
            ("table-style", Str(v)) => self.table_style = v,
            ("simple-formatting", Bool(v)) => self.simple_formatting = v,
            ("auto-restart-containers", Bool(v)) => self.auto_restart_containers = v,
            ("use-hardened-images", Bool(v)) => self.use_hardened_images = v,
            ("fail-on-hook-fail", Bool(v)) => self.fail_on_hook_fail = v,
            ("required-docker-compose-version", Str(v)) => self.required_docker_compose_version = v,
            ("use-docker-compose-from-path", Bool(v)) => self.use_docker_compose_from_path = v,
            ("project-tld", Str(v)) => self.project_tld = v,
            ("xdebug-ide-location", Str(v)) => self.xdebug_ide_location = v,
            (name, value) => {
                return Err(match crate::catalog::find(name) {
                    None => ConfigError::UnknownOption {
                        name: name.to_string(),
                    },
                    Some(spec) => ConfigError::invalid(
                        name,
                        &value.to_string(),
                        format!("expected a {} value, got a {}", spec.kind, value.kind()),
                    ),
                });
            }
        }
        Ok(())
    }

    /// One `name=value` line per option, in catalog order
    pub fn render(&self) -> String {
        let mut out = String::new();
        for spec in CATALOG {
            if let Some(value) = self.get(spec.name) {
                out.push_str(spec.name);
                out.push('=');
                out.push_str(&spec.render_value(&value));
                out.push('\n');
            }
        }
        out
    }

    /// The listing shown by `ddev config global`, header included
    pub fn display(&self) -> String {
        format!("{DISPLAY_HEADER}\n{}", self.render())
    }

    /// JSON object keyed by option name
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut map = serde_json::Map::new();
        for spec in CATALOG {
            if let Some(value) = self.get(spec.name) {
                map.insert(spec.name.to_string(), serde_json::to_value(value)?);
            }
        }
        serde_json::to_string_pretty(&map)
    }

    /// Run every option through its catalog checks
    fn check_values(&self) -> Result<(), String> {
        for spec in CATALOG {
            if let Some(value) = self.get(spec.name) {
                spec.check(&value)
                    .map_err(|reason| format!("{}: {reason}", spec.name))?;
            }
        }
        Ok(())
    }

    fn dedup_lists(&mut self) {
        dedup_preserving_order(&mut self.omit_containers);
        dedup_preserving_order(&mut self.web_environment);
    }
}

fn dedup_preserving_order(entries: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    entries.retain(|entry| seen.insert(entry.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Use a mutex to ensure tests that modify environment variables don't run concurrently
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const DEFAULT_LISTING: &str = "Global configuration:\ninstrumentation-opt-in=false\nomit-containers=[]\nweb-environment=[]\nmutagen-enabled=false\nnfs-mount-enabled=false\nrouter-bind-all-interfaces=false\ninternet-detection-timeout-ms=3000\ndisable-http2=false\nuse-letsencrypt=false\nletsencrypt-email=\ntable-style=default\nsimple-formatting=false\nauto-restart-containers=false\nuse-hardened-images=false\nfail-on-hook-fail=false\nrequired-docker-compose-version=\nuse-docker-compose-from-path=false\nproject-tld=\nxdebug-ide-location=\n";

    #[test]
    fn test_config_new() {
        let config = GlobalConfig::new();
        assert_eq!(config.internet_detection_timeout_ms, 3000);
        assert_eq!(config.table_style, "default");
        assert!(config.omit_containers.is_empty());
        assert!(!config.use_letsencrypt);
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn test_defaults_match_catalog() {
        let config = GlobalConfig::new();
        for spec in CATALOG {
            assert_eq!(config.get(spec.name), Some(spec.default.to_value()), "{}", spec.name);
        }
    }

    #[test]
    fn test_display_defaults() {
        let config = GlobalConfig::new();
        assert_eq!(config.display(), DEFAULT_LISTING);
        assert_eq!(config.render().lines().count(), 19);
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut config = GlobalConfig::new();
        config.web_environment = vec!["B=2".to_string(), "A=1".to_string()];
        assert_eq!(config.render(), config.clone().render());
        assert!(config.render().contains("web-environment=[\"A=1\",\"B=2\"]\n"));
    }

    #[test]
    fn test_load_missing_file_is_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = GlobalConfig::load_from(&temp_dir.path().join("nope.yaml")).unwrap();
        assert_eq!(loaded, GlobalConfig::new());
    }

    #[test]
    fn test_load_blank_file_is_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(GLOBAL_CONFIG_FILE);
        fs::write(&path, "\n  \n").unwrap();
        assert_eq!(GlobalConfig::load_from(&path).unwrap(), GlobalConfig::new());
    }

    #[test]
    fn test_load_merges_over_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(GLOBAL_CONFIG_FILE);
        fs::write(
            &path,
            "nfs_mount_enabled: true\nomit_containers: [dba, dba, ddev-ssh-agent]\nsome_future_key: 1\n",
        )
        .unwrap();

        let loaded = GlobalConfig::load_from(&path).unwrap();
        assert!(loaded.nfs_mount_enabled);
        assert_eq!(loaded.omit_containers, vec!["dba", "ddev-ssh-agent"]);
        assert_eq!(loaded.internet_detection_timeout_ms, 3000);
        assert_eq!(loaded.table_style, "default");
    }

    #[test]
    fn test_load_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(GLOBAL_CONFIG_FILE);
        fs::write(&path, "internet_detection_timeout_ms: [not, a, number\n").unwrap();

        let err = GlobalConfig::load_from(&path).unwrap_err();
        assert!(err.is_corrupt());
        assert!(err.to_string().contains(GLOBAL_CONFIG_FILE));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(GLOBAL_CONFIG_FILE);

        for (contents, option) in [
            ("table_style: fancy\n", "table-style"),
            ("internet_detection_timeout_ms: -5\n", "internet-detection-timeout-ms"),
            ("omit_containers: [dba, web]\n", "omit-containers"),
            ("project_tld: \"a\\nb=c\"\n", "project-tld"),
        ] {
            fs::write(&path, contents).unwrap();
            let err = GlobalConfig::load_from(&path).unwrap_err();
            assert!(err.is_corrupt(), "{contents}");
            assert!(err.to_string().contains(option), "{err}");
        }

        fs::write(&path, "table_style: ''\n").unwrap();
        assert_eq!(GlobalConfig::load_from(&path).unwrap().table_style, "");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(GLOBAL_CONFIG_FILE);

        let mut config = GlobalConfig::new();
        config.omit_containers = vec!["ddev-ssh-agent".to_string(), "dba".to_string()];
        config.web_environment = vec!["SOMEENV=some+val".to_string(), "X=\"q\"".to_string()];
        config.letsencrypt_email = "nobody@example.com".to_string();
        config.internet_detection_timeout_ms = 850;
        config.table_style = String::new();
        config.disable_http2 = true;
        config.save_to(&path).unwrap();

        let loaded = GlobalConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        // No scratch files left behind
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != GLOBAL_CONFIG_FILE)
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_save_writes_every_field() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(GLOBAL_CONFIG_FILE);
        GlobalConfig::new().save_to(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("internet_detection_timeout_ms: 3000"));
        assert!(contents.contains("omit_containers: []"));
        assert!(contents.contains("xdebug_ide_location:"));
    }

    #[test]
    fn test_save_into_unwritable_location() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let err = GlobalConfig::new()
            .save_to(&blocker.join(GLOBAL_CONFIG_FILE))
            .unwrap_err();
        assert!(matches!(err, ConfigError::WriteFailed { .. }));
    }

    #[test]
    fn test_get_set() {
        let mut config = GlobalConfig::new();
        config
            .set("project-tld", OptionValue::Str("ddev.test".to_string()))
            .unwrap();
        assert_eq!(
            config.get("project-tld"),
            Some(OptionValue::Str("ddev.test".to_string()))
        );

        let err = config.set("project-tld", OptionValue::Bool(true)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = config.set("no-such-option", OptionValue::Bool(true)).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownOption { .. }));
        assert_eq!(config.get("no-such-option"), None);
    }

    #[test]
    fn test_to_json() {
        let json = GlobalConfig::new().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["internet-detection-timeout-ms"], 3000);
        assert_eq!(value["table-style"], "default");
        assert_eq!(value["omit-containers"], serde_json::json!([]));
    }

    #[test]
    fn test_config_path_uses_xdg() {
        let _guard = ENV_MUTEX.lock().unwrap();

        let temp_dir = TempDir::new().unwrap();
        let original_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let expected_path = temp_dir.path().join("ddev").join(GLOBAL_CONFIG_FILE);
        assert_eq!(GlobalConfig::config_path().unwrap(), expected_path);
        assert!(!GlobalConfig::exists().unwrap());

        GlobalConfig::new().save().unwrap();
        assert!(expected_path.exists());
        assert!(GlobalConfig::exists().unwrap());
        assert_eq!(GlobalConfig::load().unwrap(), GlobalConfig::new());

        // Clean up - restore original value if it existed
        unsafe {
            if let Some(original) = original_xdg {
                std::env::set_var("XDG_CONFIG_HOME", original);
            } else {
                std::env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }
}
