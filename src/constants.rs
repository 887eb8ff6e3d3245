//! Project-wide constants used across multiple modules.
//!
//! This module centralizes constant definitions to avoid duplication and ensure
//! consistency across the codebase.

/// Header printed above the rendered option listing
pub const DISPLAY_HEADER: &str = "Global configuration:";

/// Name of the persisted global configuration file
pub const GLOBAL_CONFIG_FILE: &str = "global_config.yaml";

/// Directory name used under `$XDG_CONFIG_HOME`
pub const XDG_DIR_NAME: &str = "ddev";

/// Directory name used under the home directory when XDG is not configured
pub const HOME_DIR_NAME: &str = ".ddev";

/// Suffix for the scratch file written before the atomic rename
pub const TEMP_SUFFIX: &str = "tmp";

/// Accepted values for `table-style`
pub const TABLE_STYLES: &[&str] = &["default", "bold", "bright"];

/// Containers that may be listed in `omit-containers`
pub const OMITTABLE_CONTAINERS: &[&str] = &["dba", "ddev-ssh-agent", "ddev-router"];

/// Named (non-IP) values accepted for `xdebug-ide-location`
pub const XDEBUG_IDE_LOCATIONS: &[&str] = &["container", "wsl2"];

/// Default for `internet-detection-timeout-ms`
pub const DEFAULT_INTERNET_DETECTION_TIMEOUT_MS: i64 = 3000;

/// Default for `table-style`
pub const DEFAULT_TABLE_STYLE: &str = "default";
