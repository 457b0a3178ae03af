/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Layered shell preferences: command line over environment over config
//! file over built-in defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use bpaf::Bpaf;
use log::warn;
use serde::Deserialize;

use crate::navigation::RecoveryPolicy;

pub(crate) const ENV_RECOVERY: &str = "MAPSHELL_RECOVERY";
pub(crate) const ENV_DATA_DIR: &str = "MAPSHELL_DATA_DIR";
pub(crate) const ENV_LOG: &str = "MAPSHELL_LOG";
pub(crate) const ENV_HEADLESS: &str = "MAPSHELL_HEADLESS";

const CONFIG_FILE: &str = "mapshell.toml";

/// Command line of the shell binary.
#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version)]
pub struct CliArgs {
    /// Resolve and print the start URL instead of opening a window
    pub headless: bool,
    /// Recovery after a failed page load: `fallback` or `notice`
    #[bpaf(argument("POLICY"))]
    pub recovery: Option<RecoveryPolicy>,
    /// Directory the bundled pages are installed into
    #[bpaf(argument("DIR"))]
    pub data_dir: Option<PathBuf>,
    /// Log filter, e.g. `info` or `mapshell=debug`
    #[bpaf(argument("FILTER"))]
    pub log_filter: Option<String>,
    /// Activation deep link, e.g. `mapshell://map/61.0,24.5?z=11`
    #[bpaf(positional("LINK"))]
    pub link: Option<String>,
}

/// On-disk config (`mapshell.toml` under the platform config dir). Every
/// key optional; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub recovery: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub log_filter: Option<String>,
}

/// Environment overrides, snapshotted once per resolve.
#[derive(Debug, Clone, Default)]
pub(crate) struct EnvOverrides {
    pub(crate) recovery: Option<String>,
    pub(crate) data_dir: Option<String>,
    pub(crate) log_filter: Option<String>,
    pub(crate) headless: Option<String>,
}

impl EnvOverrides {
    fn snapshot() -> EnvOverrides {
        EnvOverrides {
            recovery: env::var(ENV_RECOVERY).ok(),
            data_dir: env::var(ENV_DATA_DIR).ok(),
            log_filter: env::var(ENV_LOG).ok(),
            headless: env::var(ENV_HEADLESS).ok(),
        }
    }
}

/// Fully merged preferences the shell runs with.
#[derive(Debug, Clone)]
pub struct ShellPreferences {
    pub headless: bool,
    pub recovery: RecoveryPolicy,
    pub data_dir: Option<PathBuf>,
    pub log_filter: Option<String>,
    pub link: Option<String>,
}

impl ShellPreferences {
    pub fn resolve(args: CliArgs) -> ShellPreferences {
        let file = config_file_path()
            .map(|path| read_config_file(&path))
            .unwrap_or_default();
        ShellPreferences::from_layers(args, file, EnvOverrides::snapshot())
    }

    /// Pure merge over the three layers; split out so the precedence is
    /// testable without touching the process environment.
    pub(crate) fn from_layers(
        args: CliArgs,
        file: ConfigFile,
        env: EnvOverrides,
    ) -> ShellPreferences {
        let recovery = args
            .recovery
            .or_else(|| parse_policy(ENV_RECOVERY, env.recovery.as_deref()))
            .or_else(|| parse_policy(CONFIG_FILE, file.recovery.as_deref()))
            .unwrap_or_default();
        let data_dir = args
            .data_dir
            .or_else(|| env.data_dir.map(PathBuf::from))
            .or(file.data_dir);
        let log_filter = args.log_filter.or(env.log_filter).or(file.log_filter);
        let headless = args.headless || env_flag_enabled(env.headless.as_deref());
        ShellPreferences {
            headless,
            recovery,
            data_dir,
            log_filter,
            link: args.link,
        }
    }
}

fn parse_policy(source: &str, raw: Option<&str>) -> Option<RecoveryPolicy> {
    let raw = raw?;
    match raw.parse() {
        Ok(policy) => Some(policy),
        Err(err) => {
            warn!("ignoring recovery policy from {source}: {err}");
            None
        }
    }
}

/// Flag truthiness shared by all `MAPSHELL_*` switches.
pub(crate) fn env_flag_enabled(value: Option<&str>) -> bool {
    matches!(
        value.map(|raw| raw.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mapshell").join(CONFIG_FILE))
}

fn read_config_file(path: &Path) -> ConfigFile {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        // A missing config is the normal case, not worth a log line.
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return ConfigFile::default(),
        Err(err) => {
            warn!("ignoring unreadable {}: {err}", path.display());
            return ConfigFile::default();
        }
    };
    match toml::from_str(&raw) {
        Ok(config) => config,
        Err(err) => {
            warn!("ignoring unparsable {}: {err}", path.display());
            ConfigFile::default()
        }
    }
}
