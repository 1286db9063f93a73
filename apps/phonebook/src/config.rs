use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use media_upload::UploadConfig;
use phonebook_core::{CallingCodes, StaticCallingCodes, DEFAULT_PAGE_SIZE};
use serde::Deserialize;
use shared::domain::CountryCode;

const DEFAULT_CONFIG_FILE: &str = "phonebook.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub page_size: usize,
    pub default_country: String,
    pub upload_base_url: String,
    pub upload_cloud_name: Option<String>,
    pub upload_preset: Option<String>,
    pub upload_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_country: "IN".into(),
            upload_base_url: "https://api.cloudinary.com".into(),
            upload_cloud_name: None,
            upload_preset: None,
            upload_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn default_country(&self) -> anyhow::Result<CountryCode> {
        let code: CountryCode = self
            .default_country
            .parse()
            .with_context(|| "invalid default_country")?;
        if StaticCallingCodes.calling_code(code).is_none() {
            bail!("default_country '{code}' has no known calling code");
        }
        Ok(code)
    }

    /// `None` while either the cloud name or the upload preset is unset.
    pub fn upload_config(&self) -> Option<UploadConfig> {
        let cloud_name = non_empty(self.upload_cloud_name.as_deref())?;
        let upload_preset = non_empty(self.upload_preset.as_deref())?;
        Some(UploadConfig {
            base_url: self.upload_base_url.clone(),
            cloud_name: cloud_name.to_string(),
            upload_preset: upload_preset.to_string(),
            timeout: Duration::from_secs(self.upload_timeout_secs),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.page_size == 0 {
            bail!("page_size must be >= 1");
        }
        if self.upload_timeout_secs == 0 {
            bail!("upload_timeout_secs must be >= 1");
        }
        self.default_country()?;
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Defaults, then the TOML file, then `APP__*` environment variables.
///
/// An explicit `path` must exist; otherwise `phonebook.toml` in the working
/// directory is read when present.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) => read_settings_file(path)?,
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if fallback.exists() {
                read_settings_file(&fallback)?
            } else {
                Settings::default()
            }
        }
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    parse_settings(&raw).with_context(|| format!("failed to parse config file '{}'", path.display()))
}

pub fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str(raw)?)
}

pub fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("APP__PAGE_SIZE") {
        settings.page_size = v
            .parse()
            .with_context(|| format!("APP__PAGE_SIZE must be a number, got '{v}'"))?;
    }
    if let Some(v) = lookup("APP__DEFAULT_COUNTRY") {
        settings.default_country = v;
    }
    if let Some(v) = lookup("APP__UPLOAD_BASE_URL") {
        settings.upload_base_url = v;
    }
    if let Some(v) = lookup("APP__UPLOAD_CLOUD_NAME") {
        settings.upload_cloud_name = Some(v);
    }
    if let Some(v) = lookup("APP__UPLOAD_PRESET") {
        settings.upload_preset = Some(v);
    }
    if let Some(v) = lookup("APP__UPLOAD_TIMEOUT_SECS") {
        settings.upload_timeout_secs = v
            .parse()
            .with_context(|| format!("APP__UPLOAD_TIMEOUT_SECS must be a number, got '{v}'"))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
