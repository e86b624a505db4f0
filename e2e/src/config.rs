use anyhow::{bail, Context as _, Result};
use demoaut_common::{PriceParsing, ReservationFormData};
use serde::Deserialize;
use std::{
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use url::Url;

pub const CONFIG_ENV: &str = "DEMOAUT_CONFIG";

/// Suite configuration, built once per run and shared by every scenario.
///
/// Every field must be present in the configuration file; environment
/// variables can only override values that were loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    pub base_url: Url,
    pub test_timeout_ms: u64,
    pub action_timeout_ms: u32,
    pub retries: u32,
    pub workers: usize,
    pub headless: bool,
    pub browsers: Vec<BrowserType>,
    pub viewport: ViewportSize,
    pub artifacts_dir: PathBuf,
    pub screenshot: ScreenshotPolicy,
    pub video: VideoPolicy,
    pub price_parsing: PriceParsing,
    pub fixture: FixtureConfig,
    pub reservation: ReservationFormData,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewportSize {
    pub width: i32,
    pub height: i32,
}

/// Local copy of the site served by the `demoaut-web` package.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureConfig {
    pub enabled: bool,
    pub startup_timeout_ms: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenshotPolicy {
    Off,
    On,
    OnlyOnFailure,
}

impl ScreenshotPolicy {
    pub fn captures(self, passed: bool) -> bool {
        match self {
            ScreenshotPolicy::Off => false,
            ScreenshotPolicy::On => true,
            ScreenshotPolicy::OnlyOnFailure => !passed,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VideoPolicy {
    Off,
    On,
    RetainOnFailure,
}

impl VideoPolicy {
    pub fn records(self) -> bool {
        self != VideoPolicy::Off
    }

    pub fn discards(self, passed: bool) -> bool {
        self == VideoPolicy::RetainOnFailure && passed
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserType {
    Chromium,
    Firefox,
    Webkit,
}

impl Display for BrowserType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BrowserType::Chromium => "Chromium",
                BrowserType::Firefox => "Firefox",
                BrowserType::Webkit => "Webkit",
            }
        )
    }
}

impl FromStr for BrowserType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" => Ok(BrowserType::Chromium),
            "firefox" => Ok(BrowserType::Firefox),
            "webkit" => Ok(BrowserType::Webkit),
            other => bail!("unknown browser {:?}", other),
        }
    }
}

impl SuiteConfig {
    /// Reads `$DEMOAUT_CONFIG`, or `demoaut.toml` next to this crate's manifest,
    /// then applies the `DEMOAUT_*` environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("demoaut.toml"));
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;

        let mut config = Self::from_toml_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply_env_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = var("DEMOAUT_BASE_URL") {
            self.base_url = Url::parse(&value).context("DEMOAUT_BASE_URL")?;
        }
        if let Some(value) = var("DEMOAUT_HEADLESS") {
            self.headless = parse_flag(&value).context("DEMOAUT_HEADLESS")?;
        }
        if let Some(value) = var("DEMOAUT_RETRIES") {
            self.retries = value.trim().parse().context("DEMOAUT_RETRIES")?;
        }
        if let Some(value) = var("DEMOAUT_BROWSERS") {
            self.browsers = value
                .split(',')
                .filter(|name| !name.trim().is_empty())
                .map(BrowserType::from_str)
                .collect::<Result<_>>()
                .context("DEMOAUT_BROWSERS")?;
        }
        if let Some(value) = var("DEMOAUT_FIXTURE_SITE") {
            self.fixture.enabled = parse_flag(&value).context("DEMOAUT_FIXTURE_SITE")?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.browsers.is_empty() {
            bail!("no browser configured");
        }
        if self.workers == 0 {
            bail!("workers must be at least 1");
        }
        if self.base_url.cannot_be_a_base() {
            bail!("base_url {} cannot be used as a base", self.base_url);
        }
        Ok(())
    }

    /// Resolves a site path against `base_url`.
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("joining {:?} onto {}", path, self.base_url))
    }

    pub fn test_timeout(&self) -> Duration {
        Duration::from_millis(self.test_timeout_ms)
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms.into())
    }

    pub fn fixture_startup_timeout(&self) -> Duration {
        Duration::from_millis(self.fixture.startup_timeout_ms)
    }

    /// Directory collecting the screenshot and video of one attempt.
    pub fn artifact_dir(
        &self,
        test_name: &str,
        browser_type: BrowserType,
        attempt: u32,
    ) -> PathBuf {
        let test_name = test_name.rsplit("::").next().unwrap_or(test_name);
        self.artifacts_dir.join(format!(
            "{}-{}-attempt{}",
            test_name,
            browser_type.to_string().to_lowercase(),
            attempt
        ))
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SHIPPED: &str = include_str!("../demoaut.toml");

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn shipped_config_parses() {
        let config = SuiteConfig::from_toml_str(SHIPPED).unwrap();
        config.validate().unwrap();

        assert_eq!(config.test_timeout(), Duration::from_secs(30));
        assert_eq!(config.action_timeout(), Duration::from_secs(10));
        assert_eq!(config.retries, 2);
        assert_eq!(config.viewport, ViewportSize { width: 1280, height: 720 });
        assert_eq!(config.screenshot, ScreenshotPolicy::On);
        assert_eq!(config.video, VideoPolicy::RetainOnFailure);
        assert_eq!(config.price_parsing, PriceParsing::Lenient);
        assert_eq!(config.reservation, ReservationFormData::sample());
    }

    #[test]
    fn price_parsing_names_are_kebab_case() {
        let strict = SHIPPED.replace(r#"price_parsing = "lenient""#, r#"price_parsing = "strict""#);
        let config = SuiteConfig::from_toml_str(&strict).unwrap();
        assert_eq!(config.price_parsing, PriceParsing::Strict);

        let unknown = SHIPPED.replace(r#"price_parsing = "lenient""#, r#"price_parsing = "loose""#);
        let err = SuiteConfig::from_toml_str(&unknown).unwrap_err();
        assert!(format!("{:#}", err).contains("loose"), "{:#}", err);
    }

    #[test]
    fn reservation_table_rejects_unknown_fields() {
        let text = SHIPPED.replace("[reservation]\n", "[reservation]\ndriver = \"Ana\"\n");
        let err = SuiteConfig::from_toml_str(&text).unwrap_err();
        assert!(format!("{:#}", err).contains("driver"), "{:#}", err);
    }

    #[test]
    fn missing_field_is_rejected() {
        let text = SHIPPED.replace("retries = 2\n", "");
        let err = SuiteConfig::from_toml_str(&text).unwrap_err();
        assert!(format!("{:#}", err).contains("retries"), "{:#}", err);
    }

    #[test]
    fn env_overrides_replace_loaded_values() {
        let mut config = SuiteConfig::from_toml_str(SHIPPED).unwrap();
        config
            .apply_env_overrides(overrides(&[
                ("DEMOAUT_BASE_URL", "https://ww1.demoaut.com"),
                ("DEMOAUT_HEADLESS", "false"),
                ("DEMOAUT_RETRIES", "0"),
                ("DEMOAUT_BROWSERS", "firefox, webkit"),
                ("DEMOAUT_FIXTURE_SITE", "0"),
            ]))
            .unwrap();

        assert_eq!(config.base_url.as_str(), "https://ww1.demoaut.com/");
        assert!(!config.headless);
        assert_eq!(config.retries, 0);
        assert_eq!(config.browsers, [BrowserType::Firefox, BrowserType::Webkit]);
        assert!(!config.fixture.enabled);
    }

    #[test]
    fn invalid_override_names_the_variable() {
        let mut config = SuiteConfig::from_toml_str(SHIPPED).unwrap();
        let err = config
            .apply_env_overrides(overrides(&[("DEMOAUT_BROWSERS", "chromium,opera")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "DEMOAUT_BROWSERS");
        assert!(format!("{:#}", err).contains("opera"));
    }

    #[test]
    fn urls_resolve_against_base() {
        let mut config = SuiteConfig::from_toml_str(SHIPPED).unwrap();
        config.base_url = Url::parse("https://ww1.demoaut.com/ignored/").unwrap();
        assert_eq!(
            config.url("/caf/").unwrap().as_str(),
            "https://ww1.demoaut.com/caf/"
        );
    }

    #[test]
    fn empty_browser_list_fails_validation() {
        let mut config = SuiteConfig::from_toml_str(SHIPPED).unwrap();
        config.browsers.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn artifact_policies() {
        assert!(ScreenshotPolicy::On.captures(true));
        assert!(!ScreenshotPolicy::OnlyOnFailure.captures(true));
        assert!(ScreenshotPolicy::OnlyOnFailure.captures(false));
        assert!(!VideoPolicy::Off.records());
        assert!(VideoPolicy::RetainOnFailure.discards(true));
        assert!(!VideoPolicy::RetainOnFailure.discards(false));
        assert!(!VideoPolicy::On.discards(true));
    }

    #[test]
    fn artifact_dir_uses_short_test_name() {
        let config = SuiteConfig::from_toml_str(SHIPPED).unwrap();
        let dir = config.artifact_dir("demoaut::search_available_cars", BrowserType::Chromium, 1);
        assert!(dir.ends_with("search_available_cars-chromium-attempt1"));
    }
}
