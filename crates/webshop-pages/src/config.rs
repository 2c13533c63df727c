// Suite configuration
//
// Everything a run needs from its environment is read once, up front.
// A missing password is a startup error rather than a value filled into forms.

use crate::error::{Error, Result};
use playwright_rs::LaunchOptions;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Public Demo Web Shop instance the suite targets by default
pub const DEMO_BASE_URL: &str = "https://demowebshop.tricentis.com";

/// Shared password for every generated account (required)
pub const PASSWORD_VAR: &str = "PASSWORD";
/// Overrides [`DEMO_BASE_URL`]
pub const BASE_URL_VAR: &str = "WEBSHOP_BASE_URL";
/// `chromium` (default), `firefox` or `webkit`
pub const BROWSER_VAR: &str = "BROWSER";
/// `false`/`0` shows the browser window
pub const HEADLESS_VAR: &str = "HEADLESS";
/// Optional path of the credential handoff file
pub const CREDENTIALS_FILE_VAR: &str = "WEBSHOP_CREDENTIALS_FILE";

/// Browser engine to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "chromium" | "chrome" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            _ => Err(Error::InvalidEnv {
                name: BROWSER_VAR,
                value: s.to_string(),
                reason: "expected chromium, firefox or webkit".to_string(),
            }),
        }
    }
}

/// Run configuration: target site, account password and browser choice.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the storefront; every page path is joined onto it
    pub base_url: Url,
    /// Password used for every account the suite registers
    pub password: String,
    pub browser: BrowserKind,
    pub headless: bool,
    /// When set, the account fixture reads and writes this file
    pub credentials_file: Option<PathBuf>,
}

impl Config {
    /// Creates a configuration for an explicit target.
    ///
    /// Used for the storefront twin, where the base URL is only known once
    /// the server is bound.
    pub fn new(base_url: &str, password: impl Into<String>) -> Result<Self> {
        let password = password.into();
        if password.is_empty() {
            return Err(Error::MissingEnv(PASSWORD_VAR));
        }
        Ok(Self {
            base_url: Url::parse(base_url)?,
            password,
            browser: BrowserKind::default(),
            headless: true,
            credentials_file: None,
        })
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingEnv`] when `PASSWORD` is unset or empty
    /// - [`Error::InvalidUrl`] / [`Error::InvalidEnv`] for unusable values
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, one variable at a time.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let password = lookup(PASSWORD_VAR)
            .filter(|p| !p.is_empty())
            .ok_or(Error::MissingEnv(PASSWORD_VAR))?;

        let base_url = lookup(BASE_URL_VAR)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEMO_BASE_URL.to_string());

        let mut config = Self::new(base_url.trim(), password)?;

        if let Some(browser) = lookup(BROWSER_VAR) {
            config.browser = browser.parse()?;
        }
        if let Some(headless) = lookup(HEADLESS_VAR) {
            config.headless = parse_flag(HEADLESS_VAR, &headless)?;
        }
        config.credentials_file = lookup(CREDENTIALS_FILE_VAR)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    pub fn with_browser(mut self, browser: BrowserKind) -> Self {
        self.browser = browser;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    /// Launch options derived from this configuration
    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions::new().headless(self.headless)
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidEnv {
            name,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
