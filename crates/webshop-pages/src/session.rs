// Browser session - one driver connection, one browser, one context, one page
//
// Each test owns a Session. The fresh browser context gives it its own
// cookies, so guest carts and logins never leak between tests.

use crate::config::{BrowserKind, Config};
use crate::error::Result;
use crate::pages::base::{BasePage, PageObject};
use playwright_rs::{Browser, BrowserContext, Page, Playwright};
use tracing::{debug, info};

pub struct Session {
    playwright: Playwright,
    browser: Browser,
    context: BrowserContext,
    page: Page,
    config: Config,
}

impl Session {
    /// Launches the configured browser and opens a blank page in a new context.
    pub async fn start(config: &Config) -> Result<Self> {
        let playwright = Playwright::launch().await?;
        let browser_type = match config.browser {
            BrowserKind::Chromium => playwright.chromium(),
            BrowserKind::Firefox => playwright.firefox(),
            BrowserKind::Webkit => playwright.webkit(),
        };
        let browser = browser_type
            .launch_with_options(config.launch_options())
            .await?;
        let context = browser.new_context().await?;
        let page = context.new_page().await?;

        info!(
            browser = config.browser.as_str(),
            headless = config.headless,
            base_url = %config.base_url,
            "session started"
        );

        Ok(Self {
            playwright,
            browser,
            context,
            page,
            config: config.clone(),
        })
    }

    /// A page object of type `P` bound to this session's page.
    pub fn open<P: PageObject>(&self) -> P {
        P::from_base(BasePage::new(&self.page, &self.config.base_url))
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Closes the context and browser, then stops the driver.
    pub async fn close(self) -> Result<()> {
        debug!("closing session");
        self.context.close().await?;
        self.browser.close().await?;
        self.playwright.shutdown().await?;
        Ok(())
    }
}
