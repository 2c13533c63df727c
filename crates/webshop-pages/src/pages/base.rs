// Base page - navigation, load settling and soft presence
//
// Every page object wraps a BasePage: a page handle plus the storefront's
// base URL. It holds no other state; locators are rebuilt on each access so
// they survive the full and partial reloads the storefront performs on most
// interactions.

use crate::error::{Error, Result};
use playwright_rs::{GotoOptions, Locator, Page, WaitUntil, expect};
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Budget for navigations and load-state waits (Playwright's default)
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Budget for assertions on asynchronously rendered elements
pub const ASSERTION_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Window property set on a document that is about to be replaced
const STALE_MARKER: &str = "__webshopStaleDocument";

/// Document readiness to wait for after a navigating gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// `document.readyState` is `interactive` or `complete`
    DomContentLoaded,
    /// `document.readyState` is `complete`
    Load,
}

impl LoadState {
    fn is_reached(&self, ready_state: &str) -> bool {
        match self {
            LoadState::DomContentLoaded => matches!(ready_state, "interactive" | "complete"),
            LoadState::Load => ready_state == "complete",
        }
    }
}

/// Common behaviour shared by all page objects.
///
/// Page objects are built from a `BasePage` so a [`Session`](crate::Session)
/// can hand out any of them for its page.
pub trait PageObject: Sized {
    fn from_base(base: BasePage) -> Self;

    fn base(&self) -> &BasePage;
}

/// Page handle plus base address.
#[derive(Clone)]
pub struct BasePage {
    page: Page,
    base_url: Url,
}

impl BasePage {
    pub fn new(page: &Page, base_url: &Url) -> Self {
        Self {
            page: page.clone(),
            base_url: base_url.clone(),
        }
    }

    /// The underlying browser page
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a site-relative path (`/books`) against the base URL.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Creates a fresh locator; nothing is resolved until it is used.
    pub async fn locator(&self, selector: &str) -> Locator {
        self.page.locator(selector).await
    }

    /// Navigates to `path` relative to the base URL and waits for `load`.
    pub async fn navigate(&self, path: &str) -> Result<()> {
        let url = self.url_for(path)?;
        debug!(%url, "navigate");
        self.page
            .goto(
                url.as_str(),
                Some(
                    GotoOptions::new()
                        .wait_until(WaitUntil::Load)
                        .timeout(NAVIGATION_TIMEOUT),
                ),
            )
            .await?;
        Ok(())
    }

    pub async fn title(&self) -> Result<String> {
        Ok(self.page.title().await?)
    }

    /// Last committed URL of the page
    pub fn current_url(&self) -> String {
        self.page.url()
    }

    /// Reloads the page and waits for `load`.
    pub async fn reload(&self) -> Result<()> {
        debug!(url = %self.current_url(), "reload");
        self.page
            .reload(Some(
                GotoOptions::new()
                    .wait_until(WaitUntil::Load)
                    .timeout(NAVIGATION_TIMEOUT),
            ))
            .await?;
        Ok(())
    }

    /// Blocks until the current document reaches `state`.
    ///
    /// Evaluation can fail while a navigation swaps the document out; such
    /// failures are polled through until the budget runs out, at which point
    /// the last driver error is returned.
    pub async fn wait_for_load_state(&self, state: LoadState) -> Result<()> {
        let start = Instant::now();
        loop {
            let outcome = self.page.evaluate_value("document.readyState").await;
            match outcome {
                Ok(ready_state) if state.is_reached(&ready_state) => return Ok(()),
                Ok(ready_state) if start.elapsed() >= NAVIGATION_TIMEOUT => {
                    return Err(Error::Timeout {
                        what: format!("load state {state:?} (document is '{ready_state}')"),
                        after: NAVIGATION_TIMEOUT,
                    });
                }
                Err(e) if start.elapsed() >= NAVIGATION_TIMEOUT => return Err(e.into()),
                _ => tokio::time::sleep(POLL_INTERVAL).await,
            }
        }
    }

    /// Blocks until the page URL differs from `previous`, then until `load`.
    ///
    /// Used for controls that navigate from script (sorting, paging), where
    /// the gesture itself returns before the new document exists.
    pub async fn wait_for_url_change(&self, previous: &str) -> Result<()> {
        let start = Instant::now();
        while self.page.url() == previous {
            if start.elapsed() >= NAVIGATION_TIMEOUT {
                return Err(Error::Timeout {
                    what: format!("navigation away from {previous}"),
                    after: NAVIGATION_TIMEOUT,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        self.wait_for_load_state(LoadState::Load).await
    }

    /// Clicks `locator` and blocks until a new document replaces the current one.
    ///
    /// For form posts that land back on the same URL (cart updates, coupon
    /// codes) the URL gives nothing to wait on, so the outgoing document is
    /// tagged first and the wait ends once the tag is gone.
    pub async fn click_and_wait_for_navigation(&self, locator: &Locator) -> Result<()> {
        self.page
            .evaluate_expression(&format!("window.{STALE_MARKER} = true"))
            .await?;
        locator.click(None).await?;

        let probe = format!("typeof window.{STALE_MARKER}");
        let start = Instant::now();
        loop {
            match self.page.evaluate_value(&probe).await {
                Ok(kind) if kind == "undefined" => break,
                Err(e) if start.elapsed() >= NAVIGATION_TIMEOUT => return Err(e.into()),
                _ if start.elapsed() >= NAVIGATION_TIMEOUT => {
                    return Err(Error::Timeout {
                        what: format!("navigation after clicking {}", locator.selector()),
                        after: NAVIGATION_TIMEOUT,
                    });
                }
                _ => tokio::time::sleep(POLL_INTERVAL).await,
            }
        }
        self.wait_for_load_state(LoadState::DomContentLoaded).await
    }

    /// Clicks `locator` and blocks until an element matching `selector` shows.
    ///
    /// `reset` runs before the click and must hide every current match, so
    /// the wait only ends on one produced by this click. Suits actions the
    /// storefront answers either in place from script or with a new document.
    pub async fn click_and_wait_for_visible(
        &self,
        locator: &Locator,
        reset: &str,
        selector: &str,
    ) -> Result<()> {
        self.page.evaluate_expression(reset).await?;
        locator.click(None).await?;
        let shown = self.locator(selector).await.first();
        expect(shown)
            .with_timeout(NAVIGATION_TIMEOUT)
            .to_be_visible()
            .await?;
        self.wait_for_load_state(LoadState::DomContentLoaded).await
    }

    /// Asserts that the current URL contains `fragment`, polling briefly.
    pub async fn expect_url_contains(&self, fragment: &str) -> Result<()> {
        self.poll_url(&format!("containing '{fragment}'"), |url| {
            url.contains(fragment)
        })
        .await
    }

    /// Asserts that the current URL does not contain `fragment`.
    pub async fn expect_url_not_contains(&self, fragment: &str) -> Result<()> {
        self.poll_url(&format!("not containing '{fragment}'"), |url| {
            !url.contains(fragment)
        })
        .await
    }

    /// Asserts that the current URL matches the regex `pattern`.
    pub async fn expect_url_matches(&self, pattern: &str) -> Result<()> {
        let re = regex::Regex::new(pattern)?;
        self.poll_url(&format!("matching /{pattern}/"), |url| re.is_match(url))
            .await
    }

    async fn poll_url<F>(&self, expected: &str, matches: F) -> Result<()>
    where
        F: Fn(&str) -> bool,
    {
        let start = Instant::now();
        loop {
            let url = self.page.url();
            if matches(&url) {
                return Ok(());
            }
            if start.elapsed() >= ASSERTION_TIMEOUT {
                return Err(Error::assertion("page URL", expected, url));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Asserts that the document title contains `text`.
    pub async fn expect_title_contains(&self, text: &str) -> Result<()> {
        let title = self.title().await?;
        crate::error::ensure(
            title.contains(text),
            "page title",
            format!("containing '{text}'"),
            format!("'{title}'"),
        )
    }

    /// Soft presence check.
    ///
    /// Returns `Ok(Some(locator))` when the element becomes visible within
    /// `timeout`, `Ok(None)` when it does not, and `Err` only when the query
    /// itself failed.
    pub async fn probe(&self, locator: Locator, timeout: Duration) -> Result<Option<Locator>> {
        match expect(locator.clone()).with_timeout(timeout).to_be_visible().await {
            Ok(()) => Ok(Some(locator)),
            Err(playwright_rs::Error::AssertionTimeout(_)) => {
                debug!(selector = locator.selector(), "probe: absent");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl PageObject for BasePage {
    fn from_base(base: BasePage) -> Self {
        base
    }

    fn base(&self) -> &BasePage {
        self
    }
}

/// Trimmed text of every element `locator` matches, in document order.
pub async fn text_contents(locator: &Locator) -> Result<Vec<String>> {
    let count = locator.count().await?;
    let mut texts = Vec::with_capacity(count);
    for index in 0..count {
        let text = nth(locator, index)?.text_content().await?;
        texts.push(crate::parse::clean_text(text));
    }
    Ok(texts)
}

/// The `index`-th element `locator` matches (zero-based).
pub fn nth(locator: &Locator, index: usize) -> Result<Locator> {
    Ok(locator.nth(nth_index(index)?))
}

fn nth_index(index: usize) -> Result<i32> {
    i32::try_from(index).map_err(|_| Error::IndexOutOfRange(index))
}

/// Narrows `selector` to elements whose text contains `text`.
pub fn has_text(selector: &str, text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{selector}:has-text(\"{escaped}\")")
}
