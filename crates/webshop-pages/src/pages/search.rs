// Search - header search box and the /search results page
//
// Sorting, view mode and page size are <select> elements that navigate from
// script when changed, so each of those actions waits for the URL to move.

use super::base::{BasePage, LoadState, PageObject, has_text, text_contents};
use crate::error::{Result, ensure};
use crate::parse::parse_price;
use playwright_rs::{Locator, SelectOption, expect};
use rust_decimal::Decimal;
use std::ops::Deref;
use tracing::debug;

const SEARCH_INPUT: &str = "#small-searchterms";
const SEARCH_BUTTON: &str = ".search-box-button";
const VIEW_MODE_SELECT: &str = "#products-viewmode";
const SORT_SELECT: &str = "#products-orderby";
const PAGE_SIZE_SELECT: &str = "#products-pagesize";
const PRODUCT_GRID: &str = ".product-grid";
const PRODUCT_ITEM: &str = ".product-item";
const PRODUCT_TITLE: &str = ".product-title a";
const PRODUCT_PRICE: &str = ".price.actual-price";
const NO_RESULT: &str = ".no-result, .search-results strong.result";

/// Sort orders offered by the results page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Position,
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    CreatedOn,
}

impl SortBy {
    /// Visible option label
    pub fn label(&self) -> &'static str {
        match self {
            SortBy::Position => "Position",
            SortBy::NameAsc => "Name: A to Z",
            SortBy::NameDesc => "Name: Z to A",
            SortBy::PriceAsc => "Price: Low to High",
            SortBy::PriceDesc => "Price: High to Low",
            SortBy::CreatedOn => "Created on",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    List,
}

impl ViewMode {
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Grid => "Grid",
            ViewMode::List => "List",
        }
    }
}

/// Products per page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    Four,
    Eight,
    Twelve,
}

impl PageSize {
    pub fn label(&self) -> &'static str {
        match self {
            PageSize::Four => "4",
            PageSize::Eight => "8",
            PageSize::Twelve => "12",
        }
    }

    pub fn limit(&self) -> usize {
        match self {
            PageSize::Four => 4,
            PageSize::Eight => 8,
            PageSize::Twelve => 12,
        }
    }
}

/// Non-decreasing order
pub fn is_sorted_ascending(prices: &[Decimal]) -> bool {
    prices.windows(2).all(|w| w[0] <= w[1])
}

/// Non-increasing order
pub fn is_sorted_descending(prices: &[Decimal]) -> bool {
    prices.windows(2).all(|w| w[0] >= w[1])
}

/// Case-insensitive lexicographic order of titles.
pub fn is_sorted_by_name(titles: &[String], ascending: bool) -> bool {
    titles.windows(2).all(|w| {
        let (a, b) = (w[0].to_lowercase(), w[1].to_lowercase());
        if ascending { a <= b } else { a >= b }
    })
}

#[derive(Clone)]
pub struct SearchPage {
    base: BasePage,
}

impl PageObject for SearchPage {
    fn from_base(base: BasePage) -> Self {
        Self { base }
    }

    fn base(&self) -> &BasePage {
        &self.base
    }
}

impl Deref for SearchPage {
    type Target = BasePage;

    fn deref(&self) -> &BasePage {
        &self.base
    }
}

impl SearchPage {
    pub fn new(page: &playwright_rs::Page, base_url: &url::Url) -> Self {
        Self::from_base(BasePage::new(page, base_url))
    }

    pub async fn search_input(&self) -> Locator {
        self.locator(SEARCH_INPUT).await
    }

    pub async fn search_button(&self) -> Locator {
        self.locator(SEARCH_BUTTON).await
    }

    pub async fn view_mode_select(&self) -> Locator {
        self.locator(VIEW_MODE_SELECT).await
    }

    pub async fn sort_select(&self) -> Locator {
        self.locator(SORT_SELECT).await
    }

    pub async fn page_size_select(&self) -> Locator {
        self.locator(PAGE_SIZE_SELECT).await
    }

    pub async fn product_grid(&self) -> Locator {
        self.locator(PRODUCT_GRID).await
    }

    pub async fn product_items(&self) -> Locator {
        self.locator(PRODUCT_ITEM).await
    }

    pub async fn product_title_links(&self) -> Locator {
        self.locator(PRODUCT_TITLE).await
    }

    pub async fn product_price_labels(&self) -> Locator {
        self.locator(PRODUCT_PRICE).await
    }

    pub async fn no_results_message(&self) -> Locator {
        self.locator(NO_RESULT).await.first()
    }

    pub async fn navigate_to_home_page(&self) -> Result<()> {
        self.navigate("/").await
    }

    /// Types `term` into the header search box and submits it.
    pub async fn search_for_product(&self, term: &str) -> Result<()> {
        debug!(term, "search");
        let input = self.search_input().await;
        input.click(None).await?;
        input.clear(None).await?;
        input.fill(term, None).await?;
        let button = self.search_button().await;
        self.click_and_wait_for_navigation(&button).await?;
        self.expect_url_contains("/search").await
    }

    pub async fn verify_on_search_results_page(&self) -> Result<()> {
        self.expect_url_matches(r".*/search").await
    }

    pub async fn sort_by(&self, order: SortBy) -> Result<()> {
        debug!(label = order.label(), "sort");
        self.choose(&self.sort_select().await, order.label()).await
    }

    pub async fn change_view_mode(&self, mode: ViewMode) -> Result<()> {
        debug!(label = mode.label(), "view mode");
        self.choose(&self.view_mode_select().await, mode.label())
            .await
    }

    pub async fn set_page_size(&self, size: PageSize) -> Result<()> {
        debug!(label = size.label(), "page size");
        self.choose(&self.page_size_select().await, size.label())
            .await
    }

    /// Picks an option by label and follows the navigation it triggers.
    ///
    /// Re-selecting the current option fires no change event, so the
    /// navigation wait is skipped then.
    async fn choose(&self, select: &Locator, label: &str) -> Result<()> {
        let previous_url = self.current_url();
        let previous_value = select.input_value(None).await?;
        let selected = select
            .select_option(SelectOption::Label(label.to_string()), None)
            .await?;
        if selected.iter().any(|value| *value != previous_value) {
            self.wait_for_url_change(&previous_url).await?;
        }
        Ok(())
    }

    pub async fn verify_search_results_displayed(&self) -> Result<()> {
        expect(self.product_items().await.first())
            .to_be_visible()
            .await?;
        Ok(())
    }

    /// Zero products and the no-results indicator showing.
    pub async fn verify_no_results_displayed(&self) -> Result<()> {
        let count = self.product_count().await?;
        ensure(count == 0, "search result count", 0, count)?;
        expect(self.no_results_message().await)
            .to_be_visible()
            .await?;
        Ok(())
    }

    pub async fn product_count(&self) -> Result<usize> {
        Ok(self.product_items().await.count().await?)
    }

    pub async fn product_titles(&self) -> Result<Vec<String>> {
        self.wait_for_results().await?;
        text_contents(&self.product_title_links().await).await
    }

    pub async fn product_prices(&self) -> Result<Vec<Decimal>> {
        self.wait_for_results().await?;
        let texts = text_contents(&self.product_price_labels().await).await?;
        Ok(texts.iter().map(|text| parse_price(text)).collect())
    }

    async fn wait_for_results(&self) -> Result<()> {
        self.wait_for_load_state(LoadState::DomContentLoaded).await?;
        expect(self.product_items().await.first())
            .to_be_visible()
            .await?;
        Ok(())
    }

    /// Every title contains `keyword`, ignoring case.
    pub async fn verify_products_contain_keyword(&self, keyword: &str) -> Result<()> {
        let keyword = keyword.to_lowercase();
        for title in self.product_titles().await? {
            ensure(
                title.to_lowercase().contains(&keyword),
                "search result title",
                format!("containing '{keyword}'"),
                format!("'{title}'"),
            )?;
        }
        Ok(())
    }

    pub async fn verify_products_sorted_by_price_ascending(&self) -> Result<()> {
        let prices = self.product_prices().await?;
        ensure(
            is_sorted_ascending(&prices),
            "result prices",
            "ascending",
            format!("{prices:?}"),
        )
    }

    pub async fn verify_products_sorted_by_price_descending(&self) -> Result<()> {
        let prices = self.product_prices().await?;
        ensure(
            is_sorted_descending(&prices),
            "result prices",
            "descending",
            format!("{prices:?}"),
        )
    }

    pub async fn verify_products_sorted_by_name_ascending(&self) -> Result<()> {
        let titles = self.product_titles().await?;
        ensure(
            is_sorted_by_name(&titles, true),
            "result titles",
            "A to Z",
            format!("{titles:?}"),
        )
    }

    pub async fn verify_products_sorted_by_name_descending(&self) -> Result<()> {
        let titles = self.product_titles().await?;
        ensure(
            is_sorted_by_name(&titles, false),
            "result titles",
            "Z to A",
            format!("{titles:?}"),
        )
    }

    pub async fn verify_page_size_limit(&self, limit: usize) -> Result<()> {
        let count = self.product_count().await?;
        ensure(
            count <= limit,
            "results on page",
            format!("at most {limit}"),
            count,
        )
    }

    /// Every listed price lies in `min..=max`.
    pub async fn verify_price_in_range(&self, min: Decimal, max: Decimal) -> Result<()> {
        for price in self.product_prices().await? {
            ensure(
                price >= min && price <= max,
                "result price",
                format!("between {min} and {max}"),
                price,
            )?;
        }
        Ok(())
    }

    /// Result card whose text contains `title`
    pub async fn product_by_title(&self, title: &str) -> Locator {
        self.locator(&has_text(PRODUCT_ITEM, title)).await
    }

    pub async fn click_product(&self, title: &str) -> Result<()> {
        debug!(title, "open result");
        let link = self
            .product_by_title(title)
            .await
            .first()
            .locator(PRODUCT_TITLE);
        self.click_and_wait_for_navigation(&link).await
    }
}
