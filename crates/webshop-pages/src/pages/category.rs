// Category browsing - top menu, sub-categories and product grids

use super::base::{BasePage, LoadState, PageObject, has_text, nth, text_contents};
use crate::error::Result;
use playwright_rs::{Locator, expect};
use std::ops::Deref;
use tracing::debug;

const TOP_MENU_ITEM: &str = ".top-menu a";
const SUB_CATEGORY_LINK: &str = ".sub-category-item a";
const PAGE_TITLE: &str = ".page-title h1";
const PRODUCT_ITEM: &str = ".product-item";
const PRODUCT_TITLE: &str = ".product-title a";
const FEATURED_PRODUCT: &str = ".product-grid .product-item";
const HOMEPAGE_PRODUCT: &str = ".home-page-product-grid .product-item";

#[derive(Clone)]
pub struct CategoryPage {
    base: BasePage,
}

impl PageObject for CategoryPage {
    fn from_base(base: BasePage) -> Self {
        Self { base }
    }

    fn base(&self) -> &BasePage {
        &self.base
    }
}

impl Deref for CategoryPage {
    type Target = BasePage;

    fn deref(&self) -> &BasePage {
        &self.base
    }
}

impl CategoryPage {
    pub fn new(page: &playwright_rs::Page, base_url: &url::Url) -> Self {
        Self::from_base(BasePage::new(page, base_url))
    }

    pub async fn top_menu_items(&self) -> Locator {
        self.locator(TOP_MENU_ITEM).await
    }

    pub async fn sub_category_links(&self) -> Locator {
        self.locator(SUB_CATEGORY_LINK).await
    }

    pub async fn page_title(&self) -> Locator {
        self.locator(PAGE_TITLE).await
    }

    pub async fn product_items(&self) -> Locator {
        self.locator(PRODUCT_ITEM).await
    }

    pub async fn product_title_links(&self) -> Locator {
        self.locator(PRODUCT_TITLE).await
    }

    pub async fn featured_products(&self) -> Locator {
        self.locator(FEATURED_PRODUCT).await
    }

    pub async fn homepage_products(&self) -> Locator {
        self.locator(HOMEPAGE_PRODUCT).await
    }

    /// Starts from the home page and opens the top-menu entry named `name`.
    pub async fn navigate_to_category(&self, name: &str) -> Result<()> {
        self.navigate("/").await?;
        self.click_top_menu_category(name).await
    }

    pub async fn navigate_to_sub_category(&self, name: &str) -> Result<()> {
        debug!(name, "open sub-category");
        let link = self.locator(&has_text(SUB_CATEGORY_LINK, name)).await.first();
        self.click_and_wait_for_navigation(&link).await
    }

    pub async fn click_top_menu_category(&self, name: &str) -> Result<()> {
        debug!(name, "open category");
        let link = self.locator(&has_text(TOP_MENU_ITEM, name)).await.first();
        self.click_and_wait_for_navigation(&link).await
    }

    pub async fn click_product_by_title(&self, title: &str) -> Result<()> {
        let link = self.locator(&has_text(PRODUCT_TITLE, title)).await.first();
        self.click_and_wait_for_navigation(&link).await
    }

    pub async fn click_product_by_index(&self, index: usize) -> Result<()> {
        let link = nth(&self.product_title_links().await, index)?;
        self.click_and_wait_for_navigation(&link).await
    }

    pub async fn click_featured_product(&self, index: usize) -> Result<()> {
        let link = nth(&self.featured_products().await, index)?.locator(PRODUCT_TITLE);
        self.click_and_wait_for_navigation(&link).await
    }

    pub async fn click_homepage_product(&self, index: usize) -> Result<()> {
        let link = nth(&self.homepage_products().await, index)?.locator(PRODUCT_TITLE);
        self.click_and_wait_for_navigation(&link).await
    }

    pub async fn verify_category_page_loaded(&self, name: &str) -> Result<()> {
        expect(self.page_title().await).to_contain_text(name).await?;
        Ok(())
    }

    /// Asserts the first product is visible, if the page lists any.
    pub async fn verify_products_displayed(&self) -> Result<()> {
        let items = self.product_items().await;
        if items.count().await? > 0 {
            expect(items.first()).to_be_visible().await?;
        }
        Ok(())
    }

    pub async fn product_count(&self) -> Result<usize> {
        Ok(self.product_items().await.count().await?)
    }

    /// Rendered product titles; waits for the first item to show.
    pub async fn product_titles(&self) -> Result<Vec<String>> {
        self.wait_for_load_state(LoadState::DomContentLoaded).await?;
        expect(self.product_items().await.first())
            .to_be_visible()
            .await?;
        text_contents(&self.product_title_links().await).await
    }

    pub async fn featured_products_count(&self) -> Result<usize> {
        Ok(self.featured_products().await.count().await?)
    }

    pub async fn homepage_products_count(&self) -> Result<usize> {
        Ok(self.homepage_products().await.count().await?)
    }

    pub async fn verify_sub_categories_displayed(&self) -> Result<()> {
        expect(self.sub_category_links().await.first())
            .to_be_visible()
            .await?;
        Ok(())
    }

    pub async fn sub_category_names(&self) -> Result<Vec<String>> {
        text_contents(&self.sub_category_links().await).await
    }
}
