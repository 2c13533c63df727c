// Product details page - one product's information, add-to-cart and
// the cross-sell grids below it

use super::base::{ASSERTION_TIMEOUT, BasePage, PageObject, nth};
use crate::error::{Result, ensure};
use crate::parse::{clean_text, format_price, parse_price};
use playwright_rs::{Locator, expect};
use rust_decimal::Decimal;
use std::ops::Deref;
use std::time::Duration;
use tracing::debug;

const PRODUCT_NAME: &str = ".product-name h1";
const PRODUCT_IMAGE: &str = ".gallery .picture img, .picture img";
const SHORT_DESCRIPTION: &str = ".short-description";
const FULL_DESCRIPTION: &str = ".full-description";
const PRODUCT_PRICE: &str = r#".product-price span[itemprop="price"]"#;
const OLD_PRICE: &str = ".product-essential .old-product-price span";
const STOCK_STATUS: &str = ".stock .value";
const ADD_TO_CART: &str = r#".add-to-cart-button, input[value="Add to cart"]"#;
const QUANTITY_INPUT: &str = ".qty-input, input.qty";
const EMAIL_FRIEND: &str = ".email-a-friend-button";
const ADD_TO_COMPARE: &str = ".add-to-compare-list-button";
const REVIEW_LINKS: &str = ".product-review-links a";
const RATING: &str = ".product-review-box .rating";
const TAGS_BOX: &str = ".product-tags-box";
const TAG_ITEM: &str = ".product-tags-list li.tag";
const ALSO_PURCHASED: &str = ".also-purchased-products-grid";
const ALSO_PURCHASED_ITEM: &str = ".also-purchased-products-grid .product-item";
const RELATED: &str = ".related-products-grid";
const RELATED_ITEM: &str = ".related-products-grid .product-item";
const ITEM_TITLE: &str = ".product-title a";
const FREE_SHIPPING: &str = ".free-shipping";
const SUCCESS_BAR: &str = ".bar-notification.success";
const ERROR_BAR: &str = ".bar-notification.error";
const ANY_BAR: &str = ".bar-notification.success, .bar-notification.error";

/// Hides the notification bar and drops its outcome class
const RESET_BARS: &str = "document.querySelectorAll('.bar-notification').forEach(function (bar) { \
     bar.style.display = 'none'; bar.classList.remove('success', 'error'); })";

/// Budget for optional price and shipping badges
const SOFT_PROBE: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct ProductDetailsPage {
    base: BasePage,
}

impl PageObject for ProductDetailsPage {
    fn from_base(base: BasePage) -> Self {
        Self { base }
    }

    fn base(&self) -> &BasePage {
        &self.base
    }
}

impl Deref for ProductDetailsPage {
    type Target = BasePage;

    fn deref(&self) -> &BasePage {
        &self.base
    }
}

impl ProductDetailsPage {
    pub fn new(page: &playwright_rs::Page, base_url: &url::Url) -> Self {
        Self::from_base(BasePage::new(page, base_url))
    }

    pub async fn product_name_heading(&self) -> Locator {
        self.locator(PRODUCT_NAME).await
    }

    pub async fn product_image(&self) -> Locator {
        self.locator(PRODUCT_IMAGE).await.first()
    }

    pub async fn short_description(&self) -> Locator {
        self.locator(SHORT_DESCRIPTION).await
    }

    pub async fn full_description(&self) -> Locator {
        self.locator(FULL_DESCRIPTION).await
    }

    pub async fn price_label(&self) -> Locator {
        self.locator(PRODUCT_PRICE).await.first()
    }

    pub async fn old_price_label(&self) -> Locator {
        self.locator(OLD_PRICE).await.first()
    }

    pub async fn stock_status(&self) -> Locator {
        self.locator(STOCK_STATUS).await
    }

    pub async fn add_to_cart_button(&self) -> Locator {
        self.locator(ADD_TO_CART).await.first()
    }

    pub async fn quantity_input(&self) -> Locator {
        self.locator(QUANTITY_INPUT).await.first()
    }

    pub async fn email_friend_button(&self) -> Locator {
        self.locator(EMAIL_FRIEND).await
    }

    pub async fn add_to_compare_button(&self) -> Locator {
        self.locator(ADD_TO_COMPARE).await
    }

    pub async fn reviews_link(&self) -> Locator {
        self.locator(REVIEW_LINKS).await.first()
    }

    pub async fn add_review_link(&self) -> Locator {
        self.locator(REVIEW_LINKS).await.nth(1)
    }

    pub async fn rating(&self) -> Locator {
        self.locator(RATING).await
    }

    pub async fn tags_box(&self) -> Locator {
        self.locator(TAGS_BOX).await
    }

    pub async fn also_purchased_section(&self) -> Locator {
        self.locator(ALSO_PURCHASED).await
    }

    pub async fn related_products_section(&self) -> Locator {
        self.locator(RELATED).await
    }

    pub async fn free_shipping_badge(&self) -> Locator {
        self.locator(FREE_SHIPPING).await
    }

    pub async fn success_notification(&self) -> Locator {
        self.locator(SUCCESS_BAR).await
    }

    pub async fn error_notification(&self) -> Locator {
        self.locator(ERROR_BAR).await
    }

    /// Opens a product by its site-relative path, e.g. `/fiction`.
    pub async fn navigate_to_product(&self, path: &str) -> Result<()> {
        self.navigate(path).await
    }

    pub async fn verify_on_product_details_page(&self) -> Result<()> {
        expect(self.product_name_heading().await)
            .to_be_visible()
            .await?;
        expect(self.price_label().await).to_be_visible().await?;
        Ok(())
    }

    pub async fn verify_product_name(&self, name: &str) -> Result<()> {
        expect(self.product_name_heading().await)
            .to_contain_text(name)
            .await?;
        Ok(())
    }

    pub async fn verify_product_has_image(&self) -> Result<()> {
        expect(self.product_image().await).to_be_visible().await?;
        Ok(())
    }

    /// Passes when either the short or the full description is showing.
    pub async fn verify_product_has_description(&self) -> Result<()> {
        let short = self.short_description().await.is_visible().await?;
        let full = self.full_description().await.is_visible().await?;
        ensure(
            short || full,
            "product description",
            "short or full description visible",
            "neither visible",
        )
    }

    pub async fn verify_product_price(&self) -> Result<()> {
        expect(self.price_label().await).to_be_visible().await?;
        let price = self.product_price().await?;
        ensure(
            price > Decimal::ZERO,
            "product price",
            "greater than 0",
            format_price(price),
        )
    }

    pub async fn verify_stock_status(&self) -> Result<()> {
        expect(self.stock_status().await).to_be_visible().await?;
        Ok(())
    }

    pub async fn verify_product_reviews_displayed(&self) -> Result<()> {
        expect(self.reviews_link().await).to_be_visible().await?;
        Ok(())
    }

    pub async fn verify_also_purchased_section(&self) -> Result<()> {
        expect(self.also_purchased_section().await)
            .to_be_visible()
            .await?;
        Ok(())
    }

    pub async fn also_purchased_products_count(&self) -> Result<usize> {
        Ok(self.locator(ALSO_PURCHASED_ITEM).await.count().await?)
    }

    /// Checks the tag box only when the product has tags.
    pub async fn verify_product_tags(&self) -> Result<()> {
        let tags = self.tags_box().await.locator(TAG_ITEM);
        if tags.count().await? > 0 {
            expect(self.tags_box().await).to_be_visible().await?;
            expect(tags.first()).to_be_visible().await?;
        }
        Ok(())
    }

    pub async fn has_product_tags(&self) -> Result<bool> {
        let tags = self.tags_box().await.locator(TAG_ITEM);
        Ok(tags.count().await? > 0)
    }

    pub async fn click_add_to_cart(&self) -> Result<()> {
        self.add_to_cart_button().await.click(None).await?;
        Ok(())
    }

    pub async fn click_email_friend(&self) -> Result<()> {
        self.email_friend_button().await.click(None).await?;
        Ok(())
    }

    pub async fn click_add_to_compare(&self) -> Result<()> {
        self.add_to_compare_button().await.click(None).await?;
        Ok(())
    }

    pub async fn click_reviews(&self) -> Result<()> {
        self.reviews_link().await.click(None).await?;
        Ok(())
    }

    pub async fn set_quantity(&self, quantity: u32) -> Result<()> {
        self.quantity_input()
            .await
            .fill(&quantity.to_string(), None)
            .await?;
        Ok(())
    }

    pub async fn product_price(&self) -> Result<Decimal> {
        let text = self.price_label().await.text_content().await?;
        Ok(parse_price(&clean_text(text)))
    }

    pub async fn product_name(&self) -> Result<String> {
        let text = self.product_name_heading().await.text_content().await?;
        Ok(clean_text(text))
    }

    /// Soft check for a struck-through previous price.
    pub async fn has_old_price(&self) -> Result<bool> {
        Ok(self.old_price().await?.is_some())
    }

    /// The previous price, when one is shown.
    pub async fn old_price(&self) -> Result<Option<Decimal>> {
        let label = self.old_price_label().await;
        match self.probe(label, SOFT_PROBE).await? {
            Some(label) => Ok(Some(parse_price(&clean_text(label.text_content().await?)))),
            None => Ok(None),
        }
    }

    pub async fn click_also_purchased_product(&self, index: usize) -> Result<()> {
        let link = nth(&self.locator(ALSO_PURCHASED_ITEM).await, index)?.locator(ITEM_TITLE);
        self.click_and_wait_for_navigation(&link).await
    }

    pub async fn verify_related_products_section(&self) -> Result<()> {
        expect(self.related_products_section().await)
            .to_be_visible()
            .await?;
        Ok(())
    }

    pub async fn related_products_count(&self) -> Result<usize> {
        Ok(self.locator(RELATED_ITEM).await.count().await?)
    }

    pub async fn click_related_product(&self, index: usize) -> Result<()> {
        let link = nth(&self.locator(RELATED_ITEM).await, index)?.locator(ITEM_TITLE);
        self.click_and_wait_for_navigation(&link).await
    }

    pub async fn verify_free_shipping(&self) -> Result<()> {
        let badge = self.free_shipping_badge().await;
        expect(badge.clone()).to_be_visible().await?;
        expect(badge).to_contain_text("Free shipping").await?;
        Ok(())
    }

    pub async fn has_free_shipping(&self) -> Result<bool> {
        let badge = self.free_shipping_badge().await;
        Ok(self.probe(badge, SOFT_PROBE).await?.is_some())
    }

    /// Sets the quantity (only when above one), clicks Add to cart and waits
    /// for the outcome bar.
    ///
    /// The storefront answers in place or with a reloaded product page; any
    /// bar left from an earlier add is hidden first so it cannot end the wait.
    pub async fn add_to_cart(&self, quantity: u32) -> Result<()> {
        debug!(quantity, "add to cart");
        if quantity > 1 {
            self.set_quantity(quantity).await?;
        }
        let button = self.add_to_cart_button().await;
        self.click_and_wait_for_visible(&button, RESET_BARS, ANY_BAR)
            .await
    }

    pub async fn verify_add_to_cart_success(&self) -> Result<()> {
        expect(self.success_notification().await)
            .with_timeout(ASSERTION_TIMEOUT)
            .to_be_visible()
            .await?;
        Ok(())
    }

    pub async fn verify_add_to_cart_error(&self) -> Result<()> {
        expect(self.error_notification().await)
            .with_timeout(ASSERTION_TIMEOUT)
            .to_be_visible()
            .await?;
        Ok(())
    }

    pub async fn success_notification_text(&self) -> Result<String> {
        let text = self.success_notification().await.text_content().await?;
        Ok(clean_text(text))
    }

    /// Dismisses the success bar if its close control is showing.
    pub async fn close_success_notification(&self) -> Result<()> {
        let close = self.success_notification().await.locator(".close");
        if close.is_visible().await? {
            close.click(None).await?;
        }
        Ok(())
    }
}
