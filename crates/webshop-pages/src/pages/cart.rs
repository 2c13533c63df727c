// Shopping cart - /cart, the header cart link and the flyout mini-cart
//
// Rows are addressed by zero-based index in rendered order. Money is read
// as Decimal so line totals and sub-totals compare exactly.

use super::base::{ASSERTION_TIMEOUT, BasePage, LoadState, PageObject, has_text, nth, text_contents};
use crate::error::{Result, ensure};
use crate::parse::{clean_text, format_price, parse_counter, parse_price, parse_quantity};
use playwright_rs::{Locator, expect};
use rust_decimal::Decimal;
use std::ops::Deref;
use tracing::{debug, warn};

const CART_LINK: &str = ".header-links a.ico-cart";
const CART_QTY: &str = ".cart-qty";
const WISHLIST_LINK: &str = ".header-links a.ico-wishlist";
const WISHLIST_QTY: &str = ".wishlist-qty";
const CART_TABLE: &str = "table.cart";
const ITEM_ROW: &str = ".cart-item-row";
const REMOVE_CHECKBOX: &str = r#"input[name="removefromcart"]"#;
const PRODUCT_NAME: &str = "a.product-name";
const PRODUCT_PICTURE: &str = ".product-picture img";
const ATTRIBUTES: &str = ".attributes";
const UNIT_PRICE: &str = ".product-unit-price";
const QUANTITY_INPUT: &str = r#"input[name^="itemquantity"]"#;
const LINE_SUBTOTAL: &str = ".product-subtotal";
const EDIT_ITEM_LINK: &str = ".edit-item a";
const UPDATE_CART: &str = r#"input[name="updatecart"]"#;
const CONTINUE_SHOPPING: &str = r#"input[name="continueshopping"]"#;
const CHECKOUT: &str = r#"button[name="checkout"]"#;
const COUPON_INPUT: &str = r#"input[name="discountcouponcode"]"#;
const COUPON_APPLY: &str = r#"input[name="applydiscountcouponcode"]"#;
const COUPON_MESSAGE: &str = ".coupon-box .message";
const GIFT_CARD_INPUT: &str = r#"input[name="giftcardcouponcode"]"#;
const GIFT_CARD_APPLY: &str = r#"input[name="applygiftcardcouponcode"]"#;
const GIFT_CARD_MESSAGE: &str = ".giftcard-box .message";
const TOTALS_TABLE: &str = "table.cart-total";
const TOTALS_ROW: &str = ".cart-total tbody tr";
const TERMS_OF_SERVICE: &str = "#termsofservice";
const TERMS_WARNING: &str = "#terms-of-service-warning-box";
const SUCCESS_BAR: &str = ".bar-notification.success";
const ERROR_MESSAGE: &str = ".message-error";
const FLYOUT: &str = "#flyout-cart";
const FLYOUT_ACTIVE: &str = "#flyout-cart.active";
const FLYOUT_ITEMS: &str = "#flyout-cart .item";
const FLYOUT_TOTAL: &str = "#flyout-cart .totals strong";
const FLYOUT_GO_TO_CART: &str = "#flyout-cart input.cart-button";

/// Expected line total for a unit price and quantity.
pub fn expected_line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

#[derive(Clone)]
pub struct CartPage {
    base: BasePage,
}

impl PageObject for CartPage {
    fn from_base(base: BasePage) -> Self {
        Self { base }
    }

    fn base(&self) -> &BasePage {
        &self.base
    }
}

impl Deref for CartPage {
    type Target = BasePage;

    fn deref(&self) -> &BasePage {
        &self.base
    }
}

impl CartPage {
    pub fn new(page: &playwright_rs::Page, base_url: &url::Url) -> Self {
        Self::from_base(BasePage::new(page, base_url))
    }

    // Locators

    pub async fn cart_link(&self) -> Locator {
        self.locator(CART_LINK).await.first()
    }

    pub async fn cart_qty(&self) -> Locator {
        self.locator(CART_QTY).await.first()
    }

    pub async fn wishlist_link(&self) -> Locator {
        self.locator(WISHLIST_LINK).await
    }

    pub async fn wishlist_qty(&self) -> Locator {
        self.locator(WISHLIST_QTY).await
    }

    pub async fn cart_table(&self) -> Locator {
        self.locator(CART_TABLE).await
    }

    pub async fn item_rows(&self) -> Locator {
        self.locator(ITEM_ROW).await
    }

    pub async fn product_name_links(&self) -> Locator {
        self.locator(PRODUCT_NAME).await
    }

    pub async fn product_pictures(&self) -> Locator {
        self.locator(PRODUCT_PICTURE).await
    }

    pub async fn unit_prices(&self) -> Locator {
        self.locator(UNIT_PRICE).await
    }

    pub async fn product_subtotals(&self) -> Locator {
        self.locator(LINE_SUBTOTAL).await
    }

    pub async fn edit_item_links(&self) -> Locator {
        self.locator(EDIT_ITEM_LINK).await
    }

    pub async fn quantity_inputs(&self) -> Locator {
        self.locator(QUANTITY_INPUT).await
    }

    pub async fn update_cart_button(&self) -> Locator {
        self.locator(UPDATE_CART).await
    }

    pub async fn continue_shopping_button(&self) -> Locator {
        self.locator(CONTINUE_SHOPPING).await
    }

    pub async fn checkout_button(&self) -> Locator {
        self.locator(CHECKOUT).await
    }

    pub async fn coupon_input(&self) -> Locator {
        self.locator(COUPON_INPUT).await
    }

    pub async fn coupon_apply_button(&self) -> Locator {
        self.locator(COUPON_APPLY).await
    }

    pub async fn coupon_message(&self) -> Locator {
        self.locator(COUPON_MESSAGE).await
    }

    pub async fn gift_card_input(&self) -> Locator {
        self.locator(GIFT_CARD_INPUT).await
    }

    pub async fn gift_card_message(&self) -> Locator {
        self.locator(GIFT_CARD_MESSAGE).await
    }

    pub async fn totals_table(&self) -> Locator {
        self.locator(TOTALS_TABLE).await
    }

    pub async fn sub_total_cell(&self) -> Locator {
        self.locator(&format!("{} .product-price", has_text(TOTALS_ROW, "Sub-Total")))
            .await
    }

    pub async fn shipping_cell(&self) -> Locator {
        self.locator(&format!(
            "{} td.cart-total-right",
            has_text(TOTALS_ROW, "Shipping")
        ))
        .await
    }

    pub async fn tax_cell(&self) -> Locator {
        self.locator(&format!("{} .product-price", has_text(TOTALS_ROW, "Tax")))
            .await
    }

    /// Right-hand cell of the last totals row
    pub async fn order_total_cell(&self) -> Locator {
        self.locator(TOTALS_ROW)
            .await
            .last()
            .locator("td.cart-total-right")
    }

    pub async fn terms_of_service(&self) -> Locator {
        self.locator(TERMS_OF_SERVICE).await
    }

    pub async fn terms_warning(&self) -> Locator {
        self.locator(TERMS_WARNING).await
    }

    pub async fn success_message(&self) -> Locator {
        self.locator(SUCCESS_BAR).await
    }

    pub async fn error_message(&self) -> Locator {
        self.locator(ERROR_MESSAGE).await
    }

    pub async fn flyout_cart(&self) -> Locator {
        self.locator(FLYOUT).await
    }

    pub async fn flyout_go_to_cart(&self) -> Locator {
        self.locator(FLYOUT_GO_TO_CART).await
    }

    // Actions

    /// Follows the header cart link.
    pub async fn navigate_to_cart(&self) -> Result<()> {
        debug!("open cart");
        let link = self.cart_link().await;
        self.click_and_wait_for_navigation(&link).await?;
        self.expect_url_contains("/cart").await
    }

    /// Replaces the quantity in row `index`; takes effect on update.
    pub async fn update_product_quantity(&self, quantity: u32, index: usize) -> Result<()> {
        let input = nth(&self.quantity_inputs().await, index)?;
        input.clear(None).await?;
        input.fill(&quantity.to_string(), None).await?;
        Ok(())
    }

    pub async fn click_update_cart(&self) -> Result<()> {
        let button = self.update_cart_button().await;
        self.click_and_wait_for_navigation(&button).await
    }

    /// Ticks the remove box of row `index` and submits the cart form.
    pub async fn remove_product(&self, index: usize) -> Result<()> {
        debug!(index, "remove cart line");
        nth(&self.locator(REMOVE_CHECKBOX).await, index)?
            .check(None)
            .await?;
        self.click_update_cart().await
    }

    /// Removes lines one at a time until none are left.
    ///
    /// Expects to be on the cart page already.
    pub async fn clear_cart(&self) -> Result<()> {
        let initial = self.item_rows().await.count().await?;
        for _ in 0..initial {
            if self.is_cart_empty().await? {
                break;
            }
            self.remove_product(0).await?;
        }
        let left = self.item_rows().await.count().await?;
        ensure(left == 0, "cart lines after clearing", 0, left)
    }

    pub async fn apply_discount_coupon(&self, code: &str) -> Result<()> {
        debug!(code, "apply coupon");
        self.coupon_input().await.fill(code, None).await?;
        let apply = self.coupon_apply_button().await;
        self.click_and_wait_for_navigation(&apply).await
    }

    pub async fn apply_gift_card(&self, code: &str) -> Result<()> {
        debug!(code, "apply gift card");
        self.gift_card_input().await.fill(code, None).await?;
        let apply = self.locator(GIFT_CARD_APPLY).await;
        self.click_and_wait_for_navigation(&apply).await
    }

    pub async fn accept_terms_of_service(&self) -> Result<()> {
        self.terms_of_service().await.check(None).await?;
        Ok(())
    }

    /// Clicks Checkout.
    ///
    /// Without accepted terms the storefront stays on the cart and shows the
    /// terms warning instead of navigating, so only an accepted click waits
    /// for the next document.
    pub async fn proceed_to_checkout(&self) -> Result<()> {
        let terms = self.terms_of_service().await;
        let accepted = terms.count().await? > 0 && terms.is_checked().await?;
        debug!(accepted, "checkout");
        let button = self.checkout_button().await;
        if accepted {
            self.click_and_wait_for_navigation(&button).await
        } else {
            button.click(None).await?;
            Ok(())
        }
    }

    pub async fn click_continue_shopping(&self) -> Result<()> {
        let button = self.continue_shopping_button().await;
        self.click_and_wait_for_navigation(&button).await
    }

    pub async fn hover_over_cart_link(&self) -> Result<()> {
        self.cart_link().await.hover(None).await?;
        Ok(())
    }

    /// Opens the product page behind row `index`'s edit link.
    pub async fn edit_cart_item(&self, index: usize) -> Result<()> {
        let link = nth(&self.edit_item_links().await, index)?;
        self.click_and_wait_for_navigation(&link).await
    }

    // Queries

    /// Header counter, `(3)` read as 3
    pub async fn cart_item_count(&self) -> Result<u32> {
        let text = self.cart_qty().await.text_content().await?;
        Ok(parse_counter(&clean_text(text)))
    }

    pub async fn is_cart_empty(&self) -> Result<bool> {
        Ok(self.item_rows().await.count().await? == 0)
    }

    pub async fn product_names(&self) -> Result<Vec<String>> {
        self.wait_for_load_state(LoadState::DomContentLoaded).await?;
        text_contents(&self.product_name_links().await).await
    }

    pub async fn product_unit_price(&self, index: usize) -> Result<Decimal> {
        self.cell_price(UNIT_PRICE, index).await
    }

    pub async fn product_subtotal(&self, index: usize) -> Result<Decimal> {
        self.cell_price(LINE_SUBTOTAL, index).await
    }

    pub async fn product_quantity(&self, index: usize) -> Result<u32> {
        let value = nth(&self.quantity_inputs().await, index)?
            .input_value(None)
            .await?;
        Ok(parse_quantity(&value))
    }

    async fn cell_price(&self, selector: &str, index: usize) -> Result<Decimal> {
        let text = nth(&self.locator(selector).await, index)?
            .text_content()
            .await?;
        Ok(parse_price(&clean_text(text)))
    }

    pub async fn sub_total(&self) -> Result<Decimal> {
        let text = self.sub_total_cell().await.text_content().await?;
        Ok(parse_price(&clean_text(text)))
    }

    pub async fn tax(&self) -> Result<Decimal> {
        let text = self.tax_cell().await.text_content().await?;
        Ok(parse_price(&clean_text(text)))
    }

    /// Shipping cell as rendered; often text rather than an amount.
    pub async fn shipping_text(&self) -> Result<String> {
        let text = self.shipping_cell().await.text_content().await?;
        Ok(clean_text(text))
    }

    pub async fn order_total(&self) -> Result<Decimal> {
        let text = self.order_total_cell().await.text_content().await?;
        Ok(parse_price(&clean_text(text)))
    }

    pub async fn success_message_text(&self) -> Result<String> {
        Ok(clean_text(self.success_message().await.text_content().await?))
    }

    pub async fn error_message_text(&self) -> Result<String> {
        Ok(clean_text(self.error_message().await.text_content().await?))
    }

    pub async fn coupon_message_text(&self) -> Result<String> {
        Ok(clean_text(self.coupon_message().await.text_content().await?))
    }

    pub async fn gift_card_message_text(&self) -> Result<String> {
        Ok(clean_text(
            self.gift_card_message().await.text_content().await?,
        ))
    }

    pub async fn flyout_cart_item_count(&self) -> Result<usize> {
        Ok(self.locator(FLYOUT_ITEMS).await.count().await?)
    }

    pub async fn flyout_cart_total(&self) -> Result<Decimal> {
        let text = self.locator(FLYOUT_TOTAL).await.text_content().await?;
        Ok(parse_price(&clean_text(text)))
    }

    /// Whether row `index` renders an attributes block (no waiting).
    pub async fn has_product_attributes(&self, index: usize) -> Result<bool> {
        let attributes = nth(&self.item_rows().await, index)?.locator(ATTRIBUTES);
        Ok(attributes.count().await? > 0)
    }

    /// Attribute text of row `index`, `""` when the row has none.
    pub async fn product_attributes(&self, index: usize) -> Result<String> {
        if !self.has_product_attributes(index).await? {
            return Ok(String::new());
        }
        let attributes = nth(&self.item_rows().await, index)?
            .locator(ATTRIBUTES)
            .first();
        Ok(clean_text(attributes.text_content().await?))
    }

    // Assertions

    pub async fn verify_product_in_cart(&self, name: &str) -> Result<()> {
        let line = self.locator(&has_text(PRODUCT_NAME, name)).await.first();
        expect(line).to_be_visible().await?;
        Ok(())
    }

    /// Asserts the quantity input of row `index` shows `expected`.
    pub async fn verify_cart_updated(&self, expected: u32, index: usize) -> Result<()> {
        let input = nth(&self.quantity_inputs().await, index)?;
        expect(input).to_have_value(&expected.to_string()).await?;
        Ok(())
    }

    /// Asserts the "accept the terms" warning shown for a blocked checkout.
    pub async fn verify_terms_warning_displayed(&self) -> Result<()> {
        let warning = self.terms_warning().await;
        expect(warning.clone())
            .with_timeout(ASSERTION_TIMEOUT)
            .to_be_visible()
            .await?;
        expect(warning)
            .to_contain_text("Please accept the terms of service")
            .await?;
        Ok(())
    }

    pub async fn verify_sub_total(&self, expected: Decimal) -> Result<()> {
        let actual = self.sub_total().await?;
        ensure(
            actual == expected,
            "cart sub-total",
            format_price(expected),
            format_price(actual),
        )
    }

    pub async fn verify_success_message(&self) -> Result<()> {
        expect(self.success_message().await)
            .with_timeout(ASSERTION_TIMEOUT)
            .to_be_visible()
            .await?;
        Ok(())
    }

    pub async fn verify_error_message(&self) -> Result<()> {
        expect(self.error_message().await)
            .with_timeout(ASSERTION_TIMEOUT)
            .to_be_visible()
            .await?;
        Ok(())
    }

    /// Asserts the flyout mini-cart has opened (the panel gains `active`).
    pub async fn verify_flyout_cart_visible(&self) -> Result<()> {
        let flyout = self.locator(FLYOUT_ACTIVE).await;
        if let Err(e) = expect(flyout)
            .with_timeout(ASSERTION_TIMEOUT)
            .to_be_visible()
            .await
        {
            warn!("flyout cart did not open");
            return Err(e.into());
        }
        Ok(())
    }

    /// Asserts row 0 is `name` at unit price `price` with quantity `quantity`.
    pub async fn verify_cart_item_details(
        &self,
        name: &str,
        price: Decimal,
        quantity: u32,
    ) -> Result<()> {
        self.verify_product_in_cart(name).await?;
        let unit_price = self.product_unit_price(0).await?;
        ensure(
            unit_price == price,
            format!("unit price of {name}"),
            format_price(price),
            format_price(unit_price),
        )?;
        let actual = self.product_quantity(0).await?;
        ensure(
            actual == quantity,
            format!("quantity of {name}"),
            quantity,
            actual,
        )
    }
}
