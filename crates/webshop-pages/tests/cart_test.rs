// Shopping cart flows - add, update, remove, totals and checkout gating
//
// Every test starts from an empty guest cart in its own browser context.
// Money is compared as Decimal, so totals must match exactly.

mod common;

use common::Target;
use rust_decimal::Decimal;
use webshop_pages::pages::expected_line_total;
use webshop_pages::{CartPage, CategoryPage, LoginPage, ProductDetailsPage, SearchPage, Session};

const BOOK: &str = "/computing-and-internet";
const BOOK_NAME: &str = "Computing and Internet";
const FICTION: &str = "/fiction";
const FICTION_NAME: &str = "Fiction";

/// Opens `path`, adds `quantity` and waits for the success bar.
async fn add_product(session: &Session, path: &str, quantity: u32) -> ProductDetailsPage {
    let product: ProductDetailsPage = session.open();
    product
        .navigate_to_product(path)
        .await
        .expect("Failed to open product");
    product
        .verify_on_product_details_page()
        .await
        .expect("Product page did not load");
    product
        .add_to_cart(quantity)
        .await
        .expect("Failed to add to cart");
    product
        .verify_add_to_cart_success()
        .await
        .expect("Add to cart should report success");
    product
}

async fn open_cart(session: &Session) -> CartPage {
    let cart: CartPage = session.open();
    cart.navigate_to_cart().await.expect("Failed to open cart");
    cart
}

/// One book in the cart, cart page open.
async fn cart_with_book(session: &Session) -> CartPage {
    add_product(session, BOOK, 1).await;
    open_cart(session).await
}

// ============================================================================
// Add to cart
// ============================================================================

#[tokio::test]
async fn test_add_product_from_detail_page() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    let cart = cart_with_book(&session).await;
    cart.verify_product_in_cart(BOOK_NAME)
        .await
        .expect("Book should be in the cart");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_add_product_with_custom_quantity() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    add_product(&session, BOOK, 3).await;
    let cart = open_cart(&session).await;
    let quantity = cart.product_quantity(0).await.expect("Failed to read quantity");
    assert_eq!(quantity, 3);

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_add_multiple_different_products() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    add_product(&session, BOOK, 1).await;
    add_product(&session, FICTION, 1).await;
    let cart = open_cart(&session).await;

    let names = cart.product_names().await.expect("Failed to read names");
    assert_eq!(names.len(), 2, "Unexpected cart lines: {names:?}");
    assert!(names.iter().any(|n| n == BOOK_NAME));
    assert!(names.iter().any(|n| n == FICTION_NAME));

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_add_same_product_twice_merges_line() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    add_product(&session, BOOK, 1).await;
    add_product(&session, BOOK, 2).await;
    let cart = open_cart(&session).await;

    let names = cart.product_names().await.expect("Failed to read names");
    assert_eq!(names.len(), 1);
    cart.verify_cart_updated(3, 0)
        .await
        .expect("Quantities should add up on one line");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_second_add_on_same_page_waits_for_its_own_result() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    let product = add_product(&session, BOOK, 1).await;
    product
        .add_to_cart(2)
        .await
        .expect("Failed to add to cart again");
    product
        .verify_add_to_cart_success()
        .await
        .expect("Second add should report success");

    let cart: CartPage = session.open();
    assert_eq!(
        cart.cart_item_count().await.expect("Failed to read counter"),
        3,
        "Header counter should include both adds once add_to_cart returns"
    );

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_add_product_from_search_results() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    let search: SearchPage = session.open();
    search
        .navigate_to_home_page()
        .await
        .expect("Failed to open home page");
    search
        .search_for_product("computer")
        .await
        .expect("Failed to search");

    let category: CategoryPage = session.open();
    category
        .click_product_by_index(0)
        .await
        .expect("Failed to open first result");

    let product: ProductDetailsPage = session.open();
    product
        .verify_on_product_details_page()
        .await
        .expect("Product page did not load");
    product.add_to_cart(1).await.expect("Failed to add to cart");
    product
        .verify_add_to_cart_success()
        .await
        .expect("Add to cart should report success");

    let cart = open_cart(&session).await;
    let count = cart.cart_item_count().await.expect("Failed to read counter");
    assert!(count > 0);

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_add_product_from_category_page() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    let category: CategoryPage = session.open();
    category
        .navigate_to_category("Books")
        .await
        .expect("Failed to open Books");
    category
        .click_product_by_index(0)
        .await
        .expect("Failed to open first product");

    let product: ProductDetailsPage = session.open();
    product
        .verify_on_product_details_page()
        .await
        .expect("Product page did not load");
    product.add_to_cart(1).await.expect("Failed to add to cart");
    product
        .verify_add_to_cart_success()
        .await
        .expect("Add to cart should report success");

    let cart = open_cart(&session).await;
    assert!(!cart.is_cart_empty().await.expect("Failed to read cart"));

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_header_counter_after_adding_product() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    let product = add_product(&session, BOOK, 1).await;
    let text = product
        .success_notification_text()
        .await
        .expect("Failed to read notification");
    assert!(text.contains("shopping cart"), "Unexpected notification: {text}");

    let cart: CartPage = session.open();
    let first = cart.cart_item_count().await.expect("Failed to read counter");
    let second = cart.cart_item_count().await.expect("Failed to read counter");
    assert_eq!(first, 1);
    assert_eq!(first, second, "Reading the counter must not change it");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_flyout_cart_on_hover() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    add_product(&session, BOOK, 2).await;
    let cart: CartPage = session.open();
    cart.hover_over_cart_link()
        .await
        .expect("Failed to hover cart link");
    cart.verify_flyout_cart_visible()
        .await
        .expect("Flyout should open on hover");

    let items = cart
        .flyout_cart_item_count()
        .await
        .expect("Failed to count flyout items");
    assert!(items > 0);
    let total = cart.flyout_cart_total().await.expect("Failed to read flyout total");
    assert_eq!(total, Decimal::new(2000, 2));

    common::finish(session, target).await;
}

// ============================================================================
// Update quantity
// ============================================================================

#[tokio::test]
async fn test_update_quantity_to_five() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    let unit_price = cart.product_unit_price(0).await.expect("Failed to read price");
    cart.update_product_quantity(5, 0)
        .await
        .expect("Failed to set quantity");
    cart.click_update_cart().await.expect("Failed to update cart");

    assert_eq!(cart.product_quantity(0).await.expect("Failed to read quantity"), 5);
    let line_total = cart.product_subtotal(0).await.expect("Failed to read line total");
    assert_eq!(line_total, expected_line_total(unit_price, 5));
    cart.verify_sub_total(expected_line_total(unit_price, 5))
        .await
        .expect("Single-line sub-total should equal the line total");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_sub_total_follows_quantity() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    cart.update_product_quantity(3, 0)
        .await
        .expect("Failed to set quantity");
    cart.click_update_cart().await.expect("Failed to update cart");

    let unit_price = cart.product_unit_price(0).await.expect("Failed to read price");
    cart.verify_sub_total(expected_line_total(unit_price, 3))
        .await
        .expect("Sub-total should be unit price times three");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_quantity_increase_and_decrease() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    let initial = cart.product_quantity(0).await.expect("Failed to read quantity");
    cart.update_product_quantity(initial + 2, 0)
        .await
        .expect("Failed to set quantity");
    cart.click_update_cart().await.expect("Failed to update cart");
    cart.verify_cart_updated(initial + 2, 0)
        .await
        .expect("Quantity should increase");

    cart.update_product_quantity(5, 0)
        .await
        .expect("Failed to set quantity");
    cart.click_update_cart().await.expect("Failed to update cart");
    cart.update_product_quantity(2, 0)
        .await
        .expect("Failed to set quantity");
    cart.click_update_cart().await.expect("Failed to update cart");
    cart.verify_cart_updated(2, 0)
        .await
        .expect("Quantity should decrease");

    cart.update_product_quantity(1, 0)
        .await
        .expect("Failed to set quantity");
    cart.click_update_cart().await.expect("Failed to update cart");
    cart.verify_cart_updated(1, 0)
        .await
        .expect("Quantity of one is allowed");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_cart_queries_are_stable() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    add_product(&session, BOOK, 2).await;
    add_product(&session, FICTION, 1).await;
    let cart = open_cart(&session).await;

    let names = cart.product_names().await.expect("Failed to read names");
    assert_eq!(names, cart.product_names().await.expect("Failed to read names"));
    let sub_total = cart.sub_total().await.expect("Failed to read sub-total");
    assert_eq!(sub_total, cart.sub_total().await.expect("Failed to read sub-total"));
    let quantity = cart.product_quantity(0).await.expect("Failed to read quantity");
    assert_eq!(quantity, cart.product_quantity(0).await.expect("Failed to read quantity"));

    common::finish(session, target).await;
}

// ============================================================================
// Remove items
// ============================================================================

#[tokio::test]
async fn test_remove_product() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    let names = cart.product_names().await.expect("Failed to read names");
    assert!(!names.is_empty());
    cart.remove_product(0).await.expect("Failed to remove line");
    assert!(cart.is_cart_empty().await.expect("Failed to read cart"));

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_totals_after_removing_product() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    add_product(&session, BOOK, 1).await;
    add_product(&session, FICTION, 1).await;
    let cart = open_cart(&session).await;

    let initial = cart.sub_total().await.expect("Failed to read sub-total");
    let first_line = cart.product_subtotal(0).await.expect("Failed to read line total");
    cart.remove_product(0).await.expect("Failed to remove line");

    let after = cart.sub_total().await.expect("Failed to read sub-total");
    assert_eq!(after, initial - first_line);

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_remove_multiple_products() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    add_product(&session, BOOK, 1).await;
    add_product(&session, FICTION, 1).await;
    let cart = open_cart(&session).await;
    assert_eq!(cart.product_names().await.expect("Failed to read names").len(), 2);

    cart.remove_product(0).await.expect("Failed to remove line");
    assert!(!cart.is_cart_empty().await.expect("Failed to read cart"));
    cart.remove_product(0).await.expect("Failed to remove line");
    assert!(cart.is_cart_empty().await.expect("Failed to read cart"));

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_zero_quantity_removes_line() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    cart.update_product_quantity(0, 0)
        .await
        .expect("Failed to set quantity");
    cart.click_update_cart().await.expect("Failed to update cart");
    assert!(cart.is_cart_empty().await.expect("Failed to read cart"));

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_clear_cart() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    add_product(&session, BOOK, 1).await;
    add_product(&session, FICTION, 2).await;
    let cart = open_cart(&session).await;
    cart.clear_cart().await.expect("Failed to clear cart");
    assert!(cart.is_cart_empty().await.expect("Failed to read cart"));
    assert_eq!(cart.cart_item_count().await.expect("Failed to read counter"), 0);

    common::finish(session, target).await;
}

// ============================================================================
// Continue shopping
// ============================================================================

#[tokio::test]
async fn test_continue_shopping_leaves_cart() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    cart.click_continue_shopping()
        .await
        .expect("Failed to continue shopping");
    cart.expect_url_not_contains("/cart")
        .await
        .expect("Should leave the cart");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_continue_shopping_keeps_items() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    let before = cart.product_names().await.expect("Failed to read names");
    cart.click_continue_shopping()
        .await
        .expect("Failed to continue shopping");
    cart.navigate_to_cart().await.expect("Failed to reopen cart");
    let after = cart.product_names().await.expect("Failed to read names");
    assert_eq!(after, before);

    common::finish(session, target).await;
}

// ============================================================================
// Coupons and gift cards
// ============================================================================

#[tokio::test]
async fn test_coupon_input_accepts_text() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    let input = cart.coupon_input().await;
    input.fill("TESTCODE", None).await.expect("Failed to type coupon");
    assert_eq!(
        input.input_value(None).await.expect("Failed to read coupon"),
        "TESTCODE"
    );

    let gift_card = cart.gift_card_input().await;
    gift_card
        .fill("GIFT123", None)
        .await
        .expect("Failed to type gift card");
    assert_eq!(
        gift_card
            .input_value(None)
            .await
            .expect("Failed to read gift card"),
        "GIFT123"
    );

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_invalid_coupon_is_rejected() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    cart.apply_discount_coupon("INVALID123")
        .await
        .expect("Failed to apply coupon");
    let message = cart.coupon_message_text().await.expect("Failed to read message");
    assert!(message.contains("couldn't be applied"), "Unexpected message: {message}");
    cart.expect_url_contains("/cart")
        .await
        .expect("Should stay on the cart");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_several_coupons_keep_cart_open() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    for code in ["FIRST", "SECOND"] {
        cart.apply_discount_coupon(code)
            .await
            .expect("Failed to apply coupon");
    }
    cart.expect_url_contains("/cart")
        .await
        .expect("Should stay on the cart");
    cart.verify_product_in_cart(BOOK_NAME)
        .await
        .expect("Coupons must not touch the lines");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_invalid_gift_card_is_rejected() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    cart.apply_gift_card("INVALIDGIFT")
        .await
        .expect("Failed to apply gift card");
    let message = cart
        .gift_card_message_text()
        .await
        .expect("Failed to read message");
    assert!(message.contains("couldn't be applied"), "Unexpected message: {message}");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_coupon_and_gift_card_together() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    cart.apply_discount_coupon("COUPON")
        .await
        .expect("Failed to apply coupon");
    cart.apply_gift_card("GIFT")
        .await
        .expect("Failed to apply gift card");
    cart.expect_url_contains("/cart")
        .await
        .expect("Should stay on the cart");

    common::finish(session, target).await;
}

// ============================================================================
// Totals
// ============================================================================

#[tokio::test]
async fn test_sub_total_for_single_product() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    let cart: CartPage = session.open();
    cart.navigate("/cart").await.expect("Failed to open cart");
    cart.clear_cart().await.expect("Failed to clear cart");

    let product: ProductDetailsPage = session.open();
    product.navigate_to_product(BOOK).await.expect("Failed to open product");
    let price = product.product_price().await.expect("Failed to read price");
    product.add_to_cart(2).await.expect("Failed to add to cart");
    product
        .verify_add_to_cart_success()
        .await
        .expect("Add to cart should report success");

    cart.navigate_to_cart().await.expect("Failed to open cart");
    cart.verify_sub_total(expected_line_total(price, 2))
        .await
        .expect("Sub-total should be twice the price");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_sub_total_for_multiple_products() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    let mut expected = Decimal::ZERO;
    for path in [BOOK, FICTION] {
        let product: ProductDetailsPage = session.open();
        product.navigate_to_product(path).await.expect("Failed to open product");
        expected += product.product_price().await.expect("Failed to read price");
        product.add_to_cart(1).await.expect("Failed to add to cart");
        product
            .verify_add_to_cart_success()
            .await
            .expect("Add to cart should report success");
    }

    let cart = open_cart(&session).await;
    cart.verify_sub_total(expected)
        .await
        .expect("Sub-total should be the sum of both prices");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_totals_table_rows() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    assert!(cart.tax_cell().await.is_visible().await.expect("Failed to read tax"));
    assert!(cart.tax().await.expect("Failed to read tax") >= Decimal::ZERO);

    let shipping = cart.shipping_text().await.expect("Failed to read shipping");
    assert!(!shipping.is_empty(), "Shipping row should say something");
    assert!(cart.shipping_cell().await.is_visible().await.expect("Failed to read shipping"));

    assert!(
        cart.order_total_cell()
            .await
            .is_visible()
            .await
            .expect("Failed to read order total")
    );

    common::finish(session, target).await;
}

// ============================================================================
// Checkout gating
// ============================================================================

async fn logged_in_cart(target: &Target, session: &Session) -> CartPage {
    let credentials = target.fresh_account().await;
    let login: LoginPage = session.open();
    login
        .navigate_to_login_page()
        .await
        .expect("Failed to open login page");
    login
        .login_with_credentials(&credentials, false)
        .await
        .expect("Failed to log in");
    login.verify_logged_in().await.expect("Should be logged in");
    cart_with_book(session).await
}

#[tokio::test]
async fn test_terms_of_service_checkbox_and_checkout_button() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = logged_in_cart(&target, &session).await;

    assert!(
        cart.terms_of_service()
            .await
            .is_visible()
            .await
            .expect("Failed to read terms checkbox")
    );
    let checkout = cart.checkout_button().await;
    assert!(checkout.is_visible().await.expect("Failed to read checkout button"));
    let label = checkout
        .text_content()
        .await
        .expect("Failed to read checkout label")
        .unwrap_or_default();
    assert_eq!(label.trim(), "Checkout");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_checkout_requires_terms() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = logged_in_cart(&target, &session).await;

    assert!(
        !cart
            .terms_warning()
            .await
            .is_visible()
            .await
            .expect("Failed to read terms warning")
    );
    cart.proceed_to_checkout()
        .await
        .expect("Failed to click checkout");
    cart.verify_terms_warning_displayed()
        .await
        .expect("Blocked checkout should show the terms warning");
    cart.expect_url_contains("/cart")
        .await
        .expect("Checkout without terms should stay on the cart");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_checkout_after_accepting_terms() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = logged_in_cart(&target, &session).await;

    cart.accept_terms_of_service()
        .await
        .expect("Failed to accept terms");
    cart.proceed_to_checkout().await.expect("Failed to check out");
    cart.expect_url_matches(r"checkout|onepage")
        .await
        .expect("Should reach checkout");

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_guest_checkout_asks_to_sign_in() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    cart.accept_terms_of_service()
        .await
        .expect("Failed to accept terms");
    cart.proceed_to_checkout().await.expect("Failed to check out");
    cart.expect_url_contains("/login")
        .await
        .expect("Guests should be offered sign-in or guest checkout");

    common::finish(session, target).await;
}

// ============================================================================
// Line details
// ============================================================================

#[tokio::test]
async fn test_line_details() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    add_product(&session, BOOK, 2).await;
    let cart = open_cart(&session).await;

    assert!(
        cart.product_pictures()
            .await
            .first()
            .is_visible()
            .await
            .expect("Failed to read picture")
    );

    let name = cart.product_name_links().await.first();
    assert!(name.is_visible().await.expect("Failed to read name"));
    let href = name
        .get_attribute("href")
        .await
        .expect("Failed to read link")
        .unwrap_or_default();
    assert!(!href.is_empty());

    let unit_price = cart.product_unit_price(0).await.expect("Failed to read price");
    assert!(unit_price > Decimal::ZERO);
    let line_total = cart.product_subtotal(0).await.expect("Failed to read line total");
    assert!(line_total > Decimal::ZERO);

    cart.verify_cart_item_details(BOOK_NAME, unit_price, 2)
        .await
        .expect("Line should match the product added");
    assert_eq!(
        cart.product_attributes(0).await.expect("Failed to read attributes"),
        ""
    );

    common::finish(session, target).await;
}

#[tokio::test]
async fn test_edit_link_opens_product() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;
    let cart = cart_with_book(&session).await;

    let links = cart.edit_item_links().await;
    if links.count().await.expect("Failed to count edit links") > 0 {
        cart.edit_cart_item(0).await.expect("Failed to follow edit link");
        let product: ProductDetailsPage = session.open();
        product
            .verify_product_name(BOOK_NAME)
            .await
            .expect("Edit link should open the product");
    }

    common::finish(session, target).await;
}

// ============================================================================
// Empty cart
// ============================================================================

#[tokio::test]
async fn test_empty_cart() {
    common::init_tracing();
    let target = Target::start().await;
    let session = target.session().await;

    let cart: CartPage = session.open();
    cart.navigate("/").await.expect("Failed to open home page");
    cart.navigate_to_cart().await.expect("Failed to open cart");
    assert!(cart.is_cart_empty().await.expect("Failed to read cart"));

    let checkout = cart.checkout_button().await;
    if checkout.is_visible().await.expect("Failed to read checkout button") {
        assert!(
            !checkout.is_enabled().await.expect("Failed to read checkout button"),
            "Checkout must not be usable on an empty cart"
        );
    }

    common::finish(session, target).await;
}
