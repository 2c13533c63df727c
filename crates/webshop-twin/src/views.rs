//! HTML rendering.
//!
//! Markup follows the demo storefront's class names and ids closely enough
//! for the page objects' selectors and expected texts to hold unchanged.

use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::{Account, FieldError, RegisterForm};
use crate::cart::{CartLine, line_total};
use crate::catalog::{Catalog, Category, PAGE_SIZES, Product, SortOrder};
use crate::listing::{Listing, ViewMode};

pub const SITE_NAME: &str = "Demo Web Shop";

const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;utf8,<svg xmlns='http://www.w3.org/2000/svg' width='125' height='125'><rect width='125' height='125' fill='%23dddddd'/></svg>";

const STYLE: &str = r#"
body { font-family: Arial, Helvetica, sans-serif; font-size: 14px; margin: 0; color: #333; }
a { color: #2478b5; }
.master-wrapper-page { width: 980px; margin: 0 auto; }
.header { overflow: hidden; padding: 10px 0; }
.header-logo { float: left; font-size: 24px; }
.header-links-wrapper { float: right; }
.header-links ul, .top-menu, .product-tags-list ul, .pager ul { list-style: none; margin: 0; padding: 0; }
.header-links li, .top-menu li, .product-tags-list li, .pager li { display: inline-block; margin-right: 12px; }
#topcartlink { position: relative; }
.flyout-cart { display: none; position: absolute; right: 0; top: 20px; width: 300px; padding: 10px; background: #fff; border: 1px solid #ccc; z-index: 10; }
.flyout-cart.active { display: block; }
.search-box { clear: both; padding: 10px 0; }
.top-menu { background: #f3f3f3; padding: 8px; }
.bar-notification { padding: 10px 15px; color: #fff; }
.bar-notification.success { background: #4bb07a; }
.bar-notification.error { background: #e4444c; }
.bar-notification .close { float: right; cursor: pointer; font-weight: bold; }
.item-box { display: inline-block; vertical-align: top; width: 220px; margin: 0 10px 20px 0; }
.product-list .item-box { display: block; width: auto; }
.old-price, .old-product-price { text-decoration: line-through; color: #999; }
.product-review-box .rating { width: 95px; height: 14px; background: #eee; }
.product-review-box .rating div { height: 14px; background: #f5a623; }
.field-validation-error, .message-error, .warning { color: #e4444c; }
.free-shipping { color: #4bb07a; font-weight: bold; }
table.cart, table.cart-total { border-collapse: collapse; }
table.cart td, table.cart th { border: 1px solid #ddd; padding: 6px; }
"#;

const SCRIPT: &str = r#"
function setLocation(url) {
    window.location.href = url;
}

function checkTerms() {
    var terms = document.getElementById('termsofservice');
    if (terms && terms.checked) {
        return true;
    }
    var warning = document.getElementById('terms-of-service-warning-box');
    if (warning) {
        warning.style.display = 'block';
    }
    return false;
}

document.addEventListener('DOMContentLoaded', function () {
    var link = document.getElementById('topcartlink');
    var flyout = document.getElementById('flyout-cart');
    if (!link || !flyout) {
        return;
    }
    link.addEventListener('mouseenter', function () { flyout.classList.add('active'); });
    link.addEventListener('mouseleave', function () { flyout.classList.remove('active'); });
});
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-shot message shown in the notification bar on the next page view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Per-request parts of the page frame: who is signed in, what is in the cart.
pub struct Chrome<'a> {
    pub catalog: &'a Catalog,
    pub customer: Option<&'a str>,
    pub cart: &'a [(CartLine, &'a Product)],
    pub notice: Option<&'a Notice>,
    pub search_term: Option<&'a str>,
}

impl Chrome<'_> {
    fn cart_quantity(&self) -> u32 {
        self.cart.iter().map(|(line, _)| line.quantity).sum()
    }

    fn cart_subtotal(&self) -> Decimal {
        self.cart
            .iter()
            .map(|(line, product)| line_total(product.price, line.quantity))
            .sum()
    }
}

pub fn price(amount: Decimal) -> String {
    format!("{amount:.2}")
}

fn product_href(product: &Product) -> String {
    format!("/{}", product.slug)
}

fn category_href(category: &Category) -> String {
    format!("/{}", category.slug)
}

fn picture(name: &str) -> Markup {
    html! {
        img src=(PLACEHOLDER_IMAGE) alt=(format!("Picture of {name}")) title=(name) width="125" height="125";
    }
}

fn layout(chrome: &Chrome<'_>, title: Option<&str>, body: Markup) -> String {
    let title = match title {
        Some(title) => format!("{SITE_NAME}. {title}"),
        None => SITE_NAME.to_string(),
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (PreEscaped(STYLE)) }
                script { (PreEscaped(SCRIPT)) }
            }
            body {
                (notification_bar(chrome.notice))
                div.master-wrapper-page {
                    div.master-wrapper-content {
                        (header(chrome))
                        div.header-menu { (top_menu(chrome.catalog)) }
                        div.master-wrapper-main {
                            div."center-1" { (body) }
                        }
                    }
                    div.footer {
                        div.footer-disclaimer { "Copyright © " (SITE_NAME) }
                    }
                }
            }
        }
    }
    .into_string()
}

fn notification_bar(notice: Option<&Notice>) -> Markup {
    html! {
        @if let Some(notice) = notice {
            @let kind = match notice.kind {
                NoticeKind::Success => "success",
                NoticeKind::Error => "error",
            };
            div #bar-notification class=(format!("bar-notification {kind}")) {
                span.close title="Close" onclick="this.parentNode.style.display='none'" { "×" }
                p.content { (notice.message) }
            }
        }
    }
}

fn header(chrome: &Chrome<'_>) -> Markup {
    html! {
        div.header {
            div.header-logo {
                a href="/" { (SITE_NAME) }
            }
            div.header-links-wrapper {
                div.header-links {
                    ul {
                        @if let Some(email) = chrome.customer {
                            li { a.account href="/customer/info" { (email) } }
                            li { a.ico-logout href="/logout" { "Log out" } }
                        } @else {
                            li { a.ico-register href="/register" { "Register" } }
                            li { a.ico-login href="/login" { "Log in" } }
                        }
                        li #topcartlink {
                            a.ico-cart href="/cart" {
                                span.cart-label { "Shopping cart" }
                                " "
                                span.cart-qty { "(" (chrome.cart_quantity()) ")" }
                            }
                            (flyout_cart(chrome))
                        }
                        li {
                            a.ico-wishlist href="/wishlist" {
                                span.cart-label { "Wishlist" }
                                " "
                                span.wishlist-qty { "(0)" }
                            }
                        }
                    }
                }
            }
            div.search-box {
                form action="/search" method="get" {
                    input #small-searchterms.search-box-text type="text" name="q"
                        value=(chrome.search_term.unwrap_or_default()) placeholder="Search store";
                    " "
                    input."button-1".search-box-button type="submit" value="Search";
                }
            }
        }
    }
}

fn flyout_cart(chrome: &Chrome<'_>) -> Markup {
    html! {
        div #flyout-cart.flyout-cart {
            div.mini-shopping-cart {
                div.count {
                    @if chrome.cart.is_empty() {
                        "You have no items in your shopping cart."
                    } @else {
                        "There are " a href="/cart" { (chrome.cart_quantity()) " item(s)" } " in your cart."
                    }
                }
                @if !chrome.cart.is_empty() {
                    div.items {
                        @for (line, product) in chrome.cart {
                            div.item {
                                div.product {
                                    div.name { a href=(product_href(product)) { (product.name) } }
                                    div.price { "Unit price: " span { (price(product.price)) } }
                                    div.quantity { "Quantity: " span { (line.quantity) } }
                                }
                            }
                        }
                    }
                    div.totals { "Sub-Total: " strong { (price(chrome.cart_subtotal())) } }
                    div.buttons {
                        input."button-1".cart-button type="button" value="Go to cart" onclick="setLocation('/cart')";
                    }
                }
            }
        }
    }
}

fn top_menu(catalog: &Catalog) -> Markup {
    html! {
        ul.top-menu {
            @for category in catalog.top_categories() {
                li { a href=(category_href(category)) { (category.name) } }
            }
        }
    }
}

/// Product card used by listings and the recommendation grids.
fn product_box(product: &Product, with_buy_button: bool) -> Markup {
    html! {
        div.item-box {
            div.product-item data-productid=(product.id) {
                div.picture {
                    a href=(product_href(product)) title=(product.name) { (picture(product.name)) }
                }
                div.details {
                    h2.product-title {
                        a href=(product_href(product)) { (product.name) }
                    }
                    div.description { (product.short_description) }
                    div.add-info {
                        div.prices {
                            @if let Some(old) = product.old_price {
                                span.price.old-price { (price(old)) }
                                " "
                            }
                            span.price.actual-price { (price(product.price)) }
                        }
                        @if with_buy_button {
                            div.buttons {
                                input."button-2".product-box-add-to-cart-button type="button" value="Add to cart"
                                    onclick=(format!("setLocation('{}')", product_href(product)));
                            }
                        }
                    }
                }
            }
        }
    }
}

fn product_selectors(listing: &Listing) -> Markup {
    html! {
        div.product-selectors {
            div.product-viewmode {
                span { "View as" }
                select #products-viewmode name="products-viewmode" onchange="setLocation(this.value);" {
                    @for view in ViewMode::ALL {
                        option value=(listing.view_href(view)) selected[view == listing.view] { (view.label()) }
                    }
                }
            }
            div.product-sorting {
                span { "Sort by" }
                select #products-orderby name="products-orderby" onchange="setLocation(this.value);" {
                    @for order in SortOrder::ALL {
                        option value=(listing.order_href(order)) selected[order == listing.order] { (order.label()) }
                    }
                }
            }
            div.product-page-size {
                span { "Display" }
                select #products-pagesize name="products-pagesize" onchange="setLocation(this.value);" {
                    @for size in PAGE_SIZES {
                        option value=(listing.page_size_href(size)) selected[size == listing.page_size] { (size) }
                    }
                }
                span { "per page" }
            }
        }
    }
}

/// Selectors, one page of products and the pager.
fn product_listing(listing: &Listing, products: &[&Product], pages: usize) -> Markup {
    html! {
        (product_selectors(listing))
        @if listing.view == ViewMode::List {
            div.product-list {
                @for product in products { (product_box(product, true)) }
            }
        } @else {
            div.product-grid {
                @for product in products { (product_box(product, true)) }
            }
        }
        @if pages > 1 {
            div.pager {
                ul {
                    @for page in 1..=pages {
                        @if page == listing.page {
                            li.current-page { span { (page) } }
                        } @else {
                            li.individual-page { a href=(listing.page_href(page)) { (page) } }
                        }
                    }
                }
            }
        }
    }
}

fn breadcrumb(trail: &[(&str, String)], current: &str) -> Markup {
    html! {
        div.breadcrumb {
            ul {
                li { a href="/" { "Home" } span.delimiter { " / " } }
                @for (name, href) in trail {
                    li { a href=(href) { (name) } span.delimiter { " / " } }
                }
                li { strong.current-item { (current) } }
            }
        }
    }
}

pub fn home_page(chrome: &Chrome<'_>) -> String {
    let body = html! {
        div.page.home-page {
            div.page-body {
                div.topic-html-content {
                    div.topic-html-content-title { h2.topic-html-content-header { "Welcome to our store" } }
                }
                div.product-grid.home-page-product-grid {
                    div.title { strong { "Featured products" } }
                    @for product in chrome.catalog.featured() { (product_box(product, true)) }
                }
            }
        }
    };
    layout(chrome, None, body)
}

/// Parents of a category, outermost first, for the breadcrumb.
fn category_trail(catalog: &Catalog, category: &Category) -> Vec<(&'static str, String)> {
    let mut trail = Vec::new();
    let mut parent = category.parent.and_then(|slug| catalog.category(slug));
    while let Some(current) = parent {
        trail.insert(0, (current.name, category_href(current)));
        parent = current.parent.and_then(|slug| catalog.category(slug));
    }
    trail
}

pub fn category_page(
    chrome: &Chrome<'_>,
    category: &Category,
    listing: &Listing,
    products: &[&Product],
    pages: usize,
) -> String {
    let subs: Vec<&Category> = chrome.catalog.sub_categories(category.slug).collect();
    let trail = category_trail(chrome.catalog, category);
    let body = html! {
        (breadcrumb(&trail, category.name))
        div.page.category-page {
            div.page-title { h1 { (category.name) } }
            div.page-body {
                @if !subs.is_empty() {
                    div.sub-category-grid {
                        @for sub in &subs {
                            div.item-box {
                                div.sub-category-item {
                                    h2.title { a href=(category_href(sub)) title=(sub.name) { (sub.name) } }
                                }
                            }
                        }
                    }
                }
                @if !products.is_empty() {
                    (product_listing(listing, products, pages))
                }
            }
        }
    };
    layout(chrome, Some(category.name), body)
}

pub fn tag_page(
    chrome: &Chrome<'_>,
    tag: &str,
    listing: &Listing,
    products: &[&Product],
    pages: usize,
) -> String {
    let heading = format!("Products tagged with '{tag}'");
    let body = html! {
        div.page.product-tag-page {
            div.page-title { h1 { (heading) } }
            div.page-body { (product_listing(listing, products, pages)) }
        }
    };
    layout(chrome, Some(&heading), body)
}

fn recommendation_grid(class: &str, title: &str, products: &[&Product]) -> Markup {
    html! {
        @if !products.is_empty() {
            div class=(format!("{class} product-grid")) {
                div.title { strong { (title) } }
                @for product in products { (product_box(product, false)) }
            }
        }
    }
}

pub fn product_page(chrome: &Chrome<'_>, product: &Product) -> String {
    let catalog = chrome.catalog;
    let also_purchased = catalog.resolve(product.also_purchased);
    let related = catalog.resolve(product.related);
    let mut trail = Vec::new();
    if let Some(category) = catalog.category(product.category) {
        trail = category_trail(catalog, category);
        trail.push((category.name, category_href(category)));
    }
    let rating = if product.reviews == 0 { 0 } else { 80 };
    let quantity_field = format!("addtocart_{}.EnteredQuantity", product.id);

    let body = html! {
        (breadcrumb(&trail, product.name))
        div.page.product-details-page {
            div.page-body {
                form method="post" action=(format!("/addproducttocart/details/{}", product.id)) {
                    div.product-essential {
                        div.gallery {
                            div.picture { (picture(product.name)) }
                        }
                        div.overview {
                            div.product-name { h1 itemprop="name" { (product.name) } }
                            div.short-description { (product.short_description) }
                            div.product-reviews-overview {
                                div.product-review-box {
                                    div.rating { div style=(format!("width: {rating}%")) {} }
                                }
                                div.product-review-links {
                                    a href=(format!("/productreviews/{}", product.id)) { (product.reviews) " review(s)" }
                                    span.separator { " | " }
                                    a href=(format!("/productreviews/{}", product.id)) { "Add your review" }
                                }
                            }
                            div.stock {
                                span.label { "Availability:" }
                                " "
                                span.value { "In stock" }
                            }
                            @if product.free_shipping {
                                div.free-shipping { "Free shipping" }
                            }
                            div.prices {
                                @if let Some(old) = product.old_price {
                                    div.old-product-price { span { (price(old)) } }
                                }
                                div.product-price {
                                    span itemprop="price" { (price(product.price)) }
                                }
                            }
                            div.add-to-cart {
                                div.add-to-cart-panel {
                                    label.qty-label for=(quantity_field) { "Qty:" }
                                    input.qty-input id=(quantity_field) type="text" name=(quantity_field) value="1";
                                    " "
                                    input."button-1".add-to-cart-button type="submit" value="Add to cart";
                                }
                            }
                            div.overview-buttons {
                                div.email-a-friend {
                                    input."button-2".email-a-friend-button type="button" value="Email a friend"
                                        onclick=(format!("setLocation('/productemailafriend/{}')", product.id));
                                }
                                div.compare-products {
                                    input."button-2".add-to-compare-list-button type="button" value="Add to compare list"
                                        onclick=(format!("setLocation('/compareproducts/add/{}')", product.id));
                                }
                            }
                        }
                        @if !product.full_description.is_empty() {
                            div.full-description itemprop="description" { (product.full_description) }
                        }
                    }
                }
                div.product-collateral {
                    @if !product.tags.is_empty() {
                        div.product-tags-box {
                            div.title { strong { "Product tags" } }
                            div.product-tags-list {
                                ul {
                                    @for tag in product.tags {
                                        li.tag {
                                            a.producttag href=(format!("/producttag/{tag}")) { (tag) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    (recommendation_grid("also-purchased-products-grid", "Customers who bought this item also bought", &also_purchased))
                    (recommendation_grid("related-products-grid", "Related products", &related))
                }
            }
        }
    };
    layout(chrome, Some(product.name), body)
}

pub fn product_reviews_page(chrome: &Chrome<'_>, product: &Product) -> String {
    let body = html! {
        div.page.product-reviews-page {
            div.page-title {
                h1 { "Product reviews for " a href=(product_href(product)) { (product.name) } }
            }
            div.page-body {
                div.product-review-list {
                    p { (product.reviews) " review(s)" }
                }
            }
        }
    };
    layout(chrome, Some(product.name), body)
}

pub fn email_a_friend_page(chrome: &Chrome<'_>, product: &Product) -> String {
    let body = html! {
        div.page.email-a-friend-page {
            div.page-title {
                h1 { "Email a friend" }
                a.product href=(product_href(product)) { (product.name) }
            }
            div.page-body {
                div.form-fields {
                    div.inputs { label for="FriendEmail" { "Friend's email:" } input #FriendEmail type="text" name="FriendEmail"; }
                    div.inputs { label for="YourEmailAddress" { "Your email address:" } input #YourEmailAddress type="text" name="YourEmailAddress" value=(chrome.customer.unwrap_or_default()); }
                }
            }
        }
    };
    layout(chrome, Some("Email a friend"), body)
}

pub fn compare_page(chrome: &Chrome<'_>, products: &[&Product]) -> String {
    let body = html! {
        div.page.compare-products-page {
            div.page-title { h1 { "Compare products" } }
            div.page-body {
                @if products.is_empty() {
                    div.no-data { "You have no items to compare." }
                } @else {
                    table.compare-products-table {
                        tr.product-name {
                            td { "Name" }
                            @for product in products { td { a href=(product_href(product)) { (product.name) } } }
                        }
                        tr.product-price {
                            td { "Price" }
                            @for product in products { td { (price(product.price)) } }
                        }
                    }
                }
            }
        }
    };
    layout(chrome, Some("Compare products"), body)
}

pub fn wishlist_page(chrome: &Chrome<'_>) -> String {
    let body = html! {
        div.page.wishlist-page {
            div.page-title { h1 { "Wishlist" } }
            div.page-body { div.wishlist-content { "The wishlist is empty!" } }
        }
    };
    layout(chrome, Some("Wishlist"), body)
}

/// What the search page shows below the form.
pub enum SearchOutcome<'a> {
    /// No term submitted yet
    Idle,
    TooShort(usize),
    Results {
        listing: &'a Listing,
        products: &'a [&'a Product],
        pages: usize,
    },
}

pub fn search_page(chrome: &Chrome<'_>, outcome: SearchOutcome<'_>) -> String {
    let body = html! {
        div.page.search-page {
            div.page-title { h1 { "Search" } }
            div.page-body {
                div.search-input {
                    form action="/search" method="get" {
                        div.basic-search {
                            label for="Q" { "Search keyword:" }
                            input #Q.search-text type="text" name="q" value=(chrome.search_term.unwrap_or_default());
                        }
                        div.buttons { input."button-1".search-button type="submit" value="Search"; }
                    }
                }
                div.search-results {
                    @match outcome {
                        SearchOutcome::Idle => {}
                        SearchOutcome::TooShort(min) => {
                            strong.warning { "Search term minimum length is " (min) " characters" }
                        }
                        SearchOutcome::Results { products, .. } if products.is_empty() => {
                            strong.result { "No products were found that matched your criteria." }
                        }
                        SearchOutcome::Results { listing, products, pages } => {
                            (product_listing(listing, products, pages))
                        }
                    }
                }
            }
        }
    };
    layout(chrome, Some("Search"), body)
}

fn field_error(errors: &[FieldError], field: &str) -> Markup {
    html! {
        @if let Some(error) = errors.iter().find(|e| e.field == field) {
            span.field-validation-error data-valmsg-for=(field) { span { (error.message) } }
        } @else {
            span.field-validation-valid data-valmsg-for=(field) {}
        }
    }
}

fn text_input(id: &str, label: &str, value: &str, errors: &[FieldError]) -> Markup {
    html! {
        div.inputs {
            label for=(id) { (label) ":" }
            input.text-box.single-line id=(id) type="text" name=(id) value=(value);
            (field_error(errors, id))
        }
    }
}

fn password_input(id: &str, label: &str, errors: &[FieldError]) -> Markup {
    html! {
        div.inputs {
            label for=(id) { (label) ":" }
            input.text-box.single-line.password id=(id) type="password" name=(id);
            (field_error(errors, id))
        }
    }
}

/// Registration form; `summary` holds form-level errors such as a taken email.
pub fn register_page(
    chrome: &Chrome<'_>,
    form: &RegisterForm,
    errors: &[FieldError],
    summary: Option<&str>,
) -> String {
    let gender = form.gender.as_deref();
    let body = html! {
        div.page.registration-page {
            div.page-title { h1 { "Register" } }
            div.page-body {
                form method="post" action="/register" {
                    @if let Some(message) = summary {
                        div.message-error {
                            div.validation-summary-errors { ul { li { (message) } } }
                        }
                    }
                    div.fieldset {
                        div.title { strong { "Your Personal Details" } }
                        div.form-fields {
                            div.inputs {
                                label { "Gender:" }
                                div.gender {
                                    input #gender-male type="radio" name="Gender" value="M" checked[gender == Some("M")];
                                    label.forcheckbox for="gender-male" { "Male" }
                                }
                                div.gender {
                                    input #gender-female type="radio" name="Gender" value="F" checked[gender == Some("F")];
                                    label.forcheckbox for="gender-female" { "Female" }
                                }
                            }
                            (text_input("FirstName", "First name", &form.first_name, errors))
                            (text_input("LastName", "Last name", &form.last_name, errors))
                            (text_input("Email", "Email", &form.email, errors))
                        }
                    }
                    div.fieldset {
                        div.title { strong { "Your Password" } }
                        div.form-fields {
                            (password_input("Password", "Password", errors))
                            (password_input("ConfirmPassword", "Confirm password", errors))
                        }
                    }
                    div.buttons {
                        input #register-button."button-1".register-next-step-button type="submit" name="register-button" value="Register";
                    }
                }
            }
        }
    };
    layout(chrome, Some("Register"), body)
}

pub fn register_result_page(chrome: &Chrome<'_>) -> String {
    let body = html! {
        div.page.registration-result-page {
            div.page-title { h1 { "Register" } }
            div.page-body {
                div.result { "Your registration completed" }
                div.buttons {
                    input."button-1".register-continue-button type="button" value="Continue" onclick="setLocation('/')";
                }
            }
        }
    };
    layout(chrome, Some("Register"), body)
}

/// Sign-in page. `failure` is the reason shown in the validation summary.
pub fn login_page(
    chrome: &Chrome<'_>,
    action: &str,
    email: &str,
    errors: &[FieldError],
    failure: Option<&str>,
) -> String {
    let body = html! {
        div.page.login-page {
            div.page-title { h1 { "Welcome, Please Sign In!" } }
            div.page-body {
                div.customer-blocks {
                    div.new-wrapper.register-block {
                        div.title { strong { "New Customer" } }
                        div.text {
                            "By creating an account on our website you will be able to shop faster, \
                             be up to date on an orders status, and keep track of the orders you have previously made."
                        }
                        div.buttons {
                            input."button-1".register-button type="button" value="Register" onclick="setLocation('/register')";
                        }
                    }
                    div.returning-wrapper {
                        div.title { strong { "Returning Customer" } }
                        form method="post" action=(action) {
                            @if let Some(reason) = failure {
                                div.message-error {
                                    div.validation-summary-errors {
                                        span { "Login was unsuccessful. Please correct the errors and try again." }
                                        ul { li { (reason) } }
                                    }
                                }
                            }
                            div.form-fields {
                                div.inputs {
                                    label for="Email" { "Email:" }
                                    input #Email.email type="text" name="Email" value=(email);
                                    (field_error(errors, "Email"))
                                }
                                div.inputs {
                                    label for="Password" { "Password:" }
                                    input #Password.password type="password" name="Password";
                                }
                                div.inputs.reversed {
                                    input #RememberMe type="checkbox" name="RememberMe" value="true";
                                    label for="RememberMe" { "Remember me?" }
                                }
                            }
                            div.buttons {
                                input."button-1".login-button type="submit" value="Log in";
                            }
                        }
                    }
                }
            }
        }
    };
    layout(chrome, Some("Login"), body)
}

pub fn checkout_as_guest_page(chrome: &Chrome<'_>) -> String {
    let body = html! {
        div.page.login-page.checkout-as-guest-page {
            div.page-title { h1 { "Welcome, Please Sign In!" } }
            div.page-body {
                div.customer-blocks {
                    div.new-wrapper.checkout-as-guest-or-register-block {
                        div.title { strong { "Checkout as a guest or register" } }
                        div.buttons {
                            input."button-1".checkout-as-guest-button type="button" value="Checkout as Guest"
                                onclick="setLocation('/onepagecheckout')";
                            " "
                            input."button-1".register-button type="button" value="Register"
                                onclick="setLocation('/register')";
                        }
                    }
                    div.returning-wrapper {
                        div.title { strong { "Returning Customer" } }
                        div.buttons { a href="/login" { "Log in" } }
                    }
                }
            }
        }
    };
    layout(chrome, Some("Login"), body)
}

pub fn customer_info_page(chrome: &Chrome<'_>, account: &Account) -> String {
    let body = html! {
        div.page.account-page.customer-info-page {
            div.page-title { h1 { "My account - Customer info" } }
            div.page-body {
                div.form-fields {
                    div.inputs { label for="FirstName" { "First name:" } input #FirstName type="text" name="FirstName" value=(account.first_name); }
                    div.inputs { label for="LastName" { "Last name:" } input #LastName type="text" name="LastName" value=(account.last_name); }
                    div.inputs { label for="Email" { "Email:" } input #Email type="text" name="Email" value=(account.email); }
                }
            }
        }
    };
    layout(chrome, Some("Account"), body)
}

/// Messages carried over to the next cart view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMessages {
    pub warning: Option<String>,
    pub coupon: Option<String>,
    pub gift_card: Option<String>,
}

fn totals_row(label: &str, value: Markup) -> Markup {
    html! {
        tr {
            td.cart-total-left { span.nobr { (label) } }
            td.cart-total-right { span.nobr { (value) } }
        }
    }
}

pub fn cart_page(chrome: &Chrome<'_>, messages: &CartMessages) -> String {
    let subtotal = chrome.cart_subtotal();
    let body = html! {
        div.page.shopping-cart-page {
            div.page-title { h1 { "Shopping cart" } }
            div.page-body {
                @if chrome.cart.is_empty() {
                    div.order-summary-content { "Your Shopping Cart is empty!" }
                } @else {
                    div.order-summary-content {
                        form method="post" action="/cart" {
                            @if let Some(warning) = &messages.warning {
                                div.message-error { ul { li { (warning) } } }
                            }
                            table.cart {
                                thead {
                                    tr.cart-header-row {
                                        th { "Remove" }
                                        th { "Image" }
                                        th { "Product(s)" }
                                        th { "Price" }
                                        th { "Qty." }
                                        th { "Total" }
                                    }
                                }
                                tbody {
                                    @for (line, product) in chrome.cart {
                                        tr.cart-item-row {
                                            td.remove-from-cart {
                                                input type="checkbox" name="removefromcart" value=(line.id);
                                            }
                                            td.product-picture { (picture(product.name)) }
                                            td.product {
                                                a.product-name href=(product_href(product)) { (product.name) }
                                                div.edit-item { a href=(product_href(product)) { "Edit" } }
                                            }
                                            td.unit-price.nobr {
                                                span.product-unit-price { (price(product.price)) }
                                            }
                                            td.qty.nobr {
                                                input.qty-input type="text" name=(format!("itemquantity{}", line.id)) value=(line.quantity);
                                            }
                                            td.subtotal.nobr.end {
                                                span.product-subtotal { (price(line_total(product.price, line.quantity))) }
                                            }
                                        }
                                    }
                                }
                            }
                            div.buttons {
                                div.common-buttons {
                                    input."button-2".update-cart-button type="submit" name="updatecart" value="Update shopping cart";
                                    " "
                                    input."button-2".continue-shopping-button type="submit" name="continueshopping" value="Continue shopping";
                                }
                            }
                            div.cart-footer {
                                div.cart-collaterals {
                                    div.deals {
                                        div.coupon-box {
                                            div.title { strong { "Discount Code" } }
                                            div.hint { "Enter your coupon here" }
                                            div.coupon-code {
                                                input.discount-coupon-code type="text" name="discountcouponcode";
                                                input."button-2".apply-discount-coupon-code-button type="submit" name="applydiscountcouponcode" value="Apply coupon";
                                            }
                                            @if let Some(message) = &messages.coupon {
                                                div.message { (message) }
                                            }
                                        }
                                        div.giftcard-box {
                                            div.title { strong { "Gift Cards" } }
                                            div.hint { "Enter gift card code" }
                                            div.coupon-code {
                                                input.gift-card-coupon-code type="text" name="giftcardcouponcode";
                                                input."button-2".apply-gift-card-coupon-code-button type="submit" name="applygiftcardcouponcode" value="Add gift card";
                                            }
                                            @if let Some(message) = &messages.gift_card {
                                                div.message { (message) }
                                            }
                                        }
                                    }
                                }
                                div.totals {
                                    div.total-info {
                                        table.cart-total {
                                            tbody {
                                                (totals_row("Sub-Total:", html! { span.product-price { (price(subtotal)) } }))
                                                (totals_row("Shipping:", html! { "Calculated during checkout" }))
                                                (totals_row("Tax:", html! { span.product-price { (price(Decimal::ZERO)) } }))
                                                (totals_row("Total:", html! { span.product-price.order-total { strong { (price(subtotal)) } } }))
                                            }
                                        }
                                    }
                                    div.terms-of-service {
                                        input #termsofservice type="checkbox" name="termsofservice";
                                        " "
                                        label for="termsofservice" { "I agree with the terms of service and I adhere to them unconditionally" }
                                    }
                                    div #terms-of-service-warning-box.terms-of-service-warning-box style="display: none" {
                                        p { "Please accept the terms of service before the next step." }
                                    }
                                    div.checkout-buttons {
                                        button #checkout."button-1".checkout-button type="submit" name="checkout" value="checkout" onclick="return checkTerms()" { "Checkout" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };
    layout(chrome, Some("Shopping Cart"), body)
}

pub fn checkout_page(chrome: &Chrome<'_>) -> String {
    let body = html! {
        div.page.checkout-page {
            div.page-title { h1 { "Checkout" } }
            div.page-body {
                ol.opc #checkout-steps {
                    li #opc-billing.tab-section.allow.active {
                        div.step-title { span.number { "1" } h2.title { "Billing address" } }
                    }
                }
                div.order-summary { "Order total: " strong { (price(chrome.cart_subtotal())) } }
            }
        }
    };
    layout(chrome, Some("Checkout"), body)
}

pub fn not_found_page(chrome: &Chrome<'_>) -> String {
    let body = html! {
        div.page.page-not-found {
            div.page-title { h1 { "Page not found" } }
            div.page-body { "The page you requested was not found." }
        }
    };
    layout(chrome, Some("Page not found"), body)
}

/// Bare page for failures that happen before the frame can be built.
pub fn error_page(status: StatusCode, message: &str) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head { meta charset="utf-8"; title { (SITE_NAME) ". " (status.to_string()) } }
            body {
                div.page.error-page {
                    div.page-title { h1 { (status.to_string()) } }
                    div.page-body { p { (message) } }
                }
            }
        }
    }
    .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chrome<'a>(catalog: &'a Catalog, cart: &'a [(CartLine, &'a Product)]) -> Chrome<'a> {
        Chrome {
            catalog,
            customer: None,
            cart,
            notice: None,
            search_term: None,
        }
    }

    #[test]
    fn test_price_has_two_decimals() {
        assert_eq!(price(Decimal::new(10, 0)), "10.00");
        assert_eq!(price(Decimal::new(1590, 0)), "1590.00");
        assert_eq!(price(Decimal::new(500, 2)), "5.00");
    }

    #[test]
    fn test_header_counter_sums_quantities() {
        let catalog = Catalog::demo();
        let book = catalog.product("fiction").unwrap();
        let lines = [(
            CartLine {
                id: 1,
                product_id: book.id,
                quantity: 3,
            },
            book,
        )];
        let html = home_page(&chrome(&catalog, &lines));
        assert!(html.contains(r#"<span class="cart-qty">(3)</span>"#));
        assert!(html.contains("<strong>72.00</strong>"));
    }

    #[test]
    fn test_anonymous_header_links() {
        let catalog = Catalog::demo();
        let html = home_page(&chrome(&catalog, &[]));
        assert!(html.contains(r#"class="ico-login""#));
        assert!(!html.contains(r#"class="ico-logout""#));
        assert!(html.contains("<title>Demo Web Shop</title>"));
    }

    #[test]
    fn test_field_errors_are_bound_to_fields() {
        let catalog = Catalog::demo();
        let errors = [FieldError {
            field: "Email",
            message: "Wrong email",
        }];
        let html = register_page(&chrome(&catalog, &[]), &RegisterForm::default(), &errors, None);
        assert!(html.contains(
            r#"<span class="field-validation-error" data-valmsg-for="Email"><span>Wrong email</span></span>"#
        ));
        assert!(html.contains(r#"<span class="field-validation-valid" data-valmsg-for="FirstName"></span>"#));
    }

    #[test]
    fn test_empty_cart_has_no_checkout() {
        let catalog = Catalog::demo();
        let html = cart_page(&chrome(&catalog, &[]), &CartMessages::default());
        assert!(html.contains("Your Shopping Cart is empty!"));
        assert!(!html.contains(r#"name="checkout""#));
    }
}
