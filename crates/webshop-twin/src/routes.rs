// Route handlers
//
// Every page view loads the visitor (signed-in email, cart, pending notice)
// from the session, renders, and consumes one-shot messages. Form posts
// redirect back with 303 so a reload never resubmits.

use axum::{
    Router,
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};
use tracing::{debug, info};

use crate::accounts::{LoginFailure, LoginForm, RegisterForm, validate_login, validate_registration};
use crate::cart::{Cart, MAX_QUANTITY};
use crate::catalog::{MIN_SEARCH_LENGTH, sort_products};
use crate::error::{TwinError, TwinResult};
use crate::listing::{Listing, ListingParams, paginate};
use crate::state::AppState;
use crate::views::{self, CartMessages, Chrome, Notice, SearchOutcome};

/// Session keys
mod keys {
    pub const CUSTOMER: &str = "customer_email";
    pub const CART: &str = "cart";
    pub const NOTICE: &str = "notice";
    pub const CART_MESSAGES: &str = "cart_messages";
    pub const COMPARE: &str = "compare_products";
}

pub const SESSION_COOKIE_NAME: &str = "Nop.customer";

const REMEMBER_ME_DAYS: i64 = 30;

const COUPON_REJECTED: &str = "The coupon code you entered couldn't be applied to your order";
const GIFT_CARD_REJECTED: &str = "The gift card code you entered couldn't be applied to your order";
const TERMS_NOT_ACCEPTED: &str = "Please accept the terms of service before the next step.";

pub fn router(state: AppState) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/");

    Router::new()
        .route("/", get(home))
        .route("/register", get(register_form).post(register_submit))
        .route("/registerresult/{id}", get(register_result))
        .route("/login", get(login_form).post(login_submit))
        .route("/login/checkoutasguest", get(checkout_as_guest))
        .route("/logout", get(logout))
        .route("/customer/info", get(customer_info))
        .route("/cart", get(cart_view).post(cart_submit))
        .route("/onepagecheckout", get(checkout))
        .route("/wishlist", get(wishlist))
        .route("/search", get(search))
        .route("/producttag/{tag}", get(product_tag))
        .route("/productreviews/{id}", get(product_reviews))
        .route("/productemailafriend/{id}", get(email_a_friend))
        .route("/compareproducts", get(compare_products))
        .route("/compareproducts/add/{id}", get(add_to_compare))
        .route("/addproducttocart/details/{id}", post(add_to_cart))
        .route("/{slug}", get(catalog_entry))
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Session-backed view of the current visitor.
struct Visitor {
    customer: Option<String>,
    cart: Cart,
    notice: Option<Notice>,
}

impl Visitor {
    /// Loads the visitor and consumes any pending notice.
    async fn load(session: &Session) -> TwinResult<Self> {
        Ok(Self {
            customer: session.get(keys::CUSTOMER).await?,
            cart: session.get(keys::CART).await?.unwrap_or_default(),
            notice: session.remove(keys::NOTICE).await?,
        })
    }

    fn render<F>(&self, state: &AppState, search_term: Option<&str>, view: F) -> Html<String>
    where
        F: FnOnce(&Chrome<'_>) -> String,
    {
        let lines = self.cart.resolve(state.catalog());
        let chrome = Chrome {
            catalog: state.catalog(),
            customer: self.customer.as_deref(),
            cart: &lines,
            notice: self.notice.as_ref(),
            search_term,
        };
        Html(view(&chrome))
    }
}

async fn load_cart(session: &Session) -> TwinResult<Cart> {
    Ok(session.get(keys::CART).await?.unwrap_or_default())
}

async fn home(State(state): State<AppState>, session: Session) -> TwinResult<Html<String>> {
    let visitor = Visitor::load(&session).await?;
    Ok(visitor.render(&state, None, views::home_page))
}

/// Top-level slugs name either a category or a product.
async fn catalog_entry(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ListingParams>,
    session: Session,
) -> TwinResult<Response> {
    let visitor = Visitor::load(&session).await?;
    let catalog = state.catalog();

    if let Some(category) = catalog.category(&slug) {
        let listing = Listing::new(format!("/{}", category.slug), &params);
        let mut products = catalog.in_category(category.slug);
        sort_products(&mut products, listing.order);
        let (page, pages) = paginate(&products, listing.page_size, listing.page);
        let html = visitor.render(&state, None, |chrome| {
            views::category_page(chrome, category, &listing, page, pages)
        });
        return Ok(html.into_response());
    }

    if let Some(product) = catalog.product(&slug) {
        let html = visitor.render(&state, None, |chrome| views::product_page(chrome, product));
        return Ok(html.into_response());
    }

    debug!(slug, "unknown page");
    let html = visitor.render(&state, None, views::not_found_page);
    Ok((StatusCode::NOT_FOUND, html).into_response())
}

async fn product_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    Query(params): Query<ListingParams>,
    session: Session,
) -> TwinResult<Html<String>> {
    let visitor = Visitor::load(&session).await?;
    let mut products = state.catalog().tagged(&tag);
    if products.is_empty() {
        return Err(TwinError::NotFound(format!("tag '{tag}'")));
    }
    let listing = Listing::new(format!("/producttag/{tag}"), &params);
    sort_products(&mut products, listing.order);
    let (page, pages) = paginate(&products, listing.page_size, listing.page);
    Ok(visitor.render(&state, None, |chrome| {
        views::tag_page(chrome, &tag, &listing, page, pages)
    }))
}

async fn product_reviews(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    session: Session,
) -> TwinResult<Html<String>> {
    let visitor = Visitor::load(&session).await?;
    let product = state
        .catalog()
        .product_by_id(id)
        .ok_or_else(|| TwinError::NotFound(format!("product {id}")))?;
    Ok(visitor.render(&state, None, |chrome| views::product_reviews_page(chrome, product)))
}

async fn email_a_friend(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    session: Session,
) -> TwinResult<Html<String>> {
    let visitor = Visitor::load(&session).await?;
    let product = state
        .catalog()
        .product_by_id(id)
        .ok_or_else(|| TwinError::NotFound(format!("product {id}")))?;
    Ok(visitor.render(&state, None, |chrome| views::email_a_friend_page(chrome, product)))
}

async fn add_to_compare(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    session: Session,
) -> TwinResult<Redirect> {
    if state.catalog().product_by_id(id).is_none() {
        return Err(TwinError::NotFound(format!("product {id}")));
    }
    let mut compared: Vec<u32> = session.get(keys::COMPARE).await?.unwrap_or_default();
    if !compared.contains(&id) {
        compared.push(id);
    }
    session.insert(keys::COMPARE, &compared).await?;
    Ok(Redirect::to("/compareproducts"))
}

async fn compare_products(
    State(state): State<AppState>,
    session: Session,
) -> TwinResult<Html<String>> {
    let visitor = Visitor::load(&session).await?;
    let compared: Vec<u32> = session.get(keys::COMPARE).await?.unwrap_or_default();
    let products: Vec<_> = compared
        .iter()
        .filter_map(|id| state.catalog().product_by_id(*id))
        .collect();
    Ok(visitor.render(&state, None, |chrome| views::compare_page(chrome, &products)))
}

async fn wishlist(State(state): State<AppState>, session: Session) -> TwinResult<Html<String>> {
    let visitor = Visitor::load(&session).await?;
    Ok(visitor.render(&state, None, views::wishlist_page))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
    session: Session,
) -> TwinResult<Html<String>> {
    let visitor = Visitor::load(&session).await?;
    let term = params.q.as_deref().map(str::trim).unwrap_or_default();
    let listing = Listing::new("/search", &params);

    if params.q.is_none() {
        return Ok(visitor.render(&state, None, |chrome| {
            views::search_page(chrome, SearchOutcome::Idle)
        }));
    }
    if term.chars().count() < MIN_SEARCH_LENGTH {
        return Ok(visitor.render(&state, Some(term), |chrome| {
            views::search_page(chrome, SearchOutcome::TooShort(MIN_SEARCH_LENGTH))
        }));
    }

    let mut products = state.catalog().search(term);
    sort_products(&mut products, listing.order);
    let (page, pages) = paginate(&products, listing.page_size, listing.page);
    debug!(term, found = products.len(), "search");
    Ok(visitor.render(&state, Some(term), |chrome| {
        views::search_page(
            chrome,
            SearchOutcome::Results {
                listing: &listing,
                products: page,
                pages,
            },
        )
    }))
}

async fn add_to_cart(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    session: Session,
    Form(fields): Form<Vec<(String, String)>>,
) -> TwinResult<Redirect> {
    let product = state
        .catalog()
        .product_by_id(id)
        .ok_or_else(|| TwinError::NotFound(format!("product {id}")))?;
    let requested = fields
        .iter()
        .find(|(name, _)| name.ends_with(".EnteredQuantity"))
        .map_or(Ok(1), |(_, value)| value.trim().parse::<i64>());

    let notice = match requested {
        Ok(quantity) if quantity > 0 => {
            let quantity = u32::try_from(quantity).unwrap_or(MAX_QUANTITY);
            let mut cart = load_cart(&session).await?;
            cart.add(product.id, quantity);
            session.insert(keys::CART, &cart).await?;
            info!(product = product.slug, quantity, "added to cart");
            Notice::success("The product has been added to your shopping cart")
        }
        _ => {
            debug!(product = product.slug, ?requested, "rejected quantity");
            Notice::error("Quantity should be positive")
        }
    };
    session.insert(keys::NOTICE, &notice).await?;
    Ok(Redirect::to(&format!("/{}", product.slug)))
}

async fn cart_view(State(state): State<AppState>, session: Session) -> TwinResult<Html<String>> {
    let visitor = Visitor::load(&session).await?;
    let messages: CartMessages = session
        .remove(keys::CART_MESSAGES)
        .await?
        .unwrap_or_default();
    Ok(visitor.render(&state, None, |chrome| views::cart_page(chrome, &messages)))
}

/// Where the cart form's buttons lead. Only the clicked submit button is
/// part of the posted form, so its name tells which one it was.
async fn cart_submit(
    session: Session,
    Form(fields): Form<Vec<(String, String)>>,
) -> TwinResult<Redirect> {
    let has = |name: &str| fields.iter().any(|(key, _)| key == name);
    let mut cart = load_cart(&session).await?;
    let mut messages = CartMessages::default();

    if has("continueshopping") {
        return Ok(Redirect::to("/"));
    }

    if has("checkout") {
        if !has("termsofservice") {
            messages.warning = Some(TERMS_NOT_ACCEPTED.to_string());
        } else if !cart.is_empty() {
            let signed_in = session.get::<String>(keys::CUSTOMER).await?.is_some();
            return Ok(if signed_in {
                Redirect::to("/onepagecheckout")
            } else {
                Redirect::to("/login/checkoutasguest?returnUrl=%2Fcart")
            });
        }
    } else if has("applydiscountcouponcode") {
        debug!("coupon rejected");
        messages.coupon = Some(COUPON_REJECTED.to_string());
    } else if has("applygiftcardcouponcode") {
        debug!("gift card rejected");
        messages.gift_card = Some(GIFT_CARD_REJECTED.to_string());
    } else {
        let mut invalid = false;
        for (key, value) in &fields {
            let Some(line_id) = key
                .strip_prefix("itemquantity")
                .and_then(|id| id.parse::<u32>().ok())
            else {
                continue;
            };
            match value.trim().parse::<u32>() {
                Ok(quantity) => cart.set_quantity(line_id, quantity),
                Err(_) => invalid = true,
            }
        }
        let removed: Vec<u32> = fields
            .iter()
            .filter(|(key, _)| key == "removefromcart")
            .filter_map(|(_, value)| value.parse().ok())
            .collect();
        cart.remove(&removed);
        if invalid {
            messages.warning = Some("Quantity should be a positive number".to_string());
        }
        session.insert(keys::CART, &cart).await?;
        debug!(lines = cart.lines().len(), removed = removed.len(), "cart updated");
    }

    session.insert(keys::CART_MESSAGES, &messages).await?;
    Ok(Redirect::to("/cart"))
}

async fn checkout(State(state): State<AppState>, session: Session) -> TwinResult<Response> {
    let visitor = Visitor::load(&session).await?;
    if visitor.cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }
    if visitor.customer.is_none() {
        return Ok(Redirect::to("/login/checkoutasguest?returnUrl=%2Fcart").into_response());
    }
    Ok(visitor.render(&state, None, views::checkout_page).into_response())
}

async fn checkout_as_guest(
    State(state): State<AppState>,
    session: Session,
) -> TwinResult<Html<String>> {
    let visitor = Visitor::load(&session).await?;
    Ok(visitor.render(&state, None, views::checkout_as_guest_page))
}

async fn register_form(State(state): State<AppState>, session: Session) -> TwinResult<Html<String>> {
    let visitor = Visitor::load(&session).await?;
    Ok(visitor.render(&state, None, |chrome| {
        views::register_page(chrome, &RegisterForm::default(), &[], None)
    }))
}

async fn register_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> TwinResult<Response> {
    let errors = validate_registration(&form);
    let summary = if !errors.is_empty() {
        None
    } else if state.accounts().register(&form).await {
        session.insert(keys::CUSTOMER, form.email.trim()).await?;
        info!(email = form.email.trim(), "registered");
        return Ok(Redirect::to("/registerresult/1").into_response());
    } else {
        Some("The specified email already exists")
    };

    debug!(errors = errors.len(), duplicate = summary.is_some(), "registration rejected");
    let visitor = Visitor::load(&session).await?;
    let html = visitor.render(&state, None, |chrome| {
        views::register_page(chrome, &form, &errors, summary)
    });
    Ok(html.into_response())
}

async fn register_result(
    State(state): State<AppState>,
    Path(_id): Path<u32>,
    session: Session,
) -> TwinResult<Html<String>> {
    let visitor = Visitor::load(&session).await?;
    Ok(visitor.render(&state, None, views::register_result_page))
}

#[derive(Debug, Default, Deserialize)]
struct ReturnTo {
    #[serde(rename = "ReturnUrl", alias = "returnUrl")]
    return_url: Option<String>,
}

impl ReturnTo {
    /// Local paths only; anything else falls back to the home page.
    fn target(&self) -> &str {
        match self.return_url.as_deref() {
            Some(url) if url.starts_with('/') && !url.starts_with("//") => url,
            _ => "/",
        }
    }

    fn login_action(&self) -> String {
        match &self.return_url {
            Some(url) => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("ReturnUrl", url)
                    .finish();
                format!("/login?{query}")
            }
            None => "/login".to_string(),
        }
    }
}

async fn login_form(
    State(state): State<AppState>,
    Query(return_to): Query<ReturnTo>,
    session: Session,
) -> TwinResult<Html<String>> {
    let visitor = Visitor::load(&session).await?;
    let action = return_to.login_action();
    Ok(visitor.render(&state, None, |chrome| {
        views::login_page(chrome, &action, "", &[], None)
    }))
}

async fn login_submit(
    State(state): State<AppState>,
    Query(return_to): Query<ReturnTo>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> TwinResult<Response> {
    let errors = validate_login(&form);
    let outcome = if errors.is_empty() {
        state.accounts().authenticate(&form.email, &form.password).await
    } else {
        Err(LoginFailure::NoAccount)
    };

    match outcome {
        Ok(email) => {
            if form.remember_me.is_some() {
                session.set_expiry(Some(Expiry::OnInactivity(
                    tower_sessions::cookie::time::Duration::days(REMEMBER_ME_DAYS),
                )));
            }
            session.insert(keys::CUSTOMER, &email).await?;
            info!(%email, remember_me = form.remember_me.is_some(), "signed in");
            Ok(Redirect::to(return_to.target()).into_response())
        }
        Err(failure) => {
            debug!(email = %form.email, ?failure, "sign-in rejected");
            let visitor = Visitor::load(&session).await?;
            let action = return_to.login_action();
            let html = visitor.render(&state, None, |chrome| {
                views::login_page(chrome, &action, &form.email, &errors, Some(failure.message()))
            });
            Ok(html.into_response())
        }
    }
}

/// Signing out starts a fresh guest: the cart goes with the old session.
async fn logout(session: Session) -> TwinResult<Redirect> {
    session.flush().await?;
    Ok(Redirect::to("/"))
}

async fn customer_info(State(state): State<AppState>, session: Session) -> TwinResult<Response> {
    let visitor = Visitor::load(&session).await?;
    let account = match &visitor.customer {
        Some(email) => state.accounts().find(email).await,
        None => None,
    };
    let Some(account) = account else {
        return Ok(Redirect::to("/login?ReturnUrl=%2Fcustomer%2Finfo").into_response());
    };
    let html = visitor.render(&state, None, |chrome| views::customer_info_page(chrome, &account));
    Ok(html.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::default())
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn get_page(uri: &str) -> Response {
        app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn position(html: &str, needle: &str) -> usize {
        html.find(needle)
            .unwrap_or_else(|| panic!("'{needle}' not in page"))
    }

    #[tokio::test]
    async fn test_search_sorts_by_price_ascending() {
        let response = get_page("/search?q=phone&orderby=10").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        let used = position(&html, ">Used phone</a>");
        let cover = position(&html, ">Phone Cover</a>");
        let smart = position(&html, ">Smartphone</a>");
        assert!(used < cover && cover < smart);
    }

    #[tokio::test]
    async fn test_search_without_matches() {
        let html = body_text(get_page("/search?q=xyznonexistentproduct123").await).await;
        assert!(html.contains("No products were found that matched your criteria."));
        assert!(!html.contains("product-item"));
    }

    #[tokio::test]
    async fn test_search_page_size_limits_results() {
        let html = body_text(get_page("/search?q=phone&pagesize=4").await).await;
        assert_eq!(html.matches(r#"class="product-item""#).count(), 3);
        let html = body_text(get_page("/jewelry?pagesize=4").await).await;
        assert_eq!(html.matches(r#"class="product-item""#).count(), 2);
    }

    #[tokio::test]
    async fn test_short_search_term_warns() {
        let html = body_text(get_page("/search?q=ph").await).await;
        assert!(html.contains("Search term minimum length is 3 characters"));
    }

    #[tokio::test]
    async fn test_anonymous_customer_info_redirects_to_login() {
        let response = get_page("/customer/info").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get(header::LOCATION).unwrap();
        assert!(location.to_str().unwrap().starts_with("/login"));
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let response = get_page("/no-such-page").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_category_and_product_pages() {
        let html = body_text(get_page("/computers").await).await;
        assert!(html.contains("<h1>Computers</h1>"));
        assert!(html.contains(">Desktops</a>"));

        let html = body_text(get_page("/computing-and-internet").await).await;
        assert!(html.contains(r#"<span itemprop="price">10.00</span>"#));
        assert!(html.contains(r#"<div class="old-product-price"><span>30.00</span></div>"#));
        assert!(html.contains("Free shipping"));
    }

    #[tokio::test]
    async fn test_add_to_cart_then_view_cart() {
        let app = app();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/addproducttocart/details/13")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("addtocart_13.EnteredQuantity=5"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/cart")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains(r#"<span class="product-subtotal">50.00</span>"#));
        assert!(html.contains(r#"<span class="cart-qty">(5)</span>"#));
    }

    #[test]
    fn test_return_url_must_be_local() {
        let local = ReturnTo {
            return_url: Some("/customer/info".into()),
        };
        assert_eq!(local.target(), "/customer/info");
        assert_eq!(local.login_action(), "/login?ReturnUrl=%2Fcustomer%2Finfo");

        let external = ReturnTo {
            return_url: Some("//evil.example".into()),
        };
        assert_eq!(external.target(), "/");
        assert_eq!(ReturnTo::default().login_action(), "/login");
    }
}
