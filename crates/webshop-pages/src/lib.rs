//! webshop-pages: page objects for the Tricentis Demo Web Shop
//!
//! Wraps `playwright-rs` pages in typed page objects for the storefront's
//! registration, login, catalogue, search and cart screens, plus the
//! configuration, session and shared-account plumbing the flow tests use.
//!
//! # Running the flow tests
//!
//! A plain `cargo test` never touches the public demo site. Every flow test
//! starts its own `webshop-twin` storefront on a loopback port and drives the
//! browser against that. To run the same journeys against the real
//! Demo Web Shop, opt in:
//!
//! ```bash
//! WEBSHOP_LIVE=1 PASSWORD='...' cargo test -p webshop-pages
//! ```
//!
//! `WEBSHOP_BASE_URL` overrides the live address; the remaining variables are
//! described on [`Config::from_env`].
//!
//! # Examples
//!
//! ## Add a product and check the cart
//!
//! ```ignore
//! use webshop_pages::{CartPage, Config, ProductDetailsPage, Session};
//!
//! #[tokio::main]
//! async fn main() -> webshop_pages::Result<()> {
//!     let config = Config::from_env()?;
//!     let session = Session::start(&config).await?;
//!
//!     let product: ProductDetailsPage = session.open();
//!     product.navigate_to_product("/computing-and-internet").await?;
//!     product.add_to_cart(1).await?;
//!     product.verify_add_to_cart_success().await?;
//!
//!     let cart: CartPage = session.open();
//!     cart.navigate_to_cart().await?;
//!     cart.verify_product_in_cart("Computing and Internet").await?;
//!
//!     session.close().await
//! }
//! ```
//!
//! ## Share one registered account across tests
//!
//! ```ignore
//! use webshop_pages::{Config, LoginPage, Session, SharedAccount};
//!
//! static ACCOUNT: SharedAccount = SharedAccount::new();
//!
//! #[tokio::test]
//! async fn test_login() -> webshop_pages::Result<()> {
//!     let config = Config::from_env()?;
//!     let credentials = ACCOUNT.get_or_register(&config).await?;
//!
//!     let session = Session::start(&config).await?;
//!     let login: LoginPage = session.open();
//!     login.navigate_to_login_page().await?;
//!     login.login_with_credentials(credentials, false).await?;
//!     login.verify_logged_in().await?;
//!     session.close().await
//! }
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod pages;
pub mod parse;
pub mod session;

pub use config::{BrowserKind, Config};
pub use credentials::{
    CredentialStore, Credentials, SharedAccount, generate_unique_email, register_account,
};
pub use error::{Error, Result};
pub use pages::{
    BasePage, CartPage, CategoryPage, Gender, LoadState, LoginPage, PageObject, PageSize,
    ProductDetailsPage, Registration, RegistrationPage, SearchPage, SortBy, ViewMode,
};
pub use session::Session;
