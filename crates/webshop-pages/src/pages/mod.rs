// Page objects for the Demo Web Shop storefront
//
// One type per page or page area. Each wraps a BasePage and derefs to it,
// so navigation and load-state helpers are available on every page object.

pub mod base;
pub mod cart;
pub mod category;
pub mod login;
pub mod product_details;
pub mod registration;
pub mod search;

pub use base::{ASSERTION_TIMEOUT, BasePage, LoadState, NAVIGATION_TIMEOUT, PageObject};
pub use cart::{CartPage, expected_line_total};
pub use category::CategoryPage;
pub use login::LoginPage;
pub use product_details::ProductDetailsPage;
pub use registration::{Gender, Registration, RegistrationPage};
pub use search::{
    PageSize, SearchPage, SortBy, ViewMode, is_sorted_ascending, is_sorted_by_name,
    is_sorted_descending,
};
