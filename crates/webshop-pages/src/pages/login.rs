// Login page - /login, header account links and logout

use super::base::{BasePage, PageObject};
use crate::credentials::Credentials;
use crate::error::Result;
use playwright_rs::{Locator, expect};
use std::ops::Deref;
use std::time::Duration;
use tracing::debug;

const LOGIN_LINK: &str = "a.ico-login";
const PAGE_HEADING: &str = "h1";
const EMAIL: &str = "#Email";
const PASSWORD: &str = "#Password";
const LOGIN_BUTTON: &str = ".login-button";
const REMEMBER_ME: &str = "#RememberMe";
const LOGOUT_LINK: &str = "a.ico-logout";
const ACCOUNT_LINK: &str = "a.account";
const VALIDATION_ERROR: &str = ".field-validation-error";
const VALIDATION_SUMMARY: &str = ".validation-summary-errors";

/// Budget for the soft logged-in check
const LOGGED_IN_PROBE: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct LoginPage {
    base: BasePage,
}

impl PageObject for LoginPage {
    fn from_base(base: BasePage) -> Self {
        Self { base }
    }

    fn base(&self) -> &BasePage {
        &self.base
    }
}

impl Deref for LoginPage {
    type Target = BasePage;

    fn deref(&self) -> &BasePage {
        &self.base
    }
}

impl LoginPage {
    pub fn new(page: &playwright_rs::Page, base_url: &url::Url) -> Self {
        Self::from_base(BasePage::new(page, base_url))
    }

    pub async fn login_link(&self) -> Locator {
        self.locator(LOGIN_LINK).await
    }

    pub async fn page_heading(&self) -> Locator {
        self.locator(PAGE_HEADING).await
    }

    pub async fn logout_link(&self) -> Locator {
        self.locator(LOGOUT_LINK).await
    }

    /// Header link showing the signed-in email
    pub async fn account_link(&self) -> Locator {
        self.locator(ACCOUNT_LINK).await.first()
    }

    pub async fn validation_error(&self) -> Locator {
        self.locator(VALIDATION_ERROR).await
    }

    pub async fn validation_summary(&self) -> Locator {
        self.locator(VALIDATION_SUMMARY).await
    }

    pub async fn navigate_to_login_page(&self) -> Result<()> {
        self.navigate("/").await?;
        let link = self.login_link().await;
        self.click_and_wait_for_navigation(&link).await
    }

    pub async fn verify_on_login_page(&self) -> Result<()> {
        self.expect_url_matches(r".*/login").await?;
        expect(self.page_heading().await)
            .to_contain_text("Welcome, Please Sign In!")
            .await?;
        Ok(())
    }

    pub async fn fill_email(&self, email: &str) -> Result<()> {
        self.locator(EMAIL).await.fill(email, None).await?;
        Ok(())
    }

    pub async fn fill_password(&self, password: &str) -> Result<()> {
        self.locator(PASSWORD).await.fill(password, None).await?;
        Ok(())
    }

    pub async fn check_remember_me(&self) -> Result<()> {
        self.locator(REMEMBER_ME).await.check(None).await?;
        Ok(())
    }

    pub async fn click_login_button(&self) -> Result<()> {
        self.locator(LOGIN_BUTTON).await.click(None).await?;
        Ok(())
    }

    /// Fills both fields, optionally ticks "Remember me", and submits.
    pub async fn login(&self, email: &str, password: &str, remember_me: bool) -> Result<()> {
        debug!(email, remember_me, "login");
        self.fill_email(email).await?;
        self.fill_password(password).await?;
        if remember_me {
            self.check_remember_me().await?;
        }
        self.click_login_button().await
    }

    pub async fn login_with_credentials(
        &self,
        credentials: &Credentials,
        remember_me: bool,
    ) -> Result<()> {
        self.login(&credentials.email, &credentials.password, remember_me)
            .await
    }

    pub async fn logout(&self) -> Result<()> {
        debug!("logout");
        let link = self.logout_link().await;
        self.click_and_wait_for_navigation(&link).await
    }

    pub async fn verify_logged_in(&self) -> Result<()> {
        expect(self.logout_link().await).to_be_visible().await?;
        expect(self.account_link().await).to_be_visible().await?;
        Ok(())
    }

    pub async fn verify_logged_out(&self) -> Result<()> {
        expect(self.login_link().await).to_be_visible().await?;
        expect(self.logout_link().await).not().to_be_visible().await?;
        Ok(())
    }

    pub async fn verify_user_email(&self, email: &str) -> Result<()> {
        expect(self.account_link().await)
            .to_contain_text(email)
            .await?;
        Ok(())
    }

    /// Asserts the first message in the validation summary contains `text`.
    pub async fn verify_login_error(&self, text: &str) -> Result<()> {
        let message = self.validation_summary().await.locator("li, span").first();
        expect(message).to_contain_text(text).await?;
        Ok(())
    }

    /// Soft check: is the logout link visible within a short budget?
    pub async fn is_logged_in(&self) -> Result<bool> {
        let logout = self.logout_link().await;
        Ok(self.probe(logout, LOGGED_IN_PROBE).await?.is_some())
    }

    pub async fn refresh_page(&self) -> Result<()> {
        self.reload().await
    }
}
