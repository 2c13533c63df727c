// Registration page - /register and /registerresult
//
// Fills the account form, submits it and checks the outcome: the result
// page on success, field-level or summary errors otherwise.

use super::base::{BasePage, PageObject, has_text};
use crate::error::Result;
use playwright_rs::{Locator, expect};
use std::ops::Deref;
use tracing::debug;

const REGISTER_LINK: &str = "a.ico-register";
const PAGE_HEADING: &str = "h1";
const GENDER_MALE: &str = "#gender-male";
const GENDER_FEMALE: &str = "#gender-female";
const FIRST_NAME: &str = "#FirstName";
const LAST_NAME: &str = "#LastName";
const EMAIL: &str = "#Email";
const PASSWORD: &str = "#Password";
const CONFIRM_PASSWORD: &str = "#ConfirmPassword";
const REGISTER_BUTTON: &str = "#register-button";
const RESULT: &str = ".result";
const CONTINUE_BUTTON: &str = ".button-1.register-continue-button";
const VALIDATION_ERROR: &str = ".field-validation-error";
const ERROR_MESSAGE: &str = ".message-error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

/// Registration form contents. Fields left as `None` are not touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub gender: Option<Gender>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl Registration {
    /// A complete form with matching password and confirmation.
    pub fn new_user(
        gender: Gender,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Self {
        Self {
            gender: Some(gender),
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            confirm_password: Some(password.to_string()),
        }
    }

    pub fn with_confirm_password(mut self, confirm_password: &str) -> Self {
        self.confirm_password = Some(confirm_password.to_string());
        self
    }
}

/// Account registration form.
#[derive(Clone)]
pub struct RegistrationPage {
    base: BasePage,
}

impl PageObject for RegistrationPage {
    fn from_base(base: BasePage) -> Self {
        Self { base }
    }

    fn base(&self) -> &BasePage {
        &self.base
    }
}

impl Deref for RegistrationPage {
    type Target = BasePage;

    fn deref(&self) -> &BasePage {
        &self.base
    }
}

impl RegistrationPage {
    pub fn new(page: &playwright_rs::Page, base_url: &url::Url) -> Self {
        Self::from_base(BasePage::new(page, base_url))
    }

    pub async fn register_link(&self) -> Locator {
        self.locator(REGISTER_LINK).await
    }

    pub async fn page_heading(&self) -> Locator {
        self.locator(PAGE_HEADING).await
    }

    pub async fn success_message(&self) -> Locator {
        self.locator(RESULT).await
    }

    pub async fn continue_button(&self) -> Locator {
        self.locator(CONTINUE_BUTTON).await
    }

    pub async fn validation_error(&self) -> Locator {
        self.locator(VALIDATION_ERROR).await
    }

    pub async fn error_message(&self) -> Locator {
        self.locator(ERROR_MESSAGE).await
    }

    /// Error span bound to one form field (`FirstName`, `Email`, ...)
    pub async fn field_error(&self, field: &str) -> Locator {
        self.locator(&format!(
            r#"span.field-validation-error[data-valmsg-for="{field}"]"#
        ))
        .await
    }

    /// Opens the home page and follows the header's Register link.
    pub async fn navigate_to_registration_page(&self) -> Result<()> {
        self.navigate("/").await?;
        let link = self.register_link().await;
        self.click_and_wait_for_navigation(&link).await
    }

    pub async fn verify_on_registration_page(&self) -> Result<()> {
        self.expect_url_matches(r".*/register")
            .await?;
        expect(self.page_heading().await)
            .to_contain_text("Register")
            .await?;
        Ok(())
    }

    pub async fn select_gender(&self, gender: Gender) -> Result<()> {
        let selector = match gender {
            Gender::Male => GENDER_MALE,
            Gender::Female => GENDER_FEMALE,
        };
        self.locator(selector).await.check(None).await?;
        Ok(())
    }

    pub async fn fill_first_name(&self, first_name: &str) -> Result<()> {
        self.locator(FIRST_NAME).await.fill(first_name, None).await?;
        Ok(())
    }

    pub async fn fill_last_name(&self, last_name: &str) -> Result<()> {
        self.locator(LAST_NAME).await.fill(last_name, None).await?;
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

    pub async fn fill_confirm_password(&self, password: &str) -> Result<()> {
        self.locator(CONFIRM_PASSWORD)
            .await
            .fill(password, None)
            .await?;
        Ok(())
    }

    pub async fn click_register_button(&self) -> Result<()> {
        self.locator(REGISTER_BUTTON).await.click(None).await?;
        Ok(())
    }

    /// Fills only the fields present in `form`.
    pub async fn fill_registration_form(&self, form: &Registration) -> Result<()> {
        if let Some(gender) = form.gender {
            self.select_gender(gender).await?;
        }
        if let Some(first_name) = &form.first_name {
            self.fill_first_name(first_name).await?;
        }
        if let Some(last_name) = &form.last_name {
            self.fill_last_name(last_name).await?;
        }
        if let Some(email) = &form.email {
            self.fill_email(email).await?;
        }
        if let Some(password) = &form.password {
            self.fill_password(password).await?;
        }
        if let Some(confirm_password) = &form.confirm_password {
            self.fill_confirm_password(confirm_password).await?;
        }
        Ok(())
    }

    pub async fn register_user(&self, form: &Registration) -> Result<()> {
        debug!(email = ?form.email, "register user");
        self.fill_registration_form(form).await?;
        self.click_register_button().await
    }

    pub async fn verify_successful_registration(&self) -> Result<()> {
        self.expect_url_matches(r".*/registerresult").await?;
        expect(self.success_message().await)
            .to_contain_text("Your registration completed")
            .await?;
        expect(self.continue_button().await).to_be_visible().await?;
        Ok(())
    }

    /// Asserts a field-level validation error containing `text`, still on the form.
    pub async fn verify_validation_error(&self, text: &str) -> Result<()> {
        let error = self
            .locator(&has_text(VALIDATION_ERROR, text))
            .await
            .first();
        expect(error).to_contain_text(text).await?;
        self.expect_url_matches(r".*/register").await
    }

    /// Asserts the summary error (e.g. duplicate email).
    pub async fn verify_error_message(&self, text: &str) -> Result<()> {
        expect(self.error_message().await)
            .to_contain_text(text)
            .await?;
        Ok(())
    }

    pub async fn verify_required_field_errors(&self) -> Result<()> {
        for (field, message) in [
            ("FirstName", "First name is required"),
            ("LastName", "Last name is required"),
            ("Email", "Email is required"),
            ("Password", "Password is required"),
        ] {
            expect(self.field_error(field).await)
                .to_contain_text(message)
                .await?;
        }
        self.expect_url_matches(r".*/register").await
    }

    /// Asserts that some visible validation error mentions the password.
    pub async fn verify_password_validation_error(&self) -> Result<()> {
        let error = self
            .locator(&has_text(VALIDATION_ERROR, "password"))
            .await
            .first();
        expect(error).to_be_visible().await?;
        self.expect_url_matches(r".*/register").await
    }
}
