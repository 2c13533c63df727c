//! Customer accounts and the form validation around them.

use std::collections::HashMap;

use serde::Deserialize;
use tokio::sync::Mutex;

pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Registration form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "FirstName", default)]
    pub first_name: String,
    #[serde(rename = "LastName", default)]
    pub last_name: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Password", default)]
    pub password: String,
    #[serde(rename = "ConfirmPassword", default)]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Password", default)]
    pub password: String,
    #[serde(rename = "RememberMe", default)]
    pub remember_me: Option<String>,
}

/// A message bound to one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Field-level problems with a registration form, in form order.
pub fn validate_registration(form: &RegisterForm) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if form.first_name.trim().is_empty() {
        errors.push(FieldError::new("FirstName", "First name is required."));
    }
    if form.last_name.trim().is_empty() {
        errors.push(FieldError::new("LastName", "Last name is required."));
    }
    let email = form.email.trim();
    if email.is_empty() {
        errors.push(FieldError::new("Email", "Email is required."));
    } else if !looks_like_email(email) {
        errors.push(FieldError::new("Email", "Wrong email"));
    }
    if form.password.is_empty() {
        errors.push(FieldError::new("Password", "Password is required."));
    } else if form.password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.push(FieldError::new(
            "Password",
            "The password should have at least 6 characters.",
        ));
    }
    if form.confirm_password.is_empty() {
        errors.push(FieldError::new("ConfirmPassword", "Password is required."));
    } else if form.confirm_password != form.password {
        errors.push(FieldError::new(
            "ConfirmPassword",
            "The password and confirmation password do not match.",
        ));
    }
    errors
}

pub fn validate_login(form: &LoginForm) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let email = form.email.trim();
    if email.is_empty() {
        errors.push(FieldError::new("Email", "Please enter your email"));
    } else if !looks_like_email(email) {
        errors.push(FieldError::new("Email", "Wrong email"));
    }
    errors
}

#[derive(Debug, Clone)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    NoAccount,
    WrongPassword,
}

impl LoginFailure {
    pub fn message(&self) -> &'static str {
        match self {
            LoginFailure::NoAccount => "No customer account found",
            LoginFailure::WrongPassword => "The credentials provided are incorrect",
        }
    }
}

/// Registered customers, keyed by lower-cased email.
#[derive(Debug, Default)]
pub struct Accounts {
    by_email: Mutex<HashMap<String, Account>>,
}

impl Accounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new account. Returns `false` if the email is taken.
    pub async fn register(&self, form: &RegisterForm) -> bool {
        let key = form.email.trim().to_lowercase();
        let mut accounts = self.by_email.lock().await;
        if accounts.contains_key(&key) {
            return false;
        }
        accounts.insert(
            key,
            Account {
                email: form.email.trim().to_string(),
                password: form.password.clone(),
                first_name: form.first_name.trim().to_string(),
                last_name: form.last_name.trim().to_string(),
            },
        );
        true
    }

    /// The account's email as registered, if the password matches.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, LoginFailure> {
        let accounts = self.by_email.lock().await;
        let account = accounts
            .get(&email.trim().to_lowercase())
            .ok_or(LoginFailure::NoAccount)?;
        if account.password != password {
            return Err(LoginFailure::WrongPassword);
        }
        Ok(account.email.clone())
    }

    pub async fn find(&self, email: &str) -> Option<Account> {
        self.by_email
            .lock()
            .await
            .get(&email.trim().to_lowercase())
            .cloned()
    }
}
