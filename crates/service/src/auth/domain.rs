use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::{validate_email, Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use super::errors::AuthError;

/// Registration input. Fields are optional so a missing key is reported as a
/// validation message instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(
        required(message = "\"email\" is required"),
        custom = "email_address"
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "\"name\" is required"),
        length(min = 4, max = 24, message = "\"name\" length must be between 4 and 24 characters")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "\"address\" is required"),
        length(min = 1, message = "\"address\" is not allowed to be empty")
    )]
    pub address: Option<String>,
    #[validate(
        required(message = "\"phone_number\" is required"),
        custom = "digits_only"
    )]
    pub phone_number: Option<String>,
    #[validate(
        required(message = "\"password\" is required"),
        length(min = 6, max = 24, message = "\"password\" length must be between 6 and 24 characters")
    )]
    pub password: Option<String>,
    /// Keys outside the schema; any entry fails the check.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Login input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(
        required(message = "\"email\" is required"),
        custom = "email_address"
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "\"password\" is required"),
        length(min = 6, max = 24, message = "\"password\" length must be between 6 and 24 characters")
    )]
    pub password: Option<String>,
    /// Keys outside the schema; any entry fails the check.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Verification attempt, taken from the query string.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct VerifyInput {
    #[validate(
        required(message = "\"base\" is required"),
        length(min = 1, message = "\"base\" is not allowed to be empty")
    )]
    pub base: Option<String>,
    #[validate(
        required(message = "\"secret\" is required"),
        length(min = 1, message = "\"secret\" is not allowed to be empty")
    )]
    pub secret: Option<String>,
    /// Keys outside the schema; any entry fails the check.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Resend input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ResendInput {
    #[validate(
        required(message = "\"email\" is required"),
        custom = "email_address"
    )]
    pub email: Option<String>,
    /// Keys outside the schema; any entry fails the check.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `validator`'s address check plus a dotted domain ending in an alphabetic TLD.
fn email_address(value: &str) -> Result<(), ValidationError> {
    let domain = value.rsplit_once('@').map(|(_, d)| d).unwrap_or_default();
    let labels: Vec<&str> = domain.split('.').collect();
    let tld = labels.last().copied().unwrap_or_default();
    let dotted = labels.len() >= 2 && labels.iter().all(|l| !l.is_empty());
    if validate_email(value) && dotted && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("email");
        err.message = Some(Cow::from("\"email\" must be a valid email"));
        Err(err)
    }
}

fn digits_only(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("digits");
        err.message = Some(Cow::from("\"phone_number\" must contain digits only"));
        Err(err)
    }
}

/// Input validated field by field in a fixed order; the first violation wins.
/// Keys outside `FIELDS` are reported only once every declared field passes.
pub trait CheckedInput: Validate {
    const FIELDS: &'static [&'static str];

    fn extra(&self) -> &BTreeMap<String, Value>;

    fn check(&self) -> Result<(), AuthError> {
        if let Err(errors) = self.validate() {
            return Err(AuthError::Validation(first_violation(&errors, Self::FIELDS)));
        }
        match self.extra().keys().next() {
            Some(key) => Err(AuthError::Validation(format!("\"{key}\" is not allowed"))),
            None => Ok(()),
        }
    }
}

impl CheckedInput for RegisterInput {
    const FIELDS: &'static [&'static str] = &["email", "name", "address", "phone_number", "password"];

    fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }
}

impl CheckedInput for LoginInput {
    const FIELDS: &'static [&'static str] = &["email", "password"];

    fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }
}

impl CheckedInput for VerifyInput {
    const FIELDS: &'static [&'static str] = &["base", "secret"];

    fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }
}

impl CheckedInput for ResendInput {
    const FIELDS: &'static [&'static str] = &["email"];

    fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }
}

fn first_violation(errors: &ValidationErrors, order: &[&'static str]) -> String {
    let all = errors.errors();
    order
        .iter()
        .find_map(|field| match all.get(field) {
            Some(ValidationErrorsKind::Field(list)) => list.first().map(|e| describe(field, e.message.clone())),
            _ => None,
        })
        .unwrap_or_else(|| "invalid input".to_string())
}

fn describe(field: &str, message: Option<Cow<'static, str>>) -> String {
    message
        .map(Cow::into_owned)
        .unwrap_or_else(|| format!("\"{field}\" is invalid"))
}

/// Take a field that validation already proved present.
pub(crate) fn present(value: Option<String>, field: &str) -> Result<String, AuthError> {
    value.ok_or_else(|| AuthError::Validation(format!("\"{field}\" is required")))
}

/// Verification pair: `id` is the public "base" value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    pub id: Uuid,
    pub secret: Uuid,
}

/// Account data handed to the repository; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    pub password_hash: String,
}

/// Persisted user as the service sees it.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    pub password_hash: String,
    pub valid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as returned to clients. The password hash is never part of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationCode>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredUser {
    /// View returned right after registration: validity flag and the
    /// freshly issued verification included.
    pub fn registered_view(&self, code: VerificationCode) -> UserView {
        UserView { valid: Some(self.valid), verification: Some(code), ..self.public_view() }
    }

    /// View returned on login: no validity flag, no verification.
    pub fn public_view(&self) -> UserView {
        UserView {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            phone_number: self.phone_number.clone(),
            valid: None,
            verification: None,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Registration result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registered {
    pub user: UserView,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserView,
}

/// JWT claims: the user id is the only claim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub id: Uuid,
}
