//! Validation types and pattern validators.

use std::sync::LazyLock;

use regex::Regex;

use crate::fields::{Field, ValidationDecl};

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?-u)^(http(s?)://|~/|/)?([a-zA-Z]([\w\-]+\.)+(\w{2,7}))(:\d{1,5})?/?(\w+\.\w{3,4})?((\?\w+=\w+)?(&\w+=\w+)*)?",
    )
    .expect("url pattern")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern")
});

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(((((((00|\+)[0-9][0-9]{1,2}[ \-/]?)|0)[1-9][0-9]{1,4})[ \-/]?)|((((00|\+)49\()|\(0)[1-9][0-9]{1,4}\)[ \-/]?))[0-9]{1,7}([ \-/]?[0-9]{1,5})?)$",
    )
    .expect("phone pattern")
});

/// Trait for string validators.
pub trait Validator: Send + Sync {
    /// Returns whether the value passes.
    fn validate(&self, value: &str) -> bool;
}

/// Validator for web addresses.
///
/// Accepts an optional `http(s)://`, `~/` or `/` prefix followed by a dotted
/// host, optional port, file segment and query string. Only the start of the
/// value is anchored, so a bare domain like `test.com` passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlValidator;

impl Validator for UrlValidator {
    fn validate(&self, value: &str) -> bool {
        URL_PATTERN.is_match(value)
    }
}

/// Validator for email addresses, including quoted local parts and
/// bracketed IPv4 domains.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl Validator for EmailValidator {
    fn validate(&self, value: &str) -> bool {
        EMAIL_PATTERN.is_match(value)
    }
}

/// Validator for phone numbers: international (`00`/`+`) and trunk (`0`)
/// prefixes, space/hyphen/slash separators, an optional extension, and the
/// German `(0xxx)` / `+49(xxx)` area-code forms.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneValidator;

impl Validator for PhoneValidator {
    fn validate(&self, value: &str) -> bool {
        PHONE_PATTERN.is_match(value)
    }
}

/// Validator that enforces a minimum trimmed length in characters.
#[derive(Debug, Clone, Copy)]
pub struct MinLengthValidator {
    min_length: usize,
}

impl MinLengthValidator {
    /// Creates a new MinLengthValidator.
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, value: &str) -> bool {
        value.trim().chars().count() >= self.min_length
    }
}

/// The kind of pattern a field is validated against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValidationType {
    /// Free text; always passes.
    Text,
    /// Web address.
    Url,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Date; not checked.
    Date,
    /// Unknown type, delegated to the `validate-custom` hook.
    Custom(String),
    /// No type could be resolved; always passes.
    None,
}

impl ValidationType {
    /// Maps a type name to a validation type.
    pub fn parse(name: &str) -> Self {
        match name {
            "" => Self::None,
            "text" => Self::Text,
            "url" => Self::Url,
            "email" => Self::Email,
            "phone" => Self::Phone,
            "date" => Self::Date,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Resolves the type a field validates against.
    ///
    /// Returns `None` when the field declares no validation. An explicit type
    /// needs at least two characters; otherwise the native input type is used.
    pub fn resolve(field: &Field) -> Option<Self> {
        match field.validation.as_ref()? {
            ValidationDecl::Explicit(name) if name.chars().count() > 1 => Some(Self::parse(name)),
            _ => Some(Self::parse(field.native_type())),
        }
    }

    /// Returns the type name.
    pub fn name(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Url => "url",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Date => "date",
            Self::Custom(name) => name,
            Self::None => "",
        }
    }

    /// Returns the built-in validator for this type, if it has one.
    pub fn validator(&self) -> Option<&'static dyn Validator> {
        match self {
            Self::Url => Some(&UrlValidator),
            Self::Email => Some(&EmailValidator),
            Self::Phone => Some(&PhoneValidator),
            _ => None,
        }
    }

    /// Returns the localization key of this type's error message,
    /// e.g. `errorValidationEmail`.
    pub fn label_key(&self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        let capitalized = match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.as_str().to_lowercase().chars())
                .collect::<String>(),
            None => String::new(),
        };
        format!("errorValidation{capitalized}")
    }
}
