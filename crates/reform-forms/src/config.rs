//! Form options and their defaults.
//!
//! Options are resolved by deep-merging user-supplied JSON over the
//! serialized defaults, so a caller only names the keys it changes:
//!
//! ```rust
//! use reform_forms::{ConvertMode, FormOptions};
//!
//! let options = FormOptions::resolve(&serde_json::json!({
//!     "convert": "json",
//!     "validation": { "minLength": 3 }
//! }))
//! .unwrap();
//!
//! assert_eq!(options.convert, ConvertMode::Json);
//! assert_eq!(options.validation.min_length, 3);
//! assert!(options.validation.display_validation_error_info);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::error;

use crate::error::Result;

/// How field values are turned into a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvertMode {
    /// Form-encoded `name=value&...` string.
    #[default]
    Serialize,
    /// Flat JSON object of field name to value.
    Json,
}

/// Validation policy flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationPolicy {
    /// Minimum trimmed length of required text values.
    pub min_length: usize,
    /// Attach the `errorMinLength` message to required text failures.
    pub display_require_error_info: bool,
    /// Attach the localized message to format failures.
    pub display_validation_error_info: bool,
    /// Let [`submit_policy`](crate::hooks::submit_policy) waive required errors.
    pub submit_on_require_error: bool,
    /// Let [`submit_policy`](crate::hooks::submit_policy) waive format errors.
    pub submit_on_validation_error: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_length: 2,
            display_require_error_info: false,
            display_validation_error_info: true,
            submit_on_require_error: false,
            submit_on_validation_error: false,
        }
    }
}

/// Fully resolved options of a form instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormOptions {
    /// Settings forwarded to the transport; `type`, `url` and `data` override computed values.
    pub ajax: Map<String, Value>,
    /// Payload conversion mode.
    pub convert: ConvertMode,
    /// Promote pipeline notes from debug to info level.
    pub debug_mode: bool,
    /// Active language key into [`localization`](Self::localization).
    pub lang: String,
    /// Message tables by language.
    pub localization: BTreeMap<String, BTreeMap<String, String>>,
    /// Default HTTP method.
    #[serde(rename = "type")]
    pub method: String,
    /// Default destination URL.
    pub url: Option<String>,
    /// Validation policy.
    pub validation: ValidationPolicy,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            ajax: Map::new(),
            convert: ConvertMode::Serialize,
            debug_mode: false,
            lang: "en".to_string(),
            localization: default_localization(),
            method: "post".to_string(),
            url: None,
            validation: ValidationPolicy::default(),
        }
    }
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, text)| ((*key).to_string(), (*text).to_string()))
        .collect()
}

fn default_localization() -> BTreeMap<String, BTreeMap<String, String>> {
    let mut localization = BTreeMap::new();
    localization.insert(
        "en".to_string(),
        table(&[
            ("errorMinLength", "Please enter at lease 2 characters."),
            ("errorValidationUrl", "Web url not valid."),
            ("errorValidationEmail", "Email address not valid."),
            ("errorValidationPhone", "Phone number not valid."),
        ]),
    );
    localization.insert(
        "de".to_string(),
        table(&[
            ("errorMinLength", "Bitte geben Sie mindestens 2 Zeichen an."),
            ("errorValidationUrl", "Web-URL nicht gültig."),
            ("errorValidationEmail", "E-Mail Adresse nicht gültig."),
            ("errorValidationPhone", "Telefonnummer nicht gültig."),
        ]),
    );
    localization
}

impl FormOptions {
    /// Resolves user options over the defaults.
    ///
    /// Objects merge key by key; any other user value replaces the default.
    /// `null` at the top level means "no options".
    pub fn resolve(user: &Value) -> Result<Self> {
        let mut merged = serde_json::to_value(Self::default())?;
        if !user.is_null() {
            deep_merge(&mut merged, user);
        }
        Ok(serde_json::from_value(merged)?)
    }

    /// Returns the localized message for `key`, or `{{ key }}` when missing.
    pub fn label(&self, key: &str) -> String {
        let Some(messages) = self.localization.get(&self.lang) else {
            error!(lang = %self.lang, "Can't find localization '{}'.", self.lang);
            return placeholder_token(key);
        };
        if let Some(text) = messages.get(key) {
            text.clone()
        } else {
            error!(lang = %self.lang, key, "Can't find key '{}.{}'.", self.lang, key);
            placeholder_token(key)
        }
    }
}

fn placeholder_token(key: &str) -> String {
    format!("{{{{ {key} }}}}")
}

fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                deep_merge(base.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}
