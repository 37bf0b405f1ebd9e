//! Registry of attached form instances, keyed by form identity.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{FormError, Result};
use crate::submit::Reform;

/// Attached form instances.
#[derive(Debug, Default)]
pub struct FormRegistry {
    forms: HashMap<String, Arc<Reform>>,
}

impl FormRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches an instance under its form identity.
    ///
    /// # Errors
    ///
    /// [`FormError::AlreadyAttached`] if an instance with the same identity exists.
    pub fn attach(&mut self, reform: Reform) -> Result<Arc<Reform>> {
        let id = reform.id().to_string();
        if self.forms.contains_key(&id) {
            return Err(FormError::AlreadyAttached(id));
        }
        let reform = Arc::new(reform);
        self.forms.insert(id.clone(), Arc::clone(&reform));
        debug!(form = %id, "Form attached.");
        Ok(reform)
    }

    /// Detaches an instance, cancelling its in-flight submission.
    pub fn detach(&mut self, id: &str) -> Option<Arc<Reform>> {
        let reform = self.forms.remove(id)?;
        if reform.cancel() {
            debug!(form = %id, "Cancelled pending submission on detach.");
        }
        debug!(form = %id, "Form detached.");
        Some(reform)
    }

    /// Returns the instance attached under `id`.
    pub fn get(&self, id: &str) -> Option<Arc<Reform>> {
        self.forms.get(id).cloned()
    }

    /// Returns the number of attached instances.
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    /// Returns whether nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Returns the attached identities, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.forms.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
