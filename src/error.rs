//! Error types used by the hub and the change forwarder.
//!
//! There is a single enum, [`HubError`], covering caller misuse detected at
//! call time. Subscriber faults are deliberately *not* represented here: a
//! handler that panics during delivery is caught at the registry boundary,
//! logged, and never surfaces to the publisher.

use thiserror::Error;

/// # Errors raised by msghub APIs.
///
/// These represent invalid arguments caught at the call site. They fail fast
/// and are never retried internally.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HubError {
    /// A property-filtered forwarder was constructed with an empty name.
    #[error("property name must not be empty")]
    EmptyPropertyName,
}

impl HubError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use msghub::HubError;
    ///
    /// let err = HubError::EmptyPropertyName;
    /// assert_eq!(err.as_label(), "empty_property_name");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HubError::EmptyPropertyName => "empty_property_name",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HubError::EmptyPropertyName => {
                "property name must not be empty; pass the property to filter on".to_string()
            }
        }
    }
}
