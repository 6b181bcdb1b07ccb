//! Newtype IDs for type-safe entity references.
//!
//! The Helper backend identifies every record with an opaque string (a UUID
//! today). Use the `define_id!` macro to create wrappers that prevent mixing
//! IDs from different entity types, e.g. passing a flag ID where a KYC
//! document ID is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use helper_admin_core::define_id;
/// define_id!(UserId);
/// define_id!(FlagId);
///
/// let user_id = UserId::new("a1");
/// let flag_id = FlagId::new("a1");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = flag_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(UserId);
define_id!(KycDocumentId);
define_id!(FlagId);
define_id!(RatingId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = UserId::new("3f2b");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"3f2b\"");

        let parsed: FlagId = serde_json::from_str("\"9c1d\"").unwrap();
        assert_eq!(parsed.as_str(), "9c1d");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(KycDocumentId::from("doc-7").to_string(), "doc-7");
    }
}
