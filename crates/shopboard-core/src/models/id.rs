//! Newtype document ids
//!
//! Ids are opaque strings assigned by the document store. Each collection gets
//! its own type so an order id can never be looked up as a product id.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

document_id!(
    /// Id of a document in the `users` collection
    UserId
);
document_id!(
    /// Id of a document in the `orders` collection
    OrderId
);
document_id!(
    /// Id of a document in the `products` collection
    ProductId
);
document_id!(
    /// Id of a document in the `categories` collection
    CategoryId
);
document_id!(
    /// Id of a document in the `inventory` collection
    InventoryId
);
