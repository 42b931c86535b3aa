//! Wire envelopes for collections.
//!
//! The appliance nests child collections under a `<name>Reference` object:
//!
//! ```text
//! "membersReference": {
//!     "link": "https://localhost/mgmt/tm/ltm/pool/~Common~web/members?ver=15.1.0",
//!     "isSubcollection": true,
//!     "items": [ ... ]
//! }
//! ```
//!
//! Resource structs expose the children as a plain `Vec<T>` and route the field
//! through [`items`]:
//!
//! ```rust,ignore
//! #[serde(rename = "membersReference", with = "reference::items", default, skip_serializing_if = "Vec::is_empty")]
//! pub members: Vec<PoolMember>,
//! ```

use serde::{Deserialize, Serialize};

/// `{"items": [...]}` envelope returned by list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Collection<T> {
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// `<name>Reference` envelope wrapping a child collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceItems<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_subcollection: Option<bool>,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> From<Vec<T>> for ReferenceItems<T> {
    fn from(items: Vec<T>) -> Self {
        Self { link: None, is_subcollection: None, items }
    }
}

/// serde `with` module converting `Vec<T>` to and from [`ReferenceItems<T>`].
pub mod items {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct ItemsRef<'a, T> {
        items: &'a [T],
    }

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S, T>(items: &Vec<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        ItemsRef { items: items.as_slice() }.serialize(serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        super::ReferenceItems::<T>::deserialize(deserializer).map(|reference| reference.items)
    }
}
