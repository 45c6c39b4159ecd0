//! Category tree entities and report rows

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Rank stamped on every product row.
///
/// The catalog does not supply a rank; the report carries this fixed value
/// in the level column of product rows.
pub const PLACEHOLDER_RANK: u32 = 99;

/// One node of the remote category tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    /// Ids that are not non-negative integers (or digit strings) read as `None`
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Pagination endpoint group serving this category's products
    #[serde(default, deserialize_with = "null_as_default")]
    pub shard: String,

    #[serde(default, rename = "childs", deserialize_with = "null_as_default")]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// A leaf has no child categories, whatever its shard says
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Name used in log lines for nodes that may be unnamed
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "<unnamed>"
        } else {
            &self.name
        }
    }
}

/// A report row: a category at its tree depth, or a merged product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatEntry {
    pub id: Option<u64>,
    pub name: String,
    /// 1-based tree depth for categories, [`PLACEHOLDER_RANK`] for products
    pub level: u32,
}

impl FlatEntry {
    pub fn category(node: &CategoryNode, level: u32) -> Self {
        Self {
            id: node.id,
            name: node.name.clone(),
            level,
        }
    }
}

/// A product collected from one leaf category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    pub id: u64,
    pub name: String,
    pub fixed_rank: u32,
}

impl ProductRecord {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            fixed_rank: PLACEHOLDER_RANK,
        }
    }
}

impl From<ProductRecord> for FlatEntry {
    fn from(product: ProductRecord) -> Self {
        Self {
            id: Some(product.id),
            name: product.name,
            level: product.fixed_rank,
        }
    }
}

/// A leaf whose products still have to be fetched.
///
/// `anchor` is the index of the leaf's own row in the flattened sequence at
/// the time it was recorded, before any product row has been inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub anchor: usize,
    pub category_id: u64,
    pub shard: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
