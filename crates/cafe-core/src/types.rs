//! # Catalog Types
//!
//! Read-only payloads served by the cafe backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CafeInfo     │   │    Category     │   │    CafeItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  id             │   │  id             │       │
//! │  │  cover/logo     │   │  name, icon     │   │  name, image    │       │
//! │  │  rating, status │   │  background     │   │  variants[] ────┼──┐    │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘  │    │
//! │                                                                    ▼    │
//! │                                              ┌─────────────────┐       │
//! │                                              │    Variant      │       │
//! │                                              │  id, name, cost │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All wire names are camelCase. Nothing here is ever mutated by the
//! storefront; the cart keeps its own clones.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Variant
// =============================================================================

/// A purchasable variant of a menu item (size, portion, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Variant {
    /// Variant id, unique within its item. Empty on the wire means
    /// "use the position"; see [`CafeItem::normalized`].
    #[serde(default)]
    pub id: String,

    /// Display name ("Small", "0.4 л").
    pub name: String,

    /// Price in whole currency units. Accepts `250` or `"250"` on input.
    pub cost: Money,
}

impl Variant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cost: i64) -> Self {
        Variant {
            id: id.into(),
            name: name.into(),
            cost: Money::from_units(cost),
        }
    }
}

// =============================================================================
// Cafe Item
// =============================================================================

/// A menu item as served by `/menu/{category}` and `/menu/details/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CafeItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl CafeItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, variants: Vec<Variant>) -> Self {
        CafeItem {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            image: String::new(),
            variants,
        }
    }

    /// Fills in missing variant ids with the variant's position, so that
    /// cart identity is always `(item id, variant id)`.
    pub fn normalized(mut self) -> Self {
        for (index, variant) in self.variants.iter_mut().enumerate() {
            if variant.id.is_empty() {
                variant.id = index.to_string();
            }
        }
        self
    }

    /// The variant offered by the list views' "add to cart" button.
    pub fn default_variant(&self) -> Option<&Variant> {
        self.variants.first()
    }

    /// Looks a variant up by id.
    pub fn variant(&self, id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }
}

// =============================================================================
// Category
// =============================================================================

/// A menu category tile on the main page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub background_color: String,
}

// =============================================================================
// Cafe Info
// =============================================================================

/// Header block of the main page (`/info`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CafeInfo {
    pub name: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub logo_image: String,
    #[serde(default)]
    pub kitchen_categories: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub cooking_time: String,
    #[serde(default)]
    pub status: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
