//! Items, bundles (menus) and choices, plus the deterministic bundle generator.
//!
//! A bundle is a set: two bundles with the same items are the same menu no
//! matter how they were built. Items inside a bundle keep universe order,
//! which is also the order used for display and for numbered selection.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{ChoiceError, ConfigError};

/// Menu size used by the game unless configured otherwise.
pub const DEFAULT_BUNDLE_SIZE: usize = 3;

pub const DEFAULT_ITEMS: [&str; 4] = ["Apple", "Banana", "Mango", "Orange"];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(String);

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Item {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

pub fn default_items() -> Vec<Item> {
    DEFAULT_ITEMS.iter().map(|&name| Item::from(name)).collect()
}

/// Items keep the order they were given in, which for generated bundles is
/// universe order. Equality and hashing ignore that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle(Vec<Item>);

impl Bundle {
    /// Repeated items are kept once, at their first position.
    pub fn new<I: IntoIterator<Item = Item>>(items: I) -> Self {
        let mut kept: Vec<Item> = Vec::new();
        for item in items {
            if !kept.contains(&item) {
                kept.push(item);
            }
        }
        Self(kept)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.0.contains(item)
    }

    /// 1-based lookup used by numbered selection.
    pub fn nth(&self, position: usize) -> Option<&Item> {
        position.checked_sub(1).and_then(|idx| self.0.get(idx))
    }

    fn sorted(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.0.iter().collect();
        items.sort();
        items
    }
}

impl PartialEq for Bundle {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.items().all(|item| other.contains(item))
    }
}

impl Eq for Bundle {}

impl Hash for Bundle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted().hash(state);
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", join(self.0.iter()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Choice(BTreeSet<Item>);

impl Choice {
    pub fn new<I: IntoIterator<Item = Item>>(items: I) -> Self {
        Self(items.into_iter().collect())
    }

    /// Parse a selection typed against `bundle`.
    ///
    /// Tokens are separated by whitespace or commas. A number picks the item at
    /// that position in the bundle; anything else is matched against item
    /// names case-insensitively. Unmatched tokens are kept verbatim so that
    /// submitting the choice reports them as not part of the bundle.
    pub fn parse_for(bundle: &Bundle, input: &str) -> Self {
        let picked = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                let by_position = token.parse::<usize>().ok().and_then(|n| bundle.nth(n));
                let by_name = || {
                    bundle
                        .items()
                        .find(|item| item.as_str().eq_ignore_ascii_case(token))
                };
                by_position
                    .or_else(by_name)
                    .cloned()
                    .unwrap_or_else(|| Item::from(token))
            });
        Self::new(picked)
    }

    /// Select by 1-based bundle positions. Any position outside the bundle
    /// rejects the whole selection.
    pub fn from_positions(bundle: &Bundle, positions: &[usize]) -> Result<Self, ChoiceError> {
        positions
            .iter()
            .map(|&position| {
                bundle
                    .nth(position)
                    .cloned()
                    .ok_or(ChoiceError::NoSuchPosition { position, len: bundle.len() })
            })
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.0.contains(item)
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", join(self.0.iter()))
    }
}

/// A menu that was shown together with what the user picked from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    pub bundle: Bundle,
    pub choice: Choice,
}

impl Trial {
    pub fn new(bundle: Bundle, choice: Choice) -> Self {
        Self { bundle, choice }
    }

    pub fn offers(&self, x: &Item, y: &Item) -> bool {
        self.bundle.contains(x) && self.bundle.contains(y)
    }

    pub fn chose(&self, item: &Item) -> bool {
        self.choice.contains(item)
    }
}

fn join<'a>(items: impl Iterator<Item = &'a Item>) -> String {
    items.map(Item::as_str).collect::<Vec<_>>().join(", ")
}

// =============================================================================
// Generator
// =============================================================================

/// All 3-item bundles over `items`, in combination order over item positions.
pub fn generate_bundles(items: &[Item]) -> Result<Vec<Bundle>, ConfigError> {
    generate_bundles_sized(items, &[DEFAULT_BUNDLE_SIZE])
}

/// Bundles of every size in `sizes`, concatenated in the order the sizes are given.
pub fn generate_bundles_sized(items: &[Item], sizes: &[usize]) -> Result<Vec<Bundle>, ConfigError> {
    validate_universe(items)?;
    if sizes.is_empty() {
        return Err(ConfigError::NoBundleSizes);
    }

    let mut seen_sizes = HashSet::new();
    let mut bundles = Vec::new();
    for &size in sizes {
        if size < 2 {
            return Err(ConfigError::UnsupportedBundleSize(size));
        }
        if !seen_sizes.insert(size) {
            return Err(ConfigError::DuplicateBundleSize(size));
        }
        if size > items.len() {
            return Err(ConfigError::UniverseTooSmall {
                items: items.len(),
                bundle_size: size,
            });
        }
        for combo in combinations(items.len(), size) {
            bundles.push(Bundle::new(combo.into_iter().map(|idx| items[idx].clone())));
        }
    }
    Ok(bundles)
}

/// Items in order of first appearance across `bundles`. For generated
/// bundles this reproduces the universe order they were generated from.
pub fn universe_of<'a>(bundles: impl IntoIterator<Item = &'a Bundle>) -> Vec<Item> {
    let mut items: Vec<Item> = Vec::new();
    for item in bundles.into_iter().flat_map(|bundle| bundle.items()) {
        if !items.contains(item) {
            items.push(item.clone());
        }
    }
    items
}

pub fn validate_universe(items: &[Item]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for item in items {
        if item.as_str().trim().is_empty() {
            return Err(ConfigError::EmptyItemName);
        }
        if !seen.insert(item) {
            return Err(ConfigError::DuplicateItem(item.clone()));
        }
    }
    Ok(())
}

/// Index combinations of `k` out of `n`, in lexicographic order.
pub fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        let Some(i) = (0..k).rev().find(|&i| idx[i] != i + n - k) else {
            return out;
        };
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
