use thiserror::Error;

use crate::bundle::{Bundle, Item};

/// Rejected submission. The session is left untouched and the caller re-prompts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChoiceError {
    #[error("please select at least one item")]
    Empty,
    #[error("{item} is not part of the current bundle")]
    NotInBundle { item: Item },
    #[error("there is no item {position} in a bundle of {len}")]
    NoSuchPosition { position: usize, len: usize },
    #[error("all bundles have been shown; restart to play again")]
    SessionComplete,
}

/// Failure while playing simulated sessions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{model} made an invalid choice: {source}")]
    Choice {
        model: String,
        #[source]
        source: ChoiceError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("bundles of {bundle_size} items need at least {bundle_size} distinct items, got {items}")]
    UniverseTooSmall { items: usize, bundle_size: usize },
    #[error("item {0} is listed more than once")]
    DuplicateItem(Item),
    #[error("item names must not be empty")]
    EmptyItemName,
    #[error("bundle size {0} is not supported (menus need at least 2 items)")]
    UnsupportedBundleSize(usize),
    #[error("bundle size {0} is listed more than once")]
    DuplicateBundleSize(usize),
    #[error("no bundle sizes configured")]
    NoBundleSizes,
    #[error("a session needs at least one bundle")]
    NoBundles,
    #[error("bundle {0} is listed more than once")]
    DuplicateBundle(Bundle),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}
