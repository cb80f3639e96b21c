use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Map, Value};

use crate::bundle::{default_items, generate_bundles_sized, validate_universe, Bundle, Item, DEFAULT_BUNDLE_SIZE};
use crate::error::ConfigError;
use crate::logging::{log, obj, v_str, Domain, Level};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub items: Vec<Item>,
    pub bundle_sizes: Vec<usize>,
    /// Fixed seed for the bundle order; entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Sessions per chooser model in the simulation.
    pub sessions: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            items: default_items(),
            bundle_sizes: vec![DEFAULT_BUNDLE_SIZE],
            seed: None,
            sessions: 1000,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `from_env`, logging the outcome under the config domain.
    pub fn load() -> Result<Self, ConfigError> {
        let loaded = Self::from_env();
        match &loaded {
            Ok(cfg) => log(Level::Info, Domain::Config, "config_loaded", cfg.log_fields()),
            Err(err) => log(
                Level::Error,
                Domain::Config,
                "config_rejected",
                obj(&[("msg", v_str(&err.to_string()))]),
            ),
        }
        loaded
    }

    pub fn log_fields(&self) -> Map<String, Value> {
        let items: Vec<&str> = self.items.iter().map(Item::as_str).collect();
        obj(&[
            ("items", json!(items)),
            ("bundle_sizes", json!(self.bundle_sizes)),
            ("seed", json!(self.seed)),
            ("sessions", json!(self.sessions)),
        ])
    }

    /// Build from any key lookup, so tests need not touch the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let cfg = Self {
            items: match lookup("WARP_ITEMS") {
                Some(raw) => split_list(&raw).map(Item::from).collect(),
                None => defaults.items,
            },
            bundle_sizes: match lookup("WARP_BUNDLE_SIZES") {
                Some(raw) => split_list(&raw)
                    .map(|s| parse_value("WARP_BUNDLE_SIZES", s))
                    .collect::<Result<_, _>>()?,
                None => defaults.bundle_sizes,
            },
            seed: lookup("WARP_SEED")
                .map(|raw| parse_value("WARP_SEED", raw.trim()))
                .transpose()?,
            sessions: match lookup("WARP_SESSIONS") {
                Some(raw) => parse_value("WARP_SESSIONS", raw.trim())?,
                None => defaults.sessions,
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_universe(&self.items)?;
        self.bundles().map(|_| ())
    }

    pub fn bundles(&self) -> Result<Vec<Bundle>, ConfigError> {
        generate_bundles_sized(&self.items, &self.bundle_sizes)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
