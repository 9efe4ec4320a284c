//! Designation lookup for section profiles.

use std::collections::BTreeMap;
use std::path::Path;

use steel_types::{Profile, DEFAULT_FILLET_RADIUS};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown designation: {0}")]
    UnknownDesignation(String),
}

/// Source of profiles by designation. Lookups ignore case.
pub trait ProfileCatalog {
    fn lookup(&self, designation: &str) -> Option<Profile>;

    /// Every designation the catalog knows, in sorted order.
    fn designations(&self) -> Vec<String>;

    fn require(&self, designation: &str) -> Result<Profile, CatalogError> {
        self.lookup(designation)
            .ok_or_else(|| CatalogError::UnknownDesignation(designation.to_string()))
    }
}

fn key(designation: &str) -> String {
    designation.trim().to_ascii_uppercase()
}

fn square_hss(designation: &str, size: f64, wall: f64, weight: f64) -> Profile {
    Profile::rect_hss(designation, size, size, wall).with_weight(weight)
}

fn wide_flange(designation: &str, d: f64, bf: f64, tf: f64, tw: f64, weight: f64) -> Profile {
    Profile::wide_flange(designation, d, bf, tf, tw)
        .with_fillet(DEFAULT_FILLET_RADIUS)
        .with_weight(weight)
}

fn builtin_profiles() -> Vec<Profile> {
    vec![
        square_hss("HSS3x3x1/4", 3.0, 0.233, 8.81),
        square_hss("HSS4x4x1/4", 4.0, 0.233, 12.21),
        square_hss("HSS5x5x1/4", 5.0, 0.233, 15.62),
        square_hss("HSS6x6x1/4", 6.0, 0.233, 19.02),
        square_hss("HSS6x6x3/8", 6.0, 0.349, 27.48),
        square_hss("HSS8x8x1/4", 8.0, 0.233, 25.82),
        square_hss("HSS8x8x3/8", 8.0, 0.349, 37.69),
        square_hss("HSS10x10x3/8", 10.0, 0.349, 47.90),
        wide_flange("W10x33", 9.73, 7.96, 0.435, 0.29, 33.0),
        wide_flange("W10x49", 10.0, 10.0, 0.56, 0.34, 49.0),
        wide_flange("W12x14", 11.9, 3.97, 0.225, 0.2, 14.0),
        wide_flange("W12x26", 12.2, 6.49, 0.38, 0.23, 26.0),
    ]
}

/// Small table of common W shapes and square HSS.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl ProfileCatalog for BuiltinCatalog {
    fn lookup(&self, designation: &str) -> Option<Profile> {
        let wanted = key(designation);
        builtin_profiles()
            .into_iter()
            .find(|p| key(&p.designation) == wanted)
    }

    fn designations(&self) -> Vec<String> {
        let mut names: Vec<String> = builtin_profiles()
            .into_iter()
            .map(|p| p.designation)
            .collect();
        names.sort();
        names
    }
}

/// Profiles read from a JSON array of profile records.
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    profiles: BTreeMap<String, Profile>,
}

impl JsonCatalog {
    pub fn from_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|p| (key(&p.designation), p))
            .collect();
        Self { profiles }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let profiles: Vec<Profile> = serde_json::from_str(json)?;
        Ok(Self::from_profiles(profiles))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Load `path`, falling back to the built-in table when the file is
    /// missing or malformed.
    pub fn load_or_builtin(path: &Path) -> Self {
        match Self::load(path) {
            Ok(catalog) => {
                debug!(path = %path.display(), profiles = catalog.len(), "loaded profile catalog");
                catalog
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "using built-in profile table");
                Self::from_profiles(builtin_profiles())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileCatalog for JsonCatalog {
    fn lookup(&self, designation: &str) -> Option<Profile> {
        self.profiles.get(&key(designation)).cloned()
    }

    fn designations(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .profiles
            .values()
            .map(|p| p.designation.clone())
            .collect();
        names.sort();
        names
    }
}
