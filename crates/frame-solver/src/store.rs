//! Hand-off of solved parts to an asset store.

use std::collections::BTreeMap;

use member_gen::member_metadata;
use serde_json::Value;
use solid_kernel::KernelSolidHandle;
use steel_types::Placement;
use tracing::debug;

use crate::output::FrameAssemblyResult;

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("asset already exists: {0}")]
    Duplicate(String),

    #[error("store rejected {name}: {reason}")]
    Rejected { name: String, reason: String },
}

/// Receiver of named solids with their placement and flat metadata.
pub trait AssetStore {
    fn put(
        &mut self,
        name: &str,
        solid: &KernelSolidHandle,
        placement: &Placement,
        metadata: BTreeMap<String, Value>,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredAsset {
    pub solid: KernelSolidHandle,
    pub placement: Placement,
    pub metadata: BTreeMap<String, Value>,
}

/// Keeps every asset in memory, keyed by name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    assets: BTreeMap<String, StoredAsset>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&StoredAsset> {
        self.assets.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.assets.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetStore for MemoryStore {
    fn put(
        &mut self,
        name: &str,
        solid: &KernelSolidHandle,
        placement: &Placement,
        metadata: BTreeMap<String, Value>,
    ) -> Result<(), StoreError> {
        if self.assets.contains_key(name) {
            return Err(StoreError::Duplicate(name.to_string()));
        }
        self.assets.insert(
            name.to_string(),
            StoredAsset {
                solid: solid.clone(),
                placement: *placement,
                metadata,
            },
        );
        Ok(())
    }
}

/// Frame metadata flattened one level under `frame.*`.
fn frame_keys(result: &FrameAssemblyResult) -> BTreeMap<String, Value> {
    match serde_json::to_value(&result.metadata) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .map(|(k, v)| (format!("frame.{}", k), v))
            .collect(),
        _ => BTreeMap::new(),
    }
}

/// Send every placed part to `store`. Returns the number of assets written.
pub fn publish(result: &FrameAssemblyResult, store: &mut dyn AssetStore) -> Result<usize, StoreError> {
    let frame = frame_keys(result);
    for (name, member) in &result.parts {
        let mut metadata = member_metadata(member);
        metadata.extend(frame.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(anchors) = result.anchors.get(name) {
            metadata.insert(
                "anchors".to_string(),
                serde_json::to_value(anchors).unwrap_or(Value::Null),
            );
        }
        let placement = result.transforms.get(name).copied().unwrap_or_default();
        store.put(name, &member.solid, &placement, metadata)?;
    }
    debug!(assets = result.parts.len(), "frame published");
    Ok(result.parts.len())
}
