use serde::Serialize;
use solid_kernel::{KernelId, KernelSolidHandle};
use steel_types::{TopoKind, TopoSignature};

/// Complete result of a modeling operation.
#[derive(Debug, Clone)]
pub struct OpResult {
    /// Handle to the resulting solid. Runtime-only, not persisted.
    pub handle: KernelSolidHandle,
    /// What entities were created and deleted relative to the inputs.
    pub provenance: Provenance,
    /// Non-fatal warnings raised while executing the operation.
    pub diagnostics: Diagnostics,
}

/// Provenance tracking: what happened to topology during an operation.
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    /// Entities that exist in the result but not in the input.
    pub created: Vec<EntityRecord>,
    /// Entities that existed in the input but not in the result.
    pub deleted: Vec<EntityRecord>,
}

impl Provenance {
    pub fn created_count(&self, kind: TopoKind) -> usize {
        self.created.iter().filter(|r| r.kind == kind).count()
    }

    pub fn deleted_count(&self, kind: TopoKind) -> usize {
        self.deleted.iter().filter(|r| r.kind == kind).count()
    }
}

/// Record of a topological entity with its kernel ID and signature.
#[derive(Debug, Clone)]
pub struct EntityRecord {
    /// The kernel-internal ID. Runtime-only.
    pub kernel_id: KernelId,
    pub kind: TopoKind,
    /// Geometric signature for fallback matching.
    pub signature: TopoSignature,
}

/// One non-fatal warning and the component that raised it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    pub source: String,
    pub message: String,
}

/// Collector for non-fatal diagnostics. Passed down by the caller so the
/// core never prints; every entry is also emitted as a `tracing` event.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, source: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(source, "{}", message);
        self.warnings.push(Warning {
            source: source.to_string(),
            message,
        });
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// True if any warning message contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.warnings.iter().any(|w| w.message.contains(needle))
    }
}

/// Errors from modeling operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpError {
    #[error("kernel error: {0}")]
    Kernel(#[from] solid_kernel::KernelError),

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("solid has no geometry")]
    EmptySolid,
}
