use std::collections::BTreeMap;
use std::sync::Arc;

use member_gen::Member;
use serde::{Deserialize, Serialize};
use steel_types::{Placement, Vec3};

use crate::section::{SectionProperties, WallCheck};
use crate::validation::ValidationResult;

/// Coordinate system an anchor set is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorSpace {
    /// Member-local; apply the part's placement to get frame coordinates.
    Local,
    Global,
}

/// Named connection points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorSet {
    pub space: AnchorSpace,
    pub points: BTreeMap<String, Vec3>,
}

impl AnchorSet {
    pub fn local<'a>(points: impl IntoIterator<Item = (&'a str, Vec3)>) -> Self {
        Self::build(AnchorSpace::Local, points)
    }

    pub fn global<'a>(points: impl IntoIterator<Item = (&'a str, Vec3)>) -> Self {
        Self::build(AnchorSpace::Global, points)
    }

    fn build<'a>(space: AnchorSpace, points: impl IntoIterator<Item = (&'a str, Vec3)>) -> Self {
        Self {
            space,
            points: points
                .into_iter()
                .map(|(name, p)| (name.to_string(), p))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Vec3> {
        self.points.get(name).copied()
    }

    /// Point in frame coordinates; local points go through `placement`.
    pub fn resolve(&self, name: &str, placement: &Placement) -> Option<Vec3> {
        let p = self.get(name)?;
        Some(match self.space {
            AnchorSpace::Local => placement.apply_point(p),
            AnchorSpace::Global => p,
        })
    }
}

/// Derived dimensions and engineering results of a frame solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMetadata {
    pub header_length: f64,
    pub col_length: f64,
    pub header_center_y: f64,
    /// Zero when no connecting beams were built.
    pub conn_beam_length: f64,
    pub col_half_width: f64,
    pub col_half_depth: f64,
    pub col_orientation: f64,
    pub gap: f64,
    pub num_frames: usize,
    pub header_section: SectionProperties,
    pub validation: ValidationResult,
    /// Wall checks for the hollow profiles in use, keyed by member role.
    pub wall_checks: BTreeMap<String, WallCheck>,
}

/// Everything a solve produces. Parts that share geometry share one
/// `Arc<Member>`.
#[derive(Debug, Clone)]
pub struct FrameAssemblyResult {
    pub parts: BTreeMap<String, Arc<Member>>,
    pub transforms: BTreeMap<String, Placement>,
    pub anchors: BTreeMap<String, AnchorSet>,
    pub metadata: FrameMetadata,
}

impl FrameAssemblyResult {
    pub fn part_names(&self) -> Vec<&str> {
        self.parts.keys().map(String::as_str).collect()
    }

    /// Frame-space position of a named anchor on a part.
    pub fn anchor_position(&self, part: &str, anchor: &str) -> Option<Vec3> {
        let set = self.anchors.get(part)?;
        match set.space {
            AnchorSpace::Global => set.get(anchor),
            AnchorSpace::Local => set.resolve(anchor, self.transforms.get(part)?),
        }
    }
}

/// Parts, placements and anchors accumulated while laying out a frame.
#[derive(Debug, Default)]
pub(crate) struct Assembly {
    pub parts: BTreeMap<String, Arc<Member>>,
    pub transforms: BTreeMap<String, Placement>,
    pub anchors: BTreeMap<String, AnchorSet>,
}

impl Assembly {
    pub fn place(
        &mut self,
        name: String,
        member: &Arc<Member>,
        placement: Placement,
        anchors: &AnchorSet,
    ) {
        self.parts.insert(name.clone(), Arc::clone(member));
        self.transforms.insert(name.clone(), placement);
        self.anchors.insert(name, anchors.clone());
    }
}
