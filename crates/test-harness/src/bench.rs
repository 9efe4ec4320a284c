//! FrameBench: named frames and members over one kernel, for tests.
//!
//! Calls the real solver entry points; every result is kept under a
//! readable name so later checks can refer to it.

use std::collections::BTreeMap;

use frame_solver::{
    create_simple_frame, solve, FrameAssemblyResult, FrameInputs, SimpleFrameInputs,
    SimpleFrameResult,
};
use member_gen::{generate_member, Member};
use modeling_ops::{execute_transform, solid_bounds, Diagnostics, KernelBundle};
use solid_kernel::MockKernel;
#[cfg(feature = "truck")]
use solid_kernel::TruckKernel;
use steel_types::{BoundingBox, Feature, Placement, Profile};
use tracing::debug;

use crate::helpers::{union_bounds, HarnessError};
use crate::oracle::{self, OracleVerdict};

/// A bench for solving frames and generating members in tests.
pub struct FrameBench {
    pub(crate) kernel: Box<dyn KernelBundle>,
    pub(crate) diagnostics: Diagnostics,
    frames: BTreeMap<String, FrameAssemblyResult>,
    simple_frames: BTreeMap<String, SimpleFrameResult>,
    members: BTreeMap<String, Member>,
    history: Vec<(String, String)>,
}

impl FrameBench {
    /// Bench backed by MockKernel (deterministic, fast).
    pub fn mock() -> Self {
        Self::with_kernel(Box::new(MockKernel::new()))
    }

    /// Bench backed by TruckKernel (real B-rep geometry).
    #[cfg(feature = "truck")]
    pub fn truck() -> Self {
        Self::with_kernel(Box::new(TruckKernel::new()))
    }

    fn with_kernel(kernel: Box<dyn KernelBundle>) -> Self {
        Self {
            kernel,
            diagnostics: Diagnostics::new(),
            frames: BTreeMap::new(),
            simple_frames: BTreeMap::new(),
            members: BTreeMap::new(),
            history: Vec::new(),
        }
    }

    // ── Building ────────────────────────────────────────────────────────

    /// Solve a multi-frame assembly and keep it under `name`.
    pub fn solve(
        &mut self,
        name: &str,
        inputs: &FrameInputs,
    ) -> Result<&FrameAssemblyResult, HarnessError> {
        self.check_name_available(name)?;
        let result = solve(inputs, self.kernel.as_mut(), &mut self.diagnostics)?;
        self.record(
            "Solve",
            format!("{}: {} parts", name, result.parts.len()),
        );
        let stored: &FrameAssemblyResult = self.frames.entry(name.to_string()).or_insert(result);
        Ok(stored)
    }

    /// Build a two-column portal and keep it under `name`.
    pub fn simple_frame(
        &mut self,
        name: &str,
        inputs: &SimpleFrameInputs,
    ) -> Result<&SimpleFrameResult, HarnessError> {
        self.check_name_available(name)?;
        let result = create_simple_frame(inputs, self.kernel.as_mut(), &mut self.diagnostics)?;
        self.record(
            "SimpleFrame",
            format!("{}: {} parts", name, result.parts.len()),
        );
        let stored: &SimpleFrameResult =
            self.simple_frames.entry(name.to_string()).or_insert(result);
        Ok(stored)
    }

    /// Generate a single member and keep it under `name`.
    pub fn member(
        &mut self,
        name: &str,
        profile: &Profile,
        length: f64,
        features: &[Feature],
    ) -> Result<&Member, HarnessError> {
        self.check_name_available(name)?;
        let member = generate_member(
            self.kernel.as_mut(),
            profile,
            length,
            features,
            &mut self.diagnostics,
        )?;
        self.record(
            "Member",
            format!("{}: {} x {}", name, member.designation(), length),
        );
        let stored: &Member = self.members.entry(name.to_string()).or_insert(member);
        Ok(stored)
    }

    fn check_name_available(&self, name: &str) -> Result<(), HarnessError> {
        if self.frames.contains_key(name)
            || self.simple_frames.contains_key(name)
            || self.members.contains_key(name)
        {
            return Err(HarnessError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn record(&mut self, op: &str, detail: String) {
        debug!(op, %detail, "bench");
        self.history.push((op.to_string(), detail));
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn frame(&self, name: &str) -> Result<&FrameAssemblyResult, HarnessError> {
        self.frames
            .get(name)
            .ok_or_else(|| HarnessError::FrameNotFound {
                name: name.to_string(),
            })
    }

    pub fn simple(&self, name: &str) -> Result<&SimpleFrameResult, HarnessError> {
        self.simple_frames
            .get(name)
            .ok_or_else(|| HarnessError::FrameNotFound {
                name: name.to_string(),
            })
    }

    pub fn get_member(&self, name: &str) -> Result<&Member, HarnessError> {
        self.members
            .get(name)
            .ok_or_else(|| HarnessError::MemberNotFound {
                name: name.to_string(),
            })
    }

    /// World-space bounds of one placed part of a frame or simple frame.
    pub fn placed_bounds(&mut self, frame: &str, part: &str) -> Result<BoundingBox, HarnessError> {
        let (member, placement) = match (self.frames.get(frame), self.simple_frames.get(frame)) {
            (Some(f), _) => (f.parts.get(part), f.transforms.get(part)),
            (None, Some(f)) => (f.parts.get(part), f.transforms.get(part)),
            (None, None) => {
                return Err(HarnessError::FrameNotFound {
                    name: frame.to_string(),
                })
            }
        };
        let (Some(member), Some(placement)) = (member, placement) else {
            return Err(HarnessError::PartNotFound {
                frame: frame.to_string(),
                part: part.to_string(),
            });
        };
        place_bounds(self.kernel.as_mut(), member, placement)
    }

    /// World-space bounds of every placed part of a frame together.
    pub fn frame_bounds(&mut self, frame: &str) -> Result<BoundingBox, HarnessError> {
        let parts: Vec<String> = match (self.frames.get(frame), self.simple_frames.get(frame)) {
            (Some(f), _) => f.parts.keys().cloned().collect(),
            (None, Some(f)) => f.parts.keys().cloned().collect(),
            (None, None) => {
                return Err(HarnessError::FrameNotFound {
                    name: frame.to_string(),
                })
            }
        };
        let mut boxes = Vec::with_capacity(parts.len());
        for part in &parts {
            boxes.push(self.placed_bounds(frame, part)?);
        }
        union_bounds(&boxes).ok_or_else(|| HarnessError::EmptySolid {
            name: frame.to_string(),
        })
    }

    // ── Verification ────────────────────────────────────────────────────

    /// Run every frame oracle on a solved frame.
    pub fn check_frame(&self, name: &str) -> Result<Vec<OracleVerdict>, HarnessError> {
        let frame = self.frame(name)?;
        Ok(oracle::run_frame_oracles(self.kernel.as_introspect(), frame))
    }

    /// Fail with the first oracle that does not pass.
    pub fn assert_frame_valid(&self, name: &str) -> Result<(), HarnessError> {
        match self.check_frame(name)?.into_iter().find(|v| !v.passed) {
            Some(v) => Err(HarnessError::OracleFailure {
                oracle: v.oracle_name,
                detail: v.detail,
            }),
            None => Ok(()),
        }
    }

    /// Fail if anything so far raised a diagnostic warning.
    pub fn assert_no_warnings(&self) -> Result<(), HarnessError> {
        if self.diagnostics.is_empty() {
            return Ok(());
        }
        let lines: Vec<String> = self
            .diagnostics
            .warnings
            .iter()
            .map(|w| format!("{}: {}", w.source, w.message))
            .collect();
        Err(HarnessError::AssertionFailed {
            detail: format!("expected no warnings, got {}", lines.join("; ")),
        })
    }

    pub fn kernel(&self) -> &dyn KernelBundle {
        self.kernel.as_ref()
    }

    pub fn kernel_mut(&mut self) -> &mut dyn KernelBundle {
        self.kernel.as_mut()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Operations run so far, as (op, detail) pairs.
    pub fn history(&self) -> &[(String, String)] {
        &self.history
    }
}

/// Bounds of `member` after moving a copy of its solid by `placement`.
pub(crate) fn place_bounds(
    kb: &mut dyn KernelBundle,
    member: &Member,
    placement: &Placement,
) -> Result<BoundingBox, HarnessError> {
    let moved = execute_transform(kb, &member.solid, placement)?;
    Ok(solid_bounds(kb.as_introspect(), &moved)?)
}
