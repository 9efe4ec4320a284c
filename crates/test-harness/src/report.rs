//! Structured text reports of a solved frame.
//!
//! Reports are plain text for reading in test output; the same data
//! serializes to JSON for tooling.

use std::fmt;

use serde::Serialize;
use steel_types::Vec3;

use crate::bench::{place_bounds, FrameBench};
use crate::helpers::{union_bounds, HarnessError};
use crate::oracle::{self, OracleVerdict};

/// A complete report of one solved frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub name: String,
    pub parts: Vec<PartEntry>,
    pub summary: FrameSummary,
    pub bounding_box: Option<(Vec3, Vec3)>,
    pub oracle_results: Vec<OracleVerdict>,
    pub warnings: Vec<(String, String)>,
}

/// One placed part.
#[derive(Debug, Clone, Serialize)]
pub struct PartEntry {
    pub name: String,
    pub designation: String,
    pub member_type: String,
    pub length: f64,
    pub position: Vec3,
    pub applied_features: usize,
    pub requested_features: usize,
}

/// Headline numbers from the frame metadata.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSummary {
    pub num_frames: usize,
    pub header_length: f64,
    pub col_length: f64,
    pub conn_beam_length: f64,
    pub status: String,
    pub deflection: f64,
    pub limit_deflection: f64,
    pub stress: f64,
    pub limit_stress: f64,
    pub wall_checks: Vec<(String, String)>,
}

impl FrameReport {
    pub fn passed_all(&self) -> bool {
        self.oracle_results.iter().all(|v| v.passed)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format the report as text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Frame Report: {} ===\n\n", self.name));

        let s = &self.summary;
        out.push_str(&format!(
            "Frames: {} | header {:.3} | column {:.3}",
            s.num_frames, s.header_length, s.col_length,
        ));
        if s.num_frames > 1 {
            out.push_str(&format!(" | conn beam {:.3}", s.conn_beam_length));
        }
        out.push('\n');
        out.push_str(&format!(
            "Validation: {} (deflection {:.4} / {:.4}, stress {:.3} / {:.3} ksi)\n",
            s.status, s.deflection, s.limit_deflection, s.stress, s.limit_stress,
        ));
        for (role, message) in &s.wall_checks {
            out.push_str(&format!("  wall {}: {}\n", role, message));
        }

        out.push_str(&format!("\nParts ({}):\n", self.parts.len()));
        for p in &self.parts {
            out.push_str(&format!(
                "  {} {} \"{}\" L={:.3} at ({:.3}, {:.3}, {:.3})",
                p.member_type,
                p.designation,
                p.name,
                p.length,
                p.position[0],
                p.position[1],
                p.position[2],
            ));
            if p.requested_features > 0 {
                out.push_str(&format!(
                    " features {}/{}",
                    p.applied_features, p.requested_features
                ));
            }
            out.push('\n');
        }

        if let Some((min, max)) = self.bounding_box {
            out.push_str(&format!(
                "\nBounding Box: ({:.1}, {:.1}, {:.1}) -> ({:.1}, {:.1}, {:.1})\n",
                min[0], min[1], min[2], max[0], max[1], max[2],
            ));
        }

        if !self.oracle_results.is_empty() {
            out.push_str(&format!(
                "\nOracle Results ({} checks):\n",
                self.oracle_results.len()
            ));
            for v in &self.oracle_results {
                let status = if v.passed { "PASS" } else { "FAIL" };
                out.push_str(&format!("  [{}] {}: {}\n", status, v.oracle_name, v.detail));
            }
        }

        if self.warnings.is_empty() {
            out.push_str("\nWarnings: none\n");
        } else {
            out.push_str(&format!("\nWarnings ({}):\n", self.warnings.len()));
            for (source, msg) in &self.warnings {
                out.push_str(&format!("  {}: {}\n", source, msg));
            }
        }

        out
    }
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl FrameBench {
    /// Generate a complete report of a solved frame.
    pub fn report(&mut self, name: &str) -> Result<FrameReport, HarnessError> {
        let frame = self.frame(name)?.clone();
        let meta = &frame.metadata;

        let mut parts = Vec::with_capacity(frame.parts.len());
        let mut boxes = Vec::with_capacity(frame.parts.len());
        for (part, member) in &frame.parts {
            let placement = frame.transforms.get(part).copied().unwrap_or_default();
            boxes.push(place_bounds(self.kernel.as_mut(), member, &placement)?);
            parts.push(PartEntry {
                name: part.clone(),
                designation: member.designation(),
                member_type: member.member_type().to_string(),
                length: member.length,
                position: placement.position,
                applied_features: member.steps.iter().filter(|s| s.outcome.is_applied()).count(),
                requested_features: member.features.len(),
            });
        }

        let v = &meta.validation;
        let summary = FrameSummary {
            num_frames: meta.num_frames,
            header_length: meta.header_length,
            col_length: meta.col_length,
            conn_beam_length: meta.conn_beam_length,
            status: format!("{:?}", v.status).to_uppercase(),
            deflection: v.deflection,
            limit_deflection: v.limit_deflection,
            stress: v.stress,
            limit_stress: v.limit_stress,
            wall_checks: meta
                .wall_checks
                .iter()
                .map(|(role, check)| (role.clone(), check.message.clone()))
                .collect(),
        };

        let oracle_results = oracle::run_frame_oracles(self.kernel.as_introspect(), &frame);
        let warnings = self
            .diagnostics
            .warnings
            .iter()
            .map(|w| (w.source.clone(), w.message.clone()))
            .collect();

        Ok(FrameReport {
            name: name.to_string(),
            parts,
            summary,
            bounding_box: union_bounds(&boxes).map(|bb| (bb.min, bb.max)),
            oracle_results,
            warnings,
        })
    }
}
