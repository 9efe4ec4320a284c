use serde::{Deserialize, Serialize};
use steel_types::{Feature, Profile};

use crate::validation::DesignCriteria;

/// Base plate footprint and thickness (in).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasePlateSize {
    pub length: f64,
    pub width: f64,
    pub thickness: f64,
}

impl Default for BasePlateSize {
    fn default() -> Self {
        Self {
            length: 14.0,
            width: 14.0,
            thickness: 0.75,
        }
    }
}

/// Features requested per member role. Every placed copy of a role shares
/// the same features.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberFeatures {
    pub column: Vec<Feature>,
    pub header: Vec<Feature>,
    pub base_plate: Vec<Feature>,
    pub conn_beam: Vec<Feature>,
}

/// Engineering inputs for a repeated portal frame. Lengths in inches,
/// angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInputs {
    /// Centre-to-centre column spacing.
    pub width: f64,
    /// Top of steel.
    pub height: f64,
    pub col_profile: Option<Profile>,
    pub header_profile: Option<Profile>,
    /// Column spin about its own axis.
    pub col_orientation: f64,
    /// Clearance between each header end and the column face.
    pub gap: f64,
    pub bp_size: BasePlateSize,
    /// Centre point load on the header, in pounds.
    pub point_load_lbs: f64,
    pub num_frames: usize,
    pub frame_spacing: f64,
    /// Connecting beams are only built when this is set and there is
    /// more than one frame.
    pub conn_beam_profile: Option<Profile>,
    pub skip_start_col_left: bool,
    pub skip_start_col_right: bool,
    pub criteria: DesignCriteria,
    pub features: MemberFeatures,
}

impl Default for FrameInputs {
    fn default() -> Self {
        Self {
            width: 144.0,
            height: 120.0,
            col_profile: None,
            header_profile: None,
            col_orientation: 0.0,
            gap: 0.5,
            bp_size: BasePlateSize::default(),
            point_load_lbs: 1000.0,
            num_frames: 1,
            frame_spacing: 144.0,
            conn_beam_profile: None,
            skip_start_col_left: false,
            skip_start_col_right: false,
            criteria: DesignCriteria::default(),
            features: MemberFeatures::default(),
        }
    }
}

impl FrameInputs {
    /// Default inputs with the column and header profiles set.
    pub fn new(col_profile: Profile, header_profile: Profile) -> Self {
        Self {
            col_profile: Some(col_profile),
            header_profile: Some(header_profile),
            ..Self::default()
        }
    }

    pub fn with_span(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Repeat the frame `count` times, `spacing` apart.
    pub fn with_frames(mut self, count: usize, spacing: f64, conn_beam: Option<Profile>) -> Self {
        self.num_frames = count;
        self.frame_spacing = spacing;
        self.conn_beam_profile = conn_beam;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let inputs: FrameInputs = serde_json::from_str("{}").unwrap();
        assert_eq!(inputs, FrameInputs::default());
        assert_eq!(inputs.bp_size.thickness, 0.75);
        assert_eq!(inputs.num_frames, 1);
    }

    #[test]
    fn test_json_with_profiles_and_features() {
        let json = r#"{
            "width": 100.0,
            "col_profile": {"designation": "HSS6x6x1/4", "shape": "square",
                "outer_width": 6.0, "outer_height": 6.0, "wall_thickness": 0.233},
            "header_profile": {"designation": "W12x26", "shape": "w", "depth_d": 12.2,
                "flange_width_bf": 6.49, "flange_thickness_tf": 0.38, "web_thickness_tw": 0.23},
            "bp_size": {"length": 12.0, "width": 12.0, "thickness": 1.0},
            "features": {"header": [{"type": "cope", "end": "start", "flange": "top",
                "depth": 2.0, "height": 1.5}]}
        }"#;
        let inputs: FrameInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.width, 100.0);
        assert_eq!(inputs.height, 120.0);
        assert_eq!(inputs.bp_size.thickness, 1.0);
        assert_eq!(inputs.features.header.len(), 1);
        assert!(inputs.features.column.is_empty());
        assert_eq!(inputs.header_profile.unwrap().depth(), 12.2);
    }
}
