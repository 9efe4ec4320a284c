use serde::{Deserialize, Serialize};

/// A feature request applied to a member solid after it is generated.
///
/// JSON form: `{"type": "bolt_holes", "enabled": true, "count": 4, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(flatten)]
    pub kind: FeatureKind,
}

fn default_true() -> bool {
    true
}

impl Feature {
    pub fn new(kind: FeatureKind) -> Self {
        Self {
            enabled: true,
            kind,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The snake_case tag of the feature kind.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

/// The closed set of feature operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureKind {
    /// Round every edge in a classified group.
    Fillet { edges: EdgeGroup, radius: f64 },
    /// A circle or rectangle drawn on a classified face and cut or extruded.
    Sketch {
        face: FaceName,
        profile: SketchProfile,
        operation: SketchOp,
        amount: f64,
        /// (u, v) offset from the face centroid in the face plane.
        #[serde(default)]
        center: [f64; 2],
    },
    BoltHoles {
        #[serde(default)]
        location: HoleLocation,
        #[serde(default = "default_bolt_diameter")]
        diameter: f64,
        #[serde(default = "default_bolt_count")]
        count: u32,
        #[serde(default = "default_bolt_spacing")]
        spacing: f64,
        #[serde(default)]
        position: HolePosition,
    },
    EndPlate {
        #[serde(default)]
        end: MemberEnd,
        #[serde(default = "default_plate_thickness")]
        thickness: f64,
        /// Defaults to section depth + 2.
        #[serde(default)]
        height: Option<f64>,
        /// Defaults to section width.
        #[serde(default)]
        width: Option<f64>,
    },
    Cope {
        #[serde(default)]
        end: MemberEnd,
        #[serde(default)]
        flange: Flange,
        #[serde(default = "default_cope_depth")]
        depth: f64,
        #[serde(default = "default_cope_height")]
        height: f64,
    },
    Slot {
        #[serde(default = "default_slot_face")]
        face: FaceName,
        #[serde(default = "default_slot_width")]
        width: f64,
        #[serde(default = "default_slot_length")]
        length: f64,
        /// Axial centre of the slot; defaults to mid-length.
        #[serde(default)]
        z_position: Option<f64>,
    },
    ThroughPlateSlot {
        #[serde(default)]
        position: MemberEnd,
        /// Defaults to 70% of the section depth.
        #[serde(default)]
        slot_height: Option<f64>,
        #[serde(default = "default_plate_thickness")]
        plate_thickness: f64,
    },
}

impl FeatureKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            FeatureKind::Fillet { .. } => "fillet",
            FeatureKind::Sketch { .. } => "sketch",
            FeatureKind::BoltHoles { .. } => "bolt_holes",
            FeatureKind::EndPlate { .. } => "end_plate",
            FeatureKind::Cope { .. } => "cope",
            FeatureKind::Slot { .. } => "slot",
            FeatureKind::ThroughPlateSlot { .. } => "through_plate_slot",
        }
    }
}

fn default_bolt_diameter() -> f64 {
    0.875
}
fn default_bolt_count() -> u32 {
    2
}
fn default_bolt_spacing() -> f64 {
    3.0
}
fn default_plate_thickness() -> f64 {
    0.5
}
fn default_cope_depth() -> f64 {
    2.0
}
fn default_cope_height() -> f64 {
    1.5
}
fn default_slot_face() -> FaceName {
    FaceName::Front
}
fn default_slot_width() -> f64 {
    2.0
}
fn default_slot_length() -> f64 {
    4.0
}

/// Named edge group produced by edge classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeGroup {
    Vertical,
    Base,
    Top,
    All,
}

/// Named face produced by face classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceName {
    Base,
    Top,
    Front,
    Back,
    Left,
    Right,
}

impl FaceName {
    pub const ALL: [FaceName; 6] = [
        FaceName::Base,
        FaceName::Top,
        FaceName::Front,
        FaceName::Back,
        FaceName::Left,
        FaceName::Right,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum SketchProfile {
    Circle { radius: f64 },
    Rectangle { width: f64, height: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SketchOp {
    Cut,
    Extrude,
}

/// Where bolt holes are drilled.
///
/// Wide-flange members use `web`, `top_flange` or `bottom_flange`.
/// Rectangular HSS use a wall name. Round HSS use `radial`, or a wall
/// name as shorthand for 0/90/180/270 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoleLocation {
    #[default]
    Web,
    TopFlange,
    BottomFlange,
    Front,
    Back,
    Left,
    Right,
    Radial { angle_deg: f64 },
}

/// Axial placement of a bolt-hole row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolePosition {
    Start,
    #[default]
    End,
    Center,
    /// First hole at an explicit distance from the start end.
    At(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberEnd {
    #[default]
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flange {
    #[default]
    Top,
    Bottom,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bolt_holes_json_uses_defaults() {
        let f: Feature = serde_json::from_str(r#"{"type": "bolt_holes", "count": 3}"#).unwrap();
        assert!(f.enabled);
        assert_eq!(
            f.kind,
            FeatureKind::BoltHoles {
                location: HoleLocation::Web,
                diameter: 0.875,
                count: 3,
                spacing: 3.0,
                position: HolePosition::End,
            }
        );
    }

    #[test]
    fn disabled_fillet_round_trips_through_json() {
        let f = Feature::new(FeatureKind::Fillet {
            edges: EdgeGroup::Vertical,
            radius: 0.25,
        })
        .disabled();
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.contains(r#""type":"fillet""#));
        assert!(json.contains(r#""enabled":false"#));
        let back: Feature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn sketch_profile_and_explicit_hole_position() {
        let f: Feature = serde_json::from_str(
            r#"{"type": "sketch", "face": "top", "operation": "cut", "amount": 1.0,
                "profile": {"shape": "circle", "radius": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(f.type_name(), "sketch");

        let p: HolePosition = serde_json::from_str(r#"{"at": 12.5}"#).unwrap();
        assert_eq!(p, HolePosition::At(12.5));
        let r: HoleLocation = serde_json::from_str(r#"{"radial": {"angle_deg": 45.0}}"#).unwrap();
        assert_eq!(r, HoleLocation::Radial { angle_deg: 45.0 });
    }

    #[test]
    fn unknown_feature_type_is_rejected() {
        let err = serde_json::from_str::<Feature>(r#"{"type": "weld", "size": 0.25}"#);
        assert!(err.is_err());
    }
}
