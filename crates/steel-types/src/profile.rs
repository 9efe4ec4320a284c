use serde::{Deserialize, Serialize};

/// Immutable cross-section descriptor. Dimensions are in inches.
///
/// The serde form accepts the catalog column names (`depth_d`,
/// `flange_width_bf`, ...) as aliases so tabulated section data can be
/// loaded without a translation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub designation: String,
    /// Unit weight in pounds per foot, when the catalog provides one.
    #[serde(default)]
    pub weight_lb_ft: Option<f64>,
    #[serde(flatten)]
    pub shape: Shape,
}

/// Cross-section family with only the dimensions that family has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    #[serde(alias = "w", alias = "i_shape")]
    WideFlange {
        #[serde(alias = "depth_d")]
        depth: f64,
        #[serde(alias = "flange_width_bf")]
        flange_width: f64,
        #[serde(alias = "flange_thickness_tf")]
        flange_thickness: f64,
        #[serde(alias = "web_thickness_tw")]
        web_thickness: f64,
        /// Web-to-flange fillet radius `k`; zero disables the fillet.
        /// Records without one get [`DEFAULT_FILLET_RADIUS`].
        #[serde(default = "default_fillet_radius", alias = "fillet_radius_k")]
        fillet_radius: f64,
    },
    #[serde(alias = "square", alias = "rectangular")]
    RectHss {
        outer_width: f64,
        outer_height: f64,
        wall_thickness: f64,
        /// Outer corner radius; defaults to twice the wall thickness.
        #[serde(default)]
        corner_radius: Option<f64>,
    },
    #[serde(alias = "round")]
    RoundHss {
        outer_diameter: f64,
        wall_thickness: f64,
    },
}

/// Web-to-flange fillet radius used when a record leaves `k` out.
pub const DEFAULT_FILLET_RADIUS: f64 = 0.5;

fn default_fillet_radius() -> f64 {
    DEFAULT_FILLET_RADIUS
}

impl Profile {
    /// Sharp-cornered wide flange; chain [`Profile::with_fillet`] for a `k` radius.
    pub fn wide_flange(
        designation: impl Into<String>,
        depth: f64,
        flange_width: f64,
        flange_thickness: f64,
        web_thickness: f64,
    ) -> Self {
        Self {
            designation: designation.into(),
            weight_lb_ft: None,
            shape: Shape::WideFlange {
                depth,
                flange_width,
                flange_thickness,
                web_thickness,
                fillet_radius: 0.0,
            },
        }
    }

    pub fn rect_hss(
        designation: impl Into<String>,
        outer_width: f64,
        outer_height: f64,
        wall_thickness: f64,
    ) -> Self {
        Self {
            designation: designation.into(),
            weight_lb_ft: None,
            shape: Shape::RectHss {
                outer_width,
                outer_height,
                wall_thickness,
                corner_radius: None,
            },
        }
    }

    pub fn round_hss(designation: impl Into<String>, outer_diameter: f64, wall_thickness: f64) -> Self {
        Self {
            designation: designation.into(),
            weight_lb_ft: None,
            shape: Shape::RoundHss {
                outer_diameter,
                wall_thickness,
            },
        }
    }

    pub fn with_weight(mut self, weight_lb_ft: f64) -> Self {
        self.weight_lb_ft = Some(weight_lb_ft);
        self
    }

    /// Set the web-flange fillet radius. No effect on hollow sections.
    pub fn with_fillet(mut self, k: f64) -> Self {
        if let Shape::WideFlange { fillet_radius, .. } = &mut self.shape {
            *fillet_radius = k;
        }
        self
    }

    /// Overall depth along the strong axis.
    pub fn depth(&self) -> f64 {
        match self.shape {
            Shape::WideFlange { depth, .. } => depth,
            Shape::RectHss { outer_height, .. } => outer_height,
            Shape::RoundHss { outer_diameter, .. } => outer_diameter,
        }
    }

    /// Overall width across the flanges or walls.
    pub fn width(&self) -> f64 {
        match self.shape {
            Shape::WideFlange { flange_width, .. } => flange_width,
            Shape::RectHss { outer_width, .. } => outer_width,
            Shape::RoundHss { outer_diameter, .. } => outer_diameter,
        }
    }

    /// Hollow sections by shape, plus I-shape records whose designation
    /// marks them as tube stock.
    pub fn is_hollow(&self) -> bool {
        match self.shape {
            Shape::RectHss { .. } | Shape::RoundHss { .. } => true,
            Shape::WideFlange { .. } => {
                let d = self.designation.to_ascii_uppercase();
                d.contains("HSS") || d.contains("TUBE")
            }
        }
    }

    /// Weight in pounds of a piece `length` inches long.
    pub fn weight_for_length(&self, length: f64) -> Option<f64> {
        self.weight_lb_ft.map(|w| w * length / 12.0)
    }

    /// Member-type tag used in exported metadata.
    pub fn member_type(&self) -> &'static str {
        match self.shape {
            Shape::WideFlange { .. } => "W",
            Shape::RectHss { .. } => "HSS_RECT",
            Shape::RoundHss { .. } => "HSS_ROUND",
        }
    }
}
