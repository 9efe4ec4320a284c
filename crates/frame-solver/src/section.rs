use serde::{Deserialize, Serialize};
use steel_types::{Profile, Shape};

/// Gross section properties about the strong axis (inches).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    pub a: f64,
    pub ix: f64,
    pub sx: f64,
    pub r: f64,
    pub d: f64,
}

/// Area and moment of inertia of a profile, with section modulus and
/// radius of gyration derived from them. Never fails: degenerate input
/// yields `r = 1.0` and `sx = 0.0` instead of NaN.
pub fn section_properties(profile: &Profile) -> SectionProperties {
    let (a, ix, d) = match profile.shape {
        Shape::RectHss {
            outer_width,
            outer_height,
            wall_thickness,
            ..
        } => hollow_rect(outer_height, outer_width, wall_thickness, wall_thickness),
        Shape::RoundHss {
            outer_diameter,
            wall_thickness,
        } => annulus(outer_diameter, wall_thickness),
        Shape::WideFlange {
            depth,
            flange_width,
            flange_thickness,
            web_thickness,
            ..
        } => {
            if profile.is_hollow() {
                hollow_rect(depth, flange_width, flange_thickness, web_thickness)
            } else {
                i_shape(depth, flange_width, flange_thickness, web_thickness)
            }
        }
    };

    let r = if a > 0.0 { (ix / a).sqrt() } else { 1.0 };
    let sx = if d > 0.0 { ix / (d / 2.0) } else { 0.0 };
    SectionProperties { a, ix, sx, r, d }
}

fn hollow_rect(d: f64, bf: f64, tf: f64, tw: f64) -> (f64, f64, f64) {
    let inner_d = d - 2.0 * tf;
    let inner_b = bf - 2.0 * tw;
    let a = d * bf - inner_d * inner_b;
    let ix = (bf * d.powi(3) - inner_b * inner_d.powi(3)) / 12.0;
    (a, ix, d)
}

fn i_shape(d: f64, bf: f64, tf: f64, tw: f64) -> (f64, f64, f64) {
    let a = 2.0 * bf * tf + (d - 2.0 * tf) * tw;
    let ix = (bf * d.powi(3) - (bf - tw) * (d - 2.0 * tf).powi(3)) / 12.0;
    (a, ix, d)
}

fn annulus(od: f64, t: f64) -> (f64, f64, f64) {
    let id = (od - 2.0 * t).max(0.0);
    let a = std::f64::consts::PI / 4.0 * (od.powi(2) - id.powi(2));
    let ix = std::f64::consts::PI / 64.0 * (od.powi(4) - id.powi(4));
    (a, ix, od)
}

// ── Wall adequacy ───────────────────────────────────────────────────────────

/// Walls thinner than this are flagged regardless of slenderness.
pub const MIN_WALL_THICKNESS: f64 = 0.25;

/// Face width over wall thickness above which a wall is slender.
pub const SLENDER_B_OVER_T: f64 = 35.0;

/// Informational check on a hollow section's wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallCheck {
    pub adequate: bool,
    pub b_over_t: f64,
    pub message: String,
}

pub fn check_wall(face_width: f64, wall_thickness: f64) -> WallCheck {
    let b_over_t = if wall_thickness > 0.0 {
        face_width / wall_thickness
    } else {
        999.0
    };

    if wall_thickness < MIN_WALL_THICKNESS {
        WallCheck {
            adequate: false,
            b_over_t,
            message: format!(
                "Wall {}\" < minimum {}\"",
                wall_thickness, MIN_WALL_THICKNESS
            ),
        }
    } else if b_over_t > SLENDER_B_OVER_T {
        WallCheck {
            adequate: false,
            b_over_t,
            message: format!("b/t = {:.1} > {} (slender)", b_over_t, SLENDER_B_OVER_T),
        }
    } else {
        WallCheck {
            adequate: true,
            b_over_t,
            message: format!("Wall adequate (b/t = {:.1})", b_over_t),
        }
    }
}

/// Wall check for a hollow profile, using its widest face. `None` for
/// open sections.
pub fn profile_wall_check(profile: &Profile) -> Option<WallCheck> {
    match profile.shape {
        Shape::RectHss {
            outer_width,
            outer_height,
            wall_thickness,
            ..
        } => Some(check_wall(outer_width.max(outer_height), wall_thickness)),
        Shape::RoundHss {
            outer_diameter,
            wall_thickness,
        } => Some(check_wall(outer_diameter, wall_thickness)),
        Shape::WideFlange { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_i_shape_properties() {
        let w = Profile::wide_flange("W10x49", 10.0, 10.0, 0.56, 0.34);
        let p = section_properties(&w);
        assert_relative_eq!(p.a, 2.0 * 10.0 * 0.56 + 8.88 * 0.34, epsilon = 1e-9);
        let ix = (10.0 * 1000.0 - 9.66 * 8.88f64.powi(3)) / 12.0;
        assert_relative_eq!(p.ix, ix, epsilon = 1e-9);
        assert_relative_eq!(p.sx, ix / 5.0, epsilon = 1e-9);
        assert_relative_eq!(p.r, (ix / p.a).sqrt(), epsilon = 1e-12);
        assert_eq!(p.d, 10.0);
    }

    #[test]
    fn test_rect_hss_properties() {
        let hss = Profile::rect_hss("HSS6x6x1/4", 6.0, 6.0, 0.25);
        let p = section_properties(&hss);
        assert_relative_eq!(p.a, 36.0 - 5.5 * 5.5, epsilon = 1e-9);
        assert_relative_eq!(
            p.ix,
            (6.0 * 216.0 - 5.5 * 5.5f64.powi(3)) / 12.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_tube_designation_uses_hollow_formula() {
        let tube = Profile::wide_flange("Tube 6x6", 6.0, 6.0, 0.25, 0.25);
        let hss = Profile::rect_hss("HSS6x6", 6.0, 6.0, 0.25);
        assert_eq!(section_properties(&tube), section_properties(&hss));
    }

    #[test]
    fn test_round_hss_annulus() {
        let pipe = Profile::round_hss("HSS6.625x0.250", 6.625, 0.25);
        let p = section_properties(&pipe);
        let id: f64 = 6.125;
        let pi = std::f64::consts::PI;
        assert_relative_eq!(p.a, pi / 4.0 * (6.625f64.powi(2) - id.powi(2)), epsilon = 1e-9);
        assert_relative_eq!(p.ix, pi / 64.0 * (6.625f64.powi(4) - id.powi(4)), epsilon = 1e-9);
        assert_eq!(p.d, 6.625);
    }

    #[test]
    fn test_degenerate_profile_uses_fallbacks() {
        let flat = Profile::wide_flange("W0", 0.0, 0.0, 0.0, 0.0);
        let p = section_properties(&flat);
        assert_eq!(p.r, 1.0);
        assert_eq!(p.sx, 0.0);
        assert!(p.r.is_finite() && p.sx.is_finite());
    }

    #[test]
    fn test_wall_check_messages() {
        let ok = check_wall(6.0, 0.349);
        assert!(ok.adequate);
        assert_eq!(ok.message, "Wall adequate (b/t = 17.2)");

        let thin = check_wall(6.0, 0.233);
        assert!(!thin.adequate);
        assert_eq!(thin.message, "Wall 0.233\" < minimum 0.25\"");

        let slender = check_wall(10.0, 0.25);
        assert!(!slender.adequate);
        assert_relative_eq!(slender.b_over_t, 40.0);
        assert_eq!(slender.message, "b/t = 40.0 > 35 (slender)");
    }

    #[test]
    fn test_wall_check_zero_wall() {
        let c = check_wall(6.0, 0.0);
        assert_eq!(c.b_over_t, 999.0);
        assert!(!c.adequate);
    }

    #[test]
    fn test_open_sections_have_no_wall_check() {
        let w = Profile::wide_flange("W12x26", 12.2, 6.49, 0.38, 0.23);
        assert!(profile_wall_check(&w).is_none());
        let hss = Profile::rect_hss("HSS8x4x3/8", 4.0, 8.0, 0.349);
        assert_relative_eq!(profile_wall_check(&hss).unwrap().b_over_t, 8.0 / 0.349);
    }
}
