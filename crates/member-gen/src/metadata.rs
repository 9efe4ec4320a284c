use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::types::{Member, MemberKind};

/// Flat key/value description of a member for the asset store.
pub fn member_metadata(member: &Member) -> BTreeMap<String, Value> {
    let mut meta = BTreeMap::new();
    meta.insert("id".to_string(), json!(member.id.to_string()));
    meta.insert("generatorType".to_string(), json!(member.generator_type()));
    meta.insert("memberType".to_string(), json!(member.member_type()));
    meta.insert("designation".to_string(), json!(member.designation()));
    meta.insert("length".to_string(), json!(member.length));

    let shape = match &member.kind {
        MemberKind::Section { profile } => {
            meta.insert(
                "aisc_data".to_string(),
                serde_json::to_value(profile).unwrap_or(Value::Null),
            );
            json!({
                "depth": profile.depth(),
                "width": profile.width(),
                "hollow": profile.is_hollow(),
            })
        }
        MemberKind::TaperedPrism {
            base,
            top,
            height,
            angle_deg,
        } => json!({
            "base": base,
            "top": top,
            "height": height,
            "angle_deg": angle_deg,
        }),
        MemberKind::BasePlate { width, thickness } => json!({
            "length": member.length,
            "width": width,
            "thickness": thickness,
        }),
    };
    meta.insert("shape".to_string(), shape);
    meta.insert(
        "features".to_string(),
        serde_json::to_value(&member.features).unwrap_or(Value::Null),
    );
    meta.insert(
        "feature_steps".to_string(),
        serde_json::to_value(&member.steps).unwrap_or(Value::Null),
    );
    if let Some(weight) = member.weight_lbs() {
        meta.insert("weight_lbs".to_string(), json!(weight));
    }
    meta
}
