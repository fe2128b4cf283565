use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::geometry::Point;
use crate::participant::Device;

/// Outcome of one completed acquisition attempt. Built once when the trial is
/// scored and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub participant_id: String,
    pub device: Device,
    /// 1-based
    pub block: usize,
    /// 1-based
    pub trial_in_block: usize,
    #[serde(flatten)]
    pub condition: Condition,
    pub id_shannon: f64,
    pub movement_time_ms: f64,
    pub path_length_px: f64,
    pub target_cx: f64,
    pub target_cy: f64,
    pub click_x: f64,
    pub click_y: f64,
    #[serde(with = "hit_flag")]
    pub hit: bool,
}

impl TrialRecord {
    /// Column order shared by the tabular and structured exports.
    pub const FIELD_NAMES: [&'static str; 15] = [
        "participant_id",
        "device",
        "block",
        "trial_in_block",
        "diameter_px",
        "distance_px",
        "direction",
        "id_shannon",
        "movement_time_ms",
        "path_length_px",
        "target_cx",
        "target_cy",
        "click_x",
        "click_y",
        "hit",
    ];

    pub fn target_center(&self) -> Point {
        Point::new(self.target_cx, self.target_cy)
    }

    pub fn click(&self) -> Point {
        Point::new(self.click_x, self.click_y)
    }

    /// Field values in [`Self::FIELD_NAMES`] order, unescaped.
    pub fn values(&self) -> [String; 15] {
        [
            self.participant_id.clone(),
            self.device.to_string(),
            self.block.to_string(),
            self.trial_in_block.to_string(),
            self.condition.diameter.to_string(),
            self.condition.distance.to_string(),
            self.condition.direction.to_string(),
            self.id_shannon.to_string(),
            self.movement_time_ms.to_string(),
            self.path_length_px.to_string(),
            self.target_cx.to_string(),
            self.target_cy.to_string(),
            self.click_x.to_string(),
            self.click_y.to_string(),
            u8::from(self.hit).to_string(),
        ]
    }
}

/// Hits are exported as `1`/`0` rather than JSON booleans.
mod hit_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hit: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(u8::from(*hit))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(u8::deserialize(d)? != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Direction;

    fn sample(hit: bool) -> TrialRecord {
        TrialRecord {
            participant_id: "P1".into(),
            device: Device::Mouse,
            block: 1,
            trial_in_block: 3,
            condition: Condition::new(40.0, 200.0, Direction::Left),
            id_shannon: 6f64.log2(),
            movement_time_ms: 512.5,
            path_length_px: 230.25,
            target_cx: 440.0,
            target_cy: 300.0,
            click_x: 441.0,
            click_y: 299.0,
            hit,
        }
    }

    #[test]
    fn json_keys_follow_field_order() {
        let value = serde_json::to_value(sample(true)).unwrap();
        let text = serde_json::to_string(&sample(true)).unwrap();
        let mut last = 0;
        for name in TrialRecord::FIELD_NAMES {
            let at = text
                .find(&format!("\"{name}\""))
                .unwrap_or_else(|| panic!("missing {name}"));
            assert!(at >= last, "{name} out of order");
            last = at;
        }
        assert_eq!(value["hit"], 1);
        assert_eq!(value["direction"], "left");
        assert_eq!(value["diameter_px"], 40.0);
    }

    #[test]
    fn values_line_up_with_field_names() {
        let values = sample(false).values();
        assert_eq!(values[0], "P1");
        assert_eq!(values[1], "mouse");
        assert_eq!(values[4], "40");
        assert_eq!(values[6], "left");
        assert_eq!(values[14], "0");
    }

    #[test]
    fn record_survives_json() {
        let record = sample(false);
        let text = serde_json::to_string(&record).unwrap();
        let back: TrialRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back.condition, record.condition);
        assert_eq!(back.device, record.device);
        assert!(!back.hit);
        assert!((back.id_shannon - record.id_shannon).abs() < 1e-12);
    }
}
