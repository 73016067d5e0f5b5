use std::collections::BTreeMap;

use crate::fan_curve::{CurvePoint, FanCurve};

#[derive(Debug, Default, Clone)]
pub struct LinearCurve {
    points: BTreeMap<i32, u8>,
}

impl LinearCurve {
    pub fn new(points: &[CurvePoint]) -> LinearCurve {
        let mut curve = Self::default();

        // Add the provided points to the curve
        for p in points {
            curve.add_point(*p);
        }

        curve
    }
}

impl FanCurve for LinearCurve {
    fn get_speed(&self, temp: i32) -> u8 {
        // Check if temperature is the map, in that case return
        // the corresponding fan speed
        if let Some(speed) = self.points.get(&temp) {
            return *speed;
        }

        // Find the 2 points of the temperature interval
        let preceding = self.points.range(..temp).next_back();
        let succeeding = self.points.range(temp..).next();

        match (preceding, succeeding) {
            (Some(pre), Some(suc)) => linear_interpolation(pre, suc, temp),
            // Outside of the curve use the closest end point
            (Some(pre), None) => *pre.1,
            (None, Some(suc)) => *suc.1,
            // If no element was in the map return 100 for safety
            (None, None) => 100,
        }
    }

    fn add_point(&mut self, point: CurvePoint) {
        self.points.insert(point.temp, point.percent.min(100));
    }

    fn remove_point(&mut self, temp: i32) {
        self.points.remove(&temp);
    }

    fn points_num(&self) -> usize {
        self.points.len()
    }
}

// Perform the linear interpolation between
// two points and return the fan speed
fn linear_interpolation(pre: (&i32, &u8), suc: (&i32, &u8), temp: i32) -> u8 {
    let p = temp as f32;

    let x1 = *pre.0 as f32;
    let y1 = *pre.1 as f32;
    let x2 = *suc.0 as f32;
    let y2 = *suc.1 as f32;

    let m = (y1 - y2) / (x1 - x2);
    let b = (x1 * y2 - x2 * y1) / (x1 - x2);

    (m * p + b).round().clamp(0., 100.) as u8
}
