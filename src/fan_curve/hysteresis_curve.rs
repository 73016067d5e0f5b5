use std::{cell::Cell, cmp::Ordering};

use crate::fan_curve::{CurvePoint, FanCurve, linear_curve::LinearCurve};

#[derive(Debug)]
pub struct HysteresisCurve<T: FanCurve> {
    curve: T,

    // Store the temperature and fan speed of the last update
    last_update: Cell<Option<(i32, u8)>>,

    // Hysteresis lower threshold
    // When the Delta-T is negative and greater than this
    // threshold an update will occur
    lower_threshold: u32,

    // Hysteresis upper threshold
    // When the Delta-T is positive and greater than this
    // threshold an update will occur
    upper_threshold: u32,
}

impl<T: FanCurve> HysteresisCurve<T> {
    // Create a hysteresis curve from an existing fan curve
    pub fn from_curve(
        curve: T,
        lower_threshold: u32,
        upper_threshold: u32,
    ) -> HysteresisCurve<T> {
        Self {
            curve,

            last_update: Cell::new(None),

            lower_threshold,
            upper_threshold,
        }
    }

    fn update(&self, temp: i32) -> u8 {
        let speed = self.curve.get_speed(temp);
        self.last_update.set(Some((temp, speed)));

        speed
    }
}

impl HysteresisCurve<LinearCurve> {
    // Create a hysteresis curve using a linear curve as the base
    pub fn new(
        points: &[CurvePoint],
        lower_threshold: u32,
        upper_threshold: u32,
    ) -> Self {
        Self::from_curve(
            LinearCurve::new(points),
            lower_threshold,
            upper_threshold,
        )
    }
}

impl<T: FanCurve> FanCurve for HysteresisCurve<T> {
    fn get_speed(&self, temp: i32) -> u8 {
        // If last update is None update immediately and return the result
        let Some((last_temp, last_speed)) = self.last_update.get() else {
            return self.update(temp);
        };

        // Widened so readings far apart can't overflow
        let delta = i64::from(temp) - i64::from(last_temp);

        let threshold = match delta.cmp(&0) {
            Ordering::Less | Ordering::Equal => self.lower_threshold,
            Ordering::Greater => self.upper_threshold,
        };

        // If the Delta-T is greater or equal to the
        // threshold trigger an update
        if delta.unsigned_abs() >= u64::from(threshold) {
            self.update(temp)
        } else {
            last_speed
        }
    }

    // Changing the curve invalidates the cached speed
    fn add_point(&mut self, point: CurvePoint) {
        self.curve.add_point(point);
        self.last_update.set(None);
    }

    fn remove_point(&mut self, temp: i32) {
        self.curve.remove_point(temp);
        self.last_update.set(None);
    }

    fn points_num(&self) -> usize {
        self.curve.points_num()
    }
}
