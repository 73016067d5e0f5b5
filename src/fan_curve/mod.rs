pub mod hysteresis_curve;
pub mod linear_curve;

// Map a temperature in whole degrees Celsius to a fan duty cycle
// in percent (0 to 100)
pub trait FanCurve {
    // Add a point to the fan curve, replacing any point
    // at the same temperature
    fn add_point(&mut self, point: CurvePoint);
    // Delete the point at the given temperature
    fn remove_point(&mut self, temp: i32);

    // Return the number of points in the curve
    fn points_num(&self) -> usize;

    // Return the fan speed for the given temperature
    fn get_speed(&self, temp: i32) -> u8;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurvePoint {
    pub temp: i32,
    pub percent: u8,
}

impl CurvePoint {
    // Create a curve point, the duty cycle is clamped to 100
    pub fn new(temp: i32, percent: u8) -> Self {
        Self {
            temp,
            percent: percent.min(100),
        }
    }
}

impl From<(i32, u8)> for CurvePoint {
    fn from(value: (i32, u8)) -> Self {
        Self::new(value.0, value.1)
    }
}
