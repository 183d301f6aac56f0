use glam::Vec3;

use crate::error::TransferFunctionError;

/// Piecewise linear mapping from a scalar attribute to an RGBA color.
///
/// Colors and opacities are independent ramps of evenly spaced stops
/// spanning `value_range`. Values outside the range are clamped to the end
/// stops.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferFunction {
    colors: Vec<Vec3>,
    opacities: Vec<f32>,
    value_range: [f32; 2],
}

impl TransferFunction {
    pub fn piecewise_linear(
        colors: Vec<[f32; 3]>,
        opacities: Vec<f32>,
        value_range: [f32; 2],
    ) -> Result<Self, TransferFunctionError> {
        if colors.is_empty() {
            return Err(TransferFunctionError::NoColors);
        }
        if opacities.is_empty() {
            return Err(TransferFunctionError::NoOpacities);
        }
        check_range(value_range)?;

        Ok(Self {
            colors: colors.into_iter().map(Vec3::from).collect(),
            opacities,
            value_range,
        })
    }

    pub fn value_range(&self) -> [f32; 2] {
        self.value_range
    }

    pub fn set_value_range(&mut self, value_range: [f32; 2]) -> Result<(), TransferFunctionError> {
        check_range(value_range)?;
        self.value_range = value_range;
        Ok(())
    }

    pub fn num_colors(&self) -> usize {
        self.colors.len()
    }

    pub fn num_opacities(&self) -> usize {
        self.opacities.len()
    }

    /// Position of `value` within the range, in `[0, 1]`.
    pub fn normalize(&self, value: f32) -> f32 {
        let [lo, hi] = self.value_range;
        if hi <= lo || value.is_nan() {
            return 0.0;
        }
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    }

    pub fn color(&self, value: f32) -> Vec3 {
        let (index, frac) = stop_position(self.colors.len(), self.normalize(value));
        match self.colors.get(index + 1) {
            Some(next) => self.colors[index].lerp(*next, frac),
            None => self.colors[index],
        }
    }

    pub fn opacity(&self, value: f32) -> f32 {
        let (index, frac) = stop_position(self.opacities.len(), self.normalize(value));
        match self.opacities.get(index + 1) {
            Some(next) => self.opacities[index] + (next - self.opacities[index]) * frac,
            None => self.opacities[index],
        }
    }

    pub fn map(&self, value: f32) -> [f32; 4] {
        self.color(value).extend(self.opacity(value)).to_array()
    }
}

fn check_range([lo, hi]: [f32; 2]) -> Result<(), TransferFunctionError> {
    if !lo.is_finite() || !hi.is_finite() || lo > hi {
        return Err(TransferFunctionError::InvalidRange(lo, hi));
    }
    Ok(())
}

// Index of the stop at or below `t` and the blend factor towards the next one.
fn stop_position(num_stops: usize, t: f32) -> (usize, f32) {
    if num_stops < 2 {
        return (0, 0.0);
    }
    let segments = (num_stops - 1) as f32;
    let position = t * segments;
    let index = (position.floor() as usize).min(num_stops - 2);
    (index, position - index as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> TransferFunction {
        TransferFunction::piecewise_linear(
            vec![[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
            vec![0.0, 1.0],
            [0.0, 10.0],
        )
        .unwrap()
    }

    #[test]
    fn test_end_stops() {
        let tf = ramp();
        assert_eq!(tf.map(0.0), [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(tf.map(10.0), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_interpolates_between_stops() {
        let tf = ramp();
        assert_eq!(tf.color(5.0), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(tf.color(2.5), Vec3::new(0.0, 0.5, 0.5));
        assert_eq!(tf.opacity(2.5), 0.25);
    }

    #[test]
    fn test_clamps_outside_range() {
        let tf = ramp();
        assert_eq!(tf.map(-100.0), tf.map(0.0));
        assert_eq!(tf.map(1e9), tf.map(10.0));
        assert_eq!(tf.map(f32::NAN), tf.map(0.0));
    }

    #[test]
    fn test_single_stop() {
        let tf = TransferFunction::piecewise_linear(vec![[0.2, 0.4, 0.6]], vec![0.5], [0.0, 1.0]).unwrap();
        assert_eq!(tf.map(0.7), [0.2, 0.4, 0.6, 0.5]);
    }

    #[test]
    fn test_degenerate_range() {
        let tf = TransferFunction::piecewise_linear(vec![[0.0; 3], [1.0; 3]], vec![1.0], [3.0, 3.0]).unwrap();
        assert_eq!(tf.normalize(3.0), 0.0);
        assert_eq!(tf.map(42.0), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_invalid() {
        assert_eq!(
            TransferFunction::piecewise_linear(vec![], vec![1.0], [0.0, 1.0]),
            Err(TransferFunctionError::NoColors)
        );
        assert_eq!(
            TransferFunction::piecewise_linear(vec![[1.0; 3]], vec![], [0.0, 1.0]),
            Err(TransferFunctionError::NoOpacities)
        );
        assert_eq!(
            TransferFunction::piecewise_linear(vec![[1.0; 3]], vec![1.0], [2.0, 1.0]),
            Err(TransferFunctionError::InvalidRange(2.0, 1.0))
        );
        assert!(TransferFunction::piecewise_linear(vec![[1.0; 3]], vec![1.0], [0.0, f32::INFINITY]).is_err());
    }

    #[test]
    fn test_set_value_range() {
        let mut tf = ramp();
        tf.set_value_range([10.0, 20.0]).unwrap();
        assert_eq!(tf.value_range(), [10.0, 20.0]);
        assert_eq!(tf.color(15.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(tf.set_value_range([1.0, 0.0]).is_err());
        assert_eq!(tf.value_range(), [10.0, 20.0]);
    }
}
