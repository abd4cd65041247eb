use crate::error::Error;
use ordered_float::NotNan;
use std::ops::Sub;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub(crate) struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub(crate) fn new(x: f32, y: f32) -> Result<Self, Error> {
        Ok(Self {
            x: NotNan::new(x)
                .map_err(|e| Error::ConstructNotNan(e, x))?
                .into_inner(),
            y: NotNan::new(y)
                .map_err(|e| Error::ConstructNotNan(e, y))?
                .into_inner(),
        })
    }

    #[inline]
    pub(crate) fn x(self) -> f32 {
        self.x
    }

    #[inline]
    pub(crate) fn y(self) -> f32 {
        self.y
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::Output {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Point;

    #[test]
    fn subtraction() {
        let a = Point::new(0.5, 0.5).unwrap();
        let b = Point::new(1.0, 1.0).unwrap();
        let delta = b - a;
        assert_eq!(delta, Point::new(0.5, 0.5).unwrap());
    }

    #[test]
    fn nan_coordinates_are_rejected() {
        assert!(Point::new(f32::NAN, 0.0).is_err());
        assert!(Point::new(0.0, f32::NAN).is_err());
    }
}
