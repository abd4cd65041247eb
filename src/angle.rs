use crate::point::Point;

/// Angle at vertex `b` formed by the rays `b -> a` and `b -> c`, in degrees.
///
/// Computed as the absolute atan2 difference of the two rays, folded into
/// `[0, 180]`. Degenerate inputs (collinear or coincident points) yield 0 or
/// 180 rather than an error.
pub(crate) fn joint_angle(a: Point, b: Point, c: Point) -> f32 {
    let first = a - b;
    let second = c - b;
    let radians = second.y().atan2(second.x()) - first.y().atan2(first.x());
    let degrees = radians.abs().to_degrees();
    if degrees > 180.0 {
        360.0 - degrees
    } else {
        degrees
    }
}
