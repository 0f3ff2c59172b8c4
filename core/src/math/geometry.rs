/// Rotates the offset `(dx, dy)` by `degrees` (counter-clockwise in a
/// y-up frame, clockwise on a y-down screen).
pub fn rotate(dx: f32, dy: f32, degrees: f32) -> (f32, f32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (dx * cos - dy * sin, dx * sin + dy * cos)
}

/// Corners of a `length` x `width` rectangle centered on `center` and
/// rotated by `degrees`, in drawing order.
pub fn oriented_rect(center: (f32, f32), length: f32, width: f32, degrees: f32) -> [(f32, f32); 4] {
    let (hl, hw) = (length / 2.0, width / 2.0);
    [(-hl, -hw), (hl, -hw), (hl, hw), (-hl, hw)].map(|(dx, dy)| {
        let (rx, ry) = rotate(dx, dy, degrees);
        (center.0 + rx, center.1 + ry)
    })
}

/// Values `start, start + step, ...` up to and including `end`.
pub fn grid_lines(start: f32, end: f32, step: f32) -> Vec<f32> {
    if !(step.is_finite() && step > 0.0) || !(start.is_finite() && end.is_finite()) {
        return Vec::new();
    }
    let count = ((end - start) / step + 1e-3).floor().max(0.0) as usize;
    (0..=count).map(|i| start + step * i as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn quarter_turn_swaps_axes() {
        let (x, y) = rotate(1.0, 0.0, 90.0);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn unrotated_rect_is_axis_aligned() {
        let corners = oriented_rect((10.0, 5.0), 4.0, 2.0, 0.0);
        assert_eq!(corners[0], (8.0, 4.0));
        assert_eq!(corners[2], (12.0, 6.0));
    }

    #[test]
    fn grid_lines_include_both_ends() {
        assert_eq!(grid_lines(-10.0, 10.0, 5.0), vec![-10.0, -5.0, 0.0, 5.0, 10.0]);
        assert!(grid_lines(0.0, 1.0, 0.0).is_empty());
        assert!(grid_lines(0.0, f32::NAN, 1.0).is_empty());
    }
}
