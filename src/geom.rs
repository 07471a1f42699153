//! Shared geometry utilities for lattice rings.

/// Signed area of a closed ring via the shoelace formula.
///
/// Positive = counter-clockwise in y-up coordinates (clockwise on screen).
pub fn signed_area(points: &[(i32, i32)]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice: i64 = 0;
    for i in 0..n {
        let j = (i + 1) % n;
        twice += points[i].0 as i64 * points[j].1 as i64 - points[j].0 as i64 * points[i].1 as i64;
    }
    twice as f64 / 2.0
}

/// Ray-casting point-in-polygon test.
pub fn point_in_ring(point: (f64, f64), ring: &[(i32, i32)]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let (px, py) = point;
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i].0 as f64, ring[i].1 as f64);
        let (xj, yj) = (ring[j].0 as f64, ring[j].1 as f64);
        if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: [(i32, i32); 4] = [(0, 0), (10, 0), (10, 10), (0, 10)];

    #[test]
    fn area_sign_follows_orientation() {
        assert_eq!(signed_area(&SQUARE), 100.0);
        let reversed: Vec<_> = SQUARE.iter().rev().copied().collect();
        assert_eq!(signed_area(&reversed), -100.0);
    }

    #[test]
    fn short_rings_have_no_area() {
        assert_eq!(signed_area(&[(0, 0), (5, 5)]), 0.0);
        assert!(!point_in_ring((0.0, 0.0), &[(0, 0), (5, 5)]));
    }

    #[test]
    fn containment() {
        assert!(point_in_ring((5.0, 5.0), &SQUARE));
        assert!(point_in_ring((0.5, 9.5), &SQUARE));
        assert!(!point_in_ring((11.0, 5.0), &SQUARE));
        assert!(!point_in_ring((-1.0, -1.0), &SQUARE));
    }
}
