// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch batches and the multi-pointer measurements taken from them.
//!
//! A batch is the set of touches reported together for one input frame. The
//! recognizer pairs each touch with what it knew about the same pointer in
//! the previous batch, producing a [`TouchChange`]. Every measurement here
//! only looks at changes that were pressed in both batches, so a finger that
//! just landed or just lifted never produces a jump.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `atan2`
use kurbo::{Point, Vec2};

/// Identifies one physical pointer for the duration of its contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

/// One touch as reported in a batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Touch {
    /// Which pointer this is.
    pub id: PointerId,
    /// Position in viewport coordinates.
    pub position: Point,
    /// Whether the pointer is currently in contact.
    pub pressed: bool,
    /// Set when some handler has already claimed this touch's motion.
    pub consumed: bool,
}

impl Touch {
    /// A pressed, unconsumed touch.
    #[must_use]
    pub fn down(id: u64, position: Point) -> Self {
        Self {
            id: PointerId(id),
            position,
            pressed: true,
            consumed: false,
        }
    }

    /// A released touch.
    #[must_use]
    pub fn up(id: u64, position: Point) -> Self {
        Self {
            pressed: false,
            ..Self::down(id, position)
        }
    }
}

/// A touch paired with the same pointer's state in the previous batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchChange {
    /// Position in this batch.
    pub position: Point,
    /// Position in the previous batch, or `position` for a new pointer.
    pub previous_position: Point,
    /// Pressed in this batch.
    pub pressed: bool,
    /// Pressed in the previous batch.
    pub previous_pressed: bool,
}

impl TouchChange {
    fn contributes(&self) -> bool {
        self.pressed && self.previous_pressed
    }

    fn at(&self, current: bool) -> Point {
        if current {
            self.position
        } else {
            self.previous_position
        }
    }

    /// Returns `true` if a pressed pointer moved since the previous batch.
    #[must_use]
    pub fn position_changed(&self) -> bool {
        self.pressed && self.position != self.previous_position
    }
}

/// Average position of the contributing pointers, in this batch (`current`)
/// or the previous one. `None` when nothing contributes.
#[must_use]
pub fn centroid(changes: &[TouchChange], current: bool) -> Option<Point> {
    let mut sum = Vec2::ZERO;
    let mut count = 0_u32;
    for change in changes.iter().filter(|c| c.contributes()) {
        sum += change.at(current).to_vec2();
        count += 1;
    }
    (count > 0).then(|| (sum / f64::from(count)).to_point())
}

/// Average distance of the contributing pointers from their centroid.
#[must_use]
pub fn centroid_size(changes: &[TouchChange], current: bool) -> f64 {
    let Some(center) = centroid(changes, current) else {
        return 0.0;
    };
    let mut total = 0.0;
    let mut count = 0_u32;
    for change in changes.iter().filter(|c| c.contributes()) {
        total += (change.at(current) - center).hypot();
        count += 1;
    }
    total / f64::from(count)
}

/// Ratio of the current to the previous centroid size; `1.0` when either is
/// zero (a single pointer, or pointers stacked on one spot).
#[must_use]
pub fn zoom(changes: &[TouchChange]) -> f64 {
    let current = centroid_size(changes, true);
    let previous = centroid_size(changes, false);
    if current == 0.0 || previous == 0.0 {
        1.0
    } else {
        current / previous
    }
}

/// Displacement of the centroid since the previous batch.
#[must_use]
pub fn pan(changes: &[TouchChange]) -> Vec2 {
    match (centroid(changes, true), centroid(changes, false)) {
        (Some(current), Some(previous)) => current - previous,
        _ => Vec2::ZERO,
    }
}

/// Rotation of the pointers about their centroid since the previous batch,
/// in degrees, positive clockwise on screen.
///
/// Each pointer's angular change is wrapped into `(-180, 180]` and weighted
/// by its average distance from the centroid, so fingers near the center
/// (whose angle is noisy) count less. Needs at least two pointers.
#[must_use]
pub fn rotation(changes: &[TouchChange]) -> f64 {
    let pointers = changes.iter().filter(|c| c.contributes()).count();
    if pointers < 2 {
        return 0.0;
    }
    let (Some(current_center), Some(previous_center)) =
        (centroid(changes, true), centroid(changes, false))
    else {
        return 0.0;
    };

    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for change in changes.iter().filter(|c| c.contributes()) {
        let current = change.position - current_center;
        let previous = change.previous_position - previous_center;

        let mut diff = angle(current) - angle(previous);
        let weight = (current + previous).hypot() / 2.0;
        if diff > 180.0 {
            diff -= 360.0;
        } else if diff < -180.0 {
            diff += 360.0;
        }
        weighted += diff * weight;
        total_weight += weight;
    }
    if total_weight == 0.0 {
        0.0
    } else {
        weighted / total_weight
    }
}

/// Angle of `v` in degrees, measured from the positive y axis. Zero vectors
/// have angle zero.
fn angle(v: Vec2) -> f64 {
    if v == Vec2::ZERO {
        0.0
    } else {
        -v.x.atan2(v.y).to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::{TouchChange, centroid, centroid_size, pan, rotation, zoom};

    fn moved(from: (f64, f64), to: (f64, f64)) -> TouchChange {
        TouchChange {
            position: Point::new(to.0, to.1),
            previous_position: Point::new(from.0, from.1),
            pressed: true,
            previous_pressed: true,
        }
    }

    #[test]
    fn new_and_lifted_pointers_do_not_contribute() {
        let landed = TouchChange {
            previous_pressed: false,
            ..moved((0.0, 0.0), (500.0, 500.0))
        };
        let lifted = TouchChange {
            pressed: false,
            ..moved((0.0, 0.0), (-500.0, 0.0))
        };
        let held = moved((10.0, 10.0), (12.0, 10.0));
        let changes = [landed, held, lifted];
        assert_eq!(centroid(&changes, true), Some(Point::new(12.0, 10.0)));
        assert_eq!(pan(&changes), Vec2::new(2.0, 0.0));
        assert_eq!(zoom(&changes), 1.0);
        assert_eq!(rotation(&changes), 0.0);
    }

    #[test]
    fn empty_batch_is_neutral() {
        assert_eq!(centroid(&[], true), None);
        assert_eq!(centroid_size(&[], false), 0.0);
        assert_eq!(zoom(&[]), 1.0);
        assert_eq!(pan(&[]), Vec2::ZERO);
        assert_eq!(rotation(&[]), 0.0);
    }

    #[test]
    fn spreading_fingers_zooms() {
        let changes = [moved((40.0, 50.0), (30.0, 50.0)), moved((60.0, 50.0), (70.0, 50.0))];
        assert_eq!(centroid_size(&changes, false), 10.0);
        assert_eq!(zoom(&changes), 2.0);
        assert_eq!(pan(&changes), Vec2::ZERO);
    }

    #[test]
    fn quarter_turn_is_ninety_degrees() {
        // Two fingers on a horizontal line turn to a vertical line.
        let changes = [moved((-10.0, 0.0), (0.0, -10.0)), moved((10.0, 0.0), (0.0, 10.0))];
        assert!((rotation(&changes) - 90.0).abs() < 1e-9);
        assert!((zoom(&changes) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rotation_wraps_across_the_seam() {
        // Slightly past the negative y axis in both directions.
        let a = moved((-1.0, -100.0), (1.0, -100.0));
        let b = moved((1.0, 100.0), (-1.0, 100.0));
        let r = rotation(&[a, b]);
        assert!(r.abs() < 2.0, "expected a small rotation, got {r}");
    }

    #[test]
    fn position_changed_requires_pressed() {
        assert!(moved((0.0, 0.0), (1.0, 0.0)).position_changed());
        assert!(!moved((1.0, 0.0), (1.0, 0.0)).position_changed());
        let lifted = TouchChange {
            pressed: false,
            ..moved((0.0, 0.0), (1.0, 0.0))
        };
        assert!(!lifted.position_changed());
    }
}
