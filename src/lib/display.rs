// Screen geometry for the bubble level. Drawing itself belongs to the host.

use crate::orientation::NormalizedVector;

/// Drawable area in pixels, origin at the top left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.width / 2, self.height / 2)
    }

    /// Where to draw the bubble for a gravity direction.
    ///
    /// A level device puts the bubble in the centre. Tilting by 90° along an
    /// axis moves it half the screen toward the raised edge: left for +x,
    /// down for +y.
    pub fn bubble(&self, vector: &NormalizedVector) -> (i32, i32) {
        let (cx, cy) = self.center();
        (
            cx - vector.x.scale(self.width / 2),
            cy + vector.y.scale(self.height / 2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Q10;

    const PEBBLE: Bounds = Bounds::new(144, 168);

    fn vector(x: i32, y: i32, z: i32) -> NormalizedVector {
        NormalizedVector {
            x: Q10::from_bits(x),
            y: Q10::from_bits(y),
            z: Q10::from_bits(z),
        }
    }

    #[test]
    fn level_is_centered() {
        assert_eq!(PEBBLE.bubble(&vector(0, 0, 1024)), (72, 84));
    }

    #[test]
    fn full_tilt_reaches_the_edge() {
        assert_eq!(PEBBLE.bubble(&vector(1024, 0, 0)), (0, 84));
        assert_eq!(PEBBLE.bubble(&vector(-1024, 0, 0)), (144, 84));
        assert_eq!(PEBBLE.bubble(&vector(0, 1024, 0)), (72, 168));
        assert_eq!(PEBBLE.bubble(&vector(0, -1024, 0)), (72, 0));
    }

    #[test]
    fn half_tilt_is_a_quarter_screen() {
        assert_eq!(PEBBLE.bubble(&vector(512, -512, 724)), (36, 42));
    }
}
