//! Edge orientation helper.
//!
//! The edge-band scan in `Chunk` is written once, as if it always scanned the
//! band nearest the bottom edge. `Side` maps those bottom-relative coordinates
//! onto any of the four edges.

/// One of the four edges of a chunk. `y` grows towards `Bottom`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Bottom,
    Top,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Bottom, Side::Top, Side::Left, Side::Right];

    /// Re-express `(x, y)`, given relative to `Bottom`, relative to this side.
    pub fn transform(self, x: i32, y: i32, width: i32, height: i32) -> (i32, i32) {
        let (mut x, mut y) = match self {
            Side::Left | Side::Right => (y, x),
            Side::Bottom | Side::Top => (x, y),
        };
        if matches!(self, Side::Top | Side::Left) {
            x = width - x - 1;
        }
        if matches!(self, Side::Top | Side::Right) {
            y = height - y - 1;
        }
        (x, y)
    }

    /// The side reached by rotating a quarter turn: Bottom, Right, Top, Left.
    pub fn right(self) -> Side {
        match self {
            Side::Bottom => Side::Right,
            Side::Right => Side::Top,
            Side::Top => Side::Left,
            Side::Left => Side::Bottom,
        }
    }

    /// The side reached by rotating a quarter turn the other way.
    pub fn left(self) -> Side {
        match self {
            Side::Bottom => Side::Left,
            Side::Left => Side::Top,
            Side::Top => Side::Right,
            Side::Right => Side::Bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_is_identity() {
        assert_eq!(Side::Bottom.transform(3, 7, 20, 20), (3, 7));
    }

    #[test]
    fn test_band_lands_on_matching_edge() {
        // Bottom-relative row 19 is the row touching the edge.
        assert_eq!(Side::Bottom.transform(5, 19, 20, 20), (5, 19));
        assert_eq!(Side::Top.transform(5, 19, 20, 20), (14, 0));
        assert_eq!(Side::Left.transform(5, 19, 20, 20), (0, 5));
        assert_eq!(Side::Right.transform(5, 19, 20, 20), (19, 14));
    }

    #[test]
    fn test_rotation_cycles() {
        for side in Side::ALL {
            assert_eq!(side.right().right().right().right(), side);
            assert_eq!(side.right().left(), side);
            assert_eq!(side.left().right(), side);
        }
        assert_eq!(Side::Bottom.right(), Side::Right);
        assert_eq!(Side::Right.right(), Side::Top);
        assert_eq!(Side::Top.right(), Side::Left);
        assert_eq!(Side::Left.right(), Side::Bottom);
    }

    #[test]
    fn test_transform_is_a_bijection() {
        for side in Side::ALL {
            let mut seen = vec![false; 16];
            for y in 0..4 {
                for x in 0..4 {
                    let (tx, ty) = side.transform(x, y, 4, 4);
                    assert!((0..4).contains(&tx) && (0..4).contains(&ty));
                    seen[(ty * 4 + tx) as usize] = true;
                }
            }
            assert!(seen.iter().all(|&s| s), "{:?} is not a bijection", side);
        }
    }
}
