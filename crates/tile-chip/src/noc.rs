//! NOC grid geometry and SerDes tile coordinates.
//!
//! The chip carries two independent NOC rings. Ring 1 addresses the same
//! grid with both axes mirrored, so a tile visible at `(x, y)` on ring 0
//! appears at `(W-1-x, H-1-y)` on ring 1.

/// Grid width in tiles (X dimension).
pub const GRID_WIDTH: u8 = 17;

/// Grid height in tiles (Y dimension).
pub const GRID_HEIGHT: u8 = 12;

/// Number of NOC rings.
pub const RING_COUNT: u8 = 2;

/// Logical tile coordinates on one NOC ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCoords {
    /// Column on the addressed ring.
    pub x: u8,
    /// Row on the addressed ring.
    pub y: u8,
}

impl TileCoords {
    /// Coordinates of the same tile as seen from the other ring.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        Self {
            x: GRID_WIDTH - 1 - self.x,
            y: GRID_HEIGHT - 1 - self.y,
        }
    }
}

/// Ring-0 coordinates of each SerDes tile, indexed by instance.
///
/// Instances 0–2 sit on the west edge, 3–5 on the east edge.
const SERDES_RING0_COORDS: [TileCoords; crate::serdes::INSTANCE_COUNT] = [
    TileCoords { x: 0, y: 2 },
    TileCoords { x: 0, y: 5 },
    TileCoords { x: 0, y: 8 },
    TileCoords { x: 16, y: 2 },
    TileCoords { x: 16, y: 5 },
    TileCoords { x: 16, y: 8 },
];

/// NOC coordinates of a SerDes instance on the given ring.
///
/// Returns `None` for an out-of-range instance or ring.
#[must_use]
pub fn serdes_coords(instance: u32, ring: u8) -> Option<TileCoords> {
    if ring >= RING_COUNT {
        return None;
    }
    let coords = *SERDES_RING0_COORDS.get(instance as usize)?;
    Some(if ring == 0 { coords } else { coords.mirrored() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring1_mirrors_both_axes() {
        let c0 = serdes_coords(0, 0).unwrap();
        let c1 = serdes_coords(0, 1).unwrap();
        assert_eq!(c1.x, GRID_WIDTH - 1 - c0.x);
        assert_eq!(c1.y, GRID_HEIGHT - 1 - c0.y);
        assert_eq!(c1.mirrored(), c0);
    }

    #[test]
    fn coords_in_grid() {
        for instance in 0..crate::serdes::INSTANCE_COUNT as u32 {
            for ring in 0..RING_COUNT {
                let c = serdes_coords(instance, ring).unwrap();
                assert!(c.x < GRID_WIDTH);
                assert!(c.y < GRID_HEIGHT);
            }
        }
    }

    #[test]
    fn out_of_range_rejected() {
        assert!(serdes_coords(crate::serdes::INSTANCE_COUNT as u32, 0).is_none());
        assert!(serdes_coords(0, RING_COUNT).is_none());
    }
}
