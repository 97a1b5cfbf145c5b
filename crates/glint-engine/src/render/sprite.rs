use glam::{Mat4, Vec3, Vec4};

use crate::coords::Vec2;

/// Unit-square corner template shared by every sprite, in the fixed order
/// the batch index pattern assumes.
pub const UNIT_CORNERS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, 0.0),
];

/// A quad with its own 2D transform: translate to `position`, rotate by
/// `rotation` degrees about its center, scale to `size`.
///
/// Mutable in place; a batch exclusively owns its sprite list.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sprite {
    pub position: Vec2,
    pub size: Vec2,
    /// Rotation about the sprite center, in degrees.
    pub rotation: f32,
}

impl Sprite {
    #[inline]
    pub const fn new(position: Vec2, size: Vec2, rotation: f32) -> Self {
        Self {
            position,
            size,
            rotation,
        }
    }

    /// World transform applied to the unit-square corners:
    /// translate-to-position ∘ translate-to-center ∘ rotate-about-Z ∘
    /// translate-back-from-center ∘ scale-by-size.
    pub fn transform(&self) -> Mat4 {
        let center = Vec3::new(self.size.x / 2.0, self.size.y / 2.0, 0.0);

        Mat4::from_translation(Vec3::new(self.position.x, self.position.y, 0.0))
            * Mat4::from_translation(center)
            * Mat4::from_rotation_z(self.rotation.to_radians())
            * Mat4::from_translation(-center)
            * Mat4::from_scale(Vec3::new(self.size.x, self.size.y, 1.0))
    }

    /// The four transformed corner positions, in [`UNIT_CORNERS`] order.
    pub fn transformed_corners(&self) -> [Vec2; 4] {
        let transform = self.transform();
        UNIT_CORNERS.map(|corner| {
            let v = transform * Vec4::new(corner.x, corner.y, 0.0, 1.0);
            Vec2::new(v.x, v.y)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-4;

    fn assert_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual.x - expected.x).abs() < TOLERANCE
                && (actual.y - expected.y).abs() < TOLERANCE,
            "expected {expected:?}, got {actual:?}"
        );
    }

    // ── identity ──────────────────────────────────────────────────────────

    #[test]
    fn identity_sprite_maps_corners_to_themselves() {
        let sprite = Sprite::new(Vec2::zero(), Vec2::new(1.0, 1.0), 0.0);
        let corners = sprite.transformed_corners();
        for (corner, unit) in corners.iter().zip(UNIT_CORNERS.iter()) {
            assert_close(*corner, *unit);
        }
    }

    // ── rotation ──────────────────────────────────────────────────────────

    #[test]
    fn full_turn_matches_no_rotation() {
        let still = Sprite::new(Vec2::new(40.0, 25.0), Vec2::new(32.0, 16.0), 0.0);
        let turned = Sprite::new(Vec2::new(40.0, 25.0), Vec2::new(32.0, 16.0), 360.0);
        for (a, b) in still
            .transformed_corners()
            .iter()
            .zip(turned.transformed_corners().iter())
        {
            assert_close(*a, *b);
        }
    }

    #[test]
    fn half_turn_swaps_opposite_corners() {
        let sprite = Sprite::new(Vec2::zero(), Vec2::new(10.0, 10.0), 180.0);
        let corners = sprite.transformed_corners();
        // (0,0) and (1,1) trade places under rotation about the center.
        assert_close(corners[0], Vec2::new(10.0, 10.0));
        assert_close(corners[2], Vec2::new(0.0, 0.0));
    }

    #[test]
    fn rotation_pivots_about_the_center() {
        let sprite = Sprite::new(Vec2::zero(), Vec2::new(10.0, 10.0), 90.0);
        let center = Vec2::new(5.0, 5.0);
        for corner in sprite.transformed_corners() {
            let d = corner - center;
            let distance = (d.x * d.x + d.y * d.y).sqrt();
            assert!((distance - 50.0_f32.sqrt()).abs() < TOLERANCE);
        }
    }

    // ── translation and scale ─────────────────────────────────────────────

    #[test]
    fn position_offsets_every_corner() {
        let sprite = Sprite::new(Vec2::new(100.0, 200.0), Vec2::new(1.0, 1.0), 0.0);
        let corners = sprite.transformed_corners();
        for (corner, unit) in corners.iter().zip(UNIT_CORNERS.iter()) {
            assert_close(*corner, *unit + Vec2::new(100.0, 200.0));
        }
    }

    #[test]
    fn size_scales_the_unit_square() {
        let sprite = Sprite::new(Vec2::zero(), Vec2::new(8.0, 4.0), 0.0);
        let corners = sprite.transformed_corners();
        assert_close(corners[0], Vec2::new(0.0, 0.0));
        assert_close(corners[1], Vec2::new(0.0, 4.0));
        assert_close(corners[2], Vec2::new(8.0, 4.0));
        assert_close(corners[3], Vec2::new(8.0, 0.0));
    }
}
