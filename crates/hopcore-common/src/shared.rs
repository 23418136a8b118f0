// shared.rs — Vector math, fixed-point angles, and approach helpers

use std::f32::consts::{PI, TAU};

pub type Vec3 = [f32; 3];

pub const VEC3_ORIGIN: Vec3 = [0.0, 0.0, 0.0];

/// 16-bit binary angle. A full turn is 0x10000 units and all arithmetic wraps.
pub type Angle = i16;

pub const ANGLE_QUARTER: Angle = 0x4000;
pub const ANGLE_HALF: Angle = i16::MIN;

// ============================================================
// Vector operations
// ============================================================

#[inline]
pub fn dot_product(a: &Vec3, b: &Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn vector_add(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn vector_subtract(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn vector_scale(v: &Vec3, scale: f32) -> Vec3 {
    [v[0] * scale, v[1] * scale, v[2] * scale]
}

/// veca + scale * vecb
pub fn vector_ma(veca: &Vec3, scale: f32, vecb: &Vec3) -> Vec3 {
    [
        veca[0] + scale * vecb[0],
        veca[1] + scale * vecb[1],
        veca[2] + scale * vecb[2],
    ]
}

pub fn vector_length(v: &Vec3) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Normalize in place, returns original length.
pub fn vector_normalize(v: &mut Vec3) -> f32 {
    let length = vector_length(v);
    if length != 0.0 {
        let ilength = 1.0 / length;
        v[0] *= ilength;
        v[1] *= ilength;
        v[2] *= ilength;
    }
    length
}

/// Horizontal (x/z plane) length.
#[inline]
pub fn horizontal_length(x: f32, z: f32) -> f32 {
    (x * x + z * z).sqrt()
}

pub fn vector_is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

// ============================================================
// Quantized trigonometry
// ============================================================

/// Resolution of the sine lookup: the top 12 bits of an angle select the entry.
pub const TRIG_RESOLUTION: u16 = 4096;

const TRIG_QUADRANT: u16 = TRIG_RESOLUTION / 4;

/// Sine of a table index, exact at the quadrant boundaries.
fn sine_of_index(index: u16) -> f32 {
    let index = index % TRIG_RESOLUTION;
    let r = (index % TRIG_QUADRANT) as f32 * (TAU / TRIG_RESOLUTION as f32);
    match index / TRIG_QUADRANT {
        0 => r.sin(),
        1 => r.cos(),
        2 => -r.sin(),
        _ => -r.cos(),
    }
}

#[inline]
pub fn sins(angle: Angle) -> f32 {
    sine_of_index((angle as u16) >> 4)
}

#[inline]
pub fn coss(angle: Angle) -> f32 {
    sine_of_index(((angle as u16) >> 4) + TRIG_QUADRANT)
}

/// Binary angle of the direction `(x, y)` where `y` is the reference axis,
/// so that `sins(atan2s(y, x))` points along `x` and `coss` along `y`.
pub fn atan2s(y: f32, x: f32) -> Angle {
    if x == 0.0 && y == 0.0 {
        return 0;
    }
    let units = x.atan2(y) / PI * 32768.0;
    units as i32 as Angle
}

/// Adds a floating-point delta to an angle, truncating the way integer
/// angle fields do.
#[inline]
pub fn angle_add_f32(angle: Angle, delta: f32) -> Angle {
    (angle as f32 + delta) as i32 as Angle
}

/// Truncates a float to an angle, wrapping out-of-range values.
#[inline]
pub fn angle_from_f32(value: f32) -> Angle {
    value as i32 as Angle
}

// ============================================================
// Approach helpers
// ============================================================

/// Moves `current` towards `target` by at most `inc` upwards or `dec`
/// downwards, never overshooting.
pub fn approach_s32(current: i32, target: i32, inc: i32, dec: i32) -> i32 {
    if current < target {
        (current + inc).min(target)
    } else {
        (current - dec).max(target)
    }
}

pub fn approach_f32(current: f32, target: f32, inc: f32, dec: f32) -> f32 {
    if current < target {
        (current + inc).min(target)
    } else {
        (current - dec).max(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        assert_eq!(dot_product(&a, &b), 32.0);
    }

    #[test]
    fn test_vector_normalize() {
        let mut v = [3.0, 0.0, 4.0];
        let len = vector_normalize(&mut v);
        assert!((len - 5.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[2] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_trig_cardinal_points_are_exact() {
        assert_eq!(sins(0), 0.0);
        assert_eq!(coss(0), 1.0);
        assert_eq!(sins(0x4000), 1.0);
        assert_eq!(coss(0x4000), 0.0);
        assert_eq!(coss(ANGLE_HALF), -1.0);
        assert_eq!(sins(-0x4000), -1.0);
    }

    #[test]
    fn test_trig_is_quantized() {
        // Angles sharing the top 12 bits land on the same table entry.
        assert_eq!(sins(0x1230), sins(0x123F));
        assert!((sins(0x2000) - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_atan2s_axes() {
        assert_eq!(atan2s(1.0, 0.0), 0);
        assert_eq!(atan2s(0.0, 1.0), 0x4000);
        assert_eq!(atan2s(0.0, -1.0), -0x4000);
        assert_eq!(atan2s(0.0, 0.0), 0);
        assert_eq!(atan2s(-1.0, 0.0) as i32 & 0xFFFF, 0x8000);
    }

    #[test]
    fn test_atan2s_matches_trig_convention() {
        let yaw: Angle = 0x1800;
        let back = atan2s(coss(yaw), sins(yaw));
        assert!((back as i32 - yaw as i32).abs() <= 16);
    }

    #[test]
    fn test_approach_never_overshoots() {
        assert_eq!(approach_s32(0, 10, 4, 4), 4);
        assert_eq!(approach_s32(8, 10, 4, 4), 10);
        assert_eq!(approach_s32(10, -3, 4, 20), -3);
        assert!((approach_f32(1.0, 0.0, 0.35, 0.35) - 0.65).abs() < 1e-6);
        assert_eq!(approach_f32(0.2, 0.0, 0.35, 0.35), 0.0);
    }

    #[test]
    fn test_angle_add_wraps() {
        assert_eq!(angle_add_f32(0x7FFF, 1.0), i16::MIN);
        assert_eq!(angle_add_f32(100, -0.9), 99);
    }
}
