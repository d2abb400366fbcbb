//! sRGB to CIE L*a*b* conversion (D65 reference white).

use super::Rgb;

/// D65 reference white, with Y normalised to 100.
pub const D65_WHITE: [f64; 3] = [95.047, 100.0, 108.883];

/// Linear sRGB to XYZ (D65), rows are X, Y, Z.
const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.412_456_4, 0.357_576_1, 0.180_437_5],
    [0.212_672_9, 0.715_152_2, 0.072_175_0],
    [0.019_333_9, 0.119_192_0, 0.950_304_1],
];

/// 6/29, the knee of the Lab companding function.
const DELTA: f64 = 6.0 / 29.0;

/// A CIE L*a*b* color.
///
/// Only ever derived from an [`Rgb`]; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    /// Lightness, 0..=100
    pub l: f64,
    /// Green (-) to red (+)
    pub a: f64,
    /// Blue (-) to yellow (+)
    pub b: f64,
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }
}

impl From<Rgb> for Lab {
    fn from(rgb: Rgb) -> Self {
        rgb_to_lab(rgb)
    }
}

/// Convert an sRGB color to Lab.
///
/// Pipeline: normalise to `[0, 1]`, undo the sRGB transfer curve, project to
/// XYZ, divide by the D65 white, then apply the Lab nonlinearity. Channel
/// range is guaranteed by `u8`, so this cannot fail.
pub fn rgb_to_lab(rgb: Rgb) -> Lab {
    let linear = [
        srgb_to_linear(f64::from(rgb.r) / 255.0) * 100.0,
        srgb_to_linear(f64::from(rgb.g) / 255.0) * 100.0,
        srgb_to_linear(f64::from(rgb.b) / 255.0) * 100.0,
    ];

    let xyz = SRGB_TO_XYZ.map(|row| row[0] * linear[0] + row[1] * linear[1] + row[2] * linear[2]);

    let fx = lab_f(xyz[0] / D65_WHITE[0]);
    let fy = lab_f(xyz[1] / D65_WHITE[1]);
    let fz = lab_f(xyz[2] / D65_WHITE[2]);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn lab_f(t: f64) -> f64 {
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.05;

    fn assert_lab(actual: Lab, l: f64, a: f64, b: f64) {
        assert!(
            (actual.l - l).abs() < EPSILON
                && (actual.a - a).abs() < EPSILON
                && (actual.b - b).abs() < EPSILON,
            "got {actual:?}, expected ({l}, {a}, {b})"
        );
    }

    #[test]
    fn test_black_is_origin() {
        assert_lab(rgb_to_lab(Rgb::new(0, 0, 0)), 0.0, 0.0, 0.0);
    }

    #[test]
    fn test_white_is_full_lightness() {
        assert_lab(rgb_to_lab(Rgb::new(255, 255, 255)), 100.0, 0.0, 0.0);
    }

    #[test]
    fn test_primaries() {
        assert_lab(rgb_to_lab(Rgb::new(255, 0, 0)), 53.24, 80.09, 67.20);
        assert_lab(rgb_to_lab(Rgb::new(0, 255, 0)), 87.73, -86.18, 83.18);
        assert_lab(rgb_to_lab(Rgb::new(0, 0, 255)), 32.30, 79.19, -107.86);
    }

    #[test]
    fn test_mid_gray_is_neutral() {
        let lab = rgb_to_lab(Rgb::new(128, 128, 128));
        assert!((lab.l - 53.59).abs() < EPSILON);
        assert!(lab.a.abs() < 0.01);
        assert!(lab.b.abs() < 0.01);
    }

    #[test]
    fn test_dark_values_use_linear_branch() {
        // 1/255 falls below the sRGB linear threshold and the Lab knee.
        let lab = rgb_to_lab(Rgb::new(1, 1, 1));
        assert!(lab.l > 0.0 && lab.l < 1.0);
    }

    #[test]
    fn test_lightness_within_range() {
        for v in (0..=255u8).step_by(15) {
            let lab = rgb_to_lab(Rgb::new(v, v / 2, 255 - v));
            assert!((0.0..=100.001).contains(&lab.l));
        }
    }
}
