//! RGB ↔ HSL conversion.
//!
//! All values are normalized: RGB channels in `0.0..=1.0`, hue in
//! `0.0..1.0` (fraction of a full turn), saturation and lightness in
//! `0.0..=1.0`.

/// RGB (0..1) → HSL (H: 0..1, S: 0..1, L: 0..1)
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < 1e-6 {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if (max - r).abs() < 1e-6 {
        let mut h = (g - b) / d;
        if h < 0.0 {
            h += 6.0;
        }
        h / 6.0
    } else if (max - g).abs() < 1e-6 {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    };

    (h, s, l)
}

/// HSL (H: 0..1, S: 0..1, L: 0..1) → RGB (0..1)
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    if s.abs() < 1e-6 {
        return (l, l, l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// Wrap a hue into `0.0..1.0`.
#[inline]
pub fn wrap_hue(h: f32) -> f32 {
    h.rem_euclid(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f32, f32, f32), b: (f32, f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-4 && (a.1 - b.1).abs() < 1e-4 && (a.2 - b.2).abs() < 1e-4
    }

    #[test]
    fn test_primaries() {
        assert!(close(rgb_to_hsl(1.0, 0.0, 0.0), (0.0, 1.0, 0.5)));
        assert!(close(rgb_to_hsl(0.0, 1.0, 0.0), (1.0 / 3.0, 1.0, 0.5)));
        assert!(close(rgb_to_hsl(0.0, 0.0, 1.0), (2.0 / 3.0, 1.0, 0.5)));
    }

    #[test]
    fn test_grey_has_no_saturation() {
        let (_, s, l) = rgb_to_hsl(0.4, 0.4, 0.4);
        assert_eq!(s, 0.0);
        assert!((l - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_back_conversion() {
        let (r, g, b) = (0.8, 0.3, 0.55);
        let (h, s, l) = rgb_to_hsl(r, g, b);
        assert!(close(hsl_to_rgb(h, s, l), (r, g, b)));
    }

    #[test]
    fn test_wrap_hue() {
        assert!((wrap_hue(1.25) - 0.25).abs() < 1e-6);
        assert!((wrap_hue(-0.25) - 0.75).abs() < 1e-6);
    }
}
