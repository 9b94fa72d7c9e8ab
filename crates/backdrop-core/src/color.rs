//! CSS color strings to linear RGB.
//!
//! Parsing happens once when points are configured; the per-frame path only
//! ever sees the resolved `Vec3` triples.

use glam::Vec3;

/// Parse a CSS-style color into a linear RGB triple in `[0, 1]`.
///
/// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()/rgba()`,
/// `hsl()/hsla()` and a handful of named colors. Alpha is ignored.
pub fn parse_css_color(input: &str) -> Option<Vec3> {
    let s = input.trim().to_ascii_lowercase();
    let srgb = if let Some(hex) = s.strip_prefix('#') {
        parse_hex(hex)?
    } else if let Some(args) = function_args(&s, "rgba").or_else(|| function_args(&s, "rgb")) {
        parse_rgb_args(args)?
    } else if let Some(args) = function_args(&s, "hsla").or_else(|| function_args(&s, "hsl")) {
        parse_hsl_args(args)?
    } else {
        named(&s)?
    };
    Some(Vec3::new(
        srgb_to_linear(srgb[0]),
        srgb_to_linear(srgb[1]),
        srgb_to_linear(srgb[2]),
    ))
}

/// Standard sRGB transfer function, component in `[0, 1]`.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn split_args(args: &str) -> Vec<&str> {
    args.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect()
}

fn parse_hex(hex: &str) -> Option<[f32; 3]> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let [r, g, b] = match hex.len() {
        3 | 4 => [nibble(0)?, nibble(1)?, nibble(2)?],
        6 | 8 => [byte(0)?, byte(2)?, byte(4)?],
        _ => return None,
    };
    Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

fn parse_rgb_args(args: &str) -> Option<[f32; 3]> {
    let parts = split_args(args);
    if parts.len() < 3 {
        return None;
    }
    let channel = |p: &str| -> Option<f32> {
        if let Some(pct) = p.strip_suffix('%') {
            Some((pct.parse::<f32>().ok()? / 100.0).clamp(0.0, 1.0))
        } else {
            Some((p.parse::<f32>().ok()? / 255.0).clamp(0.0, 1.0))
        }
    };
    Some([channel(parts[0])?, channel(parts[1])?, channel(parts[2])?])
}

fn parse_hsl_args(args: &str) -> Option<[f32; 3]> {
    let parts = split_args(args);
    if parts.len() < 3 {
        return None;
    }
    let h = parts[0].trim_end_matches("deg").parse::<f32>().ok()?;
    let s = parts[1].trim_end_matches('%').parse::<f32>().ok()? / 100.0;
    let l = parts[2].trim_end_matches('%').parse::<f32>().ok()? / 100.0;
    Some(hsl_to_rgb(h, s.clamp(0.0, 1.0), l.clamp(0.0, 1.0)))
}

/// Convert HSL (hue in degrees) to sRGB components.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s == 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let h = h.rem_euclid(360.0) / 360.0;
    [
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn named(name: &str) -> Option<[f32; 3]> {
    let rgb: [u8; 3] = match name {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "lime" => [0, 255, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        "pink" => [255, 192, 203],
        "gray" | "grey" => [128, 128, 128],
        "navy" => [0, 0, 128],
        "teal" => [0, 128, 128],
        "transparent" => [0, 0, 0],
        _ => return None,
    };
    Some([
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn primaries_are_exact() {
        assert_eq!(parse_css_color("#ff0000"), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(parse_css_color("#00F"), Some(Vec3::new(0.0, 0.0, 1.0)));
        assert_eq!(parse_css_color("white"), Some(Vec3::ONE));
    }

    #[test]
    fn functional_forms_match_hex() {
        let hex = parse_css_color("#336699").unwrap();
        let rgb = parse_css_color("rgb(51, 102, 153)").unwrap();
        let rgba = parse_css_color("rgba(51 102 153 / 0.5)").unwrap();
        assert!(close(hex, rgb));
        assert!(close(hex, rgba));
        let hsl = parse_css_color("hsl(0, 100%, 50%)").unwrap();
        assert!(close(hsl, Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn mid_gray_is_linearised() {
        let c = parse_css_color("#808080").unwrap();
        assert!((c.x - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_css_color(""), None);
        assert_eq!(parse_css_color("#12"), None);
        assert_eq!(parse_css_color("#gggggg"), None);
        assert_eq!(parse_css_color("rgb(1,2)"), None);
        assert_eq!(parse_css_color("notacolor"), None);
    }
}
