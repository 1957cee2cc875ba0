//! Packed RGB <-> HSB conversion used by the color picker.
//!
//! Nothing in here fails: out-of-range input is clamped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where each channel lives inside a packed 32-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChannelOrder {
    /// Red in bits 8..16, green in 16..24, blue in 24..32. Low byte unused.
    #[default]
    Xrgb,
    /// Red in bits 0..8, green in 8..16, blue in 16..24. High byte unused.
    Rgbx,
}

impl ChannelOrder {
    /// Bit shifts for (red, green, blue).
    pub const fn shifts(self) -> (u32, u32, u32) {
        match self {
            ChannelOrder::Xrgb => (8, 16, 24),
            ChannelOrder::Rgbx => (0, 8, 16),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RgbColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RgbColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Build a color from unchecked integers, clamping each to 0..=255.
    pub fn clamped(red: i32, green: i32, blue: i32) -> Self {
        let c = |v: i32| v.clamp(0, 255) as u8;
        Self::new(c(red), c(green), c(blue))
    }

    /// `0x00RRGGBB`, the layout preview images use.
    pub fn to_display_rgb(self) -> u32 {
        (u32::from(self.red) << 16) | (u32::from(self.green) << 8) | u32::from(self.blue)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Red: {}, Green: {}, Blue: {}", self.red, self.green, self.blue)
    }
}

/// Hue in degrees (0..=360), saturation and brightness in percent (0..=100).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HsbColor {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
}

impl HsbColor {
    pub fn new(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self { hue, saturation, brightness }
    }

    /// Clamp every component into its legal range. NaN becomes 0.
    pub fn clamped(self) -> Self {
        let c = |v: f32, max: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, max) };
        Self {
            hue: c(self.hue, 360.0),
            saturation: c(self.saturation, 100.0),
            brightness: c(self.brightness, 100.0),
        }
    }

    /// Nearest whole degree / percent, as shown in the picker's input fields.
    pub fn rounded(self) -> (u16, u8, u8) {
        let hsb = self.clamped();
        (
            hsb.hue.round() as u16,
            hsb.saturation.round() as u8,
            hsb.brightness.round() as u8,
        )
    }
}

pub fn rgb_to_packed(rgb: RgbColor, order: ChannelOrder) -> u32 {
    let (sr, sg, sb) = order.shifts();
    (u32::from(rgb.red) << sr) | (u32::from(rgb.green) << sg) | (u32::from(rgb.blue) << sb)
}

pub fn packed_to_rgb(value: u32, order: ChannelOrder) -> RgbColor {
    let (sr, sg, sb) = order.shifts();
    RgbColor::new(
        ((value >> sr) & 0xff) as u8,
        ((value >> sg) & 0xff) as u8,
        ((value >> sb) & 0xff) as u8,
    )
}

/// Standard RGB -> HSB transform. Achromatic colors report hue 0.
pub fn rgb_to_hsb(rgb: RgbColor) -> HsbColor {
    let r = f32::from(rgb.red);
    let g = f32::from(rgb.green);
    let b = f32::from(rgb.blue);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);

    let brightness = max / 255.0;
    let saturation = if max != 0.0 { (max - min) / max } else { 0.0 };
    let hue = if saturation == 0.0 {
        0.0
    } else {
        let delta = max - min;
        let rc = (max - r) / delta;
        let gc = (max - g) / delta;
        let bc = (max - b) / delta;
        let sector = if r == max {
            bc - gc
        } else if g == max {
            2.0 + rc - bc
        } else {
            4.0 + gc - rc
        };
        let mut h = sector / 6.0;
        if h < 0.0 {
            h += 1.0;
        }
        h
    };

    HsbColor::new(hue * 360.0, saturation * 100.0, brightness * 100.0)
}

/// Standard six-sector HSB -> RGB transform on clamped input.
pub fn hsb_to_rgb(hsb: HsbColor) -> RgbColor {
    let hsb = hsb.clamped();
    let s = hsb.saturation / 100.0;
    let v = hsb.brightness / 100.0;

    if s == 0.0 {
        let c = to_channel(v);
        return RgbColor::new(c, c, c);
    }

    // 360 degrees wraps to the red sector
    let h = hsb.hue / 360.0;
    let h = (h - h.floor()) * 6.0;
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match h as u32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    RgbColor::new(to_channel(r), to_channel(g), to_channel(b))
}

fn to_channel(unit: f32) -> u8 {
    (unit * 255.0 + 0.5).clamp(0.0, 255.0) as u8
}

/// Map a click on the hue/brightness plane to `(hue, brightness)`.
///
/// Hue grows left to right over 0..360, brightness falls top to bottom from
/// 100 to 0. Coordinates outside the surface are pulled back onto its edge.
pub fn point_to_hsb(x: i32, y: i32, width: i32, height: i32) -> (u16, u8) {
    let width = width.max(1);
    let height = height.max(1);
    let x = x.clamp(0, width - 1);
    let y = y.clamp(0, height - 1);
    let hue = i64::from(x) * 360 / i64::from(width);
    let brightness = 100 - i64::from(y) * 100 / i64::from(height);
    (hue as u16, brightness as u8)
}

/// Map a click on the saturation strip to a saturation, 100 at the top.
pub fn point_to_saturation(y: i32, height: i32) -> u8 {
    let height = height.max(1);
    let y = y.clamp(0, height - 1);
    (100 - i64::from(y) * 100 / i64::from(height)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_diff(a: u8, b: u8) -> u8 {
        a.abs_diff(b)
    }

    #[test]
    fn test_packing_layout() {
        let rgb = RgbColor::new(0x11, 0x22, 0x33);
        assert_eq!(rgb_to_packed(rgb, ChannelOrder::Xrgb), 0x3322_1100);
        assert_eq!(rgb_to_packed(rgb, ChannelOrder::Rgbx), 0x0033_2211);
    }

    #[test]
    fn test_packing_round_trip_both_orders() {
        for order in [ChannelOrder::Xrgb, ChannelOrder::Rgbx] {
            for r in (0..=255u8).step_by(17) {
                for g in (0..=255u8).step_by(15) {
                    for b in (0..=255u8).step_by(5) {
                        let rgb = RgbColor::new(r, g, b);
                        assert_eq!(packed_to_rgb(rgb_to_packed(rgb, order), order), rgb);
                    }
                }
            }
        }
    }

    #[test]
    fn test_unpacking_ignores_unused_byte() {
        let rgb = packed_to_rgb(0x3322_11FF, ChannelOrder::Xrgb);
        assert_eq!(rgb, RgbColor::new(0x11, 0x22, 0x33));
        let rgb = packed_to_rgb(0xFF33_2211, ChannelOrder::Rgbx);
        assert_eq!(rgb, RgbColor::new(0x11, 0x22, 0x33));
    }

    #[test]
    fn test_hsb_round_trip_within_one() {
        for r in (0..=255u8).step_by(3) {
            for g in (0..=255u8).step_by(5) {
                for b in (0..=255u8).step_by(7) {
                    let rgb = RgbColor::new(r, g, b);
                    let back = hsb_to_rgb(rgb_to_hsb(rgb));
                    assert!(
                        channel_diff(rgb.red, back.red) <= 1
                            && channel_diff(rgb.green, back.green) <= 1
                            && channel_diff(rgb.blue, back.blue) <= 1,
                        "{:?} came back as {:?}",
                        rgb,
                        back
                    );
                }
            }
        }
    }

    #[test]
    fn test_black_is_defined() {
        let hsb = rgb_to_hsb(RgbColor::new(0, 0, 0));
        assert_eq!(hsb.hue, 0.0);
        assert_eq!(hsb.saturation, 0.0);
        assert_eq!(hsb.brightness, 0.0);
        assert_eq!(hsb.rounded(), (0, 0, 0));
    }

    #[test]
    fn test_primary_hues() {
        assert_eq!(rgb_to_hsb(RgbColor::new(255, 0, 0)).rounded(), (0, 100, 100));
        assert_eq!(rgb_to_hsb(RgbColor::new(0, 255, 0)).rounded(), (120, 100, 100));
        assert_eq!(rgb_to_hsb(RgbColor::new(0, 0, 255)).rounded(), (240, 100, 100));
        assert_eq!(rgb_to_hsb(RgbColor::new(128, 128, 128)).rounded(), (0, 0, 50));
    }

    #[test]
    fn test_hsb_to_rgb_clamps_input() {
        let rgb = hsb_to_rgb(HsbColor::new(-20.0, 150.0, 250.0));
        assert_eq!(rgb, RgbColor::new(255, 0, 0));
        // 360 degrees is red again
        assert_eq!(hsb_to_rgb(HsbColor::new(360.0, 100.0, 100.0)), RgbColor::new(255, 0, 0));
        assert_eq!(hsb_to_rgb(HsbColor::new(f32::NAN, 0.0, 100.0)), RgbColor::new(255, 255, 255));
    }

    #[test]
    fn test_point_to_hsb() {
        assert_eq!(point_to_hsb(0, 0, 256, 128), (0, 100));
        assert_eq!(point_to_hsb(128, 64, 256, 128), (180, 50));
        assert_eq!(point_to_hsb(255, 127, 256, 128), (358, 1));
        // Outside the surface
        assert_eq!(point_to_hsb(-5, 500, 256, 128), (0, 1));
        // Degenerate surface
        assert_eq!(point_to_hsb(10, 10, 0, 0), (0, 100));
    }

    #[test]
    fn test_point_to_saturation() {
        assert_eq!(point_to_saturation(0, 128), 100);
        assert_eq!(point_to_saturation(64, 128), 50);
        assert_eq!(point_to_saturation(127, 128), 1);
        assert_eq!(point_to_saturation(-3, 128), 100);
        assert_eq!(point_to_saturation(i32::MAX, i32::MAX), 1);
        assert_eq!(point_to_hsb(i32::MAX, 0, i32::MAX, i32::MAX), (359, 100));
    }

    #[test]
    fn test_clamped_rgb_and_display() {
        let rgb = RgbColor::clamped(-1, 300, 42);
        assert_eq!(rgb, RgbColor::new(0, 255, 42));
        assert_eq!(rgb.to_string(), "Red: 0, Green: 255, Blue: 42");
        assert_eq!(rgb.to_display_rgb(), 0x00FF2A);
    }
}
