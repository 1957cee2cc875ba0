//! State behind the color field editor: a packed 4-byte value, editable
//! RGB and HSB fields, and the two clickable gradients.

use std::fmt;

use tracing::debug;

use crate::app::domain::color::{
    ChannelOrder, HsbColor, RgbColor, hsb_to_rgb, packed_to_rgb, point_to_hsb,
    point_to_saturation, rgb_to_hsb, rgb_to_packed,
};
use crate::app::domain::settings::EditorSettings;

/// Hue/brightness plane, hue on x and brightness on y.
pub const MAIN_GRADIENT_SIZE: (i32, i32) = (256, 128);
/// Saturation strip.
pub const SATURATION_STRIP_SIZE: (i32, i32) = (32, 128);

const WHITE: u32 = 0x00FF_FFFF;
const BLUE: u32 = 0x0000_00FF;

/// Parse `text` as an integer clamped to `min..=max`, or keep `old` when it
/// does not parse.
pub fn validate_number_input(text: &str, old: i32, min: i32, max: i32) -> i32 {
    match text.trim().parse::<i32>() {
        Ok(v) => v.clamp(min, max),
        Err(_) => old,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorPicker {
    order: ChannelOrder,
    /// Committed value; only `apply` changes it.
    value: u32,
    rgb: RgbColor,
    hue: u16,
    saturation: u8,
    brightness: u8,
}

impl ColorPicker {
    pub fn new(value: u32, order: ChannelOrder) -> Self {
        let mut picker = Self {
            order,
            value,
            rgb: RgbColor::default(),
            hue: 0,
            saturation: 0,
            brightness: 0,
        };
        picker.select();
        picker
    }

    /// Read a little-endian value at `offset`. `None` if fewer than four
    /// bytes are available there.
    pub fn from_bytes(buffer: &[u8], offset: usize, order: ChannelOrder) -> Option<Self> {
        let end = offset.checked_add(4)?;
        let bytes: [u8; 4] = buffer.get(offset..end)?.try_into().ok()?;
        Some(Self::new(u32::from_le_bytes(bytes), order))
    }

    /// Read with the channel order configured in `settings`.
    pub fn from_settings(buffer: &[u8], offset: usize, settings: &EditorSettings) -> Option<Self> {
        Self::from_bytes(buffer, offset, settings.color_order)
    }

    /// Store the committed value little-endian at `offset`. Returns false
    /// if the buffer is too short.
    pub fn write_to(&self, buffer: &mut [u8], offset: usize) -> bool {
        match offset
            .checked_add(4)
            .and_then(|end| buffer.get_mut(offset..end))
        {
            Some(slot) => {
                slot.copy_from_slice(&self.value.to_le_bytes());
                true
            }
            None => false,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn rgb(&self) -> RgbColor {
        self.rgb
    }

    /// `(hue, saturation, brightness)` as shown in the input fields.
    pub fn hsb(&self) -> (u16, u8, u8) {
        (self.hue, self.saturation, self.brightness)
    }

    /// Reset every field from the committed value.
    pub fn select(&mut self) {
        self.rgb = packed_to_rgb(self.value, self.order);
        self.update_hsb_from_rgb();
    }

    /// Commit the RGB fields. Bits outside the three channels are cleared.
    pub fn apply(&mut self) -> u32 {
        self.value = rgb_to_packed(self.rgb, self.order);
        debug!("Color value set to {:#010x} ({})", self.value, self.rgb);
        self.value
    }

    // --- Text fields ---
    //
    // Each setter returns the value the field should show afterwards.

    pub fn set_red_text(&mut self, text: &str) -> u8 {
        let v = validate_number_input(text, i32::from(self.rgb.red), 0, 255) as u8;
        if v != self.rgb.red {
            self.rgb.red = v;
            self.update_hsb_from_rgb();
        }
        v
    }

    pub fn set_green_text(&mut self, text: &str) -> u8 {
        let v = validate_number_input(text, i32::from(self.rgb.green), 0, 255) as u8;
        if v != self.rgb.green {
            self.rgb.green = v;
            self.update_hsb_from_rgb();
        }
        v
    }

    pub fn set_blue_text(&mut self, text: &str) -> u8 {
        let v = validate_number_input(text, i32::from(self.rgb.blue), 0, 255) as u8;
        if v != self.rgb.blue {
            self.rgb.blue = v;
            self.update_hsb_from_rgb();
        }
        v
    }

    pub fn set_hue_text(&mut self, text: &str) -> u16 {
        let v = validate_number_input(text, i32::from(self.hue), 0, 360) as u16;
        if v != self.hue {
            self.hue = v;
            self.update_rgb_from_hsb();
        }
        v
    }

    pub fn set_saturation_text(&mut self, text: &str) -> u8 {
        let v = validate_number_input(text, i32::from(self.saturation), 0, 100) as u8;
        if v != self.saturation {
            self.saturation = v;
            self.update_rgb_from_hsb();
        }
        v
    }

    pub fn set_brightness_text(&mut self, text: &str) -> u8 {
        let v = validate_number_input(text, i32::from(self.brightness), 0, 100) as u8;
        if v != self.brightness {
            self.brightness = v;
            self.update_rgb_from_hsb();
        }
        v
    }

    // --- Gradients ---

    /// Click on the hue/brightness plane. Saturation is kept.
    pub fn pick_main(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let (hue, brightness) = point_to_hsb(x, y, width, height);
        self.hue = hue;
        self.brightness = brightness;
        self.update_rgb_from_hsb();
    }

    /// Click on the saturation strip. Hue and brightness are kept.
    pub fn pick_saturation(&mut self, y: i32, height: i32) {
        self.saturation = point_to_saturation(y, height);
        self.update_rgb_from_hsb();
    }

    /// Crosshair center on the hue/brightness plane.
    pub fn main_marker(&self, width: i32, height: i32) -> (i32, i32) {
        let x = i64::from(self.hue) * i64::from(width) / 360;
        let y = (100 - i64::from(self.brightness)) * i64::from(height) / 100;
        (x as i32, y as i32)
    }

    /// Crosshair color: blue over the gray map, white over the color map.
    pub fn main_marker_color(&self) -> u32 {
        if self.uses_gray_map() { BLUE } else { WHITE }
    }

    /// Zero saturation is drawn on the grayscale plane.
    pub fn uses_gray_map(&self) -> bool {
        self.saturation == 0
    }

    /// Row of the saturation strip that is drawn as the marker.
    pub fn saturation_marker(&self, height: i32) -> i32 {
        ((100 - i64::from(self.saturation)) * i64::from(height) / 100) as i32
    }

    /// One row color per strip row, top to bottom, marker row in white.
    pub fn saturation_strip(&self, height: i32) -> Vec<u32> {
        let height = height.max(1);
        let marker = self.saturation_marker(height);
        (0..height)
            .map(|y| {
                if y == marker {
                    WHITE
                } else {
                    let saturation = (1.0 - y as f32 / height as f32) * 100.0;
                    hsb_to_rgb(HsbColor::new(
                        f32::from(self.hue),
                        saturation,
                        f32::from(self.brightness),
                    ))
                    .to_display_rgb()
                }
            })
            .collect()
    }

    /// Color of the swatch showing the current fields.
    pub fn preview_rgb(&self) -> u32 {
        self.rgb.to_display_rgb()
    }

    fn update_hsb_from_rgb(&mut self) {
        let (hue, saturation, brightness) = rgb_to_hsb(self.rgb).rounded();
        self.hue = hue;
        self.saturation = saturation;
        self.brightness = brightness;
    }

    fn update_rgb_from_hsb(&mut self) {
        self.rgb = hsb_to_rgb(HsbColor::new(
            f32::from(self.hue),
            f32::from(self.saturation),
            f32::from(self.brightness),
        ));
    }
}

/// Pixel of the hue/brightness plane at `(x, y)`, as `0x00RRGGBB`.
/// `gray` selects the zero-saturation variant.
pub fn main_gradient_pixel(x: i32, y: i32, width: i32, height: i32, gray: bool) -> u32 {
    let width = width.max(1);
    let height = height.max(1);
    let hue = x as f32 / width as f32 * 360.0;
    let brightness = (1.0 - y as f32 / height as f32) * 100.0;
    let saturation = if gray { 0.0 } else { 100.0 };
    hsb_to_rgb(HsbColor::new(hue, saturation, brightness)).to_display_rgb()
}

/// Shows the committed value.
impl fmt::Display for ColorPicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&packed_to_rgb(self.value, self.order), f)
    }
}
