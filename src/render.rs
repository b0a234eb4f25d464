//! Draw-list frames
//!
//! Engines do not touch a real drawing surface. `render` writes an ordered
//! list of primitives into a [`Frame`]; the host rasterizes it however it
//! likes (canvas, terminal, GPU). Rendering is a pure read of engine state:
//! the same state always produces the same op list.

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`. Returns `None` on anything else.
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        Some(Color::rgb(
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ))
    }

    /// Parse `#RRGGBB`, falling back instead of failing: palette entries are
    /// optional input and a bad one must never break engine construction.
    pub fn from_hex_or(s: &str, fallback: Color) -> Color {
        Color::from_hex(s).unwrap_or(fallback)
    }
}

/// A single drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Color),
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Color,
    },
    /// Filled pie slice, for the player's mouth animation. Angles are in
    /// radians, measured clockwise from +x in screen space.
    Wedge {
        cx: f32,
        cy: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        color: Color,
    },
}

/// One rendered frame: playfield dimensions plus the ordered op list.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    ops: Vec<DrawOp>,
}

impl Frame {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Drop all ops from the previous frame.
    pub fn begin(&mut self) {
        self.ops.clear();
    }

    pub fn clear(&mut self, color: Color) {
        self.ops.push(DrawOp::Clear(color));
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ops.push(DrawOp::Rect { x, y, w, h, color });
    }

    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        self.ops.push(DrawOp::Circle {
            cx,
            cy,
            radius,
            color,
        });
    }

    pub fn wedge(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
    ) {
        self.ops.push(DrawOp::Wedge {
            cx,
            cy,
            radius,
            start_angle,
            end_angle,
            color,
        });
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color,
        });
    }

    pub fn text(&mut self, x: f32, y: f32, text: impl Into<String>, color: Color) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            text: text.into(),
            color,
        });
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#FFD166"), Some(Color::rgb(0xFF, 0xD1, 0x66)));
        assert_eq!(Color::from_hex("#000000"), Some(Color::BLACK));
        assert_eq!(Color::from_hex("FFD166"), None);
        assert_eq!(Color::from_hex("#FFD16"), None);
        assert_eq!(Color::from_hex("#GGGGGG"), None);
    }

    #[test]
    fn test_bad_palette_entry_falls_back() {
        assert_eq!(Color::from_hex_or("nope", Color::WHITE), Color::WHITE);
    }

    #[test]
    fn test_begin_resets_ops() {
        let mut frame = Frame::new(600.0, 480.0);
        frame.clear(Color::BLACK);
        frame.rect(0.0, 0.0, 10.0, 10.0, Color::WHITE);
        assert_eq!(frame.ops().len(), 2);
        frame.begin();
        assert!(frame.is_empty());
    }
}
