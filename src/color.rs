/// A color value with channels in alpha, red, green, blue order.
///
/// The field order is the semantic channel order of the crate: a stored
/// B,G,R,A pixel reads back as `Color { a, r, g, b }`, and writing a `Color`
/// stores its channels as B,G,R,A bytes again. Byte order and channel order
/// deliberately differ; see [`PixelSnoop::get`](crate::PixelSnoop::get).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Fully transparent black, the value a freshly zeroed bitmap reads as.
    pub const TRANSPARENT: Color = Color {
        a: 0,
        r: 0,
        g: 0,
        b: 0,
    };

    pub fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// An opaque color (alpha = 255).
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { a: 255, r, g, b }
    }

    /// Unpacks a `0xAARRGGBB` value.
    pub fn from_argb_u32(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Packs the channels as `0xAARRGGBB`.
    pub fn to_argb_u32(self) -> u32 {
        u32::from(self.a) << 24
            | u32::from(self.r) << 16
            | u32::from(self.g) << 8
            | u32::from(self.b)
    }
}
