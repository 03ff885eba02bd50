use std::fmt;

use parking_lot::{Mutex, MutexGuard};

use crate::{
    color::Color,
    error::{SnoopError, SnoopResult},
    snoop::PixelSnoop,
};

/// Pixel layouts a [`Bitmap`] can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 32 bits per pixel, bytes ordered blue, green, red, alpha.
    ///
    /// The only format [`PixelSnoop`] accepts.
    Bgra8888,
    /// 24 bits per pixel, bytes ordered blue, green, red. Usable through the
    /// bitmap's own accessors but rejected by [`PixelSnoop`].
    Bgr888,
}

impl PixelFormat {
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Bgra8888 => 32,
            PixelFormat::Bgr888 => 24,
        }
    }

    /// Bit depth divided by 8.
    pub const fn bytes_per_pixel(self) -> usize {
        (self.bits_per_pixel() / 8) as usize
    }
}

/// An owned pixel surface: dimensions, row stride, a tagged [`PixelFormat`],
/// and the pixel bytes behind an exclusive lock.
///
/// Rows are `stride` bytes apart and `stride` may exceed
/// `width * bytes_per_pixel`; the trailing padding belongs to no pixel and is
/// never written by any operation here.
///
/// All pixel access goes through the lock. [`Bitmap::snoop`] holds it for the
/// accessor's whole lifetime; the direct methods ([`pixel`](Bitmap::pixel),
/// [`set_pixel`](Bitmap::set_pixel), [`fill`](Bitmap::fill),
/// [`to_vec`](Bitmap::to_vec)) each take it for a single call and fail with
/// [`SnoopError::LockFailure`] while a snoop is open. Every acquisition is
/// one non-blocking attempt; nothing here waits or retries.
pub struct Bitmap {
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
    pixels: Mutex<Vec<u8>>,
}

impl Bitmap {
    /// Creates a zero-filled bitmap with the default stride: the row byte
    /// count rounded up to a 4-byte boundary, the usual scanline alignment.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> SnoopResult<Self> {
        let stride = aligned_stride(width, format)?;
        Self::with_stride(width, height, format, stride)
    }

    /// Creates a zero-filled bitmap with an explicit stride, which must be at
    /// least `width * bytes_per_pixel`. This is how padded-row layouts are
    /// produced.
    pub fn with_stride(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
    ) -> SnoopResult<Self> {
        let len = validate_layout(width, height, format, stride)?;
        Ok(Self {
            width,
            height,
            stride,
            format,
            pixels: Mutex::new(vec![0u8; len]),
        })
    }

    /// Adopts an existing buffer, which must hold exactly `stride * height`
    /// bytes.
    pub fn from_vec(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
        pixels: Vec<u8>,
    ) -> SnoopResult<Self> {
        let len = validate_layout(width, height, format, stride)?;
        if pixels.len() != len {
            return Err(SnoopError::invalid_argument(format!(
                "pixel buffer holds {} bytes, expected stride * height = {len}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            pixels: Mutex::new(pixels),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Locks the pixels and returns the exclusive accessor.
    ///
    /// Equivalent to [`PixelSnoop::new`].
    pub fn snoop(&self) -> SnoopResult<PixelSnoop<'_>> {
        PixelSnoop::new(self)
    }

    /// Reads one pixel, locking the buffer for the duration of the call.
    ///
    /// For [`PixelFormat::Bgr888`] the returned alpha is 255.
    pub fn pixel(&self, x: u32, y: u32) -> SnoopResult<Color> {
        let pixels = self.lock_for_call()?;
        let at = self.offset_of(x, y)?;
        Ok(match self.format {
            PixelFormat::Bgra8888 => Color {
                a: pixels[at + 3],
                r: pixels[at + 2],
                g: pixels[at + 1],
                b: pixels[at],
            },
            PixelFormat::Bgr888 => Color {
                a: 255,
                r: pixels[at + 2],
                g: pixels[at + 1],
                b: pixels[at],
            },
        })
    }

    /// Writes one pixel, locking the buffer for the duration of the call.
    ///
    /// For [`PixelFormat::Bgr888`] the color's alpha is dropped.
    pub fn set_pixel(&self, x: u32, y: u32, color: Color) -> SnoopResult<()> {
        let mut pixels = self.lock_for_call()?;
        let at = self.offset_of(x, y)?;
        match self.format {
            PixelFormat::Bgra8888 => {
                pixels[at..at + 4].copy_from_slice(&[color.b, color.g, color.r, color.a]);
            }
            PixelFormat::Bgr888 => {
                pixels[at..at + 3].copy_from_slice(&[color.b, color.g, color.r]);
            }
        }
        Ok(())
    }

    /// Sets every pixel to `color`, leaving row padding untouched.
    pub fn fill(&self, color: Color) -> SnoopResult<()> {
        let mut pixels = self.lock_for_call()?;
        let bpp = self.format.bytes_per_pixel();
        let row_bytes = self.width as usize * bpp;
        for y in 0..self.height as usize {
            let row = &mut pixels[y * self.stride..][..row_bytes];
            match self.format {
                PixelFormat::Bgra8888 => {
                    for px in row.chunks_exact_mut(4) {
                        px.copy_from_slice(&[color.b, color.g, color.r, color.a]);
                    }
                }
                PixelFormat::Bgr888 => {
                    for px in row.chunks_exact_mut(3) {
                        px.copy_from_slice(&[color.b, color.g, color.r]);
                    }
                }
            }
        }
        Ok(())
    }

    /// Snapshots the raw buffer, padding included.
    pub fn to_vec(&self) -> SnoopResult<Vec<u8>> {
        Ok(self.lock_for_call()?.clone())
    }

    /// Single non-blocking lock attempt backing [`PixelSnoop::new`].
    pub(crate) fn try_lock_pixels(&self) -> Option<MutexGuard<'_, Vec<u8>>> {
        self.pixels.try_lock()
    }

    fn lock_for_call(&self) -> SnoopResult<MutexGuard<'_, Vec<u8>>> {
        self.pixels.try_lock().ok_or_else(|| {
            SnoopError::lock_failure("pixels are locked by an open accessor or another call")
        })
    }

    fn offset_of(&self, x: u32, y: u32) -> SnoopResult<usize> {
        if x >= self.width || y >= self.height {
            return Err(SnoopError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.stride + x as usize * self.format.bytes_per_pixel())
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

fn min_stride(width: u32, format: PixelFormat) -> SnoopResult<usize> {
    (width as usize)
        .checked_mul(format.bytes_per_pixel())
        .ok_or_else(|| SnoopError::invalid_argument("bitmap row size overflows"))
}

fn aligned_stride(width: u32, format: PixelFormat) -> SnoopResult<usize> {
    min_stride(width, format)?
        .checked_next_multiple_of(4)
        .ok_or_else(|| SnoopError::invalid_argument("bitmap row size overflows"))
}

fn validate_layout(
    width: u32,
    height: u32,
    format: PixelFormat,
    stride: usize,
) -> SnoopResult<usize> {
    if width == 0 || height == 0 {
        return Err(SnoopError::invalid_argument(format!(
            "bitmap dimensions must be non-zero, got {width}x{height}"
        )));
    }
    let min = min_stride(width, format)?;
    if stride < min {
        return Err(SnoopError::invalid_argument(format!(
            "stride {stride} is smaller than the {min} bytes {width} pixels need"
        )));
    }
    stride
        .checked_mul(height as usize)
        .ok_or_else(|| SnoopError::invalid_argument("bitmap size overflows"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stride_is_four_byte_aligned() {
        let bgra = Bitmap::new(3, 1, PixelFormat::Bgra8888).unwrap();
        assert_eq!(bgra.stride(), 12);

        // 3 pixels * 3 bytes = 9, rounded up to the next multiple of 4.
        let bgr = Bitmap::new(3, 1, PixelFormat::Bgr888).unwrap();
        assert_eq!(bgr.stride(), 12);

        let bgr = Bitmap::new(4, 1, PixelFormat::Bgr888).unwrap();
        assert_eq!(bgr.stride(), 12);
    }

    #[test]
    fn rejects_zero_dimensions() {
        for (w, h) in [(0, 1), (1, 0), (0, 0)] {
            let err = Bitmap::new(w, h, PixelFormat::Bgra8888).unwrap_err();
            assert!(matches!(err, SnoopError::InvalidArgument(_)));
        }
    }

    #[test]
    fn with_stride_rejects_undersized_stride() {
        let err = Bitmap::with_stride(3, 1, PixelFormat::Bgra8888, 11).unwrap_err();
        assert!(matches!(err, SnoopError::InvalidArgument(_)));
        assert!(Bitmap::with_stride(3, 1, PixelFormat::Bgra8888, 12).is_ok());
    }

    #[test]
    fn from_vec_rejects_wrong_buffer_length() {
        let err =
            Bitmap::from_vec(2, 2, PixelFormat::Bgra8888, 8, vec![0u8; 15]).unwrap_err();
        assert!(matches!(err, SnoopError::InvalidArgument(_)));
        assert!(Bitmap::from_vec(2, 2, PixelFormat::Bgra8888, 8, vec![0u8; 16]).is_ok());
    }

    #[test]
    fn fill_writes_rows_but_not_padding() {
        let bitmap = Bitmap::with_stride(2, 2, PixelFormat::Bgra8888, 12).unwrap();
        bitmap.fill(Color::from_argb(4, 3, 2, 1)).unwrap();

        let bytes = bitmap.to_vec().unwrap();
        assert_eq!(bytes.len(), 24);
        for row in bytes.chunks_exact(12) {
            assert_eq!(&row[..8], &[1, 2, 3, 4, 1, 2, 3, 4]);
            assert_eq!(&row[8..], &[0, 0, 0, 0]);
        }
    }

    #[test]
    fn bgr888_direct_access_reads_back_opaque() {
        let bitmap = Bitmap::new(2, 1, PixelFormat::Bgr888).unwrap();
        bitmap
            .set_pixel(1, 0, Color::from_argb(7, 30, 20, 10))
            .unwrap();
        // Alpha is dropped on write and reported as 255 on read.
        assert_eq!(bitmap.pixel(1, 0).unwrap(), Color::from_argb(255, 30, 20, 10));
    }

    #[test]
    fn direct_access_checks_bounds() {
        let bitmap = Bitmap::new(2, 2, PixelFormat::Bgra8888).unwrap();
        assert!(matches!(
            bitmap.pixel(2, 0),
            Err(SnoopError::OutOfRange { .. })
        ));
        assert!(matches!(
            bitmap.set_pixel(0, 2, Color::TRANSPARENT),
            Err(SnoopError::OutOfRange { .. })
        ));
    }

    #[test]
    fn debug_shows_layout_but_not_bytes() {
        let bitmap = Bitmap::new(2, 1, PixelFormat::Bgra8888).unwrap();
        bitmap.fill(Color::from_argb(171, 205, 239, 18)).unwrap();

        let dump = format!("{bitmap:?}");
        assert!(dump.contains("width: 2"));
        assert!(dump.contains("height: 1"));
        assert!(dump.contains("stride: 8"));
        assert!(dump.contains("Bgra8888"));
        assert!(dump.contains(".."));
        // None of the channel values leak into the dump.
        for byte in ["171", "205", "239", "18"] {
            assert!(!dump.contains(byte), "unexpected {byte} in {dump}");
        }
    }
}
