use parking_lot::MutexGuard;

use crate::{
    bitmap::{Bitmap, PixelFormat},
    color::Color,
    error::{SnoopError, SnoopResult},
};

/// Exclusive, bounds-checked pixel access to a locked [`Bitmap`].
///
/// Construction takes the bitmap's lock with a single non-blocking attempt
/// and holds it until the snoop is dropped, so [`get`](PixelSnoop::get) and
/// [`set`](PixelSnoop::set) address a buffer that cannot move or change
/// underneath them. While a snoop is open, every other access to the same
/// bitmap fails with [`SnoopError::LockFailure`].
///
/// The lock is released when the snoop goes out of scope on any path,
/// including an unwinding panic. [`release`](PixelSnoop::release) exists for
/// callers who want the hand-back to read as a statement.
///
/// Only [`PixelFormat::Bgra8888`] is supported; any other format is rejected
/// before the lock is attempted.
pub struct PixelSnoop<'a> {
    pixels: MutexGuard<'a, Vec<u8>>,
    width: u32,
    height: u32,
    stride: usize,
    bytes_per_pixel: usize,
}

impl<'a> PixelSnoop<'a> {
    /// Locks `bitmap` and captures its layout.
    ///
    /// Fails with [`SnoopError::InvalidArgument`] if the format is not
    /// [`PixelFormat::Bgra8888`], and with [`SnoopError::LockFailure`] if the
    /// pixels are already locked. Neither failure leaves anything to undo.
    pub fn new(bitmap: &'a Bitmap) -> SnoopResult<Self> {
        if bitmap.format() != PixelFormat::Bgra8888 {
            return Err(SnoopError::invalid_argument(format!(
                "pixel access requires {:?}, bitmap is {:?}",
                PixelFormat::Bgra8888,
                bitmap.format()
            )));
        }
        let pixels = bitmap
            .try_lock_pixels()
            .ok_or_else(|| SnoopError::lock_failure("bitmap is already locked by another accessor"))?;
        Ok(Self {
            pixels,
            width: bitmap.width(),
            height: bitmap.height(),
            stride: bitmap.stride(),
            bytes_per_pixel: PixelFormat::Bgra8888.bytes_per_pixel(),
        })
    }

    /// Reads the pixel at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> SnoopResult<Color> {
        let at = self.offset_of(x, y)?;
        let px = &self.pixels[at..at + 4];
        Ok(Color {
            a: px[3],
            r: px[2],
            g: px[1],
            b: px[0],
        })
    }

    /// Writes the pixel at `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, color: Color) -> SnoopResult<()> {
        let at = self.offset_of(x, y)?;
        self.pixels[at..at + 4].copy_from_slice(&[color.b, color.g, color.r, color.a]);
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the starts of consecutive rows. May exceed
    /// `width() * bytes_per_pixel()`.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Unlocks the bitmap. Dropping the snoop has the same effect; this makes
    /// the point explicit at the call site.
    pub fn release(self) {}

    fn offset_of(&self, x: u32, y: u32) -> SnoopResult<usize> {
        if x >= self.width || y >= self.height {
            return Err(SnoopError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.stride + x as usize * self.bytes_per_pixel)
    }
}
