//! Image operations built entirely on [`PixelSnoop::get`] and
//! [`PixelSnoop::set`], exercising the accessor the way host code would.

use crate::{
    bitmap::{Bitmap, PixelFormat},
    color::Color,
    error::{SnoopError, SnoopResult},
    snoop::PixelSnoop,
};

/// Replaces every pixel's red, green, and blue with their complement. Alpha
/// is kept.
#[tracing::instrument(skip(snoop))]
pub fn invert(snoop: &mut PixelSnoop<'_>) -> SnoopResult<()> {
    for y in 0..snoop.height() {
        for x in 0..snoop.width() {
            let c = snoop.get(x, y)?;
            snoop.set(
                x,
                y,
                Color {
                    a: c.a,
                    r: 255 - c.r,
                    g: 255 - c.g,
                    b: 255 - c.b,
                },
            )?;
        }
    }
    Ok(())
}

/// Sets every pixel's red, green, and blue to its BT.601 luma. Alpha is kept.
#[tracing::instrument(skip(snoop))]
pub fn grayscale(snoop: &mut PixelSnoop<'_>) -> SnoopResult<()> {
    for y in 0..snoop.height() {
        for x in 0..snoop.width() {
            let c = snoop.get(x, y)?;
            let luma = bt601_luma(c);
            snoop.set(
                x,
                y,
                Color {
                    a: c.a,
                    r: luma,
                    g: luma,
                    b: luma,
                },
            )?;
        }
    }
    Ok(())
}

/// One pass of a 3x3 box blur over all four channels.
///
/// The window is clamped at the edges and each pixel divides by the number of
/// neighbors actually inside the image, so borders are averaged rather than
/// darkened. Reads come from a snapshot taken before any write.
#[tracing::instrument(skip(snoop))]
pub fn box_blur(snoop: &mut PixelSnoop<'_>) -> SnoopResult<()> {
    let width = snoop.width();
    let height = snoop.height();

    let mut snapshot = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            snapshot.push(snoop.get(x, y)?);
        }
    }

    for y in 0..height {
        for x in 0..width {
            let mut sum = [0u32; 4];
            let mut count = 0u32;
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                        continue;
                    }
                    let c = snapshot[ny as usize * width as usize + nx as usize];
                    sum[0] += u32::from(c.a);
                    sum[1] += u32::from(c.r);
                    sum[2] += u32::from(c.g);
                    sum[3] += u32::from(c.b);
                    count += 1;
                }
            }
            // count >= 1, the center pixel is always inside.
            let avg = |v: u32| ((v + count / 2) / count) as u8;
            snoop.set(
                x,
                y,
                Color {
                    a: avg(sum[0]),
                    r: avg(sum[1]),
                    g: avg(sum[2]),
                    b: avg(sum[3]),
                },
            )?;
        }
    }
    Ok(())
}

/// Copies the `width` by `height` rectangle at `(x, y)` into a new
/// [`PixelFormat::Bgra8888`] bitmap.
#[tracing::instrument(skip(src))]
pub fn crop(src: &PixelSnoop<'_>, x: u32, y: u32, width: u32, height: u32) -> SnoopResult<Bitmap> {
    if width == 0 || height == 0 {
        return Err(SnoopError::invalid_argument(format!(
            "crop rectangle must be non-empty, got {width}x{height}"
        )));
    }
    let right = x.checked_add(width);
    let bottom = y.checked_add(height);
    let fits =
        matches!((right, bottom), (Some(r), Some(b)) if r <= src.width() && b <= src.height());
    if !fits {
        return Err(SnoopError::invalid_argument(format!(
            "crop rectangle {width}x{height} at ({x}, {y}) leaves the {}x{} source",
            src.width(),
            src.height()
        )));
    }

    let out = Bitmap::new(width, height, PixelFormat::Bgra8888)?;
    {
        let mut dst = out.snoop()?;
        for dy in 0..height {
            for dx in 0..width {
                dst.set(dx, dy, src.get(x + dx, y + dy)?)?;
            }
        }
    }
    Ok(out)
}

/// Integer BT.601 luma, rounded toward zero.
fn bt601_luma(c: Color) -> u8 {
    let weighted =
        299 * u32::from(c.r) + 587 * u32::from(c.g) + 114 * u32::from(c.b);
    (weighted / 1000) as u8
}
