use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use pixelsnoop::{Bitmap, PixelFormat, ops};

#[derive(Parser, Debug)]
#[command(name = "pixelsnoop", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Invert red, green, and blue, keeping alpha.
    Invert(InOutArgs),
    /// Replace every pixel with its BT.601 luma.
    Grayscale(InOutArgs),
    /// Apply 3x3 box blur passes.
    Blur(BlurArgs),
    /// Copy a rectangle into a new image.
    Crop(CropArgs),
    /// Time full get/set sweeps over every pixel.
    Bench(BenchArgs),
}

#[derive(Parser, Debug)]
struct InOutArgs {
    /// Input image (any format the decoder recognizes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct BlurArgs {
    /// Input image (any format the decoder recognizes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Number of blur passes.
    #[arg(long, default_value_t = 1)]
    passes: u32,
}

#[derive(Parser, Debug)]
struct CropArgs {
    /// Input image (any format the decoder recognizes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Left edge of the rectangle.
    #[arg(long)]
    x: u32,

    /// Top edge of the rectangle.
    #[arg(long)]
    y: u32,

    /// Rectangle width in pixels.
    #[arg(long)]
    width: u32,

    /// Rectangle height in pixels.
    #[arg(long)]
    height: u32,
}

#[derive(Parser, Debug)]
struct BenchArgs {
    /// Input image (any format the decoder recognizes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of timed sweeps.
    #[arg(long, default_value_t = 10)]
    iters: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Invert(args) => cmd_invert(args),
        Command::Grayscale(args) => cmd_grayscale(args),
        Command::Blur(args) => cmd_blur(args),
        Command::Crop(args) => cmd_crop(args),
        Command::Bench(args) => cmd_bench(args),
    }
}

fn load_bitmap(path: &Path) -> anyhow::Result<Bitmap> {
    let decoded = image::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    let mut bytes = decoded.into_raw();

    // The decoder hands back RGBA bytes; the bitmap wants BGRA.
    for px in bytes.chunks_exact_mut(4) {
        px.swap(0, 2);
    }

    let stride = width as usize * 4;
    Ok(Bitmap::from_vec(
        width,
        height,
        PixelFormat::Bgra8888,
        stride,
        bytes,
    )?)
}

fn save_bitmap(bitmap: &Bitmap, out: &Path) -> anyhow::Result<()> {
    let snoop = bitmap.snoop()?;
    let mut rgba =
        Vec::with_capacity(snoop.width() as usize * snoop.height() as usize * 4);
    for y in 0..snoop.height() {
        for x in 0..snoop.width() {
            let c = snoop.get(x, y)?;
            rgba.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
    }

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        out,
        &rgba,
        snoop.width(),
        snoop.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_invert(args: InOutArgs) -> anyhow::Result<()> {
    let bitmap = load_bitmap(&args.in_path)?;
    let started = Instant::now();
    {
        let mut snoop = bitmap.snoop()?;
        ops::invert(&mut snoop)?;
    }
    eprintln!("invert took {:?}", started.elapsed());
    save_bitmap(&bitmap, &args.out)
}

fn cmd_grayscale(args: InOutArgs) -> anyhow::Result<()> {
    let bitmap = load_bitmap(&args.in_path)?;
    let started = Instant::now();
    {
        let mut snoop = bitmap.snoop()?;
        ops::grayscale(&mut snoop)?;
    }
    eprintln!("grayscale took {:?}", started.elapsed());
    save_bitmap(&bitmap, &args.out)
}

fn cmd_blur(args: BlurArgs) -> anyhow::Result<()> {
    let bitmap = load_bitmap(&args.in_path)?;
    let started = Instant::now();
    {
        let mut snoop = bitmap.snoop()?;
        for _ in 0..args.passes {
            ops::box_blur(&mut snoop)?;
        }
    }
    eprintln!("{} blur pass(es) took {:?}", args.passes, started.elapsed());
    save_bitmap(&bitmap, &args.out)
}

fn cmd_crop(args: CropArgs) -> anyhow::Result<()> {
    let bitmap = load_bitmap(&args.in_path)?;
    let started = Instant::now();
    let cropped = {
        let snoop = bitmap.snoop()?;
        ops::crop(&snoop, args.x, args.y, args.width, args.height)?
    };
    eprintln!("crop took {:?}", started.elapsed());
    save_bitmap(&cropped, &args.out)
}

fn cmd_bench(args: BenchArgs) -> anyhow::Result<()> {
    let bitmap = load_bitmap(&args.in_path)?;
    let pixels = u64::from(bitmap.width()) * u64::from(bitmap.height());
    let iters = args.iters.max(1);

    // One lock held across the whole sweep.
    let snooped = {
        let started = Instant::now();
        for _ in 0..iters {
            let mut snoop = bitmap.snoop()?;
            for y in 0..snoop.height() {
                for x in 0..snoop.width() {
                    let c = snoop.get(x, y)?;
                    snoop.set(x, y, c)?;
                }
            }
        }
        started.elapsed()
    };

    // One lock per pixel access.
    let direct = {
        let started = Instant::now();
        for _ in 0..iters {
            for y in 0..bitmap.height() {
                for x in 0..bitmap.width() {
                    let c = bitmap.pixel(x, y)?;
                    bitmap.set_pixel(x, y, c)?;
                }
            }
        }
        started.elapsed()
    };

    eprintln!("{iters} get/set sweeps over {pixels} pixels");
    eprintln!("  snooped: {:?} ({:?} per sweep)", snooped, snooped / iters);
    eprintln!("  direct:  {:?} ({:?} per sweep)", direct, direct / iters);
    Ok(())
}
