use std::{path::PathBuf, str::FromStr};

use argh::FromArgs;

use imstack::image::{ops, ImageSize, ImageStack};
use imstack::imgproc::filter::{self, kernels, BorderMode};
use imstack::imgproc::parallel::ExecutionStrategy;
use imstack::io::png as P;

#[derive(FromArgs, Debug)]
/// Stencil filters, tiling and directory listings for image stacks.
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Command {
    Filter(FilterArgs),
    Chunk(ChunkArgs),
    Tree(TreeArgs),
}

#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "filter")]
/// Apply a 21-tap kernel along x, y or both axes of a png image.
struct FilterArgs {
    /// path to the input png image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output png image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// kernel: box, gaussian, gaussian-derivative or identity
    #[argh(option, short = 'k', default = "KernelKind::Gaussian")]
    kernel: KernelKind,

    /// sigma of the gaussian kernels
    #[argh(option, short = 's', default = "3.0")]
    sigma: f64,

    /// axis to filter along: x, y or xy
    #[argh(option, short = 'a', default = "Axis::Xy")]
    axis: Axis,

    /// border mode: valid, zero or replicate
    #[argh(option, short = 'b', default = "BorderMode::Valid")]
    border: BorderMode,

    /// run on the current thread only
    #[argh(switch)]
    serial: bool,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "chunk")]
/// Cut a png image into tiles written as image-RR-CC.png files.
struct ChunkArgs {
    /// path to the input png image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// directory to write the tiles into, created if missing
    #[argh(option, short = 'o')]
    output_dir: PathBuf,

    /// tile height in pixels
    #[argh(option, default = "256")]
    tile_height: usize,

    /// tile width in pixels
    #[argh(option, default = "256")]
    tile_width: usize,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "tree")]
/// Print the directory tree with file sizes.
struct TreeArgs {
    /// the root directory
    #[argh(positional)]
    path: PathBuf,

    /// maximum number of files listed per directory
    #[argh(option, short = 'n', default = "10")]
    max_len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum KernelKind {
    Box,
    Gaussian,
    GaussianDerivative,
    Identity,
}

impl FromStr for KernelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box" => Ok(KernelKind::Box),
            "gaussian" => Ok(KernelKind::Gaussian),
            "gaussian-derivative" => Ok(KernelKind::GaussianDerivative),
            "identity" => Ok(KernelKind::Identity),
            _ => Err(format!("unknown kernel: {s}")),
        }
    }
}

impl KernelKind {
    fn build(self, sigma: f64) -> Result<Vec<f64>, imstack::image::ImageError> {
        match self {
            KernelKind::Box => Ok(kernels::box_kernel()),
            KernelKind::Gaussian => kernels::gaussian_kernel(sigma),
            KernelKind::GaussianDerivative => kernels::gaussian_derivative_kernel(sigma),
            KernelKind::Identity => Ok(kernels::identity_kernel()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Axis {
    X,
    Y,
    Xy,
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "xy" => Ok(Axis::Xy),
            _ => Err(format!("unknown axis: {s}")),
        }
    }
}

fn run_filter(args: FilterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let image = P::read_image_png_u8(&args.input)?;
    log::info!("read {:?} from {}", image.shape(), args.input.display());

    // work on [0, 1] floats
    let image = ops::cast_and_scale::<u8, f32>(&image, 1.0 / 255.0);

    let kernel = args.kernel.build(args.sigma)?;
    let strategy = if args.serial {
        ExecutionStrategy::Serial
    } else {
        ExecutionStrategy::Auto
    };

    let filtered: ImageStack<f32> = match args.axis {
        Axis::X => filter::apply_kernel_x_with(&image, &kernel, args.border, strategy)?,
        Axis::Y => filter::apply_kernel_y_with(&image, &kernel, args.border, strategy)?,
        Axis::Xy => filter::separable_filter(&image, &kernel, &kernel, args.border, strategy)?,
    };

    P::write_image_png_u8(&args.output, &ops::to_u8_scaled(&filtered))?;
    log::info!("wrote {}", args.output.display());

    Ok(())
}

fn run_chunk(args: ChunkArgs) -> Result<(), Box<dyn std::error::Error>> {
    let image = P::read_image_png_u8(&args.input)?;
    let image = ops::cast_and_scale::<u8, f32>(&image, 1.0 / 255.0);

    std::fs::create_dir_all(&args.output_dir)?;

    let tile = ImageSize {
        width: args.tile_width,
        height: args.tile_height,
    };
    let paths = imstack::io::chunk_image(&image, tile, &args.output_dir)?;

    println!("wrote {} tiles to {}", paths.len(), args.output_dir.display());

    Ok(())
}

fn run_tree(args: TreeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    imstack::io::write_file_tree(&mut stdout.lock(), &args.path, args.max_len)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    match args.command {
        Command::Filter(args) => run_filter(args),
        Command::Chunk(args) => run_chunk(args),
        Command::Tree(args) => run_tree(args),
    }
}
