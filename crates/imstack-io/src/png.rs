use std::{fs, fs::File, path::Path};

use imstack_image::{ImageError, ImageSize, ImageStack};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};

use crate::error::IoError;

/// Read an 8-bit PNG image as a `(H, W, C)` stack.
///
/// Grayscale, grayscale-alpha, RGB and RGBA images give 1, 2, 3 and 4 channels.
/// Palette and low bit depth images are expanded to 8 bits per sample.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Errors
///
/// Fails if the file does not exist, does not end in `.png`, cannot be
/// decoded, or stores 16-bit samples.
pub fn read_image_png_u8(file_path: impl AsRef<Path>) -> Result<ImageStack<u8>, IoError> {
    // verify the file exists
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    if file_path
        .extension()
        .map_or(true, |ext| !ext.eq_ignore_ascii_case("png"))
    {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let file = fs::File::open(file_path)?;
    let mut decoder = Decoder::new(file);
    decoder.set_transformations(Transformations::EXPAND);

    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != BitDepth::Eight {
        return Err(IoError::PngDecodeError(format!(
            "unsupported bit depth {:?}, expected 8 bits",
            bit_depth
        )));
    }

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };

    Ok(ImageStack::from_image(size, color_type.samples(), buf)?)
}

/// Writes a `(H, W, C)` stack of bytes to the given file path.
///
/// The color type follows the channel count: 1 gray, 2 gray-alpha, 3 RGB, 4 RGBA.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The stack containing the image data.
pub fn write_image_png_u8(
    file_path: impl AsRef<Path>,
    image: &ImageStack<u8>,
) -> Result<(), IoError> {
    let dims = image.dims()?;
    if dims.batch != 1 {
        return Err(ImageError::ExpectedSingleImage(dims.batch).into());
    }

    let color_type = match dims.channels {
        1 => ColorType::Grayscale,
        2 => ColorType::GrayscaleAlpha,
        3 => ColorType::Rgb,
        4 => ColorType::Rgba,
        c => return Err(IoError::UnsupportedChannels(c)),
    };

    write_png_impl(
        file_path,
        image.as_slice(),
        dims.size(),
        BitDepth::Eight,
        color_type,
    )
}

fn write_png_impl(
    file_path: impl AsRef<Path>,
    image_data: &[u8],
    image_size: ImageSize,
    // Make sure you set `depth` correctly
    depth: BitDepth,
    color_type: ColorType,
) -> Result<(), IoError> {
    let file = File::create(file_path)?;

    let mut encoder = Encoder::new(file, image_size.width as u32, image_size.height as u32);
    encoder.set_color(color_type);
    encoder.set_depth(depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image_data)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}
