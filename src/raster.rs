use crate::error::AssembleError;
use byteorder::{BigEndian, ByteOrder};
use std::fs;
use std::io;
use std::path::Path;

//===========================================================================//

// The signature that all PNG files start with.
pub(crate) const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G'];

// The full 8-byte signature, followed by the IHDR chunk's length and tag.
const PNG_HEADER_LEN: usize = 8;
const IHDR_TAG: &[u8] = b"IHDR";
const IHDR_SIZE_END: usize = PNG_HEADER_LEN + 16;

// Size limits for rasters embedded in an ICO file:
const MIN_DIMENSION: u32 = 1;
const MAX_DIMENSION: u32 = 16384;

//===========================================================================//

/// The encoded bytes and pixel size of one rendered raster, ready to be
/// embedded in an ICO file as-is.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RasterInfo {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterInfo {
    /// Reads the raster at `path` in a single read, and decodes just enough
    /// of it to learn its dimensions.  Returns an `InputRead` error if the
    /// file can't be read or isn't a PNG, and a `MalformedInput` error if its
    /// dimensions are out of range.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<RasterInfo, AssembleError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| {
            AssembleError::InputRead { path: path.to_path_buf(), source }
        })?;
        RasterInfo::from_encoded(path, data)
    }

    /// Wraps already-read encoded bytes.  `path` is only used for error
    /// reporting.
    pub fn from_encoded<P: AsRef<Path>>(
        path: P,
        data: Vec<u8>,
    ) -> Result<RasterInfo, AssembleError> {
        let path = path.as_ref();
        let input_read = |source: io::Error| AssembleError::InputRead {
            path: path.to_path_buf(),
            source,
        };
        // The PNG decoder reports a zero size as generic malformed data, so
        // the IHDR size fields are checked first.
        let (width, height) = read_ihdr_size(&data).map_err(input_read)?;
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            malformed_input!(
                path,
                "Invalid size (was {}x{}, but must be at least {}x{})",
                width,
                height,
                MIN_DIMENSION,
                MIN_DIMENSION
            );
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            malformed_input!(
                path,
                "Invalid size (was {}x{}, but must be at most {}x{})",
                width,
                height,
                MAX_DIMENSION,
                MAX_DIMENSION
            );
        }
        read_png_size(&data).map_err(input_read)?;
        Ok(RasterInfo { width, height, data })
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the size of the encoded file, in bytes.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Returns the raw, encoded image data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

//===========================================================================//

/// Reads the width and height fields of the IHDR chunk without validating
/// anything else.
fn read_ihdr_size(data: &[u8]) -> io::Result<(u32, u32)> {
    if !data.starts_with(PNG_SIGNATURE) {
        invalid_data!("Not a PNG image (missing PNG signature)");
    }
    if data.len() < IHDR_SIZE_END
        || &data[(PNG_HEADER_LEN + 4)..(PNG_HEADER_LEN + 8)] != IHDR_TAG
    {
        invalid_data!("Malformed PNG data: missing IHDR chunk");
    }
    let width = BigEndian::read_u32(&data[(PNG_HEADER_LEN + 8)..]);
    let height = BigEndian::read_u32(&data[(PNG_HEADER_LEN + 12)..]);
    Ok((width, height))
}

/// Reads the IHDR chunk of PNG data and returns the image's width and height.
/// No pixel data is decoded.
pub(crate) fn read_png_size(data: &[u8]) -> io::Result<(u32, u32)> {
    if !data.starts_with(PNG_SIGNATURE) {
        invalid_data!("Not a PNG image (missing PNG signature)");
    }
    let decoder = png::Decoder::new(data);
    let png_reader = match decoder.read_info() {
        Ok(png_reader) => png_reader,
        Err(error) => invalid_data!("Malformed PNG data: {}", error),
    };
    let info = png_reader.info();
    Ok((info.width, info.height))
}

//===========================================================================//


//===========================================================================//
