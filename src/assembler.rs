use crate::error::AssembleError;
use crate::icondir::{
    entry_bytes, header_bytes, SizeByteRule, ENTRY_LEN, HEADER_LEN,
};
use crate::raster::RasterInfo;
use log::{debug, info, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

//===========================================================================//

/// A rendered raster that may go into an ICO file.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ImageCandidate {
    path: PathBuf,
    include_in_ico: bool,
}

impl ImageCandidate {
    /// Creates a candidate for the raster at `path`.
    pub fn new<P: Into<PathBuf>>(path: P, include_in_ico: bool) -> Self {
        ImageCandidate { path: path.into(), include_in_ico }
    }

    /// Returns the path of the raster file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if this raster should be embedded in the ICO file.
    pub fn include_in_ico(&self) -> bool {
        self.include_in_ico
    }
}

/// Settings for an [`IcoAssembler`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct AssemblerOptions {
    /// How directory entries encode image sizes of 256 pixels and up.
    pub size_rule: SizeByteRule,
}

//===========================================================================//

/// Builds ICO files out of already-encoded raster images.  Every included
/// image is embedded byte-for-byte; nothing is decoded past its header.
#[derive(Clone, Debug, Default)]
pub struct IcoAssembler {
    options: AssemblerOptions,
}

impl IcoAssembler {
    /// Creates an assembler with the given options.
    pub fn new(options: AssemblerOptions) -> IcoAssembler {
        IcoAssembler { options }
    }

    /// Returns this assembler's options.
    pub fn options(&self) -> &AssemblerOptions {
        &self.options
    }

    /// Reads every included candidate and returns the complete ICO file.
    /// Entries and payloads appear in the order the candidates are given;
    /// excluded candidates are never opened.
    pub fn build_ico_buffer(
        &self,
        candidates: &[ImageCandidate],
    ) -> Result<Vec<u8>, AssembleError> {
        let included: Vec<&ImageCandidate> =
            candidates.iter().filter(|c| c.include_in_ico()).collect();
        if included.len() > (u16::MAX as usize) {
            return Err(AssembleError::TooManyEntries {
                count: included.len(),
                max: u16::MAX as usize,
            });
        }
        let mut rasters = Vec::with_capacity(included.len());
        for candidate in included {
            let raster = RasterInfo::load(candidate.path())?;
            rasters.push((candidate.path(), raster));
        }
        self.encode(&rasters)
    }

    /// Lays out already-loaded rasters as an ICO file.  The paths are used
    /// only for error reporting.
    pub fn encode<P: AsRef<Path>>(
        &self,
        rasters: &[(P, RasterInfo)],
    ) -> Result<Vec<u8>, AssembleError> {
        let count = match u16::try_from(rasters.len()) {
            Ok(count) => count,
            Err(_) => {
                return Err(AssembleError::TooManyEntries {
                    count: rasters.len(),
                    max: u16::MAX as usize,
                });
            }
        };
        let directory_len = (HEADER_LEN + ENTRY_LEN * (count as u32)) as u64;
        let mut entries = Vec::with_capacity(rasters.len());
        let mut data_offset = directory_len;
        for (path, raster) in rasters.iter() {
            let path: &Path = path.as_ref();
            let data_size = raster.byte_size() as u64;
            if data_size > (u32::MAX as u64)
                || data_offset > (u32::MAX as u64)
            {
                return Err(AssembleError::PayloadTooLarge {
                    path: path.to_path_buf(),
                    size: data_size,
                    offset: data_offset,
                });
            }
            let size_bytes = self
                .options
                .size_rule
                .size_bytes(raster.width(), raster.height());
            debug!(
                "{:?}: {}x{}, {} bytes at offset {}",
                path,
                raster.width(),
                raster.height(),
                data_size,
                data_offset
            );
            entries.push(entry_bytes(
                size_bytes,
                data_size as u32,
                data_offset as u32,
            ));
            data_offset += data_size;
        }
        let mut buffer = Vec::with_capacity(data_offset as usize);
        buffer.extend_from_slice(&header_bytes(count));
        for entry in entries.iter() {
            buffer.extend_from_slice(entry);
        }
        for (_, raster) in rasters.iter() {
            buffer.extend_from_slice(raster.data());
        }
        debug_assert_eq!(buffer.len() as u64, data_offset);
        Ok(buffer)
    }

    /// Builds the ICO file for `candidates` and writes it to `destination`,
    /// replacing any existing file there.  Returns the bytes written.  The
    /// file is first written as `.<name>.<pid>.tmp` next to `destination`
    /// and then renamed into place.  On error, nothing is left at
    /// `destination` that wasn't there before.
    pub fn assemble<P: AsRef<Path>>(
        &self,
        candidates: &[ImageCandidate],
        destination: P,
    ) -> Result<Vec<u8>, AssembleError> {
        let destination = destination.as_ref();
        let buffer = self.build_ico_buffer(candidates)?;
        persist(destination, &buffer).map_err(|source| {
            AssembleError::OutputWrite {
                path: destination.to_path_buf(),
                source,
            }
        })?;
        info!("Wrote {:?} ({} bytes)", destination, buffer.len());
        Ok(buffer)
    }
}

//===========================================================================//

/// Writes `data` to a temporary file next to `destination` and renames it
/// into place, so a failed write never leaves a truncated file behind.
fn persist(destination: &Path, data: &[u8]) -> io::Result<()> {
    let temp_path = temp_path_for(destination)?;
    let result = write_synced(&temp_path, data)
        .and_then(|()| fs::rename(&temp_path, destination));
    if result.is_err() {
        if let Err(error) = fs::remove_file(&temp_path) {
            if error.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove {:?}: {}", temp_path, error);
            }
        }
    }
    result
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

fn temp_path_for(destination: &Path) -> io::Result<PathBuf> {
    let file_name = match destination.file_name() {
        Some(name) => name.to_string_lossy(),
        None => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "destination has no file name",
            ));
        }
    };
    // Unique per process.
    Ok(destination.with_file_name(format!(
        ".{}.{}.tmp",
        file_name,
        process::id()
    )))
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{
        temp_path_for, AssemblerOptions, IcoAssembler, ImageCandidate,
    };
    use crate::error::ErrorKind;
    use crate::icondir::SizeByteRule;
    use crate::raster::RasterInfo;
    use std::path::{Path, PathBuf};

    fn fake_png(width: u32, height: u32, byte_size: usize) -> Vec<u8> {
        let mut data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut data, width, height);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            let pixels = vec![0u8; (width * height) as usize];
            writer.write_image_data(&pixels).unwrap();
        }
        assert!(data.len() <= byte_size);
        data.resize(byte_size, 0);
        data
    }

    fn raster(
        name: &str,
        width: u32,
        height: u32,
        size: usize,
    ) -> (PathBuf, RasterInfo) {
        let data = fake_png(width, height, size);
        let raster = RasterInfo::from_encoded(name, data).unwrap();
        (PathBuf::from(name), raster)
    }

    #[test]
    fn encode_nothing() {
        let rasters: Vec<(PathBuf, RasterInfo)> = Vec::new();
        let buffer = IcoAssembler::default().encode(&rasters).unwrap();
        let expected: &[u8] = b"\x00\x00\x01\x00\x00\x00";
        assert_eq!(buffer.as_slice(), expected);
    }

    #[test]
    fn encode_two_rasters() {
        let rasters = vec![
            raster("a16.png", 16, 16, 500),
            raster("a256.png", 256, 256, 20000),
        ];
        let buffer = IcoAssembler::default().encode(&rasters).unwrap();
        assert_eq!(buffer.len(), 20538);
        let expected: &[u8] = b"\
            \x00\x00\x01\x00\x02\x00\
            \
            \x10\x10\x00\x00\x01\x00\x20\x00\
            \xf4\x01\x00\x00\x26\x00\x00\x00\
            \
            \x00\x00\x00\x00\x01\x00\x20\x00\
            \x20\x4e\x00\x00\x1a\x02\x00\x00";
        assert_eq!(&buffer[..38], expected);
        assert_eq!(&buffer[38..538], rasters[0].1.data());
        assert_eq!(&buffer[538..], rasters[1].1.data());
    }

    #[test]
    fn size_rule_controls_height_byte() {
        let rasters = vec![raster("wide.png", 256, 120, 1000)];
        let compat = IcoAssembler::default().encode(&rasters).unwrap();
        assert_eq!(&compat[6..8], &[0, 0]);
        let options = AssemblerOptions { size_rule: SizeByteRule::PerAxis };
        let fixed = IcoAssembler::new(options).encode(&rasters).unwrap();
        assert_eq!(&fixed[6..8], &[0, 120]);
        assert_eq!(&compat[8..], &fixed[8..]);
    }

    #[test]
    fn build_with_missing_file_fails() {
        let candidates = vec![ImageCandidate::new(
            "/nonexistent/dir/icon-16.png",
            true,
        )];
        let error =
            IcoAssembler::default().build_ico_buffer(&candidates).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InputRead);
        assert_eq!(
            error.path(),
            Some(Path::new("/nonexistent/dir/icon-16.png"))
        );
    }

    #[test]
    fn excluded_missing_file_is_never_opened() {
        let candidates = vec![ImageCandidate::new(
            "/nonexistent/dir/icon-512.png",
            false,
        )];
        let buffer =
            IcoAssembler::default().build_ico_buffer(&candidates).unwrap();
        assert_eq!(buffer.len(), 6);
    }

    #[test]
    fn temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("out/icon.ico")).unwrap();
        let expected = format!("out/.icon.ico.{}.tmp", std::process::id());
        assert_eq!(temp, PathBuf::from(expected));
        assert!(temp_path_for(Path::new("/")).is_err());
    }
}

//===========================================================================//
