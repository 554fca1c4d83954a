use crate::assembler::ImageCandidate;
use crate::error::AssembleError;
use crate::render::Rasterizer;
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

//===========================================================================//

// (suffix, pixel size, dpi, include in ICO)
const STANDARD_TARGETS: &[(&str, u32, u32, bool)] = &[
    ("16", 16, 96, true),
    ("24", 24, 96, true),
    ("32", 32, 96, true),
    ("48", 48, 96, true),
    ("64", 64, 96, true),
    ("128", 128, 96, true),
    ("256", 256, 96, true),
    ("512", 512, 96, false),
    ("1024", 1024, 96, false),
    // iOS app icons
    ("App-20x20@1x", 20, 72, false),
    ("App-20x20@2x", 40, 144, false),
    ("App-20x20@3x", 60, 216, false),
    ("App-29x29@1x", 29, 72, false),
    ("App-29x29@2x", 58, 144, false),
    ("App-29x29@3x", 87, 216, false),
    ("App-40x40@1x", 40, 72, false),
    ("App-40x40@2x", 80, 144, false),
    ("App-40x40@3x", 120, 216, false),
    ("App-60x60@2x", 120, 144, false),
    ("App-60x60@3x", 180, 216, false),
    ("App-76x76@1x", 76, 72, false),
    ("App-76x76@2x", 152, 144, false),
    ("App-83.5x83.5@2x", 167, 144, false),
    ("App-1024x1024@1x", 1024, 72, false),
];

//===========================================================================//

/// One square raster to render from the source image.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ExportTarget {
    /// Appended to the base name (after a dash) to name the raster file.
    pub suffix: String,
    /// Width and height of the raster, in pixels.
    pub size: u32,
    /// Resolution to render at.
    pub dpi: u32,
    /// Whether the raster is embedded in the ICO file, or only exported.
    pub include_in_ico: bool,
}

impl ExportTarget {
    /// Creates a new export target.
    pub fn new(
        suffix: &str,
        size: u32,
        dpi: u32,
        include_in_ico: bool,
    ) -> ExportTarget {
        ExportTarget { suffix: suffix.to_string(), size, dpi, include_in_ico }
    }
}

//===========================================================================//

/// The set of rasters to render for one icon, and where they go.  Raster
/// files are named `<base>-<suffix>.png` and the icon itself `<base>.ico`.
#[derive(Clone, Debug)]
pub struct ExportPlan {
    base: PathBuf,
    targets: Vec<ExportTarget>,
}

impl ExportPlan {
    /// Creates a plan with the given targets, in order.
    pub fn new<P: Into<PathBuf>>(
        base: P,
        targets: Vec<ExportTarget>,
    ) -> ExportPlan {
        ExportPlan { base: base.into(), targets }
    }

    /// Creates the standard plan: Windows icon sizes from 16 to 256 pixels
    /// (embedded in the ICO), 512 and 1024 pixel exports, and the iOS app
    /// icon set (exported only).
    pub fn standard<P: Into<PathBuf>>(base: P) -> ExportPlan {
        let targets = STANDARD_TARGETS
            .iter()
            .map(|&(suffix, size, dpi, include)| {
                ExportTarget::new(suffix, size, dpi, include)
            })
            .collect();
        ExportPlan::new(base, targets)
    }

    /// Returns the path prefix shared by every file in this plan.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Returns the targets in this plan.
    pub fn targets(&self) -> &[ExportTarget] {
        &self.targets
    }

    /// Returns the path the given target is rendered to.
    pub fn raster_path(&self, target: &ExportTarget) -> PathBuf {
        let mut name = self.base.as_os_str().to_owned();
        name.push("-");
        name.push(&target.suffix);
        name.push(".png");
        PathBuf::from(name)
    }

    /// Returns the path of the ICO file.
    pub fn ico_path(&self) -> PathBuf {
        let mut name = self.base.as_os_str().to_owned();
        name.push(".ico");
        PathBuf::from(name)
    }

    /// Returns one candidate per target, in plan order.
    pub fn candidates(&self) -> Vec<ImageCandidate> {
        self.targets
            .iter()
            .map(|target| {
                ImageCandidate::new(
                    self.raster_path(target),
                    target.include_in_ico,
                )
            })
            .collect()
    }

    /// Renders every target from `source`, in plan order, and returns the
    /// resulting candidates.  Stops at the first target that fails.
    pub fn render<R: Rasterizer + ?Sized>(
        &self,
        source: &Path,
        rasterizer: &R,
    ) -> Result<Vec<ImageCandidate>, AssembleError> {
        for target in self.targets.iter() {
            let output = self.raster_path(target);
            debug!(
                "Rendering {:?} at {}px, {} dpi",
                output, target.size, target.dpi
            );
            if let Err(error) = rasterizer.rasterize(source, target, &output)
            {
                return Err(AssembleError::Rasterize {
                    path: output,
                    source: error,
                });
            }
        }
        Ok(self.candidates())
    }
}

//===========================================================================//

/// Turns a user-supplied icon name into the base path for an export plan.
/// Any extension is dropped, and a relative name is placed in `source_dir`.
pub fn resolve_base(icon_name: &str, source_dir: &Path) -> PathBuf {
    let stem = Path::new(icon_name).with_extension("");
    if stem.is_absolute() || has_drive_prefix(icon_name) {
        stem
    } else {
        source_dir.join(stem)
    }
}

// Matches names like `C:\icons\app.ico` even on non-Windows hosts.
fn has_drive_prefix(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

//===========================================================================//


//===========================================================================//
