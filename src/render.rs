use crate::assembler::{AssemblerOptions, IcoAssembler};
use crate::error::AssembleError;
use crate::plan::{resolve_base, ExportPlan, ExportTarget};
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

//===========================================================================//

/// Something that can render a vector image to a PNG file.
pub trait Rasterizer {
    /// Renders `source` as a `target.size` pixel square PNG at `target.dpi`
    /// and writes it to `output`.
    fn rasterize(
        &self,
        source: &Path,
        target: &ExportTarget,
        output: &Path,
    ) -> io::Result<()>;
}

//===========================================================================//

/// Renders images by running the Inkscape command-line program.
#[derive(Clone, Debug)]
pub struct InkscapeRasterizer {
    program: PathBuf,
}

impl InkscapeRasterizer {
    /// Uses the `inkscape` executable found on the `PATH`.
    pub fn new() -> InkscapeRasterizer {
        InkscapeRasterizer::with_program("inkscape")
    }

    /// Uses the Inkscape executable at `program`.
    pub fn with_program<P: Into<PathBuf>>(program: P) -> InkscapeRasterizer {
        InkscapeRasterizer { program: program.into() }
    }

    fn command(
        &self,
        source: &Path,
        target: &ExportTarget,
        output: &Path,
    ) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(source)
            .arg(format!("--export-dpi={}", target.dpi))
            .arg(format!("--export-filename={}", output.display()))
            .arg(format!("--export-width={}", target.size))
            .arg(format!("--export-height={}", target.size));
        command
    }
}

impl Default for InkscapeRasterizer {
    fn default() -> InkscapeRasterizer {
        InkscapeRasterizer::new()
    }
}

impl Rasterizer for InkscapeRasterizer {
    fn rasterize(
        &self,
        source: &Path,
        target: &ExportTarget,
        output: &Path,
    ) -> io::Result<()> {
        let result = self.command(source, target, output).output()?;
        if !result.status.success() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "{:?} failed ({}): {}",
                    self.program,
                    result.status,
                    String::from_utf8_lossy(&result.stderr).trim()
                ),
            ));
        }
        Ok(())
    }
}

//===========================================================================//

/// Renders the standard export plan for `source` and assembles the ICO file.
/// `icon_name` names the ICO file; a relative name is placed next to
/// `source`.  Returns the bytes written.
pub fn create_icon_file<R: Rasterizer + ?Sized>(
    source: &Path,
    icon_name: &str,
    rasterizer: &R,
    options: AssemblerOptions,
) -> Result<Vec<u8>, AssembleError> {
    let source_dir = source.parent().unwrap_or_else(|| Path::new(""));
    let plan = ExportPlan::standard(resolve_base(icon_name, source_dir));
    info!("Creating {:?} from {:?}", plan.ico_path(), source);
    let candidates = plan.render(source, rasterizer)?;
    IcoAssembler::new(options).assemble(&candidates, plan.ico_path())
}

//===========================================================================//


//===========================================================================//
