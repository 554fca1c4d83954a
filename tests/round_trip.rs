extern crate ico;
extern crate ico_assembler;
extern crate png;

use ico_assembler::{
    create_icon_file, AssemblerOptions, ErrorKind, ExportPlan, ExportTarget,
    IcoAssembler, IconDir, ImageCandidate, Rasterizer, ResourceType,
};
use std::cell::RefCell;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

//===========================================================================//

#[test]
fn read_back_assembled_icon() {
    let dir = temp_dir("read_back");
    let sizes = [16, 32, 48, 256, 512];
    let mut candidates = Vec::new();
    let mut originals = Vec::new();
    for &size in sizes.iter() {
        let path = dir.join(format!("icon-{}.png", size));
        write_png(&path, size, size);
        originals.push(fs::read(&path).unwrap());
        candidates.push(ImageCandidate::new(path, true));
    }
    let buffer =
        IcoAssembler::default().build_ico_buffer(&candidates).unwrap();
    let icondir = IconDir::read(Cursor::new(&buffer)).unwrap();
    assert_eq!(icondir.resource_type(), ResourceType::Icon);
    assert_eq!(icondir.entries().len(), sizes.len());
    for (index, entry) in icondir.entries().iter().enumerate() {
        assert!(entry.is_png());
        assert_eq!(entry.width(), sizes[index]);
        assert_eq!(entry.height(), sizes[index]);
        assert_eq!(entry.bits_per_pixel(), 32);
        assert_eq!(entry.color_planes(), 1);
        assert_eq!(entry.num_colors(), 0);
        assert_eq!(entry.data(), originals[index].as_slice());
    }
    assert_eq!(icondir.entries()[3].width_byte(), 0);
    assert_eq!(icondir.entries()[4].height_byte(), 0);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn read_back_with_ico_crate() {
    let dir = temp_dir("ico_crate");
    let sizes = [16, 48, 256, 512];
    let mut candidates = Vec::new();
    for &size in sizes.iter() {
        let path = dir.join(format!("icon-{}.png", size));
        write_png(&path, size, size);
        candidates.push(ImageCandidate::new(path, true));
    }
    let skipped = dir.join("icon-1024.png");
    write_png(&skipped, 32, 32);
    candidates.insert(2, ImageCandidate::new(skipped, false));
    let buffer =
        IcoAssembler::default().build_ico_buffer(&candidates).unwrap();
    let icondir = ico::IconDir::read(Cursor::new(&buffer)).unwrap();
    assert_eq!(icondir.resource_type(), ico::ResourceType::Icon);
    assert_eq!(icondir.entries().len(), sizes.len());
    for (index, entry) in icondir.entries().iter().enumerate() {
        assert!(entry.is_png());
        assert_eq!(entry.width(), sizes[index]);
        assert_eq!(entry.height(), sizes[index]);
        assert_eq!(entry.bits_per_pixel(), 32);
        let image = entry.decode().unwrap();
        assert_eq!(image.width(), sizes[index]);
        assert_eq!(image.height(), sizes[index]);
    }
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn create_icon_from_standard_plan() {
    let dir = temp_dir("standard_plan");
    let source = dir.join("logo.svg");
    fs::write(&source, "<svg/>").unwrap();
    let rasterizer = FakeRasterizer::default();
    let written = create_icon_file(
        &source,
        "logo.ico",
        &rasterizer,
        AssemblerOptions::default(),
    )
    .unwrap();

    // Every target is rendered, in plan order, even those left out of the
    // ICO file.
    let rendered = rasterizer.rendered.borrow();
    assert_eq!(rendered.len(), 24);
    assert_eq!(rendered[0], dir.join("logo-16.png"));
    assert_eq!(rendered[7], dir.join("logo-512.png"));
    assert!(dir.join("logo-App-83.5x83.5@2x.png").exists());

    let ico_path = dir.join("logo.ico");
    assert_eq!(fs::read(&ico_path).unwrap(), written);
    let icondir = IconDir::read(Cursor::new(&written)).unwrap();
    let sizes: Vec<u32> =
        icondir.entries().iter().map(|entry| entry.width()).collect();
    assert_eq!(sizes, vec![16, 24, 32, 48, 64, 128, 256]);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn rasterizer_failure_stops_before_assembly() {
    let dir = temp_dir("rasterizer_failure");
    let plan = ExportPlan::new(
        dir.join("logo"),
        vec![
            ExportTarget::new("16", 16, 96, true),
            ExportTarget::new("broken", 32, 96, true),
        ],
    );
    let rasterizer = FakeRasterizer {
        fail_on: Some("broken".to_string()),
        ..FakeRasterizer::default()
    };
    let error =
        plan.render(&dir.join("logo.svg"), &rasterizer).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Rasterize);
    assert_eq!(error.path(), Some(dir.join("logo-broken.png").as_path()));
    assert!(!plan.ico_path().exists());
    let _ = fs::remove_dir_all(&dir);
}

//===========================================================================//

#[derive(Default)]
struct FakeRasterizer {
    fail_on: Option<String>,
    rendered: RefCell<Vec<PathBuf>>,
}

impl Rasterizer for FakeRasterizer {
    fn rasterize(
        &self,
        _source: &Path,
        target: &ExportTarget,
        output: &Path,
    ) -> io::Result<()> {
        if self.fail_on.as_deref() == Some(target.suffix.as_str()) {
            return Err(io::Error::new(io::ErrorKind::Other, "render failed"));
        }
        write_png(output, target.size, target.size);
        self.rendered.borrow_mut().push(output.to_path_buf());
        Ok(())
    }
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "ico-assembler-rt-{}-{}",
        std::process::id(),
        name
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &Path, width: u32, height: u32) {
    let file = fs::File::create(path).unwrap();
    let mut encoder = png::Encoder::new(file, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();
    let mut rgba = Vec::with_capacity((4 * width * height) as usize);
    for index in 0..(width * height) {
        rgba.extend_from_slice(&[(index % 251) as u8, 0x40, 0x80, 0xff]);
    }
    writer.write_image_data(&rgba).unwrap();
}

//===========================================================================//
