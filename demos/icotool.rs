use clap::{App, Arg, SubCommand};
use ico_assembler::{
    create_icon_file, AssemblerOptions, IcoAssembler, IconDir,
    ImageCandidate, InkscapeRasterizer, SizeByteRule,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

//===========================================================================//

// Appended to an image argument to list it without embedding it.
const SKIP_SUFFIX: &str = ":skip";

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();
    let per_axis = Arg::with_name("per-axis")
        .long("per-axis")
        .help("Derives the height byte from the height, not the width");
    let matches = App::new("icotool")
        .version("0.1")
        .about("Assembles ICO files from rendered PNG images")
        .subcommand(
            SubCommand::with_name("create")
                .about("Creates an ICO file from PNG files")
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("PATH")
                        .short("o")
                        .long("output")
                        .help("Sets output path"),
                )
                .arg(per_axis.clone())
                .arg(Arg::with_name("image").multiple(true)),
        )
        .subcommand(
            SubCommand::with_name("render")
                .about("Renders an SVG with Inkscape and creates an ICO file")
                .arg(
                    Arg::with_name("name")
                        .takes_value(true)
                        .value_name("NAME")
                        .short("n")
                        .long("name")
                        .default_value("icon.ico")
                        .help("Sets the icon name (relative to the SVG)"),
                )
                .arg(
                    Arg::with_name("inkscape")
                        .takes_value(true)
                        .value_name("PATH")
                        .long("inkscape")
                        .default_value("inkscape")
                        .help("Sets the Inkscape executable"),
                )
                .arg(per_axis)
                .arg(Arg::with_name("svg").required(true)),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("Lists icons in an ICO file")
                .arg(Arg::with_name("ico").required(true)),
        )
        .get_matches();
    let result = if let Some(submatches) = matches.subcommand_matches("create")
    {
        let out_path = match submatches.value_of("output") {
            Some(path) => PathBuf::from(path),
            None => unused_path(),
        };
        let candidates: Vec<ImageCandidate> = submatches
            .values_of("image")
            .map(|paths| paths.map(parse_candidate).collect())
            .unwrap_or_default();
        let options = options(submatches.is_present("per-axis"));
        IcoAssembler::new(options)
            .assemble(&candidates, &out_path)
            .map(|_| ())
            .map_err(|error| error.to_string())
    } else if let Some(submatches) = matches.subcommand_matches("render") {
        let svg = Path::new(submatches.value_of("svg").unwrap_or_default());
        let name = submatches.value_of("name").unwrap_or("icon.ico");
        let program = submatches.value_of("inkscape").unwrap_or("inkscape");
        let rasterizer = InkscapeRasterizer::with_program(program);
        let options = options(submatches.is_present("per-axis"));
        create_icon_file(svg, name, &rasterizer, options)
            .map(|_| ())
            .map_err(|error| error.to_string())
    } else if let Some(submatches) = matches.subcommand_matches("list") {
        list(submatches.value_of("ico").unwrap_or_default())
    } else {
        Ok(())
    };
    if let Err(message) = result {
        eprintln!("icotool: {}", message);
        process::exit(1);
    }
}

//===========================================================================//

fn options(per_axis: bool) -> AssemblerOptions {
    let size_rule = if per_axis {
        SizeByteRule::PerAxis
    } else {
        SizeByteRule::WidthKeyed
    };
    AssemblerOptions { size_rule }
}

fn parse_candidate(arg: &str) -> ImageCandidate {
    match arg.strip_suffix(SKIP_SUFFIX) {
        Some(path) => ImageCandidate::new(path, false),
        None => ImageCandidate::new(arg, true),
    }
}

fn unused_path() -> PathBuf {
    let mut path = PathBuf::from("out.ico");
    let mut index: i32 = 0;
    while path.exists() {
        index += 1;
        path = PathBuf::from(format!("out{}.ico", index));
    }
    path
}

fn list(path: &str) -> Result<(), String> {
    let file = fs::File::open(path).map_err(|error| error.to_string())?;
    let icondir = IconDir::read(file).map_err(|error| error.to_string())?;
    println!("Resource type: {:?}", icondir.resource_type());
    for (index, entry) in icondir.entries().iter().enumerate() {
        let kind = if entry.is_png() { "PNG" } else { "BMP" };
        println!(
            "{:5}: {}x{} {}, {} bpp, {} bytes at offset {}",
            index,
            entry.width(),
            entry.height(),
            kind,
            entry.bits_per_pixel(),
            entry.data().len(),
            entry.data_offset()
        );
    }
    Ok(())
}

//===========================================================================//
