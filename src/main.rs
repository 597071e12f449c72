use clap::Parser;
use std::path::PathBuf;

use yolodetect::{YoloLoader, detect_objects_with};

#[derive(Parser)]
#[command(name = "yolodetect")]
#[command(about = "Detect objects in an image with a YOLO model")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the annotated image (only written when something is detected)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Path to the .rten model file
    #[arg(short, long, value_name = "FILE")]
    model: PathBuf,

    /// Print each detection to stderr as it is produced
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (on stderr; stdout carries only the JSON result)
    #[arg(short, long)]
    verbose: bool,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,

    /// Side of the square model input
    #[arg(long, default_value_t = 640, value_parser = clap::value_parser!(u32).range(1..))]
    input_size: u32,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    if args.verbose {
        eprintln!("Loading model: {:?}", args.model);
        eprintln!("Input image: {:?}", args.input);
    }

    let loader = YoloLoader::new().with_input_size(args.input_size);
    let stderr = std::io::stderr();
    let result = detect_objects_with(
        &loader,
        &args.input,
        &args.output,
        &args.model,
        args.debug,
        &mut stderr.lock(),
    )?;

    if args.verbose {
        eprintln!("Total detections: {}", result.records.len());
        if !result.is_empty() {
            eprintln!("Annotated image saved to: {:?}", args.output);
        }
        eprintln!();
    }

    let json = if args.pretty {
        result.to_json_pretty()?
    } else {
        result.to_json()?
    };
    println!("{}", json);

    Ok(())
}
