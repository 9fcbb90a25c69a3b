//! hocrpdf CLI - searchable PDFs from scans and hOCR

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use hocrpdf::geometry::{DEFAULT_OCR_DPI, FALLBACK_IMAGE_DPI, PAGE_REGION_CLASS};
use hocrpdf::render::{DEFAULT_FONT, DEFAULT_FONT_SIZE, DEFAULT_LINE_CLASS};
use hocrpdf::{
    ConvertOptions, ConvertReport, HocrCombiner, OverlayOptions, PdfOptions, ResolutionPolicy,
    Timestamp,
};

#[derive(Parser)]
#[command(name = "hocrpdf")]
#[command(version)]
#[command(about = "Combine a scanned page image and its hOCR into a searchable PDF", long_about = None)]
struct Cli {
    /// Page image
    #[arg(value_name = "IMAGE")]
    image: Option<PathBuf>,

    /// hOCR file for the image
    #[arg(value_name = "HOCR")]
    hocr: Option<PathBuf>,

    /// Output PDF (defaults to IMAGE with a .pdf extension)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    options: ConvertArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image and its hOCR to a PDF
    Convert {
        /// Page image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// hOCR file for the image
        #[arg(value_name = "HOCR")]
        hocr: PathBuf,

        /// Output PDF (defaults to IMAGE with a .pdf extension)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: ConvertArgs,
    },

    /// Show resolved geometry and text layer statistics without writing
    Info {
        /// Page image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// hOCR file for the image
        #[arg(value_name = "HOCR")]
        hocr: PathBuf,

        #[command(flatten)]
        options: ConvertArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct ConvertArgs {
    /// hOCR classes rendered as text, comma-separated
    #[arg(long, value_name = "CLASSES", env = "HOCRPDF_CLASSES", default_value = DEFAULT_LINE_CLASS)]
    class: String,

    /// Standard PDF font for the text layer
    #[arg(long, env = "HOCRPDF_FONT", default_value = DEFAULT_FONT)]
    font: String,

    /// Nominal font size in points
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    font_size: f64,

    /// OCR resolution assumed when the image has no DPI
    #[arg(long, value_name = "DPI", default_value_t = DEFAULT_OCR_DPI)]
    ocr_dpi: f64,

    /// Image resolution assumed when nothing else is known
    #[arg(long, value_name = "DPI", default_value_t = FALLBACK_IMAGE_DPI)]
    fallback_dpi: f64,

    /// Class of the hOCR page element
    #[arg(long, value_name = "CLASS", default_value = PAGE_REGION_CLASS)]
    page_class: String,

    /// Document title
    #[arg(long)]
    title: Option<String>,

    /// Write uncompressed streams
    #[arg(long)]
    no_compress: bool,

    /// Leave out the creation date
    #[arg(long)]
    reproducible: bool,

    /// Print the conversion report as JSON
    #[arg(long)]
    json: bool,
}

impl ConvertArgs {
    fn to_options(&self) -> hocrpdf::Result<ConvertOptions> {
        let overlay = OverlayOptions::new()
            .with_line_classes(OverlayOptions::parse_classes(&self.class)?)
            .with_font(&self.font)
            .with_font_size(self.font_size);

        let policy = ResolutionPolicy::new()
            .with_default_ocr_dpi(self.ocr_dpi)
            .with_fallback_image_dpi(self.fallback_dpi)
            .with_page_region_class(&self.page_class);

        let mut pdf = PdfOptions::new().with_compression(!self.no_compress);
        if let Some(title) = &self.title {
            pdf = pdf.with_title(title);
        }
        if self.reproducible {
            pdf = pdf.with_timestamp(Timestamp::Omit);
        }

        Ok(ConvertOptions::new()
            .with_overlay(overlay)
            .with_policy(policy)
            .with_pdf(pdf))
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            image,
            hocr,
            output,
            options,
        }) => cmd_convert(&image, &hocr, output.as_deref(), &options),
        Some(Commands::Info {
            image,
            hocr,
            options,
        }) => cmd_info(&image, &hocr, &options),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match (cli.image, cli.hocr) {
            // Default behavior: convert if both inputs are provided
            (Some(image), Some(hocr)) => {
                cmd_convert(&image, &hocr, cli.output.as_deref(), &cli.options)
            }
            _ => {
                println!("{}", "Usage: hocrpdf <IMAGE> <HOCR> [OUTPUT]".yellow());
                println!("       hocrpdf --help for more information");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn default_output(image: &Path) -> PathBuf {
    image.with_extension("pdf")
}

fn cmd_convert(
    image: &Path,
    hocr: &Path,
    output: Option<&Path>,
    args: &ConvertArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(image));
    let options = args.to_options()?;
    log::debug!("Converting with {:?}", options);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Converting {}...", image.display()));

    let result = HocrCombiner::new(options)
        .locate_image(image)
        .locate_hocr(hocr)
        .to_pdf(&output);
    pb.finish_and_clear();
    let report = result?;

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    print_warnings(&report);
    println!(
        "{} {} ({} of {} text runs)",
        "Saved to".green(),
        output.display(),
        report.placed,
        report.selected
    );

    Ok(())
}

fn cmd_info(
    image: &Path,
    hocr: &Path,
    args: &ConvertArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = HocrCombiner::new(args.to_options()?)
        .locate_image(image)
        .locate_hocr(hocr)
        .inspect()?;

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    let geometry = &report.geometry;
    println!("{}", "Page Geometry".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Image".bold(), report.source);
    println!(
        "{}: {} x {} px",
        "Pixels".bold(),
        report.image_size.0,
        report.image_size.1
    );
    println!(
        "{}: {:.3} x {:.3} in ({:.1} x {:.1} pt)",
        "Page".bold(),
        geometry.page_width,
        geometry.page_height,
        report.page_size_points.0,
        report.page_size_points.1
    );
    println!("{}: {:?}", "Size from".bold(), report.page_size_source);
    println!(
        "{}: {:.1} x {:.1}",
        "OCR DPI".bold(),
        geometry.ocr_dpi_x,
        geometry.ocr_dpi_y
    );

    println!();
    println!("{}", "Text Layer".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Font".bold(), report.font);
    println!("{}: {}", "Lines".bold(), report.ocr_lines);
    println!("{}: {}", "Words".bold(), report.ocr_words);
    println!("{}: {}", "Selected".bold(), report.selected);
    println!("{}: {}", "Placed".bold(), report.placed);
    println!("{}: {}", "Skipped".bold(), report.skipped);

    if !report.warnings.is_empty() {
        println!();
        print_warnings(&report);
    }

    Ok(())
}

fn print_warnings(report: &ConvertReport) {
    for warning in &report.warnings {
        eprintln!("{}: {}", "Warning".yellow().bold(), warning);
    }
}

fn cmd_version() {
    println!("{} {}", "hocrpdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Searchable PDFs from scanned images and hOCR");
    println!();
    println!("License: MIT");
}
