use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use healthreport_pdf::{
    Error, Logo, PageGeometry, ReferenceRangeRegistry, UnknownNumericPolicy, document_from_json,
    write_report_file,
};

/// Render a JSON measurement document as a paginated, color-coded PDF report.
#[derive(Parser)]
#[command(name = "healthreport-pdf", version, about)]
struct Args {
    /// Input JSON document (subject, entries, optional range overrides)
    input: PathBuf,

    /// Output PDF path
    output: PathBuf,

    /// PNG logo drawn in the page header
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Status for numeric values whose parameter has no reference range
    #[arg(long, value_enum, default_value = "normal")]
    unknown_numeric: UnknownPolicy,

    /// Table row height in points
    #[arg(long, default_value_t = 22.0)]
    row_height: f32,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum UnknownPolicy {
    Normal,
    Indeterminate,
}

impl From<UnknownPolicy> for UnknownNumericPolicy {
    fn from(p: UnknownPolicy) -> Self {
        match p {
            UnknownPolicy::Normal => UnknownNumericPolicy::Normal,
            UnknownPolicy::Indeterminate => UnknownNumericPolicy::Indeterminate,
        }
    }
}

const LOGO_DISPLAY_HEIGHT: f32 = 28.0;

fn load_logo(path: &Path) -> Result<Logo, Error> {
    let data = std::fs::read(path)?;
    let (pixel_width, pixel_height) = image::image_dimensions(path)
        .map_err(|e| Error::Input(format!("logo {}: {e}", path.display())))?;
    let display_height = LOGO_DISPLAY_HEIGHT;
    let display_width = display_height * pixel_width as f32 / pixel_height as f32;
    Ok(Logo {
        data,
        pixel_width,
        pixel_height,
        display_width,
        display_height,
    })
}

fn run(args: &Args) -> Result<(), Error> {
    let json = std::fs::read_to_string(&args.input)?;
    let registry = ReferenceRangeRegistry::with_defaults();
    let mut doc = document_from_json(&json, &registry, args.unknown_numeric.into())?;

    if let Some(logo_path) = &args.logo {
        doc.logo = Some(load_logo(logo_path)?);
    }

    let geo = PageGeometry {
        row_height: args.row_height,
        ..PageGeometry::a4()
    };
    write_report_file(&doc, &geo, &args.output)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
