use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use report_pdf::{
    Error, Margins, Orientation, PageSize, RenderOptions, ReportData, render_report,
};

/// Lay out a JSON report (summary metrics, charts, tables) as a paginated PDF.
#[derive(Parser, Debug)]
#[command(name = "report-pdf", version, about)]
struct Cli {
    /// Report data as JSON
    input: PathBuf,

    /// Output file (defaults to the input path with a .pdf extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// a4, letter, legal or <width>x<height> in points
    #[arg(long, default_value = "a4", value_parser = clap::value_parser!(PageSize))]
    page_size: PageSize,

    /// portrait or landscape
    #[arg(long, default_value = "portrait", value_parser = clap::value_parser!(Orientation))]
    orientation: Orientation,

    /// Margin on all four sides, in points
    #[arg(long, default_value_t = report_pdf::config::DEFAULT_MARGIN)]
    margin: f32,

    /// Chart canvas width in pixels
    #[arg(long, default_value_t = report_pdf::config::DEFAULT_CHART_WIDTH)]
    chart_width: u32,

    /// Chart canvas height in pixels
    #[arg(long, default_value_t = report_pdf::config::DEFAULT_CHART_HEIGHT)]
    chart_height: u32,
}

fn run(cli: Cli) -> Result<(), Error> {
    let json = std::fs::read_to_string(&cli.input).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, cli.input.display()),
        ))
    })?;
    let data = ReportData::from_json(&json)?;

    let options = RenderOptions {
        page_size: cli.page_size,
        orientation: cli.orientation,
        margins: Margins::uniform(cli.margin),
        chart_width: cli.chart_width,
        chart_height: cli.chart_height,
    };
    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("pdf"));

    let written = render_report(&data, &options, &output)?;
    println!("{} ({} bytes)", written.path.display(), written.bytes);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
