use clap::Parser;
use csv::ReaderBuilder;
use plotters::prelude::*;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render both solution paths from a telemetry CSV (x-z plane)"
)]
struct Cli {
    #[arg(long)]
    input: String,
    #[arg(long, default_value = "artifacts/orbit.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 900)]
    width: u32,
    #[arg(long, default_value_t = 900)]
    height: u32,
    /// Fractional padding added around the data bounds
    #[arg(long, default_value_t = 0.1)]
    margin: f64,
}

/// Positions of both paths projected onto the x-z plane.
#[derive(Debug, Default)]
struct Paths {
    integrated: Vec<(f64, f64)>,
    propagated: Vec<(f64, f64)>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let paths = read_paths(&cli.input)?;
    if paths.integrated.is_empty() && paths.propagated.is_empty() {
        return Err(anyhow::anyhow!("No finite positions in the provided CSV"));
    }

    let (x_range, z_range) = square_bounds(&paths, cli.margin);

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 24.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 18.0, FontStyle::Normal);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Two-body orbit".to_string(), caption_font)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.0..x_range.1, z_range.0..z_range.1)?;

    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("z")
        .label_style(label_font.clone())
        .x_labels(6)
        .y_labels(6)
        .draw()?;

    let integrated_color = RGBColor(30, 90, 200);
    let propagated_color = RGBColor(210, 100, 20);

    chart
        .draw_series(std::iter::once(PathElement::new(
            paths.propagated.clone(),
            ShapeStyle::from(&propagated_color).stroke_width(3),
        )))?
        .label("closed form")
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], propagated_color.stroke_width(3))
        });
    chart
        .draw_series(std::iter::once(PathElement::new(
            paths.integrated.clone(),
            ShapeStyle::from(&integrated_color).stroke_width(1),
        )))?
        .label("integrated")
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], integrated_color.stroke_width(1))
        });

    chart.draw_series(std::iter::once(Circle::new(
        (0.0, 0.0),
        5,
        BLACK.filled(),
    )))?;

    chart
        .configure_series_labels()
        .label_font(label_font)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

fn read_paths(path: &str) -> anyhow::Result<Paths> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow::anyhow!("CSV missing '{}' column", name))
    };
    let int_x = column("int_x")?;
    let int_z = column("int_z")?;
    let prop_x = column("prop_x")?;
    let prop_z = column("prop_z")?;

    let mut paths = Paths::default();
    for rec in rdr.records() {
        let r = rec?;
        let value = |idx: usize| -> f64 { r.get(idx).unwrap_or("").parse().unwrap_or(f64::NAN) };
        let (ix, iz) = (value(int_x), value(int_z));
        if ix.is_finite() && iz.is_finite() {
            paths.integrated.push((ix, iz));
        }
        let (px, pz) = (value(prop_x), value(prop_z));
        if px.is_finite() && pz.is_finite() {
            paths.propagated.push((px, pz));
        }
    }
    Ok(paths)
}

/// Equal-aspect bounds that contain both paths and the primary at the origin.
fn square_bounds(paths: &Paths, margin: f64) -> ((f64, f64), (f64, f64)) {
    let mut min_x = 0.0_f64;
    let mut max_x = 0.0_f64;
    let mut min_z = 0.0_f64;
    let mut max_z = 0.0_f64;
    for &(x, z) in paths.integrated.iter().chain(&paths.propagated) {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_z = min_z.min(z);
        max_z = max_z.max(z);
    }
    let half = 0.5 * (max_x - min_x).max(max_z - min_z).max(f64::EPSILON) * (1.0 + margin.max(0.0));
    let cx = 0.5 * (min_x + max_x);
    let cz = 0.5 * (min_z + max_z);
    ((cx - half, cx + half), (cz - half, cz + half))
}
