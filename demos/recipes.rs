//! Chart Recipes Tour
//!
//! Renders one chart per geometry family and saves them as PNG and SVG.
//!
//! Run with: `RUST_LOG=trueno_recipes=debug cargo run --example recipes`

use tracing_subscriber::EnvFilter;
use trueno_recipes::prelude::*;

fn penguins() -> Result<Dataset> {
    let islands = ["Biscoe", "Dream", "Torgersen"];
    let n = 60;
    let island: Vec<&str> = (0..n).map(|i| islands[i % 3]).collect();
    let sex: Vec<&str> = (0..n).map(|i| ["female", "male"][i % 2]).collect();
    let bill: Vec<f32> = (0..n)
        .map(|i| 38.0 + (i as f32 * 0.61).sin() * 4.0 + (i % 3) as f32 * 3.0)
        .collect();
    let mass: Vec<f32> = (0..n)
        .map(|i| 3.4 + (i as f32 * 0.37).cos() * 0.5 + (i % 2) as f32 * 0.6 + (i % 3) as f32 * 0.4)
        .collect();

    Dataset::new()
        .with_column("island", island)?
        .with_column("sex", sex)?
        .with_column("bill_length", bill)?
        .with_column("body_mass", mass)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trueno_recipes=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("Chart Recipes");
    println!("=============\n");

    let out = std::env::temp_dir().join("trueno-recipes");
    std::fs::create_dir_all(&out)?;
    let data = penguins()?;

    // 1. Scatter coloured by sex, one panel per island
    let options = StyleOptions::default()
        .title("Bill length vs body mass")
        .facet(Facet::wrap("island"))
        .legend_position(LegendPosition::Bottom);
    let aes = Aes::new().x("bill_length").y("body_mass").colour("sex");
    let chart = render(&data, &aes, &GeomSpec::point(), &options)?;
    chart.save(out.join("scatter.png"), 8.0, 4.0, 150.0)?;
    println!(
        "1. Scatter: {} marks in {:?} panels",
        chart.mark_count(), chart.layout()
    );

    // 2. Proportional bars
    let options = StyleOptions::default()
        .palette(Palette::okabe_ito())
        .axis_label_format(AxisFormat::parse("%.0f%%")?);
    let spec = GeomSpec::col().position(Position::Fill);
    let aes = Aes::new().x("island").y("body_mass").fill("sex");
    let chart = render(&data, &aes, &spec, &options)?;
    chart.save(out.join("fill.svg"), 5.0, 4.0, 96.0)?;
    println!("2. Filled bars: {} marks", chart.mark_count());

    // 3. Densities by sex
    let options = StyleOptions::default().theme(Theme::minimal()).alpha(0.5);
    let aes = Aes::new().x("body_mass").fill("sex");
    let chart = render(&data, &aes, &GeomSpec::density(), &options)?;
    chart.save(out.join("density.png"), 5.0, 4.0, 96.0)?;
    println!("3. Density: {} curves", chart.mark_count());

    // 4. Boxplots, horizontal
    let options = StyleOptions::default().flip();
    let aes = Aes::new().x("island").y("bill_length");
    let chart = render(&data, &aes, &GeomSpec::boxplot(), &options)?;
    chart.save(out.join("boxplot.svg"), 5.0, 4.0, 96.0)?;
    println!("4. Boxplot: {} boxes", chart.mark_count());

    // 5. Pie of islands
    let aes = Aes::new().fill("island");
    let chart = render(&data, &aes, &GeomSpec::pie(), &StyleOptions::default())?;
    chart.save(out.join("pie.png"), 4.0, 4.0, 96.0)?;
    println!("5. Pie: {} slices", chart.mark_count());

    // 6. The same recipes as a batch
    let requests = vec![
        RenderRequest::new(
            data.clone(),
            Aes::new().x("bill_length"),
            GeomSpec::histogram().bins(12),
        ),
        RenderRequest::new(
            data.clone(),
            Aes::new().x("island").y("body_mass"),
            GeomSpec::violin(),
        ),
        RenderRequest::new(data, Aes::new().x("no_such_column"), GeomSpec::bar()),
    ];
    for (i, result) in render_all(&requests).into_iter().enumerate() {
        match result {
            Ok(chart) => println!("6.{i} Batch: {} marks", chart.mark_count()),
            Err(e) => println!("6.{i} Batch: {e}"),
        }
    }

    println!("\nSaved to {}", out.display());
    Ok(())
}
