//! Two-panel PNG comparing curve presets. Rendering needs the `chart`
//! feature; without it [`render`] reports that charts are unavailable.

use std::path::Path;

pub struct ChartSeries {
    pub name: String,
    /// (tokens bought in millions, spot price)
    pub price_points: Vec<(f64, f64)>,
    /// (% of supply bought, total SOL cost)
    pub cost_points: Vec<(f64, f64)>,
}

/// Percentages of supply sampled for the cost panel: 0, 0.95, ... 95.
pub fn cost_percentages() -> Vec<f64> {
    (0..=100).map(|i| i as f64 * 0.95).collect()
}

pub fn is_available() -> bool {
    cfg!(feature = "chart")
}

#[cfg(not(feature = "chart"))]
pub fn render(_path: &Path, _series: &[ChartSeries], _migration_threshold_sol: f64) -> anyhow::Result<()> {
    anyhow::bail!("chart support not compiled in")
}

#[cfg(feature = "chart")]
pub fn render(path: &Path, series: &[ChartSeries], migration_threshold_sol: f64) -> anyhow::Result<()> {
    use plotters::prelude::*;

    const PALETTE: [RGBColor; 4] = [RED, RGBColor(255, 165, 0), GREEN, BLUE];
    let grey = RGBColor(128, 128, 128);

    let root = BitMapBackend::new(path, (1600, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(800);

    let max_tokens = series
        .iter()
        .flat_map(|s| s.price_points.iter().map(|p| p.0))
        .fold(0.0, f64::max);
    let max_price = series
        .iter()
        .flat_map(|s| s.price_points.iter().map(|p| p.1))
        .fold(0.0, f64::max);

    let mut prices = ChartBuilder::on(&left)
        .caption("Price Curve Comparison", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d(0f64..max_tokens, 0f64..max_price * 1.05)?;
    prices
        .configure_mesh()
        .x_desc("Tokens Bought (Millions)")
        .y_desc("Price (SOL per token)")
        .draw()?;
    for (i, s) in series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        prices
            .draw_series(LineSeries::new(s.price_points.iter().copied(), color.stroke_width(2)))?
            .label(s.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }
    prices
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    let max_cost = series
        .iter()
        .flat_map(|s| s.cost_points.iter().map(|p| p.1))
        .fold(migration_threshold_sol, f64::max);

    let mut costs = ChartBuilder::on(&right)
        .caption("Cost to Acquire Supply", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..95f64, 0f64..max_cost * 1.05)?;
    costs
        .configure_mesh()
        .x_desc("% of Supply Bought")
        .y_desc("Total SOL Cost")
        .draw()?;
    for (i, s) in series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        costs
            .draw_series(LineSeries::new(s.cost_points.iter().copied(), color.stroke_width(2)))?
            .label(s.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }
    costs
        .draw_series(LineSeries::new(
            vec![(0.0, migration_threshold_sol), (95.0, migration_threshold_sol)],
            grey.stroke_width(1),
        ))?
        .label(format!("Migration Threshold ({} SOL)", migration_threshold_sol))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &grey));
    costs
        .draw_series(LineSeries::new(
            vec![(50.0, 0.0), (50.0, max_cost * 1.05)],
            &grey.mix(0.3),
        ))?;
    costs
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
