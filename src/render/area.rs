//! Stacked tier areas over time.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::core::error::StoryError;
use crate::core::tooltip::{Mark, MarkShape, TooltipContent, TooltipLine};
use crate::data::pivot::YearShares;
use crate::data::records::IncomeTier;
use crate::render::palette::{hex, FILL_OPACITY};
use crate::render::scales::{midpoint_bands, year_domain};

/// Draw one filled layer per tier, Low at the bottom.
///
/// Returns one full-height hover band per year.
pub fn draw(
    root: &DrawingArea<SVGBackend, Shift>,
    title: &str,
    series: &[YearShares],
    palette: &[RGBColor; 3],
) -> Result<Vec<Mark>, StoryError> {
    root.fill(&WHITE)?;
    let (x0, x1) = year_domain(series.iter().map(|s| s.year));

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, 0f64..100f64)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Year")
        .y_desc("Percentage of Population")
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.0}%", v))
        .draw()?;

    if series.is_empty() {
        return Ok(Vec::new());
    }

    for tier in IncomeTier::ALL {
        let color = palette[tier.index()];
        let layers: Vec<(f64, (f64, f64))> = series
            .iter()
            .map(|s| (s.year as f64, s.shares.stacked()[tier.index()]))
            .collect();
        let outline: Vec<(f64, f64)> = layers
            .iter()
            .map(|&(x, (_, top))| (x, top))
            .chain(layers.iter().rev().map(|&(x, (base, _))| (x, base)))
            .collect();

        chart
            .draw_series(std::iter::once(Polygon::new(
                outline,
                color.mix(FILL_OPACITY).filled(),
            )))?
            .label(tier.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.9))
        .border_style(&BLACK)
        .draw()?;

    let (left, bottom) = chart.backend_coord(&(x0, 0.0));
    let (right, top) = chart.backend_coord(&(x1, 100.0));
    let positions: Vec<f64> = series
        .iter()
        .map(|s| chart.backend_coord(&(s.year as f64, 0.0)).0 as f64)
        .collect();
    let bands = midpoint_bands(&positions, left as f64, right as f64);

    Ok(series
        .iter()
        .zip(positions.iter().zip(bands))
        .map(|(s, (&guide, (band_left, band_right)))| Mark {
            shape: MarkShape::Rect {
                x: band_left,
                y: top as f64,
                width: band_right - band_left,
                height: (bottom - top) as f64,
            },
            content: year_tooltip(s, palette),
            guide_x: Some(guide),
        })
        .collect())
}

fn year_tooltip(shares: &YearShares, palette: &[RGBColor; 3]) -> TooltipContent {
    TooltipContent {
        heading: format!("Year: {}", shares.year),
        lines: IncomeTier::ALL
            .iter()
            .map(|tier| TooltipLine {
                label: tier.label().to_string(),
                value: format!("{:.1}%", shares.shares.get(*tier)),
                color: Some(hex(palette[tier.index()])),
            })
            .collect(),
    }
}
