//! Grouped stacked bars comparing races across two years.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::core::error::StoryError;
use crate::core::tooltip::{Mark, MarkShape, TooltipContent, TooltipLine};
use crate::data::pivot::RaceYearShares;
use crate::data::records::IncomeTier;
use crate::render::palette::{hex, FILL_OPACITY};
use crate::render::scales::GroupedBands;

/// Draw one group per race with one stacked bar per year.
///
/// `groups` must be race-major, `races.len() * years.len()` entries long.
/// Returns one mark per drawn segment, tier by tier.
pub fn draw(
    root: &DrawingArea<SVGBackend, Shift>,
    title: &str,
    groups: &[RaceYearShares],
    races: &[&str],
    years: &[i32],
    palette: &[RGBColor; 3],
) -> Result<Vec<Mark>, StoryError> {
    root.fill(&WHITE)?;
    let bands = GroupedBands::new(years.len());
    let (x0, x1) = GroupedBands::domain(races.len());

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, 0f64..100f64)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(races.len().max(1))
        .x_desc("Race")
        .y_desc("Percentage of Population")
        .x_label_formatter(&|v| group_label(races, *v))
        .y_label_formatter(&|v| format!("{:.0}%", v))
        .draw()?;

    if years.is_empty() {
        return Ok(Vec::new());
    }

    // (group, member, shares) for every bar
    let bars: Vec<(usize, usize, &RaceYearShares)> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| (i / years.len(), i % years.len(), g))
        .filter(|(group, _, _)| *group < races.len())
        .collect();

    let mut marks = Vec::with_capacity(bars.len() * IncomeTier::ALL.len());
    for tier in IncomeTier::ALL {
        let color = palette[tier.index()];
        let mut segments = Vec::with_capacity(bars.len());
        for &(group, member, shares) in &bars {
            let (left, right) = bands.span(group, member);
            let (lo, hi) = shares.shares.stacked()[tier.index()];
            segments.push(Rectangle::new(
                [(left, lo), (right, hi)],
                color.mix(FILL_OPACITY).filled(),
            ));

            let (px0, py0) = chart.backend_coord(&(left, hi));
            let (px1, py1) = chart.backend_coord(&(right, lo));
            marks.push(Mark {
                shape: MarkShape::Rect {
                    x: px0 as f64,
                    y: py0 as f64,
                    width: (px1 - px0) as f64,
                    height: (py1 - py0) as f64,
                },
                content: TooltipContent {
                    heading: shares.race.clone(),
                    lines: vec![TooltipLine {
                        label: format!("{} {}", shares.year, tier.label()),
                        value: format!("{:.1}%", hi - lo),
                        color: Some(hex(color)),
                    }],
                },
                guide_x: None,
            });
        }

        chart
            .draw_series(segments)?
            .label(tier.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.9))
        .border_style(&BLACK)
        .draw()?;

    Ok(marks)
}

/// Axis label for the group centred nearest to `position`
fn group_label(races: &[&str], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    races.get(index as usize).map(|r| r.to_string()).unwrap_or_default()
}
