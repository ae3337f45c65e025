//! Median income against the cost of living index on two y axes.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;

use crate::core::error::StoryError;
use crate::core::tooltip::{format_thousands, Mark, MarkShape, TooltipContent, TooltipLine};
use crate::data::records::CostVsWages;
use crate::render::palette::{hex, ANNOTATION, COST_LINE, INCOME_LINE};
use crate::render::scales::{nice_upper, year_domain};

const POINT_RADIUS: i32 = 4;
/// Hover radius around each income point
const HIT_RADIUS: f64 = 6.0;

/// A labelled economic event drawn as a vertical guide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crisis {
    pub year: i32,
    pub name: &'static str,
    /// Label position below the top of the plot, as a fraction of its height
    pub offset: f64,
}

pub const CRISES: [Crisis; 3] = [
    Crisis { year: 1973, name: "Oil Crisis", offset: 0.2 },
    Crisis { year: 1980, name: "Early 80s Recession", offset: 0.3 },
    Crisis { year: 2008, name: "Great Recession", offset: 0.4 },
];

/// Crises whose year falls inside `[start, end]`
pub fn visible_crises(start: f64, end: f64) -> impl Iterator<Item = &'static Crisis> {
    CRISES
        .iter()
        .filter(move |c| (c.year as f64) >= start && (c.year as f64) <= end)
}

/// `series` must already be ordered by year. Returns one circular mark per point.
pub fn draw(
    root: &DrawingArea<SVGBackend, Shift>,
    title: &str,
    series: &[CostVsWages],
) -> Result<Vec<Mark>, StoryError> {
    root.fill(&WHITE)?;
    let (x0, x1) = year_domain(series.iter().map(|r| r.year));
    let income_top = nice_upper(series.iter().map(|r| r.median_income).fold(f64::NEG_INFINITY, f64::max));
    let cost_top = nice_upper(series.iter().map(|r| r.cost_index).fold(f64::NEG_INFINITY, f64::max));

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .right_y_label_area_size(60)
        .build_cartesian_2d(x0..x1, 0f64..income_top)?
        .set_secondary_coord(x0..x1, 0f64..cost_top);

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(6)
        .x_desc("Year")
        .y_desc("Median Income ($)")
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("${}", format_thousands(*v)))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc("Cost of Living Index")
        .draw()?;

    for crisis in visible_crises(x0, x1) {
        let x = crisis.year as f64;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x, 0.0), (x, income_top)],
            ANNOTATION.mix(0.5).stroke_width(1),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            crisis.name.to_string(),
            (x, income_top * (1.0 - crisis.offset)),
            ("sans-serif", 11)
                .into_font()
                .transform(FontTransform::Rotate270)
                .color(&ANNOTATION),
        )))?;
    }

    if series.is_empty() {
        return Ok(Vec::new());
    }

    chart
        .draw_series(LineSeries::new(
            series.iter().map(|r| (r.year as f64, r.median_income)),
            INCOME_LINE.stroke_width(3),
        ))?
        .label("Median Income")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], INCOME_LINE.stroke_width(3)));

    chart
        .draw_secondary_series(LineSeries::new(
            series.iter().map(|r| (r.year as f64, r.cost_index)),
            COST_LINE.stroke_width(3),
        ))?
        .label("Cost of Living")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], COST_LINE.stroke_width(3)));

    chart.draw_series(
        series
            .iter()
            .map(|r| Circle::new((r.year as f64, r.median_income), POINT_RADIUS, INCOME_LINE.filled())),
    )?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.9))
        .border_style(&BLACK)
        .draw()?;

    Ok(series
        .iter()
        .map(|r| {
            let (cx, cy) = chart.backend_coord(&(r.year as f64, r.median_income));
            Mark {
                shape: MarkShape::Circle { cx: cx as f64, cy: cy as f64, r: HIT_RADIUS },
                content: TooltipContent {
                    heading: r.year.to_string(),
                    lines: vec![
                        TooltipLine {
                            label: "Income".to_string(),
                            value: format!("${}", format_thousands(r.median_income)),
                            color: Some(hex(INCOME_LINE)),
                        },
                        TooltipLine {
                            label: "Cost Index".to_string(),
                            value: r.cost_index.to_string(),
                            color: Some(hex(COST_LINE)),
                        },
                    ],
                },
                guide_x: None,
            }
        })
        .collect())
}
