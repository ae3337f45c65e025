//! Server-side SVG rendering of the story scenes.

pub mod area;
pub mod bars;
pub mod divergence;
pub mod frame;
pub mod palette;
pub mod scales;

use log::debug;

use crate::core::config::ChartConfig;
use crate::core::error::StoryError;
use crate::core::step::{RaceSelection, Scene};
use crate::data::pivot;
use crate::data::records::Race;
use crate::data::snapshot::DataSnapshot;

pub use frame::{render_error, ChartFrame};

pub const INCOME_TITLE: &str = "Middle Class Shrinkage Over Time";
pub const RACE_COMPARISON_TITLE: &str = "Income Distribution by Race: 1970 vs 2020";
pub const DIVERGENCE_TITLE: &str = "The Great Divergence: Income vs. Cost of Living (1970-2020)";

/// Years compared side by side for every race
pub const COMPARISON_YEARS: [i32; 2] = [1970, 2020];

pub fn race_title(race: Race) -> String {
    format!("Income Distribution for {} Population: 1970-2020", race)
}

/// Draw `scene` from `data`
pub fn render_scene(scene: Scene, data: &DataSnapshot, config: &ChartConfig) -> Result<ChartFrame, StoryError> {
    debug!("Rendering scene {}", scene.name());
    match scene {
        Scene::Cleared => frame::draw_frame(scene, None, config, |_| Ok(Vec::new())),
        Scene::IncomeOverTime => {
            let series = pivot::shares_by_year(&data.income_by_year);
            frame::draw_frame(scene, Some(INCOME_TITLE.to_string()), config, |root| {
                area::draw(root, INCOME_TITLE, &series, &palette::AREA_TIERS)
            })
        }
        Scene::RaceComparison(RaceSelection::All) => {
            let races: Vec<&str> = Race::ALL.iter().map(|r| r.as_str()).collect();
            let groups = pivot::race_comparison(&data.income_by_race, &races, &COMPARISON_YEARS);
            frame::draw_frame(scene, Some(RACE_COMPARISON_TITLE.to_string()), config, |root| {
                bars::draw(root, RACE_COMPARISON_TITLE, &groups, &races, &COMPARISON_YEARS, &palette::RACE_TIERS)
            })
        }
        Scene::RaceComparison(RaceSelection::Race(race)) => {
            let title = race_title(race);
            let series = pivot::race_over_time(&data.income_by_race, race.as_str());
            frame::draw_frame(scene, Some(title.clone()), config, |root| {
                area::draw(root, &title, &series, &palette::RACE_TIERS)
            })
        }
        Scene::Divergence => {
            let series = pivot::cost_series(&data.cost_vs_wages);
            frame::draw_frame(scene, Some(DIVERGENCE_TITLE.to_string()), config, |root| {
                divergence::draw(root, DIVERGENCE_TITLE, &series)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tooltip::{MarkShape, TooltipState};
    use crate::data::fallback::sample_snapshot;
    use crate::data::records::{IncomeByRace, IncomeTier};

    fn config() -> ChartConfig {
        ChartConfig::default()
    }

    // Test the cleared scene has no title and nothing to hover
    #[test]
    fn test_cleared_scene() {
        let frame = render_scene(Scene::Cleared, &sample_snapshot(), &config()).unwrap();
        assert!(frame.title.is_none());
        assert!(frame.marks.is_empty());
        assert!(frame.svg.contains("<svg"));
        assert!(!frame.svg.contains(INCOME_TITLE));
    }

    // Test the income scene yields one hover band per year
    #[test]
    fn test_income_over_time() {
        let frame = render_scene(Scene::IncomeOverTime, &sample_snapshot(), &config()).unwrap();
        assert_eq!(frame.title.as_deref(), Some(INCOME_TITLE));
        assert!(frame.svg.contains(INCOME_TITLE));
        assert!(frame.svg.contains("Middle Class"));
        assert_eq!(frame.marks.len(), 6);

        let first = &frame.marks[0];
        assert_eq!(first.content.heading, "Year: 1970");
        assert_eq!(first.content.lines[0].label, "Lower Class");
        assert_eq!(first.content.lines[0].value, "50.9%");
        assert_eq!(first.content.lines[0].color.as_deref(), Some("#e74c3c"));

        // bands are ordered left to right and do not overlap
        for pair in frame.marks.windows(2) {
            let (a, b) = (pair[0].guide_x.unwrap(), pair[1].guide_x.unwrap());
            assert!(a < b);
        }

        // hovering a guide line selects that year
        let guide = frame.marks[3].guide_x.unwrap();
        let y = match frame.marks[3].shape {
            MarkShape::Rect { y, height, .. } => y + height / 2.0,
            MarkShape::Circle { .. } => panic!("expected a band"),
        };
        let tooltip = TooltipState::hover(&frame.marks, guide, y);
        assert_eq!(tooltip.content.unwrap().heading, "Year: 2000");
        assert_eq!(tooltip.guide_x, Some(guide));
    }

    // Test the race comparison draws every segment of every bar
    #[test]
    fn test_race_comparison_all() {
        let scene = Scene::RaceComparison(RaceSelection::All);
        let frame = render_scene(scene, &sample_snapshot(), &config()).unwrap();
        assert_eq!(frame.title.as_deref(), Some(RACE_COMPARISON_TITLE));
        assert_eq!(frame.marks.len(), 24);
        assert_eq!(frame.marks[0].content.heading, "White");
        assert_eq!(frame.marks[0].content.lines[0].label, "1970 Lower Class");
        assert_eq!(frame.marks[0].content.lines[0].value, "33.8%");
        for race in Race::ALL {
            assert!(frame.svg.contains(race.as_str()));
        }
    }

    // Test hovering a bar segment shows that segment's row
    #[test]
    fn test_race_comparison_hover_segment() {
        let scene = Scene::RaceComparison(RaceSelection::All);
        let frame = render_scene(scene, &sample_snapshot(), &config()).unwrap();

        // tier-major, then race, then year: Middle, Black, 2020
        let (cx, cy) = match frame.marks[8 + 2 + 1].shape {
            MarkShape::Rect { x, y, width, height } => (x + width / 2.0, y + height / 2.0),
            MarkShape::Circle { .. } => panic!("expected a bar segment"),
        };
        let tooltip = TooltipState::hover(&frame.marks, cx, cy);
        assert!(tooltip.visible);
        let content = tooltip.content.unwrap();
        assert_eq!(content.heading, "Black");
        assert_eq!(content.lines[0].label, "2020 Middle Class");
        assert_eq!(content.lines[0].value, "42.6%");
        assert_eq!(content.lines[0].color.as_deref(), Some("#ff7f0e"));

        // the canvas corner lies outside the plot
        assert_eq!(TooltipState::hover(&frame.marks, 1.0, 1.0), TooltipState::hidden());
    }

    // Test a single race is drawn over its own distinct years
    #[test]
    fn test_race_comparison_single_race() {
        let mut data = sample_snapshot();
        data.income_by_race.push(IncomeByRace {
            race: "Black".to_string(),
            year: 1995,
            income_tier: IncomeTier::Middle,
            percent_population: 0.5,
        });
        let scene = Scene::RaceComparison(RaceSelection::Race(Race::Black));
        let frame = render_scene(scene, &data, &config()).unwrap();
        assert_eq!(
            frame.title.as_deref(),
            Some("Income Distribution for Black Population: 1970-2020")
        );
        let headings: Vec<&str> = frame.marks.iter().map(|m| m.content.heading.as_str()).collect();
        assert_eq!(headings, vec!["Year: 1970", "Year: 1995", "Year: 2020"]);
        assert_eq!(frame.marks[0].content.lines[0].color.as_deref(), Some("#d62728"));
    }

    // Test the divergence chart exposes one point per row with formatted values
    #[test]
    fn test_divergence() {
        let frame = render_scene(Scene::Divergence, &sample_snapshot(), &config()).unwrap();
        assert_eq!(frame.title.as_deref(), Some(DIVERGENCE_TITLE));
        assert_eq!(frame.marks.len(), 6);
        assert!(frame.svg.contains("Oil Crisis"));
        assert!(frame.svg.contains("Great Recession"));

        let first = &frame.marks[0];
        assert_eq!(first.content.heading, "1970");
        assert_eq!(first.content.lines[0].value, "$20,171.4");
        assert_eq!(first.content.lines[1].value, "103.7");
        assert!(matches!(first.shape, MarkShape::Circle { r, .. } if r == 6.0));
    }

    // Test empty data still renders every scene
    #[test]
    fn test_empty_data_renders() {
        let data = DataSnapshot::empty();
        for scene in [
            Scene::Cleared,
            Scene::IncomeOverTime,
            Scene::RaceComparison(RaceSelection::All),
            Scene::RaceComparison(RaceSelection::Race(Race::Asian)),
            Scene::Divergence,
        ] {
            let frame = render_scene(scene, &data, &config()).unwrap();
            assert!(frame.svg.contains("<svg"));
        }
    }

    #[test]
    fn test_error_frame() {
        let frame = render_error(Scene::Divergence, "no tables", &config());
        assert_eq!(frame.title.as_deref(), Some(frame::ERROR_TITLE));
        assert_eq!(frame.error.as_deref(), Some("no tables"));
        assert!(frame.svg.contains("no tables"));
        assert!(frame.marks.is_empty());
    }
}
