use chrono::{DateTime, Utc};
use log::error;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::Serialize;
use uuid::Uuid;

use crate::core::config::ChartConfig;
use crate::core::error::StoryError;
use crate::core::step::Scene;
use crate::core::tooltip::Mark;

pub const ERROR_TITLE: &str = "Unable to load story data";

/// A rendered scene
#[derive(Debug, Clone, Serialize)]
pub struct ChartFrame {
    pub id: Uuid,
    /// Scene that was requested
    pub scene: Scene,
    pub title: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Standalone SVG document
    pub svg: String,
    /// Set when this frame shows an error instead of the scene
    pub error: Option<String>,
    /// Hover regions in SVG pixel coordinates
    #[serde(skip)]
    pub marks: Vec<Mark>,
    pub rendered_at: DateTime<Utc>,
}

/// Run `draw` against a fresh SVG canvas and collect its marks
pub fn draw_frame<F>(
    scene: Scene,
    title: Option<String>,
    config: &ChartConfig,
    draw: F,
) -> Result<ChartFrame, StoryError>
where
    F: FnOnce(&DrawingArea<SVGBackend, Shift>) -> Result<Vec<Mark>, StoryError>,
{
    let mut svg = String::new();
    let marks = {
        let root = SVGBackend::with_string(&mut svg, (config.width, config.height)).into_drawing_area();
        let marks = draw(&root)?;
        root.present()?;
        marks
    };

    Ok(ChartFrame {
        id: Uuid::new_v4(),
        scene,
        title,
        width: config.width,
        height: config.height,
        svg,
        error: None,
        marks,
        rendered_at: Utc::now(),
    })
}

fn draw_error(root: &DrawingArea<SVGBackend, Shift>, message: &str) -> Result<Vec<Mark>, StoryError> {
    root.fill(&WHITE)?;
    let (width, height) = root.dim_in_pixel();
    let center = Pos::new(HPos::Center, VPos::Center);
    let (cx, cy) = (width as i32 / 2, height as i32 / 2);

    root.draw(&Text::new(
        ERROR_TITLE.to_string(),
        (cx, cy - 20),
        ("sans-serif", 20).into_font().color(&BLACK).pos(center),
    ))?;
    root.draw(&Text::new(
        message.to_string(),
        (cx, cy + 10),
        ("sans-serif", 14).into_font().color(&RED).pos(center),
    ))?;
    Ok(Vec::new())
}

/// Frame shown instead of a chart when the story cannot be drawn
pub fn render_error(scene: Scene, message: &str, config: &ChartConfig) -> ChartFrame {
    let frame = draw_frame(scene, Some(ERROR_TITLE.to_string()), config, |root| {
        draw_error(root, message)
    });

    let mut frame = frame.unwrap_or_else(|e| {
        error!("Failed to draw error frame: {}", e);
        ChartFrame {
            id: Uuid::new_v4(),
            scene,
            title: Some(ERROR_TITLE.to_string()),
            width: config.width,
            height: config.height,
            svg: format!(
                r#"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg"></svg>"#,
                config.width, config.height, config.width, config.height
            ),
            error: None,
            marks: Vec::new(),
            rendered_at: Utc::now(),
        }
    });
    frame.error = Some(message.to_string());
    frame
}
