//! About page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use devico_core::carousel::{Carousel, HERO_VIDEO_INTERVAL, TIMELINE_INTERVAL, TIMELINE_RESUME_DELAY};
use devico_core::timer::Millis;
use serde::Deserialize;
use tracing::instrument;

use crate::content::{self, Milestone, Value};
use crate::filters;
use crate::middleware::Visitor;
use crate::routes::Layout;
use crate::state::AppState;

/// Query parameters read by the about page.
#[derive(Debug, Default, Deserialize)]
pub struct AboutQuery {
    pub milestone: Option<usize>,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub layout: Layout,
    pub hero_videos: &'static [&'static str],
    pub hero_video_interval_ms: u128,
    pub timeline: &'static [Milestone],
    pub milestone: Milestone,
    pub milestone_index: usize,
    pub timeline_interval_ms: u128,
    pub timeline_resume_ms: u128,
    pub values: &'static [Value],
}

/// The timeline positioned on the requested milestone.
fn timeline_at(selected: Option<usize>) -> Carousel {
    let mut timeline = Carousel::new(content::TIMELINE.len(), TIMELINE_INTERVAL)
        .with_resume_delay(TIMELINE_RESUME_DELAY);
    if let Some(index) = selected {
        timeline.select(index, Millis(0));
    }
    timeline
}

/// Display the about page.
#[instrument(skip(state, visitor))]
pub async fn show(
    State(state): State<AppState>,
    visitor: Visitor,
    query: Result<Query<AboutQuery>, QueryRejection>,
) -> AboutTemplate {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let timeline = timeline_at(query.milestone);
    let milestone_index = timeline.index();

    AboutTemplate {
        layout: Layout::new(&state, &visitor),
        hero_videos: &content::HERO_VIDEOS,
        hero_video_interval_ms: HERO_VIDEO_INTERVAL.as_millis(),
        timeline: &content::TIMELINE,
        milestone: content::TIMELINE
            .get(milestone_index)
            .copied()
            .unwrap_or(content::TIMELINE[0]),
        milestone_index,
        timeline_interval_ms: TIMELINE_INTERVAL.as_millis(),
        timeline_resume_ms: TIMELINE_RESUME_DELAY.as_millis(),
        values: &content::VALUES,
    }
}
