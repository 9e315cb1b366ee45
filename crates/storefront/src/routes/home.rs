//! Home page route handler.
//!
//! The landing page stacks hero, tagline, the "Crafted for you" product
//! carousel, the photo carousel and customer reviews. Section snapping runs
//! client side; its thresholds are exposed as data attributes.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use devico_core::carousel::{Carousel, PHOTO_CAROUSEL_INTERVAL};
use devico_core::scroll::SnapConfig;
use devico_core::timer::Millis;
use devico_core::{BasePath, Catalog, format_money};
use serde::Deserialize;
use tracing::instrument;

use crate::content::{self, PhotoSlide, Review};
use crate::filters;
use crate::middleware::Visitor;
use crate::routes::Layout;
use crate::services::OrderConfirmation;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub image: String,
}

impl ProductView {
    fn list(catalog: &Catalog, base: &BasePath) -> Vec<Self> {
        catalog
            .products()
            .iter()
            .map(|product| Self {
                id: product.id.as_i32(),
                name: product.name.clone(),
                price: format_money(product.price),
                image: base.join(&product.image),
            })
            .collect()
    }
}

/// Photo carousel position: current slide plus its neighbours.
#[derive(Debug, Clone, Copy)]
pub struct PhotoCarouselView {
    pub index: usize,
    pub previous: usize,
    pub next: usize,
    pub interval_ms: u128,
}

impl PhotoCarouselView {
    /// Position the carousel on `selected`, ignoring out-of-range picks.
    #[must_use]
    pub fn at(selected: Option<usize>) -> Self {
        let mut carousel = Carousel::new(content::PHOTO_SLIDES.len(), PHOTO_CAROUSEL_INTERVAL);
        if let Some(index) = selected {
            carousel.select(index, Millis(0));
        }
        let index = carousel.index();

        let mut previous = carousel.clone();
        previous.previous();
        let mut next = carousel.clone();
        next.next();

        Self {
            index,
            previous: previous.index(),
            next: next.index(),
            interval_ms: PHOTO_CAROUSEL_INTERVAL.as_millis(),
        }
    }
}

/// Snap tunables rendered as `data-*` attributes.
#[derive(Debug, Clone, Copy)]
pub struct SnapAttributes {
    pub upper_threshold: f64,
    pub lower_threshold: f64,
    pub hero_visible_fraction: f64,
    pub header_height: f64,
    pub wheel_idle_ms: u128,
    pub touch_settle_ms: u128,
    pub touch_settle_ios_ms: u128,
    pub snap_lock_ms: u128,
}

impl From<SnapConfig> for SnapAttributes {
    fn from(config: SnapConfig) -> Self {
        Self {
            upper_threshold: config.upper_threshold,
            lower_threshold: config.lower_threshold,
            hero_visible_fraction: config.hero_visible_fraction,
            header_height: config.header_height,
            wheel_idle_ms: config.wheel_idle.as_millis(),
            touch_settle_ms: config.touch_settle.as_millis(),
            touch_settle_ios_ms: config.touch_settle_ios.as_millis(),
            snap_lock_ms: config.snap_lock.as_millis(),
        }
    }
}

/// Query parameters read by the home page.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub photo: Option<usize>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub hero_title: &'static str,
    pub hero_subtitle: &'static str,
    pub tagline: &'static str,
    pub crafted_heading: &'static str,
    pub products: Vec<ProductView>,
    pub photos: &'static [PhotoSlide],
    pub photo: PhotoCarouselView,
    pub reviews_heading: &'static str,
    pub reviews_subheading: &'static str,
    pub reviews: &'static [Review],
    pub snap: SnapAttributes,
    pub confirmation: Option<OrderConfirmation>,
}

impl HomeTemplate {
    /// Build the home page for `visitor`.
    #[must_use]
    pub fn new(state: &AppState, visitor: &Visitor, photo: Option<usize>) -> Self {
        Self {
            layout: Layout::new(state, visitor),
            hero_title: content::HERO_TITLE,
            hero_subtitle: content::HERO_SUBTITLE,
            tagline: content::TAGLINE,
            crafted_heading: content::CRAFTED_HEADING,
            products: ProductView::list(state.catalog(), state.base()),
            photos: &content::PHOTO_SLIDES,
            photo: PhotoCarouselView::at(photo),
            reviews_heading: content::REVIEWS_HEADING,
            reviews_subheading: content::REVIEWS_SUBHEADING,
            reviews: &content::REVIEWS,
            snap: SnapConfig::default().into(),
            confirmation: None,
        }
    }
}

/// Display the home page. Also serves every unknown path.
#[instrument(skip(state, visitor))]
pub async fn index(
    State(state): State<AppState>,
    visitor: Visitor,
    query: Result<Query<HomeQuery>, QueryRejection>,
) -> HomeTemplate {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    HomeTemplate::new(&state, &visitor, query.photo)
}
