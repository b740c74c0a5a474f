//! # VU Meter Widget
//!
//! Horizontal level meter for the block intensity reported with each
//! spectrum, on a dB scale from `DB_FLOOR` to 0 dB.

use iced::widget::canvas::{self, Geometry, Path, Stroke};
use iced::widget::container;
use iced::{mouse, Color, Element, Point, Rectangle, Renderer, Size, Theme};
use spectrum_core::display::{pack_rgb, DB_FLOOR};

use super::spectrum_bars::to_color;

/// Tick marks every this many dB.
const TICK_STEP_DB: f32 = 10.0;

pub struct VuMeter {
    /// Current level in dB (None if nothing analyzed yet)
    db: Option<f32>,
}

impl VuMeter {
    pub fn new(db: Option<f32>) -> Self {
        Self { db }
    }

    pub fn view(self) -> Element<'static, crate::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fixed(40.0)),
        )
        .into()
    }
}

/// Position of a dB value along the meter, in `[0, 1]`.
fn fraction(db: f32) -> f32 {
    ((db - DB_FLOOR) / -DB_FLOOR).clamp(0.0, 1.0)
}

impl<Message> canvas::Program<Message> for VuMeter {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        // Draw meter background
        let background = Path::rectangle(Point::ORIGIN, bounds.size());
        frame.fill(&background, Color::from_rgb8(0x40, 0x40, 0x40));

        if let Some(db) = self.db {
            let level = fraction(db);
            let fill = Path::rectangle(Point::ORIGIN, Size::new(level * bounds.width, bounds.height));
            frame.fill(&fill, to_color(pack_rgb(level)));
        }

        let mut tick_db = DB_FLOOR + TICK_STEP_DB;
        while tick_db < 0.0 {
            let x = fraction(tick_db) * bounds.width;
            let tick = Path::line(Point::new(x, bounds.height * 0.6), Point::new(x, bounds.height));
            frame.stroke(&tick, Stroke::default().with_width(1.0).with_color(Color::WHITE));
            tick_db += TICK_STEP_DB;
        }

        vec![frame.into_geometry()]
    }
}
