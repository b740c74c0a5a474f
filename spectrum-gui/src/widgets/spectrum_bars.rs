//! # Spectrum Bars Widget
//!
//! This module draws the analyzer's magnitude spectrum as a bar chart.
//! Heights arrive already log-scaled and decayed from `spectrum_core::display`;
//! each bar is colored by its own height, green through red.

use iced::widget::canvas::{self, Geometry, Path};
use iced::widget::container;
use iced::{mouse, Color, Element, Point, Rectangle, Renderer, Size, Theme};
use spectrum_core::display::{pack_rgb, unpack_rgb};

/// Gap between neighbouring bars in pixels.
const BAR_GAP: f32 = 1.0;

/// Bar chart of normalized band heights.
pub struct SpectrumBars {
    /// One height in `[0, 1]` per band, lowest frequency first
    heights: Vec<f32>,
}

impl SpectrumBars {
    pub fn new(heights: Vec<f32>) -> Self {
        Self { heights }
    }

    pub fn view(self) -> Element<'static, crate::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fill),
        )
        .into()
    }
}

/// Converts a packed `0xRRGGBB` color for drawing.
pub fn to_color(packed: u32) -> Color {
    let (r, g, b) = unpack_rgb(packed);
    Color::from_rgb8(r, g, b)
}

impl<Message> canvas::Program<Message> for SpectrumBars {
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

        if !bounds.width.is_finite() || !bounds.height.is_finite() || self.heights.is_empty() {
            return vec![frame.into_geometry()];
        }

        let slot_width = bounds.width / self.heights.len() as f32;
        let bar_width = (slot_width - BAR_GAP).max(1.0);

        for (i, &level) in self.heights.iter().enumerate() {
            let height = level.clamp(0.0, 1.0) * bounds.height;
            if height.is_finite() && height > 0.0 {
                let bar = Path::rectangle(
                    Point::new(i as f32 * slot_width, bounds.height - height),
                    Size::new(bar_width, height),
                );
                frame.fill(&bar, to_color(pack_rgb(level)));
            }
        }

        vec![frame.into_geometry()]
    }
}
