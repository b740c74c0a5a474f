//! # Main Display Module
//!
//! This module contains the main display components and layout logic
//! for the spectrum analyzer application.

use iced::{Element, Length, Alignment};
use iced::widget::{column, Space, container, row, text, button, horizontal_space};
use spectrum_core::bin_count;

use crate::widgets::{spectrum_bars, vu_meter};

/// Configuration for a single button in the sidebar
#[derive(Debug, Clone)]
struct ButtonConfig {
    label: &'static str,
    message: crate::Message,
    button_type: ButtonType,
}

/// Different types of buttons with their styling requirements
#[derive(Debug, Clone)]
enum ButtonType {
    /// Standard button with no special styling
    Standard,
    /// Freeze button that changes color while the display is held
    Freeze,
}

/// Static sidebar configuration
const SIDEBAR_CONFIG: &[(&str, &[ButtonConfig])] = &[
    ("Tools", &[
        ButtonConfig { label: "Spectrum", message: crate::Message::ToggleSpectrum, button_type: ButtonType::Standard },
        ButtonConfig { label: "Level meter", message: crate::Message::ToggleMeter, button_type: ButtonType::Standard },
        ButtonConfig { label: "Freeze", message: crate::Message::ToggleFreeze, button_type: ButtonType::Freeze },
    ]),
    ("Program", &[
        ButtonConfig { label: "Save Settings", message: crate::Message::SaveConfig, button_type: ButtonType::Standard },
        ButtonConfig { label: "Quit", message: crate::Message::Exit, button_type: ButtonType::Standard },
    ]),
];

/// Creates the complete main application view
pub fn create_main_view(data: &crate::AppDisplayData) -> Element<'static, crate::Message> {
    if !data.audio_active {
        let message = data.status.clone().unwrap_or_else(|| "Audio stopped".to_string());
        return container(text(message).size(28))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into();
    }

    let title = text("Spectrum").size(28);

    let mut panels = column![].spacing(10).width(Length::Fill);
    if let Some(spectrum) = create_spectrum_panel(data) {
        panels = panels.push(spectrum);
    }
    if let Some(meter) = create_meter_panel(data) {
        panels = panels.push(meter);
    }

    let main_content = row![
        column![
            title,
            Space::with_height(20),
            panels,
        ]
        .width(Length::Fill)
        .spacing(10),
        Space::with_width(10),
        create_sidebar(data.frozen),
    ]
    .align_y(Alignment::Start)
    .padding(20);

    container(main_content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Creates the spectrum bar chart panel.
fn create_spectrum_panel(data: &crate::AppDisplayData) -> Option<Element<'static, crate::Message>> {
    if !data.spectrum_visible {
        return None;
    }

    let caption = match data.stream_info {
        Some(info) => format!(
            "{} bins, {:.1} Hz per bin",
            bin_count(data.bits),
            info.sample_rate as f32 / (2 * bin_count(data.bits)).max(1) as f32
        ),
        None => format!("{} bins", bin_count(data.bits)),
    };

    let panel = container(
        column![
            row![text("Magnitude Spectrum").size(18), horizontal_space(), text(caption).size(14)],
            Space::with_height(10),
            container(spectrum_bars::SpectrumBars::new(data.bar_heights.clone()).view())
                .width(Length::Fill)
                .height(Length::Fill),
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::Fill)
    .height(Length::Fixed(320.0));

    Some(panel.into())
}

/// Creates the intensity meter panel.
fn create_meter_panel(data: &crate::AppDisplayData) -> Option<Element<'static, crate::Message>> {
    if !data.meter_visible {
        return None;
    }

    let level_text = data
        .intensity_db
        .map(|db| format!("{:.1} dB", db))
        .unwrap_or_else(|| "-- dB".to_string());

    let panel = container(
        column![
            row![text("Intensity").size(18), horizontal_space(), text(level_text).size(16)]
                .align_y(Alignment::Center),
            Space::with_height(10),
            vu_meter::VuMeter::new(data.intensity_db).view(),
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::Fill)
    .height(Length::Fixed(110.0));

    Some(panel.into())
}

/// Creates the sidebar with one section per `SIDEBAR_CONFIG` entry.
fn create_sidebar(frozen: bool) -> Element<'static, crate::Message> {
    let sections = SIDEBAR_CONFIG.iter().fold(column![].spacing(10), |col, (title, buttons)| {
        col.push(make_section(title, buttons, frozen))
    });

    container(sections.padding(15))
        .width(Length::Fixed(200.0))
        .height(Length::Fill)
        .into()
}

fn make_section(
    title: &'static str,
    buttons: &[ButtonConfig],
    frozen: bool,
) -> Element<'static, crate::Message> {
    let items = buttons
        .iter()
        .fold(column![].spacing(8), |col, config| col.push(make_button(config, frozen)));

    column![text(title).size(18), Space::with_height(10), items]
        .spacing(5)
        .into()
}

fn make_button(config: &ButtonConfig, frozen: bool) -> Element<'static, crate::Message> {
    let mut button = button(text(config.label).size(14).width(Length::Fill))
        .padding([6, 10]);

    if let ButtonType::Freeze = config.button_type {
        if frozen {
            button = button.style(|_theme, _status| {
                use iced::widget::button;
                button::Style {
                    background: Some(iced::Background::Color(iced::Color::from_rgb(0.2, 0.4, 0.8))), // Blue background
                    text_color: iced::Color::WHITE,
                    ..button::Style::default()
                }
            });
        }
    }

    button.on_press(config.message.clone()).into()
}
