use iced::widget::{container, image, text};
use iced::{ContentFit, Element, Length, Theme};

use face_reader_core::shared::display_image::DisplayImage;

use crate::app::Message;
use crate::theme::{muted_color, panel};

pub fn to_handle(display: DisplayImage) -> image::Handle {
    image::Handle::from_rgba(display.width, display.height, display.rgba)
}

/// The camera feed, or a placeholder before the first frame.
pub fn live_view<'a>(frame: Option<&image::Handle>, streaming: bool) -> Element<'a, Message> {
    let content: Element<'a, Message> = match frame {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => {
            let hint = if streaming {
                "Waiting for the camera\u{2026}"
            } else {
                "Camera is off. Press Start Camera."
            };
            text(hint)
                .size(14)
                .style(|theme: &Theme| text::Style {
                    color: Some(muted_color(theme)),
                })
                .into()
        }
    };

    container(content)
        .width(Length::FillPortion(3))
        .height(Length::Fill)
        .center_x(Length::FillPortion(3))
        .center_y(Length::Fill)
        .padding(8)
        .style(panel)
        .into()
}
