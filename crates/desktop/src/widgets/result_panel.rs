use iced::widget::{column, container, image, scrollable, text};
use iced::{ContentFit, Element, Length, Theme};

use face_reader_core::shared::constants::DISCLAIMER;

use crate::app::Message;
use crate::theme::{muted_color, panel};

/// What the last Analyze produced: the annotated image and the verdict text.
pub struct AnalysisView {
    pub annotated: image::Handle,
    pub verdict: String,
}

pub fn result_panel<'a>(result: Option<&AnalysisView>) -> Element<'a, Message> {
    let body: Element<'a, Message> = match result {
        Some(view) => column![
            image(view.annotated.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill),
            text(view.verdict.clone()).size(14),
            disclaimer(),
        ]
        .spacing(12)
        .into(),
        None => column![
            text("No reading yet.").size(14),
            text("Start the camera, face it, then press Analyze.").size(12),
            disclaimer(),
        ]
        .spacing(8)
        .into(),
    };

    container(scrollable(body).height(Length::Fill))
        .width(Length::FillPortion(2))
        .height(Length::Fill)
        .padding(12)
        .style(panel)
        .into()
}

fn disclaimer<'a>() -> Element<'a, Message> {
    text(DISCLAIMER)
        .size(11)
        .style(|theme: &Theme| text::Style {
            color: Some(muted_color(theme)),
        })
        .into()
}
