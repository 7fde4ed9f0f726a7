use iced::{
    Color, Element, Theme, border,
    widget::{container, container::Style, row, text},
};
use iced_widget::container::bordered_box;

use crate::core::db::TaskStatus;

fn rank(status: TaskStatus) -> u8 {
    match status {
        TaskStatus::Pending => 0,
        TaskStatus::InProgress => 1,
        TaskStatus::Done => 2,
    }
}

/// Statuses up to and including `current` are drawn dimmed.
fn status_style(current: TaskStatus, step: TaskStatus) -> impl Fn(&Theme) -> Style {
    move |theme: &Theme| {
        let style = bordered_box(theme).border(border::width(2));
        if rank(current) >= rank(step) {
            let mut color_rgba = theme.palette().background.into_rgba8();
            color_rgba[0] /= 2;
            color_rgba[1] /= 2;
            color_rgba[2] /= 2;
            style.background(Color::from_rgb8(color_rgba[0], color_rgba[1], color_rgba[2]))
        } else {
            style.background(theme.palette().background)
        }
    }
}

/// Progress strip for a task status: Pending -> In progress -> Done.
pub fn status_strip<'a, Message>(current: TaskStatus) -> Element<'a, Message>
where
    Message: 'a,
{
    row(TaskStatus::ALL.into_iter().map(|step| {
        container(text(step.label()))
            .style(status_style(current, step))
            .padding(6)
            .into()
    }))
    .spacing(4)
    .into()
}

pub fn layout<'a, Message>(
    sidebar: impl Into<Element<'a, Message>>,
    main_content: impl Into<Element<'a, Message>>,
    detail: impl Into<Element<'a, Message>>,
) -> Element<'a, Message>
where
    Message: 'a,
{
    container(row![
        container(sidebar.into())
            .height(iced::Length::Fill)
            .width(iced::Length::FillPortion(1))
            .padding(10),
        container(main_content.into())
            .height(iced::Length::Fill)
            .width(iced::Length::FillPortion(3))
            .padding(10),
        container(detail.into())
            .style(bordered_box)
            .height(iced::Length::Fill)
            .width(iced::Length::FillPortion(2))
            .padding(10),
    ])
    .center_x(iced::Length::Fill)
    .center_y(iced::Length::Fill)
    .into()
}
