use iced::widget::{button, column, text, vertical_space, Container};
use iced::Length;
use iced_font_awesome::fa_icon_solid;

use crate::app::update::icon_button_content;
use crate::app::{App, Message};

pub fn nav_menu(app: &App) -> Container<Message> {
    let content = column![
        button(icon_button_content(
            fa_icon_solid("file-invoice-dollar").style(move |_| text::base(&app.theme)),
            "Billing"
        ))
        .on_press(Message::GoToBilling)
        .width(Length::Fill),
        button(icon_button_content(
            fa_icon_solid("calendar-days").style(move |_| text::base(&app.theme)),
            "Timetables"
        ))
        .on_press(Message::GoToTimetables)
        .width(Length::Fill),
        button(icon_button_content(
            fa_icon_solid("person-chalkboard").style(move |_| text::base(&app.theme)),
            "Classes"
        ))
        .on_press(Message::GoToClasses)
        .width(Length::Fill),
        button(icon_button_content(
            fa_icon_solid("filter").style(move |_| text::base(&app.theme)),
            "Leads"
        ))
        .on_press(Message::GoToLeads)
        .width(Length::Fill),
        button(icon_button_content(
            fa_icon_solid("user-graduate").style(move |_| text::base(&app.theme)),
            "Students"
        ))
        .on_press(Message::GoToStudents)
        .width(Length::Fill),
        vertical_space(),
        button(icon_button_content(
            fa_icon_solid("gear").style(move |_| text::base(&app.theme)),
            "Settings"
        ))
        .on_press(Message::GoToSettings)
        .width(Length::Fill),
    ]
    .spacing(10);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(10)
}
