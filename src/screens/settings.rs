use iced::widget::{button, column, pick_list, text, Container, Row, TextInput};
use iced::{Center, Length, Theme};
use iced_font_awesome::fa_icon_solid;

use crate::app::update::icon_button_content;
use crate::app::{App, Message};
use crate::config::theme_to_str;

pub fn settings_screen(app: &App) -> Container<Message> {
    let current_name = theme_to_str(&app.theme);
    let theme_names: Vec<&'static str> = Theme::ALL.iter().map(theme_to_str).collect();

    let theme_row = Row::new()
        .spacing(10)
        .align_y(Center)
        .push(text("Theme"))
        .push(pick_list(theme_names, Some(current_name), Message::ThemeSelected));

    let api_row = Row::new()
        .spacing(10)
        .align_y(Center)
        .push(text("API base URL"))
        .push(
            TextInput::new("http://localhost:8000/api", &app.api_base_url_input)
                .on_input(Message::ApiBaseUrlChanged)
                .width(Length::Fixed(400.0)),
        );

    let save_button = button(icon_button_content(
        fa_icon_solid("floppy-disk").style(move |_| text::base(&app.theme)),
        "Save",
    ))
    .on_press(Message::SaveSettings);

    let content = column![
        text("Settings").size(30),
        theme_row,
        api_row,
        save_button,
    ]
    .spacing(15)
    .align_x(Center);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(40)
}
