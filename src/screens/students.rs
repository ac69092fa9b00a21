use iced::widget::container::{background, bordered_box};
use iced::widget::{
    button, horizontal_space, mouse_area, pick_list, text, Button, Column, Container, Row,
    Scrollable, Stack, Text, TextInput,
};
use iced::{Alignment, Color, Length};
use iced_font_awesome::fa_icon_solid;

use crate::api::types::Student;
use crate::app::update::icon_button_content;
use crate::app::{App, Message};

pub fn students_screen(app: &App) -> Container<Message> {
    let add_button = Button::new(icon_button_content(
        fa_icon_solid("plus").style(move |_| text::base(&app.theme)),
        "Add student",
    ))
    .on_press(Message::ToggleStudentModal)
    .padding(10);

    let filter_input = TextInput::new("Search by name, email or phone", &app.student_filter_text)
        .on_input(Message::StudentFilterChanged)
        .width(Length::Fixed(300.0));

    let header_section = Column::new()
        .spacing(15)
        .push(Text::new("Students").size(30))
        .push(
            Row::new()
                .spacing(10)
                .align_y(Alignment::Center)
                .push(filter_input)
                .push(add_button),
        );

    let needle = app.student_filter_text.trim().to_lowercase();
    let mut cards = Column::new().spacing(15);
    for student in app.students.iter().filter(|s| matches_filter(s, &needle)) {
        let header = Row::new()
            .spacing(10)
            .push(Text::new(student.name.clone()).size(18))
            .push(horizontal_space())
            .push(
                Button::new(Text::new("Edit"))
                    .on_press(Message::StartEditingStudent(student.clone())),
            )
            .push(
                button(fa_icon_solid("xmark").style(move |_| text::base(&app.theme)))
                    .on_press(Message::DeleteStudent(student.id)),
            )
            .width(Length::Fill);

        let mut info = Column::new().spacing(5);
        if let Some(phone) = &student.phone {
            info = info.push(Text::new(format!("Phone: {phone}")));
        }
        if let Some(email) = &student.email {
            info = info.push(Text::new(format!("Email: {email}")));
        }
        if let Some(country) = &student.country {
            info = info.push(Text::new(format!("Country: {country}")));
        }
        info = info.push(Text::new(format!(
            "Timezone: {}",
            student.timezone.as_deref().unwrap_or("not set")
        )));

        cards = cards.push(
            Container::new(
                Column::new()
                    .push(
                        Container::new(header)
                            .style(move |_| bordered_box(&app.theme))
                            .padding(10),
                    )
                    .push(Container::new(info).padding(10)),
            )
            .style(move |_| bordered_box(&app.theme))
            .width(Length::Fill)
            .padding(10),
        );
    }

    let base = Container::new(
        Column::new()
            .spacing(15)
            .padding(20)
            .push(header_section)
            .push(Scrollable::new(cards).height(Length::Fill)),
    )
    .width(Length::Fill)
    .height(Length::Fill);

    if app.show_student_modal {
        let title = if app.editing_student.is_some() {
            "Edit student"
        } else {
            "Add student"
        };

        let tz_needle = app.student_form_tz_filter.trim().to_lowercase();
        let zones: Vec<chrono_tz::Tz> = chrono_tz::TZ_VARIANTS
            .iter()
            .filter(|z| tz_needle.is_empty() || z.name().to_lowercase().contains(&tz_needle))
            .copied()
            .collect();

        let mut modal_content = Column::new()
            .spacing(10)
            .push(Text::new(title).size(24))
            .push(
                TextInput::new("Name", &app.student_name).on_input(Message::StudentNameChanged),
            )
            .push(
                TextInput::new("Phone", &app.student_phone).on_input(Message::StudentPhoneChanged),
            )
            .push(
                TextInput::new("Email", &app.student_email).on_input(Message::StudentEmailChanged),
            )
            .push(
                TextInput::new("Country", &app.student_country)
                    .on_input(Message::StudentCountryChanged),
            )
            .push(
                TextInput::new("Filter timezones", &app.student_form_tz_filter)
                    .on_input(Message::StudentTzFilterChanged),
            )
            .push(
                pick_list(zones, app.student_tz, Message::StudentTzSelected)
                    .placeholder("Timezone")
                    .width(Length::Fill),
            )
            .push(
                Row::new()
                    .spacing(10)
                    .push(Button::new(Text::new("Cancel")).on_press(Message::CancelStudentModal))
                    .push(Button::new(Text::new("Save")).on_press(Message::SubmitStudent)),
            );

        if let Some(error) = &app.student_error {
            modal_content = modal_content.push(Text::new(error.clone()));
        }

        let modal = Container::new(modal_content)
            .style(move |_| bordered_box(&app.theme))
            .padding(20)
            .width(Length::Fixed(450.0));

        let modal_overlay = Container::new(
            mouse_area(Container::new(modal).center(Length::Fill).padding(40))
                .on_press(Message::NoOp),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_| background(Color { r: 0.0, g: 0.0, b: 0.0, a: 0.7 }));

        Container::new(Stack::new().push(base).push(modal_overlay))
    } else {
        base
    }
}

fn matches_filter(student: &Student, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    student.name.to_lowercase().contains(needle)
        || student
            .email
            .as_deref()
            .is_some_and(|e| e.to_lowercase().contains(needle))
        || student
            .phone
            .as_deref()
            .is_some_and(|p| p.to_lowercase().contains(needle))
}
