use iced::widget::container::{background, bordered_box};
use iced::widget::{
    horizontal_space, mouse_area, pick_list, text, Button, Column, Container, Row, Scrollable,
    Stack, Text, TextInput,
};
use iced::{Alignment, Color, Length};
use iced_font_awesome::fa_icon_solid;

use crate::api::types::ClassStatus;
use crate::app::update::icon_button_content;
use crate::app::{App, Message};

pub fn classes_screen(app: &App) -> Container<Message> {
    let filter_row = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(Text::new("From"))
        .push(
            TextInput::new("YYYY-MM-DD", &app.class_from_text)
                .on_input(Message::ClassFromChanged)
                .width(Length::Fixed(130.0)),
        )
        .push(Text::new("To"))
        .push(
            TextInput::new("YYYY-MM-DD", &app.class_to_text)
                .on_input(Message::ClassToChanged)
                .width(Length::Fixed(130.0)),
        )
        .push(
            Button::new(icon_button_content(
                fa_icon_solid("magnifying-glass").style(move |_| text::base(&app.theme)),
                "Apply",
            ))
            .on_press(Message::ApplyClassFilter),
        );

    let header_section = Column::new()
        .spacing(15)
        .push(Text::new("Classes").size(30))
        .push(filter_row);

    let mut cards = Column::new().spacing(10);
    if app.classes.is_empty() {
        cards = cards.push(Text::new("No classes in this period."));
    }
    for class in &app.classes {
        let course = class
            .course_name
            .clone()
            .unwrap_or_else(|| format!("Class #{}", class.id));

        let header = Row::new()
            .spacing(10)
            .align_y(Alignment::Center)
            .push(Text::new(format!("{} {}-{}", class.date, class.start, class.end)).size(18))
            .push(Text::new(course))
            .push(horizontal_space())
            .push(Text::new(class.status.to_string()).color(status_color(class.status)))
            .push(
                Button::new(Text::new("Set status"))
                    .on_press(Message::StartClassStatus(class.clone())),
            );

        let mut info = Column::new().spacing(5);
        if let Some(student) = &class.student_name {
            info = info.push(Text::new(format!("Student: {student}")));
        }
        if let Some(teacher) = &class.teacher_name {
            info = info.push(Text::new(format!("Teacher: {teacher}")));
        }
        if let Some(reason) = &class.cancellation_reason {
            info = info.push(
                Text::new(format!("Reason: {reason}")).color(Color::from_rgb8(204, 36, 29)),
            );
        }

        cards = cards.push(
            Container::new(Column::new().spacing(5).push(header).push(info))
                .style(move |_| bordered_box(&app.theme))
                .padding(10)
                .width(Length::Fill),
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

    if app.show_class_status_modal {
        let status_picklist = pick_list(
            ClassStatus::ALL,
            Some(app.class_status_choice),
            Message::ClassStatusChoiceSelected,
        )
        .width(Length::Fill);

        let mut modal_content = Column::new()
            .spacing(10)
            .push(Text::new("Update class status").size(24))
            .push(status_picklist);

        if app.class_status_choice.requires_reason() {
            modal_content = modal_content.push(
                TextInput::new("Cancellation reason", &app.class_cancel_reason)
                    .on_input(Message::ClassCancelReasonChanged),
            );
        }

        modal_content = modal_content.push(
            Row::new()
                .spacing(10)
                .push(Button::new(Text::new("Cancel")).on_press(Message::CancelClassStatus))
                .push(Button::new(Text::new("Save")).on_press(Message::SubmitClassStatus)),
        );

        if let Some(error) = &app.class_status_error {
            modal_content = modal_content.push(Text::new(error.clone()));
        }

        let modal = Container::new(modal_content)
            .style(move |_| bordered_box(&app.theme))
            .padding(20)
            .width(Length::Fixed(400.0));

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

fn status_color(status: ClassStatus) -> Color {
    match status {
        ClassStatus::Pending => Color::from_rgb8(215, 153, 33),
        ClassStatus::Attended => Color::from_rgb8(104, 157, 106),
        ClassStatus::CancelledByStudent | ClassStatus::CancelledByTeacher => {
            Color::from_rgb8(204, 36, 29)
        }
        ClassStatus::AbsentStudent => Color::from_rgb8(177, 98, 134),
    }
}
