use iced::widget::container::{background, bordered_box};
use iced::widget::{
    button, horizontal_space, mouse_area, pick_list, text, Button, Column, Container, Row,
    Scrollable, Stack, Text, TextInput,
};
use iced::{Alignment, Color, Element, Length};
use iced_aw::date_picker;
use iced_aw::date_picker::Date;
use iced_font_awesome::fa_icon_solid;

use crate::api::types::{weekday_name, Timetable, TimetableStatus};
use crate::app::state::{DatePickerOpen, SlotDraft};
use crate::app::update::icon_button_content;
use crate::app::{App, Message};
use crate::timeoffset::{clamp_offset, shift_time};

pub fn timetables_screen(app: &App) -> Container<Message> {
    let add_button = Button::new(icon_button_content(
        fa_icon_solid("plus").style(move |_| text::base(&app.theme)),
        "Add timetable",
    ))
    .on_press(Message::ToggleTimetableModal)
    .padding(10);

    let filter_input = TextInput::new("Search by student, teacher or course", &app.timetable_filter_text)
        .on_input(Message::TimetableFilterChanged)
        .width(Length::Fixed(300.0));

    let header_section = Column::new()
        .spacing(15)
        .push(Text::new("Timetables").size(30))
        .push(
            Row::new()
                .spacing(10)
                .align_y(Alignment::Center)
                .push(filter_input)
                .push(add_button),
        );

    let needle = app.timetable_filter_text.trim().to_lowercase();
    let mut cards = Column::new().spacing(15);
    for timetable in app.timetables.iter().filter(|t| matches_filter(t, &needle)) {
        cards = cards.push(timetable_card(app, timetable));
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

    let with_form = if app.show_timetable_modal {
        Container::new(Stack::new().push(base).push(form_modal(app)))
    } else {
        base
    };

    if app.show_generate_modal {
        Container::new(Stack::new().push(with_form).push(generate_modal(app)))
    } else {
        with_form
    }
}

fn matches_filter(timetable: &Timetable, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        &timetable.student_name,
        &timetable.teacher_name,
        &timetable.course_name,
    ]
    .iter()
    .any(|name| {
        name.as_deref()
            .is_some_and(|n| n.to_lowercase().contains(needle))
    })
}

fn timetable_card<'a>(app: &'a App, timetable: &'a Timetable) -> Container<'a, Message> {
    let student = timetable
        .student_name
        .clone()
        .unwrap_or_else(|| format!("Student #{}", timetable.student_id));
    let teacher = timetable
        .teacher_name
        .clone()
        .unwrap_or_else(|| format!("Teacher #{}", timetable.teacher_id));
    let course = timetable
        .course_name
        .clone()
        .unwrap_or_else(|| format!("Course #{}", timetable.course_id));

    let header = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(Text::new(format!("{student} with {teacher}")).size(18))
        .push(
            Text::new(timetable.status.to_string()).color(status_color(timetable.status)),
        )
        .push(horizontal_space())
        .push(
            Button::new(Text::new("Edit"))
                .on_press(Message::StartEditingTimetable(timetable.clone())),
        )
        .push(
            Button::new(Text::new("Generate classes"))
                .on_press(Message::StartGenerate(timetable.clone())),
        )
        .width(Length::Fill);

    let slots = timetable
        .time_slots
        .iter()
        .map(|s| format!("{} {}-{}", weekday_name(s.day), s.start, s.end))
        .collect::<Vec<_>>()
        .join(", ");

    let info = Column::new()
        .spacing(5)
        .push(Text::new(format!("Course: {course}")))
        .push(Text::new(format!("Slots: {slots}")))
        .push(Text::new(format!(
            "Timezones: {} / {}",
            timetable.student_timezone, timetable.teacher_timezone
        )))
        .push(Text::new(format!(
            "Offset: {} min",
            timetable.time_difference_minutes
        )));

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
    .padding(10)
}

fn form_modal(app: &App) -> Element<Message> {
    let title = if app.editing_timetable.is_some() {
        "Edit timetable"
    } else {
        "Add timetable"
    };

    let student_picklist = pick_list(
        app.students.clone(),
        app.timetable_student.as_ref(),
        |s| Message::TimetableStudentSelected(s),
    )
    .placeholder("Student")
    .width(Length::Fill);

    let teacher_picklist = pick_list(
        app.teachers.clone(),
        app.timetable_teacher.as_ref(),
        |t| Message::TimetableTeacherSelected(t),
    )
    .placeholder("Teacher")
    .width(Length::Fill);

    let course_picklist = pick_list(
        app.courses.clone(),
        app.timetable_course.as_ref(),
        |c| Message::TimetableCourseSelected(c),
    )
    .placeholder("Course")
    .width(Length::Fill);

    let status_picklist = pick_list(
        TimetableStatus::ALL,
        Some(app.timetable_status),
        Message::TimetableStatusSelected,
    )
    .width(Length::Fill);

    let offset = preview_offset(&app.timetable_offset_text);

    let mut slot_rows = Column::new().spacing(10);
    for (index, draft) in app.timetable_slots.iter().enumerate() {
        slot_rows = slot_rows.push(slot_row(app, index, draft, offset));
    }

    let add_slot_button = Button::new(icon_button_content(
        fa_icon_solid("plus").style(move |_| text::base(&app.theme)),
        "Add slot",
    ))
    .on_press(Message::AddSlotRow);

    let student_zones = filtered_zones(&app.student_tz_filter);
    let teacher_zones = filtered_zones(&app.teacher_tz_filter);

    let student_tz_row = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(
            TextInput::new("Filter", &app.student_tz_filter)
                .on_input(Message::TimetableStudentTzFilterChanged)
                .width(Length::Fixed(150.0)),
        )
        .push(
            pick_list(
                student_zones,
                app.timetable_student_tz,
                Message::TimetableStudentTzSelected,
            )
            .placeholder("Student timezone")
            .width(Length::Fill),
        );

    let teacher_tz_row = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(
            TextInput::new("Filter", &app.teacher_tz_filter)
                .on_input(Message::TimetableTeacherTzFilterChanged)
                .width(Length::Fixed(150.0)),
        )
        .push(
            pick_list(
                teacher_zones,
                app.timetable_teacher_tz,
                Message::TimetableTeacherTzSelected,
            )
            .placeholder("Teacher timezone")
            .width(Length::Fill),
        );

    let offset_row = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(Text::new("Offset (minutes)"))
        .push(
            TextInput::new("0", &app.timetable_offset_text)
                .on_input(Message::OffsetTextChanged)
                .width(Length::Fixed(80.0)),
        )
        .push(
            Button::new(Text::new("Recompute from timezones"))
                .on_press(Message::RecomputeOffset),
        );

    let mut modal_content = Column::new()
        .spacing(10)
        .push(Text::new(title).size(24))
        .push(student_picklist)
        .push(teacher_picklist)
        .push(course_picklist)
        .push(status_picklist)
        .push(Text::new("Weekly slots, teacher's local time").size(18))
        .push(slot_rows)
        .push(add_slot_button)
        .push(Text::new("Timezones").size(18))
        .push(student_tz_row)
        .push(teacher_tz_row)
        .push(offset_row)
        .push(
            Row::new()
                .spacing(10)
                .push(Button::new(Text::new("Cancel")).on_press(Message::CancelTimetableModal))
                .push(Button::new(Text::new("Save")).on_press(Message::SubmitTimetable)),
        );

    if let Some(error) = &app.timetable_error {
        modal_content = modal_content.push(Text::new(error.clone()));
    }

    let modal = Container::new(Scrollable::new(modal_content))
        .style(move |_| bordered_box(&app.theme))
        .padding(20)
        .width(Length::Fixed(600.0))
        .max_height(700.0);

    Container::new(
        mouse_area(Container::new(modal).center(Length::Fill).padding(40))
            .on_press(Message::NoOp),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .style(move |_| background(Color { r: 0.0, g: 0.0, b: 0.0, a: 0.7 }))
    .into()
}

fn slot_row<'a>(app: &'a App, index: usize, draft: &'a SlotDraft, offset: i32) -> Row<'a, Message> {
    let day_names: Vec<&'static str> = (1..=7).map(weekday_name).collect();
    let day_picklist = pick_list(day_names, draft.day.map(weekday_name), move |name| {
        Message::SlotDayChanged(index, name)
    })
    .placeholder("Day")
    .width(Length::Fixed(120.0));

    Row::new()
        .spacing(5)
        .align_y(Alignment::Center)
        .push(day_picklist)
        .push(
            TextInput::new("HH:MM", &draft.start)
                .on_input(move |v| Message::SlotStartChanged(index, v))
                .width(Length::Fixed(70.0)),
        )
        .push(Text::new("-"))
        .push(
            TextInput::new("HH:MM", &draft.end)
                .on_input(move |v| Message::SlotEndChanged(index, v))
                .width(Length::Fixed(70.0)),
        )
        .push(Text::new(student_preview(draft, offset)).size(13))
        .push(horizontal_space())
        .push(
            button(fa_icon_solid("xmark").style(move |_| text::base(&app.theme)))
                .on_press(Message::RemoveSlotRow(index)),
        )
}

/// Offset for the live slot previews: falls back to 0 while the field
/// is mid-edit and clamps like the submit path, so the preview matches
/// what saving would store.
fn preview_offset(text: &str) -> i32 {
    clamp_offset(text.trim().parse().unwrap_or(0))
}

/// What the slot looks like on the student's clock, using the offset
/// currently in the form.
fn student_preview(draft: &SlotDraft, offset: i32) -> String {
    let (Some(start), Some(end)) = (
        shift_time(draft.start.trim(), offset),
        shift_time(draft.end.trim(), offset),
    ) else {
        return String::new();
    };
    format!(
        "Student: {}{} - {}{}",
        start.0,
        day_marker(start.1),
        end.0,
        day_marker(end.1)
    )
}

fn day_marker(day_offset: i32) -> &'static str {
    match day_offset {
        0 => "",
        d if d > 0 => " (next day)",
        _ => " (prev. day)",
    }
}

fn filtered_zones(filter: &str) -> Vec<chrono_tz::Tz> {
    let needle = filter.trim().to_lowercase();
    chrono_tz::TZ_VARIANTS
        .iter()
        .filter(|z| needle.is_empty() || z.name().to_lowercase().contains(&needle))
        .copied()
        .collect()
}

fn generate_modal(app: &App) -> Element<Message> {
    let from_button = Button::new(icon_button_content(
        fa_icon_solid("calendar").style(move |_| text::base(&app.theme)),
        "From date",
    ))
    .on_press(Message::ChooseGenerateFrom);

    let to_button = Button::new(icon_button_content(
        fa_icon_solid("calendar").style(move |_| text::base(&app.theme)),
        "To date",
    ))
    .on_press(Message::ChooseGenerateTo);

    let from_picker = date_picker(
        matches!(app.date_picker_open, DatePickerOpen::GenerateFrom),
        app.generate_from,
        from_button,
        Message::CancelDatePicker,
        Message::SubmitGenerateFrom,
    );

    let to_picker = date_picker(
        matches!(app.date_picker_open, DatePickerOpen::GenerateTo),
        app.generate_to,
        to_button,
        Message::CancelDatePicker,
        Message::SubmitGenerateTo,
    );

    let mut modal_content = Column::new()
        .spacing(15)
        .push(Text::new("Generate classes").size(24))
        .push(
            Row::new()
                .spacing(5)
                .align_y(Alignment::Center)
                .push(from_picker)
                .push(Text::new(iso_date(app.generate_from))),
        )
        .push(
            Row::new()
                .spacing(5)
                .align_y(Alignment::Center)
                .push(to_picker)
                .push(Text::new(iso_date(app.generate_to))),
        )
        .push(
            Row::new()
                .spacing(10)
                .push(Button::new(Text::new("Cancel")).on_press(Message::CancelGenerate))
                .push(Button::new(Text::new("Generate")).on_press(Message::SubmitGenerate)),
        );

    if let Some(error) = &app.generate_error {
        modal_content = modal_content.push(Text::new(error.clone()));
    }

    let modal = Container::new(modal_content)
        .style(move |_| bordered_box(&app.theme))
        .padding(20)
        .width(Length::Fixed(450.0));

    Container::new(
        mouse_area(Container::new(modal).center(Length::Fill).padding(40))
            .on_press(Message::NoOp),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .style(move |_| background(Color { r: 0.0, g: 0.0, b: 0.0, a: 0.7 }))
    .into()
}

fn iso_date(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year, date.month, date.day)
}

fn status_color(status: TimetableStatus) -> Color {
    match status {
        TimetableStatus::Active => Color::from_rgb8(104, 157, 106),
        TimetableStatus::Paused => Color::from_rgb8(215, 153, 33),
        TimetableStatus::Stopped => Color::from_rgb8(204, 36, 29),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_offset_clamps_to_twelve_hours() {
        assert_eq!(preview_offset("90"), 90);
        assert_eq!(preview_offset(" -120 "), -120);
        assert_eq!(preview_offset("7200"), 720);
        assert_eq!(preview_offset("-100000"), -720);
        assert_eq!(preview_offset("2147483647"), 720);
    }

    #[test]
    fn preview_offset_ignores_unfinished_input() {
        assert_eq!(preview_offset(""), 0);
        assert_eq!(preview_offset("-"), 0);
        assert_eq!(preview_offset("12a"), 0);
    }

    #[test]
    fn preview_shows_the_time_the_clamped_offset_produces() {
        let draft = SlotDraft {
            day: Some(1),
            start: "10:00".to_string(),
            end: "11:00".to_string(),
        };
        // 7200 clamps to 720, a plain twelve-hour shift.
        let shown = student_preview(&draft, preview_offset("7200"));
        assert_eq!(shown, "Student: 22:00 - 23:00");
    }
}
