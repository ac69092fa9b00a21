use iced::widget::container::{background, bordered_box};
use iced::widget::scrollable::{Direction, Scrollbar};
use iced::widget::{
    horizontal_space, mouse_area, pick_list, text, Button, Column, Container, Row, Scrollable,
    Stack, Text, TextInput,
};
use iced::{Alignment, Color, Element, Length};
use iced_font_awesome::fa_icon_solid;

use crate::api::types::{Lead, LeadStatus};
use crate::app::update::icon_button_content;
use crate::app::{App, Message};

pub fn leads_screen(app: &App) -> Container<Message> {
    let search_input = TextInput::new("Search leads", &app.lead_search)
        .on_input(Message::LeadSearchChanged)
        .on_submit(Message::SearchLeads)
        .width(Length::Fixed(250.0));

    let search_button = Button::new(icon_button_content(
        fa_icon_solid("magnifying-glass").style(move |_| text::base(&app.theme)),
        "Search",
    ))
    .on_press(Message::SearchLeads);

    let refresh_button = Button::new(icon_button_content(
        fa_icon_solid("rotate").style(move |_| text::base(&app.theme)),
        "Refresh",
    ))
    .on_press(Message::RefreshLeads);

    let add_button = Button::new(icon_button_content(
        fa_icon_solid("plus").style(move |_| text::base(&app.theme)),
        "Add lead",
    ))
    .on_press(Message::ToggleLeadModal);

    let header_section = Column::new()
        .spacing(15)
        .push(Text::new("Leads").size(30))
        .push(
            Row::new()
                .spacing(10)
                .align_y(Alignment::Center)
                .push(search_input)
                .push(search_button)
                .push(refresh_button)
                .push(add_button),
        );

    let mut board = Row::new().spacing(10);
    for status in LeadStatus::ALL {
        board = board.push(board_column(app, *status));
    }
    let board_scrollable = Scrollable::with_direction(board, Direction::Horizontal(Scrollbar::new()))
        .width(Length::Fill)
        .height(Length::Fill);

    let mut layout = Row::new().spacing(10).push(board_scrollable);
    if let Some(lead) = &app.selected_lead {
        layout = layout.push(detail_panel(app, lead));
    }

    let base = Container::new(
        Column::new()
            .spacing(15)
            .padding(20)
            .push(header_section)
            .push(layout),
    )
    .width(Length::Fill)
    .height(Length::Fill);

    let with_form_modal = if app.show_lead_modal {
        Container::new(Stack::new().push(base).push(lead_form_modal(app)))
    } else {
        base
    };

    if app.show_lead_history_modal {
        Container::new(Stack::new().push(with_form_modal).push(history_modal(app)))
    } else {
        with_form_modal
    }
}

fn board_column(app: &App, status: LeadStatus) -> Container<Message> {
    let leads = app.lead_board.column(status);

    let mut cards = Column::new().spacing(10);
    for lead in leads {
        cards = cards.push(lead_card(app, lead));
    }

    let header = Text::new(format!("{} ({})", status, leads.len())).size(18);

    Container::new(
        Column::new()
            .spacing(10)
            .push(header)
            .push(Scrollable::new(cards).height(Length::Fill)),
    )
    .style(move |_| bordered_box(&app.theme))
    .padding(10)
    .width(Length::Fixed(260.0))
    .height(Length::Fill)
}

fn lead_card<'a>(app: &'a App, lead: &'a Lead) -> Element<'a, Message> {
    let id = lead.id;
    let move_picklist = pick_list(LeadStatus::ALL, Some(lead.status), move |status| {
        Message::LeadMoveRequested(id, status)
    })
    .text_size(12)
    .width(Length::Fill);

    let mut info = Column::new()
        .spacing(5)
        .push(Text::new(lead.name.clone()).size(16));
    if let Some(phone) = &lead.phone {
        info = info.push(Text::new(phone.clone()).size(13));
    }
    if let Some(assignee) = &lead.assignee {
        info = info.push(Text::new(format!("Assigned: {assignee}")).size(13));
    }
    if let Some(date) = &lead.follow_up_date {
        info = info.push(Text::new(format!("Follow up: {date}")).size(13));
    }
    if !lead.tags.is_empty() {
        info = info.push(Text::new(lead.tags.join(", ")).size(12));
    }
    info = info.push(move_picklist);

    mouse_area(
        Container::new(info)
            .style(move |_| bordered_box(&app.theme))
            .padding(10)
            .width(Length::Fill),
    )
    .on_press(Message::SelectLead(lead.clone()))
    .into()
}

fn detail_panel<'a>(app: &'a App, lead: &'a Lead) -> Container<'a, Message> {
    let header = Row::new()
        .spacing(10)
        .push(Text::new(lead.name.clone()).size(20))
        .push(horizontal_space())
        .push(
            Button::new(fa_icon_solid("xmark").style(move |_| text::base(&app.theme)))
                .on_press(Message::CloseLeadPanel),
        )
        .width(Length::Fill);

    let mut info = Column::new()
        .spacing(5)
        .push(Text::new(format!("Stage: {}", lead.status)));
    if let Some(phone) = &lead.phone {
        info = info.push(Text::new(format!("Phone: {phone}")));
    }
    if let Some(assignee) = &lead.assignee {
        info = info.push(Text::new(format!("Assigned: {assignee}")));
    }
    if let Some(date) = &lead.follow_up_date {
        info = info.push(Text::new(format!("Follow up: {date}")));
    }
    if !lead.tags.is_empty() {
        info = info.push(Text::new(format!("Tags: {}", lead.tags.join(", "))));
    }
    if let Some(notes) = &lead.notes {
        info = info.push(Text::new(format!("Notes: {notes}")));
    }
    if let Some(created) = &lead.created_at {
        info = info.push(Text::new(format!("Created: {created}")).size(13));
    }

    let actions = Row::new()
        .spacing(10)
        .push(
            Button::new(Text::new("Edit")).on_press(Message::StartEditingLead(lead.clone())),
        )
        .push(Button::new(Text::new("History")).on_press(Message::ShowLeadHistory(lead.id)))
        .push(Button::new(Text::new("Delete")).on_press(Message::DeleteLead(lead.id)));

    Container::new(
        Column::new()
            .spacing(15)
            .push(header)
            .push(info)
            .push(actions),
    )
    .style(move |_| bordered_box(&app.theme))
    .padding(15)
    .width(Length::Fixed(320.0))
    .height(Length::Fill)
}

fn lead_form_modal(app: &App) -> Element<Message> {
    let title = if app.editing_lead.is_some() {
        "Edit lead"
    } else {
        "Add lead"
    };

    let status_picklist = pick_list(
        LeadStatus::ALL,
        Some(app.lead_status_choice),
        Message::LeadStatusChoiceSelected,
    )
    .width(Length::Fill);

    let mut modal_content = Column::new()
        .spacing(10)
        .push(Text::new(title).size(24))
        .push(TextInput::new("Name", &app.lead_name).on_input(Message::LeadNameChanged))
        .push(TextInput::new("Phone", &app.lead_phone).on_input(Message::LeadPhoneChanged))
        .push(
            TextInput::new("Assigned to", &app.lead_assignee)
                .on_input(Message::LeadAssigneeChanged),
        )
        .push(
            TextInput::new("Follow-up date (YYYY-MM-DD)", &app.lead_follow_up)
                .on_input(Message::LeadFollowUpChanged),
        )
        .push(
            TextInput::new("Tags, comma separated", &app.lead_tags)
                .on_input(Message::LeadTagsChanged),
        )
        .push(TextInput::new("Notes", &app.lead_notes).on_input(Message::LeadNotesChanged))
        .push(status_picklist)
        .push(
            Row::new()
                .spacing(10)
                .push(Button::new(Text::new("Cancel")).on_press(Message::CancelLeadModal))
                .push(Button::new(Text::new("Save")).on_press(Message::SubmitLead)),
        );

    if let Some(error) = &app.lead_error {
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

fn history_modal(app: &App) -> Element<Message> {
    let mut entries = Column::new().spacing(10).width(Length::Fill);
    if app.lead_history.is_empty() {
        entries = entries.push(Text::new("No stage changes recorded."));
    }
    for entry in &app.lead_history {
        let line = match &entry.from_status {
            Some(from) => format!(
                "{} {} moved the lead from {} to {}",
                entry.timestamp, entry.actor, from, entry.to_status
            ),
            None => format!(
                "{} {} created the lead as {}",
                entry.timestamp, entry.actor, entry.to_status
            ),
        };
        entries = entries.push(
            Container::new(Text::new(line))
                .style(move |_| bordered_box(&app.theme))
                .padding(10)
                .width(Length::Fill),
        );
    }

    let modal_content = Column::new()
        .spacing(15)
        .push(Text::new("Stage history").size(24))
        .push(Scrollable::new(entries).height(Length::Fixed(350.0)))
        .push(Button::new(Text::new("Close")).on_press(Message::CloseLeadHistory));

    let modal = Container::new(modal_content)
        .style(move |_| bordered_box(&app.theme))
        .padding(20)
        .width(Length::Fixed(600.0));

    Container::new(
        mouse_area(Container::new(modal).center(Length::Fill).padding(40))
            .on_press(Message::NoOp),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .style(move |_| background(Color { r: 0.0, g: 0.0, b: 0.0, a: 0.7 }))
    .into()
}
