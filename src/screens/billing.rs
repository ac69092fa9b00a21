use std::collections::HashMap;

use iced::widget::container::{background, bordered_box};
use iced::widget::{
    button, checkbox, horizontal_space, mouse_area, pick_list, text, Button, Column, Container,
    Row, Scrollable, Stack, Text, TextInput,
};
use iced::{Alignment, Color, Element, Length};
use iced_aw::date_picker;
use iced_font_awesome::fa_icon_solid;

use crate::api::types::{Bill, BillStatus, BucketStats, MonthBucket};
use crate::app::state::DatePickerOpen;
use crate::app::update::icon_button_content;
use crate::app::{App, Message};

pub fn billing_screen(app: &App) -> Container<Message> {
    let prev_button = button(fa_icon_solid("chevron-left").style(move |_| text::base(&app.theme)))
        .on_press(Message::PrevBillingMonth);
    let next_button = button(fa_icon_solid("chevron-right").style(move |_| text::base(&app.theme)))
        .on_press(Message::NextBillingMonth);

    let month_label = Text::new(format!(
        "{} {}",
        month_name(app.billing_month),
        app.billing_year
    ))
    .size(20);

    let custom_bill_button = Button::new(icon_button_content(
        fa_icon_solid("plus").style(move |_| text::base(&app.theme)),
        "Custom bill",
    ))
    .on_press(Message::ToggleCustomBillModal)
    .padding(10);

    let filter_row = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(prev_button)
        .push(month_label)
        .push(next_button)
        .push(
            checkbox("Custom bills only", app.billing_custom_only)
                .on_toggle(Message::BillingCustomOnlyToggled),
        )
        .push(horizontal_space())
        .push(custom_bill_button);

    let header_section = Column::new()
        .spacing(15)
        .push(Text::new("Billing").size(30))
        .push(filter_row);

    let mut body = Column::new().spacing(15);
    match &app.billing {
        None => {
            body = body.push(Text::new("Loading bills..."));
        }
        Some(overview) => {
            let stats_row = Row::new()
                .spacing(10)
                .push(stat_card(app, "Due", &overview.statistics.due))
                .push(stat_card(app, "Paid", &overview.statistics.paid))
                .push(stat_card(app, "Unpaid", &overview.statistics.unpaid));
            body = body.push(stats_row);

            let mut buckets: Vec<(&String, &MonthBucket)> = overview.bills.iter().collect();
            buckets.sort_by(|a, b| b.0.cmp(a.0));
            if buckets.is_empty() {
                body = body.push(Text::new("No bills for this period."));
            }

            let mut bucket_list = Column::new().spacing(10);
            for (key, bucket) in buckets {
                bucket_list = bucket_list.push(month_bucket(app, key, bucket));
            }
            body = body.push(Scrollable::new(bucket_list).height(Length::Fill));
        }
    }

    let base = Container::new(
        Column::new()
            .spacing(15)
            .padding(20)
            .push(header_section)
            .push(body),
    )
    .width(Length::Fill)
    .height(Length::Fill);

    let step1 = if app.show_mark_paid_modal {
        Container::new(Stack::new().push(base).push(mark_paid_modal(app)))
    } else {
        base
    };
    let step2 = if app.show_whatsapp_modal {
        Container::new(Stack::new().push(step1).push(whatsapp_modal(app)))
    } else {
        step1
    };
    if app.show_custom_bill_modal {
        Container::new(Stack::new().push(step2).push(custom_bill_modal(app)))
    } else {
        step2
    }
}

fn stat_card<'a>(app: &'a App, label: &'a str, stats: &BucketStats) -> Container<'a, Message> {
    Container::new(
        Column::new()
            .spacing(5)
            .push(Text::new(label).size(16))
            .push(Text::new(format_money_map(&stats.total)).size(22))
            .push(Text::new(format_bill_count(stats.count)).size(13)),
    )
    .style(move |_| bordered_box(&app.theme))
    .padding(15)
    .width(Length::Fill)
}

fn month_bucket<'a>(app: &'a App, key: &'a str, bucket: &'a MonthBucket) -> Column<'a, Message> {
    let expanded = app.expanded_month.as_deref() == Some(key);
    let chevron = if expanded {
        "chevron-down"
    } else {
        "chevron-right"
    };

    let header = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(fa_icon_solid(chevron).style(move |_| text::base(&app.theme)))
        .push(Text::new(month_title(key)).size(18))
        .push(horizontal_space())
        .push(Text::new(format_bill_count(bucket.bills.len() as u32)).size(14));

    let mut column = Column::new().spacing(5).push(
        mouse_area(
            Container::new(header)
                .style(move |_| bordered_box(&app.theme))
                .padding(10)
                .width(Length::Fill),
        )
        .on_press(Message::ToggleMonthExpanded(key.to_string())),
    );

    if expanded {
        let mut rows = Column::new().spacing(5);
        for bill in &bucket.bills {
            rows = rows.push(bill_row(app, bill));
        }
        column = column.push(Container::new(rows).padding([0, 20]));
    }

    column
}

fn bill_row<'a>(app: &'a App, bill: &'a Bill) -> Container<'a, Message> {
    let name = bill.student_name.clone().unwrap_or_else(|| {
        bill.description
            .clone()
            .unwrap_or_else(|| format!("Bill #{}", bill.id))
    });

    let mut row = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(Text::new(name))
        .push(Text::new(format_amount(&bill.currency, bill.amount)))
        .push(Text::new(bill.status.to_string()).color(bill_status_color(bill.status)));
    if bill.is_custom {
        row = row.push(Text::new("custom").size(12));
    }
    row = row.push(horizontal_space());

    if bill.status == BillStatus::Paid {
        if let Some(date) = &bill.payment_date {
            let method = bill.payment_method.as_deref().unwrap_or("paid");
            row = row.push(Text::new(format!("{method} on {date}")).size(13));
        }
    } else {
        row = row
            .push(
                Button::new(Text::new("Mark paid"))
                    .on_press(Message::StartMarkPaid(bill.clone())),
            )
            .push(
                Button::new(icon_button_content(
                    fa_icon_solid("paper-plane").style(move |_| text::base(&app.theme)),
                    "WhatsApp",
                ))
                .on_press(Message::StartWhatsApp(bill.clone())),
            );
    }

    Container::new(row)
        .style(move |_| bordered_box(&app.theme))
        .padding(10)
        .width(Length::Fill)
}

fn mark_paid_modal(app: &App) -> Element<Message> {
    let methods = vec![
        "Cash".to_string(),
        "Bank transfer".to_string(),
        "Card".to_string(),
    ];
    let method_picklist = pick_list(
        methods,
        Some(app.paid_method.clone()),
        Message::PaidMethodChanged,
    )
    .width(Length::Fill);

    let date_button = Button::new(icon_button_content(
        fa_icon_solid("calendar").style(move |_| text::base(&app.theme)),
        "Payment date",
    ))
    .on_press(Message::ChoosePaidDate);

    let paid_date_picker = date_picker(
        matches!(app.date_picker_open, DatePickerOpen::PaidDate),
        app.paid_date,
        date_button,
        Message::CancelDatePicker,
        Message::SubmitPaidDate,
    );

    let date_display = Text::new(format!(
        "{:04}-{:02}-{:02}",
        app.paid_date.year, app.paid_date.month, app.paid_date.day
    ));

    let bill_line = app
        .paying_bill
        .as_ref()
        .map(|b| format!("{} {}", format_amount(&b.currency, b.amount), b.student_name.clone().unwrap_or_default()))
        .unwrap_or_default();

    let mut modal_content = Column::new()
        .spacing(15)
        .push(Text::new("Mark bill as paid").size(24))
        .push(Text::new(bill_line))
        .push(method_picklist)
        .push(
            Row::new()
                .spacing(5)
                .align_y(Alignment::Center)
                .push(paid_date_picker)
                .push(date_display),
        )
        .push(
            TextInput::new("Reason (optional)", &app.paid_reason)
                .on_input(Message::PaidReasonChanged),
        )
        .push(
            Row::new()
                .spacing(10)
                .push(Button::new(Text::new("Cancel")).on_press(Message::CancelMarkPaid))
                .push(Button::new(Text::new("Save")).on_press(Message::SubmitMarkPaid)),
        );

    if let Some(error) = &app.mark_paid_error {
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

fn whatsapp_modal(app: &App) -> Element<Message> {
    let mut modal_content = Column::new()
        .spacing(15)
        .push(Text::new("Send bill via WhatsApp").size(24))
        .push(Text::new("Leave the phone empty to use the student's number."))
        .push(
            TextInput::new("Override phone", &app.whatsapp_phone_override)
                .on_input(Message::WhatsAppPhoneChanged),
        )
        .push(
            Row::new()
                .spacing(10)
                .push(Button::new(Text::new("Cancel")).on_press(Message::CancelWhatsApp))
                .push(Button::new(Text::new("Send")).on_press(Message::SubmitWhatsApp)),
        );

    if let Some(error) = &app.whatsapp_error {
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

fn custom_bill_modal(app: &App) -> Element<Message> {
    let currencies = vec!["USD".to_string(), "EUR".to_string(), "GBP".to_string()];

    let student_row = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(
            pick_list(
                app.students.clone(),
                app.custom_bill_student.as_ref(),
                |s| Message::CustomBillStudentSelected(s),
            )
            .placeholder("Link to a student (optional)")
            .width(Length::Fill),
        )
        .push(
            button(fa_icon_solid("xmark").style(move |_| text::base(&app.theme)))
                .on_press(Message::ClearCustomBillStudent),
        );

    let mut modal_content = Column::new()
        .spacing(10)
        .push(Text::new("Custom bill").size(24))
        .push(student_row)
        .push(
            TextInput::new("Amount", &app.custom_bill_amount)
                .on_input(Message::CustomBillAmountChanged),
        )
        .push(
            pick_list(
                currencies,
                Some(app.custom_bill_currency.clone()),
                Message::CustomBillCurrencySelected,
            )
            .width(Length::Fill),
        )
        .push(
            TextInput::new("Description", &app.custom_bill_description)
                .on_input(Message::CustomBillDescriptionChanged),
        )
        .push(
            Row::new()
                .spacing(10)
                .push(Button::new(Text::new("Cancel")).on_press(Message::ToggleCustomBillModal))
                .push(Button::new(Text::new("Create")).on_press(Message::SubmitCustomBill)),
        );

    if let Some(error) = &app.custom_bill_error {
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

fn bill_status_color(status: BillStatus) -> Color {
    match status {
        BillStatus::Pending => Color::from_rgb8(215, 153, 33),
        BillStatus::Sent => Color::from_rgb8(69, 133, 136),
        BillStatus::Paid => Color::from_rgb8(104, 157, 106),
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "?",
    }
}

/// "2026-08" keys come back from the API, the header shows them as
/// "August 2026".
fn month_title(key: &str) -> String {
    if let Some((year, month)) = key.split_once('-') {
        if let Ok(m) = month.parse::<u32>() {
            return format!("{} {}", month_name(m), year);
        }
    }
    key.to_string()
}

fn format_amount(currency: &str, amount: f64) -> String {
    match currency {
        "USD" => format!("${amount:.2}"),
        "EUR" => format!("\u{20ac}{amount:.2}"),
        "GBP" => format!("\u{a3}{amount:.2}"),
        _ => format!("{amount:.2} {currency}"),
    }
}

fn format_money_map(totals: &HashMap<String, f64>) -> String {
    if totals.is_empty() {
        return "0.00".to_string();
    }
    let mut entries: Vec<(&String, &f64)> = totals.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
        .iter()
        .map(|(currency, amount)| format_amount(currency, **amount))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_bill_count(count: u32) -> String {
    if count == 1 {
        "1 bill".to_string()
    } else {
        format!("{count} bills")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_map_formats_known_currency_symbols() {
        let mut totals = HashMap::new();
        totals.insert("USD".to_string(), 150.0);
        assert_eq!(format_money_map(&totals), "$150.00");
    }

    #[test]
    fn money_map_joins_currencies_in_stable_order() {
        let mut totals = HashMap::new();
        totals.insert("USD".to_string(), 10.0);
        totals.insert("EUR".to_string(), 20.5);
        assert_eq!(format_money_map(&totals), "\u{20ac}20.50, $10.00");
    }

    #[test]
    fn empty_money_map_renders_zero() {
        assert_eq!(format_money_map(&HashMap::new()), "0.00");
    }

    #[test]
    fn unknown_currency_keeps_its_code() {
        let mut totals = HashMap::new();
        totals.insert("EGP".to_string(), 99.9);
        assert_eq!(format_money_map(&totals), "99.90 EGP");
    }

    #[test]
    fn bill_count_pluralises() {
        assert_eq!(format_bill_count(0), "0 bills");
        assert_eq!(format_bill_count(1), "1 bill");
        assert_eq!(format_bill_count(2), "2 bills");
    }

    #[test]
    fn month_titles_come_from_bucket_keys() {
        assert_eq!(month_title("2026-08"), "August 2026");
        assert_eq!(month_title("2025-12"), "December 2025");
        assert_eq!(month_title("garbage"), "garbage");
    }
}
