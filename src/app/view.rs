use iced::widget::container::background;
use iced::widget::{mouse_area, text, Column, Container, Row};
use iced::{Color, Element, Length};

use crate::app::state::{Notice, NoticeKind, Screen};
use crate::screens::{
    billing_screen, classes_screen, leads_screen, nav_menu, settings_screen, students_screen,
    timetables_screen,
};
use super::{App, Message};

impl App {
    pub fn view(&self) -> Row<Message> {
        let screen = match &self.current_screen {
            Screen::Billing => billing_screen(self),
            Screen::Timetables => timetables_screen(self),
            Screen::Classes => classes_screen(self),
            Screen::Leads => leads_screen(self),
            Screen::Students => students_screen(self),
            Screen::Settings => settings_screen(self),
        };

        let mut content = Column::new().spacing(10);
        if let Some(notice) = &self.notice {
            content = content.push(notice_banner(notice));
        }
        content = content.push(screen.width(Length::Fill).height(Length::Fill));

        Row::new()
            .spacing(20)
            .push(
                Container::new(nav_menu(self))
                    .width(Length::Fixed(200.0))
                    .height(Length::Fill)
                    .padding(10),
            )
            .push(content.width(Length::Fill))
            .into()
    }
}

// Click anywhere on the banner to dismiss it early.
fn notice_banner(notice: &Notice) -> Element<Message> {
    let color = match notice.kind {
        NoticeKind::Info => Color {
            r: 0.15,
            g: 0.45,
            b: 0.25,
            a: 0.9,
        },
        NoticeKind::Error => Color {
            r: 0.55,
            g: 0.15,
            b: 0.15,
            a: 0.9,
        },
    };
    mouse_area(
        Container::new(text(notice.text.clone()).color(Color::WHITE))
            .width(Length::Fill)
            .padding(10)
            .style(move |_| background(color)),
    )
    .on_press(Message::DismissNotice)
    .into()
}
