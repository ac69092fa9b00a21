mod api;
mod app;
mod config;
mod conflict;
mod kanban;
mod screens;
mod timeoffset;

use app::App;

fn main() -> iced::Result {
    env_logger::init();
    iced::application("TutorDesk", App::update, App::view)
        .theme(|app: &App| app.theme.clone())
        .subscription(App::subscription)
        .window_size(iced::Size::new(1400.0, 800.0))
        .run_with(App::new)
}
