pub mod billing;
pub mod classes;
pub mod leads;
pub mod nav_menu;
pub mod settings;
pub mod students;
pub mod timetables;

pub use billing::billing_screen;
pub use classes::classes_screen;
pub use leads::leads_screen;
pub use nav_menu::nav_menu;
pub use settings::settings_screen;
pub use students::students_screen;
pub use timetables::timetables_screen;
