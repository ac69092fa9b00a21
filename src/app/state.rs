use iced::Theme;
use iced_aw::date_picker::Date;
use chrono::Datelike;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::api::types::{
    Bill, BillingOverview, ClassInstance, ClassStatus, Course, Lead, LeadAuditLog, LeadStatus,
    Student, Teacher, Timetable, TimetablePayload, TimetableStatus,
};
use crate::api::ApiClient;
use crate::config::{load_config, theme_from_str};
use crate::kanban::LeadBoard;

pub const CONFIG_FILE: &str = "tutordesk.json";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

pub struct App {
    pub api: ApiClient,
    pub current_screen: Screen,
    pub theme: Theme,
    // One transient banner at a time; the sequence number keeps a stale
    // auto-dismiss from clearing a newer banner.
    pub notice: Option<Notice>,
    pub notice_seq: u64,
    pub date_picker_open: DatePickerOpen,
    // Directory data shared by several pick lists
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub courses: Vec<Course>,
    // Billing
    pub billing: Option<BillingOverview>,
    pub billing_year: i32,
    pub billing_month: u32,
    pub billing_custom_only: bool,
    pub expanded_month: Option<String>,
    pub show_mark_paid_modal: bool,
    pub paying_bill: Option<Bill>,
    pub paid_method: String,
    pub paid_date: Date,
    pub paid_reason: String,
    pub mark_paid_error: Option<String>,
    pub show_whatsapp_modal: bool,
    pub whatsapp_bill: Option<Bill>,
    pub whatsapp_phone_override: String,
    pub whatsapp_error: Option<String>,
    pub show_custom_bill_modal: bool,
    pub custom_bill_student: Option<Student>,
    pub custom_bill_amount: String,
    pub custom_bill_currency: String,
    pub custom_bill_description: String,
    pub custom_bill_error: Option<String>,
    // Timetables
    pub timetables: Vec<Timetable>,
    pub timetable_filter_text: String,
    pub show_timetable_modal: bool,
    pub editing_timetable: Option<Timetable>,
    pub timetable_student: Option<Student>,
    pub timetable_teacher: Option<Teacher>,
    pub timetable_course: Option<Course>,
    pub timetable_status: TimetableStatus,
    pub timetable_slots: Vec<SlotDraft>,
    pub timetable_student_tz: Option<Tz>,
    pub timetable_teacher_tz: Option<Tz>,
    pub student_tz_filter: String,
    pub teacher_tz_filter: String,
    pub timetable_offset_text: String,
    pub timetable_error: Option<String>,
    // Captured at submit so the save stores exactly what the conflict
    // check vetted, not the form as it stands when the check lands.
    pub pending_timetable_payload: Option<TimetablePayload>,
    pub show_generate_modal: bool,
    pub generating_timetable: Option<Timetable>,
    pub generate_from: Date,
    pub generate_to: Date,
    pub generate_error: Option<String>,
    // Classes
    pub classes: Vec<ClassInstance>,
    pub class_from_text: String,
    pub class_to_text: String,
    pub show_class_status_modal: bool,
    pub editing_class: Option<ClassInstance>,
    pub class_status_choice: ClassStatus,
    pub class_cancel_reason: String,
    pub class_status_error: Option<String>,
    // Leads
    pub lead_board: LeadBoard,
    pub lead_search: String,
    pub selected_lead: Option<Lead>,
    pub show_lead_history_modal: bool,
    pub lead_history: Vec<LeadAuditLog>,
    pub show_lead_modal: bool,
    pub editing_lead: Option<Lead>,
    pub lead_name: String,
    pub lead_phone: String,
    pub lead_assignee: String,
    pub lead_follow_up: String,
    pub lead_tags: String,
    pub lead_notes: String,
    pub lead_status_choice: LeadStatus,
    pub lead_error: Option<String>,
    // Students
    pub student_filter_text: String,
    pub show_student_modal: bool,
    pub editing_student: Option<Student>,
    pub student_name: String,
    pub student_phone: String,
    pub student_email: String,
    pub student_country: String,
    pub student_tz: Option<Tz>,
    pub student_form_tz_filter: String,
    pub student_error: Option<String>,
    // Settings
    pub api_base_url_input: String,
}

impl Default for App {
    fn default() -> Self {
        let config = load_config().unwrap_or_default();
        let theme = theme_from_str(&config.theme_name).unwrap_or(Theme::Dark);
        let today = chrono::Local::now();
        Self {
            api: ApiClient::new(&config.api_base_url),
            current_screen: Default::default(),
            theme,
            notice: None,
            notice_seq: 0,
            date_picker_open: DatePickerOpen::Closed,
            students: vec![],
            teachers: vec![],
            courses: vec![],
            billing: None,
            billing_year: today.year(),
            billing_month: today.month(),
            billing_custom_only: false,
            expanded_month: None,
            show_mark_paid_modal: false,
            paying_bill: None,
            paid_method: "Cash".to_string(),
            paid_date: Date::today(),
            paid_reason: "".to_string(),
            mark_paid_error: None,
            show_whatsapp_modal: false,
            whatsapp_bill: None,
            whatsapp_phone_override: "".to_string(),
            whatsapp_error: None,
            show_custom_bill_modal: false,
            custom_bill_student: None,
            custom_bill_amount: "".to_string(),
            custom_bill_currency: "USD".to_string(),
            custom_bill_description: "".to_string(),
            custom_bill_error: None,
            timetables: vec![],
            timetable_filter_text: "".to_string(),
            show_timetable_modal: false,
            editing_timetable: None,
            timetable_student: None,
            timetable_teacher: None,
            timetable_course: None,
            timetable_status: TimetableStatus::Active,
            timetable_slots: vec![],
            timetable_student_tz: None,
            timetable_teacher_tz: None,
            student_tz_filter: "".to_string(),
            teacher_tz_filter: "".to_string(),
            timetable_offset_text: "0".to_string(),
            timetable_error: None,
            pending_timetable_payload: None,
            show_generate_modal: false,
            generating_timetable: None,
            generate_from: Date::today(),
            generate_to: Date::today(),
            generate_error: None,
            classes: vec![],
            class_from_text: "".to_string(),
            class_to_text: "".to_string(),
            show_class_status_modal: false,
            editing_class: None,
            class_status_choice: ClassStatus::Pending,
            class_cancel_reason: "".to_string(),
            class_status_error: None,
            lead_board: LeadBoard::new(),
            lead_search: "".to_string(),
            selected_lead: None,
            show_lead_history_modal: false,
            lead_history: vec![],
            show_lead_modal: false,
            editing_lead: None,
            lead_name: "".to_string(),
            lead_phone: "".to_string(),
            lead_assignee: "".to_string(),
            lead_follow_up: "".to_string(),
            lead_tags: "".to_string(),
            lead_notes: "".to_string(),
            lead_status_choice: LeadStatus::NewLead,
            lead_error: None,
            student_filter_text: "".to_string(),
            show_student_modal: false,
            editing_student: None,
            student_name: "".to_string(),
            student_phone: "".to_string(),
            student_email: "".to_string(),
            student_country: "".to_string(),
            student_tz: None,
            student_form_tz_filter: "".to_string(),
            student_error: None,
            api_base_url_input: config.api_base_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Which of the date pickers is currently popped open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePickerOpen {
    #[default]
    Closed,
    PaidDate,
    GenerateFrom,
    GenerateTo,
}

/// One editable row of the timetable form's slot editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotDraft {
    pub day: Option<u8>,
    pub start: String,
    pub end: String,
}

#[derive(Serialize, Deserialize)]
pub struct Config {
    pub theme_name: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme_name: "Dark".to_string(),
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

#[derive(PartialEq, Default)]
pub enum Screen {
    #[default]
    Billing,
    Timetables,
    Classes,
    Leads,
    Students,
    Settings,
}
