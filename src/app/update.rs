use std::time::Duration;

use iced::widget::{text, Row};
use iced::{Alignment, Element, Renderer, Subscription, Task, Theme};
use iced_aw::date_picker::Date;
use regex::Regex;

use crate::api::billing::BillingService;
use crate::api::classes::ClassService;
use crate::api::leads::LeadService;
use crate::api::people::DirectoryService;
use crate::api::timetables::TimetableService;
use crate::api::types::{
    cancellation_reason_for, weekday_name, ClassStatusRequest, Course, CustomBillRequest,
    GenerateRequest, LeadPayload, LeadStatus, MarkPaidRequest, Student, StudentPayload, Teacher,
    TimeSlot, TimetablePayload, TimetableStatus, WhatsAppRequest,
};
use crate::api::ApiError;
use crate::app::state::{DatePickerOpen, Notice, NoticeKind, Screen, SlotDraft};
use crate::config::{save_config, theme_from_str};
use crate::conflict;
use crate::kanban::LeadBoard;
use crate::timeoffset::{clamp_offset, format_hhmm, offset_between_zones, parse_hhmm};
use super::{App, Message};

const KANBAN_POLL_SECS: u64 = 30;
const NOTICE_SECS: u64 = 5;
const PHONE_PATTERN: &str = r"^\+?[\d() -]{7,20}$";
const ISO_DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let app = App::default();
        let initial = Task::batch(vec![app.load_directory(), app.load_billing()]);
        (app, initial)
    }

    /// Polls the lead board while it is on screen; everything else is
    /// fetched on demand.
    pub fn subscription(&self) -> Subscription<Message> {
        if self.current_screen == Screen::Leads {
            iced::time::every(Duration::from_secs(KANBAN_POLL_SECS)).map(|_| Message::PollLeads)
        } else {
            Subscription::none()
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::GoToBilling => {
                self.current_screen = Screen::Billing;
                self.load_billing()
            }
            Message::GoToTimetables => {
                self.current_screen = Screen::Timetables;
                Task::batch(vec![self.load_timetables(), self.load_directory()])
            }
            Message::GoToClasses => {
                self.current_screen = Screen::Classes;
                self.load_classes()
            }
            Message::GoToLeads => {
                self.current_screen = Screen::Leads;
                self.load_kanban(false)
            }
            Message::GoToStudents => {
                self.current_screen = Screen::Students;
                self.load_students()
            }
            Message::GoToSettings => {
                self.current_screen = Screen::Settings;
                self.api_base_url_input = self.api.base_url().to_string();
                Task::none()
            }
            Message::ThemeSelected(name) => {
                if let Some(theme) = theme_from_str(name) {
                    self.theme = theme;
                    if let Err(e) = save_config(&self.theme, self.api.base_url()) {
                        log::warn!("could not save config: {e}");
                    }
                }
                Task::none()
            }
            Message::ApiBaseUrlChanged(value) => {
                self.api_base_url_input = value;
                Task::none()
            }
            Message::SaveSettings => {
                let url = self.api_base_url_input.trim().to_string();
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return self.notify(
                        NoticeKind::Error,
                        "The API base URL must start with http:// or https://",
                    );
                }
                self.api = self.api.with_base_url(&url);
                if let Err(e) = save_config(&self.theme, &url) {
                    log::warn!("could not save config: {e}");
                }
                self.notify(NoticeKind::Info, "Settings saved")
            }
            Message::DismissNotice => {
                self.notice = None;
                Task::none()
            }
            Message::NoticeExpired(seq) => {
                if seq == self.notice_seq {
                    self.notice = None;
                }
                Task::none()
            }
            Message::DirectoryLoaded(result) => match result {
                Ok((students, teachers, courses)) => {
                    self.students = students;
                    self.teachers = teachers;
                    self.courses = courses;
                    Task::none()
                }
                Err(err) => self.report_error(&err),
            },
            // --- Billing ---
            Message::BillingLoaded(result) => match result {
                Ok(overview) => {
                    self.billing = Some(overview);
                    Task::none()
                }
                Err(err) => self.report_error(&err),
            },
            Message::PrevBillingMonth => {
                (self.billing_year, self.billing_month) =
                    previous_month(self.billing_year, self.billing_month);
                self.load_billing()
            }
            Message::NextBillingMonth => {
                (self.billing_year, self.billing_month) =
                    next_month(self.billing_year, self.billing_month);
                self.load_billing()
            }
            Message::BillingCustomOnlyToggled(value) => {
                self.billing_custom_only = value;
                self.load_billing()
            }
            Message::ToggleMonthExpanded(month_key) => {
                if self.expanded_month.as_deref() == Some(month_key.as_str()) {
                    self.expanded_month = None;
                } else {
                    self.expanded_month = Some(month_key);
                }
                Task::none()
            }
            Message::StartMarkPaid(bill) => {
                self.paying_bill = Some(bill);
                self.paid_method = "Cash".to_string();
                self.paid_date = Date::today();
                self.paid_reason.clear();
                self.mark_paid_error = None;
                self.show_mark_paid_modal = true;
                Task::none()
            }
            Message::CancelMarkPaid => {
                self.show_mark_paid_modal = false;
                self.paying_bill = None;
                self.date_picker_open = DatePickerOpen::Closed;
                Task::none()
            }
            Message::PaidMethodChanged(value) => {
                self.paid_method = value;
                Task::none()
            }
            Message::PaidReasonChanged(value) => {
                self.paid_reason = value;
                Task::none()
            }
            Message::SubmitMarkPaid => {
                let Some(bill) = &self.paying_bill else {
                    return Task::none();
                };
                let request = MarkPaidRequest {
                    payment_method: self.paid_method.clone(),
                    payment_date: date_to_iso(self.paid_date),
                    payment_reason: optional_text(&self.paid_reason),
                };
                let service = BillingService::new(&self.api);
                let bill_id = bill.id;
                Task::perform(
                    async move { service.mark_paid(bill_id, &request).await },
                    Message::BillMarkedPaid,
                )
            }
            Message::BillMarkedPaid(result) => match result {
                Ok(_) => {
                    self.show_mark_paid_modal = false;
                    self.paying_bill = None;
                    let toast = self.notify(NoticeKind::Info, "Bill marked as paid");
                    Task::batch(vec![toast, self.load_billing()])
                }
                Err(err) => {
                    self.mark_paid_error = Some(err.to_string());
                    Task::none()
                }
            },
            Message::StartWhatsApp(bill) => {
                self.whatsapp_bill = Some(bill);
                self.whatsapp_phone_override.clear();
                self.whatsapp_error = None;
                self.show_whatsapp_modal = true;
                Task::none()
            }
            Message::CancelWhatsApp => {
                self.show_whatsapp_modal = false;
                self.whatsapp_bill = None;
                Task::none()
            }
            Message::WhatsAppPhoneChanged(value) => {
                self.whatsapp_phone_override = value;
                Task::none()
            }
            Message::SubmitWhatsApp => {
                let Some(bill) = &self.whatsapp_bill else {
                    return Task::none();
                };
                let phone = self.whatsapp_phone_override.trim().to_string();
                let phone_re = Regex::new(PHONE_PATTERN).unwrap();
                if !phone.is_empty() && !phone_re.is_match(&phone) {
                    self.whatsapp_error = Some("That phone number does not look valid".to_string());
                    return Task::none();
                }
                let request = WhatsAppRequest {
                    phone_override: optional_text(&phone),
                };
                let service = BillingService::new(&self.api);
                let bill_id = bill.id;
                Task::perform(
                    async move { service.send_whatsapp(bill_id, &request).await },
                    Message::WhatsAppSent,
                )
            }
            Message::WhatsAppSent(result) => match result {
                Ok(confirmation) => {
                    self.show_whatsapp_modal = false;
                    self.whatsapp_bill = None;
                    self.notify(
                        NoticeKind::Info,
                        format!("WhatsApp message sent to {}", confirmation.recipient),
                    )
                }
                Err(err) => {
                    self.whatsapp_error = Some(err.to_string());
                    Task::none()
                }
            },
            Message::ToggleCustomBillModal => {
                if self.show_custom_bill_modal {
                    self.show_custom_bill_modal = false;
                } else {
                    self.reset_custom_bill_form();
                    self.show_custom_bill_modal = true;
                }
                Task::none()
            }
            Message::CustomBillStudentSelected(student) => {
                self.custom_bill_student = Some(student);
                Task::none()
            }
            Message::ClearCustomBillStudent => {
                self.custom_bill_student = None;
                Task::none()
            }
            Message::CustomBillAmountChanged(value) => {
                self.custom_bill_amount = value;
                Task::none()
            }
            Message::CustomBillCurrencySelected(value) => {
                self.custom_bill_currency = value;
                Task::none()
            }
            Message::CustomBillDescriptionChanged(value) => {
                self.custom_bill_description = value;
                Task::none()
            }
            Message::SubmitCustomBill => {
                let amount: f64 = match self.custom_bill_amount.trim().parse() {
                    Ok(v) => v,
                    Err(_) => {
                        self.custom_bill_error = Some("Amount must be a number".to_string());
                        return Task::none();
                    }
                };
                if amount <= 0.0 {
                    self.custom_bill_error = Some("Amount must be greater than zero".to_string());
                    return Task::none();
                }
                let description = self.custom_bill_description.trim().to_string();
                if description.is_empty() {
                    self.custom_bill_error = Some("A description is required".to_string());
                    return Task::none();
                }
                let request = CustomBillRequest {
                    student_id: self.custom_bill_student.as_ref().map(|s| s.id),
                    amount,
                    currency: self.custom_bill_currency.clone(),
                    description,
                };
                let service = BillingService::new(&self.api);
                Task::perform(
                    async move { service.create_custom(&request).await },
                    Message::CustomBillCreated,
                )
            }
            Message::CustomBillCreated(result) => match result {
                Ok(_) => {
                    self.show_custom_bill_modal = false;
                    let toast = self.notify(NoticeKind::Info, "Custom bill created");
                    Task::batch(vec![toast, self.load_billing()])
                }
                Err(err) => {
                    self.custom_bill_error = Some(err.to_string());
                    Task::none()
                }
            },
            // --- Date pickers ---
            Message::ChoosePaidDate => {
                self.date_picker_open = DatePickerOpen::PaidDate;
                Task::none()
            }
            Message::SubmitPaidDate(date) => {
                self.paid_date = date;
                self.date_picker_open = DatePickerOpen::Closed;
                Task::none()
            }
            Message::ChooseGenerateFrom => {
                self.date_picker_open = DatePickerOpen::GenerateFrom;
                Task::none()
            }
            Message::SubmitGenerateFrom(date) => {
                self.generate_from = date;
                self.date_picker_open = DatePickerOpen::Closed;
                Task::none()
            }
            Message::ChooseGenerateTo => {
                self.date_picker_open = DatePickerOpen::GenerateTo;
                Task::none()
            }
            Message::SubmitGenerateTo(date) => {
                self.generate_to = date;
                self.date_picker_open = DatePickerOpen::Closed;
                Task::none()
            }
            Message::CancelDatePicker => {
                self.date_picker_open = DatePickerOpen::Closed;
                Task::none()
            }
            // --- Timetables ---
            Message::TimetablesLoaded(result) => match result {
                Ok(timetables) => {
                    self.timetables = timetables;
                    Task::none()
                }
                Err(err) => self.report_error(&err),
            },
            Message::TimetableFilterChanged(value) => {
                self.timetable_filter_text = value;
                Task::none()
            }
            Message::ToggleTimetableModal => {
                if self.show_timetable_modal {
                    self.show_timetable_modal = false;
                    self.pending_timetable_payload = None;
                } else {
                    self.reset_timetable_form();
                    self.show_timetable_modal = true;
                }
                Task::none()
            }
            Message::StartEditingTimetable(timetable) => {
                self.reset_timetable_form();
                self.timetable_student = self
                    .students
                    .iter()
                    .find(|s| s.id == timetable.student_id)
                    .cloned()
                    .or_else(|| {
                        Some(Student {
                            id: timetable.student_id,
                            name: timetable
                                .student_name
                                .clone()
                                .unwrap_or_else(|| format!("Student #{}", timetable.student_id)),
                            phone: None,
                            email: None,
                            timezone: None,
                            country: None,
                        })
                    });
                self.timetable_teacher = self
                    .teachers
                    .iter()
                    .find(|t| t.id == timetable.teacher_id)
                    .cloned()
                    .or_else(|| {
                        Some(Teacher {
                            id: timetable.teacher_id,
                            name: timetable
                                .teacher_name
                                .clone()
                                .unwrap_or_else(|| format!("Teacher #{}", timetable.teacher_id)),
                            timezone: None,
                        })
                    });
                self.timetable_course = self
                    .courses
                    .iter()
                    .find(|c| c.id == timetable.course_id)
                    .cloned()
                    .or_else(|| {
                        Some(Course {
                            id: timetable.course_id,
                            title: timetable
                                .course_name
                                .clone()
                                .unwrap_or_else(|| format!("Course #{}", timetable.course_id)),
                        })
                    });
                self.timetable_status = timetable.status;
                self.timetable_slots = timetable
                    .time_slots
                    .iter()
                    .map(|slot| SlotDraft {
                        day: Some(slot.day),
                        start: slot.start.clone(),
                        end: slot.end.clone(),
                    })
                    .collect();
                if self.timetable_slots.is_empty() {
                    self.timetable_slots.push(SlotDraft::default());
                }
                self.timetable_student_tz = timetable.student_timezone.parse().ok();
                self.timetable_teacher_tz = timetable.teacher_timezone.parse().ok();
                self.timetable_offset_text = timetable.time_difference_minutes.to_string();
                self.editing_timetable = Some(timetable);
                self.show_timetable_modal = true;
                Task::none()
            }
            Message::CancelTimetableModal => {
                self.show_timetable_modal = false;
                self.reset_timetable_form();
                Task::none()
            }
            Message::TimetableStudentSelected(student) => {
                if self.timetable_student_tz.is_none() {
                    if let Some(zone) = &student.timezone {
                        self.timetable_student_tz = zone.parse().ok();
                    }
                }
                self.timetable_student = Some(student);
                Task::none()
            }
            Message::TimetableTeacherSelected(teacher) => {
                if self.timetable_teacher_tz.is_none() {
                    if let Some(zone) = &teacher.timezone {
                        self.timetable_teacher_tz = zone.parse().ok();
                    }
                }
                self.timetable_teacher = Some(teacher);
                Task::none()
            }
            Message::TimetableCourseSelected(course) => {
                self.timetable_course = Some(course);
                Task::none()
            }
            Message::TimetableStatusSelected(status) => {
                self.timetable_status = status;
                Task::none()
            }
            Message::AddSlotRow => {
                self.timetable_slots.push(SlotDraft::default());
                Task::none()
            }
            Message::RemoveSlotRow(index) => {
                if index < self.timetable_slots.len() {
                    self.timetable_slots.remove(index);
                }
                Task::none()
            }
            Message::SlotDayChanged(index, day_name) => {
                if let Some(draft) = self.timetable_slots.get_mut(index) {
                    draft.day = (1..=7).find(|d| weekday_name(*d) == day_name);
                }
                Task::none()
            }
            Message::SlotStartChanged(index, value) => {
                if let Some(draft) = self.timetable_slots.get_mut(index) {
                    draft.start = value;
                }
                Task::none()
            }
            Message::SlotEndChanged(index, value) => {
                if let Some(draft) = self.timetable_slots.get_mut(index) {
                    draft.end = value;
                }
                Task::none()
            }
            Message::TimetableStudentTzFilterChanged(value) => {
                self.student_tz_filter = value;
                Task::none()
            }
            Message::TimetableTeacherTzFilterChanged(value) => {
                self.teacher_tz_filter = value;
                Task::none()
            }
            Message::TimetableStudentTzSelected(zone) => {
                self.timetable_student_tz = Some(zone);
                Task::none()
            }
            Message::TimetableTeacherTzSelected(zone) => {
                self.timetable_teacher_tz = Some(zone);
                Task::none()
            }
            Message::OffsetTextChanged(value) => {
                self.timetable_offset_text = value;
                Task::none()
            }
            Message::RecomputeOffset => {
                let (Some(student_tz), Some(teacher_tz)) =
                    (self.timetable_student_tz, self.timetable_teacher_tz)
                else {
                    self.timetable_error =
                        Some("Pick both timezones before recomputing".to_string());
                    return Task::none();
                };
                let offset = clamp_offset(offset_between_zones(
                    student_tz,
                    teacher_tz,
                    chrono::Utc::now(),
                ));
                self.timetable_offset_text = offset.to_string();
                self.timetable_error = None;
                Task::none()
            }
            Message::SubmitTimetable => {
                self.timetable_error = None;
                let payload = match self.timetable_payload() {
                    Ok(p) => p,
                    Err(msg) => {
                        self.timetable_error = Some(msg);
                        return Task::none();
                    }
                };
                let service = TimetableService::new(&self.api);
                let exclude = self.editing_timetable.as_ref().map(|t| t.id);
                let check = conflict::check_schedule(
                    service,
                    payload.student_id,
                    payload.teacher_id,
                    exclude,
                    payload.time_slots.clone(),
                );
                self.pending_timetable_payload = Some(payload);
                Task::perform(check, Message::ConflictChecked)
            }
            Message::ConflictChecked(Some(conflict)) => {
                self.pending_timetable_payload = None;
                self.timetable_error = Some(conflict.message());
                Task::none()
            }
            Message::ConflictChecked(None) => {
                // Saves the exact payload the check vetted; edits made
                // while it ran wait for their own submit. No payload
                // means the modal was closed in the meantime.
                let Some(payload) = self.pending_timetable_payload.take() else {
                    return Task::none();
                };
                let service = TimetableService::new(&self.api);
                match self.editing_timetable.as_ref().map(|t| t.id) {
                    Some(id) => Task::perform(
                        async move { service.update(id, &payload).await },
                        Message::TimetableSaved,
                    ),
                    None => Task::perform(
                        async move { service.create(&payload).await },
                        Message::TimetableSaved,
                    ),
                }
            }
            Message::TimetableSaved(result) => match result {
                Ok(_) => {
                    self.show_timetable_modal = false;
                    self.reset_timetable_form();
                    let toast = self.notify(NoticeKind::Info, "Timetable saved");
                    Task::batch(vec![toast, self.load_timetables()])
                }
                Err(err) => {
                    self.timetable_error = Some(err.to_string());
                    Task::none()
                }
            },
            Message::StartGenerate(timetable) => {
                self.generating_timetable = Some(timetable);
                self.generate_from = Date::today();
                self.generate_to = Date::today();
                self.generate_error = None;
                self.show_generate_modal = true;
                Task::none()
            }
            Message::CancelGenerate => {
                self.show_generate_modal = false;
                self.generating_timetable = None;
                self.date_picker_open = DatePickerOpen::Closed;
                Task::none()
            }
            Message::SubmitGenerate => {
                let Some(timetable) = &self.generating_timetable else {
                    return Task::none();
                };
                let from = self.generate_from;
                let to = self.generate_to;
                if (to.year, to.month, to.day) < (from.year, from.month, from.day) {
                    self.generate_error =
                        Some("The end date must not be before the start date".to_string());
                    return Task::none();
                }
                let request = GenerateRequest {
                    from_date: date_to_iso(from),
                    to_date: date_to_iso(to),
                };
                let service = TimetableService::new(&self.api);
                let timetable_id = timetable.id;
                Task::perform(
                    async move { service.generate(timetable_id, &request).await },
                    Message::ClassesGenerated,
                )
            }
            Message::ClassesGenerated(result) => match result {
                Ok(response) => {
                    self.show_generate_modal = false;
                    self.generating_timetable = None;
                    let text = if response.generated == 1 {
                        "Generated 1 class".to_string()
                    } else {
                        format!("Generated {} classes", response.generated)
                    };
                    let toast = self.notify(NoticeKind::Info, text);
                    Task::batch(vec![toast, self.load_classes()])
                }
                Err(err) => {
                    self.generate_error = Some(err.to_string());
                    Task::none()
                }
            },
            // --- Classes ---
            Message::ClassesLoaded(result) => match result {
                Ok(classes) => {
                    self.classes = classes;
                    Task::none()
                }
                Err(err) => self.report_error(&err),
            },
            Message::ClassFromChanged(value) => {
                self.class_from_text = value;
                Task::none()
            }
            Message::ClassToChanged(value) => {
                self.class_to_text = value;
                Task::none()
            }
            Message::ApplyClassFilter => {
                let from = self.class_from_text.trim().to_string();
                let to = self.class_to_text.trim().to_string();
                let date_re = Regex::new(ISO_DATE_PATTERN).unwrap();
                if (!from.is_empty() && !date_re.is_match(&from))
                    || (!to.is_empty() && !date_re.is_match(&to))
                {
                    return self.notify(NoticeKind::Error, "Date filters must be YYYY-MM-DD");
                }
                self.load_classes()
            }
            Message::StartClassStatus(class) => {
                self.class_status_choice = class.status;
                self.class_cancel_reason = class.cancellation_reason.clone().unwrap_or_default();
                self.class_status_error = None;
                self.editing_class = Some(class);
                self.show_class_status_modal = true;
                Task::none()
            }
            Message::CancelClassStatus => {
                self.show_class_status_modal = false;
                self.editing_class = None;
                Task::none()
            }
            Message::ClassStatusChoiceSelected(status) => {
                self.class_status_choice = status;
                self.class_status_error = None;
                Task::none()
            }
            Message::ClassCancelReasonChanged(value) => {
                self.class_cancel_reason = value;
                Task::none()
            }
            Message::SubmitClassStatus => {
                let Some(class) = &self.editing_class else {
                    return Task::none();
                };
                let reason = match cancellation_reason_for(
                    self.class_status_choice,
                    &self.class_cancel_reason,
                ) {
                    Ok(reason) => reason,
                    Err(msg) => {
                        self.class_status_error = Some(msg);
                        return Task::none();
                    }
                };
                let request = ClassStatusRequest {
                    status: self.class_status_choice,
                    cancellation_reason: reason,
                };
                let service = ClassService::new(&self.api);
                let class_id = class.id;
                Task::perform(
                    async move { service.update_status(class_id, &request).await },
                    Message::ClassStatusSaved,
                )
            }
            Message::ClassStatusSaved(result) => match result {
                Ok(updated) => {
                    self.show_class_status_modal = false;
                    self.editing_class = None;
                    if let Some(slot) = self.classes.iter_mut().find(|c| c.id == updated.id) {
                        *slot = updated;
                    }
                    self.notify(NoticeKind::Info, "Class status updated")
                }
                Err(err) => {
                    self.class_status_error = Some(err.to_string());
                    Task::none()
                }
            },
            // --- Leads ---
            Message::KanbanLoaded { background, result } => match result {
                Ok(groups) => {
                    self.lead_board = LeadBoard::from_groups(groups);
                    // A landing poll refreshes the open panel but never
                    // closes it.
                    if let Some(id) = self.selected_lead.as_ref().map(|l| l.id) {
                        if let Some(fresh) = self.lead_board.find(id) {
                            self.selected_lead = Some(fresh.clone());
                        }
                    }
                    Task::none()
                }
                Err(err) => {
                    if background {
                        log::warn!("background lead refresh failed: {err}");
                        Task::none()
                    } else {
                        self.report_error(&err)
                    }
                }
            },
            Message::LeadSearchChanged(value) => {
                self.lead_search = value;
                Task::none()
            }
            Message::SearchLeads | Message::RefreshLeads => self.load_kanban(false),
            Message::PollLeads => self.load_kanban(true),
            Message::LeadMoveRequested(lead_id, to) => {
                match self.lead_board.find(lead_id).map(|l| l.status) {
                    None => return Task::none(),
                    Some(from) if from == to => return Task::none(),
                    Some(_) => {}
                }
                self.lead_board.move_lead(lead_id, to);
                let service = LeadService::new(&self.api);
                Task::perform(
                    async move { service.update_status(lead_id, to).await },
                    move |result| Message::LeadMoved { lead_id, result },
                )
            }
            Message::LeadMoved { lead_id, result } => match result {
                Ok(lead) => {
                    if self.selected_lead.as_ref().is_some_and(|l| l.id == lead_id) {
                        self.selected_lead = Some(lead.clone());
                    }
                    self.lead_board.upsert(lead);
                    Task::none()
                }
                Err(err) => {
                    // Roll back by reloading the whole board.
                    let toast = self.report_error(&err);
                    Task::batch(vec![toast, self.load_kanban(false)])
                }
            },
            Message::SelectLead(lead) => {
                self.selected_lead = Some(lead);
                Task::none()
            }
            Message::CloseLeadPanel => {
                self.selected_lead = None;
                Task::none()
            }
            Message::ToggleLeadModal => {
                if self.show_lead_modal {
                    self.show_lead_modal = false;
                } else {
                    self.reset_lead_form();
                    self.show_lead_modal = true;
                }
                Task::none()
            }
            Message::StartEditingLead(lead) => {
                self.reset_lead_form();
                self.lead_name = lead.name.clone();
                self.lead_phone = lead.phone.clone().unwrap_or_default();
                self.lead_assignee = lead.assignee.clone().unwrap_or_default();
                self.lead_follow_up = lead.follow_up_date.clone().unwrap_or_default();
                self.lead_tags = lead.tags.join(", ");
                self.lead_notes = lead.notes.clone().unwrap_or_default();
                self.lead_status_choice = lead.status;
                self.editing_lead = Some(lead);
                self.show_lead_modal = true;
                Task::none()
            }
            Message::CancelLeadModal => {
                self.show_lead_modal = false;
                self.reset_lead_form();
                Task::none()
            }
            Message::LeadNameChanged(value) => {
                self.lead_name = value;
                Task::none()
            }
            Message::LeadPhoneChanged(value) => {
                self.lead_phone = value;
                Task::none()
            }
            Message::LeadAssigneeChanged(value) => {
                self.lead_assignee = value;
                Task::none()
            }
            Message::LeadFollowUpChanged(value) => {
                self.lead_follow_up = value;
                Task::none()
            }
            Message::LeadTagsChanged(value) => {
                self.lead_tags = value;
                Task::none()
            }
            Message::LeadNotesChanged(value) => {
                self.lead_notes = value;
                Task::none()
            }
            Message::LeadStatusChoiceSelected(status) => {
                self.lead_status_choice = status;
                Task::none()
            }
            Message::SubmitLead => {
                let name = self.lead_name.trim().to_string();
                if name.is_empty() {
                    self.lead_error = Some("The lead needs a name".to_string());
                    return Task::none();
                }
                let phone = self.lead_phone.trim().to_string();
                let phone_re = Regex::new(PHONE_PATTERN).unwrap();
                if !phone.is_empty() && !phone_re.is_match(&phone) {
                    self.lead_error = Some("That phone number does not look valid".to_string());
                    return Task::none();
                }
                let follow_up = self.lead_follow_up.trim().to_string();
                let date_re = Regex::new(ISO_DATE_PATTERN).unwrap();
                if !follow_up.is_empty() && !date_re.is_match(&follow_up) {
                    self.lead_error = Some("Follow-up date must be YYYY-MM-DD".to_string());
                    return Task::none();
                }
                let tags: Vec<String> = self
                    .lead_tags
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect();
                let payload = LeadPayload {
                    name,
                    phone: optional_text(&phone),
                    status: self.lead_status_choice,
                    tags,
                    assignee: optional_text(&self.lead_assignee),
                    follow_up_date: optional_text(&follow_up),
                    notes: optional_text(&self.lead_notes),
                };
                let service = LeadService::new(&self.api);
                match self.editing_lead.as_ref().map(|l| l.id) {
                    Some(id) => Task::perform(
                        async move { service.update(id, &payload).await },
                        Message::LeadSaved,
                    ),
                    None => Task::perform(
                        async move { service.create(&payload).await },
                        Message::LeadSaved,
                    ),
                }
            }
            Message::LeadSaved(result) => match result {
                Ok(lead) => {
                    self.show_lead_modal = false;
                    self.reset_lead_form();
                    if self.selected_lead.as_ref().is_some_and(|l| l.id == lead.id) {
                        self.selected_lead = Some(lead.clone());
                    }
                    self.lead_board.upsert(lead);
                    self.notify(NoticeKind::Info, "Lead saved")
                }
                Err(err) => {
                    self.lead_error = Some(err.to_string());
                    Task::none()
                }
            },
            Message::DeleteLead(lead_id) => {
                let service = LeadService::new(&self.api);
                Task::perform(async move { service.delete(lead_id).await }, move |result| {
                    Message::LeadDeleted { lead_id, result }
                })
            }
            Message::LeadDeleted { lead_id, result } => match result {
                Ok(()) => {
                    self.lead_board.remove(lead_id);
                    if self.selected_lead.as_ref().is_some_and(|l| l.id == lead_id) {
                        self.selected_lead = None;
                    }
                    self.notify(NoticeKind::Info, "Lead deleted")
                }
                Err(err) => self.report_error(&err),
            },
            Message::ShowLeadHistory(lead_id) => {
                self.lead_history.clear();
                self.show_lead_history_modal = true;
                let service = LeadService::new(&self.api);
                Task::perform(
                    async move { service.history(lead_id).await },
                    Message::LeadHistoryLoaded,
                )
            }
            Message::LeadHistoryLoaded(result) => match result {
                Ok(history) => {
                    self.lead_history = history;
                    Task::none()
                }
                Err(err) => {
                    self.show_lead_history_modal = false;
                    self.report_error(&err)
                }
            },
            Message::CloseLeadHistory => {
                self.show_lead_history_modal = false;
                Task::none()
            }
            // --- Students ---
            Message::StudentsLoaded(result) => match result {
                Ok(students) => {
                    self.students = students;
                    Task::none()
                }
                Err(err) => self.report_error(&err),
            },
            Message::StudentFilterChanged(value) => {
                self.student_filter_text = value;
                Task::none()
            }
            Message::ToggleStudentModal => {
                if self.show_student_modal {
                    self.show_student_modal = false;
                } else {
                    self.reset_student_form();
                    self.show_student_modal = true;
                }
                Task::none()
            }
            Message::StartEditingStudent(student) => {
                self.reset_student_form();
                self.student_name = student.name.clone();
                self.student_phone = student.phone.clone().unwrap_or_default();
                self.student_email = student.email.clone().unwrap_or_default();
                self.student_country = student.country.clone().unwrap_or_default();
                self.student_tz = student.timezone.as_deref().and_then(|z| z.parse().ok());
                self.editing_student = Some(student);
                self.show_student_modal = true;
                Task::none()
            }
            Message::CancelStudentModal => {
                self.show_student_modal = false;
                self.reset_student_form();
                Task::none()
            }
            Message::StudentNameChanged(value) => {
                self.student_name = value;
                Task::none()
            }
            Message::StudentPhoneChanged(value) => {
                self.student_phone = value;
                Task::none()
            }
            Message::StudentEmailChanged(value) => {
                self.student_email = value;
                Task::none()
            }
            Message::StudentCountryChanged(value) => {
                self.student_country = value;
                Task::none()
            }
            Message::StudentTzFilterChanged(value) => {
                self.student_form_tz_filter = value;
                Task::none()
            }
            Message::StudentTzSelected(zone) => {
                self.student_tz = Some(zone);
                Task::none()
            }
            Message::SubmitStudent => {
                let name = self.student_name.trim().to_string();
                if name.is_empty() {
                    self.student_error = Some("The student needs a name".to_string());
                    return Task::none();
                }
                let email = self.student_email.trim().to_string();
                let email_re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
                if !email.is_empty() && !email_re.is_match(&email) {
                    self.student_error = Some("That email address does not look valid".to_string());
                    return Task::none();
                }
                let phone = self.student_phone.trim().to_string();
                let phone_re = Regex::new(PHONE_PATTERN).unwrap();
                if !phone.is_empty() && !phone_re.is_match(&phone) {
                    self.student_error = Some("That phone number does not look valid".to_string());
                    return Task::none();
                }
                let payload = StudentPayload {
                    name,
                    phone: optional_text(&phone),
                    email: optional_text(&email),
                    timezone: self.student_tz.map(|z| z.name().to_string()),
                    country: optional_text(&self.student_country),
                };
                let service = DirectoryService::new(&self.api);
                match self.editing_student.as_ref().map(|s| s.id) {
                    Some(id) => Task::perform(
                        async move { service.update_student(id, &payload).await },
                        Message::StudentSaved,
                    ),
                    None => Task::perform(
                        async move { service.create_student(&payload).await },
                        Message::StudentSaved,
                    ),
                }
            }
            Message::StudentSaved(result) => match result {
                Ok(_) => {
                    self.show_student_modal = false;
                    self.reset_student_form();
                    let toast = self.notify(NoticeKind::Info, "Student saved");
                    Task::batch(vec![toast, self.load_students()])
                }
                Err(err) => {
                    self.student_error = Some(err.to_string());
                    Task::none()
                }
            },
            Message::DeleteStudent(student_id) => {
                let service = DirectoryService::new(&self.api);
                Task::perform(
                    async move { service.delete_student(student_id).await },
                    Message::StudentDeleted,
                )
            }
            Message::StudentDeleted(result) => match result {
                Ok(()) => {
                    let toast = self.notify(NoticeKind::Info, "Student deleted");
                    Task::batch(vec![toast, self.load_students()])
                }
                Err(err) => self.report_error(&err),
            },
            Message::NoOp => Task::none(),
        }
    }

    fn load_directory(&self) -> Task<Message> {
        let service = DirectoryService::new(&self.api);
        Task::perform(
            async move {
                tokio::try_join!(service.students(), service.teachers(), service.courses())
            },
            Message::DirectoryLoaded,
        )
    }

    fn load_billing(&self) -> Task<Message> {
        let service = BillingService::new(&self.api);
        let year = self.billing_year;
        let month = self.billing_month;
        let custom_only = self.billing_custom_only;
        Task::perform(
            async move { service.overview(year, month, custom_only).await },
            Message::BillingLoaded,
        )
    }

    fn load_timetables(&self) -> Task<Message> {
        let service = TimetableService::new(&self.api);
        Task::perform(
            async move { service.list().await },
            Message::TimetablesLoaded,
        )
    }

    fn load_classes(&self) -> Task<Message> {
        let service = ClassService::new(&self.api);
        let from = optional_text(&self.class_from_text);
        let to = optional_text(&self.class_to_text);
        Task::perform(
            async move { service.list(from, to).await },
            Message::ClassesLoaded,
        )
    }

    fn load_kanban(&self, background: bool) -> Task<Message> {
        let service = LeadService::new(&self.api);
        let search = optional_text(&self.lead_search);
        Task::perform(
            async move { service.kanban(search.as_deref()).await },
            move |result| Message::KanbanLoaded { background, result },
        )
    }

    fn load_students(&self) -> Task<Message> {
        let service = DirectoryService::new(&self.api);
        Task::perform(
            async move { service.students().await },
            Message::StudentsLoaded,
        )
    }

    /// Shows a banner and schedules its auto-dismiss.
    fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) -> Task<Message> {
        self.notice_seq += 1;
        let seq = self.notice_seq;
        self.notice = Some(Notice {
            kind,
            text: text.into(),
        });
        Task::perform(tokio::time::sleep(Duration::from_secs(NOTICE_SECS)), move |_| {
            Message::NoticeExpired(seq)
        })
    }

    fn report_error(&mut self, err: &ApiError) -> Task<Message> {
        self.notify(NoticeKind::Error, err.to_string())
    }

    fn reset_custom_bill_form(&mut self) {
        self.custom_bill_student = None;
        self.custom_bill_amount.clear();
        self.custom_bill_currency = "USD".to_string();
        self.custom_bill_description.clear();
        self.custom_bill_error = None;
    }

    fn reset_timetable_form(&mut self) {
        self.editing_timetable = None;
        self.timetable_student = None;
        self.timetable_teacher = None;
        self.timetable_course = None;
        self.timetable_status = TimetableStatus::Active;
        self.timetable_slots = vec![SlotDraft::default()];
        self.timetable_student_tz = None;
        self.timetable_teacher_tz = None;
        self.student_tz_filter.clear();
        self.teacher_tz_filter.clear();
        self.timetable_offset_text = "0".to_string();
        self.timetable_error = None;
        self.pending_timetable_payload = None;
    }

    fn reset_lead_form(&mut self) {
        self.editing_lead = None;
        self.lead_name.clear();
        self.lead_phone.clear();
        self.lead_assignee.clear();
        self.lead_follow_up.clear();
        self.lead_tags.clear();
        self.lead_notes.clear();
        self.lead_status_choice = LeadStatus::NewLead;
        self.lead_error = None;
    }

    fn reset_student_form(&mut self) {
        self.editing_student = None;
        self.student_name.clear();
        self.student_phone.clear();
        self.student_email.clear();
        self.student_country.clear();
        self.student_tz = None;
        self.student_form_tz_filter.clear();
        self.student_error = None;
    }

    /// Validates the whole timetable form and turns it into a request
    /// body. The offset is clamped so slot previews stay within one
    /// calendar day of the teacher's time.
    fn timetable_payload(&self) -> Result<TimetablePayload, String> {
        let student = self
            .timetable_student
            .as_ref()
            .ok_or_else(|| "Pick a student".to_string())?;
        let teacher = self
            .timetable_teacher
            .as_ref()
            .ok_or_else(|| "Pick a teacher".to_string())?;
        let course = self
            .timetable_course
            .as_ref()
            .ok_or_else(|| "Pick a course".to_string())?;
        let student_tz = self
            .timetable_student_tz
            .ok_or_else(|| "Pick the student's timezone".to_string())?;
        let teacher_tz = self
            .timetable_teacher_tz
            .ok_or_else(|| "Pick the teacher's timezone".to_string())?;
        let offset: i32 = self
            .timetable_offset_text
            .trim()
            .parse()
            .map_err(|_| "The offset must be a whole number of minutes".to_string())?;
        let slots = self.build_slots()?;
        let mut days: Vec<u8> = slots.iter().map(|s| s.day).collect();
        days.sort_unstable();
        days.dedup();
        Ok(TimetablePayload {
            student_id: student.id,
            teacher_id: teacher.id,
            course_id: course.id,
            days_of_week: days,
            time_slots: slots,
            student_timezone: student_tz.name().to_string(),
            teacher_timezone: teacher_tz.name().to_string(),
            time_difference_minutes: clamp_offset(offset),
            status: self.timetable_status,
        })
    }

    fn build_slots(&self) -> Result<Vec<TimeSlot>, String> {
        if self.timetable_slots.is_empty() {
            return Err("Add at least one time slot".to_string());
        }
        let mut slots = Vec::with_capacity(self.timetable_slots.len());
        for (index, draft) in self.timetable_slots.iter().enumerate() {
            let row = index + 1;
            let day = draft
                .day
                .ok_or_else(|| format!("Slot {row}: pick a weekday"))?;
            let start = parse_hhmm(draft.start.trim())
                .ok_or_else(|| format!("Slot {row}: start must be HH:MM"))?;
            let end = parse_hhmm(draft.end.trim())
                .ok_or_else(|| format!("Slot {row}: end must be HH:MM"))?;
            if end <= start {
                return Err(format!("Slot {row}: end must be after start"));
            }
            slots.push(TimeSlot {
                day,
                start: format_hhmm(start),
                end: format_hhmm(end),
            });
        }
        Ok(slots)
    }
}

pub fn icon_button_content<'a>(
    icon_element: impl Into<Element<'a, Message, Theme, Renderer>>,
    label: &'a str,
) -> Row<'a, Message> {
    Row::new()
        .align_y(Alignment::Center)
        .spacing(5)
        .push(icon_element)
        .push(text(label))
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn date_to_iso(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year, date.month, date.day)
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_navigation_wraps_at_year_edges() {
        assert_eq!(previous_month(2026, 1), (2025, 12));
        assert_eq!(previous_month(2026, 8), (2026, 7));
        assert_eq!(next_month(2026, 12), (2027, 1));
        assert_eq!(next_month(2026, 8), (2026, 9));
    }

    #[test]
    fn optional_text_drops_blank_input() {
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(""), None);
        assert_eq!(optional_text(" +20 100 "), Some("+20 100".to_string()));
    }

    fn filled_timetable_form() -> App {
        let mut app = App::default();
        app.show_timetable_modal = true;
        app.timetable_student = Some(Student {
            id: 3,
            name: "Amina Hassan".to_string(),
            phone: None,
            email: None,
            timezone: None,
            country: None,
        });
        app.timetable_teacher = Some(Teacher {
            id: 2,
            name: "Mr. Saleh".to_string(),
            timezone: None,
        });
        app.timetable_course = Some(Course {
            id: 1,
            title: "Algebra".to_string(),
        });
        app.timetable_student_tz = "Africa/Cairo".parse().ok();
        app.timetable_teacher_tz = "Europe/London".parse().ok();
        app.timetable_offset_text = "120".to_string();
        app.timetable_slots = vec![SlotDraft {
            day: Some(5),
            start: "18:00".to_string(),
            end: "19:30".to_string(),
        }];
        app
    }

    #[test]
    fn save_uses_the_payload_the_conflict_check_vetted() {
        let mut app = filled_timetable_form();
        let _check = app.update(Message::SubmitTimetable);
        let vetted = app
            .pending_timetable_payload
            .clone()
            .expect("submit stashes the payload");
        assert_eq!(
            vetted.time_slots,
            vec![TimeSlot {
                day: 5,
                start: "18:00".to_string(),
                end: "19:30".to_string(),
            }]
        );

        // An edit landing while the check is in flight stays out of
        // this save.
        app.timetable_slots[0].end = "17:00".to_string();

        let _save = app.update(Message::ConflictChecked(None));
        assert_eq!(app.timetable_error, None);
        assert!(app.pending_timetable_payload.is_none());
    }

    #[test]
    fn cancelling_the_modal_drops_the_pending_save() {
        let mut app = filled_timetable_form();
        let _check = app.update(Message::SubmitTimetable);
        assert!(app.pending_timetable_payload.is_some());

        let _ = app.update(Message::CancelTimetableModal);
        assert!(app.pending_timetable_payload.is_none());

        // The check result arrives after the cancel; nothing is saved.
        let _ = app.update(Message::ConflictChecked(None));
        assert_eq!(app.timetable_error, None);
    }

    #[test]
    fn a_found_conflict_rejects_the_pending_payload() {
        let mut app = filled_timetable_form();
        let _check = app.update(Message::SubmitTimetable);

        let clash = conflict::Conflict {
            party: conflict::ConflictParty::Teacher,
            day: 5,
            start: "18:00".to_string(),
            end: "19:30".to_string(),
        };
        let _ = app.update(Message::ConflictChecked(Some(clash)));
        assert_eq!(
            app.timetable_error.as_deref(),
            Some("Teacher already has a class on Friday 18:00-19:30")
        );
        assert!(app.pending_timetable_payload.is_none());
    }
}
