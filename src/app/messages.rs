use std::collections::HashMap;

use chrono_tz::Tz;
use iced_aw::date_picker::Date;

use crate::api::types::{
    Bill, BillingOverview, ClassInstance, ClassStatus, Course, GenerateResponse, Lead,
    LeadAuditLog, LeadStatus, Student, Teacher, Timetable, TimetableStatus, WhatsAppConfirmation,
};
use crate::api::ApiError;
use crate::conflict::Conflict;

#[derive(Debug, Clone)]
pub enum Message {
    GoToBilling,
    GoToTimetables,
    GoToClasses,
    GoToLeads,
    GoToStudents,
    GoToSettings,
    //
    ThemeSelected(&'static str),
    ApiBaseUrlChanged(String),
    SaveSettings,
    //
    DismissNotice,
    NoticeExpired(u64),
    //
    DirectoryLoaded(Result<(Vec<Student>, Vec<Teacher>, Vec<Course>), ApiError>),
    // Billing
    BillingLoaded(Result<BillingOverview, ApiError>),
    PrevBillingMonth,
    NextBillingMonth,
    BillingCustomOnlyToggled(bool),
    ToggleMonthExpanded(String),
    StartMarkPaid(Bill),
    CancelMarkPaid,
    PaidMethodChanged(String),
    PaidReasonChanged(String),
    SubmitMarkPaid,
    BillMarkedPaid(Result<Bill, ApiError>),
    StartWhatsApp(Bill),
    CancelWhatsApp,
    WhatsAppPhoneChanged(String),
    SubmitWhatsApp,
    WhatsAppSent(Result<WhatsAppConfirmation, ApiError>),
    ToggleCustomBillModal,
    CustomBillStudentSelected(Student),
    ClearCustomBillStudent,
    CustomBillAmountChanged(String),
    CustomBillCurrencySelected(String),
    CustomBillDescriptionChanged(String),
    SubmitCustomBill,
    CustomBillCreated(Result<Bill, ApiError>),
    // Date pickers
    ChoosePaidDate,
    SubmitPaidDate(Date),
    ChooseGenerateFrom,
    SubmitGenerateFrom(Date),
    ChooseGenerateTo,
    SubmitGenerateTo(Date),
    CancelDatePicker,
    // Timetables
    TimetablesLoaded(Result<Vec<Timetable>, ApiError>),
    TimetableFilterChanged(String),
    ToggleTimetableModal,
    StartEditingTimetable(Timetable),
    CancelTimetableModal,
    TimetableStudentSelected(Student),
    TimetableTeacherSelected(Teacher),
    TimetableCourseSelected(Course),
    TimetableStatusSelected(TimetableStatus),
    AddSlotRow,
    RemoveSlotRow(usize),
    SlotDayChanged(usize, &'static str),
    SlotStartChanged(usize, String),
    SlotEndChanged(usize, String),
    TimetableStudentTzFilterChanged(String),
    TimetableTeacherTzFilterChanged(String),
    TimetableStudentTzSelected(Tz),
    TimetableTeacherTzSelected(Tz),
    OffsetTextChanged(String),
    RecomputeOffset,
    SubmitTimetable,
    ConflictChecked(Option<Conflict>),
    TimetableSaved(Result<Timetable, ApiError>),
    StartGenerate(Timetable),
    CancelGenerate,
    SubmitGenerate,
    ClassesGenerated(Result<GenerateResponse, ApiError>),
    // Classes
    ClassesLoaded(Result<Vec<ClassInstance>, ApiError>),
    ClassFromChanged(String),
    ClassToChanged(String),
    ApplyClassFilter,
    StartClassStatus(ClassInstance),
    CancelClassStatus,
    ClassStatusChoiceSelected(ClassStatus),
    ClassCancelReasonChanged(String),
    SubmitClassStatus,
    ClassStatusSaved(Result<ClassInstance, ApiError>),
    // Leads
    KanbanLoaded {
        background: bool,
        result: Result<HashMap<LeadStatus, Vec<Lead>>, ApiError>,
    },
    LeadSearchChanged(String),
    SearchLeads,
    RefreshLeads,
    PollLeads,
    LeadMoveRequested(i64, LeadStatus),
    LeadMoved {
        lead_id: i64,
        result: Result<Lead, ApiError>,
    },
    SelectLead(Lead),
    CloseLeadPanel,
    ToggleLeadModal,
    StartEditingLead(Lead),
    CancelLeadModal,
    LeadNameChanged(String),
    LeadPhoneChanged(String),
    LeadAssigneeChanged(String),
    LeadFollowUpChanged(String),
    LeadTagsChanged(String),
    LeadNotesChanged(String),
    LeadStatusChoiceSelected(LeadStatus),
    SubmitLead,
    LeadSaved(Result<Lead, ApiError>),
    DeleteLead(i64),
    LeadDeleted {
        lead_id: i64,
        result: Result<(), ApiError>,
    },
    ShowLeadHistory(i64),
    LeadHistoryLoaded(Result<Vec<LeadAuditLog>, ApiError>),
    CloseLeadHistory,
    // Students
    StudentsLoaded(Result<Vec<Student>, ApiError>),
    StudentFilterChanged(String),
    ToggleStudentModal,
    StartEditingStudent(Student),
    CancelStudentModal,
    StudentNameChanged(String),
    StudentPhoneChanged(String),
    StudentEmailChanged(String),
    StudentCountryChanged(String),
    StudentTzFilterChanged(String),
    StudentTzSelected(Tz),
    SubmitStudent,
    StudentSaved(Result<Student, ApiError>),
    DeleteStudent(i64),
    StudentDeleted(Result<(), ApiError>),
    //
    NoOp,
}
