use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// --- Timetables ---

/// One weekly recurring occurrence, in the teacher's local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: u8, // 1..=7, 1 = Monday
    pub start: String,
    pub end: String,
}

pub fn weekday_name(day: u8) -> &'static str {
    match day {
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        7 => "Sunday",
        _ => "?",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimetableStatus {
    #[default]
    Active,
    Paused,
    Stopped,
}

impl TimetableStatus {
    pub const ALL: &'static [TimetableStatus] = &[
        TimetableStatus::Active,
        TimetableStatus::Paused,
        TimetableStatus::Stopped,
    ];

    /// Wire key, as sent in query strings.
    pub fn key(&self) -> &'static str {
        match self {
            TimetableStatus::Active => "active",
            TimetableStatus::Paused => "paused",
            TimetableStatus::Stopped => "stopped",
        }
    }
}

impl fmt::Display for TimetableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TimetableStatus::Active => "Active",
                TimetableStatus::Paused => "Paused",
                TimetableStatus::Stopped => "Stopped",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub course_id: i64,
    #[serde(default)]
    pub days_of_week: Vec<u8>,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
    pub student_timezone: String,
    pub teacher_timezone: String,
    // Persisted offset is authoritative; it may disagree with the two
    // timezone ids so already-communicated class times never shift.
    pub time_difference_minutes: i32,
    pub status: TimetableStatus,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
}

/// Body for POST timetables and PUT timetables/{id}.
#[derive(Debug, Clone, Serialize)]
pub struct TimetablePayload {
    pub student_id: i64,
    pub teacher_id: i64,
    pub course_id: i64,
    pub days_of_week: Vec<u8>,
    pub time_slots: Vec<TimeSlot>,
    pub student_timezone: String,
    pub teacher_timezone: String,
    pub time_difference_minutes: i32,
    pub status: TimetableStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub from_date: String, // "YYYY-MM-DD"
    pub to_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub generated: u32,
}

// --- Classes ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassStatus {
    #[default]
    Pending,
    Attended,
    CancelledByStudent,
    CancelledByTeacher,
    AbsentStudent,
}

impl ClassStatus {
    pub const ALL: &'static [ClassStatus] = &[
        ClassStatus::Pending,
        ClassStatus::Attended,
        ClassStatus::CancelledByStudent,
        ClassStatus::CancelledByTeacher,
        ClassStatus::AbsentStudent,
    ];

    pub fn requires_reason(&self) -> bool {
        matches!(
            self,
            ClassStatus::CancelledByStudent | ClassStatus::CancelledByTeacher
        )
    }
}

impl fmt::Display for ClassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ClassStatus::Pending => "Pending",
                ClassStatus::Attended => "Attended",
                ClassStatus::CancelledByStudent => "Cancelled by student",
                ClassStatus::CancelledByTeacher => "Cancelled by teacher",
                ClassStatus::AbsentStudent => "Student absent",
            }
        )
    }
}

/// Client-side gate for PATCH classes/{id}/status: the two
/// cancelled_by_* statuses must carry a non-blank reason, everything
/// else sends none. Err means no request goes out.
pub fn cancellation_reason_for(
    status: ClassStatus,
    input: &str,
) -> Result<Option<String>, String> {
    if status.requires_reason() {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err("A cancellation reason is required for cancelled classes.".to_string());
        }
        Ok(Some(trimmed.to_string()))
    } else {
        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInstance {
    pub id: i64,
    pub timetable_id: i64,
    pub date: String, // "YYYY-MM-DD"
    pub start: String,
    pub end: String,
    pub status: ClassStatus,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassStatusRequest {
    pub status: ClassStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

// --- Billing ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    #[default]
    Pending,
    Sent,
    Paid,
}

impl BillStatus {
    pub const ALL: &'static [BillStatus] =
        &[BillStatus::Pending, BillStatus::Sent, BillStatus::Paid];
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BillStatus::Pending => "Pending",
                BillStatus::Sent => "Sent",
                BillStatus::Paid => "Paid",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: i64,
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default)]
    pub student_name: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub status: BillStatus,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub month_key: Option<String>, // "YYYY-MM"
    #[serde(default)]
    pub class_ids: Vec<i64>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub payment_reason: Option<String>,
}

/// One month bucket of GET bills.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthBucket {
    #[serde(default)]
    pub bills: Vec<Bill>,
    #[serde(default)]
    pub paid: Vec<Bill>,
    #[serde(default)]
    pub unpaid: Vec<Bill>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BucketStats {
    /// currency code -> summed amount; empty map means nothing owed.
    #[serde(default)]
    pub total: HashMap<String, f64>,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingStatistics {
    #[serde(default)]
    pub due: BucketStats,
    #[serde(default)]
    pub paid: BucketStats,
    #[serde(default)]
    pub unpaid: BucketStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingOverview {
    /// month key ("YYYY-MM") -> bucket.
    #[serde(default)]
    pub bills: HashMap<String, MonthBucket>,
    #[serde(default)]
    pub statistics: BillingStatistics,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomBillRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    pub amount: f64,
    pub currency: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkPaidRequest {
    pub payment_method: String,
    pub payment_date: String, // "YYYY-MM-DD"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhatsAppRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_override: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfirmation {
    pub sent: bool,
    pub recipient: String,
}

// --- Leads ---

/// The eight fixed pipeline stages, in board column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    NewLead,
    Contacted,
    FollowUp,
    TrialScheduled,
    TrialCompleted,
    Converted,
    Lost,
    Archived,
}

impl LeadStatus {
    pub const ALL: &'static [LeadStatus] = &[
        LeadStatus::NewLead,
        LeadStatus::Contacted,
        LeadStatus::FollowUp,
        LeadStatus::TrialScheduled,
        LeadStatus::TrialCompleted,
        LeadStatus::Converted,
        LeadStatus::Lost,
        LeadStatus::Archived,
    ];
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                LeadStatus::NewLead => "New lead",
                LeadStatus::Contacted => "Contacted",
                LeadStatus::FollowUp => "Follow-up",
                LeadStatus::TrialScheduled => "Trial scheduled",
                LeadStatus::TrialCompleted => "Trial completed",
                LeadStatus::Converted => "Converted",
                LeadStatus::Lost => "Lost",
                LeadStatus::Archived => "Archived",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: LeadStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub follow_up_date: Option<String>, // "YYYY-MM-DD"
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body for POST leads and PUT leads/{id}.
#[derive(Debug, Clone, Serialize)]
pub struct LeadPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub status: LeadStatus,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadStatusRequest {
    pub status: LeadStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeadAuditLog {
    pub id: i64,
    pub lead_id: i64,
    #[serde(default)]
    pub from_status: Option<LeadStatus>,
    pub to_status: LeadStatus,
    pub actor: String,
    pub timestamp: String,
}

// --- Directory (pick-list data) ---

#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// PickList compares the selected entry by id.
impl PartialEq for Student {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Eq, Deserialize)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl fmt::Display for Teacher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq for Teacher {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[derive(Debug, Clone, Eq, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_status_round_trips_snake_case_keys() {
        for status in LeadStatus::ALL {
            let json = serde_json::to_string(status).unwrap();
            let back: LeadStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *status);
        }
        assert_eq!(
            serde_json::to_string(&LeadStatus::TrialScheduled).unwrap(),
            "\"trial_scheduled\""
        );
    }

    #[test]
    fn class_status_wire_keys() {
        assert_eq!(
            serde_json::to_string(&ClassStatus::CancelledByStudent).unwrap(),
            "\"cancelled_by_student\""
        );
        assert_eq!(
            serde_json::to_string(&ClassStatus::AbsentStudent).unwrap(),
            "\"absent_student\""
        );
    }

    #[test]
    fn cancellation_reason_required_for_cancelled_statuses() {
        for status in [ClassStatus::CancelledByStudent, ClassStatus::CancelledByTeacher] {
            assert!(cancellation_reason_for(status, "").is_err());
            assert!(cancellation_reason_for(status, "   \t").is_err());
            assert_eq!(
                cancellation_reason_for(status, "  student sick "),
                Ok(Some("student sick".to_string()))
            );
        }
    }

    #[test]
    fn cancellation_reason_dropped_for_other_statuses() {
        for status in [ClassStatus::Pending, ClassStatus::Attended, ClassStatus::AbsentStudent] {
            assert_eq!(cancellation_reason_for(status, "ignored"), Ok(None));
            assert_eq!(cancellation_reason_for(status, ""), Ok(None));
        }
    }

    #[test]
    fn billing_overview_parses_month_buckets_and_statistics() {
        let body = r#"{
            "bills": {
                "2026-08": {
                    "bills": [{"id": 1, "amount": 150.0, "currency": "USD", "status": "pending"}],
                    "paid": [],
                    "unpaid": [{"id": 1, "amount": 150.0, "currency": "USD", "status": "pending"}]
                }
            },
            "statistics": {
                "due": {"total": {"USD": 150.0}, "count": 2},
                "paid": {"total": {}, "count": 0},
                "unpaid": {"total": {"USD": 150.0}, "count": 1}
            }
        }"#;
        let overview: BillingOverview = serde_json::from_str(body).unwrap();
        assert_eq!(overview.bills["2026-08"].bills.len(), 1);
        assert_eq!(overview.statistics.due.count, 2);
        assert_eq!(overview.statistics.due.total["USD"], 150.0);
        assert!(overview.statistics.paid.total.is_empty());
    }

    #[test]
    fn class_status_request_omits_absent_reason() {
        let body = serde_json::to_string(&ClassStatusRequest {
            status: ClassStatus::Attended,
            cancellation_reason: None,
        })
        .unwrap();
        assert_eq!(body, r#"{"status":"attended"}"#);
    }
}
