//! Overlap detection for weekly schedules.
//!
//! A new or edited timetable is checked against every active timetable of
//! the same student and the same teacher before it is saved. Times are
//! compared as minutes within one weekday; ranges are half-open, so a slot
//! ending at 10:00 does not collide with one starting at 10:00.

use crate::api::timetables::TimetableService;
use crate::api::types::{weekday_name, TimeSlot, Timetable};
use crate::timeoffset::parse_hhmm;

/// Whose existing schedule the clash was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictParty {
    Student,
    Teacher,
}

impl std::fmt::Display for ConflictParty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictParty::Student => write!(f, "Student"),
            ConflictParty::Teacher => write!(f, "Teacher"),
        }
    }
}

/// A detected clash, carrying the already-booked slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub party: ConflictParty,
    pub day: u8,
    pub start: String,
    pub end: String,
}

impl Conflict {
    pub fn message(&self) -> String {
        format!(
            "{} already has a class on {} {}-{}",
            self.party,
            weekday_name(self.day),
            self.start,
            self.end
        )
    }
}

/// True when two slots fall on the same weekday and their time ranges
/// intersect. Unparseable times never overlap.
pub fn slots_overlap(a: &TimeSlot, b: &TimeSlot) -> bool {
    if a.day != b.day {
        return false;
    }
    let (Some(a_start), Some(a_end)) = (parse_hhmm(&a.start), parse_hhmm(&a.end)) else {
        return false;
    };
    let (Some(b_start), Some(b_end)) = (parse_hhmm(&b.start), parse_hhmm(&b.end)) else {
        return false;
    };
    a_start < b_end && b_start < a_end
}

/// Scans `existing` in listing order and returns the first booked slot that
/// clashes with any of `candidates`. The timetable being edited is skipped
/// via `exclude_id` so it cannot conflict with itself.
pub fn find_conflict(
    candidates: &[TimeSlot],
    existing: &[Timetable],
    exclude_id: Option<i64>,
    party: ConflictParty,
) -> Option<Conflict> {
    for candidate in candidates {
        for timetable in existing {
            if exclude_id == Some(timetable.id) {
                continue;
            }
            for slot in &timetable.time_slots {
                if slots_overlap(candidate, slot) {
                    return Some(Conflict {
                        party,
                        day: slot.day,
                        start: slot.start.clone(),
                        end: slot.end.clone(),
                    });
                }
            }
        }
    }
    None
}

/// Checks `candidates` against the active schedules of the student first,
/// then the teacher. A fetch failure is logged and treated as no conflict,
/// the server still validates on save.
pub async fn check_schedule(
    service: TimetableService,
    student_id: i64,
    teacher_id: i64,
    exclude_id: Option<i64>,
    candidates: Vec<TimeSlot>,
) -> Option<Conflict> {
    match service.active_for_student(student_id).await {
        Ok(existing) => {
            if let Some(conflict) =
                find_conflict(&candidates, &existing, exclude_id, ConflictParty::Student)
            {
                return Some(conflict);
            }
        }
        Err(err) => {
            log::warn!("conflict check skipped for student {student_id}: {err}");
        }
    }
    match service.active_for_teacher(teacher_id).await {
        Ok(existing) => {
            find_conflict(&candidates, &existing, exclude_id, ConflictParty::Teacher)
        }
        Err(err) => {
            log::warn!("conflict check skipped for teacher {teacher_id}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::TimetableStatus;

    fn slot(day: u8, start: &str, end: &str) -> TimeSlot {
        TimeSlot {
            day,
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    fn timetable(id: i64, slots: Vec<TimeSlot>) -> Timetable {
        Timetable {
            id,
            student_id: 1,
            teacher_id: 2,
            course_id: 3,
            days_of_week: slots.iter().map(|s| s.day).collect(),
            time_slots: slots,
            student_timezone: "UTC".to_string(),
            teacher_timezone: "UTC".to_string(),
            time_difference_minutes: 0,
            status: TimetableStatus::Active,
            student_name: None,
            teacher_name: None,
            course_name: None,
        }
    }

    #[test]
    fn touching_slots_do_not_conflict() {
        assert!(!slots_overlap(
            &slot(1, "09:00", "10:00"),
            &slot(1, "10:00", "11:00")
        ));
        assert!(!slots_overlap(
            &slot(1, "10:00", "11:00"),
            &slot(1, "09:00", "10:00")
        ));
    }

    #[test]
    fn overlapping_slots_conflict() {
        assert!(slots_overlap(
            &slot(1, "09:00", "10:30"),
            &slot(1, "10:00", "11:00")
        ));
        assert!(slots_overlap(
            &slot(1, "10:00", "11:00"),
            &slot(1, "09:00", "10:30")
        ));
    }

    #[test]
    fn containment_is_a_conflict() {
        assert!(slots_overlap(
            &slot(3, "09:00", "12:00"),
            &slot(3, "10:00", "10:30")
        ));
    }

    #[test]
    fn different_days_never_conflict() {
        assert!(!slots_overlap(
            &slot(1, "09:00", "10:00"),
            &slot(2, "09:00", "10:00")
        ));
    }

    #[test]
    fn unparseable_times_never_conflict() {
        assert!(!slots_overlap(
            &slot(1, "9am", "10am"),
            &slot(1, "09:00", "10:00")
        ));
    }

    #[test]
    fn edited_timetable_is_ignored() {
        let existing = vec![timetable(5, vec![slot(1, "15:00", "16:00")])];
        let candidates = vec![slot(1, "15:30", "16:30")];
        assert_eq!(
            find_conflict(&candidates, &existing, Some(5), ConflictParty::Student),
            None
        );
        assert!(
            find_conflict(&candidates, &existing, None, ConflictParty::Student).is_some()
        );
    }

    #[test]
    fn first_match_in_listing_order_wins() {
        let existing = vec![
            timetable(1, vec![slot(4, "10:00", "11:00")]),
            timetable(2, vec![slot(4, "10:30", "11:30")]),
        ];
        let candidates = vec![slot(4, "10:45", "11:15")];
        let conflict = find_conflict(&candidates, &existing, None, ConflictParty::Teacher)
            .expect("both timetables clash");
        assert_eq!(conflict.start, "10:00");
        assert_eq!(conflict.end, "11:00");
    }

    #[test]
    fn message_names_party_day_and_range() {
        let conflict = Conflict {
            party: ConflictParty::Teacher,
            day: 5,
            start: "18:00".to_string(),
            end: "19:30".to_string(),
        };
        assert_eq!(
            conflict.message(),
            "Teacher already has a class on Friday 18:00-19:30"
        );
    }
}
