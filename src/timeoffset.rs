use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Largest offset the timetable form accepts, in minutes (12 hours).
/// The converter itself takes any offset; clamping happens at input.
pub const MAX_OFFSET_MINUTES: i32 = 720;

const MINUTES_PER_DAY: i64 = 1440;

/// Strict "HH:MM" -> minutes since midnight.
pub fn parse_hhmm(time: &str) -> Option<u16> {
    let (h, m) = time.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    if !h.bytes().all(|b| b.is_ascii_digit()) || !m.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: u16 = h.parse().ok()?;
    let minutes: u16 = m.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

pub fn format_hhmm(minutes_of_day: u16) -> String {
    format!("{:02}:{:02}", minutes_of_day / 60, minutes_of_day % 60)
}

/// Shifts a wall-clock time by a signed number of minutes.
///
/// Returns the new "HH:MM" plus the number of midnight crossings:
/// -1 landed on the previous day, +1 on the next, 0 same day. The
/// offset is a persisted integer, never re-derived from timezone
/// rules here, so times already communicated to students stay put
/// even if DST rules change later. `None` only for unparseable input.
pub fn shift_time(time: &str, offset_minutes: i32) -> Option<(String, i32)> {
    let total = i64::from(parse_hhmm(time)?) + i64::from(offset_minutes);
    let wrapped = total.rem_euclid(MINUTES_PER_DAY);
    let day_offset = ((total - wrapped) / MINUTES_PER_DAY) as i32;
    Some((format_hhmm(wrapped as u16), day_offset))
}

/// Input-layer clamp to [-720, 720] so a shifted slot never lands
/// further than one midnight away.
pub fn clamp_offset(minutes: i32) -> i32 {
    minutes.clamp(-MAX_OFFSET_MINUTES, MAX_OFFSET_MINUTES)
}

/// Minute difference student minus teacher at the given instant.
///
/// Used only to prefill the form when no persisted offset exists or
/// when the user explicitly asks to recompute; the stored
/// `time_difference_minutes` stays authoritative otherwise.
pub fn offset_between_zones(student_tz: Tz, teacher_tz: Tz, at: DateTime<Utc>) -> i32 {
    let naive = at.naive_utc();
    let student = student_tz.offset_from_utc_datetime(&naive).fix().local_minus_utc();
    let teacher = teacher_tz.offset_from_utc_datetime(&naive).fix().local_minus_utc();
    (student - teacher) / 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_strict_hhmm_only() {
        assert_eq!(parse_hhmm("00:00"), Some(0));
        assert_eq!(parse_hhmm("23:59"), Some(1439));
        assert_eq!(parse_hhmm("09:30"), Some(570));
        assert_eq!(parse_hhmm("9:30"), None);
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("12:60"), None);
        assert_eq!(parse_hhmm("12-30"), None);
        assert_eq!(parse_hhmm(""), None);
        assert_eq!(parse_hhmm("ab:cd"), None);
    }

    #[test]
    fn zero_offset_is_identity() {
        for t in ["00:00", "07:45", "12:00", "23:59"] {
            assert_eq!(shift_time(t, 0), Some((t.to_string(), 0)));
        }
    }

    #[test]
    fn crosses_midnight_forward() {
        assert_eq!(shift_time("23:00", 120), Some(("01:00".to_string(), 1)));
        assert_eq!(shift_time("23:59", 1), Some(("00:00".to_string(), 1)));
    }

    #[test]
    fn crosses_midnight_backward() {
        assert_eq!(shift_time("01:00", -120), Some(("23:00".to_string(), -1)));
        assert_eq!(shift_time("00:00", -1), Some(("23:59".to_string(), -1)));
    }

    #[test]
    fn stays_within_day() {
        assert_eq!(shift_time("10:15", 90), Some(("11:45".to_string(), 0)));
        assert_eq!(shift_time("10:15", -90), Some(("08:45".to_string(), 0)));
    }

    #[test]
    fn round_trip_restores_input_for_clamped_offsets() {
        let times = ["00:00", "00:01", "06:30", "12:00", "18:20", "23:59"];
        for t in times {
            for d in (-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).step_by(97) {
                let (shifted, day_out) = shift_time(t, d).unwrap();
                let (back, day_back) = shift_time(&shifted, -d).unwrap();
                assert_eq!(back, t, "t={t} d={d}");
                assert_eq!(day_out + day_back, 0, "t={t} d={d}");
            }
        }
    }

    #[test]
    fn day_offset_bounded_for_clamped_offsets() {
        for d in [-720, -719, -1, 0, 1, 719, 720] {
            let (_, day) = shift_time("12:00", d).unwrap();
            assert!((-1..=1).contains(&day), "d={d} day={day}");
        }
    }

    #[test]
    fn extreme_offsets_shift_without_overflow() {
        assert_eq!(shift_time("10:00", 7200), Some(("10:00".to_string(), 5)));
        assert_eq!(
            shift_time("00:01", i32::MAX),
            Some(("02:08".to_string(), 1_491_308))
        );
        assert_eq!(
            shift_time("23:59", i32::MIN),
            Some(("21:51".to_string(), -1_491_308))
        );
    }

    #[test]
    fn clamp_caps_magnitude_at_twelve_hours() {
        assert_eq!(clamp_offset(0), 0);
        assert_eq!(clamp_offset(480), 480);
        assert_eq!(clamp_offset(721), 720);
        assert_eq!(clamp_offset(-900), -720);
    }

    #[test]
    fn rejects_garbage_time() {
        assert_eq!(shift_time("25:00", 30), None);
        assert_eq!(shift_time("noon", 30), None);
    }

    #[test]
    fn zone_offset_difference_in_minutes() {
        use chrono_tz::Tz;
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        // January: Cairo UTC+2, Riyadh UTC+3, no DST in either.
        let cairo: Tz = "Africa/Cairo".parse().unwrap();
        let riyadh: Tz = "Asia/Riyadh".parse().unwrap();
        assert_eq!(offset_between_zones(riyadh, cairo, at), 60);
        assert_eq!(offset_between_zones(cairo, riyadh, at), -60);
        assert_eq!(offset_between_zones(cairo, cairo, at), 0);
    }
}
