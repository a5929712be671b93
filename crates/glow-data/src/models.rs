//! Data models for mood and habit tracking.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::{day_grid, days_in_month, GridCell};

/// Upper bound for a day of exercise, in minutes.
pub const MAX_EXERCISE_MINUTES: u32 = 1_440;
/// Upper bound for hour-valued fields (sleep, screen time).
pub const MAX_DAY_HOURS: f64 = 24.0;

/// The fixed set of moods a day can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Excited,
    Happy,
    Proud,
    Content,
    Unsure,
    Sick,
    Stressed,
    Angry,
    Sad,
    Tired,
}

impl Mood {
    /// Every mood, in display order.
    pub const ALL: [Mood; 10] = [
        Mood::Excited,
        Mood::Happy,
        Mood::Proud,
        Mood::Content,
        Mood::Unsure,
        Mood::Sick,
        Mood::Stressed,
        Mood::Angry,
        Mood::Sad,
        Mood::Tired,
    ];

    /// Lowercase name used on the wire and in display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excited => "excited",
            Self::Happy => "happy",
            Self::Proud => "proud",
            Self::Content => "content",
            Self::Unsure => "unsure",
            Self::Sick => "sick",
            Self::Stressed => "stressed",
            Self::Angry => "angry",
            Self::Sad => "sad",
            Self::Tired => "tired",
        }
    }

    /// Parse a mood name, case-insensitively. Unknown names yield `None`.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "excited" => Some(Self::Excited),
            "happy" => Some(Self::Happy),
            "proud" => Some(Self::Proud),
            "content" => Some(Self::Content),
            "unsure" => Some(Self::Unsure),
            "sick" => Some(Self::Sick),
            "stressed" => Some(Self::Stressed),
            "angry" => Some(Self::Angry),
            "sad" => Some(Self::Sad),
            "tired" => Some(Self::Tired),
            _ => None,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The editable fields of a [`DayRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayField {
    Mood,
    SleepHours,
    ScreenHours,
    ExerciseMinutes,
    AlcoholUnits,
    Diary,
}

impl DayField {
    /// Every field, in record order.
    pub const ALL: [DayField; 6] = [
        DayField::Mood,
        DayField::SleepHours,
        DayField::ScreenHours,
        DayField::ExerciseMinutes,
        DayField::AlcoholUnits,
        DayField::Diary,
    ];

    /// Short name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mood => "mood",
            Self::SleepHours => "sleep",
            Self::ScreenHours => "screen",
            Self::ExerciseMinutes => "exercise",
            Self::AlcoholUnits => "alcohol",
            Self::Diary => "diary",
        }
    }

    /// Parse a wire name back into a field. Unknown names yield `None`.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "mood" => Some(Self::Mood),
            "sleep" => Some(Self::SleepHours),
            "screen" => Some(Self::ScreenHours),
            "exercise" => Some(Self::ExerciseMinutes),
            "alcohol" => Some(Self::AlcoholUnits),
            "diary" => Some(Self::Diary),
            _ => None,
        }
    }
}

impl fmt::Display for DayField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value destined for one [`DayField`].
///
/// Serializes untagged, so a push body carries the bare JSON value
/// (`"happy"`, `7.5`, `30`, `"long day"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Mood(Mood),
    Hours(f64),
    Minutes(u32),
    Units(f64),
    Text(String),
}

/// Error raised by a single-field write.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    /// The value kind does not match the field.
    #[error("{field} cannot hold {value:?}")]
    TypeMismatch { field: DayField, value: FieldValue },
    /// The value is outside the field's documented range, or not finite.
    #[error("value {value} out of range for {field}")]
    OutOfRange { field: DayField, value: f64 },
}

fn checked_range(field: DayField, value: f64, min: f64, max: f64) -> Result<f64, FieldError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(FieldError::OutOfRange { field, value })
    }
}

/// Everything tracked for one calendar day. Every field is optional; a
/// freshly created day has nothing filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Mood tag for the day.
    pub mood: Option<Mood>,
    /// Hours slept, 0 to 24.
    pub sleep_hours: Option<f64>,
    /// Hours of screen time, 0 to 24.
    pub screen_hours: Option<f64>,
    /// Minutes of exercise, 0 to 1440.
    pub exercise_minutes: Option<u32>,
    /// Alcohol units consumed, non-negative.
    pub alcohol_units: Option<f64>,
    /// Free-form diary text.
    pub diary: Option<String>,
    /// Canonical date, stamped once the record is attached to a day.
    pub date: Option<NaiveDate>,
}

impl DayRecord {
    /// True when no mood, metric, or diary has been recorded. The date
    /// stamp alone does not count as content.
    pub fn is_empty(&self) -> bool {
        self.mood.is_none()
            && self.sleep_hours.is_none()
            && self.screen_hours.is_none()
            && self.exercise_minutes.is_none()
            && self.alcohol_units.is_none()
            && self.diary.is_none()
    }

    /// Write one field, enforcing its documented range. The sole mutation
    /// path for record content; rejects mismatched value kinds and
    /// out-of-range or non-finite numbers.
    pub fn set(&mut self, field: DayField, value: FieldValue) -> Result<(), FieldError> {
        match (field, value) {
            (DayField::Mood, FieldValue::Mood(mood)) => self.mood = Some(mood),
            (DayField::SleepHours, FieldValue::Hours(hours)) => {
                self.sleep_hours = Some(checked_range(field, hours, 0.0, MAX_DAY_HOURS)?);
            }
            (DayField::ScreenHours, FieldValue::Hours(hours)) => {
                self.screen_hours = Some(checked_range(field, hours, 0.0, MAX_DAY_HOURS)?);
            }
            (DayField::ExerciseMinutes, FieldValue::Minutes(minutes)) => {
                if minutes > MAX_EXERCISE_MINUTES {
                    return Err(FieldError::OutOfRange {
                        field,
                        value: f64::from(minutes),
                    });
                }
                self.exercise_minutes = Some(minutes);
            }
            (DayField::AlcoholUnits, FieldValue::Units(units)) => {
                if !units.is_finite() || units < 0.0 {
                    return Err(FieldError::OutOfRange { field, value: units });
                }
                self.alcohol_units = Some(units);
            }
            (DayField::Diary, FieldValue::Text(text)) => self.diary = Some(text),
            (field, value) => return Err(FieldError::TypeMismatch { field, value }),
        }
        Ok(())
    }

    /// Read one field back as a typed value.
    pub fn value(&self, field: DayField) -> Option<FieldValue> {
        match field {
            DayField::Mood => self.mood.map(FieldValue::Mood),
            DayField::SleepHours => self.sleep_hours.map(FieldValue::Hours),
            DayField::ScreenHours => self.screen_hours.map(FieldValue::Hours),
            DayField::ExerciseMinutes => self.exercise_minutes.map(FieldValue::Minutes),
            DayField::AlcoholUnits => self.alcohol_units.map(FieldValue::Units),
            DayField::Diary => self.diary.clone().map(FieldValue::Text),
        }
    }

    /// Numeric projection of the four tracked metrics, for series and
    /// summaries. Mood and diary have no numeric reading.
    pub fn metric(&self, field: DayField) -> Option<f64> {
        match field {
            DayField::SleepHours => self.sleep_hours,
            DayField::ScreenHours => self.screen_hours,
            DayField::ExerciseMinutes => self.exercise_minutes.map(f64::from),
            DayField::AlcoholUnits => self.alcohol_units,
            DayField::Mood | DayField::Diary => None,
        }
    }
}

/// One row of the remote year feed.
///
/// The date stays a raw string here so a single bad row can be dropped
/// during ingestion instead of failing the whole batch decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatEntry {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub mood: Option<String>,
    pub sleep: Option<f64>,
    pub screen: Option<f64>,
    pub exercise: Option<u32>,
    pub alcohol: Option<f64>,
    pub diary: Option<String>,
}

impl FlatEntry {
    /// Parse the row's date, if well-formed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// Convert into a [`DayRecord`], degrading lossily: an unknown mood
    /// name or out-of-range metric drops that one field with a warning
    /// while the rest of the row survives. The date stamp is left to the
    /// caller, which knows the slot the record lands in.
    pub fn into_record(self) -> DayRecord {
        let FlatEntry {
            date,
            mood,
            sleep,
            screen,
            exercise,
            alcohol,
            diary,
        } = self;
        let mut record = DayRecord::default();

        if let Some(name) = mood {
            match Mood::from_name(&name) {
                Some(mood) => record.mood = Some(mood),
                None => tracing::warn!(%date, mood = %name, "unknown mood name, field dropped"),
            }
        }

        let metrics = [
            (DayField::SleepHours, sleep.map(FieldValue::Hours)),
            (DayField::ScreenHours, screen.map(FieldValue::Hours)),
            (DayField::ExerciseMinutes, exercise.map(FieldValue::Minutes)),
            (DayField::AlcoholUnits, alcohol.map(FieldValue::Units)),
        ];
        for (field, value) in metrics {
            if let Some(value) = value {
                if let Err(err) = record.set(field, value) {
                    tracing::warn!(%date, %err, "remote value dropped");
                }
            }
        }

        if let Some(text) = diary {
            record.diary = Some(text);
        }
        record
    }
}

/// One calendar month of records plus its display grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub year: i32,
    /// 1 through 12.
    pub month: u32,
    /// Monday-first cell layout, padded with blanks to whole weeks.
    pub grid: Vec<GridCell>,
    /// One slot per calendar day; `days[i]` is day `i + 1`.
    pub days: Vec<DayRecord>,
}

impl MonthRecord {
    /// Build an empty month: computed grid, all-absent day slots.
    pub fn new(year: i32, month: u32) -> Self {
        let len = days_in_month(year, month);
        Self {
            year,
            month,
            grid: day_grid(year, month),
            days: vec![DayRecord::default(); len as usize],
        }
    }

    /// Number of real days in the month.
    pub fn days_in_month(&self) -> u32 {
        self.days.len() as u32
    }

    /// Record for a 1-based day number, if in range.
    pub fn day(&self, day: u32) -> Option<&DayRecord> {
        if day == 0 {
            return None;
        }
        self.days.get(day as usize - 1)
    }

    /// Mutable record for a 1-based day number, if in range.
    pub fn day_mut(&mut self, day: u32) -> Option<&mut DayRecord> {
        if day == 0 {
            return None;
        }
        self.days.get_mut(day as usize - 1)
    }

    /// Grid rows, one slice per week.
    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell]> {
        self.grid.chunks(7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_names_round_trip() {
        for mood in Mood::ALL {
            assert_eq!(Mood::from_name(mood.as_str()), Some(mood));
        }
        assert_eq!(Mood::from_name("HAPPY"), Some(Mood::Happy));
        assert_eq!(Mood::from_name("melancholy"), None);
    }

    #[test]
    fn test_mood_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Mood::Stressed).unwrap(), "\"stressed\"");
        let parsed: Mood = serde_json::from_str("\"tired\"").unwrap();
        assert_eq!(parsed, Mood::Tired);
    }

    #[test]
    fn test_field_wire_names() {
        for field in DayField::ALL {
            assert_eq!(DayField::from_name(field.as_str()), Some(field));
        }
        assert_eq!(DayField::from_name("sleep"), Some(DayField::SleepHours));
        assert_eq!(DayField::from_name("steps"), None);
    }

    #[test]
    fn test_set_and_read_back() {
        let mut record = DayRecord::default();
        assert!(record.is_empty());

        record.set(DayField::Mood, FieldValue::Mood(Mood::Proud)).unwrap();
        record.set(DayField::SleepHours, FieldValue::Hours(7.5)).unwrap();
        record
            .set(DayField::Diary, FieldValue::Text("long day".into()))
            .unwrap();

        assert!(!record.is_empty());
        assert_eq!(record.mood, Some(Mood::Proud));
        assert_eq!(record.value(DayField::SleepHours), Some(FieldValue::Hours(7.5)));
        assert_eq!(record.metric(DayField::SleepHours), Some(7.5));
        assert_eq!(record.metric(DayField::Diary), None);
    }

    #[test]
    fn test_set_rejects_mismatched_kind() {
        let mut record = DayRecord::default();
        let err = record
            .set(DayField::Mood, FieldValue::Hours(3.0))
            .unwrap_err();
        assert!(matches!(err, FieldError::TypeMismatch { field: DayField::Mood, .. }));
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let mut record = DayRecord::default();
        assert!(record.set(DayField::SleepHours, FieldValue::Hours(24.5)).is_err());
        assert!(record.set(DayField::ScreenHours, FieldValue::Hours(-0.1)).is_err());
        assert!(record.set(DayField::SleepHours, FieldValue::Hours(f64::NAN)).is_err());
        assert!(record
            .set(DayField::ExerciseMinutes, FieldValue::Minutes(MAX_EXERCISE_MINUTES + 1))
            .is_err());
        assert!(record.set(DayField::AlcoholUnits, FieldValue::Units(-1.0)).is_err());
        assert!(record.is_empty());
    }

    #[test]
    fn test_set_accepts_boundary_values() {
        let mut record = DayRecord::default();
        record.set(DayField::SleepHours, FieldValue::Hours(0.0)).unwrap();
        record.set(DayField::ScreenHours, FieldValue::Hours(24.0)).unwrap();
        record
            .set(DayField::ExerciseMinutes, FieldValue::Minutes(MAX_EXERCISE_MINUTES))
            .unwrap();
        record.set(DayField::AlcoholUnits, FieldValue::Units(0.0)).unwrap();
    }

    #[test]
    fn test_flat_entry_decode_with_missing_fields() {
        let entry: FlatEntry =
            serde_json::from_str(r#"{"date": "2025-03-14", "mood": "happy", "sleep": 8.0}"#)
                .unwrap();
        assert_eq!(entry.parsed_date(), NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(entry.mood.as_deref(), Some("happy"));
        assert_eq!(entry.exercise, None);
        assert_eq!(entry.diary, None);
    }

    #[test]
    fn test_into_record_degrades_bad_fields() {
        let entry = FlatEntry {
            date: "2025-03-14".into(),
            mood: Some("melancholy".into()),
            sleep: Some(30.0),
            screen: Some(2.0),
            exercise: None,
            alcohol: None,
            diary: Some("kept".into()),
        };
        let record = entry.into_record();
        assert_eq!(record.mood, None);
        assert_eq!(record.sleep_hours, None);
        assert_eq!(record.screen_hours, Some(2.0));
        assert_eq!(record.diary.as_deref(), Some("kept"));
    }

    #[test]
    fn test_month_record_shape() {
        let month = MonthRecord::new(2025, 2);
        assert_eq!(month.days_in_month(), 28);
        assert_eq!(month.grid.len() % 7, 0);
        assert!(month.day(0).is_none());
        assert!(month.day(28).is_some());
        assert!(month.day(29).is_none());
        assert!(month.days.iter().all(DayRecord::is_empty));
    }

    #[test]
    fn test_field_value_serializes_bare() {
        assert_eq!(
            serde_json::to_string(&FieldValue::Mood(Mood::Happy)).unwrap(),
            "\"happy\""
        );
        assert_eq!(serde_json::to_string(&FieldValue::Hours(7.5)).unwrap(), "7.5");
        assert_eq!(serde_json::to_string(&FieldValue::Minutes(30)).unwrap(), "30");
    }
}
