use serde::Deserialize;
use strum::VariantArray;
use time::{Date, Duration, Weekday};

use crate::{next_occurrence, weekday_from_index};

const NOTE_MAX_LEN: usize = 2000;

/// Supported plan lengths, in weeks.
#[derive(VariantArray, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanLength {
    OneWeek,
    TwoWeeks,
    FourWeeks,
    EightWeeks,
    TwelveWeeks,
    HalfYear,
    Year,
}

impl PlanLength {
    pub fn weeks(&self) -> u32 {
        match self {
            PlanLength::OneWeek => 1,
            PlanLength::TwoWeeks => 2,
            PlanLength::FourWeeks => 4,
            PlanLength::EightWeeks => 8,
            PlanLength::TwelveWeeks => 12,
            PlanLength::HalfYear => 26,
            PlanLength::Year => 52,
        }
    }

    pub fn from_weeks(weeks: i64) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|plan| i64::from(plan.weeks()) == weeks)
            .copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlanLength::OneWeek => "1 week",
            PlanLength::TwoWeeks => "2 weeks",
            PlanLength::FourWeeks => "4 weeks",
            PlanLength::EightWeeks => "8 weeks",
            PlanLength::TwelveWeeks => "12 weeks",
            PlanLength::HalfYear => "26 weeks",
            PlanLength::Year => "52 weeks",
        }
    }
}

/// Raw values posted by the assignment form.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AssignmentForm {
    #[serde(default)]
    pub representative_id: String,
    #[serde(default)]
    pub doctor_ids: Vec<String>,
    #[serde(default)]
    pub product_ids: Vec<String>,
    pub weekday: Option<i64>,
    pub repeat_count: Option<i64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Select a representative")]
    MissingRepresentative,
    #[error("Select at least one doctor")]
    NoDoctorsSelected,
    #[error("Select at least one product")]
    NoProductsSelected,
    #[error("Select a weekday")]
    InvalidWeekday,
    #[error("Select a supported plan length")]
    UnsupportedRepeatCount,
    #[error("Note must be at most 2000 characters")]
    NoteTooLong,
}

impl From<ValidationError> for repdesk_shared::Error {
    fn from(value: ValidationError) -> Self {
        repdesk_shared::Error::User(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRequest {
    pub representative_id: String,
    pub doctor_ids: Vec<String>,
    pub product_ids: Vec<String>,
    pub weekday: Weekday,
    pub plan: PlanLength,
    pub start_date: Date,
    pub note: Option<String>,
}

impl AssignmentRequest {
    /// One date per week of the plan, starting at `start_date`.
    pub fn dates(&self) -> Vec<Date> {
        (0..self.plan.weeks())
            .map(|week| self.start_date + Duration::weeks(week as i64))
            .collect()
    }
}

/// Checks the form in a fixed order and stops at the first failure.
pub fn build_assignment_request(
    form: &AssignmentForm,
    today: Date,
) -> Result<AssignmentRequest, ValidationError> {
    let representative_id = form.representative_id.trim();
    if representative_id.is_empty() {
        return Err(ValidationError::MissingRepresentative);
    }

    let doctor_ids = unique_ids(&form.doctor_ids);
    if doctor_ids.is_empty() {
        return Err(ValidationError::NoDoctorsSelected);
    }

    let product_ids = unique_ids(&form.product_ids);
    if product_ids.is_empty() {
        return Err(ValidationError::NoProductsSelected);
    }

    let Some(weekday) = form.weekday.and_then(weekday_from_index) else {
        return Err(ValidationError::InvalidWeekday);
    };

    let Some(plan) = form.repeat_count.and_then(PlanLength::from_weeks) else {
        return Err(ValidationError::UnsupportedRepeatCount);
    };

    let note = form
        .note
        .as_deref()
        .map(str::trim)
        .filter(|note| !note.is_empty())
        .map(ToOwned::to_owned);

    if note
        .as_ref()
        .is_some_and(|note| note.chars().count() > NOTE_MAX_LEN)
    {
        return Err(ValidationError::NoteTooLong);
    }

    Ok(AssignmentRequest {
        representative_id: representative_id.to_owned(),
        doctor_ids,
        product_ids,
        weekday,
        plan,
        start_date: next_occurrence(weekday, today),
        note,
    })
}

/// Drops blanks and repeats, keeping first-seen order.
fn unique_ids(ids: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(ids.len());

    for id in ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
        if !unique.iter().any(|existing| existing == id) {
            unique.push(id.to_owned());
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_series;
    use time::macros::date;

    fn form() -> AssignmentForm {
        AssignmentForm {
            representative_id: "rep-1".to_owned(),
            doctor_ids: vec!["doc-1".to_owned(), "doc-2".to_owned()],
            product_ids: vec!["prod-1".to_owned()],
            weekday: Some(1),
            repeat_count: Some(4),
            note: None,
        }
    }

    #[test]
    fn test_build_computes_start_date() {
        let today = date!(2024 - 01 - 03);
        let request = build_assignment_request(&form(), today).unwrap();

        assert_eq!(request.weekday, Weekday::Monday);
        assert_eq!(request.plan, PlanLength::FourWeeks);
        assert_eq!(request.start_date, date!(2024 - 01 - 08));
        assert_eq!(request.dates(), generate_series(Weekday::Monday, 4, today));
        assert_eq!(request.note, None);
    }

    #[test]
    fn test_build_is_idempotent() {
        let today = date!(2024 - 01 - 03);

        assert_eq!(
            build_assignment_request(&form(), today),
            build_assignment_request(&form(), today)
        );
    }

    #[test]
    fn test_build_checks_in_order() {
        let today = date!(2024 - 01 - 03);

        let empty = AssignmentForm::default();
        assert_eq!(
            build_assignment_request(&empty, today),
            Err(ValidationError::MissingRepresentative)
        );

        let no_doctors = AssignmentForm {
            doctor_ids: vec![],
            product_ids: vec![],
            weekday: Some(9),
            ..form()
        };
        assert_eq!(
            build_assignment_request(&no_doctors, today),
            Err(ValidationError::NoDoctorsSelected)
        );

        let no_products = AssignmentForm {
            product_ids: vec!["  ".to_owned()],
            ..form()
        };
        assert_eq!(
            build_assignment_request(&no_products, today),
            Err(ValidationError::NoProductsSelected)
        );

        let bad_weekday = AssignmentForm {
            weekday: Some(7),
            repeat_count: Some(3),
            ..form()
        };
        assert_eq!(
            build_assignment_request(&bad_weekday, today),
            Err(ValidationError::InvalidWeekday)
        );

        let bad_count = AssignmentForm {
            repeat_count: Some(3),
            ..form()
        };
        assert_eq!(
            build_assignment_request(&bad_count, today),
            Err(ValidationError::UnsupportedRepeatCount)
        );

        let missing_count = AssignmentForm {
            repeat_count: None,
            ..form()
        };
        assert_eq!(
            build_assignment_request(&missing_count, today),
            Err(ValidationError::UnsupportedRepeatCount)
        );
    }

    #[test]
    fn test_build_collapses_duplicates_and_blank_note() {
        let request = build_assignment_request(
            &AssignmentForm {
                doctor_ids: vec![
                    "doc-2".to_owned(),
                    "doc-1".to_owned(),
                    "doc-2".to_owned(),
                ],
                product_ids: vec!["prod-1".to_owned(), "prod-1".to_owned()],
                note: Some("   ".to_owned()),
                ..form()
            },
            date!(2024 - 01 - 03),
        )
        .unwrap();

        assert_eq!(request.doctor_ids, vec!["doc-2", "doc-1"]);
        assert_eq!(request.product_ids, vec!["prod-1"]);
        assert_eq!(request.note, None);
    }

    #[test]
    fn test_build_rejects_long_note() {
        let resp = build_assignment_request(
            &AssignmentForm {
                note: Some("a".repeat(2001)),
                ..form()
            },
            date!(2024 - 01 - 03),
        );

        assert_eq!(resp, Err(ValidationError::NoteTooLong));
    }

    #[test]
    fn test_plan_lengths() {
        let weeks = PlanLength::VARIANTS
            .iter()
            .map(|plan| plan.weeks())
            .collect::<Vec<_>>();

        assert_eq!(weeks, vec![1, 2, 4, 8, 12, 26, 52]);
        assert_eq!(PlanLength::from_weeks(0), None);
        assert_eq!(PlanLength::from_weeks(26), Some(PlanLength::HalfYear));
    }
}
