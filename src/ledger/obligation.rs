use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::calendar::clamp_billing_day;
use super::movement::MovementKind;

/// Suggested labels offered when classifying obligations. Not enforced.
pub const SUGGESTED_CATEGORIES: &[&str] = &[
    "Rent",
    "Utilities",
    "Salaries",
    "Insurance",
    "Taxes",
    "Software",
    "Vehicles",
    "Maintenance",
    "Loan",
    "Subscriptions",
    "Other",
];

/// Cadence of a recurring obligation.
///
/// Values outside the six known cadences are kept verbatim as `Unsupported` so a
/// corrupt record survives a load/save cycle and can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Bimonthly,
    Quarterly,
    Yearly,
    Unsupported(String),
}

impl Frequency {
    /// Exact match against the six stored names; anything else is `Unsupported`.
    pub fn parse(raw: &str) -> Frequency {
        match raw {
            "weekly" => Frequency::Weekly,
            "biweekly" => Frequency::Biweekly,
            "monthly" => Frequency::Monthly,
            "bimonthly" => Frequency::Bimonthly,
            "quarterly" => Frequency::Quarterly,
            "yearly" => Frequency::Yearly,
            _ => Frequency::Unsupported(raw.to_string()),
        }
    }

    /// Lenient form for operator input: surrounding whitespace and case are ignored.
    pub fn from_input(input: &str) -> Frequency {
        let folded = input.trim().to_ascii_lowercase();
        match Frequency::parse(&folded) {
            Frequency::Unsupported(_) => Frequency::Unsupported(input.to_string()),
            known => known,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Bimonthly => "bimonthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
            Frequency::Unsupported(raw) => raw,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Frequency::Unsupported(_))
    }

    /// Months skipped when the current-period candidate is already behind the cursor.
    pub fn month_step(&self) -> Option<i32> {
        match self {
            Frequency::Monthly => Some(1),
            Frequency::Bimonthly => Some(2),
            Frequency::Quarterly => Some(3),
            Frequency::Yearly => Some(12),
            _ => None,
        }
    }
}

impl From<String> for Frequency {
    fn from(raw: String) -> Self {
        Frequency::parse(&raw)
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Template for a periodic expense or income that has not been materialized yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringObligation {
    pub id: Uuid,
    pub kind: MovementKind,
    pub amount: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub frequency: Frequency,
    #[serde(deserialize_with = "deserialize_billing_day")]
    billing_day: u32,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_generated: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

fn deserialize_billing_day<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(clamp_billing_day(raw))
}

impl RecurringObligation {
    pub fn new(
        kind: MovementKind,
        amount: f64,
        description: impl Into<String>,
        frequency: Frequency,
        billing_day: i64,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            description: description.into(),
            category: None,
            frequency,
            billing_day: clamp_billing_day(billing_day),
            start_date,
            end_date: None,
            last_generated: None,
            active: true,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_last_generated(mut self, date: NaiveDate) -> Self {
        self.last_generated = Some(date);
        self
    }

    pub fn billing_day(&self) -> u32 {
        self.billing_day
    }

    pub fn set_billing_day(&mut self, day: i64) {
        self.billing_day = clamp_billing_day(day);
    }

    /// Moves the generation marker forward. Returns `false` when `date` would move
    /// it backwards (or leave it unchanged), in which case nothing is written.
    pub fn advance_last_generated(&mut self, date: NaiveDate) -> bool {
        match self.last_generated {
            Some(current) if current >= date => false,
            _ => {
                self.last_generated = Some(date);
                true
            }
        }
    }

    /// Signed amount as it affects the balance: income positive, expense negative.
    pub fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn stored_frequency_names_must_match_exactly() {
        assert_eq!(Frequency::parse("monthly"), Frequency::Monthly);
        assert_eq!(Frequency::parse("Monthly"), Frequency::Unsupported("Monthly".into()));
        assert_eq!(Frequency::parse("annual"), Frequency::Unsupported("annual".into()));
        assert_eq!(
            Frequency::parse("fortnightly"),
            Frequency::Unsupported("fortnightly".into())
        );
    }

    #[test]
    fn operator_input_is_case_insensitive() {
        assert_eq!(Frequency::from_input("Monthly"), Frequency::Monthly);
        assert_eq!(Frequency::from_input(" QUARTERLY "), Frequency::Quarterly);
        assert_eq!(Frequency::from_input("annual"), Frequency::Unsupported("annual".into()));
    }

    #[test]
    fn unknown_alias_survives_load_and_save_verbatim() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"id":"{id}","kind":"Expense","amount":5.0,"description":"Licence",
                "frequency":"annual","billing_day":1,"start_date":"2024-01-01"}}"#
        );
        let obligation: RecurringObligation = serde_json::from_str(&json).unwrap();
        assert_eq!(obligation.frequency, Frequency::Unsupported("annual".into()));
        let due = crate::ledger::recurring::pending_due_dates(&obligation, date(2025, 12, 31));
        assert!(due.is_empty());

        let saved = serde_json::to_string(&obligation).unwrap();
        assert!(saved.contains("\"frequency\":\"annual\""));
        let reloaded: RecurringObligation = serde_json::from_str(&saved).unwrap();
        assert_eq!(reloaded.frequency, Frequency::Unsupported("annual".into()));
    }

    #[test]
    fn unsupported_frequency_survives_serde() {
        let mut obligation = RecurringObligation::new(
            MovementKind::Expense,
            10.0,
            "Odd",
            Frequency::parse("every-full-moon"),
            5,
            date(2024, 1, 1),
        );
        obligation.category = Some("Other".into());
        let json = serde_json::to_string(&obligation).unwrap();
        assert!(json.contains("\"every-full-moon\""));
        let back: RecurringObligation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.frequency, Frequency::Unsupported("every-full-moon".into()));
    }

    #[test]
    fn billing_day_is_clamped_on_load() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"id":"{id}","kind":"Expense","amount":5.0,"description":"Rent",
                "frequency":"monthly","billing_day":31,"start_date":"2024-01-01"}}"#
        );
        let obligation: RecurringObligation = serde_json::from_str(&json).unwrap();
        assert_eq!(obligation.billing_day(), 28);
        assert!(obligation.active);
        assert_eq!(obligation.last_generated, None);
    }

    #[test]
    fn last_generated_never_moves_backwards() {
        let mut obligation = RecurringObligation::new(
            MovementKind::Income,
            1.0,
            "Sponsor",
            Frequency::Monthly,
            1,
            date(2024, 1, 1),
        );
        assert!(obligation.advance_last_generated(date(2024, 3, 1)));
        assert!(!obligation.advance_last_generated(date(2024, 2, 1)));
        assert!(!obligation.advance_last_generated(date(2024, 3, 1)));
        assert_eq!(obligation.last_generated, Some(date(2024, 3, 1)));
    }
}
