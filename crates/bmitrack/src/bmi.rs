//! BMI computation and classification.
//!
//! Turns raw form input into a validated [`Measurement`], computes the body
//! mass index and assigns a [`Category`]. [`record_measurement`] is the only
//! path that creates stored records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{BmiRecord, NewRecord};
use crate::storage::Storage;

/// BMI classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// BMI below 18.5.
    #[serde(rename = "Underweight")]
    Underweight,
    /// BMI in `[18.5, 24.9)`.
    #[serde(rename = "Normal weight")]
    NormalWeight,
    /// BMI in `[25, 29.9)`.
    #[serde(rename = "Overweight")]
    Overweight,
    /// Everything else, including the `[24.9, 25)` band.
    #[serde(rename = "Obese")]
    Obese,
}

impl Category {
    /// Classify a BMI value.
    ///
    /// The thresholds are 18.5, 24.9, 25 and 29.9. Values in `[24.9, 25)`
    /// match neither the normal nor the overweight band and classify as
    /// [`Category::Obese`]. Stored history depends on this mapping, so the
    /// gap is kept rather than closed.
    #[must_use]
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if (18.5..24.9).contains(&bmi) {
            Self::NormalWeight
        } else if (25.0..29.9).contains(&bmi) {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    /// The display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::NormalWeight => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Underweight" => Ok(Self::Underweight),
            "Normal weight" => Ok(Self::NormalWeight),
            "Overweight" => Ok(Self::Overweight),
            "Obese" => Ok(Self::Obese),
            other => Err(Error::validation(
                "category",
                format!("unknown category '{other}'"),
            )),
        }
    }
}

/// A validated weight/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    weight: f64,
    height: f64,
}

impl Measurement {
    /// Create a measurement from weight in kilograms and height in meters.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either value is not a finite positive
    /// number, or if the pair yields a BMI that is not finite.
    pub fn new(weight: f64, height: f64) -> Result<Self> {
        check_positive("weight", weight)?;
        check_positive("height", height)?;
        let measurement = Self { weight, height };
        // height² can underflow to zero and the quotient can overflow
        if !measurement.bmi().is_finite() {
            return Err(Error::validation("height", "is too small for the given weight"));
        }
        Ok(measurement)
    }

    /// Parse a measurement from form input.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either field is not numeric or not positive.
    pub fn parse(weight: &str, height: &str) -> Result<Self> {
        let weight = parse_number("weight", weight)?;
        let height = parse_number("height", height)?;
        Self::new(weight, height)
    }

    /// Weight in kilograms.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Height in meters.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Body mass index, `weight / height²`.
    #[must_use]
    pub fn bmi(&self) -> f64 {
        self.weight / (self.height * self.height)
    }

    /// Compute the BMI and its category.
    #[must_use]
    pub fn assess(&self) -> Assessment {
        let bmi = self.bmi();
        Assessment {
            bmi,
            category: Category::classify(bmi),
        }
    }
}

/// The result shown to the user after a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Body mass index.
    pub bmi: f64,
    /// Classification of `bmi`.
    pub category: Category,
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BMI: {:.2} ({})", self.bmi, self.category)
    }
}

fn parse_number(field: &'static str, input: &str) -> Result<f64> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::validation(field, format!("'{input}' is not a number")))
}

fn check_positive(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::validation(field, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(Error::validation(field, "must be a positive number"));
    }
    Ok(())
}

/// Validate a username: non-empty once surrounding whitespace is removed.
///
/// # Errors
///
/// Returns a validation error for a blank username.
pub fn validate_username(username: &str) -> Result<&str> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("username", "please enter a username"));
    }
    Ok(trimmed)
}

/// Validate form input, compute the BMI and append the record.
///
/// All validation happens before the store is touched, so a rejected input
/// leaves history unchanged.
///
/// # Errors
///
/// Returns a validation error for bad input, or a storage error if the
/// insert fails.
pub fn record_measurement(
    store: &Storage,
    username: &str,
    weight: &str,
    height: &str,
) -> Result<BmiRecord> {
    let username = validate_username(username)?;
    let measurement = Measurement::parse(weight, height)?;
    debug!(username, ?measurement, "Validated measurement");

    let record = store.append(&NewRecord::new(username, measurement))?;
    info!(
        id = record.id,
        username = %record.username,
        bmi = record.bmi,
        category = %record.category,
        "Recorded BMI"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    #[test]
    fn test_normal_weight_scenario() {
        let assessment = Measurement::parse("70", "1.75").unwrap().assess();
        assert_eq!(format!("{:.2}", assessment.bmi), "22.86");
        assert_eq!(assessment.category, Category::NormalWeight);
        assert_eq!(assessment.to_string(), "BMI: 22.86 (Normal weight)");
    }

    #[test]
    fn test_obese_scenario() {
        let assessment = Measurement::parse("90", "1.70").unwrap().assess();
        assert_eq!(format!("{:.2}", assessment.bmi), "31.14");
        assert_eq!(assessment.category, Category::Obese);
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(Category::classify(10.0), Category::Underweight);
        assert_eq!(Category::classify(18.49), Category::Underweight);
        assert_eq!(Category::classify(18.5), Category::NormalWeight);
        assert_eq!(Category::classify(24.89), Category::NormalWeight);
        assert_eq!(Category::classify(25.0), Category::Overweight);
        assert_eq!(Category::classify(29.89), Category::Overweight);
        assert_eq!(Category::classify(29.9), Category::Obese);
        assert_eq!(Category::classify(45.0), Category::Obese);
    }

    #[test]
    fn test_classify_boundary_gap_is_obese() {
        assert_eq!(Category::classify(24.9), Category::Obese);
        assert_eq!(Category::classify(24.95), Category::Obese);
        assert_eq!(Category::classify(24.999), Category::Obese);
    }

    #[test]
    fn test_category_labels_round_trip() {
        for category in [
            Category::Underweight,
            Category::NormalWeight,
            Category::Overweight,
            Category::Obese,
        ] {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
        assert!("Skinny".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::NormalWeight).unwrap();
        assert_eq!(json, "\"Normal weight\"");
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = Measurement::parse("seventy", "1.75").unwrap_err();
        assert!(err.is_validation_error());
        assert!(err.to_string().contains("weight"));

        let err = Measurement::parse("70", "").unwrap_err();
        assert!(err.to_string().contains("height"));
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        assert!(Measurement::parse("0", "1.75").is_err());
        assert!(Measurement::parse("70", "0").is_err());
        assert!(Measurement::parse("-70", "1.75").is_err());
        assert!(Measurement::parse("70", "-1.75").is_err());
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(Measurement::parse("NaN", "1.75").is_err());
        assert!(Measurement::parse("70", "inf").is_err());
    }

    #[test]
    fn test_rejects_pair_with_infinite_bmi() {
        let err = Measurement::parse("1e308", "1e-10").unwrap_err();
        assert!(err.is_validation_error());
        assert!(Measurement::new(70.0, 1e-200).is_err());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let m = Measurement::parse(" 70 ", "1.75\n").unwrap();
        assert!((m.weight() - 70.0).abs() < f64::EPSILON);
        assert!((m.height() - 1.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("  alice ").unwrap(), "alice");
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
    }

    #[test]
    fn test_record_measurement_appends() {
        let storage = test_storage();
        let record = record_measurement(&storage, "alice", "70", "1.75").unwrap();

        assert_eq!(record.username, "alice");
        assert_eq!(record.category, Category::NormalWeight);
        assert_eq!(storage.count().unwrap(), 1);
    }

    #[test]
    fn test_record_measurement_rejects_without_mutation() {
        let storage = test_storage();

        assert!(record_measurement(&storage, "", "70", "1.75").is_err());
        assert!(record_measurement(&storage, "bob", "abc", "1.75").is_err());
        assert!(record_measurement(&storage, "bob", "70", "0").is_err());
        assert!(record_measurement(&storage, "bob", "-1", "1.8").is_err());
        let err = record_measurement(&storage, "x", "1e308", "1e-10").unwrap_err();
        assert!(err.is_validation_error());

        assert_eq!(storage.count().unwrap(), 0);
    }

    proptest! {
        #[test]
        fn prop_bmi_formula(weight in 0.1f64..500.0, height in 0.1f64..3.0) {
            let m = Measurement::new(weight, height).unwrap();
            prop_assert_eq!(m.bmi(), weight / (height * height));
        }

        #[test]
        fn prop_classification_is_total(bmi in 0.0f64..200.0) {
            let category = Category::classify(bmi);
            let expected = if bmi < 18.5 {
                Category::Underweight
            } else if bmi < 24.9 {
                Category::NormalWeight
            } else if (25.0..29.9).contains(&bmi) {
                Category::Overweight
            } else {
                Category::Obese
            };
            prop_assert_eq!(category, expected);
        }

        #[test]
        fn prop_non_positive_rejected(weight in -500.0f64..=0.0, height in 0.1f64..3.0) {
            let storage = test_storage();
            let result = record_measurement(
                &storage,
                "prop",
                &weight.to_string(),
                &height.to_string(),
            );
            prop_assert!(result.unwrap_err().is_validation_error());
            prop_assert_eq!(storage.count().unwrap(), 0);
        }
    }
}
