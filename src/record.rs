//! Patient record validation and prediction result types.
//!
//! The wire contract is fixed: eight named numeric fields in, a label and a
//! two-decimal probability out. Validation is all-or-nothing and enumerates
//! every failing field rather than stopping at the first.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 8;

/// Required field names, in canonical feature order.
///
/// This order is the one the classifier was trained with; `to_features`
/// must never deviate from it.
pub const FIELD_NAMES: [&str; FEATURE_COUNT] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

/// Clinical measurements for a single patient.
///
/// Created transiently per request, no identity, discarded after producing a
/// [`PredictionResult`]. No range constraints are enforced beyond "numeric".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PatientRecord {
    /// Number of pregnancies.
    pub pregnancies: f64,
    /// Plasma glucose concentration (mg/dL).
    pub glucose: f64,
    /// Diastolic blood pressure (mm Hg).
    pub blood_pressure: f64,
    /// Triceps skin fold thickness (mm).
    pub skin_thickness: f64,
    /// Serum insulin (µU/mL).
    pub insulin: f64,
    /// Body mass index.
    #[serde(rename = "BMI")]
    pub bmi: f64,
    /// Diabetes pedigree function.
    pub diabetes_pedigree_function: f64,
    /// Age in years.
    pub age: f64,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name as it appears on the wire.
    pub champ: String,
    /// Human-readable reason.
    pub raison: String,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(champ: &str, raison: &str) -> Self {
        Self {
            champ: champ.to_string(),
            raison: raison.to_string(),
        }
    }
}

/// Coerce a JSON value to a float.
///
/// JSON numbers, finite numeric strings and booleans (1.0/0.0) are accepted;
/// null, arrays and objects are not. Non-finite parses ("NaN", "inf") are
/// rejected so a probability can never serialize as `null` downstream.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    }
}

impl PatientRecord {
    /// Validate a decoded JSON body into a record.
    ///
    /// All eight fields must be present and coercible to a number; failures
    /// are collected per field and returned together. Extra keys are ignored.
    pub fn from_value(value: &Value) -> std::result::Result<Self, Vec<FieldError>> {
        let Some(obj) = value.as_object() else {
            return Err(vec![FieldError::new("corps", "objet JSON attendu")]);
        };

        let mut features = [0.0f64; FEATURE_COUNT];
        let mut errors = Vec::new();

        for (i, name) in FIELD_NAMES.iter().enumerate() {
            match obj.get(*name) {
                None => errors.push(FieldError::new(name, "champ requis")),
                Some(v) => match coerce_number(v) {
                    Some(x) => features[i] = x,
                    None => errors.push(FieldError::new(name, "nombre invalide")),
                },
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self::from_features(features))
    }

    /// Build a record from a feature array in canonical order.
    pub fn from_features(f: [f64; FEATURE_COUNT]) -> Self {
        Self {
            pregnancies: f[0],
            glucose: f[1],
            blood_pressure: f[2],
            skin_thickness: f[3],
            insulin: f[4],
            bmi: f[5],
            diabetes_pedigree_function: f[6],
            age: f[7],
        }
    }

    /// Single-row feature vector in canonical order.
    pub fn to_features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.pregnancies,
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            self.age,
        ]
    }

    /// A representative patient record, used by `check-model` and tests.
    pub fn sample() -> Self {
        Self {
            pregnancies: 2.0,
            glucose: 130.0,
            blood_pressure: 70.0,
            skin_thickness: 20.0,
            insulin: 85.0,
            bmi: 28.5,
            diabetes_pedigree_function: 0.35,
            age: 45.0,
        }
    }
}

/// Outcome of a classifier invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Binary class label: 1 = diabetic, 0 = not diabetic.
    pub prediction: i64,
    /// Positive-class probability in [0, 1], rounded to two decimals.
    pub probabilite_diabete: f64,
}

impl PredictionResult {
    /// Build a result, rounding the probability to two decimals.
    pub fn new(prediction: i64, probability: f64) -> Self {
        Self {
            prediction,
            probabilite_diabete: round2(probability),
        }
    }

    /// Whether the label is the positive (diabetic) class.
    pub fn is_positive(&self) -> bool {
        self.prediction == 1
    }
}

/// Round to two decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn valid_record_parses_in_field_order() {
        let value = json!({
            "Pregnancies": 2,
            "Glucose": 130,
            "BloodPressure": 70,
            "SkinThickness": 20,
            "Insulin": 85,
            "BMI": 28.5,
            "DiabetesPedigreeFunction": 0.35,
            "Age": 45
        });

        let record = PatientRecord::from_value(&value).unwrap();
        assert_eq!(
            record.to_features(),
            [2.0, 130.0, 70.0, 20.0, 85.0, 28.5, 0.35, 45.0]
        );
    }

    #[test]
    fn missing_field_is_named() {
        let mut value = serde_json::to_value(PatientRecord::sample()).unwrap();
        value.as_object_mut().unwrap().remove("Glucose");

        let errors = PatientRecord::from_value(&value).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("Glucose", "champ requis")]);
    }

    #[test]
    fn every_field_can_be_reported_missing() {
        for name in FIELD_NAMES {
            let mut value = serde_json::to_value(PatientRecord::sample()).unwrap();
            value.as_object_mut().unwrap().remove(name);

            let errors = PatientRecord::from_value(&value).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].champ, name);
        }
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        let mut value = serde_json::to_value(PatientRecord::sample()).unwrap();
        value["Age"] = json!("quarante-cinq");

        let errors = PatientRecord::from_value(&value).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("Age", "nombre invalide")]);
    }

    #[test]
    fn null_and_containers_are_not_numbers() {
        let mut value = serde_json::to_value(PatientRecord::sample()).unwrap();
        value["Insulin"] = json!([85.0]);
        value["BMI"] = json!(null);

        let errors = PatientRecord::from_value(&value).unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::new("Insulin", "nombre invalide"),
                FieldError::new("BMI", "nombre invalide"),
            ]
        );
    }

    #[test]
    fn booleans_coerce_like_integers() {
        let mut value = serde_json::to_value(PatientRecord::sample()).unwrap();
        value["Pregnancies"] = json!(true);
        value["Insulin"] = json!(false);

        let record = PatientRecord::from_value(&value).unwrap();
        assert_eq!(record.pregnancies, 1.0);
        assert_eq!(record.insulin, 0.0);
    }

    #[test]
    fn non_finite_numeric_strings_are_rejected() {
        for text in ["NaN", "inf", "-inf", "Infinity"] {
            let mut value = serde_json::to_value(PatientRecord::sample()).unwrap();
            value["Glucose"] = json!(text);

            let errors = PatientRecord::from_value(&value).unwrap_err();
            assert_eq!(
                errors,
                vec![FieldError::new("Glucose", "nombre invalide")],
                "{text} must not validate"
            );
        }
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let mut value = serde_json::to_value(PatientRecord::sample()).unwrap();
        value["Glucose"] = json!("130.5");

        let record = PatientRecord::from_value(&value).unwrap();
        assert_eq!(record.glucose, 130.5);
    }

    #[test]
    fn failures_are_enumerated_not_short_circuited() {
        let value = json!({"Glucose": "abc", "Age": 45});
        let errors = PatientRecord::from_value(&value).unwrap_err();

        // Six missing fields plus one bad type; Age is fine.
        assert_eq!(errors.len(), 7);
        assert!(errors.contains(&FieldError::new("Glucose", "nombre invalide")));
        assert!(errors.contains(&FieldError::new("Pregnancies", "champ requis")));
    }

    #[test]
    fn extra_keys_are_ignored() {
        let mut value = serde_json::to_value(PatientRecord::sample()).unwrap();
        value["PatientName"] = json!("Dupont");

        assert!(PatientRecord::from_value(&value).is_ok());
    }

    #[test]
    fn non_object_json_is_rejected_whole() {
        let errors = PatientRecord::from_value(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("corps", "objet JSON attendu")]);
    }

    #[test]
    fn negative_values_are_accepted() {
        // No range validation by contract: a negative age is still a number.
        let mut value = serde_json::to_value(PatientRecord::sample()).unwrap();
        value["Age"] = json!(-3);

        let record = PatientRecord::from_value(&value).unwrap();
        assert_eq!(record.age, -3.0);
    }

    #[test]
    fn serialized_keys_match_the_wire_contract() {
        let value = serde_json::to_value(PatientRecord::sample()).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), FEATURE_COUNT);
        for name in FIELD_NAMES {
            assert!(obj.contains_key(name), "missing key {name}");
        }
    }

    #[test]
    fn probability_rounds_to_two_decimals() {
        assert_eq!(PredictionResult::new(1, 0.856).probabilite_diabete, 0.86);
        assert_eq!(PredictionResult::new(0, 0.124).probabilite_diabete, 0.12);
    }

    #[test]
    fn boundary_probabilities_round_trip() {
        assert_eq!(PredictionResult::new(0, 0.0).probabilite_diabete, 0.0);
        assert_eq!(PredictionResult::new(1, 1.0).probabilite_diabete, 1.0);
    }
}
