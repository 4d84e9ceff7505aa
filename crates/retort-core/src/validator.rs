//! Validator rules.
//!
//! Each field of a [`Schema`](crate::Schema) carries exactly one rule:
//!
//! | Rule | Accepts | Produces |
//! |------|---------|----------|
//! | [`NumberRule`] | JSON numbers and numeric strings `>= min` | [`FieldValue::Number`] |
//! | [`StringRule`] | JSON strings with at least `min_length` characters | [`FieldValue::String`] |
//! | [`ObjectRule`] | mappings, built recursively into the nested type | [`FieldValue::Object`] |
//!
//! Upper bounds (`max`, `max_length`) and patterns are part of the
//! declaration but are only checked when
//! [`BuildOptions::enforce_upper_bounds`] is set.
//!
//! Every rule carries its own `required` flag. The flag is not consulted by
//! the rule itself; the [`ObjectBuilder`] reads it to decide whether an
//! absent value is skipped or passed through to the rule.

use crate::builder::{BuildOptions, ObjectBuilder};
use crate::raw::{as_number, stringify};
use crate::{FieldValue, MappingError, MappingResult, RequestObject, RequestType, ValueKind};
use regex::Regex;
use serde_json::Value;

/// Common interface of the scalar rules.
pub trait Validator {
    /// Whether the field must carry a value.
    fn is_required(&self) -> bool;

    /// Validates `raw` for `field`, returning the typed value.
    fn validate(&self, raw: &Value, field: &str, options: &BuildOptions)
        -> MappingResult<FieldValue>;
}

/// Numeric rule with a lower bound.
///
/// The accepted value is the parsed number, not the input text: `"012"`
/// yields `12`, `" 59.50 "` yields `59.5`.
///
/// # Example
///
/// ```
/// use retort_core::{BuildOptions, NumberRule, Validator};
/// use serde_json::json;
///
/// let rule = NumberRule::required(10);
/// let options = BuildOptions::default();
///
/// assert!(rule.validate(&json!(59), "price", &options).is_ok());
///
/// let err = rule.validate(&json!(5), "price", &options).unwrap_err();
/// assert_eq!(err.to_string(), "'5' is an invalid number for price.");
/// ```
#[derive(Debug, Clone)]
pub struct NumberRule {
    required: bool,
    min: f64,
    max: Option<f64>,
    pattern: Option<Regex>,
}

impl NumberRule {
    /// Creates a number rule.
    #[must_use]
    pub fn new(required: bool, min: impl Into<f64>) -> Self {
        Self {
            required,
            min: min.into(),
            max: None,
            pattern: None,
        }
    }

    /// Creates a rule for a required number.
    #[must_use]
    pub fn required(min: impl Into<f64>) -> Self {
        Self::new(true, min)
    }

    /// Creates a rule for an optional number.
    #[must_use]
    pub fn optional(min: impl Into<f64>) -> Self {
        Self::new(false, min)
    }

    /// Sets the upper bound.
    #[must_use]
    pub fn max(mut self, max: impl Into<f64>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Sets the pattern the number's text must match.
    #[must_use]
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Returns the lower bound.
    #[must_use]
    pub fn min_value(&self) -> f64 {
        self.min
    }

    /// Returns the upper bound, if declared.
    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.max
    }

    /// Returns the pattern, if declared.
    #[must_use]
    pub fn pattern_regex(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    fn within_upper_bounds(&self, number: &serde_json::Number, value: f64) -> bool {
        if self.max.is_some_and(|max| value > max) {
            return false;
        }
        self.pattern
            .as_ref()
            .map_or(true, |re| re.is_match(&number.to_string()))
    }
}

impl Validator for NumberRule {
    fn is_required(&self) -> bool {
        self.required
    }

    fn validate(
        &self,
        raw: &Value,
        field: &str,
        options: &BuildOptions,
    ) -> MappingResult<FieldValue> {
        let accepted = as_number(raw).filter(|number| {
            number.as_f64().is_some_and(|value| {
                value >= self.min
                    && (!options.enforce_upper_bounds || self.within_upper_bounds(number, value))
            })
        });

        accepted
            .map(FieldValue::Number)
            .ok_or_else(|| MappingError::validation(field, stringify(raw), ValueKind::Number))
    }
}

/// String rule with a minimum length.
///
/// Length is counted in characters, not bytes.
///
/// # Example
///
/// ```
/// use retort_core::{BuildOptions, StringRule, Validator};
/// use serde_json::json;
///
/// let rule = StringRule::required(1, 30);
/// let options = BuildOptions::default();
///
/// assert!(rule.validate(&json!("front"), "location", &options).is_ok());
///
/// let err = rule.validate(&json!(""), "location", &options).unwrap_err();
/// assert_eq!(err.to_string(), "'' is an invalid value for location.");
/// ```
#[derive(Debug, Clone)]
pub struct StringRule {
    required: bool,
    min_length: usize,
    max_length: usize,
    pattern: Option<Regex>,
}

impl StringRule {
    /// Creates a string rule.
    #[must_use]
    pub fn new(required: bool, min_length: usize, max_length: usize) -> Self {
        Self {
            required,
            min_length,
            max_length,
            pattern: None,
        }
    }

    /// Creates a rule for a required string.
    #[must_use]
    pub fn required(min_length: usize, max_length: usize) -> Self {
        Self::new(true, min_length, max_length)
    }

    /// Creates a rule for an optional string.
    #[must_use]
    pub fn optional(min_length: usize, max_length: usize) -> Self {
        Self::new(false, min_length, max_length)
    }

    /// Sets the pattern the string must match.
    #[must_use]
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Returns the minimum length.
    #[must_use]
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Returns the declared maximum length.
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Returns the pattern, if declared.
    #[must_use]
    pub fn pattern_regex(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }
}

impl Validator for StringRule {
    fn is_required(&self) -> bool {
        self.required
    }

    fn validate(
        &self,
        raw: &Value,
        field: &str,
        options: &BuildOptions,
    ) -> MappingResult<FieldValue> {
        if let Value::String(s) = raw {
            let length = s.chars().count();
            let strict_ok = !options.enforce_upper_bounds
                || (length <= self.max_length
                    && self.pattern.as_ref().map_or(true, |re| re.is_match(s)));
            if length >= self.min_length && strict_ok {
                return Ok(FieldValue::String(s.clone()));
            }
        }
        Err(MappingError::validation(field, stringify(raw), ValueKind::Value))
    }
}

/// Rule for a nested object.
///
/// Validation is delegated to the [`ObjectBuilder`] for the nested type.
#[derive(Debug, Clone, Copy)]
pub struct ObjectRule {
    required: bool,
    nested: RequestType,
}

impl ObjectRule {
    /// Creates an object rule for the given nested type.
    #[must_use]
    pub fn new(required: bool, nested: RequestType) -> Self {
        Self { required, nested }
    }

    /// Creates a rule for a required nested `T`.
    #[must_use]
    pub fn required<T: RequestObject>() -> Self {
        Self::new(true, RequestType::of::<T>())
    }

    /// Creates a rule for an optional nested `T`.
    #[must_use]
    pub fn optional<T: RequestObject>() -> Self {
        Self::new(false, RequestType::of::<T>())
    }

    /// Whether the field must carry a value.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the nested type.
    #[must_use]
    pub fn nested(&self) -> RequestType {
        self.nested
    }

    /// Validates `raw` for `field` by building the nested type.
    pub fn validate(
        &self,
        raw: &Value,
        field: &str,
        builder: &ObjectBuilder<'_>,
    ) -> MappingResult<FieldValue> {
        self.validate_at(raw, field, builder, 1)
    }

    pub(crate) fn validate_at(
        &self,
        raw: &Value,
        field: &str,
        builder: &ObjectBuilder<'_>,
        depth: usize,
    ) -> MappingResult<FieldValue> {
        if !raw.is_object() {
            return Err(MappingError::validation(field, stringify(raw), ValueKind::Value));
        }
        if depth > builder.options().max_depth {
            return Err(MappingError::depth_exceeded(field, builder.options().max_depth));
        }
        builder
            .build_record(self.nested, raw, depth)
            .map(FieldValue::Object)
    }
}

/// A field's validation rule, tagged by kind.
#[derive(Debug, Clone)]
pub enum ValidatorConfig {
    /// A [`NumberRule`].
    Number(NumberRule),
    /// A [`StringRule`].
    String(StringRule),
    /// An [`ObjectRule`].
    Object(ObjectRule),
}

impl ValidatorConfig {
    /// Whether the field must carry a value.
    #[must_use]
    pub fn is_required(&self) -> bool {
        match self {
            Self::Number(rule) => rule.is_required(),
            Self::String(rule) => rule.is_required(),
            Self::Object(rule) => rule.is_required(),
        }
    }

    /// Returns the nested type for object rules.
    #[must_use]
    pub fn nested(&self) -> Option<RequestType> {
        match self {
            Self::Object(rule) => Some(rule.nested()),
            Self::Number(_) | Self::String(_) => None,
        }
    }

    pub(crate) fn validate(
        &self,
        raw: &Value,
        field: &str,
        builder: &ObjectBuilder<'_>,
        depth: usize,
    ) -> MappingResult<FieldValue> {
        match self {
            Self::Number(rule) => rule.validate(raw, field, builder.options()),
            Self::String(rule) => rule.validate(raw, field, builder.options()),
            Self::Object(rule) => rule.validate_at(raw, field, builder, depth + 1),
        }
    }
}

impl From<NumberRule> for ValidatorConfig {
    fn from(rule: NumberRule) -> Self {
        Self::Number(rule)
    }
}

impl From<StringRule> for ValidatorConfig {
    fn from(rule: StringRule) -> Self {
        Self::String(rule)
    }
}

impl From<ObjectRule> for ValidatorConfig {
    fn from(rule: ObjectRule) -> Self {
        Self::Object(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn strict() -> BuildOptions {
        BuildOptions {
            enforce_upper_bounds: true,
            ..BuildOptions::default()
        }
    }

    #[test]
    fn test_number_accepts_at_minimum() {
        let rule = NumberRule::required(10);
        let value = rule.validate(&json!(10), "price", &BuildOptions::default()).unwrap();
        assert_eq!(value, FieldValue::Number(10.into()));
    }

    #[test]
    fn test_number_rejects_non_numeric() {
        let rule = NumberRule::required(0);
        let options = BuildOptions::default();
        for raw in [json!("abc"), json!(true), json!([1]), json!({"a": 1}), Value::Null] {
            let err = rule.validate(&raw, "hasZipper", &options).unwrap_err();
            assert!(matches!(err, MappingError::Validation { kind: ValueKind::Number, .. }));
        }
    }

    #[test]
    fn test_number_absent_message() {
        let err = NumberRule::required(1)
            .validate(&Value::Null, "id", &BuildOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "'' is an invalid number for id.");
    }

    #[test]
    fn test_number_accepts_numeric_string() {
        let rule = NumberRule::required(1);
        let value = rule.validate(&json!("12"), "id", &BuildOptions::default()).unwrap();
        assert_eq!(value, FieldValue::Number(12.into()));
    }

    #[test]
    fn test_number_max_ignored_by_default() {
        let rule = NumberRule::required(0).max(10);
        assert!(rule.validate(&json!(500), "n", &BuildOptions::default()).is_ok());
        assert!(rule.validate(&json!(500), "n", &strict()).is_err());
        assert!(rule.validate(&json!(10), "n", &strict()).is_ok());
    }

    #[test]
    fn test_number_pattern_in_strict_mode() {
        let rule = NumberRule::required(0).pattern(Regex::new(r"^\d{4}$").unwrap());
        assert!(rule.validate(&json!(12), "pin", &BuildOptions::default()).is_ok());
        assert!(rule.validate(&json!(12), "pin", &strict()).is_err());
        assert!(rule.validate(&json!(1234), "pin", &strict()).is_ok());
    }

    #[test]
    fn test_string_rejects_non_string() {
        let rule = StringRule::required(0, 10);
        let err = rule.validate(&json!(42), "name", &BuildOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "'42' is an invalid value for name.");
    }

    #[test]
    fn test_string_counts_characters() {
        let rule = StringRule::required(3, 3);
        assert!(rule.validate(&json!("äöü"), "s", &strict()).is_ok());
        assert!(rule.validate(&json!("äö"), "s", &BuildOptions::default()).is_err());
    }

    #[test]
    fn test_string_max_length_and_pattern_in_strict_mode() {
        let rule = StringRule::required(1, 5).pattern(Regex::new("^[a-z]+$").unwrap());
        assert!(rule.validate(&json!("Too Long Value"), "s", &BuildOptions::default()).is_ok());
        assert!(rule.validate(&json!("toolong"), "s", &strict()).is_err());
        assert!(rule.validate(&json!("ABC"), "s", &strict()).is_err());
        assert!(rule.validate(&json!("abc"), "s", &strict()).is_ok());
    }

    #[test]
    fn test_required_flags() {
        assert!(ValidatorConfig::from(NumberRule::required(0)).is_required());
        assert!(!ValidatorConfig::from(StringRule::optional(0, 1)).is_required());
        let object = ValidatorConfig::from(ObjectRule::new(true, RequestType::of::<u8>()));
        assert!(object.is_required());
        assert_eq!(object.nested(), Some(RequestType::of::<u8>()));
    }

    proptest! {
        #[test]
        fn prop_number_accepted_iff_at_least_min(min in -1000i32..1000, value in -2000i64..2000) {
            let rule = NumberRule::required(min);
            let result = rule.validate(&json!(value), "n", &BuildOptions::default());
            prop_assert_eq!(result.is_ok(), value >= i64::from(min));
        }

        #[test]
        fn prop_string_accepted_iff_long_enough(min in 0usize..8, s in "\\PC{0,12}") {
            let rule = StringRule::required(min, 0);
            let result = rule.validate(&json!(s.clone()), "s", &BuildOptions::default());
            prop_assert_eq!(result.is_ok(), s.chars().count() >= min);
        }
    }
}
