use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed integer range with the value used when the input is missing or not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl IntRange {
    pub const fn new(min: i64, max: i64, default: i64) -> Self {
        Self { min, max, default }
    }

    /// Coerce a raw JSON value into the range.
    ///
    /// Numbers and numeric strings are accepted when finite, anything else
    /// falls back to the default. The result is rounded before clamping.
    pub fn clamp(&self, value: Option<&Value>) -> i64 {
        let number = value
            .and_then(finite_number)
            .unwrap_or(self.default as f64);

        // float to int casts saturate, so huge inputs land on the bounds
        (number.round() as i64).clamp(self.min, self.max)
    }
}

pub const PROTEIN: IntRange = IntRange::new(40, 300, 160);
pub const FAT: IntRange = IntRange::new(20, 200, 70);
pub const CARBS: IntRange = IntRange::new(0, 400, 220);
pub const MEAL_COUNT: IntRange = IntRange::new(2, 5, 3);

pub const DIETARY_FILTER_MAX_CHARS: usize = 120;
pub const FRIDGE_INGREDIENTS_MAX_CHARS: usize = 600;

fn finite_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };

    number.is_finite().then_some(number)
}

/// Trim a text field and cap it at `max_chars` characters. Non-string values become empty.
pub fn sanitize_text(value: Option<&Value>, max_chars: usize) -> String {
    match value {
        Some(Value::String(s)) => s.trim().chars().take(max_chars).collect(),
        _ => String::new(),
    }
}

/// Sanitized preferences for one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub protein: u32,
    pub fat: u32,
    pub carbs: u32,
    pub num_meals: u32,
    pub dietary_filter: String,
    pub fridge_ingredients: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::from_raw(&Value::Null)
    }
}

impl Preferences {
    /// Build preferences from an untrusted request body.
    ///
    /// Total over every JSON value: a body that is not an object yields the defaults.
    pub fn from_raw(raw: &Value) -> Self {
        let field = |name: &str| raw.get(name);

        Self {
            protein: PROTEIN.clamp(field("protein")) as u32,
            fat: FAT.clamp(field("fat")) as u32,
            carbs: CARBS.clamp(field("carbs")) as u32,
            num_meals: MEAL_COUNT.clamp(field("numMeals")) as u32,
            dietary_filter: sanitize_text(field("dietaryFilter"), DIETARY_FILTER_MAX_CHARS),
            fridge_ingredients: sanitize_text(
                field("fridgeIngredients"),
                FRIDGE_INGREDIENTS_MAX_CHARS,
            ),
        }
    }

    pub fn meal_count(&self) -> usize {
        self.num_meals as usize
    }

    pub fn calories(&self) -> u32 {
        self.protein * 4 + self.carbs * 4 + self.fat * 9
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_when_missing() {
        let prefs = Preferences::from_raw(&json!({}));

        assert_eq!(prefs.protein, 160);
        assert_eq!(prefs.fat, 70);
        assert_eq!(prefs.carbs, 220);
        assert_eq!(prefs.num_meals, 3);
        assert_eq!(prefs.dietary_filter, "");
        assert_eq!(prefs.fridge_ingredients, "");
    }

    #[test]
    fn test_mixed_garbage_input() {
        let prefs = Preferences::from_raw(&json!({
            "protein": 9999,
            "fat": "x",
            "numMeals": 10,
            "dietaryFilter": "  Vegano  "
        }));

        assert_eq!(
            serde_json::to_value(&prefs).unwrap(),
            json!({
                "protein": 300,
                "fat": 70,
                "carbs": 220,
                "numMeals": 5,
                "dietaryFilter": "Vegano",
                "fridgeIngredients": ""
            })
        );
    }

    #[test]
    fn test_non_object_body_yields_defaults() {
        assert_eq!(Preferences::from_raw(&json!([1, 2, 3])), Preferences::default());
        assert_eq!(Preferences::from_raw(&json!("protein")), Preferences::default());
        assert_eq!(Preferences::from_raw(&Value::Null), Preferences::default());
    }

    #[test]
    fn test_clamp_stays_in_range() {
        let inputs = [
            json!(null),
            json!(true),
            json!("abc"),
            json!(""),
            json!("   "),
            json!("NaN"),
            json!("inf"),
            json!(-1),
            json!(-1e300),
            json!(1e300),
            json!(0.4),
            json!(2.5),
            json!("120"),
            json!(" 87.6 "),
            json!([5]),
            json!({"v": 5}),
            json!(i64::MAX),
            json!(u64::MAX),
        ];

        for range in [PROTEIN, FAT, CARBS, MEAL_COUNT] {
            for input in &inputs {
                let out = range.clamp(Some(input));
                assert!(
                    (range.min..=range.max).contains(&out),
                    "{input} -> {out} outside {range:?}"
                );
            }
            let out = range.clamp(None);
            assert_eq!(out, range.default);
        }
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let inputs = [json!(-50), json!(0), json!(41.5), json!(150), json!(999), json!("x")];

        for range in [PROTEIN, FAT, CARBS, MEAL_COUNT] {
            for input in &inputs {
                let once = range.clamp(Some(input));
                let twice = range.clamp(Some(&json!(once)));
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_clamp_rounds_before_clamping() {
        assert_eq!(PROTEIN.clamp(Some(&json!(100.4))), 100);
        assert_eq!(PROTEIN.clamp(Some(&json!(100.5))), 101);
        assert_eq!(MEAL_COUNT.clamp(Some(&json!(1.6))), 2);
        assert_eq!(MEAL_COUNT.clamp(Some(&json!("4"))), 4);
    }

    #[test]
    fn test_sanitize_text_caps_and_trims() {
        let long = "a".repeat(DIETARY_FILTER_MAX_CHARS + 50);
        let out = sanitize_text(Some(&json!(long)), DIETARY_FILTER_MAX_CHARS);
        assert_eq!(out.chars().count(), DIETARY_FILTER_MAX_CHARS);

        let out = sanitize_text(Some(&json!("  sin gluten \n")), DIETARY_FILTER_MAX_CHARS);
        assert_eq!(out, "sin gluten");

        assert_eq!(sanitize_text(Some(&json!(42)), 10), "");
        assert_eq!(sanitize_text(None, 10), "");
    }

    #[test]
    fn test_sanitize_text_is_prefix_of_trimmed_input() {
        let inputs = ["", "  ", "huevos, arroz", "  ñandú  con  acentos  ", "x\ty\nz  "];

        for input in inputs {
            for max in [0, 1, 5, 600] {
                let out = sanitize_text(Some(&json!(input)), max);
                assert!(out.chars().count() <= max);
                assert!(input.trim().starts_with(&out));
            }
        }
    }

    #[test]
    fn test_sanitize_counts_characters_not_bytes() {
        let input = "é".repeat(FRIDGE_INGREDIENTS_MAX_CHARS + 1);
        let prefs = Preferences::from_raw(&json!({ "fridgeIngredients": input }));
        assert_eq!(
            prefs.fridge_ingredients.chars().count(),
            FRIDGE_INGREDIENTS_MAX_CHARS
        );
    }

    #[test]
    fn test_sanitizing_sanitized_preferences_is_stable() {
        let prefs = Preferences::from_raw(&json!({
            "protein": 35,
            "fat": 201.7,
            "carbs": "180",
            "numMeals": 4,
            "dietaryFilter": " keto ",
            "fridgeIngredients": "pollo, brócoli"
        }));
        let again = Preferences::from_raw(&serde_json::to_value(&prefs).unwrap());

        assert_eq!(prefs, again);
    }

    #[test]
    fn test_calories() {
        let prefs = Preferences::default();
        assert_eq!(prefs.calories(), 160 * 4 + 220 * 4 + 70 * 9);
    }
}
