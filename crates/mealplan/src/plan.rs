use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

/// Maximum number of preparation steps kept per meal.
pub const MAX_STEPS: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("plan has no days")]
    MissingDays,

    #[error("first day has no meal list")]
    MissingMeals,

    #[error("meal {0} is not an object")]
    InvalidMeal(usize),
}

/// Trim the provider's plan to what was asked for.
///
/// Keeps the first `meal_count` meals of the first day (never pads) and at
/// most [`MAX_STEPS`] steps per kept meal; a missing or non-array `steps`
/// becomes `[]`. The plan is only modified when every step succeeds.
pub fn normalize_plan(plan: &mut Value, meal_count: usize) -> Result<(), NormalizeError> {
    let mut draft = plan.clone();

    let day = draft
        .get_mut("days")
        .and_then(Value::as_array_mut)
        .and_then(|days| days.first_mut())
        .ok_or(NormalizeError::MissingDays)?;

    let meals = day
        .get_mut("meals")
        .and_then(Value::as_array_mut)
        .ok_or(NormalizeError::MissingMeals)?;

    meals.truncate(meal_count);

    for (idx, meal) in meals.iter_mut().enumerate() {
        let meal = meal
            .as_object_mut()
            .ok_or(NormalizeError::InvalidMeal(idx))?;

        let steps = match meal.remove("steps") {
            Some(Value::Array(mut steps)) => {
                steps.truncate(MAX_STEPS);
                steps
            }
            _ => Vec::new(),
        };
        meal.insert("steps".to_owned(), Value::Array(steps));
    }

    *plan = draft;

    Ok(())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    };

    Ok(number)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    };

    Ok(text)
}

fn lenient_texts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let texts = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(texts)
}

/// Falls back to the default unless the value is a readable object.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(T::default());
    }

    Ok(T::deserialize(value).unwrap_or_default())
}

/// Keeps the readable items of an array; anything but an array is empty.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| T::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    };

    Ok(items)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroSet {
    #[serde(deserialize_with = "lenient_number")]
    pub protein_g: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub fat_g: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub carbs_g: f64,
}

impl MacroSet {
    /// 4 kcal per gram of protein and carbohydrate, 9 per gram of fat.
    pub fn calories(&self) -> f64 {
        self.protein_g * 4.0 + self.carbs_g * 4.0 + self.fat_g * 9.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ingredient {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_number")]
    pub quantity_grams: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meal {
    #[serde(deserialize_with = "lenient_text")]
    pub meal_type: String,
    #[serde(deserialize_with = "lenient_text")]
    pub recipe_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub short_description: String,
    #[serde(deserialize_with = "lenient_object")]
    pub macros: MacroSet,
    #[serde(deserialize_with = "lenient_list")]
    pub ingredients: Vec<Ingredient>,
    #[serde(deserialize_with = "lenient_texts")]
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Day {
    #[serde(deserialize_with = "lenient_text")]
    pub day_name: String,
    #[serde(deserialize_with = "lenient_object")]
    pub total_macros: MacroSet,
    #[serde(deserialize_with = "lenient_list")]
    pub meals: Vec<Meal>,
}

/// Typed view of a generated plan, read leniently from the provider's document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealPlan {
    #[serde(deserialize_with = "lenient_text")]
    pub plan_name: String,
    pub days: Vec<Day>,
    #[serde(deserialize_with = "lenient_texts")]
    pub shopping_list: Vec<String>,
    #[serde(deserialize_with = "lenient_texts")]
    pub general_tips: Vec<String>,
}

impl MealPlan {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// The only day that is ever rendered.
    pub fn first_day(&self) -> Option<&Day> {
        self.days.first()
    }
}
