//! Page state for the meal-plan form.
//!
//! The page holds one [`UiState`]. Every user action is an [`Action`] applied
//! through [`UiState::reduce`], which consumes the old state and returns the
//! next one. Rendering reads the state and nothing else.

use macroplan_mealplan::{CARBS, Day, FAT, MEAL_COUNT, MealPlan, PROTEIN};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const GENERIC_ERROR: &str = "Could not reach the meal plan service. Please try again.";

fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(value.as_deref(), Some(v) if !v.is_empty() && v != "off"))
}

/// Raw form fields as the user typed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    #[serde(default)]
    pub protein: String,
    #[serde(default)]
    pub fat: String,
    #[serde(default)]
    pub carbs: String,
    #[serde(default)]
    pub num_meals: String,
    #[serde(default)]
    pub dietary_filter: String,
    #[serde(default)]
    pub fridge_ingredients: String,
    #[serde(default, deserialize_with = "checkbox")]
    pub use_fridge: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            protein: PROTEIN.default.to_string(),
            fat: FAT.default.to_string(),
            carbs: CARBS.default.to_string(),
            num_meals: MEAL_COUNT.default.to_string(),
            dietary_filter: String::new(),
            fridge_ingredients: String::new(),
            use_fridge: false,
        }
    }
}

fn grams(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n > 0.0)
        .unwrap_or_default()
}

impl FormState {
    /// Calories implied by the current macro targets.
    pub fn calories(&self) -> i64 {
        let kcal = grams(&self.protein) * 4.0 + grams(&self.carbs) * 4.0 + grams(&self.fat) * 9.0;
        kcal.round() as i64
    }

    /// Request body for the generation endpoint.
    ///
    /// Fridge ingredients are only sent when the user opted in.
    pub fn to_request(&self) -> Value {
        let mut body = Map::new();
        body.insert("protein".to_owned(), Value::from(self.protein.as_str()));
        body.insert("fat".to_owned(), Value::from(self.fat.as_str()));
        body.insert("carbs".to_owned(), Value::from(self.carbs.as_str()));
        body.insert("numMeals".to_owned(), Value::from(self.num_meals.as_str()));
        body.insert(
            "dietaryFilter".to_owned(),
            Value::from(self.dietary_filter.as_str()),
        );
        if self.use_fridge {
            body.insert(
                "fridgeIngredients".to_owned(),
                Value::from(self.fridge_ingredients.as_str()),
            );
        }

        Value::Object(body)
    }
}

/// Token counters reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenUsage {
    pub prompt_token_count: Option<u64>,
    pub candidates_token_count: Option<u64>,
    pub total_token_count: Option<u64>,
}

impl TokenUsage {
    pub fn from_value(value: Option<Value>) -> Option<Self> {
        let usage: Self = serde_json::from_value(value?).ok()?;
        (usage != Self::default()).then_some(usage)
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    UpdateForm(FormState),
    GenerateStarted,
    GenerateSucceeded {
        plan: MealPlan,
        usage: Option<TokenUsage>,
    },
    /// Carries the service's message when it gave one.
    GenerateFailed(Option<String>),
    DismissError,
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub form: FormState,
    pub loading: bool,
    pub error: Option<String>,
    pub plan: Option<MealPlan>,
    pub usage: Option<TokenUsage>,
}

impl UiState {
    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::UpdateForm(form) => Self { form, ..self },
            // one request in flight at a time
            Action::GenerateStarted if self.loading => self,
            Action::GenerateStarted => Self {
                loading: true,
                error: None,
                ..self
            },
            Action::GenerateSucceeded { plan, usage } => Self {
                loading: false,
                error: None,
                plan: Some(plan),
                usage,
                ..self
            },
            Action::GenerateFailed(message) => {
                let message = message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_ERROR.to_owned());

                Self {
                    loading: false,
                    error: Some(message),
                    ..self
                }
            }
            Action::DismissError => Self {
                error: None,
                ..self
            },
        }
    }

    pub fn first_day(&self) -> Option<&Day> {
        self.plan.as_ref().and_then(MealPlan::first_day)
    }

    pub fn shopping_list(&self) -> &[String] {
        self.plan
            .as_ref()
            .map(|plan| plan.shopping_list.as_slice())
            .unwrap_or_default()
    }

    pub fn tips(&self) -> &[String] {
        self.plan
            .as_ref()
            .map(|plan| plan.general_tips.as_slice())
            .unwrap_or_default()
    }
}
