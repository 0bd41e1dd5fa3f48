use macroplan_mealplan::{Preferences, SYSTEM_PROMPT, build_prompt};
use serde_json::{Map, Value};

/// Raw preference values as given on the command line.
#[derive(Debug, Default, Clone)]
pub struct PromptArgs {
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbs: Option<f64>,
    pub meals: Option<f64>,
    pub diet: Option<String>,
    pub fridge: Option<String>,
}

impl PromptArgs {
    /// Same coercion as the HTTP endpoint, so out-of-range values are clamped.
    pub fn preferences(&self) -> Preferences {
        let mut raw = Map::new();
        let numbers = [
            ("protein", self.protein),
            ("fat", self.fat),
            ("carbs", self.carbs),
            ("numMeals", self.meals),
        ];
        for (key, value) in numbers {
            if let Some(value) = value.and_then(serde_json::Number::from_f64) {
                raw.insert(key.to_owned(), Value::Number(value));
            }
        }
        if let Some(diet) = &self.diet {
            raw.insert("dietaryFilter".to_owned(), Value::from(diet.as_str()));
        }
        if let Some(fridge) = &self.fridge {
            raw.insert("fridgeIngredients".to_owned(), Value::from(fridge.as_str()));
        }

        Preferences::from_raw(&Value::Object(raw))
    }
}

/// System instruction and user prompt, separated by a blank line.
pub fn render_prompt(args: &PromptArgs) -> String {
    format!("{SYSTEM_PROMPT}\n\n{}", build_prompt(&args.preferences()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_args_are_clamped() {
        let args = PromptArgs {
            protein: Some(999.0),
            meals: Some(1.0),
            diet: Some("  vegan ".to_owned()),
            ..PromptArgs::default()
        };

        let prefs = args.preferences();

        assert_eq!(prefs.protein, 300);
        assert_eq!(prefs.num_meals, 2);
        assert_eq!(prefs.fat, 70);
        assert_eq!(prefs.dietary_filter, "vegan");
        assert_eq!(prefs.fridge_ingredients, "");
    }

    #[test]
    fn test_render_prompt_contains_both_parts() {
        let text = render_prompt(&PromptArgs::default());

        assert!(text.starts_with(SYSTEM_PROMPT));
        assert!(text.contains("Protein: 160 g"));
        assert!(text.contains("Dietary restriction: N/A"));
    }
}
