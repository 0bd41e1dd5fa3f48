use crate::preferences::Preferences;

pub const SYSTEM_PROMPT: &str = "You are a sports nutritionist and home cook. \
Answer concisely with simple, affordable recipes and keep the output short to limit cost.";

/// Output schema the model must follow, embedded verbatim in the prompt.
const OUTPUT_SCHEMA: &str = r#"{
  "plan_name": "string",
  "days": [
    {
      "day_name": "string",
      "total_macros": { "protein_g": 0, "fat_g": 0, "carbs_g": 0 },
      "meals": [
        {
          "meal_type": "string",
          "recipe_name": "string",
          "short_description": "string",
          "macros": { "protein_g": 0, "fat_g": 0, "carbs_g": 0 },
          "ingredients": [ { "name": "string", "quantity_grams": 0 } ],
          "steps": ["string"]
        }
      ]
    }
  ],
  "shopping_list": ["string"],
  "general_tips": ["string"]
}"#;

fn or_na(value: &str) -> &str {
    if value.is_empty() { "N/A" } else { value }
}

/// Render the user prompt for a set of sanitized preferences.
///
/// Pure: identical preferences always produce identical text.
pub fn build_prompt(prefs: &Preferences) -> String {
    format!(
        "Create a one-day meal plan.\n\
         \n\
         Daily targets:\n\
         - Protein: {protein} g\n\
         - Fat: {fat} g\n\
         - Carbohydrates: {carbs} g\n\
         - Exactly {meals} meals\n\
         - Dietary restriction: {diet}\n\
         - Ingredients available at home: {fridge}\n\
         \n\
         Rules:\n\
         - Respond with JSON only. No markdown, no code fences, no text before or after the JSON.\n\
         - Use realistic, simple recipes with common ingredients.\n\
         - At most 2 short steps per dish.\n\
         - Every ingredient quantity in grams.\n\
         - Prefer the available ingredients when they fit the targets.\n\
         - The day must contain exactly {meals} meals and its totals should match the targets.\n\
         \n\
         Output JSON schema:\n\
         {schema}\n",
        protein = prefs.protein,
        fat = prefs.fat,
        carbs = prefs.carbs,
        meals = prefs.num_meals,
        diet = or_na(&prefs.dietary_filter),
        fridge = or_na(&prefs.fridge_ingredients),
        schema = OUTPUT_SCHEMA,
    )
}
