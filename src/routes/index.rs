use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::{IntoResponse, Response},
};
use macroplan_mealplan::{
    CARBS, DIETARY_FILTER_MAX_CHARS, FAT, FRIDGE_INGREDIENTS_MAX_CHARS, IntRange, MEAL_COUNT,
    MealPlan, PROTEIN, Preferences,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::AppState;
use crate::template::render;
use crate::ui::{Action, FormState, TokenUsage, UiState};

pub const PLAN_UNREADABLE: &str = "The generated plan could not be displayed";
pub const FORM_UNREADABLE: &str = "The form could not be read. Please check the values and try again.";

#[derive(askama::Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub state: UiState,
    pub protein: IntRange,
    pub fat: IntRange,
    pub carbs: IntRange,
    pub meals: IntRange,
    pub dietary_filter_max: usize,
    pub fridge_ingredients_max: usize,
}

impl IndexTemplate {
    pub fn new(state: UiState) -> Self {
        Self {
            state,
            protein: PROTEIN,
            fat: FAT,
            carbs: CARBS,
            meals: MEAL_COUNT,
            dietary_filter_max: DIETARY_FILTER_MAX_CHARS,
            fridge_ingredients_max: FRIDGE_INGREDIENTS_MAX_CHARS,
        }
    }
}

#[derive(Deserialize)]
pub struct Submission {
    #[serde(flatten)]
    pub form: FormState,
    pub intent: Option<String>,
}

pub async fn page() -> impl IntoResponse {
    render(IndexTemplate::new(UiState::default()))
}

pub async fn action(
    State(app): State<AppState>,
    submission: Result<Form<Submission>, FormRejection>,
) -> Response {
    let Form(submission) = match submission {
        Ok(submission) => submission,
        Err(rejection) => {
            tracing::warn!(err = %rejection, "form submission rejected");

            let state = UiState::default()
                .reduce(Action::GenerateFailed(Some(FORM_UNREADABLE.to_owned())));

            return (rejection.status(), render(IndexTemplate::new(state))).into_response();
        }
    };

    let state = UiState::default().reduce(Action::UpdateForm(submission.form));

    if submission.intent.as_deref() == Some("dismiss") {
        return render(IndexTemplate::new(state.reduce(Action::DismissError)));
    }

    let state = state.reduce(Action::GenerateStarted);
    let outcome = generate(&app, &state.form).await;

    render(IndexTemplate::new(state.reduce(outcome)))
}

async fn generate(app: &AppState, form: &FormState) -> Action {
    let generated = async {
        let api_key = app.api_key()?;
        let prefs = Preferences::from_raw(&form.to_request());

        Ok::<_, ApiError>(app.generator.generate(&api_key, &prefs).await?)
    }
    .await;

    let generated = match generated {
        Ok(generated) => generated,
        Err(err) => {
            tracing::warn!(err = %err, "meal plan generation failed");

            return Action::GenerateFailed(Some(err.to_string()));
        }
    };

    match MealPlan::from_value(generated.plan) {
        Ok(plan) => Action::GenerateSucceeded {
            plan,
            usage: TokenUsage::from_value(generated.usage),
        },
        Err(err) => {
            tracing::warn!(err = %err, "generated plan has an unexpected shape");

            Action::GenerateFailed(Some(PLAN_UNREADABLE.to_owned()))
        }
    }
}
