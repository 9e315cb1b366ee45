//! Sign-in and sign-up route handlers.
//!
//! Both flows are simulated: the forms are validated, the configured delay
//! is waited out, and no account is stored.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use devico_core::Page;
use devico_core::auth::{PasswordStrength, SignInForm, SignUpForm};
use devico_core::checkout::FieldErrors;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::Visitor;
use crate::routes::{Layout, with_query};
use crate::state::AppState;

/// Banner shown on the sign-in page after registering.
pub const REGISTERED_MESSAGE: &str = "Account created successfully! Please sign in.";

// =============================================================================
// Form Types
// =============================================================================

/// Sign-in form data.
#[derive(Debug, Default, Deserialize)]
pub struct SignInInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Checkbox: present only when ticked.
    pub remember_me: Option<String>,
}

impl From<SignInInput> for SignInForm {
    fn from(input: SignInInput) -> Self {
        Self {
            email: input.email,
            password: SecretString::from(input.password),
            remember_me: input.remember_me.is_some(),
        }
    }
}

/// Sign-up form data.
#[derive(Debug, Default, Deserialize)]
pub struct SignUpInput {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    pub accept_terms: Option<String>,
    pub subscribe_newsletter: Option<String>,
}

impl From<SignUpInput> for SignUpForm {
    fn from(input: SignUpInput) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            password: SecretString::from(input.password),
            confirm_password: SecretString::from(input.confirm_password),
            accept_terms: input.accept_terms.is_some(),
            subscribe_newsletter: input.subscribe_newsletter.is_some(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "signin.html")]
pub struct SignInTemplate {
    pub layout: Layout,
    pub email: String,
    pub remember_me: bool,
    pub errors: FieldErrors,
}

/// Sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
pub struct SignUpTemplate {
    pub layout: Layout,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub accept_terms: bool,
    pub subscribe_newsletter: bool,
    pub strength: Option<PasswordStrength>,
    pub errors: FieldErrors,
}

impl SignUpTemplate {
    fn new(layout: Layout, form: &SignUpForm, errors: FieldErrors) -> Self {
        let strength =
            (!form.password.expose_secret().is_empty()).then(|| form.password_strength());
        Self {
            layout,
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            email: form.email.clone(),
            accept_terms: form.accept_terms,
            subscribe_newsletter: form.subscribe_newsletter,
            strength,
            errors,
        }
    }
}

// =============================================================================
// Sign In
// =============================================================================

/// Display the sign-in page.
#[instrument(skip(state, visitor))]
pub async fn signin_page(State(state): State<AppState>, visitor: Visitor) -> SignInTemplate {
    SignInTemplate {
        layout: Layout::new(&state, &visitor),
        email: String::new(),
        remember_me: false,
        errors: FieldErrors::new(),
    }
}

/// Validate the sign-in form, wait, then go home.
#[instrument(skip(state, visitor, input))]
pub async fn signin(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(input): Form<SignInInput>,
) -> Response {
    let form = SignInForm::from(input);
    let errors = form.validate();
    if !errors.is_empty() {
        let page = SignInTemplate {
            layout: Layout::new(&state, &visitor),
            email: form.email,
            remember_me: form.remember_me,
            errors,
        };
        return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
    }

    tokio::time::sleep(state.config().signin_delay).await;
    add_breadcrumb("auth", "Signed in", None);
    info!("visitor signed in");

    Redirect::to(&state.base().href(Page::Home)).into_response()
}

// =============================================================================
// Sign Up
// =============================================================================

/// Display the sign-up page.
#[instrument(skip(state, visitor))]
pub async fn signup_page(State(state): State<AppState>, visitor: Visitor) -> SignUpTemplate {
    SignUpTemplate::new(
        Layout::new(&state, &visitor),
        &SignUpForm::default(),
        FieldErrors::new(),
    )
}

/// Validate the sign-up form, wait, then send the visitor to sign in.
#[instrument(skip(state, visitor, input))]
pub async fn signup(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(input): Form<SignUpInput>,
) -> Response {
    let form = SignUpForm::from(input);
    let errors = form.validate();
    if !errors.is_empty() {
        let page = SignUpTemplate::new(Layout::new(&state, &visitor), &form, errors);
        return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
    }

    tokio::time::sleep(state.config().signup_delay).await;
    add_breadcrumb("auth", "Registered", None);
    info!(newsletter = form.subscribe_newsletter, "visitor registered");

    let signin = with_query(&state.base().href(Page::SignIn), "notice=registered");
    Redirect::to(&signin).into_response()
}
