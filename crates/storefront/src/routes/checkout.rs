//! Checkout route handlers.
//!
//! The wizard for each session lives in [`crate::services::CheckoutSlots`].
//! Every step posts the whole form for that step to `/checkout/next`; the
//! shipping method radio group is part of every step's form.
//!
//! Card number and CVV inputs are never echoed back into the page. Leaving
//! them blank on a later visit to the payment step keeps the values already
//! held in memory.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use devico_core::checkout::{
    Address, COUNTRIES, CheckoutError, CheckoutWizard, CustomerInfo, FieldErrors, OrderTotals,
    PaymentInfo, ShippingMethod, Step,
};
use devico_core::{Cart, Command, Page, format_money};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Visitor;
use crate::routes::Layout;
use crate::routes::home::HomeTemplate;
use crate::services::checkout::lock;
use crate::services::{CheckoutSlot, OrderConfirmation, SubmissionGuard};
use crate::state::AppState;

/// Session key holding the confirmation shown once after an order.
pub const LAST_ORDER_KEY: &str = "last_order";

// =============================================================================
// Form Types
// =============================================================================

/// Fields of every checkout step. Each step only reads its own.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,

    pub shipping_street: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_zip_code: Option<String>,
    pub shipping_country: Option<String>,
    /// Checkbox: present only when ticked.
    pub same_as_shipping: Option<String>,
    pub billing_street: Option<String>,
    pub billing_city: Option<String>,
    pub billing_state: Option<String>,
    pub billing_zip_code: Option<String>,
    pub billing_country: Option<String>,

    pub card_number: Option<String>,
    pub expiry_date: Option<String>,
    pub cvv: Option<String>,
    pub cardholder_name: Option<String>,

    pub shipping_method: Option<String>,
}

fn text(value: Option<&String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn country(value: Option<&String>) -> String {
    let code = text(value);
    if COUNTRIES.iter().any(|(id, _)| *id == code) {
        code
    } else {
        Address::default().country
    }
}

impl CheckoutForm {
    /// Copy the current step's fields into the wizard.
    pub fn apply_to(&self, wizard: &mut CheckoutWizard) {
        if let Some(method) = self.shipping_method.as_deref().and_then(ShippingMethod::from_id) {
            wizard.set_shipping_method(method);
        }

        match wizard.step() {
            Step::CustomerInfo => wizard.apply_customer(CustomerInfo {
                first_name: text(self.first_name.as_ref()),
                last_name: text(self.last_name.as_ref()),
                email: text(self.email.as_ref()),
                phone: text(self.phone.as_ref()),
            }),
            Step::Address => {
                wizard.set_same_as_billing(self.same_as_shipping.is_some());
                let shipping = Address {
                    street: text(self.shipping_street.as_ref()),
                    city: text(self.shipping_city.as_ref()),
                    state: text(self.shipping_state.as_ref()),
                    zip_code: text(self.shipping_zip_code.as_ref()),
                    country: country(self.shipping_country.as_ref()),
                };
                let billing = Address {
                    street: text(self.billing_street.as_ref()),
                    city: text(self.billing_city.as_ref()),
                    state: text(self.billing_state.as_ref()),
                    zip_code: text(self.billing_zip_code.as_ref()),
                    country: country(self.billing_country.as_ref()),
                };
                wizard.apply_addresses(shipping, Some(billing));
            }
            Step::Payment => {
                let current = wizard.payment();
                let card_number = match self.card_number.as_deref().map(str::trim) {
                    Some(entered) if !entered.is_empty() => entered.to_string(),
                    _ => current.card_number().expose_secret().to_string(),
                };
                let cvv = match self.cvv.as_deref().map(str::trim) {
                    Some(entered) if !entered.is_empty() => entered.to_string(),
                    _ => current.cvv().expose_secret().to_string(),
                };
                let payment = PaymentInfo::from_input(
                    &card_number,
                    &text(self.expiry_date.as_ref()),
                    &cvv,
                    &text(self.cardholder_name.as_ref()),
                );
                wizard.apply_payment(payment);
            }
            Step::Review => {}
        }
    }
}

// =============================================================================
// View Models
// =============================================================================

/// One entry of the step indicator.
#[derive(Debug, Clone)]
pub struct StepView {
    pub number: u8,
    pub label: &'static str,
    pub complete: bool,
    pub current: bool,
}

/// One shipping method radio.
#[derive(Debug, Clone)]
pub struct ShippingOptionView {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price: String,
    pub selected: bool,
}

/// Order totals formatted for display.
#[derive(Debug, Clone)]
pub struct TotalsView {
    pub subtotal: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
}

impl From<OrderTotals> for TotalsView {
    fn from(totals: OrderTotals) -> Self {
        Self {
            subtotal: format_money(totals.subtotal),
            shipping: format_money(totals.shipping),
            tax: format_money(totals.tax),
            total: format_money(totals.total),
        }
    }
}

/// Snapshot of the wizard for rendering.
#[derive(Debug, Clone)]
pub struct WizardView {
    pub step: u8,
    pub steps: Vec<StepView>,
    pub customer: CustomerInfo,
    pub shipping: Address,
    pub billing: Address,
    pub same_as_shipping: bool,
    pub has_card: bool,
    pub masked_card: String,
    pub expiry_date: String,
    pub cardholder_name: String,
    pub shipping_method: &'static str,
    pub shipping_options: Vec<ShippingOptionView>,
    pub totals: TotalsView,
    pub submitting: bool,
}

impl WizardView {
    #[must_use]
    pub fn new(wizard: &CheckoutWizard, cart: &Cart) -> Self {
        let current = wizard.step();
        let method = wizard.shipping_method();
        Self {
            step: current.number(),
            steps: Step::ALL
                .into_iter()
                .map(|step| StepView {
                    number: step.number(),
                    label: step.label(),
                    complete: step.number() < current.number(),
                    current: step == current,
                })
                .collect(),
            customer: wizard.customer().clone(),
            shipping: wizard.shipping_address().clone(),
            billing: wizard.billing_address().clone(),
            same_as_shipping: wizard.use_same_as_billing(),
            has_card: wizard.payment().has_card_number(),
            masked_card: wizard.payment().masked_card_number(),
            expiry_date: wizard.payment().expiry_date.clone(),
            cardholder_name: wizard.payment().cardholder_name.clone(),
            shipping_method: method.name(),
            shipping_options: ShippingMethod::ALL
                .into_iter()
                .map(|option| ShippingOptionView {
                    id: option.id(),
                    name: option.name(),
                    description: option.description(),
                    price: format_money(option.price()),
                    selected: option == method,
                })
                .collect(),
            totals: wizard.totals(cart).into(),
            submitting: wizard.is_submitting(),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    /// `None` when the cart is empty.
    pub wizard: Option<WizardView>,
    pub countries: &'static [(&'static str, &'static str)],
    pub errors: FieldErrors,
}

impl CheckoutTemplate {
    fn empty(state: &AppState, visitor: &Visitor, errors: FieldErrors) -> Self {
        Self {
            layout: Layout::new(state, visitor),
            wizard: None,
            countries: &COUNTRIES,
            errors,
        }
    }

    fn new(state: &AppState, visitor: &Visitor, wizard: &CheckoutWizard) -> Self {
        Self {
            layout: Layout::new(state, visitor),
            wizard: Some(WizardView::new(wizard, visitor.app.cart())),
            countries: &COUNTRIES,
            errors: wizard.errors().clone(),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// The visitor's wizard, created from their store on first use.
async fn slot_for(state: &AppState, visitor: &mut Visitor) -> Result<(String, CheckoutSlot)> {
    let session_id = visitor.session_id().await?;
    let slot = state
        .checkouts()
        .get_or_hydrate(&session_id, visitor.app.store_mut())
        .await;
    Ok((session_id, slot))
}

fn to_checkout(state: &AppState) -> Redirect {
    Redirect::to(&state.base().href(Page::Checkout))
}

// =============================================================================
// Routes
// =============================================================================

/// Display the current checkout step, or the empty-cart state.
#[instrument(skip(state, visitor))]
pub async fn show(State(state): State<AppState>, mut visitor: Visitor) -> Result<CheckoutTemplate> {
    if visitor.app.cart().is_empty() {
        // A failed order leaves its banner on the wizard
        let errors = match visitor.session().id() {
            Some(id) => match state.checkouts().get(&id.to_string()).await {
                Some(slot) => lock(&slot).errors().clone(),
                None => FieldErrors::new(),
            },
            None => FieldErrors::new(),
        };
        return Ok(CheckoutTemplate::empty(&state, &visitor, errors));
    }

    let (_, slot) = slot_for(&state, &mut visitor).await?;
    let page = CheckoutTemplate::new(&state, &visitor, &lock(&slot));
    visitor.commit().await?;
    Ok(page)
}

/// Save the current step's form and advance if it validates.
#[instrument(skip(state, visitor, form))]
pub async fn next(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    if visitor.app.cart().is_empty() {
        return Ok(to_checkout(&state).into_response());
    }

    let (_, slot) = slot_for(&state, &mut visitor).await?;
    let (outcome, page) = {
        let mut wizard = lock(&slot);
        form.apply_to(&mut wizard);
        let outcome = wizard.next();
        wizard.persist(visitor.app.store_mut());
        let page = outcome
            .is_err()
            .then(|| CheckoutTemplate::new(&state, &visitor, &wizard));
        (outcome, page)
    };
    visitor.commit().await?;

    match (outcome, page) {
        (Ok(step), _) => {
            debug!(%step, "checkout advanced");
            Ok(to_checkout(&state).into_response())
        }
        (Err(CheckoutError::Invalid { .. }), Some(page)) => {
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        (Err(err), _) => {
            debug!(error = %err, "checkout step refused");
            Ok(to_checkout(&state).into_response())
        }
    }
}

/// Go back one step.
#[instrument(skip(state, visitor))]
pub async fn previous(State(state): State<AppState>, mut visitor: Visitor) -> Result<Redirect> {
    if !visitor.app.cart().is_empty() {
        let (_, slot) = slot_for(&state, &mut visitor).await?;
        lock(&slot).previous();
        visitor.commit().await?;
    }
    Ok(to_checkout(&state))
}

/// Place the order.
///
/// The loading flag is raised under the lock, the lock is released for the
/// simulated processing time, then the outcome is applied. If the wizard
/// was replaced or evicted meanwhile, the outcome is dropped.
#[instrument(skip(state, visitor))]
pub async fn place_order(State(state): State<AppState>, mut visitor: Visitor) -> Result<Response> {
    if visitor.app.cart().is_empty() {
        return Ok(to_checkout(&state).into_response());
    }

    let (session_id, slot) = slot_for(&state, &mut visitor).await?;
    let begun = lock(&slot).begin_submission();
    if let Err(err) = begun {
        debug!(error = %err, "order submission refused");
        let status = match err {
            CheckoutError::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::CONFLICT,
        };
        let page = CheckoutTemplate::new(&state, &visitor, &lock(&slot));
        return Ok((status, page).into_response());
    }

    let mut guard = SubmissionGuard::new(Arc::clone(&slot));
    add_breadcrumb("checkout", "Placing order", None);
    state.orders().process().await;

    if !state.checkouts().is_current(&session_id, &slot).await {
        warn!("checkout was reset while the order was processing");
        return Ok(to_checkout(&state).into_response());
    }

    // The cart may have changed in another request while this one waited
    visitor.reload(&state).await?;

    let placed = {
        let mut wizard = lock(&slot);
        let cart = visitor.app.cart();
        let placed = state
            .orders()
            .place(cart, &wizard.totals(cart), &wizard.customer().email);
        match &placed {
            Ok(_) => {
                if let Err(err) = wizard.complete_submission() {
                    warn!(error = %err, "order completed without a submission");
                }
            }
            Err(err) => {
                warn!(error = %err, "order failed");
                wizard.fail_submission();
            }
        }
        placed
    };
    guard.disarm();

    let Ok(confirmation) = placed else {
        return Ok(to_checkout(&state).into_response());
    };

    visitor.app.dispatch(Command::OrderCompleted);
    visitor.commit().await?;
    state.checkouts().invalidate(&session_id).await;
    visitor
        .session()
        .insert(LAST_ORDER_KEY, &confirmation)
        .await?;

    let complete = state.base().join("/checkout/complete");
    Ok(Redirect::to(&complete).into_response())
}

/// Show the confirmation for the order just placed, once.
#[instrument(skip(state, visitor))]
pub async fn complete(State(state): State<AppState>, visitor: Visitor) -> Result<Response> {
    let confirmation: Option<OrderConfirmation> = visitor
        .session()
        .remove(LAST_ORDER_KEY)
        .await?;

    let Some(confirmation) = confirmation else {
        return Ok(Redirect::to(&state.base().href(Page::Home)).into_response());
    };

    let mut page = HomeTemplate::new(&state, &visitor, None);
    page.layout.notice = Some(devico_core::app::ORDER_PLACED_MESSAGE);
    page.confirmation = Some(confirmation);
    Ok(page.into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use devico_core::checkout::field;

    use super::*;

    fn customer_form() -> CheckoutForm {
        CheckoutForm {
            first_name: Some(" Ada ".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("555-0100".to_string()),
            shipping_method: Some("express".to_string()),
            ..CheckoutForm::default()
        }
    }

    #[test]
    fn test_customer_step_applies_and_trims() {
        let mut wizard = CheckoutWizard::new();
        customer_form().apply_to(&mut wizard);
        assert_eq!(wizard.customer().first_name, "Ada");
        assert_eq!(wizard.shipping_method(), ShippingMethod::Express);
        assert_eq!(wizard.next().unwrap(), Step::Address);
    }

    #[test]
    fn test_unknown_shipping_method_is_ignored() {
        let mut wizard = CheckoutWizard::new();
        CheckoutForm {
            shipping_method: Some("teleport".to_string()),
            ..CheckoutForm::default()
        }
        .apply_to(&mut wizard);
        assert_eq!(wizard.shipping_method(), ShippingMethod::Standard);
    }

    #[test]
    fn test_address_step_checkbox_and_country() {
        let mut wizard = CheckoutWizard::new();
        customer_form().apply_to(&mut wizard);
        wizard.next().unwrap();

        CheckoutForm {
            shipping_street: Some("1 Loom Lane".to_string()),
            shipping_city: Some("Toronto".to_string()),
            shipping_state: Some("ON".to_string()),
            shipping_zip_code: Some("M5V".to_string()),
            shipping_country: Some("CA".to_string()),
            billing_country: Some("XX".to_string()),
            ..CheckoutForm::default()
        }
        .apply_to(&mut wizard);

        assert!(!wizard.use_same_as_billing());
        assert_eq!(wizard.shipping_address().country, "CA");
        assert_eq!(wizard.billing_address().country, "US");
        let err = wizard.next().unwrap_err();
        let CheckoutError::Invalid { errors, .. } = err else {
            panic!("expected validation errors");
        };
        assert!(errors.get(field::BILLING_STREET).is_some());
        assert!(errors.get(field::SHIPPING_STREET).is_none());
    }

    #[test]
    fn test_blank_card_fields_keep_values_in_memory() {
        let mut wizard = CheckoutWizard::new();
        customer_form().apply_to(&mut wizard);
        wizard.next().unwrap();
        CheckoutForm {
            shipping_street: Some("1 Loom Lane".to_string()),
            shipping_city: Some("London".to_string()),
            shipping_state: Some("LN".to_string()),
            shipping_zip_code: Some("10001".to_string()),
            same_as_shipping: Some("on".to_string()),
            ..CheckoutForm::default()
        }
        .apply_to(&mut wizard);
        wizard.next().unwrap();

        let payment = CheckoutForm {
            card_number: Some("4242424242424242".to_string()),
            expiry_date: Some("1228".to_string()),
            cvv: Some("123".to_string()),
            cardholder_name: Some("Ada Lovelace".to_string()),
            ..CheckoutForm::default()
        };
        payment.apply_to(&mut wizard);
        assert_eq!(wizard.next().unwrap(), Step::Review);
        wizard.previous();

        CheckoutForm {
            expiry_date: Some("01/29".to_string()),
            cardholder_name: Some("Ada Lovelace".to_string()),
            ..CheckoutForm::default()
        }
        .apply_to(&mut wizard);
        assert_eq!(
            wizard.payment().card_number().expose_secret(),
            "4242 4242 4242 4242"
        );
        assert_eq!(wizard.payment().expiry_date, "01/29");
        assert_eq!(wizard.next().unwrap(), Step::Review);
    }

    #[test]
    fn test_wizard_view_marks_steps() {
        let mut wizard = CheckoutWizard::new();
        customer_form().apply_to(&mut wizard);
        wizard.next().unwrap();

        let view = WizardView::new(&wizard, &Cart::new());
        assert_eq!(view.step, 2);
        let flags: Vec<(bool, bool)> = view.steps.iter().map(|s| (s.complete, s.current)).collect();
        assert_eq!(
            flags,
            vec![(true, false), (false, true), (false, false), (false, false)]
        );
        assert_eq!(view.shipping_options.iter().filter(|o| o.selected).count(), 1);
        assert_eq!(view.totals.total, "$15.00");
    }
}
