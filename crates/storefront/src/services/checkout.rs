//! In-memory checkout wizards, one per visitor session.
//!
//! Card data never leaves this cache: the persistent store only ever sees
//! the non-sensitive parts of a wizard (see [`CheckoutWizard::persist`]).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use devico_core::{CheckoutWizard, PersistentStore, Storage};
use moka::future::Cache;
use tracing::debug;

/// How long an untouched wizard is kept.
pub const CHECKOUT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A visitor's wizard. The mutex is never held across an `.await`.
pub type CheckoutSlot = Arc<Mutex<CheckoutWizard>>;

/// Lock a slot, recovering the wizard if a previous holder panicked.
pub fn lock(slot: &CheckoutSlot) -> MutexGuard<'_, CheckoutWizard> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Checkout wizards keyed by session id.
#[derive(Clone)]
pub struct CheckoutSlots {
    cache: Cache<String, CheckoutSlot>,
}

impl CheckoutSlots {
    /// Create an empty cache with the given idle expiry.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_idle(idle)
            .build();
        Self { cache }
    }

    /// The visitor's wizard, hydrated from their store on first use.
    pub async fn get_or_hydrate<S: Storage>(
        &self,
        session_id: &str,
        store: &mut PersistentStore<S>,
    ) -> CheckoutSlot {
        if let Some(slot) = self.cache.get(session_id).await {
            return slot;
        }
        debug!(session_id, "hydrating checkout wizard");
        let slot = Arc::new(Mutex::new(CheckoutWizard::hydrate(store)));
        self.cache
            .insert(session_id.to_string(), Arc::clone(&slot))
            .await;
        slot
    }

    /// The session's wizard, if one is cached.
    pub async fn get(&self, session_id: &str) -> Option<CheckoutSlot> {
        self.cache.get(session_id).await
    }

    /// Whether `slot` is still the wizard registered for this session.
    pub async fn is_current(&self, session_id: &str, slot: &CheckoutSlot) -> bool {
        self.cache
            .get(session_id)
            .await
            .is_some_and(|current| Arc::ptr_eq(&current, slot))
    }

    /// Drop the session's wizard; the next visit starts again at step 1.
    pub async fn invalidate(&self, session_id: &str) {
        self.cache.invalidate(session_id).await;
    }
}

impl Default for CheckoutSlots {
    fn default() -> Self {
        Self::new(CHECKOUT_IDLE_TIMEOUT)
    }
}

/// Clears the wizard's loading flag if an order submission is abandoned.
///
/// Armed when a submission begins; the handler disarms it once the
/// submission is resolved either way.
pub struct SubmissionGuard {
    slot: CheckoutSlot,
    armed: bool,
}

impl SubmissionGuard {
    #[must_use]
    pub const fn new(slot: CheckoutSlot) -> Self {
        Self { slot, armed: true }
    }

    pub const fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        if self.armed {
            debug!("order submission abandoned");
            lock(&self.slot).abandon_submission();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use devico_core::MemoryStorage;
    use devico_core::checkout::{Address, CustomerInfo, PaymentInfo, Step};
    use devico_core::storage::keys;

    use super::*;

    fn store_with_customer() -> PersistentStore<MemoryStorage> {
        let mut store = PersistentStore::new(MemoryStorage::new());
        store.save(
            keys::CHECKOUT_CUSTOMER,
            &CustomerInfo {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "555-0100".to_string(),
            },
        );
        store
    }

    #[tokio::test]
    async fn test_slot_is_hydrated_once() {
        let slots = CheckoutSlots::default();
        let mut store = store_with_customer();

        let first = slots.get_or_hydrate("abc", &mut store).await;
        assert_eq!(lock(&first).customer().first_name, "Ada");
        lock(&first).next().unwrap();

        let second = slots.get_or_hydrate("abc", &mut store).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(lock(&second).step(), Step::Address);
    }

    #[tokio::test]
    async fn test_invalidate_replaces_slot() {
        let slots = CheckoutSlots::default();
        let mut store = store_with_customer();

        let first = slots.get_or_hydrate("abc", &mut store).await;
        assert!(slots.is_current("abc", &first).await);

        slots.invalidate("abc").await;
        assert!(!slots.is_current("abc", &first).await);

        let second = slots.get_or_hydrate("abc", &mut store).await;
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(lock(&second).step(), Step::CustomerInfo);
    }

    fn wizard_on_review() -> CheckoutWizard {
        let mut wizard = CheckoutWizard::new();
        wizard.apply_customer(CustomerInfo {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
        });
        wizard.next().unwrap();
        wizard.set_same_as_billing(true);
        wizard.apply_addresses(
            Address {
                street: "1 Loom Lane".to_string(),
                city: "London".to_string(),
                state: "LN".to_string(),
                zip_code: "10001".to_string(),
                ..Address::default()
            },
            None,
        );
        wizard.next().unwrap();
        wizard.apply_payment(PaymentInfo::from_input(
            "4242424242424242",
            "1228",
            "123",
            "Ada Lovelace",
        ));
        wizard.next().unwrap();
        wizard
    }

    #[test]
    fn test_guard_clears_loading_flag_on_drop() {
        let slot: CheckoutSlot = Arc::new(Mutex::new(wizard_on_review()));
        lock(&slot).begin_submission().unwrap();

        drop(SubmissionGuard::new(Arc::clone(&slot)));
        assert!(!lock(&slot).is_submitting());
    }

    #[test]
    fn test_disarmed_guard_leaves_wizard_alone() {
        let slot: CheckoutSlot = Arc::new(Mutex::new(wizard_on_review()));
        lock(&slot).begin_submission().unwrap();

        let mut guard = SubmissionGuard::new(Arc::clone(&slot));
        guard.disarm();
        drop(guard);
        assert!(lock(&slot).is_submitting());
    }
}
