//! Application state container.
//!
//! [`Storefront`] owns everything shared between views: the cart, the
//! navigation history, overlay visibility and the persistent store. Views
//! read it by reference and change it only through [`Command`]s; side
//! effects the view layer must carry out come back as [`Effect`]s.
//!
//! # Server and client views
//!
//! A server-rendered view rebuilds the container for every request and
//! renders the resulting state, so it may drop the returned effects: the
//! next page load already scrolls to the top, and the `scroll-locked` and
//! `data-snap-active` markers are rendered from the state itself.
//!
//! [`Command::Back`], [`Command::Forward`], [`Command::PopState`],
//! [`Command::ViewCart`] and [`Command::CloseOverlays`] are only raised by an
//! in-page client (history buttons, the "view cart" action inside the
//! checkout, the escape key). Such a client must apply every [`Effect`].

use tracing::debug;

use crate::cart::Cart;
use crate::catalog::Product;
use crate::navigation::{BasePath, History, Page, Transition};
use crate::storage::{PersistentStore, Storage};
use crate::types::ProductId;

/// Banner shown after an order is placed.
pub const ORDER_PLACED_MESSAGE: &str =
    "Order placed successfully! You will receive a confirmation email shortly.";

/// Visibility of the menu, the cart drawer and the empty-cart dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlays {
    pub menu_open: bool,
    pub cart_open: bool,
    pub confirm_empty_cart: bool,
}

/// Named state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddToCart(Product),
    UpdateQuantity { id: ProductId, quantity: u32 },
    RemoveItem(ProductId),
    /// Ask for confirmation before emptying the cart.
    RequestEmptyCart,
    ConfirmEmptyCart,
    CancelEmptyCart,
    Navigate(Page),
    /// Home with the cart drawer open.
    ViewCart,
    Back,
    Forward,
    /// The browser changed the URL on its own.
    PopState(String),
    ToggleMenu,
    ToggleCart,
    CloseOverlays,
    /// Checkout finished: empty the cart and go home.
    OrderCompleted,
}

/// Side effects for the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ScrollToTop,
    /// Body scrolling is locked while the menu is open.
    ScrollLocked(bool),
    /// Section snapping follows the home page.
    SnapActive(bool),
    OrderPlaced,
}

/// Per-visitor application state.
#[derive(Debug)]
pub struct Storefront<S> {
    cart: Cart,
    history: History,
    overlays: Overlays,
    store: PersistentStore<S>,
}

impl<S: Storage> Storefront<S> {
    /// Restore a visitor's state from `storage`, starting at `url`.
    pub fn new(storage: S, base: BasePath, url: &str) -> Self {
        let mut store = PersistentStore::new(storage);
        let cart = store.load_cart();
        Self {
            cart,
            history: History::new(base, url),
            overlays: Overlays::default(),
            store,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn page(&self) -> Page {
        self.history.current()
    }

    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub const fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    /// The persistent store, for components that mirror their own keys.
    pub fn store_mut(&mut self) -> &mut PersistentStore<S> {
        &mut self.store
    }

    /// Hand the storage backend back to the caller.
    pub fn into_storage(self) -> S {
        self.store.into_storage()
    }

    /// Apply a command.
    pub fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        debug!(?command, "dispatch");
        let menu_was_open = self.overlays.menu_open;
        let mut effects = Vec::new();

        match command {
            Command::AddToCart(product) => {
                self.cart.add(&product);
                self.store.save_cart(&self.cart);
            }
            Command::UpdateQuantity { id, quantity } => {
                self.cart.update_quantity(id, quantity);
                self.store.save_cart(&self.cart);
            }
            Command::RemoveItem(id) => {
                self.cart.remove(id);
                self.store.save_cart(&self.cart);
            }
            Command::RequestEmptyCart => self.overlays.confirm_empty_cart = true,
            Command::ConfirmEmptyCart => {
                self.cart.clear();
                self.store.save_cart(&self.cart);
                self.overlays.confirm_empty_cart = false;
            }
            Command::CancelEmptyCart => self.overlays.confirm_empty_cart = false,
            Command::Navigate(page) => {
                self.overlays.menu_open = false;
                if page == Page::Checkout {
                    self.overlays.cart_open = false;
                }
                let transition = self.history.navigate(page);
                push_transition(&mut effects, transition);
            }
            Command::ViewCart => {
                let transition = self.history.navigate(Page::Home);
                self.overlays.cart_open = true;
                push_transition(&mut effects, transition);
            }
            Command::Back => {
                if let Some(transition) = self.history.back() {
                    push_transition(&mut effects, transition);
                }
            }
            Command::Forward => {
                if let Some(transition) = self.history.forward() {
                    push_transition(&mut effects, transition);
                }
            }
            Command::PopState(url) => {
                let transition = self.history.pop_state(&url);
                push_transition(&mut effects, transition);
            }
            Command::ToggleMenu => {
                self.overlays.menu_open = !self.overlays.menu_open;
                if self.overlays.menu_open {
                    self.overlays.cart_open = false;
                }
            }
            Command::ToggleCart => {
                self.overlays.cart_open = !self.overlays.cart_open;
                if self.overlays.cart_open {
                    self.overlays.menu_open = false;
                }
            }
            Command::CloseOverlays => {
                self.overlays.menu_open = false;
                self.overlays.cart_open = false;
            }
            Command::OrderCompleted => {
                self.cart.clear();
                self.store.save_cart(&self.cart);
                let transition = self.history.navigate(Page::Home);
                push_transition(&mut effects, transition);
                effects.push(Effect::OrderPlaced);
            }
        }

        if self.overlays.menu_open != menu_was_open {
            effects.push(Effect::ScrollLocked(self.overlays.menu_open));
        }
        effects
    }
}

fn push_transition(effects: &mut Vec<Effect>, transition: Transition) {
    if transition.from == transition.to {
        return;
    }
    effects.push(Effect::ScrollToTop);
    if transition.enters(Page::Home) {
        effects.push(Effect::SnapActive(true));
    } else if transition.leaves(Page::Home) {
        effects.push(Effect::SnapActive(false));
    }
}
