//! Per-visitor application state, restored from the session.
//!
//! The visitor's "local storage" is a string map kept in their session under
//! [`LOCAL_STORAGE_KEY`]. Each request rebuilds a [`Storefront`] from it and
//! handlers that change state write it back with [`Visitor::commit`].

use std::collections::BTreeMap;

use axum::extract::{FromRequestParts, OriginalUri, Query};
use axum::http::request::Parts;
use devico_core::{Command, MemoryStorage, Storefront};
use serde::Deserialize;
use tower_sessions::{Session, SessionStore};

use crate::error::AppError;
use crate::state::AppState;

/// Session key holding the visitor's storage map.
pub const LOCAL_STORAGE_KEY: &str = "local_storage";

/// Upper bound on a visitor's stored bytes.
pub const STORAGE_QUOTA_BYTES: usize = 64 * 1024;

/// Overlay flags carried in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct OverlayQuery {
    pub cart: Option<String>,
    pub menu: Option<String>,
    pub dialog: Option<String>,
    pub notice: Option<String>,
}

impl OverlayQuery {
    fn commands(&self) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.menu.as_deref() == Some("open") {
            commands.push(Command::ToggleMenu);
        }
        if self.cart.as_deref() == Some("open") {
            commands.push(Command::ToggleCart);
        }
        if self.dialog.as_deref() == Some("empty-cart") {
            commands.push(Command::RequestEmptyCart);
        }
        commands
    }
}

/// Extractor for the current visitor's [`Storefront`].
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut visitor: Visitor) -> Result<Redirect> {
///     visitor.app.dispatch(Command::ConfirmEmptyCart);
///     visitor.commit().await?;
///     Ok(Redirect::to("/"))
/// }
/// ```
pub struct Visitor {
    pub app: Storefront<MemoryStorage>,
    /// Full request path, including the base path.
    pub path: String,
    pub query: OverlayQuery,
    session: Session,
}

impl Visitor {
    /// Write the visitor's storage back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn commit(&mut self) -> Result<(), AppError> {
        let entries = self.app.store_mut().storage().entries().clone();
        self.session.insert(LOCAL_STORAGE_KEY, entries).await?;
        Ok(())
    }

    /// The session id, saving a fresh session first so it has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn session_id(&self) -> Result<String, AppError> {
        if self.session.id().is_none() {
            self.session.save().await?;
        }
        self.session
            .id()
            .map(|id| id.to_string())
            .ok_or_else(|| AppError::Internal("session has no id after save".to_string()))
    }

    /// Rebuild the visitor's state from what the session store holds now,
    /// picking up writes from the visitor's other requests.
    ///
    /// The request's own session copy is loaded once, so this goes to the
    /// store directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn reload(&mut self, state: &AppState) -> Result<(), AppError> {
        let Some(id) = self.session.id() else {
            return Ok(());
        };
        let entries = state
            .sessions()
            .load(&id)
            .await?
            .and_then(|mut record| record.data.remove(LOCAL_STORAGE_KEY))
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default();
        self.app = Storefront::new(storage_from(entries), state.base().clone(), &self.path);
        Ok(())
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

impl FromRequestParts<AppState> for Visitor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let entries: BTreeMap<String, String> = session
            .get(LOCAL_STORAGE_KEY)
            .await?
            .unwrap_or_default();
        let storage = storage_from(entries);

        // Nested routers see a stripped URI
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.clone(), |original| original.0.clone());
        let query = Query::<OverlayQuery>::try_from_uri(&uri)
            .map(|Query(query)| query)
            .unwrap_or_default();

        let mut app = Storefront::new(storage, state.base().clone(), uri.path());
        for command in query.commands() {
            app.dispatch(command);
        }

        Ok(Self {
            app,
            path: uri.path().to_string(),
            query,
            session,
        })
    }
}

fn storage_from(entries: BTreeMap<String, String>) -> MemoryStorage {
    MemoryStorage::from_entries(entries).with_quota(STORAGE_QUOTA_BYTES)
}
