//! The authoritative, single-owner holder of routes, packages and settings.

use super::app_state::{AppState, PersistedState};
use super::entities::{Package, Route};
use super::sample;
use super::settings::{SettingsPatch, UserSettings};
use crate::util::persistence::{PersistError, StateBackend};

/// Entity store over a persistence backend.
///
/// Every mutator leaves the state consistent and then writes the full
/// record. A failed write is logged and otherwise ignored; the in-memory
/// state stays authoritative.
pub struct TourStore<B: StateBackend> {
    state: AppState,
    backend: B,
    opened_from_persisted: bool,
}

impl<B: StateBackend> TourStore<B> {
    /// Load whatever the backend holds. Missing or unreadable records give an
    /// empty catalog with default settings.
    pub fn open(backend: B) -> Self {
        let loaded = match backend.read() {
            Ok(Some(raw)) => match PersistedState::from_json(&raw) {
                Ok(persisted) => Some(persisted),
                Err(err) => {
                    tracing::warn!(
                        location = %backend.describe(),
                        error = %err,
                        "persisted state is unreadable; starting fresh"
                    );
                    None
                }
            },
            Ok(None) => {
                tracing::info!(location = %backend.describe(), "no persisted state found");
                None
            }
            Err(err) => {
                tracing::warn!(
                    location = %backend.describe(),
                    error = %err,
                    "failed to read persisted state; starting fresh"
                );
                None
            }
        };

        let opened_from_persisted = loaded.is_some();
        let state = match loaded {
            Some(persisted) => {
                let state = AppState::from_persisted(persisted);
                tracing::info!(
                    routes = state.routes.len(),
                    packages = state.packages.len(),
                    "loaded persisted catalog"
                );
                state
            }
            None => AppState::default(),
        };

        Self {
            state,
            backend,
            opened_from_persisted,
        }
    }

    pub fn opened_from_persisted(&self) -> bool {
        self.opened_from_persisted
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn routes(&self) -> &[Route] {
        &self.state.routes
    }

    pub fn packages(&self) -> &[Package] {
        &self.state.packages
    }

    pub fn settings(&self) -> &UserSettings {
        &self.state.settings
    }

    pub fn route(&self, id: &str) -> Option<&Route> {
        self.state.routes.iter().find(|route| route.id == id)
    }

    pub fn package(&self, id: &str) -> Option<&Package> {
        self.state.packages.iter().find(|pkg| pkg.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.state.routes.is_empty() && self.state.packages.is_empty()
    }

    pub fn snapshot(&self) -> PersistedState {
        self.state.to_persisted()
    }

    pub fn add_route(&mut self, route: Route) {
        tracing::debug!(route_id = %route.id, "adding route");
        self.state.routes.push(route);
        self.persist();
    }

    /// Replace the route with the same id; unknown ids change nothing.
    pub fn update_route(&mut self, route: Route) {
        match self.state.routes.iter_mut().find(|r| r.id == route.id) {
            Some(slot) => *slot = route,
            None => tracing::debug!(route_id = %route.id, "update for unknown route ignored"),
        }
        self.persist();
    }

    /// Packages that reference the route keep the id.
    pub fn delete_route(&mut self, id: &str) {
        self.state.routes.retain(|route| route.id != id);
        self.persist();
    }

    pub fn add_package(&mut self, pkg: Package) {
        tracing::debug!(package_id = %pkg.id, "adding package");
        self.state.packages.push(pkg);
        self.persist();
    }

    pub fn update_package(&mut self, pkg: Package) {
        match self.state.packages.iter_mut().find(|p| p.id == pkg.id) {
            Some(slot) => *slot = pkg,
            None => tracing::debug!(package_id = %pkg.id, "update for unknown package ignored"),
        }
        self.persist();
    }

    pub fn delete_package(&mut self, id: &str) {
        self.state.packages.retain(|pkg| pkg.id != id);
        self.persist();
    }

    pub fn set_package_image(&mut self, id: &str, image_url: impl Into<String>) {
        if let Some(pkg) = self.state.packages.iter_mut().find(|pkg| pkg.id == id) {
            pkg.image_url = Some(image_url.into());
        }
        self.persist();
    }

    /// Merge `patch` over the current settings.
    pub fn set_settings(&mut self, patch: SettingsPatch) {
        if patch.user_id.is_some() {
            tracing::debug!("user id is fixed after first run; ignoring override");
        }
        self.state.settings.overlay(&patch);
        self.persist();
    }

    /// Add the first-run example route and package.
    pub fn seed_example_catalog(&mut self) {
        let (route, pkg) = sample::example_catalog();
        self.add_route(route);
        self.add_package(pkg);
    }

    fn persist(&self) {
        let snapshot = self.state.to_persisted();
        let result = snapshot
            .to_json()
            .map_err(PersistError::from)
            .and_then(|json| self.backend.write(&json));
        if let Err(err) = result {
            tracing::warn!(
                location = %self.backend.describe(),
                error = %err,
                "failed to persist catalog"
            );
        }
    }
}
