use crate::domain::growth::{projection, ContributionPlan, GrowthPoint};
use crate::domain::portfolio::PriceSnapshot;
use crate::quotes::{fetch_prices, QuoteProvider};
use crate::session::Session;
use crate::storage::preferences::{self, PreferenceStore, Preferences};
use crate::storage::KeyValueStore;
use anyhow::{ensure, Result};
use std::path::Path;

/// Everything one dashboard session holds: the gate, the preference object and
/// the last price snapshot.
#[derive(Debug)]
pub struct Dashboard<K> {
    session: Session,
    store: PreferenceStore<K>,
    prefs: Preferences,
    prices: Option<PriceSnapshot>,
    dividend_yield: f64,
}

impl<K: KeyValueStore> Dashboard<K> {
    pub fn open(store: K, dividend_yield: f64) -> Self {
        let store = PreferenceStore::new(store);
        let prefs = store.load();
        tracing::debug!(
            contribution = prefs.contribution_label().unwrap_or("<none>"),
            simulations = prefs.simulations().len(),
            "loaded preferences"
        );

        Self {
            session: Session::Guest,
            store,
            prefs,
            prices: None,
            dividend_yield,
        }
    }

    /// Runs the login gate. Returns whether the session is authenticated afterwards.
    pub fn login(&mut self, email: &str, password: &str) -> Result<bool> {
        if let Some(identity) = self.session.login(email, password) {
            let email = identity.email.clone();
            self.store.remember_user(&email)?;
            tracing::info!(%email, "gate opened");
        }
        Ok(self.session.is_authenticated())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn store(&self) -> &PreferenceStore<K> {
        &self.store
    }

    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    pub fn active_plan(&self) -> Option<ContributionPlan> {
        self.prefs.plan()
    }

    /// The projection points plus the plan whose curve is shown. `None` when the
    /// stored contribution names no known plan.
    pub fn active_curve(&self) -> Option<(ContributionPlan, &'static [GrowthPoint])> {
        self.active_plan().map(|plan| (plan, projection()))
    }

    /// Selects a plan and persists the preference object immediately.
    pub fn select_plan(&mut self, plan: ContributionPlan) -> Result<()> {
        self.ensure_authenticated()?;
        self.prefs.set_plan(plan);
        self.store.save(&self.prefs)?;
        tracing::info!(contribution = plan.label(), "contribution plan selected");
        Ok(())
    }

    pub fn export_json(&self) -> Result<String> {
        self.ensure_authenticated()?;
        preferences::export_json(&self.prefs)
    }

    pub fn export_to(&self, path: &Path) -> Result<()> {
        self.ensure_authenticated()?;
        preferences::export_to_file(&self.prefs, path)?;
        tracing::info!(path = %path.display(), "exported preferences");
        Ok(())
    }

    /// Replaces the whole preference object, active plan included, and persists it.
    pub fn import_json(&mut self, text: &str) -> Result<()> {
        self.ensure_authenticated()?;
        let prefs = preferences::import_json(text)?;
        self.replace_preferences(prefs)
    }

    pub fn import_from(&mut self, path: &Path) -> Result<()> {
        self.ensure_authenticated()?;
        let prefs = preferences::import_from_file(path)?;
        self.replace_preferences(prefs)?;
        tracing::info!(path = %path.display(), "imported preferences");
        Ok(())
    }

    fn replace_preferences(&mut self, prefs: Preferences) -> Result<()> {
        self.prefs = prefs;
        self.store.save(&self.prefs)
    }

    pub async fn refresh_prices<P>(&mut self, provider: &P, tickers: &[&str]) -> &PriceSnapshot
    where
        P: QuoteProvider + ?Sized,
    {
        let snapshot = fetch_prices(provider, tickers).await;
        self.prices.insert(snapshot)
    }

    pub fn prices(&self) -> Option<&PriceSnapshot> {
        self.prices.as_ref()
    }

    /// 0 until a snapshot has been fetched.
    pub fn portfolio_value(&self) -> f64 {
        self.prices.as_ref().map_or(0.0, PriceSnapshot::portfolio_value)
    }

    pub fn estimated_income(&self) -> f64 {
        crate::domain::portfolio::estimated_income(self.portfolio_value(), self.dividend_yield)
    }

    fn ensure_authenticated(&self) -> Result<()> {
        ensure!(self.session.is_authenticated(), "login required");
        Ok(())
    }
}
