//! Service facade
//!
//! `PriceIntelService` wires the configured locale context, the pricing
//! plans and the wizards together so every front end (the CLI today) gets
//! the same behavior from one entry point.
//!
//! # Example
//!
//! ```no_run
//! use libpriceintel::plans::PlanId;
//! use libpriceintel::service::PriceIntelService;
//!
//! # async fn example() -> libpriceintel::Result<()> {
//! let service = PriceIntelService::new()?;
//! println!("{}", service.locale().resolve("pricing.title"));
//!
//! let wizard = service.open_plan(PlanId::Professional);
//! wizard.set_field("firstName", "John")?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::demo::MetricsTicker;
use crate::error::Result;
use crate::i18n::{
    CatalogSet, FilePreferenceStore, LanguageDetector, LocaleResolver, SystemLanguageDetector,
};
use crate::plans::{self, Plan, PlanAction, PlanId};
use crate::wizard::{EventBus, EventReceiver, FormKind, FormSpec, SimulatedBackend, Wizard};

pub struct PriceIntelService {
    config: Arc<Config>,
    locale: LocaleResolver,
    event_bus: EventBus,
}

impl PriceIntelService {
    /// Build from the configuration at the default location
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::from_config(config)
    }

    /// Build from `config`, detecting the locale from the process environment
    pub fn from_config(config: Config) -> Result<Self> {
        Self::with_detector(config, &SystemLanguageDetector::new())
    }

    pub fn with_detector(config: Config, detector: &dyn LanguageDetector) -> Result<Self> {
        let catalogs = match config.catalog_dir() {
            Some(dir) => CatalogSet::load_dir(&dir)?,
            None => CatalogSet::builtin()?,
        }
        .with_default(config.locale.default)?;

        let store = FilePreferenceStore::open(config.preference_path())?;
        let locale = LocaleResolver::new(Arc::new(catalogs), Arc::new(store), detector);

        Ok(Self {
            config: Arc::new(config),
            locale,
            event_bus: EventBus::default(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The locale context; clones share the active locale
    pub fn locale(&self) -> &LocaleResolver {
        &self.locale
    }

    pub fn plans(&self) -> &'static [Plan] {
        plans::plans()
    }

    /// Events of every wizard opened through this service
    pub fn subscribe(&self) -> EventReceiver {
        self.event_bus.subscribe()
    }

    /// Open the wizard behind a plan's button
    ///
    /// Self-serve plans get a purchase wizard; the enterprise plan gets a
    /// contact wizard with the reason preset to `enterprise`.
    pub fn open_plan(&self, id: PlanId) -> Wizard {
        match plans::plan(id).action {
            PlanAction::Purchase => self.open_purchase(),
            PlanAction::ContactSales => self.open_contact(Some("enterprise")),
        }
    }

    pub fn open_purchase(&self) -> Wizard {
        let delay = Duration::from_millis(self.config.wizard.purchase_delay_ms);
        self.open(FormSpec::purchase(), SimulatedBackend::new("purchase", delay))
    }

    /// Open the contact form, optionally preselecting a reason
    pub fn open_contact(&self, reason: Option<&str>) -> Wizard {
        let delay = Duration::from_millis(self.config.wizard.contact_delay_ms);
        let wizard = self.open(FormSpec::contact(), SimulatedBackend::new("contact", delay));
        if let Some(reason) = reason {
            // `reason` is declared by the contact form
            let _ = wizard.set_field("reason", reason);
        }
        wizard
    }

    fn open(&self, form: FormSpec, backend: SimulatedBackend) -> Wizard {
        let wizard = Wizard::new(form, Arc::new(backend))
            .with_timeout(self.config.submit_timeout())
            .with_event_bus(self.event_bus.clone());
        tracing::debug!(wizard = %wizard.id(), kind = %wizard.form().kind, "Wizard opened");
        wizard
    }

    /// Localized dialog title for a wizard
    pub fn wizard_title(&self, kind: FormKind, plan: Option<PlanId>) -> String {
        match (kind, plan) {
            (FormKind::Purchase, plan) => {
                let name = plan.map(|id| self.locale.resolve(&plans::plan(id).name_key()));
                self.locale.resolve_with(
                    "wizard.purchase.title",
                    &[("plan", name.as_deref().unwrap_or_default())],
                )
            }
            (FormKind::Contact, Some(PlanId::Enterprise)) => {
                self.locale.resolve("wizard.contact.sales_title")
            }
            (FormKind::Contact, _) => self.locale.resolve("wizard.contact.title"),
        }
    }

    /// Localized confirmation shown after a successful submission
    pub fn success_message(&self, kind: FormKind, plan: Option<PlanId>) -> String {
        match kind {
            FormKind::Purchase => {
                let name = plan.map(|id| self.locale.resolve(&plans::plan(id).name_key()));
                self.locale.resolve_with(
                    "wizard.purchase.success",
                    &[("plan", name.as_deref().unwrap_or_default())],
                )
            }
            FormKind::Contact => self.locale.resolve("wizard.contact.success"),
        }
    }

    /// A stopped metrics ticker using the configured period
    pub fn ticker(&self) -> MetricsTicker {
        MetricsTicker::new(self.config.demo_interval())
    }
}
