//! Operator settings and the resolver that fills them in from defaults.
//!
//! Persisted settings are never trusted to be complete: whatever was saved
//! is overlaid field by field on the compiled-in defaults, and `unitCosts`
//! is overlaid per category so newly introduced categories pick up their
//! default without discarding existing overrides.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entities::ResourceCategory;
use crate::util::generate_id;

pub const DEFAULT_EXCHANGE_RATE: f64 = 36.50;
pub const DEFAULT_PROFIT_MARGIN: f64 = 25.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    Pt,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::Pt => "pt",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Configured price per unit of each resource category, in USD.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitCosts {
    pub guide: f64,
    pub medical: f64,
    pub transport: f64,
    pub logistics: f64,
}

impl UnitCosts {
    pub fn get(&self, category: ResourceCategory) -> f64 {
        match category {
            ResourceCategory::Guide => self.guide,
            ResourceCategory::Medical => self.medical,
            ResourceCategory::Transport => self.transport,
            ResourceCategory::Logistics => self.logistics,
        }
    }

    pub fn overlay(&mut self, patch: &UnitCostsPatch) {
        for category in ResourceCategory::ALL {
            if let Some(value) = patch.get(category) {
                self.set(category, value);
            }
        }
    }

    fn set(&mut self, category: ResourceCategory, value: f64) {
        match category {
            ResourceCategory::Guide => self.guide = value,
            ResourceCategory::Medical => self.medical = value,
            ResourceCategory::Transport => self.transport = value,
            ResourceCategory::Logistics => self.logistics = value,
        }
    }
}

impl Default for UnitCosts {
    fn default() -> Self {
        Self {
            guide: 150.0,
            medical: 20.0,
            transport: 200.0,
            logistics: 15.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub user_id: String,
    /// Multiplier from USD to the secondary display currency.
    pub exchange_rate: f64,
    /// Markup percentage applied to total cost.
    pub profit_margin: f64,
    pub language: Language,
    pub theme: Theme,
    pub unit_costs: UnitCosts,
}

impl UserSettings {
    /// Full defaults with a freshly generated user id.
    pub fn defaults() -> Self {
        Self {
            user_id: generate_id("user"),
            exchange_rate: DEFAULT_EXCHANGE_RATE,
            profit_margin: DEFAULT_PROFIT_MARGIN,
            language: Language::default(),
            theme: Theme::default(),
            unit_costs: UnitCosts::default(),
        }
    }

    /// Apply every field present in `patch`. The user id is left alone.
    pub fn overlay(&mut self, patch: &SettingsPatch) {
        if let Some(rate) = patch.exchange_rate {
            self.exchange_rate = rate;
        }
        if let Some(margin) = patch.profit_margin {
            self.profit_margin = margin;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(unit_costs) = &patch.unit_costs {
            self.unit_costs.overlay(unit_costs);
        }
    }
}

/// Partial unit costs; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitCostsPatch {
    pub guide: Option<f64>,
    pub medical: Option<f64>,
    pub transport: Option<f64>,
    pub logistics: Option<f64>,
}

impl UnitCostsPatch {
    pub fn get(&self, category: ResourceCategory) -> Option<f64> {
        match category {
            ResourceCategory::Guide => self.guide,
            ResourceCategory::Medical => self.medical,
            ResourceCategory::Transport => self.transport,
            ResourceCategory::Logistics => self.logistics,
        }
    }

    pub fn with(mut self, category: ResourceCategory, value: f64) -> Self {
        let slot = match category {
            ResourceCategory::Guide => &mut self.guide,
            ResourceCategory::Medical => &mut self.medical,
            ResourceCategory::Transport => &mut self.transport,
            ResourceCategory::Logistics => &mut self.logistics,
        };
        *slot = Some(value);
        self
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let mut patch = Self::default();
        for category in ResourceCategory::ALL {
            if let Some(value) = decode_field::<f64>(object, category.name()) {
                patch = patch.with(category, value);
            }
        }
        patch
    }
}

/// Partial settings; every `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsPatch {
    pub user_id: Option<String>,
    pub exchange_rate: Option<f64>,
    pub profit_margin: Option<f64>,
    pub language: Option<Language>,
    pub theme: Option<Theme>,
    pub unit_costs: Option<UnitCostsPatch>,
}

impl SettingsPatch {
    /// Decode a persisted settings object one field at a time. Fields that
    /// fail to decode are dropped so they fall back to their defaults.
    pub fn from_value(value: &Value) -> Option<Self> {
        let Value::Object(object) = value else {
            tracing::warn!("persisted settings are not an object; using defaults");
            return None;
        };

        let unit_costs = match object.get("unitCosts") {
            Some(Value::Object(costs)) => Some(UnitCostsPatch::from_object(costs)),
            Some(other) => {
                tracing::warn!(value = %other, "ignoring malformed unitCosts");
                None
            }
            None => None,
        };

        Some(Self {
            user_id: decode_field(object, "userId"),
            exchange_rate: decode_field(object, "exchangeRate"),
            profit_margin: decode_field(object, "profitMargin"),
            language: decode_field(object, "language"),
            theme: decode_field(object, "theme"),
            unit_costs,
        })
    }
}

fn decode_field<T: DeserializeOwned>(object: &Map<String, Value>, key: &str) -> Option<T> {
    let raw = object.get(key)?;
    match serde_json::from_value(raw.clone()) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(field = key, error = %err, "ignoring unreadable settings field");
            None
        }
    }
}

/// Build complete settings from the defaults and whatever was persisted.
pub fn resolve(persisted: Option<SettingsPatch>) -> UserSettings {
    let mut settings = UserSettings::defaults();
    if let Some(patch) = persisted {
        if let Some(user_id) = patch.user_id.as_ref().filter(|id| !id.trim().is_empty()) {
            settings.user_id = user_id.clone();
        }
        settings.overlay(&patch);
    }
    settings
}

/// Like [`resolve`], starting from the raw persisted JSON.
pub fn resolve_value(persisted: Option<&Value>) -> UserSettings {
    resolve(persisted.and_then(SettingsPatch::from_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_settings_resolve_to_defaults() {
        let settings = resolve(None);
        assert!(settings.user_id.starts_with("user-"));
        assert_eq!(settings.exchange_rate, 36.5);
        assert_eq!(settings.profit_margin, 25.0);
        assert_eq!(settings.language, Language::En);
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.unit_costs, UnitCosts::default());
    }

    #[test]
    fn fresh_user_ids_differ() {
        assert_ne!(resolve(None).user_id, resolve(None).user_id);
    }

    #[test]
    fn unit_costs_merge_per_key() {
        let persisted = json!({ "unitCosts": { "guide": 9.0 } });
        let settings = resolve_value(Some(&persisted));

        assert_eq!(settings.unit_costs.guide, 9.0);
        assert_eq!(settings.unit_costs.medical, 20.0);
        assert_eq!(settings.unit_costs.transport, 200.0);
        assert_eq!(settings.unit_costs.logistics, 15.0);
    }

    #[test]
    fn persisted_fields_override_defaults() {
        let persisted = json!({
            "userId": "user-abc",
            "exchangeRate": 40.0,
            "profitMargin": 10,
            "language": "pt",
            "theme": "dark"
        });
        let settings = resolve_value(Some(&persisted));

        assert_eq!(settings.user_id, "user-abc");
        assert_eq!(settings.exchange_rate, 40.0);
        assert_eq!(settings.profit_margin, 10.0);
        assert_eq!(settings.language, Language::Pt);
        assert_eq!(settings.theme, Theme::Dark);
    }

    #[test]
    fn unreadable_fields_keep_their_defaults() {
        let persisted = json!({
            "userId": "user-abc",
            "exchangeRate": "lots",
            "language": "de",
            "unitCosts": { "medical": null, "logistics": 3 }
        });
        let settings = resolve_value(Some(&persisted));

        assert_eq!(settings.user_id, "user-abc");
        assert_eq!(settings.exchange_rate, DEFAULT_EXCHANGE_RATE);
        assert_eq!(settings.language, Language::En);
        assert_eq!(settings.unit_costs.medical, 20.0);
        assert_eq!(settings.unit_costs.logistics, 3.0);
    }

    #[test]
    fn non_object_settings_are_treated_as_absent() {
        let settings = resolve_value(Some(&json!([1, 2, 3])));
        assert_eq!(settings.unit_costs, UnitCosts::default());
        assert!(settings.user_id.starts_with("user-"));
    }

    #[test]
    fn overlay_never_touches_user_id() {
        let mut settings = resolve(None);
        let original = settings.user_id.clone();
        settings.overlay(&SettingsPatch {
            user_id: Some("user-other".into()),
            profit_margin: Some(40.0),
            unit_costs: Some(UnitCostsPatch::default().with(ResourceCategory::Transport, 250.0)),
            ..SettingsPatch::default()
        });

        assert_eq!(settings.user_id, original);
        assert_eq!(settings.profit_margin, 40.0);
        assert_eq!(settings.unit_costs.transport, 250.0);
        assert_eq!(settings.unit_costs.guide, 150.0);
    }
}
