//! Feature identities
//!
//! A [`Feature`] names one column of the design matrix. Every variant maps to
//! a canonical, human readable identity string that is injective over the
//! variant's attributes:
//!
//! - `tfeat_<name>` for raw time features
//! - `growth_<intercept|linear|quadratic>` for trend terms
//! - `chpnt_<name>_<bias|slope>` for changepoints
//! - `seas_<name>_<order>_<sin|cos>` for Fourier seasonality
//! - `event_<name>` for event and weekend masks
//!
//! Identities round-trip through [`std::str::FromStr`], which lets fitted
//! coefficients be mapped back onto the features they belong to.

mod set;

pub use set::FeatureSet;

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const TIME_PREFIX: &str = "tfeat_";
const GROWTH_PREFIX: &str = "growth_";
const CHANGEPOINT_PREFIX: &str = "chpnt_";
const SEASONALITY_PREFIX: &str = "seas_";
const EVENT_PREFIX: &str = "event_";

/// Feature family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureType {
    Time,
    Growth,
    Changepoint,
    Seasonality,
    Event,
}

impl FeatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Time => "time",
            FeatureType::Growth => "growth",
            FeatureType::Changepoint => "changepoint",
            FeatureType::Seasonality => "seasonality",
            FeatureType::Event => "event",
        }
    }
}

/// Trend component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthComponent {
    Intercept,
    Linear,
    Quadratic,
}

impl GrowthComponent {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthComponent::Intercept => "intercept",
            GrowthComponent::Linear => "linear",
            GrowthComponent::Quadratic => "quadratic",
        }
    }

    /// Parse a growth name, `None` for unknown names
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "intercept" => Some(GrowthComponent::Intercept),
            "linear" => Some(GrowthComponent::Linear),
            "quadratic" => Some(GrowthComponent::Quadratic),
            _ => None,
        }
    }
}

/// Changepoint component: level shift or slope change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangepointComponent {
    Bias,
    Slope,
}

impl ChangepointComponent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangepointComponent::Bias => "bias",
            ChangepointComponent::Slope => "slope",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "bias" => Some(ChangepointComponent::Bias),
            "slope" => Some(ChangepointComponent::Slope),
            _ => None,
        }
    }
}

/// Fourier term component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FourierComponent {
    Sin,
    Cos,
}

impl FourierComponent {
    pub fn as_str(&self) -> &'static str {
        match self {
            FourierComponent::Sin => "sin",
            FourierComponent::Cos => "cos",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "sin" => Some(FourierComponent::Sin),
            "cos" => Some(FourierComponent::Cos),
            _ => None,
        }
    }
}

/// One design-matrix column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Time {
        name: String,
    },
    Growth {
        component: GrowthComponent,
    },
    Changepoint {
        name: String,
        component: ChangepointComponent,
    },
    Seasonality {
        name: String,
        order: usize,
        component: FourierComponent,
    },
    Event {
        name: String,
    },
}

impl Feature {
    pub fn time(name: impl Into<String>) -> Self {
        Feature::Time { name: name.into() }
    }

    pub fn growth(component: GrowthComponent) -> Self {
        Feature::Growth { component }
    }

    pub fn changepoint(name: impl Into<String>, component: ChangepointComponent) -> Self {
        Feature::Changepoint {
            name: name.into(),
            component,
        }
    }

    pub fn seasonality(name: impl Into<String>, order: usize, component: FourierComponent) -> Self {
        Feature::Seasonality {
            name: name.into(),
            order,
            component,
        }
    }

    pub fn event(name: impl Into<String>) -> Self {
        Feature::Event { name: name.into() }
    }

    pub fn feature_type(&self) -> FeatureType {
        match self {
            Feature::Time { .. } => FeatureType::Time,
            Feature::Growth { .. } => FeatureType::Growth,
            Feature::Changepoint { .. } => FeatureType::Changepoint,
            Feature::Seasonality { .. } => FeatureType::Seasonality,
            Feature::Event { .. } => FeatureType::Event,
        }
    }

    /// Canonical identity used as the feature set key
    pub fn identity(&self) -> String {
        match self {
            Feature::Time { name } => format!("{TIME_PREFIX}{name}"),
            Feature::Growth { component } => format!("{GROWTH_PREFIX}{}", component.as_str()),
            Feature::Changepoint { name, component } => {
                format!("{CHANGEPOINT_PREFIX}{name}_{}", component.as_str())
            }
            Feature::Seasonality {
                name,
                order,
                component,
            } => format!("{SEASONALITY_PREFIX}{name}_{order}_{}", component.as_str()),
            Feature::Event { name } => format!("{EVENT_PREFIX}{name}"),
        }
    }

    /// True for the constant column that must lead the design matrix
    pub fn is_intercept(&self) -> bool {
        matches!(
            self,
            Feature::Growth {
                component: GrowthComponent::Intercept
            }
        )
    }

    /// Look up a single attribute by label
    ///
    /// Supported labels are `type`, `name`, `component`, `order` and `trig`
    /// (the Fourier function of a seasonality term); a label the variant
    /// does not carry returns `None`.
    pub fn get(&self, label: &str) -> Option<String> {
        match label {
            "type" => Some(self.feature_type().as_str().to_string()),
            "name" => match self {
                Feature::Time { name }
                | Feature::Changepoint { name, .. }
                | Feature::Seasonality { name, .. }
                | Feature::Event { name } => Some(name.clone()),
                Feature::Growth { component } => Some(component.as_str().to_string()),
            },
            "component" => match self {
                Feature::Changepoint { component, .. } => Some(component.as_str().to_string()),
                Feature::Seasonality { component, .. } => Some(component.as_str().to_string()),
                _ => None,
            },
            "order" => match self {
                Feature::Seasonality { order, .. } => Some(order.to_string()),
                _ => None,
            },
            "trig" => match self {
                Feature::Seasonality { component, .. } => Some(component.as_str().to_string()),
                _ => None,
            },
            _ => None,
        }
    }

    /// All attributes of the feature keyed by label
    pub fn decode(&self) -> BTreeMap<&'static str, String> {
        ["type", "name", "component", "order", "trig"]
            .into_iter()
            .filter_map(|label| self.get(label).map(|v| (label, v)))
            .collect()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity())
    }
}

impl Ord for Feature {
    /// Intercept first, everything else by identity
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .is_intercept()
            .cmp(&self.is_intercept())
            .then_with(|| self.identity().cmp(&other.identity()))
    }
}

impl PartialOrd for Feature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Feature {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ForecastError::InvalidFeature(s.to_string());

        if let Some(name) = s.strip_prefix(TIME_PREFIX) {
            if name.is_empty() {
                return Err(invalid());
            }
            return Ok(Feature::time(name));
        }
        if let Some(name) = s.strip_prefix(GROWTH_PREFIX) {
            return GrowthComponent::parse(name)
                .map(Feature::growth)
                .ok_or_else(invalid);
        }
        if let Some(rest) = s.strip_prefix(CHANGEPOINT_PREFIX) {
            let (name, comp) = rest.rsplit_once('_').ok_or_else(invalid)?;
            let component = ChangepointComponent::parse(comp).ok_or_else(invalid)?;
            return Ok(Feature::changepoint(name, component));
        }
        if let Some(rest) = s.strip_prefix(SEASONALITY_PREFIX) {
            let (rest, comp) = rest.rsplit_once('_').ok_or_else(invalid)?;
            let (name, order) = rest.rsplit_once('_').ok_or_else(invalid)?;
            let component = FourierComponent::parse(comp).ok_or_else(invalid)?;
            let order = order.parse::<usize>().map_err(|_| invalid())?;
            if name.is_empty() {
                return Err(invalid());
            }
            return Ok(Feature::seasonality(name, order, component));
        }
        if let Some(name) = s.strip_prefix(EVENT_PREFIX) {
            if name.is_empty() {
                return Err(invalid());
            }
            return Ok(Feature::event(name));
        }
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identities() {
        assert_eq!(Feature::time("epoch").identity(), "tfeat_epoch");
        assert_eq!(
            Feature::growth(GrowthComponent::Quadratic).identity(),
            "growth_quadratic"
        );
        assert_eq!(
            Feature::changepoint("launch", ChangepointComponent::Slope).identity(),
            "chpnt_launch_slope"
        );
        assert_eq!(
            Feature::seasonality("epoch_daily", 3, FourierComponent::Cos).identity(),
            "seas_epoch_daily_3_cos"
        );
        assert_eq!(Feature::event("weekend").identity(), "event_weekend");
    }

    #[test]
    fn test_parse_inverts_identity_with_underscored_names() {
        let features = vec![
            Feature::time("epoch"),
            Feature::growth(GrowthComponent::Intercept),
            Feature::changepoint("q3_price_cut", ChangepointComponent::Bias),
            Feature::seasonality("black_friday_weekly", 12, FourierComponent::Sin),
            Feature::event("new_year_s_day"),
        ];
        for f in features {
            let parsed: Feature = f.identity().parse().unwrap();
            assert_eq!(parsed, f);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Feature>().is_err());
        assert!("growth_cubic".parse::<Feature>().is_err());
        assert!("chpnt_x_middle".parse::<Feature>().is_err());
        assert!("seas_daily_x_sin".parse::<Feature>().is_err());
        assert!("seas_daily_1_tan".parse::<Feature>().is_err());
        assert!("event_".parse::<Feature>().is_err());
        assert!("lag_1".parse::<Feature>().is_err());
    }

    #[test]
    fn test_attribute_lookup() {
        let f = Feature::seasonality("epoch_weekly", 2, FourierComponent::Sin);
        assert_eq!(f.get("type").as_deref(), Some("seasonality"));
        assert_eq!(f.get("name").as_deref(), Some("epoch_weekly"));
        assert_eq!(f.get("order").as_deref(), Some("2"));
        assert_eq!(f.get("component").as_deref(), Some("sin"));
        assert_eq!(f.get("unknown"), None);

        assert_eq!(f.get("trig").as_deref(), Some("sin"));

        let e = Feature::event("promo");
        assert_eq!(e.get("order"), None);
        assert_eq!(e.get("trig"), None);

        let decoded = f.decode();
        assert_eq!(decoded.len(), 5);
        assert_eq!(decoded["order"], "2");
        assert_eq!(decoded["trig"], "sin");
        let bias = Feature::changepoint("launch", ChangepointComponent::Bias);
        assert!(!bias.decode().contains_key("trig"));
        assert_eq!(e.decode().len(), 2);
    }

    #[test]
    fn test_ordering_puts_intercept_first() {
        let mut features = vec![
            Feature::event("a"),
            Feature::growth(GrowthComponent::Linear),
            Feature::changepoint("0", ChangepointComponent::Bias),
            Feature::growth(GrowthComponent::Intercept),
        ];
        features.sort();
        let ids: Vec<String> = features.iter().map(|f| f.identity()).collect();
        assert_eq!(
            ids,
            vec!["growth_intercept", "chpnt_0_bias", "event_a", "growth_linear"]
        );
    }
}
