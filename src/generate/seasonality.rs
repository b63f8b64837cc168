//! Fourier seasonality, colinearity pruning and masked interactions

use crate::diagnostics::Diagnostics;
use crate::feature::{Feature, FeatureSet, FourierComponent};
use crate::options::SeasonalityConfig;
use crate::utils::{parallel_map, ParallelConfig};
use std::collections::HashMap;
use std::f64::consts::PI;

const COMPONENTS: [FourierComponent; 2] = [FourierComponent::Sin, FourierComponent::Cos];

/// `sin(wt)` or `cos(wt)` with `w = 2*pi*order/period`
pub fn fourier_column(time: &[f64], order: usize, period_secs: f64, component: FourierComponent) -> Vec<f64> {
    let omega = 2.0 * PI * order as f64 / period_secs;
    time.iter()
        .map(|&t| match component {
            FourierComponent::Sin => (omega * t).sin(),
            FourierComponent::Cos => (omega * t).cos(),
        })
        .collect()
}

/// A seasonality config with the harmonic orders that survived pruning
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicPlan {
    pub config: SeasonalityConfig,
    pub orders: Vec<usize>,
}

impl HarmonicPlan {
    pub fn period_secs(&self) -> f64 {
        self.config.period.as_secs_f64()
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Sub-period `period / order` as a reduced fraction of nanoseconds
fn sub_period(config: &SeasonalityConfig, order: usize) -> (u128, u128) {
    let period = config.period.as_nanos();
    let order = order as u128;
    let g = gcd(period, order).max(1);
    (period / g, order / g)
}

/// Drop malformed configs and prune colinear harmonics.
///
/// Configs are processed by ascending period, then descending order, then
/// name. Every harmonic claims its exact sub-period and a later claim
/// replaces an earlier one, so a sub-period shared by several configs is
/// generated once, by the longest-period config.
pub fn plan_harmonics(configs: &[SeasonalityConfig], diagnostics: &mut Diagnostics) -> Vec<HarmonicPlan> {
    let mut valid: Vec<&SeasonalityConfig> = Vec::with_capacity(configs.len());
    for config in configs {
        if !config.is_valid() {
            tracing::debug!(seasonality = %config.name, "Dropping malformed seasonality config");
            continue;
        }
        if valid.iter().any(|c| c.name == config.name) {
            diagnostics.warn(
                format!("seasonality:{}", config.name),
                "duplicate seasonality name, keeping the first config",
            );
            continue;
        }
        valid.push(config);
    }
    valid.sort_by(|a, b| {
        a.period
            .cmp(&b.period)
            .then(b.orders.cmp(&a.orders))
            .then(a.name.cmp(&b.name))
    });

    let mut claims: HashMap<(u128, u128), usize> = HashMap::new();
    for (index, config) in valid.iter().enumerate() {
        for order in 1..=config.orders {
            claims.insert(sub_period(config, order), index);
        }
    }

    valid
        .iter()
        .enumerate()
        .map(|(index, config)| {
            let orders: Vec<usize> = (1..=config.orders)
                .filter(|&order| {
                    let owned = claims.get(&sub_period(config, order)) == Some(&index);
                    if !owned {
                        tracing::debug!(
                            seasonality = %config.name,
                            order,
                            "Pruning colinear harmonic"
                        );
                    }
                    owned
                })
                .collect();
            HarmonicPlan {
                config: (*config).clone(),
                orders,
            }
        })
        .collect()
}

/// Name of the seasonality columns of `config` derived from `source`
pub fn seasonality_name(source: &str, config: &SeasonalityConfig) -> String {
    format!("{source}_{}", config.name)
}

/// Sin/cos columns of every planned harmonic of the elapsed-time feature
/// `time_name`, keyed `<time_name>_<config>`
pub fn seasonality_features(
    time: &[f64],
    time_name: &str,
    plans: &[HarmonicPlan],
    parallel: &ParallelConfig,
) -> FeatureSet {
    let tasks: Vec<(Feature, usize, f64, FourierComponent)> = plans
        .iter()
        .flat_map(|plan| {
            let name = seasonality_name(time_name, &plan.config);
            let period = plan.period_secs();
            plan.orders.iter().flat_map(move |&order| {
                let name = name.clone();
                COMPONENTS.into_iter().map(move |component| {
                    (
                        Feature::seasonality(name.clone(), order, component),
                        order,
                        period,
                        component,
                    )
                })
            })
        })
        .collect();

    let columns = parallel_map(tasks, parallel, |(feature, order, period, component)| {
        (feature, fourier_column(time, order, period, component))
    });

    let mut set = FeatureSet::new();
    for (feature, column) in columns {
        set.set(feature, column);
    }
    set
}

/// Name of the interaction columns of `config` with the mask feature
/// `mask`, keyed by the mask's full identity (`event_promo_daily`,
/// `chpnt_launch_bias_daily`) so it cannot meet a base term or a mask of
/// another family.
pub fn interaction_name(mask: &Feature, config: &SeasonalityConfig) -> String {
    seasonality_name(&mask.identity(), config)
}

/// Base seasonality columns multiplied by the column of `mask`, keyed by
/// [`interaction_name`].
///
/// A missing mask column is reported and yields no columns.
pub fn masked_seasonality(
    base: &FeatureSet,
    time_name: &str,
    plans: &[HarmonicPlan],
    mask: &Feature,
    values: Option<&[f64]>,
    diagnostics: &mut Diagnostics,
) -> FeatureSet {
    let mut set = FeatureSet::new();
    let Some(values) = values else {
        diagnostics.warn(
            format!("mask:{mask}"),
            "mask not generated, skipping masked seasonality",
        );
        return set;
    };

    for plan in plans {
        let base_name = seasonality_name(time_name, &plan.config);
        let masked_name = interaction_name(mask, &plan.config);
        for &order in &plan.orders {
            for component in COMPONENTS {
                let source = Feature::seasonality(base_name.clone(), order, component);
                let Some(terms) = base.get(&source) else {
                    continue;
                };
                let column = terms
                    .iter()
                    .zip(values.iter().chain(std::iter::repeat(&0.0)))
                    .map(|(v, m)| v * m)
                    .collect();
                set.set(Feature::seasonality(masked_name.clone(), order, component), column);
            }
        }
    }
    set
}
