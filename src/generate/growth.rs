//! Trend features relative to the training window

use crate::feature::{Feature, FeatureSet, GrowthComponent};
use crate::options::GrowthType;

/// One growth column over `epochs`.
///
/// `x = (epoch - train_start) / (train_end - train_start)`; intercept is
/// constant 1, linear is `x`, quadratic is `x^2`. Returns `None` when the
/// training window has zero length.
pub fn growth_column(
    component: GrowthComponent,
    epochs: &[f64],
    train_start: f64,
    train_end: f64,
) -> Option<Vec<f64>> {
    let scale = train_end - train_start;
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    let x = epochs.iter().map(|&e| (e - train_start) / scale);
    let column = match component {
        GrowthComponent::Intercept => vec![1.0; epochs.len()],
        GrowthComponent::Linear => x.collect(),
        GrowthComponent::Quadratic => x.map(|v| v * v).collect(),
    };
    Some(column)
}

/// Intercept plus the configured growth term.
///
/// Empty when the training window is degenerate.
pub fn growth_features(epochs: &[f64], train_start: f64, train_end: f64, growth: GrowthType) -> FeatureSet {
    let mut components = vec![GrowthComponent::Intercept];
    match growth {
        GrowthType::None => {}
        GrowthType::Linear => components.push(GrowthComponent::Linear),
        GrowthType::Quadratic => components.push(GrowthComponent::Quadratic),
    }

    let mut set = FeatureSet::new();
    for component in components {
        if let Some(column) = growth_column(component, epochs, train_start, train_end) {
            set.set(Feature::growth(component), column);
        }
    }
    set
}
