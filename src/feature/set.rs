//! Keyed, zero-padded container of feature columns

use super::{Feature, FeatureType};
use ndarray::Array2;
use std::collections::HashMap;

/// Ordered mapping from [`Feature`] to its column values.
///
/// All columns share one row count, the longest column seen so far. Short
/// columns are padded with trailing zeros on insert and a longer column
/// pads every existing one, so independently built sub-pipelines can be
/// merged without coordinating lengths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    values: HashMap<String, Vec<f64>>,
    order: Vec<Feature>,
    rows: usize,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows every column is padded to
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Insert or overwrite a column.
    ///
    /// Overwriting keeps the feature's original insertion position.
    pub fn set(&mut self, feature: Feature, mut values: Vec<f64>) {
        if values.len() > self.rows {
            self.rows = values.len();
            for column in self.values.values_mut() {
                column.resize(self.rows, 0.0);
            }
        } else {
            values.resize(self.rows, 0.0);
        }

        let key = feature.identity();
        if self.values.insert(key, values).is_none() {
            self.order.push(feature);
        }
    }

    pub fn get(&self, feature: &Feature) -> Option<&[f64]> {
        self.get_by_identity(&feature.identity())
    }

    pub fn get_by_identity(&self, identity: &str) -> Option<&[f64]> {
        self.values.get(identity).map(Vec::as_slice)
    }

    pub fn contains(&self, feature: &Feature) -> bool {
        self.values.contains_key(&feature.identity())
    }

    /// Remove a column, returning its values.
    ///
    /// Removing the last column resets the row count to zero.
    pub fn remove(&mut self, feature: &Feature) -> Option<Vec<f64>> {
        let key = feature.identity();
        let removed = self.values.remove(&key)?;
        self.order.retain(|f| f.identity() != key);
        if self.order.is_empty() {
            self.rows = 0;
        }
        Some(removed)
    }

    /// Iterate columns in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Feature, &[f64])> {
        self.order.iter().filter_map(move |f| {
            self.values
                .get(&f.identity())
                .map(|v| (f, v.as_slice()))
        })
    }

    /// Features in insertion order
    pub fn features(&self) -> &[Feature] {
        &self.order
    }

    /// Sort the insertion order into label order
    pub fn sort(&mut self) {
        self.order.sort();
    }

    /// Features in matrix column order: intercept first, then by identity
    pub fn labels(&self) -> Vec<Feature> {
        let mut labels = self.order.clone();
        labels.sort();
        labels.dedup();
        labels
    }

    /// Identity strings in matrix column order
    pub fn column_names(&self) -> Vec<String> {
        self.labels().iter().map(Feature::identity).collect()
    }

    /// Materialize the `rows x labels` design matrix
    pub fn matrix(&self) -> Array2<f64> {
        let labels = self.labels();
        let mut matrix = Array2::zeros((self.rows, labels.len()));
        for (col, feature) in labels.iter().enumerate() {
            if let Some(values) = self.get(feature) {
                for (row, &v) in values.iter().enumerate() {
                    matrix[[row, col]] = v;
                }
            }
        }
        matrix
    }

    /// Right-biased merge: columns present in both take `other`'s values
    pub fn update(&mut self, other: FeatureSet) {
        let FeatureSet {
            mut values, order, ..
        } = other;
        for feature in order {
            if let Some(column) = values.remove(&feature.identity()) {
                self.set(feature, column);
            }
        }
    }

    /// Copy of the columns belonging to one feature family
    pub fn filter_by_type(&self, feature_type: FeatureType) -> FeatureSet {
        let mut filtered = FeatureSet::new();
        for (feature, values) in self.iter() {
            if feature.feature_type() == feature_type {
                filtered.set(feature.clone(), values.to_vec());
            }
        }
        filtered
    }
}
