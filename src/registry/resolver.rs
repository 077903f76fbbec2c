// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fuzzy spoken-name resolution.

use crate::protocol::Connector;

use super::DeviceRegistry;

/// The best-scoring registry entry for a spoken name.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    /// Entity id of the matched device.
    pub id: String,
    /// Display name that matched.
    pub name: String,
    /// Similarity score in `[0, 1]`.
    pub score: f64,
}

/// Maps spoken names to device ids.
///
/// Names are compared trimmed and lowercased using normalized Levenshtein
/// similarity. A match is accepted only when its score is strictly above the
/// threshold. When several names share the best score, the first one in
/// registry order wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolver {
    threshold: f64,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(crate::ClientConfig::DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

impl Resolver {
    /// Creates a resolver with the given confidence threshold.
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Returns the confidence threshold.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the id of the device named `spoken`, if one scores above the
    /// threshold.
    #[must_use]
    pub fn resolve<C: Connector>(&self, registry: &DeviceRegistry<C>, spoken: &str) -> Option<String> {
        let best = self.best_match(registry, spoken)?;
        if best.score > self.threshold {
            tracing::debug!(spoken, name = %best.name, score = best.score, "Resolved device");
            Some(best.id)
        } else {
            tracing::info!(
                spoken,
                candidate = %best.name,
                score = best.score,
                threshold = self.threshold,
                "No device above confidence threshold"
            );
            None
        }
    }

    /// Returns the best-scoring device regardless of the threshold.
    ///
    /// `None` only when the registry is empty.
    #[must_use]
    pub fn best_match<C: Connector>(
        &self,
        registry: &DeviceRegistry<C>,
        spoken: &str,
    ) -> Option<NameMatch> {
        let query = normalize(spoken);
        let mut best: Option<(usize, f64)> = None;

        for (index, name) in registry.names().iter().enumerate() {
            let score = strsim::normalized_levenshtein(&query, &normalize(name));
            // Strict comparison keeps the earliest name on ties.
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((index, score));
            }
        }

        let (index, score) = best?;
        let device = registry.devices().get(index)?;
        Some(NameMatch {
            id: device.id().to_string(),
            name: registry.names()[index].clone(),
            score,
        })
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
