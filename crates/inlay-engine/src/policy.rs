//! Inlining policy
//!
//! Pure filter deciding, per group, whether inlining pays off under the
//! configured thresholds. All comparisons are strict `>`: a value exactly
//! at a threshold passes.

use crate::types::{AssetId, ReferenceGroups};
use std::collections::HashMap;

/// Size and repetition thresholds, immutable per engine instance
///
/// `None` means unbounded. A threshold of zero is taken literally:
/// `max_occurrences = 0` rejects every group (occurrence counts are at
/// least 1), while a zero size threshold still admits a zero-byte asset
/// because `0 > 0` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Thresholds {
    /// Largest single asset worth inlining, in bytes
    pub max_asset_size: Option<u64>,
    /// Most references to one asset worth inlining
    pub max_occurrences: Option<u64>,
    /// Largest total inlined payload per group (`occurrences * size`)
    pub max_total_size: Option<u64>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_asset_size: Some(3000),
            max_occurrences: None,
            max_total_size: Some(10_000),
        }
    }
}

impl Thresholds {
    /// No limits at all
    pub const UNBOUNDED: Self = Self {
        max_asset_size: None,
        max_occurrences: None,
        max_total_size: None,
    };

    /// Whether a group of `occurrences` references to an asset of
    /// `asset_size` bytes qualifies for inlining
    #[must_use]
    pub fn admits(&self, occurrences: u64, asset_size: u64) -> bool {
        if self.max_occurrences.is_some_and(|max| occurrences > max) {
            return false;
        }
        if self.max_asset_size.is_some_and(|max| asset_size > max) {
            return false;
        }
        let total = occurrences.saturating_mul(asset_size);
        if self.max_total_size.is_some_and(|max| total > max) {
            return false;
        }
        true
    }
}

/// Keep only the groups that qualify under `thresholds`
///
/// Groups whose identity has no resolved size (failed loads) are
/// dropped. Surviving groups pass through unchanged, preserving order;
/// the filter is idempotent.
#[must_use]
pub fn filter_groups(
    groups: ReferenceGroups,
    sizes: &HashMap<AssetId, u64>,
    thresholds: &Thresholds,
) -> ReferenceGroups {
    groups
        .into_iter()
        .filter(|(id, sites)| {
            let Some(&size) = sizes.get(id) else {
                return false;
            };
            thresholds.admits(sites.len() as u64, size)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReferenceSite;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn groups_of(specs: &[(&str, usize)]) -> ReferenceGroups {
        specs
            .iter()
            .map(|&(path, occurrences)| {
                let sites = (0..occurrences)
                    .map(|i| ReferenceSite {
                        path: vec![i],
                        target: path.to_string(),
                    })
                    .collect();
                (AssetId::new(path), sites)
            })
            .collect()
    }

    fn sizes_of(specs: &[(&str, u64)]) -> HashMap<AssetId, u64> {
        specs
            .iter()
            .map(|&(path, size)| (AssetId::new(path), size))
            .collect()
    }

    #[test]
    fn small_single_occurrence_asset_is_admitted() {
        // 2000 bytes under a 3000-byte limit, one occurrence
        let thresholds = Thresholds::default();
        assert!(thresholds.admits(1, 2000));
    }

    #[test]
    fn group_total_over_limit_is_rejected() {
        // 6 x 2000 = 12000 > 10000
        let thresholds = Thresholds::default();
        assert!(!thresholds.admits(6, 2000));
        assert!(thresholds.admits(5, 2000)); // exactly 10000 passes
    }

    #[test]
    fn oversized_asset_is_rejected() {
        let thresholds = Thresholds::default();
        assert!(!thresholds.admits(1, 3001));
        assert!(thresholds.admits(1, 3000)); // boundary passes
    }

    #[test]
    fn zero_max_occurrences_rejects_everything() {
        let thresholds = Thresholds {
            max_occurrences: Some(0),
            ..Thresholds::UNBOUNDED
        };
        assert!(!thresholds.admits(1, 0));
        assert!(!thresholds.admits(1, 100));
        assert!(!thresholds.admits(50, 0));
    }

    #[test]
    fn zero_size_thresholds_still_admit_empty_assets() {
        let by_asset_size = Thresholds {
            max_asset_size: Some(0),
            ..Thresholds::UNBOUNDED
        };
        assert!(by_asset_size.admits(3, 0)); // 0 > 0 is false
        assert!(!by_asset_size.admits(1, 1));

        let by_total = Thresholds {
            max_total_size: Some(0),
            ..Thresholds::UNBOUNDED
        };
        assert!(by_total.admits(4, 0));
        assert!(!by_total.admits(1, 1));
    }

    #[test]
    fn unbounded_size_limits_leave_only_occurrences() {
        let thresholds = Thresholds {
            max_occurrences: Some(3),
            ..Thresholds::UNBOUNDED
        };
        assert!(thresholds.admits(3, u64::MAX / 4));
        assert!(!thresholds.admits(4, 1));
    }

    #[test]
    fn filter_drops_rejected_and_unsized_groups() {
        let groups = groups_of(&[("/a.svg", 1), ("/b.svg", 6), ("/c.svg", 1)]);
        // /c.svg has no resolved size (its load failed)
        let sizes = sizes_of(&[("/a.svg", 2000), ("/b.svg", 2000)]);

        let surviving = filter_groups(groups, &sizes, &Thresholds::default());
        let ids: Vec<&str> = surviving.keys().map(AssetId::as_str).collect();
        assert_eq!(ids, vec!["/a.svg"]);
        assert_eq!(surviving[&AssetId::new("/a.svg")].len(), 1);
    }

    #[test]
    fn filter_is_idempotent() {
        let groups = groups_of(&[("/a.svg", 2), ("/b.svg", 9), ("/c.svg", 1)]);
        let sizes = sizes_of(&[("/a.svg", 100), ("/b.svg", 2000), ("/c.svg", 5000)]);
        let thresholds = Thresholds::default();

        let once = filter_groups(groups, &sizes, &thresholds);
        let twice = filter_groups(once.clone(), &sizes, &thresholds);
        assert_eq!(once, twice);
    }

    proptest! {
        #[test]
        fn admits_is_stable_and_filter_idempotent(
            occurrences in 1u64..64,
            size in 0u64..100_000,
            max_asset in proptest::option::of(0u64..10_000),
            max_occ in proptest::option::of(0u64..16),
            max_total in proptest::option::of(0u64..200_000),
        ) {
            let thresholds = Thresholds {
                max_asset_size: max_asset,
                max_occurrences: max_occ,
                max_total_size: max_total,
            };

            // Same inputs, same verdict
            prop_assert_eq!(
                thresholds.admits(occurrences, size),
                thresholds.admits(occurrences, size)
            );

            let groups = groups_of(&[("/p.svg", occurrences as usize)]);
            let sizes = sizes_of(&[("/p.svg", size)]);
            let once = filter_groups(groups, &sizes, &thresholds);
            let twice = filter_groups(once.clone(), &sizes, &thresholds);
            prop_assert_eq!(once, twice);
        }
    }
}
