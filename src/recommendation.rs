//! Marketing recommendations keyed on cluster id

use std::fmt;

/// Recommendation variant shown under a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    BudgetConscious,
    Premium,
}

/// Clusters with a dedicated recommendation; every other id is Premium
const CLUSTER_RECOMMENDATIONS: &[(i64, Recommendation)] = &[(0, Recommendation::BudgetConscious)];

/// Look up the recommendation for `cluster`
pub fn recommend(cluster: i64) -> Recommendation {
    CLUSTER_RECOMMENDATIONS
        .iter()
        .find(|(id, _)| *id == cluster)
        .map(|(_, rec)| *rec)
        .unwrap_or(Recommendation::Premium)
}

impl Recommendation {
    pub fn headline(&self) -> &'static str {
        match self {
            Recommendation::BudgetConscious => "Budget-Conscious Segment",
            Recommendation::Premium => "Premium Customer Segment",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Recommendation::BudgetConscious => {
                "Focus on discount campaigns, promotions, and value-based messaging"
            }
            Recommendation::Premium => {
                "Target with exclusive offers, VIP programs, and premium product launches"
            }
        }
    }

    pub fn strategy(&self) -> &'static str {
        match self {
            Recommendation::BudgetConscious => {
                "Loyalty programs, bundle offers, and seasonal discounts to increase engagement"
            }
            Recommendation::Premium => {
                "Personalized experiences, early access to new products, and loyalty rewards"
            }
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.headline())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_zero_is_budget_conscious() {
        assert_eq!(recommend(0), Recommendation::BudgetConscious);
    }

    #[test]
    fn test_every_other_cluster_is_premium() {
        for cluster in [1, 2, 3, 7, 42, -1, i64::MAX, i64::MIN] {
            assert_eq!(recommend(cluster), Recommendation::Premium, "cluster {}", cluster);
        }
    }

    #[test]
    fn test_copy_text() {
        let budget = Recommendation::BudgetConscious;
        assert!(budget.headline().starts_with("Budget-Conscious"));
        assert!(budget.strategy().contains("seasonal discounts"));

        let premium = Recommendation::Premium;
        assert!(premium.headline().starts_with("Premium"));
        assert!(premium.description().contains("VIP programs"));
    }
}
