//! Subscription filter convention and validation.
//!
//! A subscription named `Acme.Orders.V1.OrderPlaced` routes every message whose
//! enclosed-types header mentions that name:
//!
//! ```text
//! [NServiceBus.EnclosedMessageTypes] LIKE '%Acme.Orders.V1.OrderPlaced%'
//! ```
//!
//! Validation always runs against the full subscription name; the rule name
//! on the backend may be truncated but the filter never is.

use serde::{Deserialize, Serialize};

use crate::types::RuleFilter;

/// Header property matched by subscription filters unless configured otherwise.
pub const DEFAULT_HEADER_PROPERTY: &str = "NServiceBus.EnclosedMessageTypes";

/// SQL expression of the endpoint's default rule. Matches nothing.
pub const DEFAULT_RULE_EXPRESSION: &str = "1=0";

/// How subscription filters are written for a given endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConvention {
    #[serde(default = "default_header_property")]
    pub header_property: String,
}

fn default_header_property() -> String {
    DEFAULT_HEADER_PROPERTY.to_string()
}

impl Default for FilterConvention {
    fn default() -> Self {
        Self {
            header_property: default_header_property(),
        }
    }
}

impl FilterConvention {
    /// Builds the filter that a subscription with this full name must carry.
    pub fn subscription_filter(&self, subscription: &str) -> RuleFilter {
        RuleFilter::sql(format!(
            "[{}] LIKE '%{}%'",
            self.header_property, subscription
        ))
    }

    /// Filter installed with the endpoint's default rule.
    pub fn default_rule_filter(&self) -> RuleFilter {
        RuleFilter::sql(DEFAULT_RULE_EXPRESSION)
    }

    /// Returns `true` if `filter` is exactly the filter expected for `subscription`.
    pub fn is_filter_correct(&self, filter: &RuleFilter, subscription: &str) -> bool {
        let Some(actual) = filter.sql_expression() else {
            return false;
        };
        match self.subscription_filter(subscription).sql_expression() {
            Some(expected) => actual.trim() == expected,
            None => false,
        }
    }
}

/// Validates `filter` against the default convention.
pub fn is_filter_correct(filter: &RuleFilter, subscription: &str) -> bool {
    FilterConvention::default().is_filter_correct(filter, subscription)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_filter_expression() {
        let filter = FilterConvention::default().subscription_filter("Dg.Test.V1.Subscription");
        assert_eq!(
            filter.sql_expression(),
            Some("[NServiceBus.EnclosedMessageTypes] LIKE '%Dg.Test.V1.Subscription%'")
        );
    }

    #[test]
    fn test_is_filter_correct() {
        let convention = FilterConvention::default();
        let filter = convention.subscription_filter("Acme.Orders.V1.OrderPlaced");

        assert!(is_filter_correct(&filter, "Acme.Orders.V1.OrderPlaced"));
        assert!(!is_filter_correct(&filter, "Acme.Orders.V1.OrderShipped"));
        assert!(!is_filter_correct(
            &RuleFilter::Correlation { label: None },
            "Acme.Orders.V1.OrderPlaced"
        ));
        assert!(!is_filter_correct(
            &convention.default_rule_filter(),
            "Acme.Orders.V1.OrderPlaced"
        ));
    }

    #[test]
    fn test_filter_is_checked_against_full_name() {
        let full = "N".repeat(60);
        let truncated = "N".repeat(50);
        let filter = FilterConvention::default().subscription_filter(&full);

        assert!(is_filter_correct(&filter, &full));
        assert!(!is_filter_correct(&filter, &truncated));
    }

    #[test]
    fn test_custom_header_property() {
        let convention = FilterConvention {
            header_property: "MessageType".to_string(),
        };
        let filter = convention.subscription_filter("Billing.Invoiced");
        assert!(convention.is_filter_correct(&filter, "Billing.Invoiced"));
        assert!(!is_filter_correct(&filter, "Billing.Invoiced"));
    }
}
