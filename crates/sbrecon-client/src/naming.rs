//! Naming rules imposed by the backend on subscription rules.

/// Longest rule name the backend accepts.
pub const MAX_RULE_NAME_LENGTH: usize = 50;

/// Name of the rule every endpoint carries before any subscription is added.
pub const DEFAULT_RULE_NAME: &str = "$default";

/// Shortens a subscription name to a valid rule name by keeping its last
/// `max_len` characters.
///
/// Message type names share long namespace prefixes, so the tail is the part
/// that tells them apart.
pub fn truncate_rule_name(name: &str, max_len: usize) -> &str {
    let len = name.chars().count();
    if len <= max_len {
        return name;
    }
    let skip = len - max_len;
    match name.char_indices().nth(skip) {
        Some((idx, _)) => &name[idx..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_names_are_untouched() {
        assert_eq!(
            truncate_rule_name("Dg.Test.V1.Subscription", MAX_RULE_NAME_LENGTH),
            "Dg.Test.V1.Subscription"
        );
        assert_eq!(truncate_rule_name("", MAX_RULE_NAME_LENGTH), "");
    }

    #[test]
    fn test_long_names_keep_their_tail() {
        let name = format!("{}{}", "A".repeat(10), "B".repeat(50));
        let truncated = truncate_rule_name(&name, MAX_RULE_NAME_LENGTH);
        assert_eq!(truncated, "B".repeat(50));
        assert!(name.ends_with(truncated));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let name = "ééééé";
        assert_eq!(truncate_rule_name(name, 2), "éé");
    }
}
