//! Terms and conditions: a single document of fifteen text sections.

use serde::{Deserialize, Serialize};

/// The stored terms and conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionsResponse {
    pub shipping: String,
    pub refund_and_exchange: String,
    pub accounts_and_membership: String,
    pub repairs_and_defects: String,
    pub payment: String,
    pub website_usage: String,
    pub shopping_at_aurora: String,
    pub pricing_policy: String,
    pub property_and_risk: String,
    pub safety_of_personal_details: String,
    pub copyright_and_trademarks: String,
    pub content: String,
    pub third_party_links: String,
    pub acceptance_of_terms: String,
    pub backups: String,
}

/// Create / update body. The admin editor encodes spaces as `|`; absent or
/// blank sections keep their stored text on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionsBody {
    pub shipping: Option<String>,
    pub refund_and_exchange: Option<String>,
    pub accounts_and_membership: Option<String>,
    pub repairs_and_defects: Option<String>,
    pub payment: Option<String>,
    pub website_usage: Option<String>,
    pub shopping_at_aurora: Option<String>,
    pub pricing_policy: Option<String>,
    pub property_and_risk: Option<String>,
    pub safety_of_personal_details: Option<String>,
    pub copyright_and_trademarks: Option<String>,
    pub content: Option<String>,
    pub third_party_links: Option<String>,
    pub acceptance_of_terms: Option<String>,
    pub backups: Option<String>,
}

fn decode(value: Option<String>) -> Option<String> {
    value.map(|v| v.replace('|', " ").trim().to_string())
}

impl ConditionsBody {
    /// Replace the `|` separators with spaces and trim every section.
    pub fn normalized(self) -> Self {
        Self {
            shipping: decode(self.shipping),
            refund_and_exchange: decode(self.refund_and_exchange),
            accounts_and_membership: decode(self.accounts_and_membership),
            repairs_and_defects: decode(self.repairs_and_defects),
            payment: decode(self.payment),
            website_usage: decode(self.website_usage),
            shopping_at_aurora: decode(self.shopping_at_aurora),
            pricing_policy: decode(self.pricing_policy),
            property_and_risk: decode(self.property_and_risk),
            safety_of_personal_details: decode(self.safety_of_personal_details),
            copyright_and_trademarks: decode(self.copyright_and_trademarks),
            content: decode(self.content),
            third_party_links: decode(self.third_party_links),
            acceptance_of_terms: decode(self.acceptance_of_terms),
            backups: decode(self.backups),
        }
    }

    /// Overlay this body on `stored`, keeping stored text for absent or blank
    /// sections.
    pub fn apply_to(&self, stored: &ConditionsResponse) -> ConditionsResponse {
        fn pick(new: &Option<String>, old: &str) -> String {
            match new.as_deref() {
                Some(value) if !value.trim().is_empty() => value.to_string(),
                _ => old.to_string(),
            }
        }
        ConditionsResponse {
            shipping: pick(&self.shipping, &stored.shipping),
            refund_and_exchange: pick(&self.refund_and_exchange, &stored.refund_and_exchange),
            accounts_and_membership: pick(
                &self.accounts_and_membership,
                &stored.accounts_and_membership,
            ),
            repairs_and_defects: pick(&self.repairs_and_defects, &stored.repairs_and_defects),
            payment: pick(&self.payment, &stored.payment),
            website_usage: pick(&self.website_usage, &stored.website_usage),
            shopping_at_aurora: pick(&self.shopping_at_aurora, &stored.shopping_at_aurora),
            pricing_policy: pick(&self.pricing_policy, &stored.pricing_policy),
            property_and_risk: pick(&self.property_and_risk, &stored.property_and_risk),
            safety_of_personal_details: pick(
                &self.safety_of_personal_details,
                &stored.safety_of_personal_details,
            ),
            copyright_and_trademarks: pick(
                &self.copyright_and_trademarks,
                &stored.copyright_and_trademarks,
            ),
            content: pick(&self.content, &stored.content),
            third_party_links: pick(&self.third_party_links, &stored.third_party_links),
            acceptance_of_terms: pick(&self.acceptance_of_terms, &stored.acceptance_of_terms),
            backups: pick(&self.backups, &stored.backups),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pipes_become_spaces() {
        let body: ConditionsBody = serde_json::from_value(json!({
            "shipping": "Ships|within|3|days| ",
            "refundAndExchange": "Fourteen|days"
        }))
        .unwrap();
        let body = body.normalized();
        assert_eq!(body.shipping.as_deref(), Some("Ships within 3 days"));
        assert_eq!(body.refund_and_exchange.as_deref(), Some("Fourteen days"));
        assert_eq!(body.backups, None);
    }

    #[test]
    fn test_apply_keeps_blank_sections() {
        let stored = ConditionsResponse {
            shipping: "old shipping".to_string(),
            payment: "old payment".to_string(),
            ..ConditionsResponse::default()
        };
        let body = ConditionsBody {
            shipping: Some("new shipping".to_string()),
            payment: Some("".to_string()),
            ..ConditionsBody::default()
        };
        let merged = body.apply_to(&stored);
        assert_eq!(merged.shipping, "new shipping");
        assert_eq!(merged.payment, "old payment");
        assert_eq!(merged.content, "");
    }
}
