//! Store Settings Model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Store settings document
///
/// Known keys are typed; anything else the server returns is kept in
/// `extra` and written back untouched on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_charge: Option<f64>,
    /// Percentage, e.g. 5 = 5%
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let json = serde_json::json!({
            "storeName": "Andhra Potlam",
            "taxRate": 5.0,
            "whatsappNumber": "+91 90000 00000"
        });
        let settings: Settings = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(settings.store_name.as_deref(), Some("Andhra Potlam"));
        assert!(settings.extra.contains_key("whatsappNumber"));
        assert_eq!(serde_json::to_value(&settings).unwrap(), json);
    }
}
