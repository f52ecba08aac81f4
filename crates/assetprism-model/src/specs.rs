// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Free-form hardware attributes stored with an asset model. Absent or
/// empty fields are encoded as explicit JSON nulls so a decoded blob always
/// has the full three-key shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specifications {
    pub cpu: Option<String>,
    pub ram: Option<String>,
    pub storage: Option<String>,
}

impl Specifications {
    #[must_use]
    pub fn new(cpu: Option<String>, ram: Option<String>, storage: Option<String>) -> Self {
        Self {
            cpu: non_empty(cpu),
            ram: non_empty(ram),
            storage: non_empty(storage),
        }
    }

    /// Serialize to the stored blob. Infallible: the shape is built from
    /// `json!` and stringified directly.
    #[must_use]
    pub fn encode(&self) -> String {
        json!({
            "cpu": self.cpu,
            "ram": self.ram,
            "storage": self.storage,
        })
        .to_string()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// MAC address lists share the opaque-encoding contract of specifications.
#[must_use]
pub fn encode_mac_addresses(list: &[String]) -> String {
    json!(list).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn encode_always_emits_all_three_keys() {
        let blob = Specifications::new(Some("i7-1185G7".to_string()), None, None).encode();
        let value: Value = serde_json::from_str(&blob).expect("valid json");
        assert_eq!(value["cpu"], "i7-1185G7");
        assert!(value["ram"].is_null());
        assert!(value["storage"].is_null());
    }

    #[test]
    fn empty_string_fields_become_null() {
        let blob = Specifications::new(Some(String::new()), Some("16GB".to_string()), None).encode();
        let value: Value = serde_json::from_str(&blob).expect("valid json");
        assert!(value["cpu"].is_null());
        assert_eq!(value["ram"], "16GB");
    }

    #[test]
    fn specifications_round_trip() {
        let specs = Specifications::new(
            Some("i5".to_string()),
            Some("8GB".to_string()),
            Some("256GB SSD".to_string()),
        );
        let decoded: Specifications =
            serde_json::from_str(&specs.encode()).expect("round trip");
        assert_eq!(decoded, specs);
    }

    #[test]
    fn mac_addresses_encode_as_json_array() {
        let blob = encode_mac_addresses(&["aa:bb:cc:dd:ee:ff".to_string()]);
        let value: Value = serde_json::from_str(&blob).expect("valid json");
        assert_eq!(value[0], "aa:bb:cc:dd:ee:ff");
    }
}
