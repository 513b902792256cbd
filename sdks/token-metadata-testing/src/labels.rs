//! Human-readable address labels for test diagnostics.

use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;

/// Address-to-label registry.
///
/// Passed around explicitly by the tests that want labeled output; there is
/// no global registry.
#[derive(Debug, Default)]
pub struct AddressLabels {
    labels: HashMap<Pubkey, String>,
}

impl AddressLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `label` for `address`; the latest registration wins.
    pub fn add(&mut self, address: Pubkey, label: impl Into<String>) {
        self.labels.insert(address, label.into());
    }

    pub fn get(&self, address: &Pubkey) -> Option<&str> {
        self.labels.get(address).map(String::as_str)
    }

    /// Label for `address`, falling back to an abbreviated base58 form.
    pub fn display(&self, address: &Pubkey) -> String {
        match self.get(address) {
            Some(label) => label.to_string(),
            None => {
                let base58 = address.to_string();
                format!("{}..{}", &base58[..4], &base58[base58.len() - 4..])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_labels_are_returned() {
        let mut labels = AddressLabels::new();
        let address = Pubkey::new_unique();
        labels.add(address, "create:payer");
        assert_eq!(labels.get(&address), Some("create:payer"));
        assert_eq!(labels.display(&address), "create:payer");
    }

    #[test]
    fn latest_registration_wins() {
        let mut labels = AddressLabels::new();
        let address = Pubkey::new_unique();
        labels.add(address, "old");
        labels.add(address, "new");
        assert_eq!(labels.get(&address), Some("new"));
    }

    #[test]
    fn unknown_addresses_abbreviate() {
        let labels = AddressLabels::new();
        let address = Pubkey::new_unique();
        let shown = labels.display(&address);
        let base58 = address.to_string();
        assert_eq!(shown, format!("{}..{}", &base58[..4], &base58[base58.len() - 4..]));
        assert!(labels.get(&address).is_none());
    }
}
