//! A RAM implementation of the selection storage.
//! Selections are lost when the process exits.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use eui48::MacAddress;

use crate::storage::SelectionStore;

#[derive(Debug, Default)]
pub struct RamSelectionStore {
    selections: Mutex<HashMap<String, u16>>,
}

impl RamSelectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStore for RamSelectionStore {
    fn last_selection(&self, client: &MacAddress) -> Option<u16> {
        self.selections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key(client))
            .copied()
    }

    fn set_last_selection(&self, client: &MacAddress, index: u16) {
        self.selections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key(client), index);
    }
}

fn key(client: &MacAddress) -> String {
    client.to_hex_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remembers_the_last_selection() {
        let storage = RamSelectionStore::new();
        let client = MacAddress::new([0x00, 0x17, 0xf2, 0x2a, 0x05, 0x9b]);
        let other = MacAddress::new([0x00, 0x17, 0xf2, 0x2a, 0x05, 0x9c]);

        assert_eq!(storage.last_selection(&client), None);
        storage.set_last_selection(&client, 3);
        assert_eq!(storage.last_selection(&client), Some(3));
        assert_eq!(storage.last_selection(&other), None);

        storage.set_last_selection(&client, 5);
        assert_eq!(storage.last_selection(&client), Some(5));
    }
}
