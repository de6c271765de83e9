//! The single-level code/length/value option table and the outer DHCP options.

mod dhcp;
mod message_type;
mod option_tag;

pub use self::{
    dhcp::{DhcpOption, DhcpOptionRegistry},
    message_type::MessageType,
    option_tag::OptionTag,
};

use std::collections::BTreeMap;

use bytes::BufMut;

use crate::{
    constants::{END_OPTION, SIZE_OPTION_PAYLOAD_MAX, SIZE_OPTION_PREFIX},
    Error,
};

/// One level of code/length/value options.
///
/// Used both for the outer option area behind the magic cookie and for the
/// vendor table encapsulated in option 43. Entries are kept in ascending
/// code order and a later `insert` replaces an earlier one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OptionTable {
    entries: BTreeMap<u8, Vec<u8>>,
}

impl OptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: u8, payload: Vec<u8>) {
        self.entries.insert(code, payload);
    }

    pub fn remove(&mut self, code: u8) -> Option<Vec<u8>> {
        self.entries.remove(&code)
    }

    pub fn get(&self, code: u8) -> Option<&[u8]> {
        self.entries.get(&code).map(Vec::as_slice)
    }

    pub fn contains(&self, code: u8) -> bool {
        self.entries.contains_key(&code)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &[u8])> {
        self.entries.iter().map(|(&code, payload)| (code, payload.as_slice()))
    }

    /// The wire size of all entries, the end option excluded.
    pub fn wire_len(&self) -> usize {
        self.entries
            .values()
            .map(|payload| SIZE_OPTION_PREFIX + payload.len())
            .sum()
    }

    /// Scans the option bytes left to right.
    ///
    /// Stops at the end option or at the end of the input, so a missing
    /// end option is an implicit end of the table. A declared length
    /// running past the input is an error.
    pub fn from_bytes(src: &[u8]) -> Result<Self, Error> {
        let mut entries = BTreeMap::new();
        let mut position = 0;
        while position < src.len() && src[position] != END_OPTION {
            let code = src[position];
            let length = usize::from(*src.get(position + 1).ok_or(Error::MalformedOption {
                code,
                expected: "a length byte",
            })?);
            position += SIZE_OPTION_PREFIX;
            let payload = src
                .get(position..position + length)
                .ok_or(Error::MalformedOption {
                    code,
                    expected: "the declared payload length",
                })?;
            entries.insert(code, payload.to_vec());
            position += length;
        }
        Ok(OptionTable { entries })
    }

    /// Writes the entries followed by the end option.
    ///
    /// `budget` caps the entry bytes, the end option excluded.
    pub fn to_bytes(&self, budget: usize) -> Result<Vec<u8>, Error> {
        let size = self.wire_len();
        if size > budget {
            return Err(Error::OptionTooLarge { size, budget });
        }
        let mut buffer = Vec::with_capacity(size + 1);
        for (&code, payload) in &self.entries {
            if payload.len() > SIZE_OPTION_PAYLOAD_MAX {
                return Err(Error::OptionTooLarge {
                    size: payload.len(),
                    budget: SIZE_OPTION_PAYLOAD_MAX,
                });
            }
            buffer.put_u8(code);
            buffer.put_u8(payload.len() as u8);
            buffer.put_slice(payload);
        }
        buffer.put_u8(END_OPTION);
        Ok(buffer)
    }
}
