//! The plain DHCP options carried next to the vendor envelope.

use std::collections::HashMap;

use crate::{options::OptionTag, Error};

/// An outer DHCP option the boot server understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DhcpOption {
    RootPath(String),
    TftpServerName(String),
}

impl DhcpOption {
    pub fn tag(&self) -> OptionTag {
        match self {
            DhcpOption::RootPath(_) => OptionTag::RootPath,
            DhcpOption::TftpServerName(_) => OptionTag::TftpServerName,
        }
    }

    pub fn to_payload(&self) -> Vec<u8> {
        match self {
            DhcpOption::RootPath(path) => path.as_bytes().to_vec(),
            DhcpOption::TftpServerName(name) => name.as_bytes().to_vec(),
        }
    }
}

/// The decoder registry for the outer DHCP options.
///
/// Codes without a registered decoder are ignored, never an error.
#[derive(Debug, Default)]
pub struct DhcpOptionRegistry {
    kinds: HashMap<u8, OptionTag>,
}

impl DhcpOptionRegistry {
    /// The registry with every option the server understands.
    pub fn standard() -> Result<Self, Error> {
        let mut registry = Self::default();
        registry.register(OptionTag::RootPath)?;
        registry.register(OptionTag::TftpServerName)?;
        Ok(registry)
    }

    pub fn register(&mut self, tag: OptionTag) -> Result<(), Error> {
        let code = tag as u8;
        if self.kinds.insert(code, tag).is_some() {
            return Err(Error::DuplicateRegistration { code });
        }
        Ok(())
    }

    pub fn decode(&self, code: u8, payload: &[u8]) -> Result<Option<DhcpOption>, Error> {
        let tag = match self.kinds.get(&code) {
            Some(tag) => *tag,
            None => return Ok(None),
        };
        let option = match tag {
            OptionTag::RootPath => DhcpOption::RootPath(parse_ascii(code, payload)?),
            OptionTag::TftpServerName => DhcpOption::TftpServerName(parse_ascii(code, payload)?),
            _ => return Ok(None),
        };
        Ok(Some(option))
    }
}

fn parse_ascii(code: u8, payload: &[u8]) -> Result<String, Error> {
    if !payload.is_ascii() {
        return Err(Error::MalformedOption {
            code,
            expected: "ASCII text",
        });
    }
    Ok(String::from_utf8_lossy(payload).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_registered_codes() {
        let registry = DhcpOptionRegistry::standard().unwrap();
        assert_eq!(
            registry.decode(17, b"nfs:10.0.0.1:/srv/netboot").unwrap(),
            Some(DhcpOption::RootPath("nfs:10.0.0.1:/srv/netboot".to_owned())),
        );
        assert_eq!(
            registry.decode(66, b"10.0.0.1").unwrap(),
            Some(DhcpOption::TftpServerName("10.0.0.1".to_owned())),
        );
    }

    #[test]
    fn unknown_codes_are_ignored() {
        let registry = DhcpOptionRegistry::standard().unwrap();
        assert_eq!(registry.decode(12, b"whatever").unwrap(), None);
    }

    #[test]
    fn non_ascii_is_malformed() {
        let registry = DhcpOptionRegistry::standard().unwrap();
        assert_eq!(
            registry.decode(17, &[0xc3, 0xa9]),
            Err(Error::MalformedOption {
                code: 17,
                expected: "ASCII text",
            }),
        );
    }

    #[test]
    fn double_registration_fails() {
        let mut registry = DhcpOptionRegistry::standard().unwrap();
        assert_eq!(
            registry.register(OptionTag::RootPath),
            Err(Error::DuplicateRegistration { code: 17 }),
        );
    }
}
