use thiserror::Error;

/// The protocol crate error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("the packet is {len} bytes long, at least {min} required")]
    PacketTooSmall { len: usize, min: usize },
    #[error("invalid magic cookie {value:#010x}")]
    InvalidMagicCookie { value: u32 },
    #[error("malformed option {code}: expected {expected}")]
    MalformedOption { code: u8, expected: &'static str },
    #[error("the option area is {size} bytes, the budget is {budget}")]
    OptionTooLarge { size: usize, budget: usize },
    #[error("the {field} field got {len} bytes, it holds at most {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("the {field} field accepts ASCII text only")]
    NotAscii { field: &'static str },
    #[error("option code {code} is already registered")]
    DuplicateRegistration { code: u8 },
}
