//! The boot image selection persistence boundary.

use eui48::MacAddress;

/// Remembers which boot image a client selected last.
///
/// The server is the only writer, so implementations only need to stay
/// consistent under one writer and many readers.
pub trait SelectionStore: Send + Sync {
    /// The image index the client selected last, if any.
    fn last_selection(&self, client: &MacAddress) -> Option<u16>;

    /// Persists the image index the client just selected.
    fn set_last_selection(&self, client: &MacAddress, index: u16);
}
