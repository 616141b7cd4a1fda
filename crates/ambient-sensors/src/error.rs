/// Errors returned by both drivers, `E` is the error of the [`Bus`](crate::Bus).
///
/// A saturated light reading is not an error, see
/// [`Illuminance`](crate::tsl2561::Illuminance).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error<E> {
    /// The peripheral could not be addressed.
    #[error("Could not select peripheral at {address:#x}: {cause:?}")]
    BusUnavailable { address: u16, cause: E },
    /// A write or read failed or moved fewer bytes than needed.
    #[error("Transfer with peripheral at {address:#x} failed: {cause:?}")]
    TransferFailed { address: u16, cause: E },
    /// The checksum in an AM2315 response did not match its content.
    #[error(
        "Checksum mismatch, frame carries {expected:#06x} but content hashes to {computed:#06x}"
    )]
    IntegrityFailure { expected: u16, computed: u16 },
}
