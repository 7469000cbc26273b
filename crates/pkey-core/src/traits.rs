//! Trait interfaces between the key primitives and the wallet:
//! - [`OutputSpender`]: turns an output into a transfer input at a time
//! - [`Addresser`]: exposes a chain address

use crate::error::SpendError;
use crate::types::{Output, TransferInput};

/// Something that can attempt to spend an output at a reference time.
///
/// Implemented by the key manager in `pkey-wallet`. Coin selection only
/// depends on this trait, so tests can supply any spend predicate.
pub trait OutputSpender {
    /// Attempt to spend `output` at unix time `time`.
    fn spend_output(&self, output: &Output, time: u64) -> Result<TransferInput, SpendError>;
}

/// Wraps a closure as an [`OutputSpender`].
pub struct SpendFn<F>(pub F);

impl<F> OutputSpender for SpendFn<F>
where
    F: Fn(&Output, u64) -> Result<TransferInput, SpendError>,
{
    fn spend_output(&self, output: &Output, time: u64) -> Result<TransferInput, SpendError> {
        (self.0)(output, time)
    }
}

/// Exposes the platform-chain address of a key holder.
pub trait Addresser {
    fn p_address(&self) -> &str;
}
