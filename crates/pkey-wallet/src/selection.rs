//! Greedy UTXO selection.
//!
//! Candidates are visited in the order given. Each one is offered to an
//! [`OutputSpender`]; outputs it cannot spend at the reference time are
//! recorded as skipped and the walk continues. With a non-zero target the
//! walk stops as soon as the running total exceeds `target + fee`. With a
//! zero target every spendable candidate is taken.
//!
//! The selected inputs are always returned sorted by [`UtxoId`], so the
//! result does not depend on the order in which they were picked.

use pkey_core::error::SpendError;
use pkey_core::ids::UtxoId;
use pkey_core::traits::OutputSpender;
use pkey_core::types::{TransferableInput, Utxo, sort_transferable_inputs};
use tracing::warn;

/// Parameters for one selection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionParams {
    /// Amount to cover. Zero selects every spendable UTXO.
    pub target_amount: u64,
    /// Fee added to the target before comparing against the running total.
    pub fee_deduct: u64,
    /// Unix time used for lock-time checks.
    pub time: u64,
}

impl SelectionParams {
    /// Select everything spendable at `time`.
    pub fn sweep(time: u64) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target_amount: u64) -> Self {
        self.target_amount = target_amount;
        self
    }

    pub fn with_fee(mut self, fee_deduct: u64) -> Self {
        self.fee_deduct = fee_deduct;
        self
    }

    pub fn with_time(mut self, time: u64) -> Self {
        self.time = time;
        self
    }

    pub fn is_sweep(&self) -> bool {
        self.target_amount == 0
    }

    /// The total that must be strictly exceeded to stop early.
    pub fn stop_threshold(&self) -> u64 {
        self.target_amount.saturating_add(self.fee_deduct)
    }
}

/// A candidate that could not be spent, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedUtxo {
    pub utxo_id: UtxoId,
    pub reason: SpendError,
}

/// Outcome of offering a single UTXO to a spender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpendOutcome {
    Spendable(TransferableInput),
    Skipped(SkippedUtxo),
}

/// Result of a selection run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    /// Sum of the selected input amounts.
    pub total: u64,
    /// Selected inputs, sorted by UTXO ID.
    pub inputs: Vec<TransferableInput>,
    /// Candidates visited but not spendable, in visit order.
    pub skipped: Vec<SkippedUtxo>,
}

impl Selection {
    /// Split into `(total, inputs)`, dropping the skip list.
    pub fn into_parts(self) -> (u64, Vec<TransferableInput>) {
        (self.total, self.inputs)
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Greedy UTXO selector.
pub struct UtxoSelector;

impl UtxoSelector {
    /// Offer one UTXO to `spender` at `time`.
    pub fn attempt(utxo: &Utxo, spender: &dyn OutputSpender, time: u64) -> SpendOutcome {
        match spender.spend_output(&utxo.output, time) {
            Ok(input) => SpendOutcome::Spendable(TransferableInput {
                utxo_id: utxo.utxo_id,
                asset_id: utxo.asset_id,
                input,
            }),
            Err(reason) => SpendOutcome::Skipped(SkippedUtxo {
                utxo_id: utxo.utxo_id,
                reason,
            }),
        }
    }

    /// Select inputs from `utxos` according to `params`.
    pub fn select(
        utxos: &[Utxo],
        spender: &dyn OutputSpender,
        params: &SelectionParams,
    ) -> Selection {
        let mut selection = Selection::default();

        for utxo in utxos {
            match Self::attempt(utxo, spender, params.time) {
                SpendOutcome::Spendable(input) => {
                    selection.total = selection.total.saturating_add(input.amount());
                    selection.inputs.push(input);
                }
                SpendOutcome::Skipped(skipped) => {
                    warn!(
                        utxo = %skipped.utxo_id,
                        error = %skipped.reason,
                        "skipping unspendable UTXO"
                    );
                    selection.skipped.push(skipped);
                    continue;
                }
            }

            if !params.is_sweep() && selection.total > params.stop_threshold() {
                break;
            }
        }

        sort_transferable_inputs(&mut selection.inputs);
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkey_core::ids::{Id, ShortId};
    use pkey_core::traits::SpendFn;
    use pkey_core::types::{
        Input, MintOutput, Output, OutputOwners, TransferInput, TransferOutput,
    };
    use proptest::prelude::*;

    fn spender() -> SpendFn<impl Fn(&Output, u64) -> Result<TransferInput, SpendError>> {
        SpendFn(|output: &Output, time: u64| {
            let owners = output.owners();
            if owners.locktime > time {
                return Err(SpendError::Locked {
                    locktime: owners.locktime,
                    time,
                });
            }
            match output {
                Output::Transfer(out) => Ok(TransferInput {
                    amount: out.amount,
                    input: Input { sig_indices: vec![0] },
                }),
                Output::Mint(_) => Err(SpendError::InvalidType),
            }
        })
    }

    fn utxo(tx: u8, index: u32, amount: u64, locktime: u64) -> Utxo {
        Utxo {
            utxo_id: UtxoId::new(Id([tx; 32]), index),
            asset_id: Id([0xAA; 32]),
            output: Output::Transfer(TransferOutput {
                amount,
                owners: OutputOwners {
                    locktime,
                    ..OutputOwners::single(ShortId([1; 20]))
                },
            }),
        }
    }

    fn ids(selection: &Selection) -> Vec<(u8, u32)> {
        selection
            .inputs
            .iter()
            .map(|i| (i.utxo_id.tx_id.0[0], i.utxo_id.output_index))
            .collect()
    }

    #[test]
    fn params_builders() {
        let p = SelectionParams::sweep(7).with_target(100).with_fee(3);
        assert_eq!(p, SelectionParams { target_amount: 100, fee_deduct: 3, time: 7 });
        assert_eq!(p.stop_threshold(), 103);
        assert!(!p.is_sweep());
        assert!(SelectionParams::default().is_sweep());
        assert_eq!(SelectionParams::default().with_time(9).time, 9);
    }

    #[test]
    fn stop_threshold_saturates() {
        let p = SelectionParams::default().with_target(u64::MAX).with_fee(1);
        assert_eq!(p.stop_threshold(), u64::MAX);
    }

    #[test]
    fn empty_candidates() {
        let s = UtxoSelector::select(&[], &spender(), &SelectionParams::default());
        assert_eq!(s, Selection::default());
        assert!(s.is_empty());
        assert_eq!(s.into_parts(), (0, vec![]));
    }

    #[test]
    fn early_stop_after_exceeding_target() {
        let utxos = vec![utxo(3, 0, 10, 0), utxo(1, 0, 10, 0), utxo(2, 0, 10, 0)];
        let params = SelectionParams::default().with_target(15);
        let s = UtxoSelector::select(&utxos, &spender(), &params);
        assert_eq!(s.total, 20);
        // First two visited, returned in ID order
        assert_eq!(ids(&s), vec![(1, 0), (3, 0)]);
    }

    #[test]
    fn equal_to_threshold_does_not_stop() {
        let utxos = vec![utxo(1, 0, 10, 0), utxo(2, 0, 5, 0), utxo(3, 0, 1, 0)];
        let params = SelectionParams::default().with_target(10).with_fee(5);
        let s = UtxoSelector::select(&utxos, &spender(), &params);
        assert_eq!(s.total, 16);
        assert_eq!(s.inputs.len(), 3);
    }

    #[test]
    fn fee_raises_stop_point() {
        let utxos = vec![utxo(1, 0, 10, 0), utxo(2, 0, 10, 0), utxo(3, 0, 10, 0)];
        let params = SelectionParams::default().with_target(15).with_fee(10);
        let s = UtxoSelector::select(&utxos, &spender(), &params);
        assert_eq!(s.total, 30);
    }

    #[test]
    fn target_unreachable_returns_everything_spendable() {
        let utxos = vec![utxo(1, 0, 10, 0), utxo(2, 0, 10, 0)];
        let params = SelectionParams::default().with_target(1_000);
        let s = UtxoSelector::select(&utxos, &spender(), &params);
        assert_eq!(s.total, 20);
        assert_eq!(s.inputs.len(), 2);
    }

    #[test]
    fn sweep_takes_all_sorted() {
        let utxos = vec![
            utxo(9, 1, 4, 0),
            utxo(2, 7, 1, 0),
            utxo(2, 3, 2, 0),
            utxo(5, 0, 3, 0),
        ];
        let s = UtxoSelector::select(&utxos, &spender(), &SelectionParams::sweep(0));
        assert_eq!(s.total, 10);
        assert_eq!(ids(&s), vec![(2, 3), (2, 7), (5, 0), (9, 1)]);
        assert!(s.skipped.is_empty());
    }

    #[test]
    fn locked_utxo_skipped_without_aborting() {
        let utxos = vec![utxo(1, 0, 10, 500), utxo(2, 0, 7, 0), utxo(3, 0, 8, 100)];
        let s = UtxoSelector::select(&utxos, &spender(), &SelectionParams::sweep(100));
        assert_eq!(s.total, 15);
        assert_eq!(ids(&s), vec![(2, 0), (3, 0)]);
        assert_eq!(
            s.skipped,
            vec![SkippedUtxo {
                utxo_id: UtxoId::new(Id([1; 32]), 0),
                reason: SpendError::Locked { locktime: 500, time: 100 },
            }]
        );
    }

    #[test]
    fn nothing_spendable_is_not_an_error() {
        let utxos = vec![utxo(1, 0, 10, 50), utxo(2, 0, 10, 50)];
        let s = UtxoSelector::select(&utxos, &spender(), &SelectionParams::sweep(0));
        assert_eq!(s.total, 0);
        assert!(s.inputs.is_empty());
        assert_eq!(s.skipped.len(), 2);
    }

    #[test]
    fn skipped_utxos_do_not_count_toward_target() {
        let utxos = vec![utxo(1, 0, 100, 9), utxo(2, 0, 10, 0), utxo(3, 0, 10, 0)];
        let params = SelectionParams::default().with_target(15);
        let s = UtxoSelector::select(&utxos, &spender(), &params);
        assert_eq!(s.total, 20);
        assert_eq!(ids(&s), vec![(2, 0), (3, 0)]);
    }

    #[test]
    fn unvisited_candidates_are_not_reported() {
        let utxos = vec![utxo(1, 0, 50, 0), utxo(2, 0, 5, 99)];
        let params = SelectionParams::default().with_target(10);
        let s = UtxoSelector::select(&utxos, &spender(), &params);
        assert_eq!(s.inputs.len(), 1);
        assert!(s.skipped.is_empty());
    }

    #[test]
    fn mint_output_skipped_as_invalid_type() {
        let mint = Utxo {
            utxo_id: UtxoId::new(Id([4; 32]), 0),
            asset_id: Id::EMPTY,
            output: Output::Mint(MintOutput {
                owners: OutputOwners::single(ShortId([1; 20])),
            }),
        };
        match UtxoSelector::attempt(&mint, &spender(), 0) {
            SpendOutcome::Skipped(s) => assert_eq!(s.reason, SpendError::InvalidType),
            other => panic!("expected skip, got {other:?}"),
        }
    }

    #[test]
    fn attempt_carries_ids_and_amount() {
        let u = utxo(6, 2, 33, 0);
        match UtxoSelector::attempt(&u, &spender(), 0) {
            SpendOutcome::Spendable(input) => {
                assert_eq!(input.utxo_id, u.utxo_id);
                assert_eq!(input.asset_id, u.asset_id);
                assert_eq!(input.amount(), 33);
            }
            other => panic!("expected spendable, got {other:?}"),
        }
    }

    #[test]
    fn total_saturates() {
        let utxos = vec![utxo(1, 0, u64::MAX, 0), utxo(2, 0, 5, 0)];
        let s = UtxoSelector::select(&utxos, &spender(), &SelectionParams::sweep(0));
        assert_eq!(s.total, u64::MAX);
        assert_eq!(s.inputs.len(), 2);
    }

    fn arb_utxos() -> impl Strategy<Value = Vec<Utxo>> {
        prop::collection::vec((1u64..1_000, 0u64..20), 0..24).prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (amount, locktime))| utxo((i % 7) as u8, i as u32, amount, locktime))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn selection_is_deterministic(
            utxos in arb_utxos(),
            target in 0u64..5_000,
            fee in 0u64..50,
            time in 0u64..20,
        ) {
            let params = SelectionParams { target_amount: target, fee_deduct: fee, time };
            let a = UtxoSelector::select(&utxos, &spender(), &params);
            let b = UtxoSelector::select(&utxos, &spender(), &params);
            prop_assert_eq!(&a, &b);
            prop_assert!(pkey_core::types::is_sorted_and_unique(&a.inputs));
            let sum: u64 = a.inputs.iter().map(|i| i.amount()).sum();
            prop_assert_eq!(a.total, sum);
        }

        #[test]
        fn sweep_ignores_candidate_order(utxos in arb_utxos(), time in 0u64..20) {
            let mut reversed = utxos.clone();
            reversed.reverse();
            let params = SelectionParams::sweep(time);
            let a = UtxoSelector::select(&utxos, &spender(), &params);
            let b = UtxoSelector::select(&reversed, &spender(), &params);
            prop_assert_eq!(a.total, b.total);
            prop_assert_eq!(&a.inputs, &b.inputs);
            prop_assert_eq!(a.skipped.len() + b.inputs.len(), utxos.len());
        }

        #[test]
        fn inputs_are_a_subset_with_matching_amounts(utxos in arb_utxos(), target in 0u64..5_000) {
            let s = UtxoSelector::select(&utxos, &spender(), &SelectionParams::default().with_target(target));
            for input in &s.inputs {
                let source = utxos.iter().find(|u| u.utxo_id == input.utxo_id);
                prop_assert!(source.is_some());
                if let Some(Utxo { output: Output::Transfer(out), .. }) = source {
                    prop_assert_eq!(out.amount, input.amount());
                }
            }
        }
    }
}
