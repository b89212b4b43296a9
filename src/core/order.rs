//! Orderer: arrival-order passthrough or full-barrier original order

use super::{HashReport, ReportSink};
use crate::config::OutputOrder;
use crate::error::{HashPipeError, Result};
use crossbeam::channel::Receiver;

/// Drain the merged stream and place every report at its sequence index.
///
/// Blocks until the stream closes. Fails if a report falls outside
/// `[0, count)`, if two reports share a sequence, or if any slot is still
/// empty once the stream is exhausted.
pub fn collect_in_order(merged: &Receiver<HashReport>, count: usize) -> Result<Vec<HashReport>> {
    let mut slots: Vec<Option<HashReport>> = Vec::with_capacity(count);
    slots.resize_with(count, || None);

    for report in merged.iter() {
        let sequence = report.sequence();
        let slot = slots.get_mut(sequence).ok_or_else(|| {
            HashPipeError::OrderingError(format!(
                "sequence {} outside of {} submitted jobs",
                sequence, count
            ))
        })?;

        if slot.is_some() {
            return Err(HashPipeError::OrderingError(format!(
                "duplicate report for sequence {}",
                sequence
            )));
        }
        *slot = Some(report);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(sequence, slot)| {
            slot.ok_or_else(|| {
                HashPipeError::OrderingError(format!("no report for sequence {}", sequence))
            })
        })
        .collect()
}

/// Send every merged report to `sink` in the requested order.
///
/// Returns the number of reports emitted.
pub fn drain_to_sink<S>(
    merged: &Receiver<HashReport>,
    order: OutputOrder,
    count: usize,
    sink: &mut S,
) -> Result<usize>
where
    S: ReportSink + ?Sized,
{
    match order {
        OutputOrder::Arrival => {
            let mut emitted = 0usize;
            for report in merged.iter() {
                sink.emit(&report).map_err(HashPipeError::Output)?;
                emitted += 1;
            }
            Ok(emitted)
        }
        OutputOrder::Original => {
            let reports = collect_in_order(merged, count)?;
            for report in &reports {
                sink.emit(report).map_err(HashPipeError::Output)?;
            }
            Ok(reports.len())
        }
    }
}
