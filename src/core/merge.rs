//! Fan-in of several result streams into one

use crate::error::{HashPipeError, Result};
use crossbeam::channel::{bounded, Receiver};
use std::thread::{self, JoinHandle};

/// Merge `streams` into a single stream.
///
/// One forwarder thread per input moves items across as they arrive, so
/// the output interleaves in no particular order. The merged stream closes
/// only after every input stream has closed and been drained. With no
/// inputs it is closed from the start.
pub fn merge_streams<T>(
    streams: Vec<Receiver<T>>,
    capacity: usize,
) -> Result<(Receiver<T>, Vec<JoinHandle<usize>>)>
where
    T: Send + 'static,
{
    let (tx, rx) = bounded(capacity);
    let mut handles = Vec::with_capacity(streams.len());

    for (index, stream) in streams.into_iter().enumerate() {
        let tx = tx.clone();
        let handle = thread::Builder::new()
            .name(format!("hashpipe-merge-{}", index))
            .spawn(move || {
                let mut forwarded = 0usize;
                for item in stream.iter() {
                    if tx.send(item).is_err() {
                        tracing::debug!("Merged stream closed, forwarder {} stopping", index);
                        break;
                    }
                    forwarded += 1;
                }
                forwarded
            })
            .map_err(|e| HashPipeError::ThreadPoolError(e.to_string()))?;
        handles.push(handle);
    }

    // Forwarders hold the only remaining senders.
    drop(tx);

    Ok((rx, handles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_no_streams_closes_immediately() {
        let (merged, handles) = merge_streams::<u32>(Vec::new(), 0).unwrap();
        assert!(handles.is_empty());
        assert!(merged.recv().is_err());
    }

    #[test]
    fn test_every_item_delivered_once() {
        let mut streams = Vec::new();
        let mut producers = Vec::new();
        for stream_id in 0..4u32 {
            let (tx, rx) = bounded(2);
            streams.push(rx);
            producers.push(thread::spawn(move || {
                for n in 0..50u32 {
                    tx.send(stream_id * 1000 + n).unwrap();
                }
            }));
        }

        let (merged, handles) = merge_streams(streams, 0).unwrap();
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for item in merged.iter() {
            *counts.entry(item).or_default() += 1;
        }

        assert_eq!(counts.len(), 200);
        assert!(counts.values().all(|&c| c == 1));
        for producer in producers {
            producer.join().unwrap();
        }
        let forwarded: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(forwarded, 200);
    }

    #[test]
    fn test_empty_input_stream_does_not_block_others() {
        let (empty_tx, empty_rx) = bounded::<u8>(0);
        drop(empty_tx);
        let (tx, rx) = bounded(4);
        tx.send(7u8).unwrap();
        tx.send(9u8).unwrap();
        drop(tx);

        let (merged, _handles) = merge_streams(vec![empty_rx, rx], 1).unwrap();
        let mut items: Vec<u8> = merged.iter().collect();
        items.sort_unstable();
        assert_eq!(items, vec![7, 9]);
    }
}
