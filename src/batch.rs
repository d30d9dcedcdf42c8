//! concurrency limited parallel construction of the profiles of one chunk
//!
//! The builder runs min(max_concurrency, nb sequences) worker threads inside a
//! crossbeam scope. A bounded channel feeds (rank, sequence) couples to the
//! workers, so admission into the running set is arbitrated by the channel
//! alone, and each result lands in the pre sized output slot of its rank :
//! no two workers ever write the same slot and the output order is the input
//! order whatever the completion order. The scope join is the barrier, no
//! worker survives the call.

use crate::error::ProcessingError;
use crate::profile::BigramProfile;

/// builds output\[i\] = profile of sequences\[i\] for every i, with at most
/// max_concurrency profiling operations running at once.
///
/// Failure policy : a sequence refused by the profiler (invalid alphabet) does
/// not skip or corrupt the other slots. All queued work still runs to
/// completion, then the first observed fault is returned.
pub fn build_profiles_parallel(
    sequences: &[Vec<u8>],
    max_concurrency: usize,
) -> Result<Vec<BigramProfile>, ProcessingError> {
    //
    if sequences.is_empty() {
        return Ok(Vec::new());
    }
    let nb_workers = max_concurrency.max(1).min(sequences.len());
    log::trace!(
        "build_profiles_parallel, nb sequences : {}, nb workers : {}",
        sequences.len(),
        nb_workers
    );
    // one output slot per input, sized before any worker starts
    let mut slots: Vec<Option<BigramProfile>> = vec![None; sequences.len()];
    let mut first_error: Option<ProcessingError> = None;
    //
    let (work_send, work_receive) = crossbeam_channel::bounded::<(usize, &[u8])>(nb_workers);
    let (result_send, result_receive) =
        crossbeam_channel::bounded::<(usize, Result<BigramProfile, ProcessingError>)>(nb_workers);
    //
    crossbeam_utils::thread::scope(|scope| {
        // profiling workers
        for _ in 0..nb_workers {
            let work_receive = work_receive.clone();
            let result_send = result_send.clone();
            scope.spawn(move |_| {
                while let Ok((rank, sequence)) = work_receive.recv() {
                    let res = BigramProfile::from_sequence(sequence);
                    // receiver lives in the collecting loop below until workers are done
                    result_send.send((rank, res)).unwrap();
                }
            });
        }
        drop(work_receive);
        drop(result_send);
        // sequence sending, productor thread
        scope.spawn(move |_| {
            for (rank, sequence) in sequences.iter().enumerate() {
                if work_send.send((rank, sequence.as_slice())).is_err() {
                    break;
                }
            }
            drop(work_send);
        });
        // collection in the calling thread, runs until every worker has dropped its sender
        while let Ok((rank, res)) = result_receive.recv() {
            match res {
                Ok(profile) => {
                    slots[rank] = Some(profile);
                }
                Err(e) => {
                    log::error!("profiling failed for sequence of rank {} : {}", rank, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
    })
    .unwrap(); // end of scope, all workers joined
    //
    if let Some(e) = first_error {
        return Err(e);
    }
    // every rank was sent exactly once and every worker answered once per rank
    let profiles = slots.into_iter().map(|slot| slot.unwrap()).collect();
    Ok(profiles)
} // end of build_profiles_parallel

//===========================================================================

// end of mod tests
