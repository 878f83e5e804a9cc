use bulk_sync::{execute, AbortError, Config};

#[test]
fn broadcast_reaches_every_worker() {
    let received = execute::<_, AbortError, _>(Config::process(4), |worker| {
        let value = (worker.index() == 2).then_some(42u64);
        worker.broadcast(2, value)
    })
    .unwrap();
    assert_eq!(received, vec![42; 4]);
}

#[test]
fn all_gather_orders_by_worker_index() {
    let gathered = execute::<_, AbortError, _>(Config::process(5), |worker| {
        worker.all_gather(worker.index() * 10)
    })
    .unwrap();
    for result in gathered {
        assert_eq!(result, vec![0, 10, 20, 30, 40]);
    }
}

#[test]
fn varying_exchange_concatenates_in_sender_order() {
    let results = execute::<_, AbortError, _>(Config::process(4), |worker| {
        // worker i contributes i copies of its index; worker 0 stays silent
        let buffer = vec![worker.index() as u32; worker.index()];
        worker.all_gather_varying(buffer)
    })
    .unwrap();
    for (merged, counts) in results {
        assert_eq!(counts, vec![0, 1, 2, 3]);
        assert_eq!(merged, vec![1, 2, 2, 3, 3, 3]);
    }
}

#[test]
fn varying_exchange_tolerates_all_empty_buffers() {
    let results = execute::<_, AbortError, _>(Config::process(3), |worker| {
        worker.all_gather_varying(Vec::<u32>::new())
    })
    .unwrap();
    for (merged, counts) in results {
        assert!(merged.is_empty());
        assert_eq!(counts, vec![0, 0, 0]);
    }
}

#[test]
fn reduce_elementwise_minimum() {
    let results = execute::<_, AbortError, _>(Config::process(3), |worker| {
        let mut local = vec![u32::MAX; 3];
        local[worker.index()] = worker.index() as u32;
        worker.all_reduce(local, |mut a, b| {
            for (x, y) in a.iter_mut().zip(b) {
                *x = (*x).min(y);
            }
            a
        })
    })
    .unwrap();
    for result in results {
        assert_eq!(result, vec![0, 1, 2]);
    }
}

#[test]
fn reduce_logical_or() {
    let results = execute::<_, AbortError, _>(Config::process(4), |worker| {
        worker.all_reduce(worker.index() == 3, |a, b| a || b)
    })
    .unwrap();
    assert_eq!(results, vec![true; 4]);
}

#[test]
fn single_worker_group_is_trivial() {
    let results = execute::<_, AbortError, _>(Config::process(1), |worker| {
        assert_eq!(worker.peers(), 1);
        let gathered = worker.all_gather(7u8)?;
        assert_eq!(gathered, vec![7]);
        let (merged, counts) = worker.all_gather_varying(vec![1, 2, 3])?;
        assert_eq!(merged, vec![1, 2, 3]);
        assert_eq!(counts, vec![3]);
        worker.broadcast(0, Some("alone".to_string()))
    })
    .unwrap();
    assert_eq!(results, vec!["alone".to_string()]);
}

#[derive(Debug, PartialEq, Eq)]
enum TestError {
    Boom,
    Aborted,
}

impl From<AbortError> for TestError {
    fn from(_: AbortError) -> Self {
        TestError::Aborted
    }
}

#[test]
fn failing_worker_unblocks_the_rest() {
    // Without the abort, workers 1 and 2 would wait forever at the barrier.
    let outcome = execute::<(), TestError, _>(Config::process(3), |worker| {
        if worker.index() == 0 {
            return Err(TestError::Boom);
        }
        worker.barrier()?;
        Ok(())
    });
    assert_eq!(outcome.unwrap_err(), TestError::Boom);
}

#[test]
fn abort_error_surfaces_from_the_first_failure() {
    // Worker 1 fails mid-collective sequence; everyone else was already
    // committed to the next collective and must come back with Boom, not a
    // bare abort.
    let outcome = execute::<(), TestError, _>(Config::process(4), |worker| {
        let round: Vec<usize> = worker.all_gather(worker.index())?;
        assert_eq!(round.len(), 4);
        if worker.index() == 1 {
            return Err(TestError::Boom);
        }
        worker.all_gather(worker.index())?;
        Ok(())
    });
    assert_eq!(outcome.unwrap_err(), TestError::Boom);
}

#[test]
fn collectives_compose_across_many_rounds() {
    let totals = execute::<_, AbortError, _>(Config::process(4), |worker| {
        let mut total = 0usize;
        for round in 0..32 {
            let gathered = worker.all_gather(round + worker.index())?;
            total += gathered.into_iter().sum::<usize>();
        }
        Ok(total)
    })
    .unwrap();
    assert_eq!(totals[0], totals[1]);
    assert_eq!(totals[1], totals[2]);
    assert_eq!(totals[2], totals[3]);
}
