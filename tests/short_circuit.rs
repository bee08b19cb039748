use stepseq::sources::{Receiving, Tracked};
use stepseq::IntoSeq;

use std::thread;

/// Send ascending numbers until nobody is receiving anymore and return how many were delivered.
fn ascending(cap: usize) -> (Receiving<usize>, thread::JoinHandle<usize>) {
    let (tx, rx) = Receiving::bounded(cap);

    let producer = thread::spawn(move || {
        let mut n = 0;
        while tx.send(n).is_ok() {
            n += 1;
        }
        n
    });

    (rx, producer)
}

#[test]
fn test_continue_if_on_channel() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (rx, producer) = ascending(0);

    let small = rx.seq().continue_if(|n| *n < 5).to_list();

    assert_eq!(small, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(producer.join().unwrap(), 6);
}

#[test]
fn test_first_n_on_channel() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (rx, producer) = ascending(0);

    let first = rx.seq().map(|n| n * 2).first_n(3).unwrap().to_list();

    assert_eq!(first, vec![0, 2, 4]);
    assert_eq!(producer.join().unwrap(), 3);
}

#[test]
fn test_any_on_channel() {
    let (rx, producer) = ascending(0);

    assert!(rx.seq().any(|n| *n == 10));
    assert_eq!(producer.join().unwrap(), 11);
}

#[test]
fn test_channel_ends_with_senders() {
    let (tx, rx) = Receiving::channel();

    let fill = thread::spawn(move || {
        for service in ["nginx", "certbot", "postgres", "postfix"] {
            tx.send(service).unwrap();
        }
    });

    assert_eq!(rx.seq().drop_n(2).unwrap().join_str(" "), "postgres postfix");
    fill.join().unwrap();
}

#[test]
fn test_tracked_single() {
    let (naturals, pulls) = Tracked::new(0..);

    assert!(naturals.seq().single().is_err());
    assert_eq!(pulls.get(), 2);
}

#[test]
fn test_tracked_select_by_indices() {
    let (naturals, pulls) = Tracked::new(0..);

    let picked = naturals.seq().select_by_indices([4, 1]).unwrap().to_list();

    assert_eq!(picked, vec![1, 4]);
    assert_eq!(pulls.get(), 5);
}

#[test]
fn test_tracked_all() {
    let (naturals, pulls) = Tracked::new(0..);

    assert!(!naturals.seq().all(|n| *n < 3));
    assert_eq!(pulls.get(), 4);
}
