use stepseq::adapters::create_new;
use stepseq::sources::Tracked;
use stepseq::{nested, Error, IntoSeq, Seq, StepAction};

use std::iter;

fn sources() -> Vec<Vec<i32>> {
    vec![
        vec![],
        vec![0],
        vec![3, -1, 4, 1, -5],
        (0..50).collect(),
        vec![7; 9],
    ]
}

#[test]
fn test_order_preservation() {
    let f = |n: i32| n * 3 - 1;

    for source in sources() {
        let expected: Vec<i32> = source.iter().map(|n| f(*n)).collect();
        assert_eq!(Seq::new(source).map(f).to_list(), expected);
    }
}

#[test]
fn test_short_circuit() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (naturals, pulls) = Tracked::new(0..);

    let small = naturals.seq().continue_if(|n| *n < 5).to_list();

    assert_eq!(small, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(pulls.get(), 6);
}

#[test]
fn test_flatten_correctness() {
    let source = nested![1, [2, [3, 4], 5], 6].into_children();

    assert_eq!(
        Seq::new(source.clone()).leaves().to_list(),
        vec![1, 2, 3, 4, 5, 6]
    );
    assert_eq!(
        Seq::new(source).flatten(Some(1)).to_list(),
        nested![1, 2, [3, 4], 5, 6].into_children()
    );
}

#[test]
fn test_first_n_zero() {
    for source in sources() {
        let (tracked, pulls) = Tracked::new(source);
        assert_eq!(tracked.seq().first_n(0).unwrap().count(), 0);
        assert_eq!(pulls.get(), 0);
    }

    let (naturals, pulls) = Tracked::new(0..);
    assert_eq!(naturals.seq().first_n(0).unwrap().to_list(), vec![]);
    assert_eq!(pulls.get(), 0);
}

#[test]
fn test_single_or_contract() {
    assert_eq!(Seq::new([]).single_or(-1), Ok(-1));
    assert_eq!(Seq::new([7]).single_or(-1), Ok(7));
    assert_eq!(Seq::new([7, 8]).single_or(-1), Err(Error::MoreThanOneValue));
}

#[test]
fn test_first_n_drop_n_complementarity() {
    for source in sources() {
        for n in 0..=source.len() + 2 {
            let n = n as isize;
            let rest = Seq::new(source.clone()).drop_n(n).unwrap().to_list();
            let rejoined = Seq::new(source.clone())
                .first_n(n)
                .unwrap()
                .concat_with([rest])
                .to_list();
            assert_eq!(rejoined, source);
        }
    }
}

#[test]
fn test_group_by_ordering() {
    let groups = Seq::new([1, 2, 3, 4, 5]).group_by(|n| n % 2);

    let groups: Vec<(i32, Vec<i32>)> = groups.into_iter().collect();
    assert_eq!(groups, vec![(1, vec![1, 3, 5]), (0, vec![2, 4])]);
}

#[test]
fn test_fallback_default() {
    assert!(Seq::new(iter::empty::<i32>()).all(|_| false));
    assert!(Seq::new(iter::empty::<i32>()).all(|_| true));
    assert!(!Seq::new(iter::empty::<i32>()).any(|_| false));
    assert!(!Seq::new(iter::empty::<i32>()).any(|_| true));
}

#[test]
fn test_select_by_indices() {
    let picked = Seq::new(['a', 'b', 'c', 'd']).select_by_indices([0, 2]).unwrap();
    assert_eq!(picked.to_list(), vec!['a', 'c']);

    assert_eq!(
        Seq::new(['a', 'b', 'c', 'd']).select_by_indices([]).err(),
        Some(Error::NoIndices)
    );
}

#[test]
fn test_negative_counts() {
    let _ = env_logger::builder().is_test(true).try_init();

    assert_eq!(
        Seq::new([1, 2]).first_n(-2).err(),
        Some(Error::NegativeCount {
            name: "max_count",
            count: -2
        })
    );
    assert_eq!(
        Seq::new([1, 2]).drop_n(-1).err(),
        Some(Error::NegativeCount { name: "n", count: -1 })
    );
}

#[test]
fn test_first_index_stops_pulling() {
    let (naturals, pulls) = Tracked::new(0..);

    assert_eq!(naturals.seq().first_index(|n| n * n > 50), Some(8));
    assert_eq!(pulls.get(), 9);
}

#[test]
fn test_post_hook_on_empty_source() {
    let counts: Vec<usize> = create_new(
        iter::empty::<()>(),
        |_, _| StepAction::<usize, ()>::skip(),
        (),
    )
    .post_hook(StepAction::push)
    .collect();

    assert_eq!(counts, vec![0]);
}

#[test]
fn test_pre_hook_stop() {
    let (naturals, pulls) = Tracked::new(0..);

    let taken: Vec<u32> = create_new(naturals, |n, _| StepAction::push(n), ())
        .pre_hook(|_| StepAction::stop(()))
        .collect();

    assert!(taken.is_empty());
    assert_eq!(pulls.get(), 0);
}

#[test]
fn test_stop_inside_aggregate() {
    let (naturals, pulls) = Tracked::new(0..);

    let pushed: Vec<u32> = create_new(
        naturals,
        |n, _| {
            if n == 2 {
                StepAction::aggregate([
                    StepAction::push(n),
                    StepAction::aggregate([StepAction::stop(()), StepAction::push(99)]),
                ])
            } else {
                StepAction::push(n)
            }
        },
        (),
    )
    .collect();

    assert_eq!(pushed, vec![0, 1, 2]);
    assert_eq!(pulls.get(), 3);
}
