use super::*;

fn rate(n: u32) -> Option<NonZeroU32> {
    NonZeroU32::new(n)
}

#[test]
fn init_blank_or_copy() {
    let first = Frame::new(2, 2, 3, vec![5; 12]).unwrap();

    let blank = BaseFrameStore::init(&first, true).unwrap();
    assert!(blank.frame().same_geometry(&first));
    assert!(blank.frame().data.iter().all(|&b| b == 0));

    let copy = BaseFrameStore::init(&first, false).unwrap();
    assert_eq!(copy.frame(), &first);
}

#[test]
fn reset_fires_on_multiples_of_refresh_rate() {
    let first = Frame::new(2, 2, 1, vec![1; 4]).unwrap();
    let mut store = BaseFrameStore::init(&first, false).unwrap();

    let mut fired = Vec::new();
    for i in 0..7u64 {
        store.frame_mut().data.fill(9);
        if store.reset_if_due(FrameIndex(i), rate(3)) {
            assert!(store.frame().data.iter().all(|&b| b == 0));
            fired.push(i);
        } else {
            assert!(store.frame().data.iter().all(|&b| b == 9));
        }
    }
    assert_eq!(fired, vec![0, 3, 6]);
}

#[test]
fn reset_without_rate_is_a_noop() {
    let first = Frame::new(1, 1, 3, vec![4, 5, 6]).unwrap();
    let mut store = BaseFrameStore::init(&first, false).unwrap();
    for i in 0..5 {
        assert!(!store.reset_if_due(FrameIndex(i), None));
    }
    assert_eq!(store.into_frame(), first);
}

#[test]
fn refresh_rate_one_resets_every_frame() {
    let first = Frame::new(1, 1, 1, vec![3]).unwrap();
    let mut store = BaseFrameStore::init(&first, false).unwrap();
    assert!((0..4).all(|i| store.reset_if_due(FrameIndex(i), rate(1))));
}
