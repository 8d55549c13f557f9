use crate::core::{StoreError, WeightedCell, Width};
use crate::st::Store;
use crate::tests::util::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn new_store_is_zeroed_at_narrowest_width() {
    let store = Store::new(5).unwrap();
    assert_eq!(5, store.len());
    assert!(!store.is_empty());
    assert_eq!(Width::W1, store.width());
    assert_eq!(1, store.element_size());
    assert_eq!(5, store.raw_buffer().len());
    assert_eq!(vec![0.0; 5], values(&store));
    assert_eq!(vec![0.0; 5], variances(&store));
}

#[test]
fn with_width_allocates_requested_shape() {
    for width in INTEGER_WIDTHS.iter().chain(Some(&Width::Weighted)) {
        let store = Store::with_width(7, *width).unwrap();
        assert_eq!(*width, store.width());
        assert_eq!(7 * width.element_size(), store.raw_buffer().len());
        assert!(store.raw_buffer().iter().all(|b| *b == 0));
        assert_approx_eq!(store.total(), 0.0, 0.0);
    }
}

#[test]
fn increase_counts_up() {
    let mut store = Store::new(3).unwrap();
    succ!(store.increase(1));
    succ!(store.increase(1));
    succ!(store.increase(2));
    assert_eq!(vec![0.0, 2.0, 1.0], values(&store));
    assert_eq!(vec![0.0, 2.0, 1.0], variances(&store));
    assert_eq!(Width::W1, store.width());
}

#[test]
fn overflow_promotes_one_width() {
    for width in INTEGER_WIDTHS.iter() {
        let max = width.max_count().unwrap();
        let mut store = Store::with_width(2, *width).unwrap();
        succ!(store.add_count(1, max));
        assert_eq!(*width, store.width());
        assert_eq!(max as f64, store.value(1));

        succ!(store.increase(1));
        assert_eq!(width.next().unwrap(), store.width(), "overflow at {:?}", width);
        assert_eq!(max as f64 + 1.0, store.value(1));
        assert_eq!(0.0, store.value(0));
    }
}

#[test]
fn promotion_keeps_every_value() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for (position, width) in INTEGER_WIDTHS.iter().enumerate() {
        let max = width.max_count().unwrap();
        let mut counts: Vec<u64> = (0..64).map(|_| rng.gen_range(0..=max)).collect();
        counts[0] = 0;
        counts[1] = max;

        let mut store = Store::with_width(counts.len(), *width).unwrap();
        for (index, count) in counts.iter().enumerate() {
            succ!(store.add_count(index, *count));
        }
        assert_eq!(*width, store.width());

        for target in INTEGER_WIDTHS.iter().skip(position + 1) {
            let mut widened = store.clone();
            succ!(widened.promote_to(*target));
            assert_eq!(*target, widened.width());
            for (index, count) in counts.iter().enumerate() {
                assert_eq!(*count as f64, widened.value(index), "index {} at {:?}", index, target);
            }
        }

        succ!(store.promote_to(Width::Weighted));
        for (index, count) in counts.iter().enumerate() {
            assert_eq!(*count as f64, store.value(index));
            assert_eq!(*count as f64, store.variance(index));
        }
    }
}

#[test]
fn promote_to_narrower_width_is_a_no_op() {
    let mut store = store_from_counts(&[70000, 3]);
    assert_eq!(Width::W4, store.width());
    succ!(store.promote_to(Width::W2));
    assert_eq!(Width::W4, store.width());
    assert_eq!(vec![70000.0, 3.0], values(&store));
}

#[test]
fn weighted_fill_converts_in_one_step() {
    let mut store = store_from_counts(&[3, 0, 1]);
    assert_eq!(Width::W1, store.width());

    succ!(store.increase_by_weight(1, 0.5));
    assert_eq!(Width::Weighted, store.width());
    assert!(store.is_weighted());
    assert_eq!(vec![3.0, 0.5, 1.0], values(&store));
    assert_eq!(vec![3.0, 0.25, 1.0], variances(&store));
}

#[test]
fn weighted_store_stays_weighted() {
    let mut store = Store::new(2).unwrap();
    succ!(store.increase_by_weight(0, 1.0));
    assert_eq!(Width::Weighted, store.width());

    succ!(store.increase(0));
    succ!(store.increase(1));
    succ!(store.add_count(1, u64::from(u32::MAX)));
    assert_eq!(Width::Weighted, store.width());
    assert_eq!(2.0, store.value(0));
    assert_eq!(2.0, store.variance(0));
    assert_eq!(u64::from(u32::MAX) as f64 + 1.0, store.value(1));

    store.clear();
    assert_eq!(Width::Weighted, store.width());
    assert_eq!(vec![0.0, 0.0], values(&store));
}

#[test]
fn weighted_accumulation() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut store = Store::new(4).unwrap();
    let mut sum = 0.0;
    let mut sum_of_squares = 0.0;
    for _ in 0..1000 {
        let weight: f64 = rng.gen_range(0.0..10.0);
        succ!(store.increase_by_weight(2, weight));
        sum += weight;
        sum_of_squares += weight * weight;
    }
    assert_approx_eq!(store.value(2), sum, 1e-9 * sum);
    assert_approx_eq!(store.variance(2), sum_of_squares, 1e-9 * sum_of_squares);
    assert_eq!(0.0, store.value(0));
    assert_eq!(0.0, store.variance(3));
}

#[test]
fn unit_fills_then_weighted_fill() {
    let mut store = Store::new(1).unwrap();
    for _ in 0..255 {
        succ!(store.increase(0));
    }
    assert_eq!(255.0, store.value(0));
    assert_eq!(Width::W1, store.width());

    succ!(store.increase(0));
    assert_eq!(256.0, store.value(0));
    assert_eq!(Width::W2, store.width());

    succ!(store.increase_by_weight(0, 2.5));
    assert_eq!(Width::Weighted, store.width());
    assert_eq!(258.5, store.value(0));
    assert_eq!(262.25, store.variance(0));
}

#[test]
fn weighted_conversion_rounds_beyond_f64_precision() {
    let exact = 1u64 << 53;
    let mut store = Store::with_width(2, Width::W8).unwrap();
    succ!(store.add_count(0, exact));
    succ!(store.add_count(1, exact + 1));
    assert_eq!(exact as f64, store.value(0));

    succ!(store.increase_by_weight(0, 0.0));
    assert_eq!(Width::Weighted, store.width());
    assert_eq!(exact as f64, store.value(0));
    assert_eq!(9007199254740992.0, store.value(1));
    assert_eq!(store.value(1), store.variance(1));
}

#[test]
fn widest_integer_overflows_into_weighted() {
    let mut store = Store::with_width(1, Width::W8).unwrap();
    succ!(store.add_count(0, u64::MAX));
    assert_eq!(Width::W8, store.width());
    succ!(store.increase(0));
    assert_eq!(Width::Weighted, store.width());
    assert_eq!(u64::MAX as f64 + 1.0, store.value(0));
}

#[test]
fn add_count_jumps_to_fitting_width() {
    let mut store = Store::new(2).unwrap();
    succ!(store.add_count(0, 200));
    succ!(store.add_count(0, 100));
    assert_eq!(Width::W2, store.width());
    assert_eq!(300.0, store.value(0));

    succ!(store.add_count(1, 1 << 40));
    assert_eq!(Width::W8, store.width());
    assert_eq!((1u64 << 40) as f64, store.value(1));
    assert_eq!(300.0, store.value(0));

    succ!(store.add_count(1, u64::MAX));
    assert_eq!(Width::Weighted, store.width());
    assert_approx_eq!(store.value(1), u64::MAX as f64 + (1u64 << 40) as f64, 1e4);
}

#[test]
fn clone_is_independent() {
    let original = store_from_counts(&[1, 2, 3]);
    let mut copy = original.clone();
    assert_eq!(original, copy);

    succ!(copy.increase(0));
    succ!(copy.increase_by_weight(2, 2.0));
    assert_eq!(vec![1.0, 2.0, 3.0], values(&original));
    assert_eq!(Width::W1, original.width());
    assert_eq!(vec![2.0, 2.0, 5.0], values(&copy));
    assert!(original != copy);
}

#[test]
fn clone_from_reuses_or_reshapes() {
    let source = store_from_counts(&[4, 5]);

    let mut same_shape = store_from_counts(&[9, 9]);
    same_shape.clone_from(&source);
    assert_eq!(source, same_shape);
    assert_eq!(Width::W1, same_shape.width());

    let mut other_shape = store_from_counts(&[1000, 1, 2]);
    other_shape.clone_from(&source);
    assert_eq!(2, other_shape.len());
    assert_eq!(Width::W1, other_shape.width());
    assert_eq!(source.raw_buffer(), other_shape.raw_buffer());
}

#[test]
fn take_leaves_empty_store() {
    let mut source = store_from_counts(&[1, 300]);
    let moved = source.take();

    assert_eq!(2, moved.len());
    assert_eq!(Width::W2, moved.width());
    assert_eq!(vec![1.0, 300.0], values(&moved));

    assert_eq!(0, source.len());
    assert!(source.is_empty());
    assert_eq!(Width::W1, source.width());
    assert!(source.raw_buffer().is_empty());
    assert_eq!(Store::default(), source);
}

#[test]
fn equality_ignores_width() {
    let narrow = store_from_counts(&[1, 2, 3]);
    let mut wide = Store::with_width(3, Width::W8).unwrap();
    succ!(wide.add_count(0, 1));
    succ!(wide.add_count(1, 2));
    succ!(wide.add_count(2, 3));
    assert_eq!(narrow, wide);

    let mut weighted = narrow.clone();
    succ!(weighted.promote_to(Width::Weighted));
    assert_eq!(narrow, weighted);

    // same values, different variance
    let mut reweighted = Store::new(3).unwrap();
    succ!(reweighted.increase_by_weight(0, 1.0));
    succ!(reweighted.increase_by_weight(1, 2.0));
    succ!(reweighted.increase_by_weight(2, 3.0));
    assert_eq!(values(&narrow), values(&reweighted));
    assert!(narrow != reweighted);

    assert!(narrow != store_from_counts(&[1, 2]));
}

#[test]
fn raw_buffer_layout() {
    let mut store = Store::new(2).unwrap();
    succ!(store.add_count(1, 0x0102));
    assert_eq!(Width::W2, store.width());
    let mut expected = 0u16.to_ne_bytes().to_vec();
    expected.extend_from_slice(&0x0102u16.to_ne_bytes());
    assert_eq!(&expected[..], store.raw_buffer());

    succ!(store.increase_by_weight(0, 2.0));
    let mut expected = Vec::new();
    for cell in [WeightedCell::new(2.0, 4.0), WeightedCell::from_count(0x0102)].iter() {
        expected.extend_from_slice(&cell.sum_of_weights.to_ne_bytes());
        expected.extend_from_slice(&cell.sum_of_weights_squared.to_ne_bytes());
    }
    assert_eq!(32, store.raw_buffer().len());
    assert_eq!(&expected[..], store.raw_buffer());
}

#[test]
fn from_raw_parts_restores_store() {
    let mut original = store_from_counts(&[5, 70000, 0]);
    succ!(original.increase_by_weight(2, 0.25));

    let restored = Store::from_raw_parts(original.len(), original.width(), original.raw_buffer()).unwrap();
    assert_eq!(original, restored);
    assert_eq!(original.raw_buffer(), restored.raw_buffer());

    assert_eq!(
        Err(StoreError::SizeMismatch { expected: 6, actual: 5 }),
        Store::from_raw_parts(3, Width::W2, &[0; 5])
    );
}

#[test]
fn clear_keeps_width() {
    let mut store = store_from_counts(&[1, 1000]);
    store.clear();
    assert_eq!(Width::W2, store.width());
    assert_eq!(vec![0.0, 0.0], values(&store));
    succ!(store.increase(0));
    assert_eq!(1.0, store.value(0));
}

#[test]
fn total_sums_values() {
    let mut store = store_from_counts(&[1, 2, 300]);
    assert_eq!(303.0, store.total());
    succ!(store.increase_by_weight(0, 0.5));
    assert_eq!(303.5, store.total());
}

#[test]
fn unaddressable_sizes_fail_to_allocate() {
    assert_eq!(
        Err(StoreError::AllocationFailure { requested_bytes: None }),
        Store::with_width(usize::MAX, Width::W8)
    );
    assert_eq!(
        Err(StoreError::AllocationFailure { requested_bytes: Some(usize::MAX) }),
        Store::new(usize::MAX)
    );
}

#[test]
fn empty_store() {
    let mut store = Store::new(0).unwrap();
    assert!(store.is_empty());
    assert!(store.raw_buffer().is_empty());
    succ!(store.promote_to(Width::Weighted));
    assert_eq!(Width::Weighted, store.width());
    assert_eq!(0.0, store.total());
}

#[test]
#[should_panic]
fn increase_out_of_range_panics() {
    let mut store = Store::new(2).unwrap();
    let _ = store.increase(2);
}

#[test]
#[should_panic]
fn weighted_fill_out_of_range_panics() {
    let mut store = Store::new(2).unwrap();
    let _ = store.increase_by_weight(5, 1.0);
}
