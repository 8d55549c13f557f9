use crate::core::Width;
use crate::st::Store;

macro_rules! succ {
    ($e:expr) => {
        assert!($e.is_ok());
    }
}

macro_rules! assert_approx_eq {
    ($e:expr, $v:expr, $t:expr) => {
        assert!(($e as f64 - $v as f64).abs() <= $t as f64, "{} !~= {} within {}", $e, $v, $t)
    }
}

pub const INTEGER_WIDTHS: [Width; 4] = [Width::W1, Width::W2, Width::W4, Width::W8];

pub fn store_from_counts(counts: &[u64]) -> Store {
    let mut store = Store::new(counts.len()).unwrap();
    for (index, count) in counts.iter().enumerate() {
        succ!(store.add_count(index, *count));
    }
    store
}

pub fn values(store: &Store) -> Vec<f64> {
    store.iter().map(|(value, _)| value).collect()
}

pub fn variances(store: &Store) -> Vec<f64> {
    store.iter().map(|(_, variance)| variance).collect()
}
