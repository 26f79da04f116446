use approx::assert_relative_eq;
use errbar_core::{Tracked, Uncertain};
use errbar_propagate::{CorrelationMatrix, CorrelationStore, propagate, propagate_with_matrix, propagate_with_store};

fn my_calculation(x: f64, y: f64) -> f64 {
    2.0 * x * y + 3.0 * x + 2.0 * y + 10.0
}

#[test]
fn propagation_without_correlation() {
    let x = Uncertain::new(1.0, 0.1).unwrap();
    let y = Uncertain::new(3.0, 0.2).unwrap();

    let z = propagate(my_calculation, (x, y));
    assert_relative_eq!(z.nominal(), 25.0, epsilon = 1e-12);
    assert_relative_eq!(z.uncertainty(), 1.204_159_458, epsilon = 1e-9);

    let z = propagate(|x: f64, y: f64| x + y, (x, y));
    assert_relative_eq!(z.nominal(), 4.0, epsilon = 1e-12);
    assert_relative_eq!(z.uncertainty(), 0.223_606_797_7, epsilon = 1e-9);
}

#[test]
fn propagation_with_a_correlation_matrix() {
    let x = Uncertain::new(4.0, 0.1).unwrap();
    let y = Uncertain::new(3.0, 0.2).unwrap();
    let sum = |a: f64, b: f64| a + b;

    let z = propagate(sum, (x, y));
    assert_relative_eq!(z.nominal(), 7.0, epsilon = 1e-12);
    assert_relative_eq!(z.uncertainty(), 0.223_606_797_7, epsilon = 1e-9);

    let mut corr = CorrelationMatrix::new(2);
    corr.set(0, 1, -1.0).unwrap();

    let z = propagate_with_matrix(sum, &corr, (x, y)).unwrap();
    assert_relative_eq!(z.nominal(), 7.0, epsilon = 1e-12);
    assert_relative_eq!(z.uncertainty(), 0.1, epsilon = 1e-9);
}

#[test]
fn propagation_with_a_correlation_store() {
    let mut store = CorrelationStore::new();

    let x = Tracked::new(Uncertain::new(4.0, 0.1).unwrap());
    let y = Tracked::new(Uncertain::new(3.0, 0.2).unwrap());
    store.set(&x, &y, -1.0).unwrap();

    let z = propagate_with_store(|a: f64, b: f64| a + b, &mut store, (&x, &y));

    assert_relative_eq!(z.nominal(), 7.0, epsilon = 1e-12);
    assert_relative_eq!(z.uncertainty(), 0.1, epsilon = 1e-9);
    assert_relative_eq!(store.get(&z, &x), -1.0, epsilon = 1e-9);
    assert_relative_eq!(store.get(&z, &y), 1.0, epsilon = 1e-9);
}
