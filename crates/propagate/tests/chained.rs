use approx::assert_relative_eq;
use errbar_core::{Tracked, Uncertain};
use errbar_propagate::{
    CorrelationError, CorrelationStore, global_store, propagate, propagate_tracked,
    propagate_with_store,
};

fn tracked(nominal: f64, uncertainty: f64) -> Tracked<f64> {
    Tracked::new(Uncertain::new(nominal, uncertainty).unwrap())
}

#[test]
fn derived_values_remember_their_origin() {
    let mut store = CorrelationStore::new();
    let x = tracked(2.0, 0.1);

    let doubled = propagate_with_store(|x: f64| 2.0 * x, &mut store, (&x,));
    let tripled = propagate_with_store(|x: f64| 3.0 * x, &mut store, (&x,));

    // Both results are fully correlated with x, and through it with each
    // other, but only the direct links are stored.
    assert_relative_eq!(store.get(&doubled, &x), 1.0, epsilon = 1e-9);
    assert_relative_eq!(store.get(&tripled, &x), 1.0, epsilon = 1e-9);
    assert!(matches!(
        store.require(&doubled, &tripled),
        Err(CorrelationError::MissingEntry { .. })
    ));

    // With the link recorded, 3 * doubled - 2 * tripled is exactly zero.
    let link = store.require(&doubled, &x).unwrap() * store.require(&tripled, &x).unwrap();
    store.add(&doubled, &tripled, link).unwrap();
    let difference = propagate_with_store(
        |a: f64, b: f64| 3.0 * a - 2.0 * b,
        &mut store,
        (&doubled, &tripled),
    );
    assert_relative_eq!(difference.nominal(), 0.0, epsilon = 1e-12);
    assert_eq!(difference.uncertainty(), 0.0);

    // Without tracking, the same difference looks uncertain.
    let naive = propagate(
        |a: f64, b: f64| 3.0 * a - 2.0 * b,
        (*doubled.as_uncertain(), *tripled.as_uncertain()),
    );
    assert!(naive.uncertainty() > 0.8);
}

#[test]
fn cloned_variables_stay_correlated() {
    let mut store = CorrelationStore::new();
    let x = tracked(5.0, 0.5);
    let copy = x.clone();

    let zero = propagate_with_store(|a: f64, b: f64| a - b, &mut store, (&x, &copy));
    assert_eq!(zero.uncertainty(), 0.0);

    let mut independent = x.clone();
    independent.new_id();
    let spread = propagate_with_store(|a: f64, b: f64| a - b, &mut store, (&x, &independent));
    assert_relative_eq!(spread.uncertainty(), 0.5_f64.hypot(0.5), epsilon = 1e-9);
}

#[test]
fn global_store_chains_across_calls() {
    let x = tracked(1.0, 0.1);
    let y = tracked(2.0, 0.2);

    let sum = propagate_tracked(|x: f64, y: f64| x + y, (&x, &y));
    let total = 0.05_f64.sqrt();
    assert_relative_eq!(sum.uncertainty(), total, epsilon = 1e-9);

    // sum - y is x again.
    let back = propagate_tracked(|s: f64, y: f64| s - y, (&sum, &y));
    assert_relative_eq!(back.nominal(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(back.uncertainty(), 0.1, epsilon = 1e-9);
    assert_relative_eq!(global_store().get(&back, &x), 0.0);
    assert_relative_eq!(global_store().get(&back, &sum), 0.1 / total, epsilon = 1e-6);

    let removed = global_store().forget(sum.id().unwrap());
    assert_eq!(removed, 3);
    assert_relative_eq!(global_store().get(&sum, &x), 0.0);
}
