use approx::assert_relative_eq;
use errbar_core::Uncertain;
use errbar_propagate::{propagate, propagate_and_correlate};
use uom::si::{
    acceleration::meter_per_second_squared,
    area::{square_centimeter, square_meter, square_millimeter},
    f64::{Acceleration, Area, Length, Time},
    length::{centimeter, meter, millimeter},
    time::{millisecond, second},
};

fn area(length: Length, width: Length) -> Area {
    length * width
}

#[test]
fn area_of_a_rectangle() {
    let length = Uncertain::new(
        Length::new::<centimeter>(2.0),
        Length::new::<centimeter>(0.1),
    )
    .unwrap();
    let width = Uncertain::new(
        Length::new::<centimeter>(4.0),
        Length::new::<centimeter>(0.2),
    )
    .unwrap();

    let a = propagate(area, (length, width));

    assert_relative_eq!(a.nominal().get::<square_centimeter>(), 8.0, epsilon = 1e-9);
    assert_relative_eq!(
        a.uncertainty().get::<square_centimeter>(),
        0.565_685_4,
        epsilon = 1e-7
    );
    assert_relative_eq!(a.nominal().get::<square_meter>(), 0.0008, epsilon = 1e-12);
    assert_relative_eq!(
        a.uncertainty().get::<square_millimeter>(),
        56.568_54,
        epsilon = 1e-5
    );
}

#[test]
fn uncertainty_in_other_units() {
    let length = Uncertain::new(
        Length::new::<centimeter>(2.0),
        Length::new::<millimeter>(1.0),
    )
    .unwrap();
    let width = Uncertain::new(
        Length::new::<centimeter>(4.0),
        Length::new::<millimeter>(2.0),
    )
    .unwrap();

    let a = propagate(area, (length, width));

    assert_relative_eq!(a.nominal().get::<square_centimeter>(), 8.0, epsilon = 1e-9);
    assert_relative_eq!(
        a.uncertainty().get::<square_millimeter>(),
        56.568_54,
        epsilon = 1e-5
    );
}

#[test]
fn exact_quantities_mix_with_uncertain_ones() {
    let length = Length::new::<meter>(2.0);
    let width = Uncertain::new(Length::new::<meter>(3.0), Length::new::<centimeter>(5.0)).unwrap();

    let a = propagate(area, (length, width));

    assert_relative_eq!(a.nominal().get::<square_meter>(), 6.0, epsilon = 1e-12);
    assert_relative_eq!(a.uncertainty().get::<square_meter>(), 0.1, epsilon = 1e-12);
}

#[test]
fn gravity_from_a_drop() {
    let height = Uncertain::new(Length::new::<meter>(1.5), Length::new::<centimeter>(1.0)).unwrap();
    let time = Uncertain::new(Time::new::<second>(0.562), Time::new::<millisecond>(19.0)).unwrap();

    let g = propagate(
        |h: Length, t: Time| -> Acceleration { 2.0 * h / t / t },
        (height, time),
    );

    let normalized = g.normalize(1);
    assert_relative_eq!(
        normalized.nominal().get::<meter_per_second_squared>(),
        9.5,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        normalized.uncertainty().get::<meter_per_second_squared>(),
        0.6,
        epsilon = 1e-9
    );

    // The drop time dominates the result.
    let correlated = propagate_and_correlate(
        |h: Length, t: Time| -> Acceleration { 2.0 * h / t / t },
        (height, time),
    )
    .unwrap();
    let height_share = correlated.coefficient(0).unwrap();
    let time_share = correlated.coefficient(1).unwrap();
    assert!(height_share > 0.0);
    assert!(time_share < -0.99);
    assert_relative_eq!(
        height_share * height_share + time_share * time_share,
        1.0,
        epsilon = 1e-12
    );
}
