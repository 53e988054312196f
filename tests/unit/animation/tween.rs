use super::*;
use crate::style::color::Rgba8;

#[test]
fn scalar_lerp_is_linear() {
    let a = Value::Scalar(10.0);
    let b = Value::Scalar(20.0);
    assert_eq!(a.lerp(b, 0.0), Value::Scalar(10.0));
    assert_eq!(a.lerp(b, 0.5), Value::Scalar(15.0));
    assert_eq!(a.lerp(b, 1.0), Value::Scalar(20.0));
}

#[test]
fn color_lerp_mixes_componentwise() {
    let a = Value::Color(Rgba8::BLACK);
    let b = Value::Color(Rgba8::WHITE);
    let Value::Color(mid) = a.lerp(b, 0.5) else {
        panic!("expected color");
    };
    assert_eq!(mid.r, 128);
}

#[test]
fn visibility_shows_at_start_and_hides_at_end() {
    let hidden = Value::Visible(false);
    let shown = Value::Visible(true);

    // Becoming visible applies as soon as the tween starts.
    assert_eq!(hidden.lerp(shown, 0.0), Value::Visible(false));
    assert_eq!(hidden.lerp(shown, 0.01), Value::Visible(true));

    // Becoming hidden only applies once the tween ends.
    assert_eq!(shown.lerp(hidden, 0.99), Value::Visible(true));
    assert_eq!(shown.lerp(hidden, 1.0), Value::Visible(false));
}

#[test]
fn initial_values_match_static_page_state() {
    assert_eq!(Prop::Opacity.initial_value(), Some(Value::Scalar(1.0)));
    assert_eq!(Prop::Scale.initial_value(), Some(Value::Scalar(1.0)));
    assert_eq!(Prop::RotationDeg.initial_value(), Some(Value::Scalar(0.0)));
    assert_eq!(Prop::Visibility.initial_value(), Some(Value::Visible(true)));
    assert_eq!(Prop::Custom("--x".to_string()).initial_value(), None);
}

#[test]
fn validate_rejects_bad_specs() {
    let ok = TweenSpec::to(vec![(Prop::Opacity, Value::Scalar(0.0))], 0.5, Ease::Linear);
    assert!(ok.validate().is_ok());

    let empty = TweenSpec::to(vec![], 0.5, Ease::Linear);
    assert!(empty.validate().is_err());

    let mut negative = ok.clone();
    negative.duration_s = -1.0;
    assert!(negative.validate().is_err());

    let mut nan = ok.clone();
    nan.duration_s = f64::NAN;
    assert!(nan.validate().is_err());

    let mut repeat = ok;
    repeat.repeat = -2;
    assert!(repeat.validate().is_err());
}

#[test]
fn looped_sets_infinite_repeat() {
    let spec = TweenSpec::to(vec![(Prop::Scale, Value::Scalar(1.05))], 1.5, Ease::InOutSine)
        .looped(true);
    assert_eq!(spec.repeat, -1);
    assert!(spec.yoyo);
    assert!(spec.validate().is_ok());
}
