use super::*;
use crate::foundation::core::Rgba8;

fn num(n: f64) -> ChannelValue {
    ChannelValue::Number(n)
}

fn txt(s: &str) -> ChannelValue {
    ChannelValue::Text(s.into())
}

fn spec(kind: ScaleKind, domain: Option<Vec<ChannelValue>>, range: Option<Vec<ChannelValue>>) -> ScaleSpec {
    ScaleSpec { kind, domain, range }
}

#[test]
fn unknown_kind_falls_back_to_identity() {
    let k: ScaleKind = serde_json::from_str("\"banana\"").unwrap();
    assert_eq!(k, ScaleKind::Identity);
    let k: ScaleKind = serde_json::from_str("\"quantize\"").unwrap();
    assert_eq!(k, ScaleKind::Quantize);
}

#[test]
fn identity_echoes_its_inputs() {
    let s = Scale::build(
        &spec(ScaleKind::Identity, None, None),
        &[txt("a"), txt("b"), txt("a")],
        VisualValue::Number(0.0),
    )
    .unwrap();

    assert_eq!(s.map(&txt("a")), VisualValue::Text("a".into()));
    assert_eq!(s.map(&txt("b")), VisualValue::Text("b".into()));
    // Values never observed still pass through.
    assert_eq!(s.map(&txt("c")), VisualValue::Text("c".into()));
}

#[test]
fn missing_range_means_constant_default() {
    let s = Scale::build(
        &spec(ScaleKind::Linear, None, None),
        &[num(1.0), num(5.0), num(3.0), num(5.0), num(1.0)],
        VisualValue::Number(6.0),
    )
    .unwrap();

    for x in [0.0, 1.0, 3.0, 5.0, 99.0] {
        assert_eq!(s.map(&num(x)), VisualValue::Number(6.0));
    }
}

#[test]
fn empty_domain_is_an_error() {
    let err = Scale::build(
        &spec(ScaleKind::Linear, None, None),
        &[],
        VisualValue::Number(0.0),
    )
    .unwrap_err();
    assert!(matches!(err, crate::foundation::error::ProcanimError::Scale(_)));
}

#[test]
fn linear_interpolates_and_clamps() {
    let s = Scale::build(
        &spec(
            ScaleKind::Linear,
            Some(vec![num(0.0), num(10.0)]),
            Some(vec![num(0.0), num(100.0)]),
        ),
        &[],
        VisualValue::Number(0.0),
    )
    .unwrap();

    assert_eq!(s.map(&num(2.5)), VisualValue::Number(25.0));
    assert_eq!(s.map(&num(-1.0)), VisualValue::Number(0.0));
    assert_eq!(s.map(&num(11.0)), VisualValue::Number(100.0));
}

#[test]
fn linear_interpolates_colors_channelwise() {
    let s = Scale::build(
        &spec(
            ScaleKind::Linear,
            Some(vec![num(0.0), num(1.0)]),
            Some(vec![txt("#000000"), txt("#ffffff")]),
        ),
        &[],
        VisualValue::Number(0.0),
    )
    .unwrap();

    assert_eq!(s.map(&num(0.0)), VisualValue::Color(Rgba8::rgb(0, 0, 0)));
    assert_eq!(s.map(&num(1.0)), VisualValue::Color(Rgba8::rgb(255, 255, 255)));
    assert_eq!(
        s.map(&num(0.5)),
        VisualValue::Color(Rgba8::rgb(128, 128, 128))
    );
}

#[test]
fn piecewise_uses_min_of_domain_and_range() {
    // Three domain stops, two range stops: only the first segment counts.
    let s = Scale::build(
        &spec(
            ScaleKind::Linear,
            Some(vec![num(0.0), num(10.0), num(20.0)]),
            Some(vec![num(0.0), num(1.0)]),
        ),
        &[],
        VisualValue::Number(0.0),
    )
    .unwrap();

    assert_eq!(s.map(&num(5.0)), VisualValue::Number(0.5));
    assert_eq!(s.map(&num(20.0)), VisualValue::Number(1.0));
}

#[test]
fn sqrt_transforms_the_domain_axis() {
    let s = Scale::build(
        &spec(
            ScaleKind::Sqrt,
            Some(vec![num(0.0), num(100.0)]),
            Some(vec![num(0.0), num(10.0)]),
        ),
        &[],
        VisualValue::Number(0.0),
    )
    .unwrap();

    // sqrt(25)/sqrt(100) = 0.5 of the way along.
    assert_eq!(s.map(&num(25.0)), VisualValue::Number(5.0));
}

#[test]
fn log_clamps_nonpositive_input() {
    let s = Scale::build(
        &spec(
            ScaleKind::Log,
            Some(vec![num(1.0), num(100.0)]),
            Some(vec![num(0.0), num(1.0)]),
        ),
        &[],
        VisualValue::Number(0.0),
    )
    .unwrap();

    // Clamped to the smallest positive value, far below the domain start.
    assert_eq!(s.map(&num(0.0)), VisualValue::Number(0.0));
    assert_eq!(s.map(&num(-5.0)), VisualValue::Number(0.0));
    let mid = s.map(&num(10.0)).as_f64();
    assert!((mid - 0.5).abs() < 1e-12);
}

#[test]
fn quantize_buckets_evenly() {
    let s = Scale::build(
        &spec(
            ScaleKind::Quantize,
            Some(vec![num(0.0), num(30.0)]),
            Some(vec![txt("low"), txt("mid"), txt("high")]),
        ),
        &[],
        VisualValue::Number(0.0),
    )
    .unwrap();

    assert_eq!(s.map(&num(5.0)), VisualValue::Text("low".into()));
    assert_eq!(s.map(&num(15.0)), VisualValue::Text("mid".into()));
    assert_eq!(s.map(&num(29.0)), VisualValue::Text("high".into()));
    assert_eq!(s.map(&num(30.0)), VisualValue::Text("high".into()));
    assert_eq!(s.map(&num(-1.0)), VisualValue::Text("low".into()));
}

#[test]
fn ordinal_cycles_a_short_range() {
    let s = Scale::build(
        &spec(
            ScaleKind::Ordinal,
            Some(vec![txt("a"), txt("b"), txt("c")]),
            Some(vec![txt("#ff0000"), txt("#0000ff")]),
        ),
        &[],
        VisualValue::Number(0.0),
    )
    .unwrap();

    let red = VisualValue::Color(Rgba8::rgb(255, 0, 0));
    let blue = VisualValue::Color(Rgba8::rgb(0, 0, 255));
    assert_eq!(s.map(&txt("a")), red);
    assert_eq!(s.map(&txt("b")), blue);
    assert_eq!(s.map(&txt("c")), red);
}

#[test]
fn ordinal_unknown_value_maps_to_first_range_slot() {
    let s = Scale::build(
        &spec(
            ScaleKind::Ordinal,
            Some(vec![txt("a")]),
            Some(vec![txt("#00ff00")]),
        ),
        &[],
        VisualValue::Number(0.0),
    )
    .unwrap();

    assert_eq!(
        s.map(&txt("never-seen")),
        VisualValue::Color(Rgba8::rgb(0, 255, 0))
    );
}

#[test]
fn ordinal_infers_domain_from_observations() {
    let s = Scale::build(
        &spec(ScaleKind::Ordinal, None, Some(vec![num(1.0), num(2.0)])),
        &[txt("y"), txt("x"), txt("y")],
        VisualValue::Number(0.0),
    )
    .unwrap();

    // Observed values sort before assignment: x first, then y.
    assert_eq!(s.map(&txt("x")), VisualValue::Number(1.0));
    assert_eq!(s.map(&txt("y")), VisualValue::Number(2.0));
}

#[test]
fn time_scale_is_linear_over_epoch_millis() {
    let t0 = 1_500_000_000_000.0;
    let t1 = 1_500_000_100_000.0;
    let s = Scale::build(
        &spec(ScaleKind::Time, None, Some(vec![num(0.0), num(60.0)])),
        &[num(t1), num(t0)],
        VisualValue::Number(0.0),
    )
    .unwrap();

    assert_eq!(s.map(&num(t0)), VisualValue::Number(0.0));
    assert_eq!(s.map(&num((t0 + t1) / 2.0)), VisualValue::Number(30.0));
    assert_eq!(s.map(&num(t1)), VisualValue::Number(60.0));
}

#[test]
fn constant_scale_always_yields_the_default() {
    let s = Scale::constant(VisualValue::Number(6.0));
    assert_eq!(s.map(&txt("anything")), VisualValue::Number(6.0));
    assert_eq!(s.map(&num(123.0)), VisualValue::Number(6.0));
}
