use fathom_core::color::{stretch_to_u8, ColorLut, ColorMapper, ColorScheme};
use ndarray::Array2;

fn ramp<T>(f: impl Fn(usize) -> T) -> Array2<T> {
    Array2::from_shape_fn((4, 64), |(r, c)| f(r * 64 + c))
}

#[test]
fn test_every_scheme_maps_any_numeric_type() {
    let mut mapper = ColorMapper::new();
    for scheme in ColorScheme::ALL {
        assert_eq!(mapper.apply(&ramp(|i| i as u8), scheme).dim(), (4, 64, 3));
        assert_eq!(mapper.apply(&ramp(|i| (i * 100) as u16), scheme).dim(), (4, 64, 3));
        assert_eq!(mapper.apply(&ramp(|i| i as f32 * 0.5), scheme).dim(), (4, 64, 3));
        assert_eq!(mapper.apply(&ramp(|i| i as i32 - 128), scheme).dim(), (4, 64, 3));
    }
}

#[test]
fn test_stretch_spans_full_range() {
    let data = ramp(|i| i as f32 - 10.0);
    let out = stretch_to_u8(&data);
    assert_eq!(out[[0, 0]], 0);
    assert_eq!(out[[3, 63]], 255);
}

#[test]
fn test_constant_input_maps_to_first_entry() {
    let mut mapper = ColorMapper::new();
    let data = Array2::from_elem((3, 5), 42.0f64);
    let rgb = mapper.apply(&data, ColorScheme::Magma);
    let first = ColorLut::build(ColorScheme::Magma).get(0);
    for ((_, _, ch), &v) in rgb.indexed_iter() {
        assert_eq!(v, first[ch]);
    }
}

#[test]
fn test_non_finite_values_map_to_zero() {
    let data = Array2::from_shape_vec((1, 3), vec![f64::NAN, 0.0, 10.0]).unwrap();
    let out = stretch_to_u8(&data);
    assert_eq!(out.row(0).to_vec(), vec![0, 0, 255]);
}

#[test]
fn test_scheme_names_round_trip() {
    for scheme in ColorScheme::ALL {
        assert_eq!(ColorScheme::from_name(scheme.name()), Some(scheme));
        assert_eq!(scheme.to_string(), scheme.name());
    }
    assert_eq!(ColorScheme::from_name("VIRIDIS"), Some(ColorScheme::Viridis));
    assert_eq!(ColorScheme::from_name("rainbow"), None);
}

#[test]
fn test_unknown_scheme_falls_back_to_grayscale() {
    assert_eq!(ColorScheme::resolve("rainbow"), ColorScheme::Grayscale);
    assert_eq!(ColorScheme::resolve("fire"), ColorScheme::Fire);
    assert_eq!(ColorScheme::default(), ColorScheme::Amber);
}

#[test]
fn test_lut_endpoints_follow_stops() {
    for scheme in ColorScheme::ALL {
        let lut = ColorLut::build(scheme);
        let stops = scheme.stops();
        let (_, first) = stops[0];
        let (_, last) = stops[stops.len() - 1];
        let unpack = |hex: u32| [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8];
        assert_eq!(lut.get(0), unpack(first), "{scheme}");
        assert_eq!(lut.get(255), unpack(last), "{scheme}");
    }
}

#[test]
fn test_map_gray_is_a_direct_lookup() {
    let lut = ColorLut::build(ColorScheme::Fire);
    let gray = Array2::from_shape_vec((1, 3), vec![0u8, 128, 255]).unwrap();
    let rgb = lut.map_gray(&gray);
    for (c, &v) in [0u8, 128, 255].iter().enumerate() {
        let expected = lut.get(v);
        assert_eq!([rgb[[0, c, 0]], rgb[[0, c, 1]], rgb[[0, c, 2]]], expected);
    }
}
