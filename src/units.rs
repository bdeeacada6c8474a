// units.rs

/// Round to one decimal, halves away from zero.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Works in tenths of a degree so that readings with up to three decimals land
/// exactly on their halves before rounding.
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    (c * 18.0 + 320.0).round() / 10.0
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    round1((f - 32.0) * 5.0 / 9.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_points() {
        assert_eq!(celsius_to_fahrenheit(-10.0), 14.0);
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(21.5), 70.7);
        assert_eq!(celsius_to_fahrenheit(10.3), 50.5);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn halves_round_away_from_zero() {
        assert_eq!(round1(0.25), 0.3);
        assert_eq!(round1(-0.25), -0.3);
        assert_eq!(round1(1.25), 1.3);
        assert_eq!(round1(-0.75), -0.8);
    }

    #[test]
    fn negative_halves_in_fahrenheit() {
        assert_eq!(celsius_to_fahrenheit(-27.25), -17.1);
        assert_eq!(celsius_to_fahrenheit(-45.75), -50.4);
        assert_eq!(celsius_to_fahrenheit(-17.75), 0.1);
        assert_eq!(celsius_to_fahrenheit(24.75), 76.6);
    }

    #[test]
    fn round_trip_within_a_tenth() {
        for f in [-40.0, -13.0, 14.0, 32.0, 50.5, 70.7, 98.6, 120.2] {
            let back = celsius_to_fahrenheit(fahrenheit_to_celsius(f));
            assert!((back - f).abs() <= 0.1 + 1e-9, "{f} -> {back}");
        }
    }
}

// EOF
