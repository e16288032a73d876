//! Per-spot wind viability.
//!
//! A reading is kiteable at a spot when its octant is one of the spot's best
//! directions and its knots fall inside the spot's window. Each reading is judged
//! on its own; there is no hysteresis.

use crate::{Spot, WindReading};

/// Glyph for a kiteable reading
pub const ON_GLYPH: &str = "✅";
/// Glyph for a reading outside the spot's window
pub const OFF_GLYPH: &str = "❌";

/// Outcome of judging one reading at one spot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assessment {
    pub kiteable: bool,
    /// Rendered status line, e.g. `✅ ON  NE 15 kn @ 09:00`
    pub line: String,
}

/// True when both the direction and the speed suit the spot.
pub fn is_kiteable(spot: &Spot, reading: &WindReading) -> bool {
    spot.accepts_direction(reading.octant) && spot.accepts_speed(reading.knots)
}

/// Judge a reading at a spot and render its report line.
pub fn assess(spot: &Spot, hour: u32, reading: &WindReading) -> Assessment {
    let kiteable = is_kiteable(spot, reading);
    let (glyph, status) = if kiteable {
        (ON_GLYPH, "ON ")
    } else {
        (OFF_GLYPH, "OFF")
    };

    Assessment {
        kiteable,
        line: format!(
            "{glyph} {status} {:<2} {:>2} kn @ {hour:02}:00",
            reading.octant.label(),
            reading.knots
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Octant;

    fn spot() -> Spot {
        Spot {
            name: "Los Lances".into(),
            region: "Tarifa".into(),
            latitude: 36.03,
            longitude: -5.63,
            min_knots: 12,
            max_knots: 20,
            best_directions: [Octant::NE, Octant::N].into_iter().collect(),
            tide_notes: "Any tide".into(),
        }
    }

    fn reading(knots: i32, octant: Octant) -> WindReading {
        WindReading { knots, octant }
    }

    #[test]
    fn test_on_when_direction_and_speed_match() {
        assert!(is_kiteable(&spot(), &reading(15, Octant::NE)));
        assert!(is_kiteable(&spot(), &reading(12, Octant::N)));
        assert!(is_kiteable(&spot(), &reading(20, Octant::N)));
    }

    #[test]
    fn test_off_when_too_strong() {
        assert!(!is_kiteable(&spot(), &reading(25, Octant::NE)));
        assert!(!is_kiteable(&spot(), &reading(11, Octant::NE)));
    }

    #[test]
    fn test_off_when_wrong_direction() {
        assert!(!is_kiteable(&spot(), &reading(15, Octant::S)));
    }

    #[test]
    fn test_status_lines() {
        let on = assess(&spot(), 9, &reading(15, Octant::NE));
        assert!(on.kiteable);
        assert_eq!(on.line, "✅ ON  NE 15 kn @ 09:00");

        let off = assess(&spot(), 18, &reading(8, Octant::S));
        assert!(!off.kiteable);
        assert_eq!(off.line, "❌ OFF S   8 kn @ 18:00");
    }
}
