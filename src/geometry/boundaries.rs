use std::fmt;

use serde::{Deserialize, Serialize};

use super::line::{LineSegment, Point};

// ---------------------------------------------------------------------------
// Reference phase boundaries (T °C, P MPa)
// ---------------------------------------------------------------------------

pub const EUCRYPTITE_SPODUMENE: LineSegment =
    LineSegment::new(Point::new(237.0, 165.0), Point::new(338.0, 147.0));

pub const SPODUMENE_PETALITE: LineSegment =
    LineSegment::new(Point::new(338.0, 147.0), Point::new(670.0, 416.0));

/// Spodumene / β-spodumene / virgilite boundary beyond the petalite field.
pub const HIGH_TEMPERATURE_TRAIL: [Point; 2] = [Point::new(708.0, 465.0), Point::new(746.0, 577.0)];

/// Lower tielines drawn under the diagram; not used for intersections.
pub const TIELINES: [LineSegment; 3] = [
    LineSegment::new(Point::new(263.0, 30.0), Point::new(338.0, 147.0)),
    LineSegment::new(Point::new(676.0, 30.0), Point::new(670.0, 416.0)),
    LineSegment::new(Point::new(822.0, 30.0), Point::new(708.0, 465.0)),
];

/// Which reference boundary an intersection was computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    EucryptiteSpodumene,
    SpodumenePetalite,
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryKind::EucryptiteSpodumene => write!(f, "eucryptite-spodumene"),
            BoundaryKind::SpodumenePetalite => write!(f, "spodumene-petalite"),
        }
    }
}

/// The phase diagram the envelope is clipped against.
///
/// Defaults reproduce the Li-aluminosilicate diagram; a config file may
/// override any field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseDiagram {
    pub eucryptite_spodumene: LineSegment,
    pub spodumene_petalite: LineSegment,
    pub high_temperature_trail: Vec<Point>,
    pub tielines: Vec<LineSegment>,
}

impl Default for PhaseDiagram {
    fn default() -> Self {
        PhaseDiagram {
            eucryptite_spodumene: EUCRYPTITE_SPODUMENE,
            spodumene_petalite: SPODUMENE_PETALITE,
            high_temperature_trail: HIGH_TEMPERATURE_TRAIL.to_vec(),
            tielines: TIELINES.to_vec(),
        }
    }
}

impl PhaseDiagram {
    pub fn boundary(&self, kind: BoundaryKind) -> &LineSegment {
        match kind {
            BoundaryKind::EucryptiteSpodumene => &self.eucryptite_spodumene,
            BoundaryKind::SpodumenePetalite => &self.spodumene_petalite,
        }
    }

    /// Eucryptite + spodumene + petalite meeting point.
    pub fn triple_point(&self) -> Point {
        self.spodumene_petalite.p0
    }

    /// High-temperature end of the spodumene-petalite boundary.
    pub fn petalite_corner(&self) -> Point {
        self.spodumene_petalite.p1
    }

    /// The full upper boundary polyline, from the eucryptite field to the
    /// end of the high-temperature trail.
    pub fn upper_boundary(&self) -> Vec<Point> {
        let mut pts = vec![
            self.eucryptite_spodumene.p0,
            self.triple_point(),
            self.petalite_corner(),
        ];
        pts.extend(self.high_temperature_trail.iter().copied());
        pts
    }

    /// Check that the boundaries form a connected diagram.
    pub fn validate(&self) -> Result<(), String> {
        let all = [self.eucryptite_spodumene, self.spodumene_petalite];
        for seg in all.iter().chain(self.tielines.iter()) {
            if seg.p0 == seg.p1 {
                return Err(format!("degenerate boundary segment at {}", seg.p0));
            }
        }
        if self.eucryptite_spodumene.p1 != self.triple_point() {
            return Err(format!(
                "eucryptite-spodumene boundary ends at {} but the triple point is {}",
                self.eucryptite_spodumene.p1,
                self.triple_point()
            ));
        }
        if self.triple_point().x >= self.petalite_corner().x {
            return Err("spodumene-petalite boundary must run towards higher temperature".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_diagram_is_valid() {
        let d = PhaseDiagram::default();
        assert_eq!(d.validate(), Ok(()));
        assert_eq!(d.triple_point(), Point::new(338.0, 147.0));
        assert_eq!(d.petalite_corner(), Point::new(670.0, 416.0));
    }

    #[test]
    fn upper_boundary_matches_background_polyline() {
        let xs: Vec<f64> = PhaseDiagram::default().upper_boundary().iter().map(|p| p.x).collect();
        let ys: Vec<f64> = PhaseDiagram::default().upper_boundary().iter().map(|p| p.y).collect();
        assert_eq!(xs, vec![237.0, 338.0, 670.0, 708.0, 746.0]);
        assert_eq!(ys, vec![165.0, 147.0, 416.0, 465.0, 577.0]);
    }

    #[test]
    fn disconnected_boundaries_are_rejected() {
        let mut d = PhaseDiagram::default();
        d.eucryptite_spodumene.p1 = Point::new(340.0, 147.0);
        assert!(d.validate().is_err());
    }

    #[test]
    fn partial_toml_override_keeps_defaults() {
        let d: PhaseDiagram = toml::from_str(
            "high_temperature_trail = [{ x = 700.0, y = 450.0 }]",
        )
        .unwrap();
        assert_eq!(d.eucryptite_spodumene, EUCRYPTITE_SPODUMENE);
        assert_eq!(d.high_temperature_trail, vec![Point::new(700.0, 450.0)]);
    }
}
