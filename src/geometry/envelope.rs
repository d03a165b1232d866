use log::{debug, warn};
use serde::Serialize;

use crate::data::model::{Dataset, PointRecord};
use crate::error::{IsochoreError, Result};

use super::boundaries::{BoundaryKind, PhaseDiagram};
use super::line::{intersect, LineSegment, Point};

// ---------------------------------------------------------------------------
// Per-inclusion isochore line
// ---------------------------------------------------------------------------

/// The straight line through an inclusion's lowest- and highest-pressure
/// points, in (T °C, P MPa) space.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupIsochore {
    pub code: String,
    /// Minimum-pressure point (first one on ties).
    pub cold: Point,
    /// Maximum-pressure point (first one on ties).
    pub hot: Point,
}

impl GroupIsochore {
    /// Returns `None` for an empty group.
    pub fn from_points(code: &str, points: &[&PointRecord]) -> Option<Self> {
        let first = points.first()?;
        let mut cold = *first;
        let mut hot = *first;
        for &p in &points[1..] {
            if p.pressure_bar < cold.pressure_bar {
                cold = p;
            }
            if p.pressure_bar > hot.pressure_bar {
                hot = p;
            }
        }
        Some(GroupIsochore {
            code: code.to_string(),
            cold: Point::new(cold.temperature_c, cold.pressure_mpa()),
            hot: Point::new(hot.temperature_c, hot.pressure_mpa()),
        })
    }

    pub fn line(&self) -> LineSegment {
        LineSegment::new(self.cold, self.hot)
    }
}

/// Where one isochore crosses each reference boundary, if anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupIntersections {
    pub code: String,
    pub eucryptite_spodumene: Option<Point>,
    pub spodumene_petalite: Option<Point>,
}

// ---------------------------------------------------------------------------
// TrappingEnvelope
// ---------------------------------------------------------------------------

/// Which part of the diagram the hottest isochore of a sample reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeBranch {
    /// Crosses the spodumene-petalite boundary beyond its upper corner; the
    /// envelope follows the whole upper boundary.
    BeyondPetaliteField,
    /// Crosses the spodumene-petalite boundary between its endpoints.
    PetaliteField,
    /// Only the eucryptite-spodumene boundary is reached.
    SpodumeneField,
}

/// Clipped polyline along which a sample's inclusions were trapped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrappingEnvelope {
    pub sample: String,
    pub branch: EnvelopeBranch,
    pub vertices: Vec<Point>,
}

// ---------------------------------------------------------------------------
// EnvelopeBuilder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct EnvelopeBuilder {
    diagram: PhaseDiagram,
}

impl EnvelopeBuilder {
    pub fn new(diagram: PhaseDiagram) -> Self {
        EnvelopeBuilder { diagram }
    }

    pub fn diagram(&self) -> &PhaseDiagram {
        &self.diagram
    }

    /// Intersect one isochore with both boundaries. Parallel lines yield
    /// `None` for that boundary.
    pub fn intersect_group(&self, group: &GroupIsochore) -> GroupIntersections {
        let line = group.line();
        let cross = |kind: BoundaryKind| match intersect(&line, self.diagram.boundary(kind)) {
            Ok(p) => Some(p),
            Err(err) => {
                debug!("{} vs {kind}: {err}", group.code);
                None
            }
        };
        GroupIntersections {
            code: group.code.clone(),
            eucryptite_spodumene: cross(BoundaryKind::EucryptiteSpodumene),
            spodumene_petalite: cross(BoundaryKind::SpodumenePetalite),
        }
    }

    /// Build the envelope of one sample from its isochores.
    ///
    /// Groups are reduced in the order given; on an exact tie of the
    /// extreme temperature the earlier group wins.
    pub fn build(&self, sample: &str, groups: &[GroupIsochore]) -> Result<TrappingEnvelope> {
        let crossings: Vec<GroupIntersections> =
            groups.iter().map(|g| self.intersect_group(g)).collect();

        let missing = |boundary| IsochoreError::ModelAssumption {
            sample: sample.to_string(),
            boundary,
        };

        let eu = crossings.iter().filter_map(|c| c.eucryptite_spodumene);
        let eu_min = extreme(eu.clone(), |a, b| a < b)
            .ok_or_else(|| missing(BoundaryKind::EucryptiteSpodumene))?;
        let eu_max = extreme(eu, |a, b| a > b)
            .ok_or_else(|| missing(BoundaryKind::EucryptiteSpodumene))?;

        let pe = crossings.iter().filter_map(|c| c.spodumene_petalite);
        let pe_max = extreme(pe, |a, b| a > b)
            .ok_or_else(|| missing(BoundaryKind::SpodumenePetalite))?;

        let triple = self.diagram.triple_point();
        let corner = self.diagram.petalite_corner();

        let (branch, vertices) = if pe_max.x > corner.x {
            let mut v = vec![eu_min, triple, corner];
            v.extend(self.diagram.high_temperature_trail.iter().copied());
            (EnvelopeBranch::BeyondPetaliteField, v)
        } else if triple.x < pe_max.x && pe_max.x < corner.x {
            (EnvelopeBranch::PetaliteField, vec![eu_min, triple, pe_max])
        } else {
            (EnvelopeBranch::SpodumeneField, vec![eu_min, eu_max])
        };

        debug!(
            "sample {sample}: eu_min {eu_min}, eu_max {eu_max}, pe_max {pe_max} -> {branch:?}"
        );

        Ok(TrappingEnvelope {
            sample: sample.to_string(),
            branch,
            vertices,
        })
    }

    /// Build the envelope of one sample of a dataset.
    pub fn build_sample(&self, dataset: &Dataset, sample: &str) -> Result<TrappingEnvelope> {
        let groups: Vec<GroupIsochore> = dataset
            .inclusion_groups(sample)
            .filter_map(|(code, points)| GroupIsochore::from_points(code, &points))
            .collect();
        self.build(sample, &groups)
    }

    /// Build one envelope per sample, in sample order.
    pub fn build_all(&self, dataset: &Dataset) -> Vec<Result<TrappingEnvelope>> {
        dataset
            .samples()
            .map(|sample| {
                let result = self.build_sample(dataset, sample);
                if let Err(err) = &result {
                    warn!("{err}");
                }
                result
            })
            .collect()
    }
}

/// First point whose `x` beats every earlier one under `better`.
fn extreme(points: impl Iterator<Item = Point>, better: impl Fn(f64, f64) -> bool) -> Option<Point> {
    points.fold(None, |best, p| match best {
        Some(b) if !better(p.x, b.x) => Some(b),
        _ => Some(p),
    })
}
