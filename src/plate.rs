use log::warn;
use serde::Serialize;

use crate::color::AssemblageColors;
use crate::data::model::Dataset;
use crate::geometry::envelope::{EnvelopeBuilder, TrappingEnvelope};
use crate::geometry::line::Point;

// ---------------------------------------------------------------------------
// Plate plan
// ---------------------------------------------------------------------------

/// Axis limits of every panel: T (°C) and P (MPa).
pub const X_RANGE: (f64, f64) = (200.0, 900.0);
pub const Y_RANGE: (f64, f64) = (0.0, 500.0);

/// The plate is a 2×2 grid; samples beyond the fourth are left out.
pub const PANEL_TITLES: [&str; 4] = ["a", "b", "c", "d"];

/// Everything an external renderer needs to draw the multi-panel figure.
#[derive(Debug, Clone, Serialize)]
pub struct Plate {
    pub x_label: String,
    pub y_label: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub panels: Vec<Panel>,
}

/// One sample.
#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    /// Panel letter, `a` to `d`.
    pub title: String,
    pub sample: String,
    pub isochores: Vec<IsochoreTrace>,
    /// Background phase-boundary polylines.
    pub boundaries: Vec<Vec<Point>>,
    pub envelope: Option<TrappingEnvelope>,
    /// Set instead of `envelope` when the sample has no usable crossing.
    pub envelope_error: Option<String>,
}

/// All points of one assemblage as a single polyline, in row order.
#[derive(Debug, Clone, Serialize)]
pub struct IsochoreTrace {
    pub assemblage: String,
    pub color: String,
    pub points: Vec<Point>,
}

impl Plate {
    pub fn build(dataset: &Dataset, builder: &EnvelopeBuilder) -> Self {
        let diagram = builder.diagram();
        let mut boundaries = vec![diagram.upper_boundary()];
        boundaries.extend(diagram.tielines.iter().map(|seg| vec![seg.p0, seg.p1]));

        let dropped: Vec<&str> = dataset.samples().skip(PANEL_TITLES.len()).collect();
        if !dropped.is_empty() {
            warn!("plate holds {} panels; leaving out {}", PANEL_TITLES.len(), dropped.join(", "));
        }

        let panels = PANEL_TITLES
            .iter()
            .zip(dataset.samples())
            .enumerate()
            .map(|(i, (title, sample))| {
                let colors = AssemblageColors::new(i, dataset.assemblages(sample));

                let isochores = dataset
                    .assemblages(sample)
                    .map(|assemblage| IsochoreTrace {
                        assemblage: assemblage.to_string(),
                        color: colors.color_for(assemblage).unwrap_or("#808080").to_string(),
                        points: dataset
                            .assemblage_points(sample, assemblage)
                            .map(|p| Point::new(p.temperature_c, p.pressure_mpa()))
                            .collect(),
                    })
                    .collect();

                let (envelope, envelope_error) = match builder.build_sample(dataset, sample) {
                    Ok(env) => (Some(env), None),
                    Err(err) => (None, Some(err.to_string())),
                };

                Panel {
                    title: title.to_string(),
                    sample: sample.to_string(),
                    isochores,
                    boundaries: boundaries.clone(),
                    envelope,
                    envelope_error,
                }
            })
            .collect();

        Plate {
            x_label: "Temperature (°C)".to_string(),
            y_label: "Pressure (MPa)".to_string(),
            x_range: X_RANGE,
            y_range: Y_RANGE,
            panels,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::point;
    use crate::geometry::envelope::EnvelopeBranch;

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                point("S1_A-1", 250.0, 0.0),
                point("S1_A-1", 250.0, 1000.0),
                point("S1_B-2", 400.0, 0.0),
                point("S1_B-2", 400.0, 1000.0),
                point("S2_A-1", 300.0, 1000.0),
            ],
            None,
        )
    }

    #[test]
    fn one_panel_per_sample_with_titles() {
        let plate = Plate::build(&dataset(), &EnvelopeBuilder::default());
        assert_eq!(plate.panels.len(), 2);
        assert_eq!(plate.panels[0].title, "a");
        assert_eq!(plate.panels[1].title, "b");
        assert_eq!(plate.panels[0].sample, "S1");
        assert_eq!(plate.panels[0].boundaries.len(), 4);
    }

    #[test]
    fn traces_are_coloured_by_assemblage_and_in_mpa() {
        let plate = Plate::build(&dataset(), &EnvelopeBuilder::default());
        let traces = &plate.panels[0].isochores;
        assert_eq!(traces.len(), 2);
        assert_ne!(traces[0].color, traces[1].color);
        assert_eq!(traces[0].points[1], Point::new(250.0, 100.0));
    }

    #[test]
    fn envelope_or_error_per_panel() {
        let plate = Plate::build(&dataset(), &EnvelopeBuilder::default());
        let env = plate.panels[0].envelope.as_ref().unwrap();
        assert_eq!(env.branch, EnvelopeBranch::PetaliteField);
        assert!(plate.panels[0].envelope_error.is_none());
        assert!(plate.panels[1].envelope.is_none());
        assert!(plate.panels[1].envelope_error.as_ref().unwrap().contains("S2"));
    }

    #[test]
    fn serialises_to_json() {
        let json = Plate::build(&dataset(), &EnvelopeBuilder::default()).to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["panels"][0]["envelope"]["branch"], "petalite_field");
        assert_eq!(v["x_range"][1], 900.0);
    }

    #[test]
    fn panels_follow_first_appearance_up_to_four() {
        let samples = ["S10", "S1", "S3", "S2", "S5"];
        let points = samples
            .iter()
            .flat_map(|s| {
                let code = format!("{s}_A-1");
                [point(&code, 250.0, 0.0), point(&code, 250.0, 1000.0)]
            })
            .collect();
        let plate = Plate::build(&Dataset::new(points, None), &EnvelopeBuilder::default());

        let got: Vec<(&str, &str)> = plate
            .panels
            .iter()
            .map(|p| (p.title.as_str(), p.sample.as_str()))
            .collect();
        assert_eq!(got, vec![("a", "S10"), ("b", "S1"), ("c", "S3"), ("d", "S2")]);
    }

    #[test]
    fn one_trace_per_assemblage_in_row_order() {
        let ds = Dataset::new(
            vec![
                point("S1_A-1", 250.0, 0.0),
                point("S1_A-1", 300.0, 1000.0),
                point("S1_B-1", 400.0, 0.0),
                point("S1_A-2", 260.0, 0.0),
                point("S1_A-2", 310.0, 1000.0),
            ],
            None,
        );
        let plate = Plate::build(&ds, &EnvelopeBuilder::default());
        let traces = &plate.panels[0].isochores;
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0].assemblage, "A");
        let xs: Vec<f64> = traces[0].points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![250.0, 300.0, 260.0, 310.0]);
        assert_eq!(traces[1].points.len(), 1);
    }
}
