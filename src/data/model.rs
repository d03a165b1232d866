use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PointRecord – one row of the isochores table
// ---------------------------------------------------------------------------

/// One measured (T, P) pair on an inclusion's isochore.
///
/// Serde names match the exported column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    #[serde(rename = "Inclusion_code")]
    pub inclusion_code: String,
    #[serde(rename = "Sample")]
    pub sample: String,
    #[serde(rename = "Assemblage")]
    pub assemblage: String,
    #[serde(rename = "Inclusion")]
    pub inclusion: String,
    #[serde(rename = "T (C)")]
    pub temperature_c: f64,
    #[serde(rename = "P (bar)")]
    pub pressure_bar: f64,
}

impl PointRecord {
    /// Pressure in MPa, the unit of the phase diagram.
    pub fn pressure_mpa(&self) -> f64 {
        self.pressure_bar / 10.0
    }
}

pub const ISOCHORE_COLUMNS: [&str; 6] = [
    "Inclusion_code",
    "Sample",
    "Assemblage",
    "Inclusion",
    "T (C)",
    "P (bar)",
];

// ---------------------------------------------------------------------------
// SummaryEntry – one row of the summary table
// ---------------------------------------------------------------------------

/// Homogenization data from the header of one isochore file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    #[serde(rename = "Inclusion")]
    pub inclusion: String,
    #[serde(rename = "Temperature of total homogenization (C)")]
    pub homogenization_temperature_c: f64,
    #[serde(rename = "Pressure of total homogenization (bar)")]
    pub homogenization_pressure_bar: f64,
    #[serde(rename = "Salinity (wt% NaCl eq.)")]
    pub salinity_wt_pct: f64,
    #[serde(rename = "Density (g/ccm)")]
    pub density_g_ccm: f64,
}

pub const SUMMARY_COLUMNS: [&str; 5] = [
    "Inclusion",
    "Temperature of total homogenization (C)",
    "Pressure of total homogenization (bar)",
    "Salinity (wt% NaCl eq.)",
    "Density (g/ccm)",
];

// ---------------------------------------------------------------------------
// Dataset – the aggregated tables
// ---------------------------------------------------------------------------

/// Points and (optionally) summary rows for a batch, with group indices.
///
/// Samples keep the order in which they first appear in `points`. Within a
/// sample, inclusion groups and assemblages are ordered lexicographically so
/// colouring and tie-breaking do not depend on file discovery order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// All isochore points, per file then per line.
    pub points: Vec<PointRecord>,
    /// Summary rows, `None` when summary computation was disabled.
    pub summary: Option<Vec<SummaryEntry>>,
    /// Sample names in order of first appearance.
    sample_order: Vec<String>,
    /// sample → inclusion code → row indices into `points`.
    groups: BTreeMap<String, BTreeMap<String, Vec<usize>>>,
    /// sample → assemblages.
    assemblages: BTreeMap<String, BTreeSet<String>>,
}

impl Dataset {
    /// Build group indices from the point rows.
    pub fn new(points: Vec<PointRecord>, summary: Option<Vec<SummaryEntry>>) -> Self {
        let mut groups: BTreeMap<String, BTreeMap<String, Vec<usize>>> = BTreeMap::new();
        let mut assemblages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut sample_order = Vec::new();

        for (i, p) in points.iter().enumerate() {
            if !groups.contains_key(&p.sample) {
                sample_order.push(p.sample.clone());
            }
            groups
                .entry(p.sample.clone())
                .or_default()
                .entry(p.inclusion_code.clone())
                .or_default()
                .push(i);
            assemblages
                .entry(p.sample.clone())
                .or_default()
                .insert(p.assemblage.clone());
        }

        Dataset {
            points,
            summary,
            sample_order,
            groups,
            assemblages,
        }
    }

    /// Number of point rows.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sample names in order of first appearance.
    pub fn samples(&self) -> impl Iterator<Item = &str> {
        self.sample_order.iter().map(String::as_str)
    }

    /// Assemblages of a sample in sorted order.
    pub fn assemblages(&self, sample: &str) -> impl Iterator<Item = &str> {
        self.assemblages
            .get(sample)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Rows of one assemblage of a sample, in row order.
    pub fn assemblage_points<'a>(
        &'a self,
        sample: &'a str,
        assemblage: &'a str,
    ) -> impl Iterator<Item = &'a PointRecord> + 'a {
        self.points
            .iter()
            .filter(move |p| p.sample == sample && p.assemblage == assemblage)
    }

    /// Per-inclusion point groups of a sample, ordered by inclusion code.
    pub fn inclusion_groups<'a>(
        &'a self,
        sample: &str,
    ) -> impl Iterator<Item = (&'a str, Vec<&'a PointRecord>)> + 'a {
        self.groups
            .get(sample)
            .into_iter()
            .flat_map(move |codes| {
                codes.iter().map(move |(code, rows)| {
                    (code.as_str(), rows.iter().map(move |&i| &self.points[i]).collect())
                })
            })
    }
}
