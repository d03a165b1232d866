use crate::error::{IsochoreError, Result};

use super::identifier::InclusionId;
use super::model::{PointRecord, SummaryEntry};

// ---------------------------------------------------------------------------
// SoWat isochore file layout
// ---------------------------------------------------------------------------
//
//  line 0      banner
//  line 1..=4  homogenization summary (T, P, salinity, density)
//  line 5..=7  table header
//  line 8..    "T  P" pairs
//  last 2      footer (ignored)

/// Line index / token index / column name of each summary field.
const SUMMARY_FIELDS: [(usize, usize, &str); 4] = [
    (1, 5, "homogenization temperature"),
    (2, 5, "homogenization pressure"),
    (3, 2, "salinity"),
    (4, 2, "density"),
];

/// First line holding a (T, P) pair.
const BODY_START: usize = 8;

/// A single parsed isochore file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub id: InclusionId,
    pub summary: SummaryEntry,
    pub points: Vec<PointRecord>,
}

/// Parse the content of one isochore file.
///
/// `identifier` is the filename stem and must follow the
/// `Sample_Assemblage-Inclusion` grammar. The final line of the content is
/// dropped as footer; of the rest, lines `8..len-1` are the (T, P) pairs.
pub fn parse_record(identifier: &str, content: &str) -> Result<ParsedRecord> {
    let id = InclusionId::parse(identifier)?;

    let mut lines: Vec<&str> = content.lines().collect();
    lines.pop();

    let mut summary_values = [0.0f64; 4];
    for (slot, &(line_idx, token_idx, field)) in summary_values.iter_mut().zip(&SUMMARY_FIELDS) {
        *slot = summary_field(identifier, &lines, line_idx, token_idx, field)?;
    }
    let [t_hom, p_hom, salinity, density] = summary_values;

    let summary = SummaryEntry {
        inclusion: identifier.to_string(),
        homogenization_temperature_c: t_hom,
        homogenization_pressure_bar: p_hom,
        salinity_wt_pct: salinity,
        density_g_ccm: density,
    };

    let body_end = lines.len().saturating_sub(1);
    let body = lines.get(BODY_START..body_end).unwrap_or(&[]);

    let code = id.code();
    let points = body
        .iter()
        .enumerate()
        .map(|(offset, line)| {
            let (t, p) = parse_pair(identifier, BODY_START + offset, line)?;
            Ok(PointRecord {
                inclusion_code: code.clone(),
                sample: id.sample.clone(),
                assemblage: id.assemblage.clone(),
                inclusion: id.inclusion.clone(),
                temperature_c: t,
                pressure_bar: p,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ParsedRecord {
        id,
        summary,
        points,
    })
}

fn summary_field(
    file: &str,
    lines: &[&str],
    line_idx: usize,
    token_idx: usize,
    field: &str,
) -> Result<f64> {
    let line_no = line_idx + 1;
    let line = lines
        .get(line_idx)
        .ok_or_else(|| IsochoreError::format(file, line_no, format!("missing {field} line")))?;
    let token = line.split_whitespace().nth(token_idx).ok_or_else(|| {
        IsochoreError::format(file, line_no, format!("{field}: no token at position {token_idx}"))
    })?;
    parse_float(file, line_no, field, token)
}

fn parse_pair(file: &str, line_idx: usize, line: &str) -> Result<(f64, f64)> {
    let line_no = line_idx + 1;
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [t, p] => Ok((
            parse_float(file, line_no, "temperature", t)?,
            parse_float(file, line_no, "pressure", p)?,
        )),
        other => Err(IsochoreError::format(
            file,
            line_no,
            format!("expected 2 tokens (T P), found {}", other.len()),
        )),
    }
}

fn parse_float(file: &str, line_no: usize, field: &str, token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|_| IsochoreError::format(file, line_no, format!("{field}: '{token}' is not a number")))
}
