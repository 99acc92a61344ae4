use std::collections::BTreeSet;

use crate::config::ColumnMapping;
use crate::error::{BadScore, ValidationError};

use super::model::{Record, Table, is_missing};

// ---------------------------------------------------------------------------
// Column validation
// ---------------------------------------------------------------------------

/// Positions of the three required columns in a validated table.
///
/// Only [`validate`] builds one, so the selection functions below cannot be
/// reached for a table that lacks a required column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub institution: usize,
    pub program: usize,
    pub score: usize,
}

/// Check that every required column is present.
///
/// Reports exactly the missing columns, in the mapping's order.
pub fn validate(table: &Table, columns: &ColumnMapping) -> Result<ColumnIndex, ValidationError> {
    let found: Vec<Option<usize>> = columns
        .required()
        .iter()
        .map(|name| table.column_index(name))
        .collect();

    match found[..] {
        [Some(institution), Some(program), Some(score)] => Ok(ColumnIndex {
            institution,
            program,
            score,
        }),
        _ => {
            let missing = columns
                .required()
                .iter()
                .zip(&found)
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            Err(ValidationError::MissingColumns(missing))
        }
    }
}

// ---------------------------------------------------------------------------
// Cascading selections
// ---------------------------------------------------------------------------

/// Unique, non-missing institution values of the whole table.
pub fn distinct_institutions(table: &Table, index: &ColumnIndex) -> BTreeSet<String> {
    table
        .records
        .iter()
        .map(|rec| rec.get(index.institution))
        .filter(|v| !is_missing(v))
        .map(str::to_string)
        .collect()
}

/// Unique, non-missing program values among rows of `institution`.
///
/// An institution with no rows gives an empty set.
pub fn distinct_programs(table: &Table, index: &ColumnIndex, institution: &str) -> BTreeSet<String> {
    table
        .records
        .iter()
        .filter(|rec| rec.get(index.institution) == institution)
        .map(|rec| rec.get(index.program))
        .filter(|v| !is_missing(v))
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Final subset + chart series
// ---------------------------------------------------------------------------

/// Rows matching both selections, as indices into the table in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredSubset {
    pub indices: Vec<usize>,
}

impl FilteredSubset {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Resolve the indices against the table they were computed from.
    pub fn records<'t>(&'t self, table: &'t Table) -> impl Iterator<Item = &'t Record> + 't {
        self.indices.iter().map(move |&i| &table.records[i])
    }
}

/// One bar: program label and coerced score.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub score: f64,
}

/// Ordered (label, score) pairs, one per matched row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Collapse points sharing a label into their mean, keeping the order in
    /// which labels first appear.
    pub fn mean_by_label(&self) -> ChartSeries {
        let mut groups: Vec<(String, f64, usize)> = Vec::new();
        for p in &self.points {
            match groups.iter_mut().find(|(label, _, _)| *label == p.label) {
                Some((_, sum, n)) => {
                    *sum += p.score;
                    *n += 1;
                }
                None => groups.push((p.label.clone(), p.score, 1)),
            }
        }
        ChartSeries {
            points: groups
                .into_iter()
                .map(|(label, sum, n)| ChartPoint {
                    label,
                    score: sum / n as f64,
                })
                .collect(),
        }
    }
}

/// Result of the last pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum SubsetOutcome {
    /// No row matches the selection; nothing to chart.
    Empty,
    Ready {
        subset: FilteredSubset,
        series: ChartSeries,
    },
}

/// Coerce a score cell to a finite number.
///
/// Accepts `80`, ` 90.5 ` and the comma-decimal form `85,5`. Rejects
/// missing values, text and non-finite values.
pub fn parse_score(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if is_missing(trimmed) {
        return None;
    }
    let value = trimmed.parse::<f64>().ok().or_else(|| {
        if trimmed.matches(',').count() == 1 && !trimmed.contains('.') {
            trimmed.replace(',', ".").parse::<f64>().ok()
        } else {
            None
        }
    })?;
    value.is_finite().then_some(value)
}

/// Filter to rows matching both selections and derive the chart series.
///
/// Fails with [`ValidationError::NonNumericScore`] listing every matched row
/// whose score cannot be coerced.
pub fn final_subset_and_series(
    table: &Table,
    index: &ColumnIndex,
    institution: &str,
    program: &str,
) -> Result<SubsetOutcome, ValidationError> {
    let indices: Vec<usize> = table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            rec.get(index.institution) == institution && rec.get(index.program) == program
        })
        .map(|(i, _)| i)
        .collect();

    if indices.is_empty() {
        return Ok(SubsetOutcome::Empty);
    }

    let mut points = Vec::with_capacity(indices.len());
    let mut bad = Vec::new();
    for &i in &indices {
        let rec = &table.records[i];
        let raw = rec.get(index.score);
        match parse_score(raw) {
            Some(score) => points.push(ChartPoint {
                label: rec.get(index.program).to_string(),
                score,
            }),
            None => bad.push(BadScore {
                row: i,
                value: raw.to_string(),
            }),
        }
    }

    if !bad.is_empty() {
        return Err(ValidationError::NonNumericScore(bad));
    }

    Ok(SubsetOutcome::Ready {
        subset: FilteredSubset { indices },
        series: ChartSeries { points },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_table;

    fn mapping() -> ColumnMapping {
        ColumnMapping::default()
    }

    fn table(rows: &[(&str, &str, &str)]) -> Table {
        Table::new(
            vec![
                "Universidad".into(),
                "Licenciatura".into(),
                "Integridad Académica".into(),
            ],
            rows.iter().map(|(u, l, s)| Record::new([*u, *l, *s])).collect(),
        )
    }

    fn scenario_a() -> Table {
        table(&[("U1", "CS", "80"), ("U1", "CS", "90"), ("U1", "Law", "70")])
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn validate_reports_exactly_the_missing_columns() {
        let t = Table::new(vec!["Licenciatura".into(), "Extra".into()], vec![]);
        assert_eq!(
            validate(&t, &mapping()),
            Err(ValidationError::MissingColumns(vec![
                "Universidad".into(),
                "Integridad Académica".into()
            ]))
        );
    }

    #[test]
    fn validate_finds_columns_in_any_order() {
        let t = Table::new(
            vec![
                "Integridad Académica".into(),
                "Año".into(),
                "Universidad".into(),
                "Licenciatura".into(),
            ],
            vec![],
        );
        let index = validate(&t, &mapping()).unwrap();
        assert_eq!(
            index,
            ColumnIndex {
                institution: 2,
                program: 3,
                score: 0
            }
        );
    }

    #[test]
    fn empty_table_misses_all_three_columns() {
        let err = validate(&Table::empty(), &mapping()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingColumns(vec![
                "Universidad".into(),
                "Licenciatura".into(),
                "Integridad Académica".into()
            ])
        );
    }

    #[test]
    fn institutions_are_unique_and_skip_blanks() {
        let t = table(&[
            ("U1", "CS", "80"),
            ("U2", "CS", "80"),
            ("U1", "Law", "70"),
            ("", "Law", "70"),
            ("N/A", "Law", "70"),
            ("  ", "Law", "70"),
        ]);
        let index = validate(&t, &mapping()).unwrap();
        assert_eq!(distinct_institutions(&t, &index), set(&["U1", "U2"]));
    }

    #[test]
    fn header_only_table_has_no_institutions() {
        let t = table(&[]);
        let index = validate(&t, &mapping()).unwrap();
        assert!(distinct_institutions(&t, &index).is_empty());
    }

    #[test]
    fn programs_are_scoped_to_the_institution() {
        let t = table(&[
            ("U1", "CS", "80"),
            ("U2", "Med", "60"),
            ("U1", "Law", "70"),
            ("U1", "", "70"),
        ]);
        let index = validate(&t, &mapping()).unwrap();
        assert_eq!(distinct_programs(&t, &index, "U1"), set(&["CS", "Law"]));
        assert_eq!(distinct_programs(&t, &index, "U2"), set(&["Med"]));
    }

    #[test]
    fn unknown_institution_has_no_programs() {
        let t = scenario_a();
        let index = validate(&t, &mapping()).unwrap();
        assert!(distinct_programs(&t, &index, "U2").is_empty());
        assert!(distinct_programs(&t, &index, "u1").is_empty());
    }

    #[test]
    fn distinct_programs_is_idempotent() {
        let t = scenario_a();
        let index = validate(&t, &mapping()).unwrap();
        let first = distinct_programs(&t, &index, "U1");
        let second = distinct_programs(&t, &index, "U1");
        assert_eq!(first, second);
        assert_eq!(t, scenario_a());
    }

    #[test]
    fn scenario_a_one_bar_per_row() {
        let t = scenario_a();
        let index = validate(&t, &mapping()).unwrap();
        assert_eq!(distinct_programs(&t, &index, "U1"), set(&["CS", "Law"]));

        let SubsetOutcome::Ready { subset, series } =
            final_subset_and_series(&t, &index, "U1", "CS").unwrap()
        else {
            panic!("expected a chart");
        };
        assert_eq!(subset.indices, vec![0, 1]);
        assert_eq!(series.len(), subset.len());
        assert_eq!(
            series.points,
            vec![
                ChartPoint { label: "CS".into(), score: 80.0 },
                ChartPoint { label: "CS".into(), score: 90.0 },
            ]
        );
    }

    #[test]
    fn subset_records_keep_pass_through_columns() {
        let t = read_table(
            "Año,Universidad,Licenciatura,Integridad Académica\n2023,U1,CS,80\n2024,U1,CS,85\n"
                .as_bytes(),
        )
        .unwrap();
        let index = validate(&t, &mapping()).unwrap();
        let SubsetOutcome::Ready { subset, .. } =
            final_subset_and_series(&t, &index, "U1", "CS").unwrap()
        else {
            panic!("expected a chart");
        };
        let years: Vec<&str> = subset.records(&t).map(|r| r.get(0)).collect();
        assert_eq!(years, vec!["2023", "2024"]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let t = scenario_a();
        let index = validate(&t, &mapping()).unwrap();
        assert_eq!(
            final_subset_and_series(&t, &index, "U1", "Med"),
            Ok(SubsetOutcome::Empty)
        );
    }

    #[test]
    fn scenario_c_non_numeric_score_fails_loud() {
        let t = table(&[("U1", "CS", "80"), ("U1", "CS", "N/A"), ("U1", "Law", "bad")]);
        let index = validate(&t, &mapping()).unwrap();
        assert_eq!(
            final_subset_and_series(&t, &index, "U1", "CS"),
            Err(ValidationError::NonNumericScore(vec![BadScore {
                row: 1,
                value: "N/A".into()
            }]))
        );
        // Other programs are unaffected.
        assert!(matches!(
            final_subset_and_series(&t, &index, "U1", "Law"),
            Err(ValidationError::NonNumericScore(_))
        ));
    }

    #[test]
    fn score_coercion() {
        assert_eq!(parse_score("80"), Some(80.0));
        assert_eq!(parse_score(" 90.5 "), Some(90.5));
        assert_eq!(parse_score("85,5"), Some(85.5));
        assert_eq!(parse_score("-3"), Some(-3.0));
        assert_eq!(parse_score("N/A"), None);
        assert_eq!(parse_score(""), None);
        assert_eq!(parse_score("NaN"), None);
        assert_eq!(parse_score("inf"), None);
        assert_eq!(parse_score("1,234.5"), None);
        assert_eq!(parse_score("1,2,3"), None);
        assert_eq!(parse_score("ochenta"), None);
    }

    #[test]
    fn mean_by_label_keeps_first_seen_order() {
        let series = ChartSeries {
            points: vec![
                ChartPoint { label: "Law".into(), score: 70.0 },
                ChartPoint { label: "CS".into(), score: 80.0 },
                ChartPoint { label: "Law".into(), score: 90.0 },
            ],
        };
        let mean = series.mean_by_label();
        assert_eq!(
            mean.points,
            vec![
                ChartPoint { label: "Law".into(), score: 80.0 },
                ChartPoint { label: "CS".into(), score: 80.0 },
            ]
        );
        assert_eq!(series.len(), 3);
    }
}
