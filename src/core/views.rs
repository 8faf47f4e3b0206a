use super::error::{ProjectionError, ProjectionResult};
use super::types::{
    CompareTarget, ComparisonView, CompensationRows, LabeledSeries, LongPoint, ProjectionTable,
    SeriesKind, ViewMode,
};

/// Running total along the year axis.
pub fn cumulative(series: &[f64]) -> Vec<f64> {
    let mut running = 0.0;
    series
        .iter()
        .map(|value| {
            running += value;
            running
        })
        .collect()
}

pub fn difference(a: &[f64], b: &[f64]) -> ProjectionResult<Vec<f64>> {
    zip_rows(a, b, |x, y| x - y)
}

pub(crate) fn add(a: &[f64], b: &[f64]) -> ProjectionResult<Vec<f64>> {
    zip_rows(a, b, |x, y| x + y)
}

fn zip_rows(a: &[f64], b: &[f64], op: impl Fn(f64, f64) -> f64) -> ProjectionResult<Vec<f64>> {
    if a.len() != b.len() {
        return Err(ProjectionError::ShapeMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| op(*x, *y)).collect())
}

/// Prefix-sums every row of `table`. The difference row is recomputed from
/// the summed rows rather than summed itself.
pub fn cumulative_table(table: &ProjectionTable) -> ProjectionResult<ProjectionTable> {
    let compensation = table.compensation.as_ref().map(|rows| CompensationRows {
        payout: cumulative(&rows.payout),
        balance: cumulative(&rows.balance),
        total_new_job: cumulative(&rows.total_new_job),
    });

    let mut out = ProjectionTable {
        years: table.years.clone(),
        current_job: cumulative(&table.current_job),
        new_job: cumulative(&table.new_job),
        compensation,
        difference: Vec::new(),
    };
    out.difference = difference(out.new_job_total(), &out.current_job)?;
    Ok(out)
}

pub fn build_comparison_and_difference(
    table: &ProjectionTable,
    mode: ViewMode,
) -> ProjectionResult<ComparisonView> {
    let table = match mode {
        ViewMode::Yearly => {
            let mut yearly = table.clone();
            yearly.difference = difference(yearly.new_job_total(), &yearly.current_job)?;
            yearly
        }
        ViewMode::OverallSum => cumulative_table(table)?,
    };
    Ok(ComparisonView { mode, table })
}

pub fn select_view(view: &ComparisonView, target: CompareTarget) -> Vec<LabeledSeries> {
    match target {
        CompareTarget::Absolute => view.table.comparison_series(),
        CompareTarget::Difference => vec![LabeledSeries::new(
            SeriesKind::Difference,
            view.difference(),
        )],
    }
}

/// Flattens labelled rows into one point per (year, series), grouped by year.
pub fn to_long_format(
    years: &[u32],
    series: &[LabeledSeries],
) -> ProjectionResult<Vec<LongPoint>> {
    for row in series {
        if row.values.len() != years.len() {
            return Err(ProjectionError::ShapeMismatch {
                left: years.len(),
                right: row.values.len(),
            });
        }
    }

    let mut points = Vec::with_capacity(years.len() * series.len());
    for (idx, year) in years.iter().enumerate() {
        for row in series {
            points.push(LongPoint {
                year: *year,
                value: row.values[idx],
                series: row.series,
            });
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::project;
    use crate::core::types::{Compensation, Parameters};
    use proptest::collection::vec;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_series(actual: &[f64], expected: &[f64]) {
        assert_eq!(
            actual.len(),
            expected.len(),
            "length mismatch: {actual:?} vs {expected:?}"
        );
        for (a, e) in actual.iter().zip(expected) {
            assert_approx(*a, *e);
        }
    }

    fn flat_table() -> ProjectionTable {
        project(&Parameters {
            years: 3,
            current_salary: 100.0,
            new_salary: 90.0,
            annual_increase_rate: 0.0,
            compensation: None,
        })
        .expect("valid params")
    }

    fn compensated_table() -> ProjectionTable {
        project(&Parameters {
            years: 3,
            current_salary: 100.0,
            new_salary: 90.0,
            annual_increase_rate: 0.0,
            compensation: Some(Compensation {
                total: 50.0,
                annual_payout: 20.0,
                investment_return_rate: 0.0,
            }),
        })
        .expect("valid params")
    }

    #[test]
    fn cumulative_prefix_sums_series() {
        assert_eq!(cumulative(&[1.0, 2.0, 3.0, 4.0]), vec![1.0, 3.0, 6.0, 10.0]);
        assert!(cumulative(&[]).is_empty());
    }

    #[test]
    fn difference_subtracts_element_wise() {
        let out = difference(&[5.0, 7.0], &[2.0, 10.0]).expect("equal lengths");
        assert_eq!(out, vec![3.0, -3.0]);
    }

    #[test]
    fn difference_rejects_unequal_lengths() {
        let err = difference(&[1.0, 2.0, 3.0], &[1.0]).expect_err("shape mismatch");
        assert_eq!(err, ProjectionError::ShapeMismatch { left: 3, right: 1 });
    }

    #[test]
    fn yearly_view_passes_rows_through() {
        let table = flat_table();
        let view = build_comparison_and_difference(&table, ViewMode::Yearly).expect("view");
        assert_eq!(view.mode, ViewMode::Yearly);
        assert_eq!(view.table, table);
        assert_series(view.difference(), &[-10.0, -10.0, -10.0]);
    }

    #[test]
    fn overall_sum_view_accumulates_rows() {
        let view = build_comparison_and_difference(&flat_table(), ViewMode::OverallSum)
            .expect("view");
        assert_series(&view.table.current_job, &[100.0, 200.0, 300.0]);
        assert_series(&view.table.new_job, &[90.0, 180.0, 270.0]);
        assert_series(view.difference(), &[-10.0, -20.0, -30.0]);
        assert_eq!(view.table.years, vec![1, 2, 3]);
    }

    #[test]
    fn overall_sum_view_accumulates_compensation_rows() {
        let view = build_comparison_and_difference(&compensated_table(), ViewMode::OverallSum)
            .expect("view");
        let rows = view.table.compensation.as_ref().expect("compensation rows");
        assert_series(&rows.payout, &[20.0, 40.0, 50.0]);
        assert_series(&rows.total_new_job, &[110.0, 220.0, 320.0]);
        assert_series(view.difference(), &[10.0, 20.0, 20.0]);
    }

    #[test]
    fn select_view_absolute_returns_income_rows() {
        let view = build_comparison_and_difference(&compensated_table(), ViewMode::Yearly)
            .expect("view");
        let kinds: Vec<SeriesKind> = select_view(&view, CompareTarget::Absolute)
            .iter()
            .map(|s| s.series)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SeriesKind::CurrentJob,
                SeriesKind::NewJob,
                SeriesKind::CompensationPayout,
                SeriesKind::CompensationBalance,
                SeriesKind::TotalNewJob,
            ]
        );
    }

    #[test]
    fn select_view_difference_returns_single_series() {
        let view = build_comparison_and_difference(&flat_table(), ViewMode::OverallSum)
            .expect("view");
        let selected = select_view(&view, CompareTarget::Difference);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].series, SeriesKind::Difference);
        assert_series(&selected[0].values, &[-10.0, -20.0, -30.0]);
    }

    #[test]
    fn long_format_groups_points_by_year() {
        let table = flat_table();
        let points = to_long_format(&table.years, &table.comparison_series()).expect("points");
        assert_eq!(points.len(), 6);
        assert_eq!(points[0].year, 1);
        assert_eq!(points[0].series, SeriesKind::CurrentJob);
        assert_approx(points[0].value, 100.0);
        assert_eq!(points[1].year, 1);
        assert_eq!(points[1].series, SeriesKind::NewJob);
        assert_approx(points[1].value, 90.0);
        assert_eq!(points[5].year, 3);
    }

    #[test]
    fn long_format_rejects_short_series() {
        let series = vec![LabeledSeries::new(SeriesKind::NewJob, &[1.0])];
        let err = to_long_format(&[1, 2], &series).expect_err("shape mismatch");
        assert_eq!(err, ProjectionError::ShapeMismatch { left: 2, right: 1 });
    }

    #[test]
    fn empty_table_yields_empty_views() {
        let table = project(&Parameters {
            years: 0,
            current_salary: 100.0,
            new_salary: 90.0,
            annual_increase_rate: 0.02,
            compensation: None,
        })
        .expect("valid params");
        let view = build_comparison_and_difference(&table, ViewMode::OverallSum).expect("view");
        assert!(view.table.is_empty());
        assert!(view.difference().is_empty());
        let points = to_long_format(&view.table.years, &view.table.labeled_series())
            .expect("points");
        assert!(points.is_empty());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_cumulative_difference_is_linear(
            pairs in vec((-1_000_000i32..1_000_000, -1_000_000i32..1_000_000), 0..40)
        ) {
            let a: Vec<f64> = pairs.iter().map(|(x, _)| *x as f64 / 100.0).collect();
            let b: Vec<f64> = pairs.iter().map(|(_, y)| *y as f64 / 100.0).collect();

            let lhs = cumulative(&difference(&a, &b).expect("equal lengths"));
            let rhs = difference(&cumulative(&a), &cumulative(&b)).expect("equal lengths");
            prop_assert_eq!(lhs.len(), rhs.len());
            for (l, r) in lhs.iter().zip(&rhs) {
                prop_assert!((l - r).abs() <= EPS, "{} vs {}", l, r);
            }
        }

        #[test]
        fn prop_overall_sum_difference_matches_cumulative_yearly_difference(
            current in 0u32..300_000,
            new in 0u32..300_000,
            rate_bp in 0u32..1_000,
            total in 0u32..500_000,
            payout in 0u32..100_000,
            invest_bp in 0u32..1_000,
            years in 0u32..45,
            with_compensation in proptest::bool::ANY
        ) {
            let compensation = with_compensation.then(|| Compensation {
                total: total as f64,
                annual_payout: payout as f64,
                investment_return_rate: invest_bp as f64 / 10_000.0,
            });
            let table = project(&Parameters {
                years,
                current_salary: current as f64,
                new_salary: new as f64,
                annual_increase_rate: rate_bp as f64 / 10_000.0,
                compensation,
            })
            .expect("valid params");

            let yearly = build_comparison_and_difference(&table, ViewMode::Yearly).expect("view");
            let overall = build_comparison_and_difference(&table, ViewMode::OverallSum).expect("view");
            let summed = cumulative(yearly.difference());

            prop_assert_eq!(overall.difference().len(), years as usize);
            let totals = overall.table.new_job_total();
            for (idx, (o, s)) in overall.difference().iter().zip(&summed).enumerate() {
                let scale = 1.0 + overall.table.current_job[idx].abs() + totals[idx].abs();
                prop_assert!((o - s).abs() <= 1e-9 * scale, "{} vs {}", o, s);
            }
        }
    }
}
