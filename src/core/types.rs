use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ViewMode {
    Yearly,
    OverallSum,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CompareTarget {
    Absolute,
    Difference,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum SeriesKind {
    #[serde(rename = "Current job")]
    CurrentJob,
    #[serde(rename = "New job")]
    NewJob,
    #[serde(rename = "Compensation payout")]
    CompensationPayout,
    #[serde(rename = "Compensation balance")]
    CompensationBalance,
    #[serde(rename = "New job + compensation")]
    TotalNewJob,
    #[serde(rename = "Difference")]
    Difference,
}

impl SeriesKind {
    pub fn label(self) -> &'static str {
        match self {
            SeriesKind::CurrentJob => "Current job",
            SeriesKind::NewJob => "New job",
            SeriesKind::CompensationPayout => "Compensation payout",
            SeriesKind::CompensationBalance => "Compensation balance",
            SeriesKind::TotalNewJob => "New job + compensation",
            SeriesKind::Difference => "Difference",
        }
    }
}

/// One-time lump sum paid out over the projection horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compensation {
    pub total: f64,
    pub annual_payout: f64,
    /// Fractional growth applied to the balance left after each year's payout.
    pub investment_return_rate: f64,
}

/// Input of a single projection run. Rates are fractions (0.02 == 2 %).
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub years: u32,
    pub current_salary: f64,
    pub new_salary: f64,
    pub annual_increase_rate: f64,
    pub compensation: Option<Compensation>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PayoutSchedule {
    pub payouts: Vec<f64>,
    /// Balance carried into the next year, after investment growth.
    pub balances: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompensationRows {
    pub payout: Vec<f64>,
    pub balance: Vec<f64>,
    pub total_new_job: Vec<f64>,
}

/// Year-by-year projection. Every row holds one value per year in `years`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionTable {
    pub years: Vec<u32>,
    pub current_job: Vec<f64>,
    pub new_job: Vec<f64>,
    pub compensation: Option<CompensationRows>,
    pub difference: Vec<f64>,
}

impl ProjectionTable {
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// New job income including compensation payouts when present.
    pub fn new_job_total(&self) -> &[f64] {
        match &self.compensation {
            Some(rows) => &rows.total_new_job,
            None => &self.new_job,
        }
    }

    /// Income rows compared against each other, in display order.
    pub fn comparison_series(&self) -> Vec<LabeledSeries> {
        let mut out = vec![
            LabeledSeries::new(SeriesKind::CurrentJob, &self.current_job),
            LabeledSeries::new(SeriesKind::NewJob, &self.new_job),
        ];
        if let Some(rows) = &self.compensation {
            out.push(LabeledSeries::new(
                SeriesKind::CompensationPayout,
                &rows.payout,
            ));
            out.push(LabeledSeries::new(
                SeriesKind::CompensationBalance,
                &rows.balance,
            ));
            out.push(LabeledSeries::new(
                SeriesKind::TotalNewJob,
                &rows.total_new_job,
            ));
        }
        out
    }

    pub fn labeled_series(&self) -> Vec<LabeledSeries> {
        let mut out = self.comparison_series();
        out.push(LabeledSeries::new(SeriesKind::Difference, &self.difference));
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledSeries {
    pub series: SeriesKind,
    pub values: Vec<f64>,
}

impl LabeledSeries {
    pub fn new(series: SeriesKind, values: &[f64]) -> Self {
        Self {
            series,
            values: values.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonView {
    pub mode: ViewMode,
    pub table: ProjectionTable,
}

impl ComparisonView {
    pub fn difference(&self) -> &[f64] {
        &self.table.difference
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LongPoint {
    pub year: u32,
    pub value: f64,
    pub series: SeriesKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub years: u32,
    pub current_salary_initial: f64,
    pub new_salary_initial: f64,
    pub initial_delta: f64,
    pub current_salary_final: f64,
    pub new_salary_final: f64,
    pub final_delta: f64,
    pub current_job_overall: f64,
    pub new_job_overall: f64,
    pub compensation_overall: Option<f64>,
    pub overall_delta: f64,
}
