use super::error::{ProjectionError, ProjectionResult};
use super::types::{
    CompensationRows, Parameters, PayoutSchedule, ProjectionSummary, ProjectionTable,
};
use super::views::{add, difference};

pub fn project(params: &Parameters) -> ProjectionResult<ProjectionTable> {
    validate_parameters(params)?;
    log::debug!(
        "projecting {} years, current={} new={} rate={} compensation={}",
        params.years,
        params.current_salary,
        params.new_salary,
        params.annual_increase_rate,
        params.compensation.is_some()
    );

    let current_job = project_salary(
        params.current_salary,
        params.annual_increase_rate,
        params.years,
    )?;
    let new_job = project_salary(params.new_salary, params.annual_increase_rate, params.years)?;

    let compensation = match params.compensation {
        Some(comp) => {
            let schedule = schedule_compensation_payout(
                comp.total,
                comp.annual_payout,
                comp.investment_return_rate,
                params.years,
            )?;
            let total_new_job = add(&new_job, &schedule.payouts)?;
            Some(CompensationRows {
                payout: schedule.payouts,
                balance: schedule.balances,
                total_new_job,
            })
        }
        None => None,
    };

    let mut table = ProjectionTable {
        years: (1..=params.years).collect(),
        current_job,
        new_job,
        compensation,
        difference: Vec::new(),
    };
    table.difference = difference(table.new_job_total(), &table.current_job)?;
    Ok(table)
}

pub fn validate_parameters(params: &Parameters) -> ProjectionResult<()> {
    check_non_negative("current_salary", params.current_salary)?;
    check_non_negative("new_salary", params.new_salary)?;
    check_non_negative("annual_increase_rate", params.annual_increase_rate)?;

    if let Some(comp) = &params.compensation {
        check_non_negative("compensation_total", comp.total)?;
        check_non_negative("compensation_annual_payout", comp.annual_payout)?;
        check_non_negative("investment_return_rate", comp.investment_return_rate)?;
    }
    Ok(())
}

/// Converts a signed year count from the outer surfaces into a horizon.
pub fn parse_years(years: i64) -> ProjectionResult<u32> {
    if years < 0 {
        return Err(ProjectionError::invalid(
            "years",
            format!("must be >= 0, got {years}"),
        ));
    }
    u32::try_from(years)
        .map_err(|_| ProjectionError::invalid("years", format!("{years} is out of range")))
}

/// Salary for years 1..=years, each entry one raise further than the last.
/// The starting salary itself is not part of the output.
pub fn project_salary(initial: f64, rate: f64, years: u32) -> ProjectionResult<Vec<f64>> {
    check_non_negative("initial_salary", initial)?;
    check_non_negative("annual_increase_rate", rate)?;

    let growth = 1.0 + rate;
    let mut salary = initial;
    let mut out = Vec::with_capacity(years as usize);
    for _ in 0..years {
        salary *= growth;
        out.push(salary);
    }
    Ok(out)
}

/// Draws `annual_payout` from `total` each year until it runs dry. The final
/// year pays out whatever is left, so the last balance is always zero.
pub fn schedule_compensation_payout(
    total: f64,
    annual_payout: f64,
    investment_rate: f64,
    years: u32,
) -> ProjectionResult<PayoutSchedule> {
    check_non_negative("compensation_total", total)?;
    check_non_negative("compensation_annual_payout", annual_payout)?;
    check_non_negative("investment_return_rate", investment_rate)?;

    let mut schedule = PayoutSchedule {
        payouts: Vec::with_capacity(years as usize),
        balances: Vec::with_capacity(years as usize),
    };
    let growth = 1.0 + investment_rate;
    let mut remaining = total;

    for year in 1..=years {
        let paid = if year == years || remaining < annual_payout {
            remaining
        } else {
            annual_payout
        };
        remaining = (remaining - paid) * growth;

        schedule.payouts.push(paid);
        schedule.balances.push(remaining);
    }

    log::debug!(
        "payout schedule over {years} years: total={total} paid={}",
        schedule.payouts.iter().sum::<f64>()
    );
    Ok(schedule)
}

pub fn summarize(params: &Parameters, table: &ProjectionTable) -> ProjectionSummary {
    let current_salary_final = table
        .current_job
        .last()
        .copied()
        .unwrap_or(params.current_salary);
    let new_salary_final = table.new_job.last().copied().unwrap_or(params.new_salary);

    let current_job_overall: f64 = table.current_job.iter().sum();
    let new_job_overall: f64 = table.new_job.iter().sum();
    let new_total_overall: f64 = table.new_job_total().iter().sum();

    ProjectionSummary {
        years: params.years,
        current_salary_initial: params.current_salary,
        new_salary_initial: params.new_salary,
        initial_delta: params.new_salary - params.current_salary,
        current_salary_final,
        new_salary_final,
        final_delta: new_salary_final - current_salary_final,
        current_job_overall,
        new_job_overall,
        compensation_overall: table
            .compensation
            .as_ref()
            .map(|rows| rows.payout.iter().sum()),
        overall_delta: new_total_overall - current_job_overall,
    }
}

fn check_non_negative(name: &'static str, value: f64) -> ProjectionResult<()> {
    if !value.is_finite() {
        return Err(ProjectionError::invalid(name, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ProjectionError::invalid(
            name,
            format!("must be >= 0, got {value}"),
        ));
    }
    Ok(())
}
