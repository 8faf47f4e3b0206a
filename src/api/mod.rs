use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    CompareTarget, Compensation, LabeledSeries, LongPoint, Parameters, ProjectionError,
    ProjectionSummary, ViewMode, build_comparison_and_difference, parse_years, project,
    select_view, summarize, to_long_format, validate_parameters,
};

const MAX_YEARS: i64 = 100;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliViewMode {
    Yearly,
    OverallSum,
}

impl From<CliViewMode> for ViewMode {
    fn from(value: CliViewMode) -> Self {
        match value {
            CliViewMode::Yearly => ViewMode::Yearly,
            CliViewMode::OverallSum => ViewMode::OverallSum,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCompareTarget {
    Absolute,
    Difference,
}

impl From<CliCompareTarget> for CompareTarget {
    fn from(value: CliCompareTarget) -> Self {
        match value {
            CliCompareTarget::Absolute => CompareTarget::Absolute,
            CliCompareTarget::Difference => CompareTarget::Difference,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiViewMode {
    Yearly,
    #[serde(alias = "overallSum", alias = "overall_sum", alias = "overall")]
    OverallSum,
}

impl From<ApiViewMode> for CliViewMode {
    fn from(value: ApiViewMode) -> Self {
        match value {
            ApiViewMode::Yearly => CliViewMode::Yearly,
            ApiViewMode::OverallSum => CliViewMode::OverallSum,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiCompareTarget {
    Absolute,
    #[serde(alias = "diff")]
    Difference,
}

impl From<ApiCompareTarget> for CliCompareTarget {
    fn from(value: ApiCompareTarget) -> Self {
        match value {
            ApiCompareTarget::Absolute => CliCompareTarget::Absolute,
            ApiCompareTarget::Difference => CliCompareTarget::Difference,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ResponseView {
    Yearly,
    OverallSum,
}

impl From<ViewMode> for ResponseView {
    fn from(value: ViewMode) -> Self {
        match value {
            ViewMode::Yearly => ResponseView::Yearly,
            ViewMode::OverallSum => ResponseView::OverallSum,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
enum ResponseTarget {
    Absolute,
    Difference,
}

impl From<CompareTarget> for ResponseTarget {
    fn from(value: CompareTarget) -> Self {
        match value {
            CompareTarget::Absolute => ResponseTarget::Absolute,
            CompareTarget::Difference => ResponseTarget::Difference,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    years: Option<i64>,
    current_salary: Option<f64>,
    new_salary: Option<f64>,
    salary_increase: Option<f64>,

    compensation_enabled: Option<bool>,
    compensation_total: Option<f64>,
    compensation_payout: Option<f64>,
    investment_return: Option<f64>,

    view: Option<ApiViewMode>,
    target: Option<ApiCompareTarget>,
}

#[derive(Parser, Debug)]
#[command(
    name = "jobswitch",
    about = "Compare projected income of your current job with a new job offer"
)]
struct Cli {
    #[arg(
        long,
        default_value_t = 5,
        allow_negative_numbers = true,
        help = "Years until retirement"
    )]
    years: i64,
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    current_salary: f64,
    #[arg(long, default_value_t = 90.0, allow_negative_numbers = true)]
    new_salary: f64,
    #[arg(
        long,
        default_value_t = 2.0,
        allow_negative_numbers = true,
        help = "Expected yearly salary increase in percent, applied to both jobs"
    )]
    salary_increase: f64,
    #[arg(
        long,
        help = "Include a one-time compensation payment paid out over the coming years"
    )]
    compensation: bool,
    #[arg(
        long,
        default_value_t = 200.0,
        allow_negative_numbers = true,
        help = "Compensation lump sum, used with --compensation"
    )]
    compensation_total: f64,
    #[arg(
        long,
        default_value_t = 50.0,
        allow_negative_numbers = true,
        help = "Yearly payout drawn from the compensation; the final year pays out the rest"
    )]
    compensation_payout: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        allow_negative_numbers = true,
        help = "Yearly return on the undisbursed compensation in percent"
    )]
    investment_return: f64,
    #[arg(long, value_enum, default_value_t = CliViewMode::Yearly)]
    view: CliViewMode,
    #[arg(long, value_enum, default_value_t = CliCompareTarget::Absolute)]
    target: CliCompareTarget,
}

#[derive(Copy, Clone, Debug)]
struct ApiOptions {
    view: ViewMode,
    target: CompareTarget,
}

#[derive(Debug)]
struct ApiRequest {
    params: Parameters,
    options: ApiOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    view: ResponseView,
    target: ResponseTarget,
    compensation_enabled: bool,
    years: Vec<u32>,
    summary: ProjectionSummary,
    table: Vec<LabeledSeries>,
    series: Vec<LabeledSeries>,
    chart: Vec<LongPoint>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_parameters(cli: &Cli) -> Result<Parameters, String> {
    if cli.years > MAX_YEARS {
        return Err(format!("--years must be <= {MAX_YEARS}"));
    }
    let years = parse_years(cli.years).map_err(|e| e.to_string())?;

    let compensation = cli.compensation.then(|| Compensation {
        total: cli.compensation_total,
        annual_payout: cli.compensation_payout,
        investment_return_rate: cli.investment_return / 100.0,
    });

    let params = Parameters {
        years,
        current_salary: cli.current_salary,
        new_salary: cli.new_salary,
        annual_increase_rate: cli.salary_increase / 100.0,
        compensation,
    };
    validate_parameters(&params).map_err(|e| e.to_string())?;
    Ok(params)
}

fn build_request(cli: &Cli) -> Result<ApiRequest, String> {
    Ok(ApiRequest {
        params: build_parameters(cli)?,
        options: ApiOptions {
            view: cli.view.into(),
            target: cli.target.into(),
        },
    })
}

fn build_project_response(request: &ApiRequest) -> Result<ProjectResponse, ProjectionError> {
    let params = &request.params;
    let table = project(params)?;
    let summary = summarize(params, &table);
    let view = build_comparison_and_difference(&table, request.options.view)?;
    let series = select_view(&view, request.options.target);
    let chart = to_long_format(&view.table.years, &series)?;

    log::debug!(
        "built {:?}/{:?} view with {} chart points",
        request.options.view,
        request.options.target,
        chart.len()
    );

    Ok(ProjectResponse {
        view: request.options.view.into(),
        target: request.options.target.into(),
        compensation_enabled: params.compensation.is_some(),
        years: table.years.clone(),
        summary,
        table: table.labeled_series(),
        series,
        chart,
    })
}

/// Parses the process arguments and renders the projection report as JSON.
pub fn run_report() -> Result<String, String> {
    let cli = Cli::parse();
    let request = build_request(&cli)?;
    let response = build_project_response(&request).map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(&response).map_err(|e| format!("failed to render report: {e}"))
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    log::info!("job change API listening on http://{addr}");
    log::info!("local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            log::warn!("rejected projection request: {msg}");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match build_project_response(&request) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => {
            let status = match err {
                ProjectionError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
                ProjectionError::ShapeMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            log::warn!("projection failed: {err}");
            error_response(status, &err.to_string())
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: ProjectPayload) -> Result<ApiRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.current_salary {
        cli.current_salary = v;
    }
    if let Some(v) = payload.new_salary {
        cli.new_salary = v;
    }
    if let Some(v) = payload.salary_increase {
        cli.salary_increase = v;
    }

    if let Some(v) = payload.compensation_enabled {
        cli.compensation = v;
    }
    if let Some(v) = payload.compensation_total {
        cli.compensation_total = v;
    }
    if let Some(v) = payload.compensation_payout {
        cli.compensation_payout = v;
    }
    if let Some(v) = payload.investment_return {
        cli.investment_return = v;
    }

    if let Some(v) = payload.view {
        cli.view = v.into();
    }
    if let Some(v) = payload.target {
        cli.target = v.into();
    }

    build_request(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        years: 5,
        current_salary: 100.0,
        new_salary: 90.0,
        salary_increase: 2.0,
        compensation: false,
        compensation_total: 200.0,
        compensation_payout: 50.0,
        investment_return: 5.0,
        view: CliViewMode::Yearly,
        target: CliCompareTarget::Absolute,
    }
}
