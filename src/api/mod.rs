use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{Inputs, YearlySnapshot, project};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

// Upper bound on per-request work; the engine itself accepts any horizon.
const MAX_YEARS: u32 = 1_000;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    #[serde(alias = "initial_investment")]
    initial_investment: Option<f64>,
    #[serde(alias = "monthly_contribution")]
    monthly_contribution: Option<f64>,
    #[serde(
        alias = "interest_rate",
        alias = "annualRatePercent",
        alias = "annual_rate_percent"
    )]
    interest_rate: Option<f64>,
    years: Option<u32>,
}

#[derive(Parser, Debug)]
#[command(
    name = "compound",
    about = "Compound interest projection with monthly compounding (THB)"
)]
struct Cli {
    #[arg(long, default_value_t = 0.0, help = "Amount invested at time zero")]
    initial_investment: f64,
    #[arg(
        long,
        default_value_t = 100_000.0,
        help = "Amount added at the start of every month"
    )]
    monthly_contribution: f64,
    #[arg(
        long,
        default_value_t = 7.5,
        help = "Nominal annual interest rate in percent, e.g. 7.5"
    )]
    interest_rate: f64,
    #[arg(long, default_value_t = 30, help = "Number of years to project")]
    years: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    initial_investment: f64,
    monthly_contribution: f64,
    annual_rate_percent: f64,
    years: u32,
    final_future_value: f64,
    final_total_contributions: f64,
    snapshots: Vec<YearlySnapshot>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<Inputs, String> {
    if !cli.initial_investment.is_finite() || cli.initial_investment < 0.0 {
        return Err("--initial-investment must be >= 0".to_string());
    }

    if !cli.monthly_contribution.is_finite() || cli.monthly_contribution < 0.0 {
        return Err("--monthly-contribution must be >= 0".to_string());
    }

    if !cli.interest_rate.is_finite() || cli.interest_rate < 0.0 {
        return Err("--interest-rate must be >= 0".to_string());
    }

    if cli.years == 0 || cli.years > MAX_YEARS {
        return Err(format!("--years must be between 1 and {MAX_YEARS}"));
    }

    Ok(Inputs {
        initial_investment: cli.initial_investment,
        monthly_contribution: cli.monthly_contribution,
        annual_rate_percent: cli.interest_rate,
        years: cli.years,
    })
}

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    let inputs = build_inputs(cli)?;
    let snapshots = project(&inputs);
    print_projection(&inputs, &snapshots);
    Ok(())
}

fn print_projection(inputs: &Inputs, snapshots: &[YearlySnapshot]) {
    println!(
        "{:>4}  {:>20}  {:>25}",
        "Year", "Future Value (THB)", "Total Contributions (THB)"
    );
    for snapshot in snapshots {
        println!(
            "{:>4}  {:>20}  {:>25}",
            snapshot.year,
            format_thousands(snapshot.future_value),
            format_thousands(snapshot.total_contributions)
        );
    }

    if let Some(last) = snapshots.last() {
        println!();
        println!(
            "In {} years you will have {} Baht",
            inputs.years,
            format_thousands(last.future_value)
        );
    }
}

fn format_thousands(value: f64) -> String {
    if !value.is_finite() || value.abs() >= 9.0e15 {
        return format!("{value:.2}");
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction:02}")
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("Compound interest HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
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
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let snapshots = project(&inputs);
    json_response(StatusCode::OK, build_project_response(&inputs, snapshots))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
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
fn inputs_from_json(json: &str) -> Result<Inputs, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: ProjectPayload) -> Result<Inputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.initial_investment {
        cli.initial_investment = v;
    }
    if let Some(v) = payload.monthly_contribution {
        cli.monthly_contribution = v;
    }
    if let Some(v) = payload.interest_rate {
        cli.interest_rate = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }

    build_inputs(cli)
}

// Mirrors both the clap defaults and the form's initial state.
fn default_cli_for_api() -> Cli {
    Cli {
        initial_investment: 0.0,
        monthly_contribution: 100_000.0,
        interest_rate: 7.5,
        years: 30,
    }
}

fn build_project_response(inputs: &Inputs, snapshots: Vec<YearlySnapshot>) -> ProjectResponse {
    let (final_future_value, final_total_contributions) = snapshots
        .last()
        .map(|snapshot| (snapshot.future_value, snapshot.total_contributions))
        .unwrap_or((inputs.initial_investment, inputs.initial_investment));

    ProjectResponse {
        initial_investment: inputs.initial_investment,
        monthly_contribution: inputs.monthly_contribution,
        annual_rate_percent: inputs.annual_rate_percent,
        years: inputs.years,
        final_future_value,
        final_total_contributions,
        snapshots,
    }
}
