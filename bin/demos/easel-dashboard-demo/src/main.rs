// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use easel::chart::{BarConfig, CardConfig, LineConfig, PieConfig, TableConfig};
use easel::data::value::parse_number;
use easel::{
    Aggregation, ChartConfig, ChartEngine, ChartType, ColumnType, Dashboard, Dataset,
    EngineSettings, InMemoryDatasets, Row, Value,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DATASET_ID: &str = "csv";
#[derive(Parser, Debug, Clone)]
#[command(name = "easel-dashboard-demo", about = "Render chart configs over a CSV file")]
struct Cli {
    #[arg(long, global = true, value_name = "YAML")]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}
#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// List the registered chart types.
    Types,
    /// Render a single chart.
    Render {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "bar")]
        chart: String,
        #[arg(long)]
        x: Option<String>,
        #[arg(long, value_delimiter = ',')]
        y: Vec<String>,
        #[arg(long)]
        filter: Option<String>,
    },
    /// Build a dashboard from the CSV's columns and render its first tab.
    Dashboard {
        #[arg(long)]
        csv: PathBuf,
    },
}
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => EngineSettings::from_yaml_file(path)?,
        None => EngineSettings::default(),
    }
    .with_env_overrides();
    let engine = ChartEngine::with_settings(settings)?;
    match cli.cmd {
        Command::Types => {
            let descriptors = engine.registry().descriptors();
            println!("{}", serde_json::to_string_pretty(&descriptors)?);
        }
        Command::Render {
            csv,
            chart,
            x,
            y,
            filter,
        } => {
            let dataset = load_csv(&csv)?;
            let config = build_config(&engine, &chart, x, y, filter, &dataset)?;
            if !engine.factory().validate_config(&config)? {
                warn!(chart = %chart, "Config is incomplete, rendering anyway");
            }
            let (render, report) = engine.render_with_diagnostics(&dataset.rows, &config)?;
            info!(
                rows_in = report.rows_in,
                coerced_to_zero = report.coerced_to_zero,
                missing_values = report.missing_values,
                "Rendered chart"
            );
            println!("{}", serde_json::to_string_pretty(&render)?);
        }
        Command::Dashboard { csv } => {
            let dataset = load_csv(&csv)?;
            let mut dashboard = Dashboard::new(dataset.name.clone(), &engine.settings().grid);
            let tab_id = dashboard.tabs[0].id.clone();
            for config in suggested_charts(&dataset) {
                dashboard.add_chart(&tab_id, config, engine.registry())?;
            }
            let mut sources = InMemoryDatasets::new();
            sources.insert(dataset);
            let rendered = engine.render_tab(&dashboard, &tab_id, &sources)?;
            info!(widgets = rendered.len(), "Rendered dashboard tab");
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
    }
    Ok(())
}
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file '{}'", path.display()))?;
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.to_string(), cell_value(cell)))
            .collect();
        rows.push(row);
    }
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| DATASET_ID.to_string());
    info!(rows = rows.len(), columns = headers.len(), "Loaded CSV");
    Ok(Dataset::new(DATASET_ID, name, rows))
}
fn cell_value(cell: &str) -> Value {
    if cell.trim().is_empty() {
        Value::Null
    } else if let Some(n) = parse_number(cell).filter(|n| n.is_finite()) {
        Value::Number(n)
    } else {
        Value::Text(cell.to_string())
    }
}
fn first_of(dataset: &Dataset, kind: ColumnType) -> Option<String> {
    dataset
        .columns
        .iter()
        .find(|c| c.column_type == kind)
        .map(|c| c.name.clone())
}
fn build_config(
    engine: &ChartEngine,
    chart: &str,
    x: Option<String>,
    y: Vec<String>,
    filter: Option<String>,
    dataset: &Dataset,
) -> Result<ChartConfig> {
    let chart_type: ChartType = chart.parse()?;
    let x = x
        .or_else(|| first_of(dataset, ColumnType::String))
        .or_else(|| first_of(dataset, ColumnType::Date));
    let y = if y.is_empty() {
        first_of(dataset, ColumnType::Number).into_iter().collect()
    } else {
        y
    };
    let mut raw = serde_json::json!({ "title": format!("{} of {}", chart_type, dataset.name) });
    match chart_type {
        ChartType::Bar | ChartType::Line | ChartType::Scatter => {
            raw["xAxis"] = serde_json::json!(x.into_iter().collect::<Vec<_>>());
            raw["yAxis"] = serde_json::json!(y);
        }
        ChartType::Pie => {
            raw["category"] = serde_json::json!(x.unwrap_or_default());
            raw["value"] = serde_json::json!(y.first().cloned().unwrap_or_default());
        }
        ChartType::Card => {
            raw["field"] = serde_json::json!(y.first().cloned().unwrap_or_default());
        }
        ChartType::Table => {
            raw["columns"] = serde_json::json!(dataset.column_names());
        }
    }
    if let Some(filter) = filter {
        if !matches!(chart_type, ChartType::Bar | ChartType::Card | ChartType::Table) {
            bail!("chart type '{chart_type}' does not take a filter");
        }
        raw["filter"] = serde_json::json!(filter);
    }
    let config = engine
        .factory()
        .import_config(chart_type, &raw)?
        .with_data_source(dataset.id.clone());
    Ok(config)
}
fn suggested_charts(dataset: &Dataset) -> Vec<ChartConfig> {
    let category = first_of(dataset, ColumnType::String);
    let date = first_of(dataset, ColumnType::Date);
    let mut charts: Vec<ChartConfig> = Vec::new();
    if let Some(measure) = first_of(dataset, ColumnType::Number) {
        add_measure_charts(&mut charts, measure, category, date);
    }
    charts.push(table_of(dataset));
    charts
        .into_iter()
        .map(|config| config.with_data_source(dataset.id.clone()))
        .collect()
}
fn add_measure_charts(
    charts: &mut Vec<ChartConfig>,
    measure: String,
    category: Option<String>,
    date: Option<String>,
) {
    charts.push(
        CardConfig {
            field: measure.clone(),
            aggregation: Aggregation::Sum,
            sub_header: format!("Total {measure}"),
            ..CardConfig::default()
        }
        .into(),
    );
    if let Some(category) = &category {
        charts.push(
            BarConfig {
                x_axis: vec![category.clone()],
                y_axis: vec![measure.clone()],
                ..BarConfig::default()
            }
            .into(),
        );
        charts.push(
            PieConfig {
                category: category.clone(),
                value: measure.clone(),
                donut: true,
                ..PieConfig::default()
            }
            .into(),
        );
    }
    if let Some(date) = date {
        charts.push(
            LineConfig {
                x_axis: vec![date],
                y_axis: vec![measure],
                smooth: true,
                ..LineConfig::default()
            }
            .into(),
        );
    }
}
fn table_of(dataset: &Dataset) -> ChartConfig {
    TableConfig {
        columns: dataset.column_names().into_iter().map(String::from).collect(),
        ..TableConfig::default()
    }
    .into()
}
