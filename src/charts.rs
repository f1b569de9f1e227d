//! Dashboard Charts
//!
//! Builds the three study charts (subject distribution, weekly hours, daily trend)
//! as Chart.js configurations and keeps a registry of the rendered handles so the
//! whole set can be torn down and rebuilt.

use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Placeholder weekly hours, Monday first
pub const PLACEHOLDER_WEEKLY_HOURS: [f64; 7] = [2.0, 3.0, 1.5, 2.5, 4.0, 1.0, 2.0];

/// Placeholder daily hours for the last seven days, oldest first
pub const PLACEHOLDER_TREND_HOURS: [f64; 7] = [1.8, 3.2, 2.4, 4.1, 2.9, 1.3, 3.6];

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Chart errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Chart config lists differ in length: {names} names, {times} times, {colors} colors")]
    LengthMismatch {
        names: usize,
        times: usize,
        colors: usize,
    },

    #[error("Invalid chart config: {0}")]
    InvalidConfig(String),

    #[error("No chart config embedded for {0}")]
    MissingConfig(&'static str),

    #[error("Chart surface error: {0}")]
    Surface(String),
}

/// The three chart slots a page may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Distribution,
    Weekly,
    Trend,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Distribution, ChartKind::Weekly, ChartKind::Trend];

    /// Registry key
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Distribution => "distribution",
            ChartKind::Weekly => "weekly",
            ChartKind::Trend => "trend",
        }
    }

    /// Id of the canvas element hosting this chart
    pub fn canvas_id(&self) -> &'static str {
        match self {
            ChartKind::Distribution => "subjectDistributionChart",
            ChartKind::Weekly => "weeklyProgressChart",
            ChartKind::Trend => "dailyTrendChart",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ChartKind::Distribution => "Study Time Distribution",
            ChartKind::Weekly => "Weekly Study Progress",
            ChartKind::Trend => "Daily Study Trend",
        }
    }
}

/// Subject distribution embedded in the page's `data-chart` attribute
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartConfig {
    pub subject_names: Vec<String>,
    pub subject_times: Vec<f64>,
    pub subject_colors: Vec<String>,
}

impl ChartConfig {
    /// Parse and validate the embedded JSON
    pub fn parse(raw: &str) -> Result<Self, ChartError> {
        let config: ChartConfig =
            serde_json::from_str(raw).map_err(|e| ChartError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The three lists are parallel and must have the same length
    pub fn validate(&self) -> Result<(), ChartError> {
        let names = self.subject_names.len();
        if self.subject_times.len() != names || self.subject_colors.len() != names {
            return Err(ChartError::LengthMismatch {
                names,
                times: self.subject_times.len(),
                colors: self.subject_colors.len(),
            });
        }
        Ok(())
    }
}

/// Series for the two charts not driven by the embedded config
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Hours per weekday, Monday first
    pub weekly_hours: Vec<f64>,
    /// Hours per day ending today, oldest first
    pub trend_hours: Vec<f64>,
}

impl Default for ChartSeries {
    fn default() -> Self {
        Self {
            weekly_hours: PLACEHOLDER_WEEKLY_HOURS.to_vec(),
            trend_hours: PLACEHOLDER_TREND_HOURS.to_vec(),
        }
    }
}

/// A chart ready to hand to the charting library
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Per-slice colors; only the distribution chart has them
    pub colors: Vec<String>,
}

impl ChartSpec {
    pub fn distribution(config: &ChartConfig) -> Self {
        Self {
            kind: ChartKind::Distribution,
            labels: config.subject_names.clone(),
            values: config.subject_times.clone(),
            colors: config.subject_colors.clone(),
        }
    }

    pub fn weekly(hours: &[f64]) -> Self {
        Self {
            kind: ChartKind::Weekly,
            labels: WEEKDAYS.iter().map(|d| d.to_string()).collect(),
            values: hours.iter().copied().take(WEEKDAYS.len()).collect(),
            colors: Vec::new(),
        }
    }

    /// One point per day, the last one being `today`
    pub fn trend(today: NaiveDate, hours: &[f64]) -> Self {
        let days = hours.len() as i64;
        let labels = (0..days)
            .map(|i| (today - Duration::days(days - 1 - i)).format("%a").to_string())
            .collect();

        Self {
            kind: ChartKind::Trend,
            labels,
            values: hours.to_vec(),
            colors: Vec::new(),
        }
    }

    /// Chart.js configuration object
    pub fn to_chartjs(&self) -> Value {
        let title = json!({ "display": true, "text": self.kind.title() });
        let hours_axis = json!({
            "y": {
                "beginAtZero": true,
                "title": { "display": true, "text": "Hours" }
            }
        });

        match self.kind {
            ChartKind::Distribution => json!({
                "type": "doughnut",
                "data": {
                    "labels": self.labels,
                    "datasets": [{
                        "data": self.values,
                        "backgroundColor": self.colors,
                        "borderWidth": 2,
                        "borderColor": "#FFFFFF"
                    }]
                },
                "options": {
                    "responsive": true,
                    "plugins": {
                        "legend": { "position": "bottom" },
                        "title": title
                    }
                }
            }),
            ChartKind::Weekly => json!({
                "type": "bar",
                "data": {
                    "labels": self.labels,
                    "datasets": [{
                        "label": "Study Hours",
                        "data": self.values,
                        "backgroundColor": "#6366F1",
                        "borderRadius": 8
                    }]
                },
                "options": {
                    "responsive": true,
                    "plugins": { "title": title },
                    "scales": hours_axis
                }
            }),
            ChartKind::Trend => json!({
                "type": "line",
                "data": {
                    "labels": self.labels,
                    "datasets": [{
                        "label": "Daily Study Time",
                        "data": self.values,
                        "borderColor": "#8B5CF6",
                        "backgroundColor": "rgba(139, 92, 246, 0.1)",
                        "tension": 0.4,
                        "fill": true
                    }]
                },
                "options": {
                    "responsive": true,
                    "plugins": { "title": title },
                    "scales": hours_axis
                }
            }),
        }
    }
}

/// The page and charting library the charts are drawn into
pub trait ChartSurface {
    type Handle;

    /// Whether the page has a slot for this chart
    fn has_slot(&self, kind: ChartKind) -> bool;

    /// Raw configuration embedded next to the slot, if any
    fn embedded_config(&self, kind: ChartKind) -> Option<String>;

    fn draw(&mut self, spec: &ChartSpec) -> Result<Self::Handle, ChartError>;

    fn destroy(&mut self, handle: Self::Handle);
}

/// Owns every rendered chart on a page
pub struct ChartsController<S: ChartSurface> {
    surface: S,
    series: ChartSeries,
    charts: HashMap<ChartKind, S::Handle>,
}

impl<S: ChartSurface> ChartsController<S> {
    pub fn new(surface: S, series: ChartSeries) -> Self {
        Self {
            surface,
            series,
            charts: HashMap::new(),
        }
    }

    /// Render every chart whose slot exists; absent slots are skipped silently
    pub fn initialize(&mut self) {
        self.initialize_on(Local::now().date_naive());
    }

    pub fn initialize_on(&mut self, today: NaiveDate) {
        for kind in ChartKind::ALL {
            if !self.surface.has_slot(kind) || self.charts.contains_key(&kind) {
                continue;
            }

            let drawn = self
                .spec_for(kind, today)
                .and_then(|spec| self.surface.draw(&spec));

            match drawn {
                Ok(handle) => {
                    self.charts.insert(kind, handle);
                }
                Err(e) => tracing::warn!(chart = kind.name(), "Skipping chart: {}", e),
            }
        }
    }

    /// Destroy every chart and build the set again
    pub fn refresh(&mut self) {
        self.teardown();
        self.initialize();
    }

    pub fn teardown(&mut self) {
        for (_, handle) in self.charts.drain() {
            self.surface.destroy(handle);
        }
    }

    pub fn has_chart(&self, kind: ChartKind) -> bool {
        self.charts.contains_key(&kind)
    }

    pub fn chart_count(&self) -> usize {
        self.charts.len()
    }

    fn spec_for(&self, kind: ChartKind, today: NaiveDate) -> Result<ChartSpec, ChartError> {
        match kind {
            ChartKind::Distribution => {
                let raw = self
                    .surface
                    .embedded_config(kind)
                    .ok_or(ChartError::MissingConfig(kind.name()))?;
                Ok(ChartSpec::distribution(&ChartConfig::parse(&raw)?))
            }
            ChartKind::Weekly => Ok(ChartSpec::weekly(&self.series.weekly_hours)),
            ChartKind::Trend => Ok(ChartSpec::trend(today, &self.series.trend_hours)),
        }
    }
}
