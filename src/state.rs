use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::filter::{
    ChartSeries, ColumnIndex, FilteredSubset, SubsetOutcome, distinct_institutions,
    distinct_programs, final_subset_and_series, validate,
};
use crate::data::loader::load_or_empty;
use crate::data::model::Table;
use crate::error::{ExportError, ValidationError};
use crate::export::{self, ExportOptions};

// ---------------------------------------------------------------------------
// Session stages and notices
// ---------------------------------------------------------------------------

/// Where the session is in the load → select → chart flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unloaded,
    Loaded,
    InstitutionChosen,
    ProgramChosen,
    Charted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    LoadFailed,
    MissingColumns,
    NoInstitutions,
    NoProgramsForInstitution,
    EmptyFinalSubset,
    NonNumericScore,
    ExportFailed,
    Exported,
}

impl NoticeKind {
    pub fn severity(self) -> Severity {
        match self {
            NoticeKind::LoadFailed
            | NoticeKind::MissingColumns
            | NoticeKind::NonNumericScore
            | NoticeKind::ExportFailed => Severity::Error,
            NoticeKind::NoInstitutions
            | NoticeKind::NoProgramsForInstitution
            | NoticeKind::EmptyFinalSubset => Severity::Warning,
            NoticeKind::Exported => Severity::Info,
        }
    }
}

impl From<&ValidationError> for NoticeKind {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::MissingColumns(_) => NoticeKind::MissingColumns,
            ValidationError::NonNumericScore(_) => NoticeKind::NonNumericScore,
        }
    }
}

/// A user-visible message produced while handling an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// The chart derived from the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub subset: FilteredSubset,
    pub series: ChartSeries,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
///
/// The table is shared read-only; selections belong to this session only.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (empty until `load`, or after a failed load).
    pub table: Arc<Table>,

    /// Set once the table passed column validation.
    pub columns: Option<ColumnIndex>,

    pub stage: Stage,

    pub selected_institution: Option<String>,
    pub selected_program: Option<String>,

    /// Subset and series of the latest successful selection.
    pub view: Option<ChartView>,

    /// Messages for the latest interaction.
    pub notices: Vec<Notice>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            table: Arc::new(Table::empty()),
            columns: None,
            stage: Stage::Unloaded,
            selected_institution: None,
            selected_program: None,
            view: None,
            notices: Vec::new(),
        }
    }

    /// Read the configured CSV and validate it.
    pub fn load(&mut self) {
        let path = self.config.data_path.clone();
        self.load_from(&path);
    }

    /// Read a CSV from `path` and validate it. A missing file leaves an
    /// empty table and an error notice; nothing downstream runs.
    pub fn load_from(&mut self, path: &Path) {
        let (table, err) = load_or_empty(path);
        match err {
            Some(e) => {
                self.reset(Arc::new(table));
                self.notify(NoticeKind::LoadFailed, e.to_string());
            }
            None => self.set_table(Arc::new(table)),
        }
    }

    /// Start a fresh session over an already loaded table.
    pub fn set_table(&mut self, table: Arc<Table>) {
        self.reset(table);

        match validate(&self.table, &self.config.columns) {
            Ok(columns) => {
                self.columns = Some(columns);
                if distinct_institutions(&self.table, &columns).is_empty() {
                    self.notify(
                        NoticeKind::NoInstitutions,
                        "No hay universidades disponibles en el archivo.".to_string(),
                    );
                }
            }
            Err(e) => self.notify(NoticeKind::from(&e), e.to_string()),
        }
    }

    fn reset(&mut self, table: Arc<Table>) {
        self.table = table;
        self.columns = None;
        self.stage = Stage::Loaded;
        self.selected_institution = None;
        self.selected_program = None;
        self.view = None;
        self.notices.clear();
    }

    /// Whether the selection widgets should be offered.
    pub fn selection_enabled(&self) -> bool {
        self.columns.is_some()
    }

    /// Institution options, re-derived from the table on each call.
    pub fn institutions(&self) -> BTreeSet<String> {
        match &self.columns {
            Some(columns) => distinct_institutions(&self.table, columns),
            None => BTreeSet::new(),
        }
    }

    /// Program options for the selected institution, re-derived on each call.
    pub fn programs(&self) -> BTreeSet<String> {
        match (&self.columns, &self.selected_institution) {
            (Some(columns), Some(institution)) => {
                distinct_programs(&self.table, columns, institution)
            }
            _ => BTreeSet::new(),
        }
    }

    /// Change the institution. A previously chosen program survives only if
    /// the new institution offers it.
    pub fn select_institution(&mut self, institution: &str) {
        if self.columns.is_none() {
            log::warn!("Ignoring institution selection: dataset not validated");
            return;
        }
        self.notices.clear();
        self.view = None;
        self.selected_institution = Some(institution.to_string());
        self.stage = Stage::InstitutionChosen;

        let programs = self.programs();
        if programs.is_empty() {
            self.selected_program = None;
            self.notify(
                NoticeKind::NoProgramsForInstitution,
                "No hay datos disponibles para la universidad seleccionada.".to_string(),
            );
            return;
        }

        match self.selected_program.take() {
            Some(program) if programs.contains(&program) => {
                self.selected_program = Some(program);
                self.stage = Stage::ProgramChosen;
                self.derive_chart();
            }
            Some(program) => {
                log::debug!("Program '{program}' not offered by '{institution}', resetting");
            }
            None => {}
        }
    }

    /// Choose a program among those offered for the selected institution.
    pub fn select_program(&mut self, program: &str) {
        if self.selected_institution.is_none() {
            log::warn!("Ignoring program selection: no institution chosen");
            return;
        }
        if !self.programs().contains(program) {
            log::warn!("Ignoring program '{program}': not offered for the selected institution");
            return;
        }
        self.notices.clear();
        self.selected_program = Some(program.to_string());
        self.stage = Stage::ProgramChosen;
        self.derive_chart();
    }

    /// Re-derive subset and series from the table for the current pair.
    fn derive_chart(&mut self) {
        self.view = None;
        let (Some(columns), Some(institution), Some(program)) = (
            self.columns,
            self.selected_institution.as_deref(),
            self.selected_program.as_deref(),
        ) else {
            return;
        };

        match final_subset_and_series(&self.table, &columns, institution, program) {
            Ok(SubsetOutcome::Ready { subset, series }) => {
                log::debug!("Charting {} rows for {institution} / {program}", subset.len());
                self.view = Some(ChartView { subset, series });
                self.stage = Stage::Charted;
            }
            Ok(SubsetOutcome::Empty) => self.notify(
                NoticeKind::EmptyFinalSubset,
                "No hay datos disponibles para la selección actual.".to_string(),
            ),
            Err(e) => self.notify(NoticeKind::from(&e), e.to_string()),
        }
    }

    /// The series to draw: one bar per row, or averaged per label when
    /// configured.
    pub fn chart_series(&self) -> Option<ChartSeries> {
        let view = self.view.as_ref()?;
        if self.config.chart.average_duplicates {
            Some(view.series.mean_by_label())
        } else {
            Some(view.series.clone())
        }
    }

    /// Render the current chart as PNG bytes.
    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        let series = self.chart_series().ok_or(ExportError::EmptySeries)?;
        let options = ExportOptions::from_config(&self.config.export, &self.config.columns);
        export::render_png(&series, &options)
    }

    /// Render the chart and write it to `path`, recording the outcome.
    pub fn save_png(&mut self, path: &Path) {
        let result = self
            .export_png()
            .and_then(|bytes| export::write_png(path, &bytes));
        // Only the latest export outcome is shown.
        self.notices
            .retain(|n| !matches!(n.kind, NoticeKind::Exported | NoticeKind::ExportFailed));
        match result {
            Ok(()) => self.notify(
                NoticeKind::Exported,
                format!("Gráfica guardada en {}", path.display()),
            ),
            Err(e) => self.notify(NoticeKind::ExportFailed, e.to_string()),
        }
    }

    fn notify(&mut self, kind: NoticeKind, message: String) {
        match kind.severity() {
            Severity::Error => log::error!("{message}"),
            Severity::Warning => log::warn!("{message}"),
            Severity::Info => log::info!("{message}"),
        }
        self.notices.push(Notice { kind, message });
    }

    pub fn has_notice(&self, kind: NoticeKind) -> bool {
        self.notices.iter().any(|n| n.kind == kind)
    }
}
