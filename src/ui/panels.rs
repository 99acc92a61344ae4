use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, Severity};

// ---------------------------------------------------------------------------
// Left side panel – cascading selections
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtros");
    ui.separator();

    if !state.selection_enabled() {
        ui.label("No hay datos para filtrar.");
        return;
    }

    // Options are re-derived on every frame; nothing is cached between changes.
    let institutions = state.institutions();
    if institutions.is_empty() {
        ui.label("No hay universidades disponibles.");
        return;
    }

    ui.strong("Selecciona una Universidad");
    let current = state.selected_institution.clone();
    let mut chosen: Option<String> = None;
    egui::ComboBox::from_id_salt("institution")
        .selected_text(current.as_deref().unwrap_or("—"))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for inst in &institutions {
                if ui
                    .selectable_label(current.as_deref() == Some(inst.as_str()), inst)
                    .clicked()
                {
                    chosen = Some(inst.clone());
                }
            }
        });
    if let Some(inst) = chosen {
        if current.as_deref() != Some(inst.as_str()) {
            state.select_institution(&inst);
        }
    }

    if state.selected_institution.is_none() {
        return;
    }
    ui.add_space(8.0);

    let programs = state.programs();
    if programs.is_empty() {
        return;
    }

    ui.strong("Selecciona una Licenciatura");
    let current = state.selected_program.clone();
    let mut chosen: Option<String> = None;
    egui::ComboBox::from_id_salt("program")
        .selected_text(current.as_deref().unwrap_or("—"))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for prog in &programs {
                if ui
                    .selectable_label(current.as_deref() == Some(prog.as_str()), prog)
                    .clicked()
                {
                    chosen = Some(prog.clone());
                }
            }
        });
    if let Some(prog) = chosen {
        state.select_program(&prog);
    }

    ui.add_space(8.0);
    ui.checkbox(
        &mut state.config.chart.average_duplicates,
        "Promediar licenciaturas repetidas",
    );
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Archivo", |ui: &mut Ui| {
            if ui.button("Recargar").clicked() {
                state.load();
                ui.close_menu();
            }
            let can_export = state.view.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Descargar gráfica…"))
                .clicked()
            {
                save_chart_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!(
            "{} filas · {}",
            state.table.len(),
            state.config.data_path.display()
        ));
    });
}

/// Render the notices of the latest interaction.
pub fn notices(ui: &mut Ui, state: &AppState) {
    for notice in &state.notices {
        let color = match notice.kind.severity() {
            Severity::Error => Color32::RED,
            Severity::Warning => Color32::from_rgb(230, 160, 0),
            Severity::Info => Color32::DARK_GREEN,
        };
        ui.label(RichText::new(&notice.message).color(color));
    }
}

// ---------------------------------------------------------------------------
// Save dialog
// ---------------------------------------------------------------------------

pub fn save_chart_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Descargar gráfica")
        .set_file_name(&state.config.export.file_name)
        .add_filter("PNG", &["png"])
        .save_file();

    if let Some(path) = file {
        state.save_png(&path);
    }
}
