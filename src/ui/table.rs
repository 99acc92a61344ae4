use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

/// Render the filtered rows, every source column included.
pub fn filtered_table(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        return;
    };
    let table = &state.table;

    ui.heading("Datos Filtrados");
    TableBuilder::new(ui)
        .id_salt("filtered_rows")
        .striped(true)
        .resizable(true)
        .max_scroll_height(180.0)
        .columns(Column::auto().at_least(60.0), table.column_names.len())
        .header(20.0, |mut header| {
            for name in &table.column_names {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|mut body| {
            for record in view.subset.records(table) {
                body.row(18.0, |mut row| {
                    for idx in 0..table.column_names.len() {
                        row.col(|ui| {
                            ui.label(record.get(idx));
                        });
                    }
                });
            }
        });
}
