//! Screen text for the console front end.

use tocones_core::flow::PERSONNEL_PLACEHOLDER;
use tocones_core::primitives::{SIGNATURE_CAPTURED, SIGNATURE_MISSING};
use tocones_core::{
    ExportReport, FlowController, HeaderField, MenuOption, PersonnelRole, Screen, Session, Signer,
    StumpField, StumpIndex,
};

/// Lines describing the current screen.
pub fn screen(flow: &FlowController, session: &Session) -> Vec<String> {
    match flow.screen() {
        Screen::Menu => menu(),
        Screen::Header => header(flow, session),
        Screen::StumpIndex => stump_index(session),
        Screen::StumpForm(index) => stump_form(flow, index),
        Screen::ExportResult => flow.last_export().map(export_result).unwrap_or_default(),
    }
}

fn menu() -> Vec<String> {
    let mut lines = vec![String::new(), "=== SUPERVISORES ===".to_string()];
    for (n, option) in MenuOption::ALL.iter().enumerate() {
        lines.push(format!("{}. {}", n + 1, option.label()));
    }
    lines.push("0. Salir".to_string());
    lines
}

fn header(flow: &FlowController, session: &Session) -> Vec<String> {
    let mut lines = vec![String::new(), "=== ENCABEZADO ===".to_string()];
    let Ok(form) = flow.header_form() else {
        return lines;
    };

    for (n, field) in HeaderField::ALL.iter().enumerate() {
        lines.push(format!("{}. {}: {}", n + 1, field.label(), form.field(*field)));
    }
    lines.push(format!(
        "Edad: {}",
        form.age().map_or_else(|| "-".to_string(), |a| format!("{} años", a))
    ));
    for role in [
        PersonnelRole::Supervisor,
        PersonnelRole::Evaluator,
        PersonnelRole::ChainsawOperator,
    ] {
        lines.push(format!(
            "{}: {}",
            role,
            form.selection(role).unwrap_or(PERSONNEL_PLACEHOLDER)
        ));
    }
    for signer in [Signer::Evaluator, Signer::ChainsawOperator] {
        let marker = if session.signatures().pad(signer).is_empty() {
            SIGNATURE_MISSING
        } else {
            SIGNATURE_CAPTURED
        };
        lines.push(format!("{}: {}", signer.title(), marker));
    }
    lines.push(
        "Comandos: <n>=<valor> | supervisor|evaluador|motosierrista <n> | personal | edad"
            .to_string(),
    );
    lines.push(
        "          firma evaluador|motosierrista x,y x,y ... | borrar evaluador|motosierrista"
            .to_string(),
    );
    lines.push("          guardar | volver".to_string());
    lines
}

/// Numbered roster lists for the personnel pickers.
pub fn roster(session: &Session) -> Vec<String> {
    let mut lines = Vec::new();
    for role in [
        PersonnelRole::Supervisor,
        PersonnelRole::Evaluator,
        PersonnelRole::ChainsawOperator,
    ] {
        lines.push(format!("{}:", role));
        for (n, name) in session.roster().names(role).iter().enumerate() {
            lines.push(format!("  {}. {}", n + 1, name));
        }
    }
    lines
}

fn stump_index(session: &Session) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("=== TOCONES ({}/12 guardados) ===", session.saved_count()),
    ];
    for (index, record) in session.stumps() {
        let state = if record.is_some() { "guardado" } else { "vacío" };
        lines.push(format!("{:>2}. {} [{}]", index.get(), index.label(), state));
    }
    lines.push("Comandos: <1-12> | exportar | volver".to_string());
    lines
}

fn stump_form(flow: &FlowController, index: StumpIndex) -> Vec<String> {
    let mut lines = vec![String::new(), format!("=== {} ===", index.label().to_uppercase())];
    let Ok((_, form)) = flow.stump_form() else {
        return lines;
    };

    for (n, field) in StumpField::ALL.iter().enumerate() {
        lines.push(format!("{}. {}: {}", n + 1, field.label(), form.field(*field)));
    }
    match form.ratios() {
        Some(ratios) => {
            lines.push(format!("CT/d*100: {}", ratios.ct));
            lines.push(format!("CD/d*100: {}", ratios.cd));
            lines.push(format!("AB/d*100: {}", ratios.ab));
        }
        None => lines.push("Ratios: -".to_string()),
    }
    lines.push("Comandos: <n>=<valor> | calcular | guardar | volver".to_string());
    lines
}

fn export_result(report: &ExportReport) -> Vec<String> {
    vec![
        String::new(),
        "=== OPERACIÓN EXITOSA ===".to_string(),
        format!("Excel: {}", report.spreadsheet_path.display()),
        format!("QR: {}", report.qr_path.display()),
        format!("Filas: {}", report.rows),
        String::new(),
        report.summary.clone(),
        String::new(),
        "Comandos: abrir | qr | cerrar".to_string(),
    ]
}
