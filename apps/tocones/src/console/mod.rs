//! # Interactive Console
//!
//! Line-based driver for the screen flow. Each screen is printed, one line
//! of input is read and mapped to a flow action. Rejected actions are shown
//! as a message and the same screen is offered again; the loop only ends on
//! `0`/`salir` at the menu or when input is closed.
//!
//! ## Commands
//!
//! | Screen      | Input                                                       |
//! |-------------|-------------------------------------------------------------|
//! | Menu        | `1`-`4`, `0`/`salir`                                        |
//! | Header      | `<n>=<valor>`, `supervisor 2`, `personal`, `edad`,          |
//! |             | `firma evaluador 10,10 40,30`, `borrar evaluador`,          |
//! |             | `guardar`, `volver`                                         |
//! | StumpIndex  | `1`-`12`, `exportar`, `volver`                              |
//! | StumpForm   | `<n>=<valor>`, `calcular`, `guardar`, `volver`              |
//! | Export      | `abrir`, `qr`, `cerrar`                                     |
//!
//! A `firma` command draws one stroke; repeat it to add more strokes.

mod render;

use crate::platform::Platform;
use std::io::{BufRead, Write};
use tocones_core::{
    Exporter, FlowController, HeaderField, MenuOption, PersonnelRole, Point, Roster, Screen,
    Session, Signer, StumpField, StumpIndex, ToconesError,
};

/// Outcome of one input line.
enum Step {
    Continue,
    Unrecognized,
    Quit,
}

/// The interactive front end over any line reader and writer.
pub struct Console<R, W, P> {
    input: R,
    output: W,
    platform: P,
    session: Session,
    flow: FlowController,
}

fn io_error(e: std::io::Error) -> ToconesError {
    ToconesError::IoError(format!("Console: {}", e))
}

/// Parse `<n>=<value>` into a 0-based slot and the trimmed value.
fn parse_assignment(line: &str) -> Option<(usize, &str)> {
    let (slot, value) = line.split_once('=')?;
    let slot: usize = slot.trim().parse().ok()?;
    Some((slot.checked_sub(1)?, value.trim()))
}

fn parse_point(token: &str) -> Result<Point, ToconesError> {
    let invalid = || ToconesError::InvalidNumericInput {
        field: "firma",
        value: token.to_string(),
    };
    let (x, y) = token.split_once(',').ok_or_else(invalid)?;
    let x: f32 = x.trim().parse().map_err(|_| invalid())?;
    let y: f32 = y.trim().parse().map_err(|_| invalid())?;
    if x.is_finite() && y.is_finite() {
        Ok(Point::new(x, y))
    } else {
        Err(invalid())
    }
}

fn signer_named(name: &str) -> Option<Signer> {
    match name {
        "evaluador" => Some(Signer::Evaluator),
        "motosierrista" => Some(Signer::ChainsawOperator),
        _ => None,
    }
}

fn role_named(name: &str) -> Option<PersonnelRole> {
    match name {
        "supervisor" => Some(PersonnelRole::Supervisor),
        "evaluador" => Some(PersonnelRole::Evaluator),
        "motosierrista" => Some(PersonnelRole::ChainsawOperator),
        _ => None,
    }
}

/// User-facing text for a rejected action.
fn message(error: &ToconesError) -> String {
    match error {
        ToconesError::ModuleUnavailable(_) => "Funcionalidad no disponible aún".to_string(),
        ToconesError::IncompleteSession(index) => format!("Faltan datos del {}", index.label()),
        ToconesError::InvalidDateFormat(raw) => {
            format!("Formato de fecha inválido: '{}'. Use dd/mm/aaaa", raw)
        }
        ToconesError::InvalidNumericInput { field, value } => format!(
            "Por favor ingrese valores numéricos válidos ({}: '{}')",
            field, value
        ),
        ToconesError::ExportIoError(detail) => format!("Error al guardar: {}", detail),
        other => other.to_string(),
    }
}

impl<R: BufRead, W: Write, P: Platform> Console<R, W, P> {
    /// Console starting at the main menu with an empty session.
    pub fn new(input: R, output: W, platform: P, roster: Roster) -> Self {
        Self {
            input,
            output,
            platform,
            session: Session::new(roster),
            flow: FlowController::new(),
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.flow.screen()
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Give back the output writer.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user quits or input ends.
    pub fn run(&mut self) -> Result<(), ToconesError> {
        tracing::info!("Console started");
        loop {
            let lines = render::screen(&self.flow, &self.session);
            self.say(&lines.join("\n"))?;
            self.prompt()?;

            let Some(line) = self.read_line()? else {
                tracing::debug!("Input closed");
                return Ok(());
            };
            match self.handle(line.trim()) {
                Ok(Step::Continue) => {}
                Ok(Step::Unrecognized) => {
                    self.say(&format!("[!] Comando no reconocido: '{}'", line.trim()))?;
                }
                Ok(Step::Quit) => {
                    tracing::info!("Console closed");
                    return Ok(());
                }
                Err(e) => self.alert(&e)?,
            }
        }
    }

    // =========================================================================
    // I/O
    // =========================================================================

    fn say(&mut self, text: &str) -> Result<(), ToconesError> {
        writeln!(self.output, "{}", text).map_err(io_error)
    }

    fn prompt(&mut self) -> Result<(), ToconesError> {
        write!(self.output, "> ").map_err(io_error)?;
        self.output.flush().map_err(io_error)
    }

    fn read_line(&mut self) -> Result<Option<String>, ToconesError> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(io_error)?;
        Ok((read > 0).then_some(line))
    }

    fn alert(&mut self, error: &ToconesError) -> Result<(), ToconesError> {
        tracing::warn!(screen = %self.flow.screen(), error = %error, "Action rejected");
        self.say(&format!("[!] {}", message(error)))
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    fn handle(&mut self, line: &str) -> Result<Step, ToconesError> {
        if line.is_empty() {
            return Ok(Step::Continue);
        }
        match self.flow.screen() {
            Screen::Menu => self.handle_menu(line),
            Screen::Header => self.handle_header(line),
            Screen::StumpIndex => self.handle_stump_index(line),
            Screen::StumpForm(_) => self.handle_stump_form(line),
            Screen::ExportResult => self.handle_export_result(line),
        }
    }

    fn handle_menu(&mut self, line: &str) -> Result<Step, ToconesError> {
        if matches!(line, "0" | "salir") {
            return Ok(Step::Quit);
        }
        let option = line
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| MenuOption::ALL.get(i).copied());
        let Some(option) = option else {
            return Ok(Step::Unrecognized);
        };
        self.flow.select_menu(&mut self.session, option)?;
        tracing::info!("New evaluation started");
        Ok(Step::Continue)
    }

    fn handle_header(&mut self, line: &str) -> Result<Step, ToconesError> {
        if let Some((slot, value)) = parse_assignment(line) {
            let Some(field) = HeaderField::ALL.get(slot).copied() else {
                return Ok(Step::Unrecognized);
            };
            self.flow.header_form_mut()?.set_field(field, value);
            return Ok(Step::Continue);
        }

        let (command, rest) = line
            .split_once(' ')
            .map_or((line, ""), |(c, r)| (c, r.trim()));
        match command {
            "supervisor" | "evaluador" | "motosierrista" => {
                let (Some(role), Ok(position)) = (role_named(command), rest.parse::<usize>())
                else {
                    return Ok(Step::Unrecognized);
                };
                let name = self
                    .flow
                    .select_personnel(&self.session, role, position)?
                    .to_string();
                self.say(&format!("{}: {}", role, name))?;
            }
            "personal" => {
                let lines = render::roster(&self.session);
                self.say(&lines.join("\n"))?;
            }
            "edad" => {
                let age = self.flow.compute_age()?;
                self.say(&format!("Edad: {} años", age))?;
            }
            "firma" => {
                let (who, points) = rest.split_once(' ').unwrap_or((rest, ""));
                let Some(signer) = signer_named(who) else {
                    return Ok(Step::Unrecognized);
                };
                let points = points
                    .split_whitespace()
                    .map(parse_point)
                    .collect::<Result<Vec<_>, _>>()?;
                let Some((first, tail)) = points.split_first() else {
                    return Ok(Step::Unrecognized);
                };
                let pad = self.flow.signature_pad(&mut self.session, signer)?;
                pad.begin_stroke(*first);
                for point in tail {
                    pad.extend_stroke(*point);
                }
            }
            "borrar" => {
                let Some(signer) = signer_named(rest) else {
                    return Ok(Step::Unrecognized);
                };
                self.flow.signature_pad(&mut self.session, signer)?.clear();
            }
            "guardar" => {
                self.flow.save_header(&mut self.session)?;
                tracing::info!("Header saved");
            }
            "volver" => {
                self.flow.back(&mut self.session)?;
            }
            _ => return Ok(Step::Unrecognized),
        }
        Ok(Step::Continue)
    }

    fn handle_stump_index(&mut self, line: &str) -> Result<Step, ToconesError> {
        match line {
            "exportar" => self.export()?,
            "volver" => {
                self.flow.back(&mut self.session)?;
            }
            _ => {
                let Ok(number) = line.parse::<usize>() else {
                    return Ok(Step::Unrecognized);
                };
                let index = StumpIndex::new(number)?;
                self.flow.open_stump(&self.session, index)?;
            }
        }
        Ok(Step::Continue)
    }

    fn handle_stump_form(&mut self, line: &str) -> Result<Step, ToconesError> {
        if let Some((slot, value)) = parse_assignment(line) {
            let Some(field) = StumpField::ALL.get(slot).copied() else {
                return Ok(Step::Unrecognized);
            };
            self.flow.stump_form_mut()?.1.set_field(field, value);
            return Ok(Step::Continue);
        }

        match line {
            "calcular" => {
                self.flow.calculate_ratios()?;
            }
            "guardar" => {
                let index = self.flow.save_stump(&mut self.session)?;
                tracing::info!(stump = index.get(), "Stump saved");
                self.say(&format!("Datos del {} guardados", index.label()))?;
            }
            "volver" => {
                self.flow.back(&mut self.session)?;
            }
            _ => return Ok(Step::Unrecognized),
        }
        Ok(Step::Continue)
    }

    fn handle_export_result(&mut self, line: &str) -> Result<Step, ToconesError> {
        let report = self.flow.last_export().cloned();
        match (line, report) {
            ("abrir", Some(report)) => self.platform.offer_file(&report.spreadsheet_path)?,
            ("qr", Some(report)) => self.platform.offer_file(&report.qr_path)?,
            ("cerrar", _) => self.flow.close_export(&mut self.session)?,
            _ => return Ok(Step::Unrecognized),
        }
        Ok(Step::Continue)
    }

    fn export(&mut self) -> Result<(), ToconesError> {
        // Report a missing stump before touching the filesystem.
        if let Some(missing) = self.session.first_missing() {
            return Err(ToconesError::IncompleteSession(missing));
        }
        let exporter = Exporter::new(self.platform.resolve_output_dir()?);
        let timestamp = chrono::Local::now().naive_local();
        let report = self.flow.export(&self.session, &exporter, timestamp)?;
        tracing::info!(
            file = %report.spreadsheet_path.display(),
            qr = %report.qr_path.display(),
            rows = report.rows,
            "Evaluation exported"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_are_one_based() {
        assert_eq!(parse_assignment("1=Lote A"), Some((0, "Lote A")));
        assert_eq!(parse_assignment(" 5 = 01/01/2022 "), Some((4, "01/01/2022")));
        assert_eq!(parse_assignment("0=x"), None);
        assert_eq!(parse_assignment("guardar"), None);
    }

    #[test]
    fn points_parse_as_pairs() {
        assert_eq!(parse_point("10,20.5").ok(), Some(Point::new(10.0, 20.5)));
        assert!(matches!(
            parse_point("10;20"),
            Err(ToconesError::InvalidNumericInput { field: "firma", .. })
        ));
        assert!(parse_point("inf,1").is_err());
    }

    #[test]
    fn messages_use_form_wording() {
        let missing = StumpIndex::new(8).map(ToconesError::IncompleteSession);
        assert_eq!(
            missing.map(|e| message(&e)).ok(),
            Some("Faltan datos del Tocón 8".to_string())
        );
        assert_eq!(
            message(&ToconesError::ModuleUnavailable("CORREDORES".to_string())),
            "Funcionalidad no disponible aún"
        );
    }
}
