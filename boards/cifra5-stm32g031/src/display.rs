//! Status output over RTT
//!
//! The clock has no panel of its own yet; every UI change is written to
//! the defmt log in the form a four-digit display would show it.

use cifra_core::ui::{Editor, EditorKind, UiController, UiMode};
use cifra_core::{ErrorPhase, SyncPhase};
use defmt::{info, warn};

pub fn render(ui: &UiController) {
    if !ui.display_on() {
        info!("display: off");
        return;
    }
    match ui.mode() {
        UiMode::Normal => match ui.last_error() {
            Some(phase) => warn!("display: ---- (last error {})", error_code(phase)),
            None => info!("display: time"),
        },
        UiMode::ManualSet(editor) => show_editor("set", &editor),
        UiMode::ForcedSetup(editor) => show_editor("setup", &editor),
        UiMode::Syncing(phase) => info!("display: SYNC {}", sync_step(phase)),
        UiMode::Error(phase) => warn!("display: Err {}", error_code(phase)),
    }
}

fn show_editor(label: &str, editor: &Editor) {
    let [a, b, c, d] = editor.digits();
    let cursor = editor.cursor();
    match editor.kind() {
        EditorKind::Time => info!("display: {} {}{}:{}{} cursor {}", label, a, b, c, d, cursor),
        EditorKind::SilentHours => {
            info!("display: {} {}{}-{}{} cursor {}", label, a, b, c, d, cursor)
        }
        EditorKind::Calibration => {
            let sign = if a == 1 { "-" } else { "+" };
            info!("display: {} {}{}{}{} cursor {}", label, sign, b, c, d, cursor)
        }
    }
}

fn sync_step(phase: SyncPhase) -> u8 {
    match phase {
        SyncPhase::Start => 1,
        SyncPhase::SourceHour => 2,
        SyncPhase::SourceDay => 3,
        SyncPhase::SetHour => 4,
        SyncPhase::SetMinute => 5,
        SyncPhase::End => 6,
    }
}

fn error_code(phase: ErrorPhase) -> u16 {
    cifra_core::DisplayEvent::Error(phase).code()
}
