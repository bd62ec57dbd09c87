use crate::cmd::Workspace;
use crate::data::persistence::get_data_dir;
use crate::ui::calendar_view::{App, run_app};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::Local;
use std::path::Path;

pub fn run(plan_override: Option<&Path>) -> Result<()> {
    let ws = Workspace::load(plan_override)?;
    crate::logging::init_file(&get_data_dir()?.join(&ws.settings.log_file))?;
    tracing::info!(plan = %ws.plan_path.display(), view = ?ws.settings.default_view, "starting calendar");

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    let today = Local::now().date_naive();
    let mut app = App::new(&ws.plan, ws.plan_path, ws.settings.default_view, today);

    let listeners = app.listener_registry();
    let result = run_app(&mut terminal, &mut app);

    // Release any open overlay before the terminal goes away.
    drop(app);
    restore_terminal(&mut terminal)?;
    tracing::info!(listeners = listeners.active(), "calendar closed");

    result
}
