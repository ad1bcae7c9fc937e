use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use std::io::stdout;

pub const DEFAULT_WIDTH: usize = 80;
const MAX_WIDTH: usize = 100;

/// Text width for wrapped output, capped so long explanations stay readable.
pub fn text_width() -> usize {
    match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 0 => (cols as usize).saturating_sub(2).clamp(20, MAX_WIDTH),
        _ => DEFAULT_WIDTH,
    }
}

pub fn clear_screen() -> Result<()> {
    execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    Ok(())
}

/// Puts the terminal back in cooked mode if anything left it raw.
pub fn restore() -> Result<()> {
    if crossterm::terminal::is_raw_mode_enabled()? {
        crossterm::terminal::disable_raw_mode()?;
    }
    execute!(stdout(), crossterm::cursor::Show)?;
    Ok(())
}
