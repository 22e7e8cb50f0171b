use anyhow::Result;

use crate::config::Settings;
use crate::ui::summary;

/// Print the installed record. Works whether or not anything is installed.
pub fn run(settings: &Settings) -> Result<()> {
    let store = settings.state_store();
    let config = store.load()?;
    summary::print_status(config.as_ref());
    if config.is_some() {
        println!("Record:    {}", store.path().display());
    }
    Ok(())
}
