//! Interactive entry selection.

use std::io::{self, IsTerminal};

use dialoguer::theme::ColorfulTheme;
use dialoguer::FuzzySelect;

use crate::error::{Error, Result};

/// Ask the user to pick one of `names`.
///
/// Returns `None` when the prompt is dismissed with Esc or `q`.
pub fn prompt(names: &[String]) -> Result<Option<String>> {
    if !io::stdin().is_terminal() {
        return Err(Error::Other(
            "no entry given and stdin is not a terminal".to_string(),
        ));
    }

    let choice = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Entry")
        .items(names)
        .default(0)
        .interact_opt()?;

    Ok(choice.map(|i| names[i].clone()))
}
