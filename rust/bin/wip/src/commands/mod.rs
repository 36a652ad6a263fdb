pub mod archives;
pub mod context;
pub mod import;
pub mod notes;
pub mod orders;
pub mod pdf;

use std::io::{BufRead, Write};

/// Ask a yes/no question on stderr. Anything but `y` means no.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    eprint!("{} [y/N]: ", question);
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
