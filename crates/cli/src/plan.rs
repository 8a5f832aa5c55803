use brief_protocol::PLAN_FILE;
use std::io::Write;
use std::path::Path;

const PLAN_SCAFFOLD: &str = "# PLAN\n\n## QUESTIONS\n\n## PROGRESS\n";

/// Append lines to the progress log, creating it with its scaffold on
/// first use. The log is append-only; nothing ever rewrites it.
pub fn append(root: &Path, lines: &[String]) -> std::io::Result<()> {
    let path = root.join(PLAN_FILE);
    if !path.exists() {
        std::fs::write(&path, PLAN_SCAFFOLD)?;
    }
    let mut file = std::fs::OpenOptions::new().append(true).open(&path)?;
    writeln!(file, "{}", lines.join("\n"))?;
    Ok(())
}
