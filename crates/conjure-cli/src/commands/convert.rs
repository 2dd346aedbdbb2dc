//! Convert command - write results for the edited questions.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use conjure::ResultsOptions;

pub fn run(
    file: PathBuf,
    edits: Option<PathBuf>,
    output: Option<PathBuf>,
    sample_size: Option<usize>,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = super::open_session(&file, edits.as_ref())?;

    let options = ResultsOptions {
        sample_size,
        seed: seed.unwrap_or_default(),
        ..ResultsOptions::default()
    };
    let results = session.to_results_with(&options)?;
    let json = serde_json::to_string_pretty(&results)?;

    match output {
        Some(path) => {
            fs::write(&path, json)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            eprintln!(
                "{} {} questions, {} respondents → {}",
                "Converted".green().bold(),
                results.survey().len(),
                results.len(),
                path.display().to_string().white()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, TempDir};

    #[test]
    fn test_convert_writes_results() {
        let mut data = Builder::new().suffix(".csv").tempfile().unwrap();
        data.write_all(b"Morning?,Notes\n1,fine\n2,ok\n3,\n").unwrap();
        data.flush().unwrap();

        let mut script = Builder::new().suffix(".json").tempfile().unwrap();
        script
            .write_all(br#"[{"op": "rename", "from": "morning", "to": "wake_up"}]"#)
            .unwrap();
        script.flush().unwrap();

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("results.json");
        run(
            data.path().to_path_buf(),
            Some(script.path().to_path_buf()),
            Some(out.clone()),
            Some(2),
            Some(1),
        )
        .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["responses"].as_array().unwrap().len(), 2);
        assert_eq!(written["survey"]["questions"][0]["name"], "wake_up");
    }

    #[test]
    fn test_convert_rejects_bad_script() {
        let mut data = Builder::new().suffix(".csv").tempfile().unwrap();
        data.write_all(b"q\n1\n").unwrap();
        data.flush().unwrap();

        let mut script = Builder::new().suffix(".json").tempfile().unwrap();
        script
            .write_all(br#"[{"op": "rename", "from": "missing", "to": "x"}]"#)
            .unwrap();
        script.flush().unwrap();

        let err = run(
            data.path().to_path_buf(),
            Some(script.path().to_path_buf()),
            None,
            None,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unknown question"));
    }
}
