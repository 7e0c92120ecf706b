use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn pipeline_log_path(state_root: &Path) -> PathBuf {
    state_root.join("logs/pipeline.log")
}

pub fn append_pipeline_log_line(state_root: &Path, line: &str) -> std::io::Result<()> {
    let path = pipeline_log_path(state_root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    writeln!(file, "{line}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_one_line_per_call() {
        let temp = tempfile::tempdir().expect("tempdir");
        append_pipeline_log_line(temp.path(), "pipeline=alpha step=1/2").expect("append first");
        append_pipeline_log_line(temp.path(), "pipeline=alpha step=2/2").expect("append second");

        let body = fs::read_to_string(pipeline_log_path(temp.path())).expect("read log");
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(
            lines,
            vec!["pipeline=alpha step=1/2", "pipeline=alpha step=2/2"]
        );
    }
}
