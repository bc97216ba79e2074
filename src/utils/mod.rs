use crate::process::CommandRunner;
use crate::TranscriptError;

/// Check that every required tool is on the search path.
///
/// All missing tools are reported together. Nothing is launched or written.
pub fn check_dependencies(
    runner: &dyn CommandRunner,
    tools: &[String],
) -> Result<(), TranscriptError> {
    let missing = missing_dependencies(runner, tools);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(TranscriptError::MissingDependencies(missing))
    }
}

/// Names of the tools that could not be located
pub fn missing_dependencies(runner: &dyn CommandRunner, tools: &[String]) -> Vec<String> {
    tools
        .iter()
        .filter(|tool| {
            let found = runner.locate(tool);
            if let Some(path) = &found {
                tracing::debug!("Found {} at {}", tool, path.display());
            }
            found.is_none()
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::MockCommandRunner;
    use std::path::PathBuf;

    fn tools() -> Vec<String> {
        vec!["yt-dlp".to_string(), "ffmpeg".to_string()]
    }

    #[test]
    fn test_all_dependencies_present() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_locate()
            .times(2)
            .returning(|program| Some(PathBuf::from("/usr/local/bin").join(program)));

        assert!(check_dependencies(&runner, &tools()).is_ok());
    }

    #[test]
    fn test_reports_every_missing_dependency() {
        let mut runner = MockCommandRunner::new();
        runner.expect_locate().returning(|_| None);

        match check_dependencies(&runner, &tools()) {
            Err(TranscriptError::MissingDependencies(names)) => {
                assert_eq!(names, tools());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_reports_only_the_missing_one() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_locate()
            .returning(|program| (program == "yt-dlp").then(|| PathBuf::from("/usr/bin/yt-dlp")));

        assert_eq!(missing_dependencies(&runner, &tools()), vec!["ffmpeg".to_string()]);
    }
}
