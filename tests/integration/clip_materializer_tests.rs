/*!
 * Clip materialization tests using the mock media tool
 */

use std::fs;
use anyhow::Result;
use reelcut::clip_materializer::{ClipMaterializer, ClipWindow, MaterializeMode};
use reelcut::errors::ClipError;
use reelcut::highlight::HighlightDetector;
use reelcut::media::mock::MockMediaTool;
use crate::common;

fn three_windows() -> Vec<ClipWindow> {
    vec![
        ClipWindow::new(0.0, 20.0, "first window"),
        ClipWindow::new(42.7, 15.0, "second window"),
        ClipWindow::new(125.2, 30.0, "third window"),
    ]
}

#[tokio::test]
async fn test_materialize_highlightMode_withSecondFailing_shouldReturnFirstAndThird() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "talk.mp4", "x")?;
    let destination = temp_dir.path().join("talk_reels");
    let tool = MockMediaTool::failing_on(&[2]);

    let batch = ClipMaterializer::new(&tool)
        .materialize(&source, &three_windows(), &destination, MaterializeMode::Highlight)
        .await?;

    let names: Vec<&str> = batch.clips.iter().map(|c| c.filename.as_str()).collect();
    assert_eq!(names, vec!["clip_01_0s.mp4", "clip_03_125s.mp4"]);
    assert_eq!(batch.clips[1].sequence, 3);
    assert_eq!(batch.clips[1].excerpt, "third window");

    assert!(batch.is_partial());
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].index, 2);
    assert!(matches!(batch.failures[0].error, ClipError::ExternalToolFailure { .. }));

    assert_eq!(tool.cut_count(), 3);
    assert_eq!(common::file_names(&destination)?, vec!["clip_01_0s.mp4", "clip_03_125s.mp4"]);

    Ok(())
}

#[tokio::test]
async fn test_materialize_lessonMode_withSecondFailing_shouldStopAndKeepFirst() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "course.mkv", "x")?;
    let destination = temp_dir.path().join("assuntos");
    let tool = MockMediaTool::failing_on(&[2]);

    let result = ClipMaterializer::new(&tool)
        .materialize(&source, &three_windows(), &destination, MaterializeMode::Lesson { first_sequence: 5 })
        .await;

    match result {
        Err(ClipError::LessonAborted { sequence, title, completed, .. }) => {
            assert_eq!(sequence, 6);
            assert_eq!(title, "second window");
            assert_eq!(completed, 1);
        }
        other => panic!("expected LessonAborted, got {:?}", other),
    }

    assert_eq!(tool.cut_count(), 2);
    assert_eq!(common::file_names(&destination)?, vec!["05 - first window.mkv"]);

    Ok(())
}

#[tokio::test]
async fn test_materialize_shouldCreateDestinationAndPassWindows() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "talk.webm", "x")?;
    let destination = temp_dir.path().join("deep").join("reels");
    let tool = MockMediaTool::working();

    let batch = ClipMaterializer::new(&tool)
        .materialize(&source, &three_windows(), &destination, MaterializeMode::Highlight)
        .await?;

    assert!(destination.is_dir());
    assert!(!batch.is_partial());
    assert_eq!(batch.clips.len(), 3);

    let requests = tool.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].source, source);
    assert_eq!(requests[1].start, 42.7);
    assert_eq!(requests[1].duration, 15.0);
    assert_eq!(requests[1].output, destination.join("clip_02_42s.webm"));

    Ok(())
}

#[tokio::test]
async fn test_materialize_highlightMode_withAllFailing_shouldReturnEmptyBatch() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "talk.mp4", "x")?;
    let tool = MockMediaTool::failing();

    let batch = ClipMaterializer::new(&tool)
        .materialize(&source, &three_windows(), temp_dir.path(), MaterializeMode::Highlight)
        .await?;

    assert!(batch.clips.is_empty());
    assert_eq!(batch.failures.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_materialize_detectedCandidates_shouldShortenLongExcerpts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "talk.mp4", "x")?;
    let tool = MockMediaTool::working();

    let mut segments = common::sample_segments();
    segments[0].text = format!("dica {}", "muito longa ".repeat(20));
    let candidates = HighlightDetector::default().detect(&segments, 3.0, 60.0);
    let windows: Vec<ClipWindow> = candidates.iter().map(ClipWindow::from).collect();

    let batch = ClipMaterializer::new(&tool)
        .with_excerpt_chars(40)
        .materialize(&source, &windows, &temp_dir.path().join("out"), MaterializeMode::Highlight)
        .await?;

    assert_eq!(batch.clips.len(), 1);
    assert_eq!(batch.clips[0].excerpt.chars().count(), 43);
    assert!(batch.clips[0].excerpt.starts_with("dica muito longa"));

    Ok(())
}

#[tokio::test]
async fn test_materialize_lessonMode_withExistingOutput_shouldAbortWithoutOverwriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "course.mp4", "x")?;
    let destination = temp_dir.path().join("assuntos");
    let existing = common::create_test_file(temp_dir.path(), "assuntos/01 - first window.mp4", "ORIGINAL")?;
    let tool = MockMediaTool::working();

    let result = ClipMaterializer::new(&tool)
        .materialize(&source, &three_windows(), &destination, MaterializeMode::Lesson { first_sequence: 1 })
        .await;

    let err = result.expect_err("existing lesson must not be replaced");
    assert!(matches!(err, ClipError::LessonAborted { sequence: 1, completed: 0, .. }));
    assert!(matches!(err.root_cause(), ClipError::OutputExists { .. }));
    assert_eq!(tool.cut_count(), 0);
    assert_eq!(fs::read_to_string(&existing)?, "ORIGINAL");

    Ok(())
}
