/*!
 * End-to-end controller tests with a mock media backend
 */

use anyhow::Result;
use reelcut::app_config::Config;
use reelcut::app_controller::Controller;
use reelcut::lesson_segmenter::LessonSpec;
use reelcut::media::mock::MockMediaTool;
use crate::common;

fn controller_with(tool: MockMediaTool) -> Result<Controller> {
    Controller::with_tool(Config::default(), Box::new(tool))
}

#[tokio::test]
async fn test_createReels_withSampleCaptions_shouldWriteOneClip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_captioned_video(temp_dir.path(), "talk.mp4", common::SAMPLE_CAPTIONS)?;
    let controller = controller_with(MockMediaTool::working())?;

    let report = controller.create_reels(&video, Some(3.0), Some(60.0)).await?;

    assert_eq!(report.clips_folder, temp_dir.path().join("talk_reels"));
    assert_eq!(report.skipped, 0);
    assert_eq!(report.clips.len(), 1);

    let clip = &report.clips[0];
    assert_eq!(clip.filename, "clip_01_0s.mp4");
    assert_eq!(clip.start, 0.0);
    assert_eq!(clip.duration, 5.0);
    assert_eq!(clip.excerpt, "dica incrível de hoje voce sabia que isso funciona?");
    assert!(clip.path.is_file());

    Ok(())
}

#[tokio::test]
async fn test_createReels_withDefaultBounds_shouldReportNoHighlights() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_captioned_video(temp_dir.path(), "talk.mp4", common::SAMPLE_CAPTIONS)?;
    let controller = controller_with(MockMediaTool::working())?;

    // The only group lasts five seconds, below the 15 second default
    let result = controller.create_reels(&video, None, None).await;
    assert!(result.is_err());
    assert!(!temp_dir.path().join("talk_reels").exists());

    Ok(())
}

#[tokio::test]
async fn test_createReels_withInvertedBounds_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_captioned_video(temp_dir.path(), "talk.mp4", common::SAMPLE_CAPTIONS)?;
    let controller = controller_with(MockMediaTool::working())?;

    assert!(controller.create_reels(&video, Some(30.0), Some(10.0)).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_createReels_withoutCaptions_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_test_file(temp_dir.path(), "silent.mp4", "x")?;
    let controller = controller_with(MockMediaTool::working())?;

    let err = controller.create_reels(&video, Some(3.0), None).await.unwrap_err();
    assert!(err.to_string().contains("No caption file"));

    Ok(())
}

#[tokio::test]
async fn test_createReels_withUnsupportedMedia_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_captioned_video(temp_dir.path(), "talk.txt", common::SAMPLE_CAPTIONS)?;
    let tool = MockMediaTool::working();
    let controller = controller_with(tool)?;

    assert!(controller.create_reels(&video, Some(3.0), None).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_createReels_withEveryCutFailing_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_captioned_video(temp_dir.path(), "talk.mp4", common::SAMPLE_CAPTIONS)?;
    let controller = controller_with(MockMediaTool::failing())?;

    assert!(controller.create_reels(&video, Some(3.0), None).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_createReels_withOneCutFailing_shouldCountItAsSkipped() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let captions = "WEBVTT

00:00:00.000 --> 00:00:02.000
dica incrível de hoje

00:00:02.000 --> 00:00:05.000
voce sabia que isso funciona?

00:00:05.000 --> 00:00:20.000
texto comum sem palavras chave

00:00:20.000 --> 00:00:24.000
outra dica valiosa

00:00:24.000 --> 00:00:28.000
o segredo do sucesso
";
    let video = common::create_captioned_video(temp_dir.path(), "talk.mp4", captions)?;
    let controller = controller_with(MockMediaTool::failing_on(&[1]))?;

    let report = controller.create_reels(&video, Some(3.0), Some(60.0)).await?;

    assert_eq!(report.skipped, 1);
    assert_eq!(report.clips.len(), 1);
    assert_eq!(report.clips[0].sequence, 2);

    Ok(())
}

#[tokio::test]
async fn test_createLessons_shouldWriteIntoLessonsFolder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_test_file(temp_dir.path(), "course.mkv", "x")?;
    let controller = controller_with(MockMediaTool::working())?;

    let specs = vec![
        LessonSpec::new("Intro", "0", "1:30"),
        LessonSpec::new("Deep dive", "1:30", "10:00"),
    ];
    let report = controller.create_lessons(&video, &specs).await?;

    assert_eq!(report.lessons_folder, temp_dir.path().join("assuntos"));
    assert_eq!(report.created.len(), 2);
    assert_eq!(
        common::file_names(&report.lessons_folder)?,
        vec!["01 - Intro.mkv", "02 - Deep dive.mkv"]
    );

    let again = controller
        .create_lessons(&video, &[LessonSpec::new("Extra", "10:00", "12:00")])
        .await?;
    assert_eq!(again.created[0].filename, "03 - Extra.mkv");

    Ok(())
}

#[tokio::test]
async fn test_timeline_shouldListSegmentsAndDuration() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_captioned_video(temp_dir.path(), "talk.webm", common::SAMPLE_CAPTIONS)?;
    let controller = controller_with(MockMediaTool::working())?;

    let timeline = controller.timeline(&video).await?;

    assert_eq!(timeline.caption_file, temp_dir.path().join("talk.pt.vtt"));
    assert_eq!(timeline.duration, Some(120.0));
    assert_eq!(timeline.segments.len(), 3);
    assert_eq!(timeline.segments[0].start, "00:00");
    assert_eq!(timeline.segments[0].end, "00:02");
    assert_eq!(timeline.segments[2].end_seconds, 20.0);

    Ok(())
}

#[test]
fn test_timeline_withFailingProbe_shouldOmitDuration() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_captioned_video(temp_dir.path(), "talk.mp4", common::SAMPLE_CAPTIONS)?;
    let controller = controller_with(MockMediaTool::failing())?;

    let timeline = tokio_test::block_on(async { controller.timeline(&video).await })?;
    assert_eq!(timeline.duration, None);
    assert_eq!(timeline.segments.len(), 3);

    Ok(())
}

#[test]
fn test_withTool_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.highlight.max_candidates = 0;
    assert!(Controller::with_tool(config, Box::new(MockMediaTool::working())).is_err());
}
