use article_narrator::args::Args;
use article_narrator::error::CommandFailure;
use article_narrator::process::CommandRunner;
use article_narrator::tts::SpeechSynthesizer;
use article_narrator::{Config, Pipeline, PipelineError, SynthesisFailure};
use async_trait::async_trait;
use clap::Parser;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::{TempDir, tempdir};

/// Returns the request text as the audio payload; fails on one call.
struct FakeSynthesizer {
    calls: Arc<Mutex<Vec<String>>>,
    fail_on_call: Option<usize>,
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisFailure> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(text.to_string());
        if Some(calls.len()) == self.fail_on_call {
            return Err(SynthesisFailure::from_status(503, "overloaded".into()));
        }
        Ok(format!("[{}]", text).into_bytes())
    }
}

/// Emulates ffmpeg: concat appends the manifest's files in listed order,
/// rendering copies the audio into the video path.
struct FakeFfmpeg {
    invocations: Arc<Mutex<Vec<Vec<String>>>>,
}

impl CommandRunner for FakeFfmpeg {
    fn run(&self, _program: &str, args: &[String]) -> Result<(), CommandFailure> {
        self.invocations.lock().unwrap().push(args.to_vec());
        let output = args.last().unwrap();
        if args.iter().any(|a| a == "concat") {
            let manifest = &args[args.iter().position(|a| a == "-i").unwrap() + 1];
            let mut joined = Vec::new();
            for line in fs::read_to_string(manifest).unwrap().lines() {
                let path = line.trim_start_matches("file '").trim_end_matches('\'');
                joined.extend(fs::read(path).unwrap());
            }
            fs::write(output, joined).unwrap();
        } else {
            let audio = &args[args.iter().position(|a| a == "-i").unwrap() + 1];
            fs::write(output, fs::read(audio).unwrap()).unwrap();
        }
        Ok(())
    }
}

struct Harness {
    dir: TempDir,
    calls: Arc<Mutex<Vec<String>>>,
    invocations: Arc<Mutex<Vec<Vec<String>>>>,
}

impl Harness {
    fn new(markup: &str) -> Self {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("article.html"), markup).unwrap();
        Self {
            dir,
            calls: Arc::default(),
            invocations: Arc::default(),
        }
    }

    fn pipeline(&self, fail_on_call: Option<usize>, extra: &[&str]) -> Pipeline {
        let out_dir = self.dir.path().to_str().unwrap();
        let mut argv = vec!["article-narrator", "article.html", "--out-dir", out_dir];
        argv.extend_from_slice(extra);
        let config = Config::new(&Args::parse_from(argv), Some("test-key".into())).unwrap();
        Pipeline::new(
            config,
            Box::new(FakeSynthesizer {
                calls: self.calls.clone(),
                fail_on_call,
            }),
            Box::new(FakeFfmpeg {
                invocations: self.invocations.clone(),
            }),
        )
    }

    fn input(&self) -> std::path::PathBuf {
        self.dir.path().join("article.html")
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    fn files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

const FIVE_PARAGRAPHS: &str = r#"
<html><body>
  <h1>Test</h1>
  <p>a</p><p>b</p><p>c</p><p>d</p><p>e</p>
</body></html>
"#;

#[tokio::test]
async fn five_paragraphs_become_three_ordered_parts_and_a_video() {
    let harness = Harness::new(FIVE_PARAGRAPHS);

    let report = harness.pipeline(None, &[]).run(&harness.input()).await.unwrap();

    assert_eq!(*harness.calls.lock().unwrap(), vec!["a b", "c d", "e"]);
    assert_eq!(
        harness.files(),
        vec!["Test.mp3", "Test.mp4", "Test_1.mp3", "Test_2.mp3", "Test_3.mp3", "article.html"]
    );
    assert_eq!(fs::read(harness.path("Test.mp3")).unwrap(), b"[a b][c d][e]");
    assert_eq!(report.sanitized_title, "Test");
    assert_eq!(report.video, harness.path("Test.mp4"));
    assert_eq!(report.parts.len(), 3);
    assert_eq!(harness.invocations.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn markup_without_paragraphs_creates_nothing() {
    let harness = Harness::new("<h1>Nothing here</h1><div>no paragraphs</div>");

    let err = harness.pipeline(None, &[]).run(&harness.input()).await.unwrap_err();

    assert!(matches!(err, PipelineError::EmptyContent { .. }));
    assert_eq!(harness.files(), vec!["article.html"]);
    assert!(harness.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn synthesis_failure_on_second_batch_stops_the_run() {
    let harness = Harness::new(
        "<h1>Title</h1><p>one</p><p>two</p><p>three</p><p>four</p><p>five</p>",
    );

    let err = harness.pipeline(Some(2), &[]).run(&harness.input()).await.unwrap_err();

    match err {
        PipelineError::Synthesis { batch_index, cause } => {
            assert_eq!(batch_index, 2);
            assert!(matches!(cause, SynthesisFailure::Status { status: 503, .. }));
        }
        other => panic!("expected synthesis error, got {other:?}"),
    }
    assert_eq!(harness.files(), vec!["Title_1.mp3", "article.html"]);
    assert!(harness.invocations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rerun_with_resume_only_synthesizes_missing_parts() {
    let harness = Harness::new(
        "<h1>Title</h1><p>one</p><p>two</p><p>three</p><p>four</p><p>five</p>",
    );
    harness.pipeline(Some(2), &[]).run(&harness.input()).await.unwrap_err();
    harness.calls.lock().unwrap().clear();

    harness.pipeline(None, &["--resume"]).run(&harness.input()).await.unwrap();

    assert_eq!(*harness.calls.lock().unwrap(), vec!["three four", "five"]);
    assert_eq!(
        fs::read(harness.path("Title.mp3")).unwrap(),
        b"[one two][three four][five]"
    );
}

#[tokio::test]
async fn clean_parts_leaves_only_final_artifacts() {
    let harness = Harness::new(FIVE_PARAGRAPHS);

    harness
        .pipeline(None, &["--clean-parts"])
        .run(&harness.input())
        .await
        .unwrap();

    assert_eq!(harness.files(), vec!["Test.mp3", "Test.mp4", "article.html"]);
}

#[tokio::test]
async fn concurrent_synthesis_keeps_paragraph_order() {
    let harness = Harness::new(FIVE_PARAGRAPHS);

    harness
        .pipeline(None, &["--concurrency", "3", "--group-size", "1"])
        .run(&harness.input())
        .await
        .unwrap();

    assert_eq!(
        fs::read(harness.path("Test.mp3")).unwrap(),
        b"[a][b][c][d][e]"
    );
}

#[tokio::test]
async fn title_is_sanitized_for_every_artifact() {
    let harness = Harness::new("<h1>Hello, World!</h1><p>x</p>");

    let report = harness.pipeline(None, &[]).run(&harness.input()).await.unwrap();

    assert_eq!(report.title, "Hello, World!");
    assert!(Path::new(&harness.path("Hello__World__1.mp3")).exists());
    assert!(Path::new(&harness.path("Hello__World_.mp4")).exists());
}

#[tokio::test]
async fn missing_heading_uses_untitled() {
    let harness = Harness::new("<p>x</p>");

    let report = harness.pipeline(None, &[]).run(&harness.input()).await.unwrap();

    assert_eq!(report.video, harness.path("Untitled.mp4"));
}
