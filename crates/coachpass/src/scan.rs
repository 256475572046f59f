//! Scanning sessions: a cancellable sequence of decode attempts.
//!
//! A [`FrameSource`] hands the session candidate text extracted from
//! scanned frames; the session tries to decode each candidate into an
//! [`AssignmentPayload`] and stops at the first success, when the source is
//! exhausted, or when the caller cancels. Decode failures are logged and
//! scanning continues; they never end the session.
//!
//! The session owns its source, so whatever the source acquired (a camera,
//! open files) is released when the session is dropped, on success and on
//! cancellation alike.

use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::qr;
use crate::record::AssignmentPayload;

/// A source of scanned frames.
///
/// Implementors wrap whatever actually looks at the world (a camera feed, a
/// directory of images) and yield the raw text extracted from each frame.
/// Frames that contain no readable code should be reported as
/// [`Error::Decode`] so the session keeps scanning.
#[async_trait]
pub trait FrameSource: Send {
    /// The name of this frame source (for logging).
    fn name(&self) -> &'static str;

    /// Produce the text of the next frame.
    ///
    /// Returns `Ok(None)` when the source has no more frames.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for an unreadable frame (the session
    /// continues) or any other error to end the session.
    async fn next_frame(&mut self) -> Result<Option<String>>;
}

/// A scanning session over a frame source.
#[derive(Debug)]
pub struct ScanSession<S: FrameSource> {
    source: S,
    attempts: usize,
}

impl<S: FrameSource> ScanSession<S> {
    /// Start a session over the given source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            attempts: 0,
        }
    }

    /// Number of decode attempts made so far.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Pull one frame and attempt to decode it.
    ///
    /// Returns `None` when the source is exhausted; otherwise one decode
    /// attempt, successful or not.
    pub async fn next_attempt(&mut self) -> Option<Result<AssignmentPayload>> {
        match self.source.next_frame().await {
            Ok(Some(text)) => {
                self.attempts += 1;
                Some(qr::decode(&text))
            }
            Ok(None) => None,
            Err(e) => {
                self.attempts += 1;
                Some(Err(e))
            }
        }
    }

    /// Run until the first successful decode, source exhaustion, or
    /// cancellation.
    ///
    /// `cancel` is any future; when it completes the session stops and
    /// returns `Ok(None)`, the same as an exhausted source. Decode failures
    /// are logged at WARN and scanning continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame source fails with anything other than
    /// a decode failure.
    pub async fn run(
        &mut self,
        cancel: impl Future<Output = ()>,
    ) -> Result<Option<AssignmentPayload>> {
        debug!("Starting scan session over source '{}'", self.source.name());
        tokio::pin!(cancel);

        loop {
            tokio::select! {
                () = &mut cancel => {
                    info!("Scan cancelled after {} attempts", self.attempts);
                    return Ok(None);
                }
                attempt = self.next_attempt() => match attempt {
                    None => {
                        info!("Frame source exhausted after {} attempts", self.attempts);
                        return Ok(None);
                    }
                    Some(Ok(payload)) => {
                        info!(
                            "Decoded assignment for flight {} after {} attempts",
                            payload.flight_number, self.attempts
                        );
                        return Ok(Some(payload));
                    }
                    Some(Err(e)) if e.is_decode() => {
                        warn!("Scan attempt {} failed: {e}", self.attempts);
                    }
                    Some(Err(e)) => return Err(e),
                },
            }
        }
    }
}

/// A frame source over still image files, standing in for a live camera.
///
/// Each file is one frame; QR extraction is delegated to `rqrr`. A frame
/// with no readable QR code is a decode failure, so a session moves on to
/// the next file.
#[derive(Debug)]
pub struct ImageFrameSource {
    frames: VecDeque<PathBuf>,
}

impl ImageFrameSource {
    /// Create a source over the given image files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScannerUnavailable`] if no frames were given or any
    /// path does not exist, mirroring a denied or missing camera.
    pub fn new(paths: Vec<PathBuf>) -> Result<Self> {
        if paths.is_empty() {
            return Err(Error::scanner_unavailable("no frames to scan"));
        }
        for path in &paths {
            if !path.exists() {
                return Err(Error::scanner_unavailable(format!(
                    "frame {} does not exist",
                    path.display()
                )));
            }
        }
        Ok(Self {
            frames: paths.into(),
        })
    }

    /// Extract QR text from one image file.
    fn read_frame(path: &Path) -> Result<String> {
        let img = image::open(path)
            .map_err(|e| Error::decode(format!("unreadable frame {}: {e}", path.display())))?
            .to_luma8();

        let mut prepared = rqrr::PreparedImage::prepare(img);
        let grid = prepared
            .detect_grids()
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::decode(format!("no QR code detected in {}", path.display()))
            })?;

        let (_meta, content) = grid
            .decode()
            .map_err(|e| Error::decode(format!("unreadable QR code in {}: {e}", path.display())))?;
        Ok(content)
    }
}

#[async_trait]
impl FrameSource for ImageFrameSource {
    fn name(&self) -> &'static str {
        "image-files"
    }

    async fn next_frame(&mut self) -> Result<Option<String>> {
        let Some(path) = self.frames.pop_front() else {
            return Ok(None);
        };
        debug!("Reading frame {}", path.display());
        Self::read_frame(&path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QrConfig;

    /// Feeds a fixed list of frame texts.
    struct VecSource {
        frames: VecDeque<Result<String>>,
    }

    impl VecSource {
        fn new(frames: Vec<Result<String>>) -> Self {
            Self {
                frames: frames.into(),
            }
        }
    }

    #[async_trait]
    impl FrameSource for VecSource {
        fn name(&self) -> &'static str {
            "test-vec"
        }

        async fn next_frame(&mut self) -> Result<Option<String>> {
            match self.frames.pop_front() {
                Some(Ok(text)) => Ok(Some(text)),
                Some(Err(e)) => Err(e),
                None => Ok(None),
            }
        }
    }

    /// Never yields a frame; used to exercise cancellation.
    struct BlockedSource;

    #[async_trait]
    impl FrameSource for BlockedSource {
        fn name(&self) -> &'static str {
            "test-blocked"
        }

        async fn next_frame(&mut self) -> Result<Option<String>> {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    fn valid_payload_text() -> String {
        r#"{"flightNumber":"AI101","flightType":"Domestic Arrival","flightName":"Air India Express","coachNumber":"COACH-001","timestamp":"2024-01-01T00:00:00.000Z"}"#
            .to_string()
    }

    #[tokio::test]
    async fn test_first_success_ends_session() {
        let source = VecSource::new(vec![Ok(valid_payload_text()), Ok("unreached".to_string())]);
        let mut session = ScanSession::new(source);

        let result = session.run(std::future::pending()).await.unwrap();
        let payload = result.expect("expected a decoded payload");
        assert_eq!(payload.flight_number, "AI101");
        assert_eq!(session.attempts(), 1);
    }

    #[tokio::test]
    async fn test_decode_failure_keeps_session_alive() {
        // A garbage frame must not end the session; the next frame decodes.
        let source = VecSource::new(vec![
            Ok("definitely not json".to_string()),
            Ok(valid_payload_text()),
        ]);
        let mut session = ScanSession::new(source);

        let result = session.run(std::future::pending()).await.unwrap();
        assert!(result.is_some());
        assert_eq!(session.attempts(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_source_returns_none() {
        let source = VecSource::new(vec![Ok("garbage".to_string())]);
        let mut session = ScanSession::new(source);

        let result = session.run(std::future::pending()).await.unwrap();
        assert!(result.is_none());
        assert_eq!(session.attempts(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_stops_blocked_session() {
        let mut session = ScanSession::new(BlockedSource);

        let result = session.run(std::future::ready(())).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_source_failure_ends_session() {
        let source = VecSource::new(vec![Err(Error::scanner_unavailable("camera unplugged"))]);
        let mut session = ScanSession::new(source);

        let result = session.run(std::future::pending()).await;
        assert!(matches!(result, Err(Error::ScannerUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_next_attempt_reports_each_outcome() {
        let source = VecSource::new(vec![Ok("junk".to_string()), Ok(valid_payload_text())]);
        let mut session = ScanSession::new(source);

        let first = session.next_attempt().await.unwrap();
        assert!(first.is_err());

        let second = session.next_attempt().await.unwrap();
        assert!(second.is_ok());

        assert!(session.next_attempt().await.is_none());
    }

    #[test]
    fn test_image_source_rejects_empty_frame_list() {
        let result = ImageFrameSource::new(vec![]);
        assert!(matches!(result, Err(Error::ScannerUnavailable { .. })));
    }

    #[test]
    fn test_image_source_rejects_missing_file() {
        let result = ImageFrameSource::new(vec![PathBuf::from("/nonexistent/frame.png")]);
        assert!(matches!(result, Err(Error::ScannerUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_image_roundtrip_through_scanner() {
        // Encode a payload to a PNG, then scan it back through the session.
        let payload = crate::record::AssignmentPayload {
            flight_number: "AI101".to_string(),
            flight_type: "Domestic Arrival".to_string(),
            flight_name: "Air India Express".to_string(),
            coach_number: "COACH-001".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        };
        let path =
            std::env::temp_dir().join(format!("coachpass_scan_{}.png", std::process::id()));
        qr::encode_to_file(&payload, &path, &QrConfig::default()).unwrap();

        let source = ImageFrameSource::new(vec![path.clone()]).unwrap();
        let mut session = ScanSession::new(source);
        let result = session.run(std::future::pending()).await.unwrap();

        assert_eq!(result, Some(payload));
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_image_without_qr_is_decode_failure() {
        // A blank image has no QR grid; the source reports a decode error
        // and an exhausted session returns None.
        let path =
            std::env::temp_dir().join(format!("coachpass_blank_{}.png", std::process::id()));
        let blank = image::GrayImage::from_pixel(64, 64, image::Luma([255u8]));
        blank.save(&path).unwrap();

        let source = ImageFrameSource::new(vec![path.clone()]).unwrap();
        let mut session = ScanSession::new(source);
        let result = session.run(std::future::pending()).await.unwrap();

        assert!(result.is_none());
        assert_eq!(session.attempts(), 1);
        let _ = std::fs::remove_file(path);
    }
}
