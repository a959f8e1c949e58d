//! Diff-based typewriter reveal.
//!
//! Only the part of the text that changed is animated: the differing middle
//! is backspaced away, then the new middle is typed in. Starting a new reveal
//! supersedes the one in progress, and the displayed text always ends up as
//! the most recently requested target.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::RevealConfig;

/// What produced a frame; decides how long the frame is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Backspace,
    Pause,
    Type,
}

/// One displayed state of a reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub text: String,
    pub step: Step,
}

/// Frames that turn `current` into `target`.
///
/// Empty when the two are equal. Otherwise the last frame shows `target`.
pub fn reveal_frames(current: &str, target: &str) -> Vec<Frame> {
    let current: Vec<char> = current.chars().collect();
    let target: Vec<char> = target.chars().collect();

    let prefix_len = common_prefix(&current, &target);
    let suffix_len = common_suffix(&current[prefix_len..], &target[prefix_len..]);

    let prefix = &current[..prefix_len];
    let suffix = &current[current.len() - suffix_len..];
    let deleted = &current[prefix_len..current.len() - suffix_len];
    let typed = &target[prefix_len..target.len() - suffix_len];

    let compose = |middle: &[char]| -> String {
        prefix.iter().chain(middle).chain(suffix).collect()
    };

    let mut frames = Vec::with_capacity(deleted.len() + typed.len() + 1);
    for end in (0..deleted.len()).rev() {
        frames.push(Frame {
            text: compose(&deleted[..end]),
            step: Step::Backspace,
        });
    }
    if !deleted.is_empty() && !typed.is_empty() {
        frames.push(Frame {
            text: compose(&[]),
            step: Step::Pause,
        });
    }
    for end in 1..=typed.len() {
        frames.push(Frame {
            text: compose(&typed[..end]),
            step: Step::Type,
        });
    }
    frames
}

fn common_prefix(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix(a: &[char], b: &[char]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Animated text display.
///
/// The displayed text is published on a [`watch`] channel. Reveals run as
/// tokio tasks, so [`reveal`](Self::reveal) must be called inside a runtime.
pub struct Typewriter {
    config: RevealConfig,
    display: watch::Sender<String>,
    /// Id of the reveal allowed to update the display.
    generation: Arc<AtomicU64>,
    active: Option<JoinHandle<()>>,
}

impl Typewriter {
    pub fn new(config: RevealConfig) -> Self {
        let (display, _) = watch::channel(String::new());
        Self {
            config,
            display,
            generation: Arc::new(AtomicU64::new(0)),
            active: None,
        }
    }

    /// Receive every displayed state.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display.subscribe()
    }

    /// Currently displayed text.
    pub fn text(&self) -> String {
        self.display.borrow().clone()
    }

    pub fn is_revealing(&self) -> bool {
        self.active.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Animate from the displayed text to `target`, superseding any reveal in progress.
    pub fn reveal(&mut self, target: impl Into<String>) {
        let target = target.into();
        let id = self.supersede();

        let frames = reveal_frames(&self.display.borrow(), &target);
        debug!(id, frames = frames.len(), "Starting reveal");

        let display = self.display.clone();
        let generation = Arc::clone(&self.generation);
        let config = self.config;

        self.active = Some(tokio::spawn(async move {
            for frame in frames {
                let delay = config.delay_for(frame.step);
                if !publish(&display, &generation, id, frame.text) {
                    return;
                }
                if delay.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::time::sleep(delay).await;
                }
            }
            publish(&display, &generation, id, target);
        }));
    }

    /// Show `text` immediately, cancelling any reveal in progress.
    pub fn show_instant(&mut self, text: impl Into<String>) {
        self.supersede();
        self.display.send_replace(text.into());
    }

    /// Stop the reveal in progress, leaving the display where it is.
    pub fn stop(&mut self) {
        self.supersede();
    }

    /// Wait for the reveal in progress to finish.
    pub async fn finish(&mut self) {
        if let Some(handle) = self.active.take() {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    warn!("Reveal task panicked: {}", e);
                }
            }
        }
    }

    /// Abort the active reveal and claim a new generation id.
    fn supersede(&mut self) -> u64 {
        if let Some(handle) = self.active.take() {
            if !handle.is_finished() {
                debug!("Superseding reveal in progress");
            }
            handle.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.abort();
        }
    }
}

/// Publish `text` if reveal `id` is still current. The check runs under the
/// channel lock so a superseded task can never overwrite a newer frame.
fn publish(display: &watch::Sender<String>, generation: &AtomicU64, id: u64, text: String) -> bool {
    let mut current = true;
    display.send_if_modified(|shown| {
        if generation.load(Ordering::SeqCst) != id {
            current = false;
            return false;
        }
        *shown = text;
        true
    });
    current
}
