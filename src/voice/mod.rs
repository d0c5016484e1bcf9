//! Speech output module
//!
//! Synthesis is remote (OpenAI speech API); playback goes to the default
//! output device. The announcer ties the two together as fire-and-forget
//! background narration.

mod announcer;
mod playback;
mod tts;

pub use announcer::{Announcer, NarrationEngineFactory, SpeechEngine, SpeechEngineFactory};
pub use playback::AudioPlayback;
pub use tts::TextToSpeech;
