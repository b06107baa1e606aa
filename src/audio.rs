use std::path::Path;

use crate::logger;

/// Sound effects the quiz knows how to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Play,
    Spin,
    Submit,
    Option,
    EndGame,
}

impl Sound {
    pub const ALL: [Sound; 5] = [
        Sound::Play,
        Sound::Spin,
        Sound::Submit,
        Sound::Option,
        Sound::EndGame,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "play" => Some(Self::Play),
            "spin" => Some(Self::Spin),
            "submit" => Some(Self::Submit),
            "option" => Some(Self::Option),
            "end_game" => Some(Self::EndGame),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Spin => "spin",
            Self::Submit => "submit",
            Self::Option => "option",
            Self::EndGame => "end_game",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Play => "play.mp3",
            Self::Spin => "spin.mp3",
            Self::Submit => "submit.mp3",
            Self::Option => "option.mp3",
            Self::EndGame => "end-game.mp3",
        }
    }
}

pub trait AudioPlayer {
    fn play(&self, sound: Sound);

    /// Play by name; names outside the known set are ignored.
    fn play_named(&self, name: &str) {
        if let Some(sound) = Sound::from_name(name) {
            self.play(sound);
        }
    }
}

impl<T: AudioPlayer + ?Sized> AudioPlayer for Box<T> {
    fn play(&self, sound: Sound) {
        (**self).play(sound);
    }
}

/// Player used when sound is muted or no output device could be opened.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl AudioPlayer for SilentPlayer {
    fn play(&self, _sound: Sound) {}
}

#[cfg(feature = "sound")]
mod device {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::Arc;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

    use super::{AudioPlayer, Sound};
    use crate::error::AudioError;

    /// Plays effects through the default output device. Files are read once and
    /// decoded on every play.
    pub struct RodioPlayer {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sounds: HashMap<Sound, Arc<[u8]>>,
    }

    impl RodioPlayer {
        pub fn new(dir: &Path) -> Result<Self, AudioError> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| AudioError::Device(e.to_string()))?;

            let mut sounds = HashMap::new();
            for sound in Sound::ALL {
                let bytes = std::fs::read(dir.join(sound.file_name())).map_err(|source| {
                    AudioError::Load {
                        name: sound.name(),
                        source,
                    }
                })?;
                sounds.insert(sound, Arc::from(bytes));
            }

            Ok(Self {
                _stream: stream,
                handle,
                sounds,
            })
        }
    }

    impl AudioPlayer for RodioPlayer {
        fn play(&self, sound: Sound) {
            let Some(bytes) = self.sounds.get(&sound) else {
                return;
            };
            let Ok(sink) = Sink::try_new(&self.handle) else {
                return;
            };
            let Ok(source) = Decoder::new(Cursor::new(Arc::clone(bytes))) else {
                return;
            };
            sink.append(source);
            sink.detach();
        }
    }
}

#[cfg(feature = "sound")]
pub use device::RodioPlayer;

/// Open the best available player. Failures only disable sound.
pub fn open_player(dir: &Path, enabled: bool) -> Box<dyn AudioPlayer> {
    if !enabled {
        logger::log("Sound muted by configuration");
        return Box::new(SilentPlayer);
    }

    #[cfg(feature = "sound")]
    {
        match RodioPlayer::new(dir) {
            Ok(player) => {
                logger::log(&format!("Loaded sounds from {}", dir.display()));
                return Box::new(player);
            }
            Err(e) => logger::warn(&format!("Sound disabled: {}", e)),
        }
    }

    #[cfg(not(feature = "sound"))]
    logger::warn(&format!(
        "Sound disabled: built without the `sound` feature (sounds in {} ignored)",
        dir.display()
    ));

    Box::new(SilentPlayer)
}
