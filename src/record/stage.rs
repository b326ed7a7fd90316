//! Sleep stages and the display track vote.

use alloc::vec::Vec;

use super::{BASE_PER_DISPLAY, Ordinal};

/// A sleep stage sample, as stored in the base and display tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ordinal)]
pub enum SleepStage {
    #[default]
    Undefined = 0,
    Wake = 1,
    Rem = 2,
    Light = 3,
    Deep = 4,
    /// Reserved by the firmware.
    Unused = 5,
    /// Deep sleep, as labelled by a second detector.
    Deep2 = 6,
}

impl SleepStage {
    /// Whether the sleeper is asleep in this stage.
    pub fn is_sleep(self) -> bool {
        matches!(self, Self::Rem | Self::Light | Self::Deep | Self::Deep2)
    }

    /// Fold the second deep variant into [`SleepStage::Deep`].
    pub fn normalize(self) -> Self {
        match self {
            Self::Deep2 => Self::Deep,
            stage => stage,
        }
    }

    /// Choose the display stage for a window of base track samples.
    ///
    /// A window holding only undefined samples is undefined. Any wake sample
    /// makes the window wake. Otherwise the most frequent stage wins, with
    /// ties going to the lowest ordinal (REM, then light, then deep).
    pub fn vote(window: &[SleepStage]) -> SleepStage {
        let mut counts = [0usize; 7];
        for stage in window {
            counts[stage.normalize().ordinal() as usize] += 1;
        }

        let count = |stage: SleepStage| counts[stage.ordinal() as usize];

        if count(Self::Undefined) == window.len() {
            return Self::Undefined;
        }

        if count(Self::Wake) != 0 {
            return Self::Wake;
        }

        let mut result = Self::Rem;
        for stage in [Self::Light, Self::Deep, Self::Unused] {
            if count(stage) > count(result) {
                result = stage;
            }
        }

        result
    }
}

/// Build the display track from the populated base track.
///
/// Trailing base samples that do not fill a whole window are dropped.
pub(crate) fn display_track(base: &[SleepStage]) -> Vec<SleepStage> {
    base.chunks_exact(BASE_PER_DISPLAY)
        .map(SleepStage::vote)
        .collect()
}
