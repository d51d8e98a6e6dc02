use std::collections::VecDeque;

use serde::Serialize;

/// Discrete signal for the presentation layer. The engine only appends;
/// display timing, banners, and dismissal belong to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Notice {
    LevelUp { level: u32 },
    EnergyRestored,
    EnergyLow { energy: i32 },
    EnergyEmpty,
}

/// Drainable FIFO of pending notices.
#[derive(Debug, Default)]
pub struct Outbox {
    notices: VecDeque<Notice>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
