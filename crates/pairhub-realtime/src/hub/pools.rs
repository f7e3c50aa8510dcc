//! Waiting pools for text and video matchmaking.

use std::collections::VecDeque;

use pairhub_core::types::ClientId;

use crate::message::types::ChatMode;

/// Two FIFO queues of clients waiting for a partner, one per mode.
#[derive(Debug, Default)]
pub struct WaitingPools {
    text: VecDeque<ClientId>,
    video: VecDeque<ClientId>,
}

impl WaitingPools {
    pub fn new() -> Self {
        Self::default()
    }

    fn pool(&self, mode: ChatMode) -> &VecDeque<ClientId> {
        match mode {
            ChatMode::Text => &self.text,
            ChatMode::Video => &self.video,
        }
    }

    fn pool_mut(&mut self, mode: ChatMode) -> &mut VecDeque<ClientId> {
        match mode {
            ChatMode::Text => &mut self.text,
            ChatMode::Video => &mut self.video,
        }
    }

    /// Appends `id` to the tail of the `mode` pool unless it is already queued there.
    pub fn enqueue(&mut self, mode: ChatMode, id: ClientId) {
        let pool = self.pool_mut(mode);
        if !pool.contains(&id) {
            pool.push_back(id);
        }
    }

    /// Takes the longest-waiting id from the `mode` pool.
    pub fn pop_front(&mut self, mode: ChatMode) -> Option<ClientId> {
        self.pool_mut(mode).pop_front()
    }

    /// Removes `id` from both pools. Returns whether it was queued anywhere.
    pub fn remove(&mut self, id: &ClientId) -> bool {
        let mut removed = false;
        for pool in [&mut self.text, &mut self.video] {
            let before = pool.len();
            pool.retain(|queued| queued != id);
            removed |= pool.len() != before;
        }
        removed
    }

    pub fn contains(&self, mode: ChatMode, id: &ClientId) -> bool {
        self.pool(mode).contains(id)
    }

    /// Queued ids for `mode`, oldest first.
    pub fn waiting(&self, mode: ChatMode) -> Vec<ClientId> {
        self.pool(mode).iter().copied().collect()
    }

    pub fn len(&self, mode: ChatMode) -> usize {
        self.pool(mode).len()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.video.clear();
    }
}
