use std::collections::VecDeque;

use schedsim::engine::StealDraw;

/// Deterministic draw source for tests.
///
/// Replays `script` in order and then repeats `fallback` forever. `reset`
/// rewinds to the start of the script.
#[derive(Debug, Clone)]
pub struct ScriptedDraw {
    script: Vec<u32>,
    pending: VecDeque<u32>,
    fallback: u32,
    drawn: usize,
}

impl ScriptedDraw {
    pub fn new(script: &[u32], fallback: u32) -> Self {
        Self {
            script: script.to_vec(),
            pending: script.iter().copied().collect(),
            fallback,
            drawn: 0,
        }
    }

    /// Always draws 0: every heuristic roll steals.
    pub fn always_steal() -> Self {
        Self::new(&[], 0)
    }

    /// Always draws 99: no heuristic roll steals (p_max < 1).
    pub fn never_steal() -> Self {
        Self::new(&[], 99)
    }

    /// Number of draws taken since construction or the last reset.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl StealDraw for ScriptedDraw {
    fn draw_percent(&mut self) -> u32 {
        self.drawn += 1;
        self.pending.pop_front().unwrap_or(self.fallback)
    }

    fn reset(&mut self) {
        self.pending = self.script.iter().copied().collect();
        self.drawn = 0;
    }
}
