//! Guided-cooking helpers: step navigation, serving scaling and logical
//! timers.
//!
//! All three are plain serializable values so the cooking flow can keep
//! them in its journey state between turns.

use std::collections::BTreeSet;

use nutribot_catalog::Recipe;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
//  Step navigation
// ═══════════════════════════════════════════════════════════════════════

/// Cursor over a 1-based list of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepNavigator {
    total: u32,
    current: u32,
    completed: BTreeSet<u32>,
}

/// Snapshot of a [`StepNavigator`] for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepProgress {
    pub current: u32,
    pub total: u32,
    pub completed: usize,
    pub percentage: f64,
    pub is_first: bool,
    pub is_last: bool,
}

impl StepNavigator {
    /// A navigator positioned on step 1.  At least one step is assumed.
    pub fn new(total: u32) -> Self {
        Self {
            total: total.max(1),
            current: 1,
            completed: BTreeSet::new(),
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Complete the current step and advance.  Returns the new step and
    /// whether it is the last; stays put on the last step.
    pub fn next(&mut self) -> (u32, bool) {
        if self.current < self.total {
            self.completed.insert(self.current);
            self.current += 1;
            (self.current, self.current == self.total)
        } else {
            (self.current, true)
        }
    }

    /// Step back, un-completing the step returned to.  Returns the new step
    /// and whether it is the first.
    pub fn previous(&mut self) -> (u32, bool) {
        if self.current > 1 {
            self.current -= 1;
            self.completed.remove(&self.current);
            (self.current, self.current == 1)
        } else {
            (self.current, true)
        }
    }

    pub fn jump_to(&mut self, step: u32) -> bool {
        if (1..=self.total).contains(&step) {
            self.current = step;
            true
        } else {
            false
        }
    }

    pub fn mark_complete(&mut self, step: u32) {
        if (1..=self.total).contains(&step) {
            self.completed.insert(step);
        }
    }

    pub fn is_completed(&self, step: u32) -> bool {
        self.completed.contains(&step)
    }

    pub fn progress(&self) -> StepProgress {
        StepProgress {
            current: self.current,
            total: self.total,
            completed: self.completed.len(),
            percentage: self.completed.len() as f64 / f64::from(self.total) * 100.0,
            is_first: self.current == 1,
            is_last: self.current == self.total,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Serving scaling
// ═══════════════════════════════════════════════════════════════════════

/// How a duration reacts to a bigger batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeScaling {
    Linear,
    /// Grows with `1 + ln(factor)` when scaling up; linear when scaling
    /// down.  Suits baking.
    Logarithmic,
    Fixed,
}

/// Scales a recipe from its original serving count to a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServingScaler {
    pub original: u32,
    pub target: u32,
    pub factor: f64,
}

/// Summary of a scaling decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingInfo {
    pub original: u32,
    pub target: u32,
    /// Two decimals.
    pub factor: f64,
    pub scaling_needed: bool,
    pub scaling_up: bool,
    pub scaling_down: bool,
}

impl ServingScaler {
    pub fn new(original: u32) -> Self {
        let original = original.max(1);
        Self {
            original,
            target: original,
            factor: 1.0,
        }
    }

    /// Ignored unless `target` is positive.
    pub fn set_target(&mut self, target: u32) {
        if target > 0 {
            self.target = target;
            self.factor = f64::from(target) / f64::from(self.original);
        }
    }

    pub fn scale_amount(&self, amount: f64) -> f64 {
        amount * self.factor
    }

    /// Scaled duration in minutes, never below one for scaled modes.
    pub fn scale_time(&self, minutes: u32, mode: TimeScaling) -> u32 {
        let m = f64::from(minutes);
        let scaled = match mode {
            TimeScaling::Fixed => return minutes,
            TimeScaling::Linear => m * self.factor,
            TimeScaling::Logarithmic if self.factor > 1.0 => m * (1.0 + self.factor.ln()),
            TimeScaling::Logarithmic => m * self.factor,
        };
        (scaled.round() as u32).max(1)
    }

    pub fn info(&self) -> ScalingInfo {
        ScalingInfo {
            original: self.original,
            target: self.target,
            factor: (self.factor * 100.0).round() / 100.0,
            scaling_needed: self.factor != 1.0,
            scaling_up: self.factor > 1.0,
            scaling_down: self.factor < 1.0,
        }
    }

    /// Scaled amount with its unit, using kitchen fractions for common
    /// amounts below one.
    pub fn format_amount(&self, amount: f64, unit: &str) -> String {
        format!("{} {unit}", format_quantity(self.scale_amount(amount)))
            .trim()
            .to_string()
    }

    /// `"½ cup flour"`-style lines for every ingredient of `recipe`.
    pub fn ingredient_lines(&self, recipe: &Recipe) -> Vec<String> {
        recipe
            .ingredients
            .iter()
            .map(|i| format!("{} {}", self.format_amount(i.amount, &i.unit), i.name))
            .collect()
    }
}

/// Whole numbers print bare, `½ ¼ ¾ ⅓ ⅔` cover common fractions below one,
/// anything else gets one decimal.
pub fn format_quantity(value: f64) -> String {
    const FRACTIONS: [(f64, &str); 5] = [
        (0.5, "½"),
        (0.25, "¼"),
        (0.75, "¾"),
        (1.0 / 3.0, "⅓"),
        (2.0 / 3.0, "⅔"),
    ];
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    if value < 1.0 {
        if let Some((_, glyph)) = FRACTIONS.iter().find(|(f, _)| (value - f).abs() < 0.005) {
            return glyph.to_string();
        }
    }
    format!("{value:.1}")
}

// ═══════════════════════════════════════════════════════════════════════
//  Logical timers
// ═══════════════════════════════════════════════════════════════════════

/// A countdown measured in conversation turns.  One turn stands for one
/// minute, so no wall clock or background task is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookingTimer {
    pub step: u32,
    pub minutes: u32,
    pub started_turn: u64,
    /// Remaining minutes frozen by a pause.
    #[serde(default)]
    pub paused_remaining: Option<u32>,
}

impl CookingTimer {
    pub fn start(step: u32, minutes: u32, turn: u64) -> Self {
        Self {
            step,
            minutes,
            started_turn: turn,
            paused_remaining: None,
        }
    }

    pub fn remaining(&self, turn: u64) -> u32 {
        if let Some(frozen) = self.paused_remaining {
            return frozen;
        }
        let elapsed = turn.saturating_sub(self.started_turn);
        u64::from(self.minutes).saturating_sub(elapsed) as u32
    }

    pub fn is_done(&self, turn: u64) -> bool {
        self.remaining(turn) == 0
    }

    pub fn is_paused(&self) -> bool {
        self.paused_remaining.is_some()
    }

    pub fn pause(&mut self, turn: u64) {
        if self.paused_remaining.is_none() {
            self.paused_remaining = Some(self.remaining(turn));
        }
    }

    /// Restart the countdown from the frozen remainder.
    pub fn resume(&mut self, turn: u64) {
        if let Some(left) = self.paused_remaining.take() {
            self.minutes = left;
            self.started_turn = turn;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigator_walks_forward_and_back() {
        let mut nav = StepNavigator::new(3);
        assert_eq!(nav.next(), (2, false));
        assert_eq!(nav.next(), (3, true));
        assert_eq!(nav.next(), (3, true));
        assert_eq!(nav.progress().completed, 2);

        assert_eq!(nav.previous(), (2, false));
        assert!(!nav.is_completed(2));
        assert!(nav.is_completed(1));
        assert_eq!(nav.previous(), (1, true));
        assert_eq!(nav.previous(), (1, true));
        assert!(nav.progress().is_first);
    }

    #[test]
    fn navigator_jump_bounds() {
        let mut nav = StepNavigator::new(4);
        assert!(nav.jump_to(4));
        assert!(nav.progress().is_last);
        assert!(!nav.jump_to(0));
        assert!(!nav.jump_to(5));
        assert_eq!(nav.current(), 4);
    }

    #[test]
    fn progress_percentage() {
        let mut nav = StepNavigator::new(4);
        nav.next();
        assert_eq!(nav.progress().percentage, 25.0);
    }

    #[test]
    fn scaler_factor_and_info() {
        let mut scaler = ServingScaler::new(4);
        scaler.set_target(0);
        assert_eq!(scaler.factor, 1.0);
        assert!(!scaler.info().scaling_needed);

        scaler.set_target(6);
        assert_eq!(scaler.factor, 1.5);
        let info = scaler.info();
        assert!(info.scaling_up && !info.scaling_down);

        scaler.set_target(3);
        assert_eq!(scaler.info().factor, 0.75);
    }

    #[test]
    fn scaled_times() {
        let mut scaler = ServingScaler::new(4);
        scaler.set_target(2);
        assert_eq!(scaler.scale_time(1, TimeScaling::Linear), 1);
        assert_eq!(scaler.scale_time(30, TimeScaling::Linear), 15);
        assert_eq!(scaler.scale_time(30, TimeScaling::Fixed), 30);
        scaler.set_target(8);
        assert_eq!(scaler.scale_time(30, TimeScaling::Logarithmic), 51);
    }

    #[test]
    fn quantity_formatting() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(0.5), "½");
        assert_eq!(format_quantity(0.25), "¼");
        assert_eq!(format_quantity(1.0 / 3.0), "⅓");
        assert_eq!(format_quantity(0.67), "⅔");
        assert_eq!(format_quantity(0.4), "0.4");
        assert_eq!(format_quantity(1.5), "1.5");
    }

    #[test]
    fn formatted_amounts_trim_empty_units() {
        let mut scaler = ServingScaler::new(2);
        scaler.set_target(1);
        assert_eq!(scaler.format_amount(1.0, "cup"), "½ cup");
        assert_eq!(scaler.format_amount(4.0, ""), "2");
    }

    #[test]
    fn timer_counts_turns() {
        let mut timer = CookingTimer::start(3, 5, 10);
        assert_eq!(timer.remaining(10), 5);
        assert_eq!(timer.remaining(12), 3);
        timer.pause(12);
        assert_eq!(timer.remaining(20), 3);
        timer.resume(20);
        assert_eq!(timer.remaining(21), 2);
        assert!(timer.is_done(30));
    }
}
