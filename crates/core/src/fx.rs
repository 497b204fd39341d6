/// Seam to the presentation layer. The kernel reports what happened;
/// rendering, shakes, and tween requests live on the other side.
pub trait FxSink {
    fn spawn_damage_number(&mut self, amount: i64, is_healing: bool, is_crit: bool);
    fn enemy_damage_effect(&mut self);
    fn enemy_heal_effect(&mut self);
    fn enemy_defeat_animation(&mut self);
    fn message(&mut self, text: &str);
}

/// No-op sink for tests and headless runs.
#[derive(Debug, Default)]
pub struct NullFx;

impl FxSink for NullFx {
    fn spawn_damage_number(&mut self, _amount: i64, _is_healing: bool, _is_crit: bool) {}
    fn enemy_damage_effect(&mut self) {}
    fn enemy_heal_effect(&mut self) {}
    fn enemy_defeat_animation(&mut self) {}
    fn message(&mut self, _text: &str) {}
}

/// Records everything it is told; used by tests asserting on visuals.
#[derive(Debug, Default)]
pub struct RecordingFx {
    pub damage_numbers: Vec<(i64, bool, bool)>,
    pub messages: Vec<String>,
    pub defeat_animations: usize,
}

impl FxSink for RecordingFx {
    fn spawn_damage_number(&mut self, amount: i64, is_healing: bool, is_crit: bool) {
        self.damage_numbers.push((amount, is_healing, is_crit));
    }

    fn enemy_damage_effect(&mut self) {}

    fn enemy_heal_effect(&mut self) {}

    fn enemy_defeat_animation(&mut self) {
        self.defeat_animations += 1;
    }

    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}
