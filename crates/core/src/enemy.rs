use crate::Ability;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub name: String,
    pub description: String,
    pub max_hp: i64,
    pub current_hp: i64,
    /// Monotonic over a combat; healing never rolls it back.
    pub total_damage_taken: i64,
    pub is_defeated: bool,
    pub abilities: Vec<Ability>,
}

impl Enemy {
    pub fn new(name: impl Into<String>, max_hp: i64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            max_hp,
            current_hp: max_hp,
            total_damage_taken: 0,
            is_defeated: false,
            abilities: Vec::new(),
        }
    }

    pub fn with_abilities(mut self, abilities: Vec<Ability>) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        self.current_hp as f64 / self.max_hp as f64
    }

    /// Applies damage, clamping hp at zero. `total_damage_taken` grows by
    /// the full applied amount, not the clamped remainder.
    pub fn take_damage(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        self.current_hp = (self.current_hp - amount).max(0);
        self.total_damage_taken += amount;
        if self.current_hp == 0 {
            self.is_defeated = true;
        }
    }

    pub fn heal(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
    }
}

/// Registry form an enemy is spawned from. The pending hp multiplier from
/// event encounters is applied at spawn time.
#[derive(Debug, Clone)]
pub struct EnemyTemplate {
    pub name: String,
    pub description: String,
    pub hp: i64,
    pub abilities: Vec<Ability>,
}

impl EnemyTemplate {
    pub fn spawn(&self, hp_multiplier: f64) -> Enemy {
        let hp = ((self.hp as f64 * hp_multiplier) as i64).max(1);
        let mut abilities = self.abilities.clone();
        for ability in &mut abilities {
            ability.reset_combat_state();
        }
        Enemy {
            name: self.name.clone(),
            description: self.description.clone(),
            max_hp: hp,
            current_hp: hp,
            total_damage_taken: 0,
            is_defeated: false,
            abilities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_is_clamped_but_accounting_is_not() {
        let mut enemy = Enemy::new("Pit Fiend", 30);
        enemy.take_damage(20);
        enemy.take_damage(20);
        assert_eq!(enemy.current_hp, 0);
        assert!(enemy.is_defeated);
        assert_eq!(enemy.total_damage_taken, 40);
    }

    #[test]
    fn healing_never_reduces_total_damage() {
        let mut enemy = Enemy::new("Pit Fiend", 100);
        enemy.take_damage(60);
        enemy.heal(50);
        assert_eq!(enemy.current_hp, 90);
        assert_eq!(enemy.total_damage_taken, 60);
    }
}
