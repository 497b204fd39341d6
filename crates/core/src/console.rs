use crate::{Enemy, GameContext, PlayerId, HUMAN_ID};

type Handler = fn(&mut GameContext, &[&str]) -> Result<Vec<String>, String>;

/// One registered debug command.
pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    handler: Handler,
}

/// What a dispatched line produced. `clear_screen` is a signal to the
/// front end; the kernel has no screen to clear.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConsoleOutput {
    pub lines: Vec<String>,
    pub clear_screen: bool,
}

/// Debug console: a flat command table dispatched by first word.
/// Unknown commands and bad arguments come back as error lines, never
/// as panics; the console must not be able to take the game down.
pub struct Console {
    commands: Vec<Command>,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    pub fn new() -> Self {
        Self {
            commands: vec![
                Command {
                    name: "help",
                    usage: "help",
                    description: "List available commands.",
                    handler: cmd_help_stub,
                },
                Command {
                    name: "clear",
                    usage: "clear",
                    description: "Clear the console screen.",
                    handler: cmd_clear,
                },
                Command {
                    name: "echo",
                    usage: "echo <text>",
                    description: "Print the arguments back.",
                    handler: cmd_echo,
                },
                Command {
                    name: "give_chips",
                    usage: "give_chips <amount> [player_id]",
                    description: "Add chips to a player (default: the human player).",
                    handler: cmd_give_chips,
                },
                Command {
                    name: "set_hp",
                    usage: "set_hp <hp>",
                    description: "Set the current enemy's hp.",
                    handler: cmd_set_hp,
                },
                Command {
                    name: "spawn_enemy",
                    usage: "spawn_enemy <name> <hp> [attack]",
                    description: "Spawn an enemy; quote multi-word names.",
                    handler: cmd_spawn_enemy,
                },
                Command {
                    name: "stats",
                    usage: "stats",
                    description: "Print the run-wide counters.",
                    handler: cmd_stats,
                },
            ],
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn dispatch(&self, ctx: &mut GameContext, line: &str) -> ConsoleOutput {
        let tokens = tokenize(line);
        let Some((name, rest)) = tokens.split_first() else {
            return ConsoleOutput::default();
        };
        let name = name.as_str();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        if name == "help" {
            return ConsoleOutput {
                lines: self.help_lines(),
                clear_screen: false,
            };
        }

        let Some(command) = self.commands.iter().find(|c| c.name == name) else {
            return ConsoleOutput {
                lines: vec![format!("unknown command `{name}`; try `help`")],
                clear_screen: false,
            };
        };

        match (command.handler)(ctx, &args) {
            Ok(lines) => ConsoleOutput {
                clear_screen: command.name == "clear",
                lines,
            },
            Err(message) => ConsoleOutput {
                lines: vec![format!("{message} (usage: {})", command.usage)],
                clear_screen: false,
            },
        }
    }

    fn help_lines(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|c| format!("{:<28} {}", c.usage, c.description))
            .collect()
    }
}

// Whitespace-split with double quotes grouping a multi-word argument.
// An unterminated quote runs to the end of the line.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

// `help` is resolved in dispatch (it needs the table); the table entry
// exists so it shows up in its own listing.
fn cmd_help_stub(_ctx: &mut GameContext, _args: &[&str]) -> Result<Vec<String>, String> {
    Ok(Vec::new())
}

fn cmd_clear(_ctx: &mut GameContext, _args: &[&str]) -> Result<Vec<String>, String> {
    Ok(Vec::new())
}

fn cmd_echo(_ctx: &mut GameContext, args: &[&str]) -> Result<Vec<String>, String> {
    Ok(vec![args.join(" ")])
}

fn cmd_give_chips(ctx: &mut GameContext, args: &[&str]) -> Result<Vec<String>, String> {
    let amount: i64 = args
        .first()
        .ok_or("missing amount")?
        .parse()
        .map_err(|_| "amount must be an integer".to_string())?;
    let pid = match args.get(1) {
        Some(raw) => PlayerId(
            raw.parse()
                .map_err(|_| "player_id must be an integer".to_string())?,
        ),
        None => HUMAN_ID,
    };
    let player = ctx
        .players
        .get_mut(&pid)
        .ok_or_else(|| format!("no player {}", pid.0))?;
    if amount >= 0 {
        player.add_chips(amount);
    } else {
        player.lose_chips(-amount);
    }
    Ok(vec![format!(
        "player {} now has {} chips",
        pid.0, player.chips
    )])
}

fn cmd_set_hp(ctx: &mut GameContext, args: &[&str]) -> Result<Vec<String>, String> {
    let hp: i64 = args
        .first()
        .ok_or("missing hp")?
        .parse()
        .map_err(|_| "hp must be an integer".to_string())?;
    let enemy = ctx.enemy.as_mut().ok_or("no enemy in combat")?;
    enemy.current_hp = hp.clamp(0, enemy.max_hp);
    if enemy.current_hp == 0 {
        enemy.is_defeated = true;
    }
    Ok(vec![format!(
        "{}: {}/{} hp",
        enemy.name, enemy.current_hp, enemy.max_hp
    )])
}

fn cmd_spawn_enemy(ctx: &mut GameContext, args: &[&str]) -> Result<Vec<String>, String> {
    let name = *args.first().ok_or("missing name")?;
    let hp: i64 = args
        .get(1)
        .ok_or("missing hp")?
        .parse()
        .map_err(|_| "hp must be an integer".to_string())?;
    if hp <= 0 {
        return Err("hp must be positive".to_string());
    }
    let mut lines = Vec::new();
    if let Some(raw) = args.get(2) {
        // Enemies here act through abilities, not a flat attack stat.
        let _: i64 = raw
            .parse()
            .map_err(|_| "attack must be an integer".to_string())?;
        lines.push("note: enemies have no attack stat; argument ignored".to_string());
    }
    ctx.spawn_enemy(Enemy::new(name, hp));
    lines.push(format!("spawned `{name}` with {hp} hp"));
    Ok(lines)
}

fn cmd_stats(ctx: &mut GameContext, _args: &[&str]) -> Result<Vec<String>, String> {
    let s = &ctx.global_stats;
    Ok(vec![
        format!("cards drawn        {}", s.cards_drawn),
        format!(
            "turns w/l/p        {}/{}/{} of {}",
            s.turns_won, s.turns_lost, s.turns_pushed, s.turns_played
        ),
        format!("combats won        {}", s.combats_won),
        format!(
            "chips bet/won/lost {}/{}/{}",
            s.chips_bet, s.chips_won, s.chips_lost
        ),
        format!("chips drained      {}", s.chips_drained),
        format!("peak chips         {}", s.peak_chips),
        format!("peak bet           {}", s.peak_bet),
        format!("average bet        {}", s.average_bet()),
        format!(
            "damage t/g/k/a     {}/{}/{}/{}",
            s.damage_from_turns, s.damage_from_tags, s.damage_from_trinkets, s.damage_from_abilities
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameRng, NullFx, Player};

    fn context() -> GameContext {
        let mut ctx = GameContext::new(GameRng::from_seed(1), Box::new(NullFx));
        ctx.add_player(Player::new(HUMAN_ID, "Morgan", false));
        ctx
    }

    #[test]
    fn unknown_commands_answer_instead_of_failing() {
        let console = Console::new();
        let mut ctx = context();
        let output = console.dispatch(&mut ctx, "frobnicate 12");
        assert!(output.lines[0].contains("unknown command"));
    }

    #[test]
    fn give_chips_defaults_to_the_human_player() {
        let console = Console::new();
        let mut ctx = context();
        let before = ctx.players[&HUMAN_ID].chips;
        console.dispatch(&mut ctx, "give_chips 250");
        assert_eq!(ctx.players[&HUMAN_ID].chips, before + 250);
    }

    #[test]
    fn set_hp_clamps_to_the_enemy_range() {
        let console = Console::new();
        let mut ctx = context();
        ctx.spawn_enemy(Enemy::new("Pit Fiend", 100));
        console.dispatch(&mut ctx, "set_hp 9999");
        assert_eq!(ctx.enemy.as_ref().unwrap().current_hp, 100);

        console.dispatch(&mut ctx, "set_hp 0");
        assert!(ctx.enemy.as_ref().unwrap().is_defeated);
    }

    #[test]
    fn quoted_names_survive_tokenization() {
        let console = Console::new();
        let mut ctx = context();
        console.dispatch(&mut ctx, "spawn_enemy \"Pit Boss\" 80 12");
        let enemy = ctx.enemy.as_ref().unwrap();
        assert_eq!(enemy.name, "Pit Boss");
        assert_eq!(enemy.max_hp, 80);
    }
}
