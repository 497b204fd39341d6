//! Headless debug terminal: a game context driven by console commands
//! from stdin. Pass a content directory to load enemies, trinkets, and
//! card tags before the prompt opens.

use pontoon_core::{Console, GameContext, GameRng, NullFx, Player, DEALER_ID, HUMAN_ID};
use pontoon_data::{load_card_tags, load_enemies, load_trinkets};
use std::io::{self, BufRead, Write};
use std::path::Path;

fn main() {
    env_logger::init();

    let mut ctx = GameContext::new(GameRng::from_entropy(), Box::new(NullFx));
    ctx.add_player(Player::new(DEALER_ID, "Dealer", true));
    ctx.add_player(Player::new(HUMAN_ID, "Player", false));

    if let Some(dir) = std::env::args().nth(1) {
        if let Err(err) = load_content(&mut ctx, Path::new(&dir)) {
            eprintln!("failed to load content from {dir}: {err:#}");
            std::process::exit(1);
        }
    }

    println!("pontoon debug console (seed {}); `help` for commands", ctx.rng.seed());
    let console = Console::new();
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                eprintln!("stdin error: {err}");
                break;
            }
        }
        let line = line.trim();
        if line == "quit" || line == "exit" {
            break;
        }
        let output = console.dispatch(&mut ctx, line);
        if output.clear_screen {
            print!("\x1b[2J\x1b[H");
        }
        for text in output.lines {
            println!("{text}");
        }
    }
}

fn load_content(ctx: &mut GameContext, dir: &Path) -> anyhow::Result<()> {
    let enemies = dir.join("enemies.json");
    if enemies.exists() {
        ctx.enemy_templates = load_enemies(&enemies)?;
    }
    let trinkets = dir.join("trinkets.json");
    if trinkets.exists() {
        load_trinkets(&trinkets, &mut ctx.trinkets)?;
    }
    let tags = dir.join("card_tags.json");
    if tags.exists() {
        load_card_tags(&tags, &mut ctx.tags)?;
    }
    Ok(())
}
