extern crate blocky;

use blocky::block::Point;
use blocky::config::GameConfig;
use blocky::game::Game;
use blocky::moves::{Axis, Rotation};
use blocky::players::human::InputEvent;
use blocky::random::SeededRandomGenerator;
use blocky::render::TextRenderer;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blocky=info")))
        .init();

    // Two smart players play ten rounds on their own
    let mut game = Game::from_config(GameConfig::auto_game()).unwrap();
    let summary = game.run().unwrap();
    for (i, (goal, score)) in summary.goals.iter().zip(&summary.scores).enumerate() {
        println!("Player {}: {goal}, score {score}", i + 1);
    }
    println!("Winner is player {}!", summary.winner + 1);

    // A scripted human against a random player, drawn as text
    let config = GameConfig {
        board_width: 16,
        max_depth: 2,
        rounds: 2,
        human_players: 1,
        random_players: 1,
        ..GameConfig::default()
    };
    let mut game = Game::builder(config)
        .with_random_generator(SeededRandomGenerator::new(507))
        .with_renderer(TextRenderer::stdout())
        .build()
        .unwrap();
    game.run();

    let script = [
        InputEvent::PointerMove(Point::new(12, 3)),
        InputEvent::LevelDown,
        InputEvent::Rotate(Rotation::Clockwise),
        InputEvent::PointerMove(Point::new(2, 14)),
        InputEvent::LevelDown,
        InputEvent::Swap(Axis::Vertical),
    ];
    for event in script {
        if game.is_finished() {
            break;
        }
        let outcome = game.handle_input(event).unwrap();
        println!("{event:?} -> {outcome:?}");
    }

    if let Some(summary) = game.summary() {
        println!("Final scores: {:?}, winner is player {}", summary.scores, summary.winner + 1);
    }
}
