use crate::block::Colour;
use crate::config::GameConfig;
use crate::error::{ConfigError, GameError};
use crate::goal::{Goal, GoalKind};
use crate::moves::Move;
use crate::player::{AppliedMove, MoveOutcome, Player, Strategy};
use crate::players::human::{HumanPlayer, InputEvent, InputOutcome};
use crate::players::random_player::RandomPlayer;
use crate::players::smart::SmartPlayer;
use crate::random::{RandomGenerator, SeededRandomGenerator};
use crate::render::{NullRenderer, Renderer};
use crate::tree::BlockTree;
use tracing::info;

/// A game of Blocky: one board, a ring of players and a fixed number of rounds.
///
/// The game is a state machine. `execute_action` performs one transition, `play_turn` runs
/// one whole turn and `run` keeps going until the game ends or a human has to act. Human
/// input is pushed in through `handle_input`.
pub struct Game<K: RandomGenerator> {
    tree: BlockTree,
    players: Vec<Player>,
    random: K,
    renderer: Box<dyn Renderer>,
    total_turns: usize,
    state: GameState,
    waiting_for_input: bool,
    history: Vec<TurnReport>,
    summary: Option<GameSummary>,
}

/// A builder for `Game`.
///
/// Without an explicit tree or goals the builder generates them from the random generator:
/// first the goal kind shared by all players, then the board, then one colour per player.
pub struct GameBuilder<K: RandomGenerator> {
    config: GameConfig,
    random_generator: K,
    renderer: Box<dyn Renderer>,
    tree: Option<BlockTree>,
    goals: Option<Vec<Goal>>,
}

impl<K: RandomGenerator> GameBuilder<K> {
    /// Creates a builder with a default generator and no renderer.
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            random_generator: K::default(),
            renderer: Box::new(NullRenderer),
            tree: None,
            goals: None,
        }
    }

    /// Sets the random number generator for the game.
    pub fn with_random_generator(mut self, rg: K) -> Self {
        self.random_generator = rg;
        self
    }

    /// Sets the renderer called after every change.
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Plays on this board instead of a generated one. Its width and depth must match the
    /// config.
    pub fn with_tree(mut self, tree: BlockTree) -> Self {
        self.tree = Some(tree);
        self
    }

    /// One goal per player, in seat order.
    pub fn with_goals(mut self, goals: Vec<Goal>) -> Self {
        self.goals = Some(goals);
        self
    }

    /// Builds the game, generating whatever was not supplied.
    pub fn build(self) -> Result<Game<K>, GameError> {
        let GameBuilder {
            config,
            mut random_generator,
            renderer,
            tree,
            goals,
        } = self;
        config.validate()?;
        let player_count = config.player_count();

        let kind = match config.goal {
            Some(kind) => kind,
            None => *random_generator.get_random_from_slice(&GoalKind::ALL),
        };
        let tree = match tree {
            Some(tree) if tree.board_width() != config.board_width || tree.max_depth() != config.max_depth => {
                return Err(ConfigError::TreeMismatch {
                    board_width: tree.board_width(),
                    max_depth: tree.max_depth(),
                    expected_width: config.board_width,
                    expected_depth: config.max_depth,
                }
                .into());
            }
            Some(tree) => tree,
            None => BlockTree::random(config.board_width, config.max_depth, &mut random_generator)?,
        };
        let goals = match goals {
            Some(goals) if goals.len() != player_count => {
                return Err(ConfigError::GoalCount {
                    expected: player_count,
                    got: goals.len(),
                }
                .into());
            }
            Some(goals) => goals,
            None => (0..player_count)
                .map(|_| Goal::new(kind, *random_generator.get_random_from_slice(&Colour::ALL)))
                .collect(),
        };

        let strategies = (0..config.human_players)
            .map(|_| Strategy::Human(HumanPlayer::new(config.max_smashes)))
            .chain((0..config.random_players).map(|_| Strategy::Random(RandomPlayer::new())))
            .chain(
                config
                    .smart_players
                    .iter()
                    .map(|&difficulty| Strategy::Smart(SmartPlayer::with_budgets(difficulty, &config.difficulty_budgets))),
            );
        let players: Vec<Player> = goals
            .into_iter()
            .zip(strategies)
            .enumerate()
            .map(|(id, (goal, strategy))| Player::new(id, goal, strategy))
            .collect();

        for player in &players {
            info!(
                player = player.id() + 1,
                strategy = player.strategy().label(),
                goal = %player.goal(),
                "{}",
                player.goal().description()
            );
        }

        let mut game = Game {
            tree,
            players,
            random: random_generator,
            renderer,
            total_turns: config.total_turns(),
            state: GameState::AwaitingMove { player: 0, turn: 0 },
            waiting_for_input: false,
            history: Vec::with_capacity(config.total_turns()),
            summary: None,
        };
        game.draw();
        Ok(game)
    }
}

impl Game<SeededRandomGenerator> {
    /// Builds a game driven by a seeded generator. Uses `config.seed` when set, a fresh
    /// random seed otherwise.
    pub fn from_config(config: GameConfig) -> Result<Self, GameError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, "starting game");
        Self::builder(config)
            .with_random_generator(SeededRandomGenerator::new(seed))
            .build()
    }
}

impl<K: RandomGenerator> Game<K> {
    /// Returns a new builder for `Game`.
    pub fn builder(config: GameConfig) -> GameBuilder<K> {
        GameBuilder::new(config)
    }

    /// Current state of the turn machine.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// The board.
    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    /// Players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// One report per completed turn, in order.
    pub fn history(&self) -> &[TurnReport] {
        &self.history
    }

    /// Final result, available once the game is over.
    pub fn summary(&self) -> Option<&GameSummary> {
        self.summary.as_ref()
    }

    /// Whether the game reached a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, GameState::Terminal { .. })
    }

    /// Whether the player to move is a human whose turn has started.
    pub fn is_waiting_for_input(&self) -> bool {
        self.waiting_for_input
    }

    /// Performs one state transition. Does nothing while waiting for human input or after
    /// the game ended.
    pub fn execute_action(&mut self) {
        match self.state {
            GameState::AwaitingMove { player, turn } => {
                if self.waiting_for_input {
                    return;
                }
                self.renderer.draw(&self.tree, Some(player));
                match self.players[player].make_move(&mut self.tree, &mut self.random) {
                    MoveOutcome::Moved(applied) => {
                        self.renderer.draw(&self.tree, Some(player));
                        self.state = GameState::Scoring {
                            player,
                            turn,
                            applied: Some(applied),
                        };
                    }
                    MoveOutcome::Passed => {
                        self.state = GameState::Scoring {
                            player,
                            turn,
                            applied: None,
                        };
                    }
                    MoveOutcome::AwaitingInput => {
                        self.renderer.draw(&self.tree, Some(player));
                        self.waiting_for_input = true;
                    }
                    MoveOutcome::Quit => self.finish(TerminalReason::Quit),
                }
            }
            GameState::Scoring { player, turn, applied } => {
                let score = self.players[player].score(&self.tree);
                let round = turn / self.players.len();
                info!(player = player + 1, turn = turn + 1, round = round + 1, score, "turn complete");
                self.history.push(TurnReport {
                    player,
                    turn,
                    round,
                    applied,
                    score,
                });
                if applied.is_some_and(|applied| applied.mv == Move::Smash) {
                    self.tree = self.tree.compacted();
                }
                if turn + 1 >= self.total_turns {
                    self.finish(TerminalReason::RoundsComplete);
                } else {
                    self.state = GameState::AwaitingMove {
                        player: (player + 1) % self.players.len(),
                        turn: turn + 1,
                    };
                }
            }
            GameState::Terminal { .. } => {}
        }
    }

    /// Runs the current turn to its end: the next player is up, the game ended, or a human
    /// has to act.
    pub fn play_turn(&mut self) {
        let Some(start) = self.state.turn() else {
            return;
        };
        while !self.is_finished() && !self.waiting_for_input {
            self.execute_action();
            if matches!(self.state, GameState::AwaitingMove { turn, .. } if turn != start) {
                break;
            }
        }
    }

    /// Plays until the game ends or a human has to act.
    pub fn run(&mut self) -> Option<&GameSummary> {
        while !self.is_finished() && !self.waiting_for_input {
            self.play_turn();
        }
        self.summary.as_ref()
    }

    /// Feeds one input event to the human player whose turn it is. A completed move is
    /// scored and the game then runs on until input is needed again.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<InputOutcome, GameError> {
        let GameState::AwaitingMove { player, turn } = self.state else {
            return Err(GameError::GameOver);
        };
        if !self.players[player].is_human() {
            return Err(GameError::NotHumanTurn { player });
        }
        if !self.waiting_for_input {
            self.execute_action();
        }
        let Some(human) = self.players[player].human_mut() else {
            return Err(GameError::NotHumanTurn { player });
        };
        let outcome = human.process_event(&mut self.tree, event, &mut self.random);
        match outcome {
            InputOutcome::Selected { .. } => self.renderer.draw(&self.tree, Some(player)),
            InputOutcome::Rejected(_) => {}
            InputOutcome::Moved(applied) => {
                self.renderer.draw(&self.tree, Some(player));
                self.waiting_for_input = false;
                self.state = GameState::Scoring {
                    player,
                    turn,
                    applied: Some(applied),
                };
                self.run();
            }
            InputOutcome::Quit => {
                self.waiting_for_input = false;
                self.finish(TerminalReason::Quit);
            }
        }
        Ok(outcome)
    }

    fn finish(&mut self, reason: TerminalReason) {
        let scores: Vec<u32> = self.players.iter().map(|player| player.score(&self.tree)).collect();
        let winner = pick_winner(&scores);
        info!(?reason, ?scores, winner = winner + 1, "game over");
        self.summary = Some(GameSummary {
            goals: self.players.iter().map(|player| *player.goal()).collect(),
            scores,
            winner,
            reason,
        });
        self.state = GameState::Terminal { reason };
        self.renderer.draw(&self.tree, None);
    }

    fn draw(&mut self) {
        let active = self.state.player();
        self.renderer.draw(&self.tree, active);
    }
}

/// Index of the highest score. Ties go to the lowest index.
pub fn pick_winner(scores: &[u32]) -> usize {
    let mut winner = 0;
    for (index, score) in scores.iter().enumerate() {
        if *score > scores[winner] {
            winner = index;
        }
    }
    winner
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// `player` is to move in global turn `turn`, counted from 0 across all rounds.
    AwaitingMove { player: usize, turn: usize },
    /// The move is done and the mover's score is about to be recorded.
    Scoring {
        player: usize,
        turn: usize,
        /// `None` when the player passed.
        applied: Option<AppliedMove>,
    },
    Terminal { reason: TerminalReason },
}

impl GameState {
    /// Seat of the player whose turn it is, if any.
    pub fn player(&self) -> Option<usize> {
        match self {
            GameState::AwaitingMove { player, .. } | GameState::Scoring { player, .. } => Some(*player),
            GameState::Terminal { .. } => None,
        }
    }

    /// Global turn index, if the game is still running.
    pub fn turn(&self) -> Option<usize> {
        match self {
            GameState::AwaitingMove { turn, .. } | GameState::Scoring { turn, .. } => Some(*turn),
            GameState::Terminal { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalReason {
    RoundsComplete,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub player: usize,
    pub turn: usize,
    pub round: usize,
    /// Block ids are those of the board at the time of the move. The board is compacted
    /// after every smash, which renumbers its blocks.
    pub applied: Option<AppliedMove>,
    /// The mover's score right after the move.
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub scores: Vec<u32>,
    pub winner: usize,
    pub reason: TerminalReason,
    pub goals: Vec<Goal>,
}
