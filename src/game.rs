use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::render::Snapshot;
use crate::snake::{Cell, Direction, Snake};
use crate::timing::tick_interval;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Wall,
    SelfCollision,
    BoardFilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Skipped,
    Moved,
    Ate { score: u32 },
    Ended(EndReason),
}

/// All state of one game. A reset builds a new value instead of patching
/// a finished one.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    snake: Snake,
    direction: Direction,
    pending_direction: Direction,
    food: Cell,
    score: u32,
    phase: Phase,
    end_reason: Option<EndReason>,
}

impl GameState {
    pub fn new<R: Rng>(config: &GameConfig, rng: &mut R) -> Self {
        let center = Cell::new(config.grid_width / 2, config.grid_height / 2);
        let snake = Snake::new(center, config.initial_snake_length, Direction::Right);

        match place_food(config, &snake, rng) {
            Some(food) => {
                info!(width = config.grid_width, height = config.grid_height, "new game");
                GameState::from_parts(config, snake, Direction::Right, food)
            }
            None => {
                // Only reachable when the starting snake already fills the grid.
                let food = snake.head();
                let mut state = GameState::from_parts(config, snake, Direction::Right, food);
                state.finish(EndReason::BoardFilled);
                state
            }
        }
    }

    pub fn from_parts(config: &GameConfig, snake: Snake, direction: Direction, food: Cell) -> Self {
        GameState {
            config: config.clone(),
            snake,
            direction,
            pending_direction: direction,
            food,
            score: 0,
            phase: Phase::Running,
            end_reason: None,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn tick_interval(&self) -> Duration {
        tick_interval(&self.config, self.score)
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, cell: Cell) {
        self.food = cell;
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: &self.snake,
            food: self.food,
            score: self.score,
            phase: self.phase,
            end_reason: self.end_reason,
        }
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.config.grid_width).contains(&cell.x) && (0..self.config.grid_height).contains(&cell.y)
    }

    /// Buffers a turn for the next tick. A reversal of the current heading
    /// (not the pending one) is ignored, as is any request while not running.
    /// Returns whether the request was taken.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.phase != Phase::Running || direction.is_opposite(self.direction) {
            return false;
        }

        if self.pending_direction != direction {
            debug!(?direction, "direction queued");
        }
        self.pending_direction = direction;
        true
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            Phase::GameOver => return,
        };
        info!(phase = ?self.phase, "pause toggled");
    }

    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Skipped;
        }

        self.direction = self.pending_direction;
        let new_head = self.snake.head().step(self.direction);

        if !self.in_bounds(new_head) {
            return self.finish(EndReason::Wall);
        }

        // Checked against the full body, tail included: the tail has not
        // moved out of the way yet.
        if self.snake.contains(new_head) {
            return self.finish(EndReason::SelfCollision);
        }

        self.snake.push_head(new_head);

        if new_head != self.food {
            self.snake.pop_tail();
            return TickOutcome::Moved;
        }

        self.score += 1;
        debug!(score = self.score, x = new_head.x, y = new_head.y, "food eaten");

        match place_food(&self.config, &self.snake, rng) {
            Some(food) => {
                self.food = food;
                TickOutcome::Ate { score: self.score }
            }
            None => self.finish(EndReason::BoardFilled),
        }
    }

    fn finish(&mut self, reason: EndReason) -> TickOutcome {
        self.phase = Phase::GameOver;
        self.end_reason = Some(reason);
        info!(?reason, score = self.score, length = self.snake.len(), "game over");
        TickOutcome::Ended(reason)
    }
}

/// Uniformly random free cell, or `None` once the snake covers the grid.
pub fn place_food<R: Rng>(config: &GameConfig, snake: &Snake, rng: &mut R) -> Option<Cell> {
    if snake.len() >= config.grid_area() {
        return None;
    }

    loop {
        let cell = Cell::new(
            rng.gen_range(0..config.grid_width),
            rng.gen_range(0..config.grid_height),
        );

        if !snake.contains(cell) {
            return Some(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use Direction::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5EED)
    }

    fn cells(state: &GameState) -> Vec<(i32, i32)> {
        state.snake().cells().map(|c| (c.x, c.y)).collect()
    }

    fn state_with(cells: Vec<(i32, i32)>, direction: Direction, food: (i32, i32)) -> GameState {
        GameState::from_parts(
            &GameConfig::default(),
            Snake::from_cells(cells),
            direction,
            food.into(),
        )
    }

    #[test]
    fn test_new_game() {
        let state = GameState::new(&GameConfig::default(), &mut rng());

        assert_eq!(state.phase(), Phase::Running);
        assert_eq!(state.score(), 0);
        assert_eq!(state.direction(), Right);
        assert_eq!(state.pending_direction(), Right);
        assert_eq!(cells(&state), vec![(12, 12), (11, 12), (10, 12)]);
        assert!(!state.snake().contains(state.food()));
        assert!(state.in_bounds(state.food()));
        assert_eq!(state.tick_interval(), Duration::from_millis(140));
    }

    #[test]
    fn test_basic_movement() {
        let mut state = state_with(vec![(5, 5), (4, 5), (3, 5)], Right, (20, 20));

        assert_eq!(state.tick(&mut rng()), TickOutcome::Moved);
        assert_eq!(cells(&state), vec![(6, 5), (5, 5), (4, 5)]);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_food_consumption() {
        let mut state = state_with(vec![(12, 12), (11, 12), (10, 12)], Right, (13, 12));

        assert_eq!(state.tick(&mut rng()), TickOutcome::Ate { score: 1 });
        assert_eq!(cells(&state), vec![(13, 12), (12, 12), (11, 12), (10, 12)]);
        assert_eq!(state.score(), 1);
        assert_ne!(state.food(), Cell::new(13, 12));
        assert!(!state.snake().contains(state.food()));
    }

    #[test]
    fn test_wall_collision_leaves_snake_unchanged() {
        let mut state = state_with(vec![(23, 12), (22, 12), (21, 12)], Right, (0, 0));

        assert_eq!(state.tick(&mut rng()), TickOutcome::Ended(EndReason::Wall));
        assert_eq!(state.phase(), Phase::GameOver);
        assert_eq!(state.end_reason(), Some(EndReason::Wall));
        assert_eq!(cells(&state), vec![(23, 12), (22, 12), (21, 12)]);
    }

    #[test]
    fn test_wall_collision_on_every_side() {
        for (head, direction) in [((0, 5), Left), ((5, 0), Up), ((5, 23), Down), ((23, 5), Right)] {
            let snake = Snake::new(head.into(), 1, direction);
            let mut state = GameState::from_parts(&GameConfig::default(), snake, direction, (12, 12).into());
            assert_eq!(state.tick(&mut rng()), TickOutcome::Ended(EndReason::Wall));
        }
    }

    #[test]
    fn test_self_collision() {
        // Heading up; turning left runs into (4, 6), which is mid-body.
        let mut state = state_with(
            vec![(5, 6), (5, 7), (4, 7), (4, 6), (4, 5), (5, 5)],
            Up,
            (20, 20),
        );

        assert!(state.set_direction(Left));
        assert_eq!(state.tick(&mut rng()), TickOutcome::Ended(EndReason::SelfCollision));
        assert_eq!(state.phase(), Phase::GameOver);
        assert_eq!(state.snake().len(), 6);
    }

    #[test]
    fn test_moving_into_the_tail_cell_collides() {
        // (4, 5) is the tail and would be vacated this tick, but still counts.
        let mut state = state_with(
            vec![(5, 5), (5, 6), (5, 7), (4, 7), (4, 6), (4, 5)],
            Up,
            (20, 20),
        );

        assert!(state.set_direction(Left));
        assert_eq!(state.tick(&mut rng()), TickOutcome::Ended(EndReason::SelfCollision));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut state = GameState::new(&GameConfig::default(), &mut rng());

        assert!(!state.set_direction(Left));
        assert_eq!(state.pending_direction(), Right);

        state.tick(&mut rng());
        assert_eq!(state.direction(), Right);
    }

    #[test]
    fn test_reversal_is_checked_against_current_direction() {
        let mut state = state_with(vec![(5, 5), (4, 5), (3, 5)], Right, (20, 20));

        // Up is queued, but the snake still heads right, so Left stays illegal.
        assert!(state.set_direction(Up));
        assert!(!state.set_direction(Left));
        assert_eq!(state.pending_direction(), Up);

        // The last valid request before the tick wins.
        assert!(state.set_direction(Down));
        state.tick(&mut rng());
        assert_eq!(state.direction(), Down);
        assert_eq!(state.snake().head(), Cell::new(5, 6));
    }

    #[test]
    fn test_direction_takes_effect_on_next_tick() {
        let mut state = state_with(vec![(5, 5), (4, 5), (3, 5)], Right, (20, 20));

        state.set_direction(Down);
        assert_eq!(state.direction(), Right);
        assert_eq!(state.snake().head(), Cell::new(5, 5));

        state.tick(&mut rng());
        assert_eq!(state.direction(), Down);
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = GameState::new(&GameConfig::default(), &mut rng());

        state.toggle_pause();
        assert_eq!(state.phase(), Phase::Paused);
        assert_eq!(state.tick(&mut rng()), TickOutcome::Skipped);
        assert!(!state.set_direction(Up));

        state.toggle_pause();
        assert_eq!(state.phase(), Phase::Running);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = state_with(vec![(23, 12), (22, 12)], Right, (0, 0));
        state.tick(&mut rng());

        state.toggle_pause();
        assert_eq!(state.phase(), Phase::GameOver);
        assert!(!state.set_direction(Up));
        assert_eq!(state.tick(&mut rng()), TickOutcome::Skipped);
    }

    #[test]
    fn test_speeds_up_with_score() {
        let mut state = state_with(vec![(0, 0)], Right, (1, 0));
        let mut rng = rng();

        for _ in 0..4 {
            // Feed the snake one cell ahead each tick.
            state.set_food(state.snake().head().step(Right));
            assert!(matches!(state.tick(&mut rng), TickOutcome::Ate { .. }));
        }

        assert_eq!(state.score(), 4);
        assert_eq!(state.tick_interval(), Duration::from_millis(132));
    }

    #[test]
    fn test_board_filled_ends_game() {
        let config = GameConfig {
            initial_snake_length: 1,
            ..GameConfig::with_grid(2, 1)
        };
        let mut state = GameState::from_parts(&config, Snake::from_cells(vec![(0, 0)]), Right, (1, 0).into());

        assert_eq!(state.tick(&mut rng()), TickOutcome::Ended(EndReason::BoardFilled));
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake().len(), 2);
        assert_eq!(state.phase(), Phase::GameOver);
    }

    #[test]
    fn test_place_food_avoids_snake() {
        let config = GameConfig::with_grid(4, 4);
        let snake = Snake::from_cells((0..4).map(|x| (x, 0)).chain((0..4).map(|x| (3 - x, 1))));
        let mut rng = rng();

        for _ in 0..200 {
            let food = place_food(&config, &snake, &mut rng).unwrap();
            assert!(!snake.contains(food));
            assert!((2..4).contains(&food.y));
        }
    }

    #[test]
    fn test_place_food_on_full_grid() {
        let config = GameConfig::with_grid(2, 2);
        let snake = Snake::from_cells(vec![(0, 0), (1, 0), (1, 1), (0, 1)]);
        assert_eq!(place_food(&config, &snake, &mut rng()), None);
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut rng = rng();
        let mut state = GameState::new(&GameConfig::with_grid(10, 10), &mut rng);
        let turns = [Up, Left, Down, Right];

        for step in 0..2_000 {
            if state.phase() == Phase::GameOver {
                state = GameState::new(&GameConfig::with_grid(10, 10), &mut rng);
            }

            let before_len = state.snake().len();
            let before_score = state.score();
            state.set_direction(turns[rng.gen_range(0..turns.len())]);

            match state.tick(&mut rng) {
                TickOutcome::Moved => assert_eq!(state.snake().len(), before_len),
                TickOutcome::Ate { score } => {
                    assert_eq!(score, before_score + 1);
                    assert_eq!(state.snake().len(), before_len + 1);
                }
                TickOutcome::Ended(_) => assert_eq!(state.snake().len(), before_len),
                TickOutcome::Skipped => panic!("running game skipped tick {}", step),
            }

            let unique: HashSet<Cell> = state.snake().cells().collect();
            assert_eq!(unique.len(), state.snake().len());
            if state.phase() == Phase::Running {
                assert!(!state.snake().contains(state.food()));
            }
        }
    }
}
