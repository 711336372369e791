use crate::ball::{Ball, BallId};
use crate::config::GameConfig;
use crate::hand::{Hand, HandSide};
use crate::respawn::RespawnScheduler;
use crate::score::Score;

/// All mutable game state, owned by the frame loop and handed to each
/// subsystem in turn.
#[derive(Debug, Clone)]
pub struct GameState<H> {
    pub hands: [Hand; 2],
    /// The simulated ball, active or already thrown/scored
    pub ball: Option<Ball<H>>,
    pub score: Score,
    pub respawn: RespawnScheduler,
    /// Simulated seconds since start
    pub elapsed: f64,
    pub frame: u64,
    next_ball_id: u64,
}

impl<H> GameState<H> {
    pub fn new(config: &GameConfig) -> Self {
        let rate = config.steps_per_second();
        Self {
            hands: HandSide::ALL.map(|side| Hand::new(side, config.history_len, rate)),
            ball: None,
            score: Score::default(),
            respawn: RespawnScheduler::new(),
            elapsed: 0.0,
            frame: 0,
            next_ball_id: 1,
        }
    }

    pub fn hand(&self, side: HandSide) -> &Hand {
        &self.hands[side.index()]
    }

    pub fn hand_mut(&mut self, side: HandSide) -> &mut Hand {
        &mut self.hands[side.index()]
    }

    /// The ball that can currently be grabbed and scored with.
    pub fn active_ball(&self) -> Option<&Ball<H>> {
        self.ball.as_ref().filter(|b| b.is_active())
    }

    pub fn active_ball_mut(&mut self) -> Option<&mut Ball<H>> {
        self.ball.as_mut().filter(|b| b.is_active())
    }

    pub(crate) fn allocate_ball_id(&mut self) -> BallId {
        let id = BallId(self.next_ball_id);
        self.next_ball_id += 1;
        id
    }

    /// Break the hold between `side` and whatever it holds, on both ends.
    pub(crate) fn unlink_hand(&mut self, side: HandSide) {
        let hand = &mut self.hands[side.index()];
        let held = hand.held.take();
        if let (Some(id), Some(ball)) = (held, self.ball.as_mut()) {
            if ball.id == id && ball.held_by == Some(side) {
                ball.held_by = None;
            }
        }
    }

    /// Hand `holding` flags and the ball's `held_by` agree: at most one hand
    /// holds, and a holding hand always points at the ball that points back.
    pub fn hold_links_consistent(&self) -> bool {
        let holders: Vec<&Hand> = self.hands.iter().filter(|h| h.is_holding()).collect();
        match (&self.ball, holders.as_slice()) {
            (None, []) => true,
            (None, _) => false,
            (Some(ball), []) => ball.held_by.is_none(),
            (Some(ball), [hand]) => hand.held == Some(ball.id) && ball.held_by == Some(hand.side),
            (Some(_), _) => false,
        }
    }
}
