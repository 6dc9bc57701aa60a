use crate::agent::{Agent, AgentConfig, AgentStatus};
use crate::arena::Arena;
use crate::config;
use crate::error::{Result, SimError};
use crate::head::HeadMotion;
use crate::types::{Action, Point};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Destroyed { tick: u32 },
    TimedOut,
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub tick: u32,
    pub collided: bool, // Move was rolled back
    pub head: HeadMotion,
    pub nearest: Option<f64>,
    pub status: AgentStatus,
}

/// Headless driver: the RTK agent moves and scans while an opponent unit
/// turns its turret toward it.
pub struct Simulation {
    pub arena: Arena,
    pub agent: Agent,
    pub opponent: Agent,
    pub tick: u32,
    pub max_ticks: u32,
    rng: StdRng,
    outcome: Option<Outcome>,
}

impl Simulation {
    /// Places both units at random free positions, out of capture range of each other
    pub fn new(arena: Arena, agent_config: AgentConfig, max_ticks: u32, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let (start, opponent_start) = spawn_pair(&arena, &mut rng)?;

        let agent = Agent::with_seed(1, start, agent_config.clone(), seed)?;
        let opponent = Agent::with_seed(2, opponent_start, agent_config, seed.wrapping_add(1))?;
        info!(
            "Arena {}x{}: agent at ({:.1}, {:.1}), opponent at ({:.1}, {:.1})",
            arena.width, arena.height, start.x, start.y, opponent_start.x, opponent_start.y
        );

        Ok(Simulation {
            arena,
            agent,
            opponent,
            tick: 0,
            max_ticks,
            rng,
            outcome: None,
        })
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Advances one tick: drive, roll back blocked moves, track, scan, check capture
    pub fn step(&mut self, action: Action) -> Result<StepReport> {
        self.agent.update(action)?;
        let collided = self.arena.is_blocked(self.agent.position());
        if collided {
            self.agent.rollback();
        }

        let head = self.agent.update_head(self.opponent.position())?;
        self.opponent.update_head(self.agent.position())?;

        let nearest = self.agent.scan(&self.arena)?.nearest().map(|r| r.distance);
        self.tick += 1;

        if self.agent.distance(self.opponent.position()) < config::CAPTURE_RADIUS {
            self.agent.destroy();
            self.outcome = Some(Outcome::Destroyed { tick: self.tick });
        } else if self.tick >= self.max_ticks {
            self.outcome = Some(Outcome::TimedOut);
        }

        crate::debug_sim!(
            self.tick,
            "collided={} head={:?} nearest={:?} status={:?}",
            collided,
            head,
            nearest,
            self.agent.status
        );

        Ok(StepReport {
            tick: self.tick,
            collided,
            head,
            nearest,
            status: self.agent.status,
        })
    }

    /// Steps until the run ends, asking `policy` for each action
    pub fn run<F>(&mut self, mut policy: F) -> Result<Outcome>
    where
        F: FnMut(&Agent, &mut StdRng) -> Action,
    {
        info!("Running for at most {} ticks", self.max_ticks);
        let mut collisions = 0u32;
        loop {
            if self.outcome.is_none() && self.tick >= self.max_ticks {
                self.outcome = Some(Outcome::TimedOut);
            }
            if let Some(outcome) = self.outcome {
                info!(
                    "Finished after {} ticks ({:?}), {} blocked moves",
                    self.tick, outcome, collisions
                );
                return Ok(outcome);
            }
            let action = policy(&self.agent, &mut self.rng);
            if self.step(action)?.collided {
                collisions += 1;
            }
        }
    }

    /// Moves both units to new free positions and clears the outcome
    pub fn reset(&mut self) -> Result<()> {
        let (start, opponent_start) = spawn_pair(&self.arena, &mut self.rng)?;
        self.agent.reset(start)?;
        self.opponent.reset(opponent_start)?;
        self.tick = 0;
        self.outcome = None;
        info!("Simulation reset");
        Ok(())
    }
}

// Two free start positions at least twice the capture radius apart
fn spawn_pair(arena: &Arena, rng: &mut StdRng) -> Result<(Point, Point)> {
    let clearance = config::CAPTURE_RADIUS;
    let start = arena.random_free_position(rng, clearance)?;
    for _ in 0..config::FREE_CELL_ATTEMPTS {
        let candidate = arena.random_free_position(rng, clearance)?;
        if candidate.distance(&start) >= 2.0 * clearance {
            return Ok((start, candidate));
        }
    }
    Err(SimError::InvalidConfiguration(format!(
        "no start position {:.1} px away from ({:.1}, {:.1}) after {} attempts",
        2.0 * clearance,
        start.x,
        start.y,
        config::FREE_CELL_ATTEMPTS
    )))
}
