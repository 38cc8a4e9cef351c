//! Train construction and the scheduling loop

use core::mem;

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use super::regulator::Regulator;
use super::stage::Stage;
use super::state::{Outcome, TrainEvent, TrainState};
use super::summary::Summary;
use crate::actuator::{Actuator, ActuatorId, Effector};
use crate::config::{TrainConfig, MAX_ACTUATORS, MAX_STAGES, MAX_STAGE_MEMBERS};
use crate::error::{ActuatorError, TrainError};

/// Ordered stages of actuators plus the loop that drives them
///
/// Actuators live in a single arena owned by the train; stages hold
/// handles into it. Actuators are appended to the open stage with
/// [`Train::add`] and the open stage is sealed with [`Train::build`].
pub struct Train<'r, E> {
    /// Loop rate and tolerance presets
    config: TrainConfig,
    /// Cross-thread ignition/extinguish signal
    regulator: &'r Regulator,
    /// Every actuator of every stage, open stage last
    actuators: Vec<Actuator<E>, MAX_ACTUATORS>,
    /// Sealed stages in execution order
    stages: Vec<Stage, MAX_STAGES>,
    /// Stage under construction
    open: Stage,
    /// Lifecycle state
    state: TrainState,
    /// Index of the stage executed last (or about to be)
    stage_index: usize,
}

impl<'r, E: Effector> Train<'r, E> {
    /// Create an empty train
    pub fn new(config: TrainConfig, regulator: &'r Regulator) -> Result<Self, TrainError> {
        config.validate()?;
        Ok(Self {
            config,
            regulator,
            actuators: Vec::new(),
            stages: Vec::new(),
            open: Stage::new(),
            state: TrainState::Idle,
            stage_index: 0,
        })
    }

    /// Scheduler configuration
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// The regulator this train reports to
    pub fn regulator(&self) -> &'r Regulator {
        self.regulator
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Append an actuator to the open stage
    ///
    /// Resolves the default tolerance and clamps the update rate to the
    /// base loop rate.
    pub fn add(&mut self, mut actuator: Actuator<E>) -> Result<ActuatorId, TrainError> {
        self.ensure_parked()?;

        let duplicate = self
            .open
            .members()
            .iter()
            .any(|id| self.actuators[id.index()].name() == actuator.name());
        if duplicate {
            return Err(TrainError::DuplicateName);
        }
        if self.open.is_full() || self.actuators.is_full() {
            return Err(TrainError::CapacityExceeded);
        }

        actuator.attach(self.config.base_loop_hz, self.config.default_tolerance);
        let id = ActuatorId(self.actuators.len() as u8);
        self.actuators
            .push(actuator)
            .map_err(|_| TrainError::CapacityExceeded)?;
        self.open.push(id)?;
        Ok(id)
    }

    /// Seal the open stage and start a new one
    ///
    /// Returns the index of the sealed stage. An empty open stage is
    /// rejected and left as is.
    pub fn build(&mut self) -> Result<usize, TrainError> {
        self.ensure_parked()?;

        if self.open.is_empty() {
            warn!("an empty stage cannot be built");
            return Err(TrainError::EmptyStage);
        }
        if self.stages.is_full() {
            return Err(TrainError::CapacityExceeded);
        }

        let index = self.stages.len();
        let stage = mem::take(&mut self.open);
        self.stages
            .push(stage)
            .map_err(|_| TrainError::CapacityExceeded)?;
        debug!("sealed stage {}", index);
        Ok(index)
    }

    /// Seal whatever remains in the open stage
    ///
    /// Safe to call with an empty open stage. Returns the number of
    /// sealed stages.
    pub fn build_train(&mut self) -> Result<usize, TrainError> {
        if !self.open.is_empty() {
            self.build()?;
        }
        info!(
            "train built: {} stages, {} actuators",
            self.stages.len(),
            self.actuators.len()
        );
        Ok(self.stages.len())
    }

    /// Drop every actuator added since the last seal
    pub fn clear_open_stage(&mut self) -> Result<(), TrainError> {
        self.ensure_parked()?;

        // open stage actuators are always the tail of the arena
        if let Some(first) = self.open.members().first() {
            self.actuators.truncate(first.index());
        }
        self.open.clear();
        Ok(())
    }

    /// Move another train's stages and actuators behind this train's
    ///
    /// Sealed stages of `other` follow this train's sealed stages in
    /// order; actuators of `other`'s open stage join this train's open
    /// stage. Handles previously returned by `add` on either train are
    /// invalidated. Returns the number of sealed stages afterward.
    pub fn append(&mut self, other: Train<'_, E>) -> Result<usize, TrainError> {
        self.ensure_parked()?;
        other.ensure_parked()?;

        if self.actuators.len() + other.actuators.len() > MAX_ACTUATORS
            || self.stages.len() + other.stages.len() > MAX_STAGES
            || self.open.len() + other.open.len() > MAX_STAGE_MEMBERS
        {
            return Err(TrainError::CapacityExceeded);
        }
        let duplicate = other.open.members().iter().any(|theirs| {
            let name = other.actuators[theirs.index()].name();
            self.open
                .members()
                .iter()
                .any(|ours| self.actuators[ours.index()].name() == name)
        });
        if duplicate {
            return Err(TrainError::DuplicateName);
        }

        // arena layout afterward: our sealed, their sealed, our open, their open
        let base = self.actuators.len();
        let open_start = first_index(&self.open, base);
        let their_open_start = first_index(&other.open, other.actuators.len());
        let rebase = |id: &ActuatorId| {
            if id.index() < their_open_start {
                ActuatorId((open_start + id.index()) as u8)
            } else {
                ActuatorId((base + id.index()) as u8)
            }
        };

        let mut open = Stage::new();
        for id in self.open.members() {
            open.push(ActuatorId((id.index() + their_open_start) as u8))?;
        }
        for id in other.open.members() {
            open.push(rebase(id))?;
        }
        let mut stages: Vec<Stage, MAX_STAGES> = Vec::new();
        for theirs in other.stages.iter() {
            let mut stage = Stage::new();
            for id in theirs.members() {
                stage.push(rebase(id))?;
            }
            stages
                .push(stage)
                .map_err(|_| TrainError::CapacityExceeded)?;
        }

        for (i, mut actuator) in other.actuators.into_iter().enumerate() {
            actuator.attach(self.config.base_loop_hz, self.config.default_tolerance);
            let placed = if i < their_open_start {
                self.actuators.insert(open_start + i, actuator)
            } else {
                self.actuators.push(actuator)
            };
            placed.map_err(|_| TrainError::CapacityExceeded)?;
        }
        for stage in stages {
            self.stages
                .push(stage)
                .map_err(|_| TrainError::CapacityExceeded)?;
        }
        self.open = open;

        debug!(
            "appended train: {} stages, {} actuators",
            self.stages.len(),
            self.actuators.len()
        );
        Ok(self.stages.len())
    }

    fn ensure_parked(&self) -> Result<(), TrainError> {
        if self.state.is_running() {
            return Err(TrainError::Ignited);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Number of sealed stages
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Number of actuators in the open stage
    pub fn open_stage_len(&self) -> usize {
        self.open.len()
    }

    /// Sealed stage at `index`
    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Actuator behind a handle
    pub fn actuator(&self, id: ActuatorId) -> Option<&Actuator<E>> {
        self.actuators.get(id.index())
    }

    /// Actuators of a sealed stage in iteration order
    pub fn stage_actuators(&self, index: usize) -> impl Iterator<Item = &Actuator<E>> + '_ {
        self.stages
            .get(index)
            .map(Stage::members)
            .unwrap_or(&[])
            .iter()
            .map(move |id| &self.actuators[id.index()])
    }

    /// Lifecycle state
    pub fn state(&self) -> TrainState {
        self.state
    }

    /// Check if the scheduler loop is running
    pub fn is_ignited(&self) -> bool {
        self.state.is_running()
    }

    /// Index of the active stage, or of the stage executed last
    pub fn current_stage_index(&self) -> usize {
        self.stage_index
    }

    /// Human-readable dump of every sealed stage
    pub fn summary(&self) -> Summary<'_, 'r, E> {
        Summary::new(self)
    }

    // ------------------------------------------------------------------
    // Runtime data exchange (active stage only)
    // ------------------------------------------------------------------

    fn active_mut(&mut self, name: &str) -> Option<&mut Actuator<E>> {
        let index = self.state.stage()?;
        let id = self.stages[index]
            .members()
            .iter()
            .find(|id| self.actuators[id.index()].name() == name)?;
        self.actuators.get_mut(id.index())
    }

    /// Update the current values of a named actuator in the active stage
    ///
    /// Returns `Ok(false)` without touching anything if the train is not
    /// running or the actuator is not in the active stage.
    pub fn feed_current(&mut self, name: &str, values: &[f64]) -> Result<bool, ActuatorError> {
        match self.active_mut(name) {
            Some(actuator) => actuator.set_current(values).map(|_| true),
            None => {
                trace!("feed ignored for {}", name);
                Ok(false)
            }
        }
    }

    /// Target values of a named actuator in the active stage
    pub fn collect_target(&self, name: &str) -> Option<&[f64]> {
        let index = self.state.stage()?;
        self.stages[index]
            .members()
            .iter()
            .map(|id| &self.actuators[id.index()])
            .find(|actuator| actuator.name() == name)
            .map(Actuator::target)
    }

    /// Raise the external completion flag of a named actuator in the active stage
    pub fn signal_complete(&mut self, name: &str) -> bool {
        match self.active_mut(name) {
            Some(actuator) => {
                actuator.signal_complete();
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    /// Run the train from `from` until it completes or is extinguished
    ///
    /// Blocks the caller, sleeping `1 / base_loop_hz` between ticks.
    pub fn ignite<D: DelayNs>(&mut self, from: usize, delay: &mut D) -> Result<Outcome, TrainError> {
        self.ignite_with(from, delay, |_| {})
    }

    /// Like [`Train::ignite`], calling `between_ticks` after every tick
    ///
    /// The hook runs before the sleep and is the place to feed current
    /// values, collect targets or signal completion.
    pub fn ignite_with<D, F>(
        &mut self,
        from: usize,
        delay: &mut D,
        mut between_ticks: F,
    ) -> Result<Outcome, TrainError>
    where
        D: DelayNs,
        F: FnMut(&mut Self),
    {
        self.start(from)?;
        let period_us = self.config.tick_period_us();

        loop {
            match self.tick() {
                Some(TrainEvent::Completed) => return Ok(Outcome::Success),
                Some(TrainEvent::Extinguished(_)) => return Ok(Outcome::Cancelled),
                Some(TrainEvent::StageComplete(_)) | None => {}
            }
            between_ticks(self);
            delay.delay_us(period_us);
        }
    }

    /// Enter `Running(from)` without ticking
    ///
    /// Resets every actuator's run state so `init` runs once per
    /// execution. Use with [`Train::tick`] to drive the train by hand.
    pub fn start(&mut self, from: usize) -> Result<(), TrainError> {
        self.ensure_parked()?;

        if self.stages.is_empty() {
            warn!("an empty train cannot be ignited");
            self.state = TrainState::Failed(TrainError::EmptyTrain);
            return Err(TrainError::EmptyTrain);
        }
        if from >= self.stages.len() {
            let err = TrainError::StageOutOfRange {
                index: from,
                stages: self.stages.len(),
            };
            self.state = TrainState::Failed(err);
            return Err(err);
        }

        for actuator in self.actuators.iter_mut() {
            actuator.reset_run();
        }
        self.stage_index = from;
        self.state = TrainState::Running(from);
        self.regulator.ignite(from);
        info!("ignited at stage {} of {}", from, self.stages.len());
        Ok(())
    }

    /// Execute one scheduler tick
    ///
    /// Returns an event when the tick completed a stage, finished the
    /// train or observed an extinguish request. Does nothing unless
    /// running.
    pub fn tick(&mut self) -> Option<TrainEvent> {
        let index = self.state.stage()?;

        if self.regulator.is_extinguish_requested() {
            self.extinguish_stage(index);
            return Some(TrainEvent::Extinguished(index));
        }

        let base_loop_hz = self.config.base_loop_hz;
        let presets = self.config.tolerances;
        for id in self.stages[index].members() {
            let actuator = &mut self.actuators[id.index()];
            if !actuator.is_initialized() {
                debug!("stage {}: init {}", index, actuator.name());
                actuator.initialize();
                // init and the first step never share a tick
                continue;
            }
            actuator.poll(base_loop_hz, &presets);
        }

        if !self.stage_complete(index) {
            return None;
        }

        let next = index + 1;
        if next >= self.stages.len() {
            self.state = TrainState::Completed;
            self.regulator.park();
            info!("stage {} complete, train complete", index);
            return Some(TrainEvent::Completed);
        }

        self.state = TrainState::Running(next);
        self.stage_index = next;
        self.regulator.advance(next);
        info!("stage {} complete, entering stage {}", index, next);
        Some(TrainEvent::StageComplete(index))
    }

    fn stage_complete(&self, index: usize) -> bool {
        self.stages[index]
            .members()
            .iter()
            .all(|id| self.actuators[id.index()].is_complete())
    }

    fn extinguish_stage(&mut self, index: usize) {
        self.state = TrainState::Extinguishing;
        for id in self.stages[index].members() {
            self.actuators[id.index()].halt();
        }
        self.regulator.park();
        self.state = TrainState::Idle;
        info!("extinguished at stage {}", index);
    }

    pub(crate) fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub(crate) fn actuators(&self) -> &[Actuator<E>] {
        &self.actuators
    }
}

/// Arena index of a stage's first member, or `default` if it has none
fn first_index(stage: &Stage, default: usize) -> usize {
    stage.members().first().map_or(default, ActuatorId::index)
}
