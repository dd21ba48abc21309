//! Transition engine: текущий state + guarded transitions + "any" transitions.
//!
//! Engine ничего не знает о конкретных состояниях - только о capability set
//! (`State<C>`: on_enter / tick / on_exit). Ключ таблицы - enum id (`K`),
//! инстанс каждого состояния живёт в arena (один на variant) весь lifetime машины.
//!
//! Порядок внутри tick:
//! 1. any-transitions (по порядку регистрации)
//! 2. transitions текущего состояния (по порядку регистрации)
//! 3. первый true guard → change_state (exit → replace → enter)
//! 4. tick() текущего (возможно нового) состояния - ровно один раз

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Lifecycle состояния.
///
/// Все методы опциональны: состояние без tick (импульсное) - нормальная ситуация.
pub trait State<C>: Send + Sync {
    fn on_enter(&mut self, _ctx: &mut C) {}
    fn tick(&mut self, _ctx: &mut C) {}
    fn on_exit(&mut self, _ctx: &mut C) {}
}

/// Guard predicate. Чистая функция контекста, пересчитывается каждый tick.
pub type Guard<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

/// Transition: (target, guard)
pub struct Transition<K, C> {
    pub to: K,
    guard: Guard<C>,
}

impl<K: Copy, C> Transition<K, C> {
    pub fn new(to: K, guard: impl Fn(&C) -> bool + Send + Sync + 'static) -> Self {
        Self {
            to,
            guard: Box::new(guard),
        }
    }

    pub fn is_open(&self, ctx: &C) -> bool {
        (self.guard)(ctx)
    }
}

/// Результат tick: какая смена состояния произошла
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange<K> {
    pub from: K,
    pub to: K,
}

/// Generic transition-driven state machine.
///
/// Инварианты:
/// - после `start()` ровно одно активное состояние
/// - переход в текущее состояние - no-op
/// - exit старого всегда до enter нового
/// - переход в незарегистрированное состояние - panic (граф закрыт на этапе setup)
pub struct StateMachine<K, C> {
    current: K,
    states: HashMap<K, Box<dyn State<C>>>,
    transitions: HashMap<K, Vec<Transition<K, C>>>,
    any_transitions: Vec<Transition<K, C>>,
    started: bool,
}

impl<K, C> StateMachine<K, C>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Машина с явным initial state. `on_enter` initial вызывается в `start()`.
    pub fn new(initial: K) -> Self {
        Self {
            current: initial,
            states: HashMap::new(),
            transitions: HashMap::new(),
            any_transitions: Vec::new(),
            started: false,
        }
    }

    /// Регистрация инстанса состояния (один на id)
    #[track_caller]
    pub fn add_state(&mut self, id: K, state: impl State<C> + 'static) {
        self.assert_setup_phase("add_state");
        let previous = self.states.insert(id, Box::new(state));
        assert!(previous.is_none(), "state {id:?} registered twice");
    }

    /// Transition from → to. Порядок регистрации = приоритет.
    #[track_caller]
    pub fn add_transition(
        &mut self,
        from: K,
        to: K,
        guard: impl Fn(&C) -> bool + Send + Sync + 'static,
    ) {
        self.assert_setup_phase("add_transition");
        self.transitions
            .entry(from)
            .or_default()
            .push(Transition::new(to, guard));
    }

    /// Transition из любого состояния (проверяется раньше локальных).
    ///
    /// Два any-transition в один target - неоднозначность, panic.
    #[track_caller]
    pub fn add_any_transition(&mut self, to: K, guard: impl Fn(&C) -> bool + Send + Sync + 'static) {
        self.assert_setup_phase("add_any_transition");
        assert!(
            self.any_transitions.iter().all(|t| t.to != to),
            "duplicate any-transition to {to:?}"
        );
        self.any_transitions.push(Transition::new(to, guard));
    }

    /// Валидирует граф и входит в initial state.
    #[track_caller]
    pub fn start(&mut self, ctx: &mut C) {
        self.assert_setup_phase("start");
        self.assert_registered(self.current);

        for (from, list) in &self.transitions {
            self.assert_registered(*from);
            for transition in list {
                self.assert_registered(transition.to);
            }
        }
        for transition in &self.any_transitions {
            self.assert_registered(transition.to);
        }

        self.started = true;
        let initial = self.current;
        self.state_mut(initial).on_enter(ctx);
        crate::log(&format!("StateMachine: started in {initial:?}"));
    }

    /// Один шаг симуляции: максимум одна смена состояния + tick активного.
    #[track_caller]
    pub fn tick(&mut self, ctx: &mut C) -> Option<StateChange<K>> {
        assert!(self.started, "StateMachine::tick called before start()");

        let change = self.pending_transition(ctx).and_then(|to| {
            let from = self.current;
            self.change_state(to, ctx).then_some(StateChange { from, to })
        });

        let current = self.current;
        self.state_mut(current).tick(ctx);

        change
    }

    /// Смена состояния. Возвращает false если target == current (no-op).
    #[track_caller]
    pub fn change_state(&mut self, to: K, ctx: &mut C) -> bool {
        self.assert_registered(to);

        if to == self.current {
            return false;
        }

        let from = self.current;
        self.state_mut(from).on_exit(ctx);
        self.current = to;
        self.state_mut(to).on_enter(ctx);

        crate::log(&format!("StateMachine: {from:?} → {to:?}"));
        true
    }

    pub fn current(&self) -> K {
        self.current
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_registered(&self, id: K) -> bool {
        self.states.contains_key(&id)
    }

    /// Количество transitions у состояния (0 для terminal)
    pub fn transition_count(&self, from: K) -> usize {
        self.transitions.get(&from).map_or(0, Vec::len)
    }

    pub fn any_transition_count(&self) -> usize {
        self.any_transitions.len()
    }

    /// Первый открытый guard: сначала any, потом локальные
    fn pending_transition(&self, ctx: &C) -> Option<K> {
        let local = self
            .transitions
            .get(&self.current)
            .map(Vec::as_slice)
            .unwrap_or_default();

        self.any_transitions
            .iter()
            .chain(local)
            .find(|transition| transition.is_open(ctx))
            .map(|transition| transition.to)
    }

    #[track_caller]
    fn state_mut(&mut self, id: K) -> &mut dyn State<C> {
        match self.states.get_mut(&id) {
            Some(state) => state.as_mut(),
            None => panic!("state {id:?} is not registered in the state machine"),
        }
    }

    #[track_caller]
    fn assert_registered(&self, id: K) {
        assert!(
            self.states.contains_key(&id),
            "state {id:?} is not registered in the state machine"
        );
    }

    #[track_caller]
    fn assert_setup_phase(&self, operation: &str) {
        assert!(
            !self.started,
            "StateMachine::{operation} called after start(): the graph is closed"
        );
    }
}
